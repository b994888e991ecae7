use std::fmt;
use std::ops::RangeInclusive;

use crate::validation::ValidationError;

/// Enrollment years currently allowed to register.
pub static ALLOWED_ENTRY_YEARS: [&str; 3] = ["22", "23", "24"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    Mpe,
    Btm,
    Eee,
    Cse,
    Tve,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Mpe => "MPE",
            Department::Btm => "BTM",
            Department::Eee => "EEE",
            Department::Cse => "CSE",
            Department::Tve => "TVE",
        }
    }

    fn from_digit(digit: u8) -> Option<Department> {
        match digit {
            1 => Some(Department::Mpe),
            2 => Some(Department::Btm),
            3 => Some(Department::Eee),
            4 => Some(Department::Cse),
            5 => Some(Department::Tve),
            _ => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Program/section constraints per department, kept as a lookup table rather
// than nested branches. An empty section list means the section digit is
// unconstrained for that department. Ordered MPE, BTM, EEE, CSE, TVE.
struct DepartmentRule {
    programs: RangeInclusive<u8>,
    sections_by_program: &'static [(u8, RangeInclusive<u8>)],
}

static DEPARTMENT_RULES: [DepartmentRule; 5] = [
    DepartmentRule {
        programs: 1..=2,
        sections_by_program: &[(1, 1..=2), (2, 1..=1)],
    },
    DepartmentRule {
        programs: 1..=1,
        sections_by_program: &[],
    },
    DepartmentRule {
        programs: 1..=3,
        sections_by_program: &[],
    },
    DepartmentRule {
        programs: 1..=2,
        sections_by_program: &[(1, 1..=2), (2, 1..=1)],
    },
    DepartmentRule {
        programs: 1..=1,
        sections_by_program: &[],
    },
];

fn rule_for(department: Department) -> &'static DepartmentRule {
    let index = match department {
        Department::Mpe => 0,
        Department::Btm => 1,
        Department::Eee => 2,
        Department::Cse => 3,
        Department::Tve => 4,
    };
    &DEPARTMENT_RULES[index]
}

/// Canonical comparison form of a student ID. Never used for display.
pub fn normalize_student_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

/// Validates a 9-digit institutional student ID and resolves the department
/// it encodes. Checks run in order and stop at the first failure.
pub fn validate_student_id(raw: &str) -> Result<Department, ValidationError> {
    let id = normalize_student_id(raw);

    if id.len() != 9 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::MalformedStudentId);
    }

    if !ALLOWED_ENTRY_YEARS.contains(&&id[0..2]) {
        return Err(ValidationError::InvalidYear);
    }

    if &id[2..4] != "00" {
        return Err(ValidationError::InvalidFixedSegment);
    }

    let department = Department::from_digit(id.as_bytes()[4] - b'0')
        .ok_or(ValidationError::InvalidDepartment)?;

    let program = id.as_bytes()[5] - b'0';
    let section = id.as_bytes()[6] - b'0';
    check_program_and_section(department, program, section)?;

    let roll: u8 = id[7..9].parse().map_err(|_| ValidationError::InvalidRoll)?;
    if !(1..=99).contains(&roll) {
        return Err(ValidationError::InvalidRoll);
    }

    Ok(department)
}

fn check_program_and_section(
    department: Department,
    program: u8,
    section: u8,
) -> Result<(), ValidationError> {
    let rule = rule_for(department);

    if !rule.programs.contains(&program) {
        let message = if rule.programs.start() == rule.programs.end() {
            format!(
                "{} student IDs must have program digit {}",
                department,
                rule.programs.start()
            )
        } else {
            format!(
                "{} student IDs must have a program digit between {} and {}",
                department,
                rule.programs.start(),
                rule.programs.end()
            )
        };
        return Err(ValidationError::InvalidProgramOrSection(message));
    }

    if let Some((_, sections)) = rule
        .sections_by_program
        .iter()
        .find(|(p, _)| *p == program)
    {
        if !sections.contains(&section) {
            return Err(ValidationError::InvalidProgramOrSection(format!(
                "{} program {} has no section {}",
                department, program, section
            )));
        }
    }

    Ok(())
}
