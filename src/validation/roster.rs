use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::models::TeamMember;
use crate::validation::{
    normalize_phone, normalize_student_id, validate_phone, validate_student_id, ValidationError,
};

/// Position of a person within a roster. Member indices refer to the order
/// the members were submitted in, leader excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RosterSlot {
    Leader,
    Member(usize),
}

impl fmt::Display for RosterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterSlot::Leader => f.write_str("leader"),
            RosterSlot::Member(index) => write!(f, "member {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldName {
    Name,
    StudentId,
    Phone,
    Nationality,
}

impl FieldName {
    fn label(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::StudentId => "student ID",
            FieldName::Phone => "phone number",
            FieldName::Nationality => "nationality",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation outcome for a whole roster. An empty report means
/// the roster may be registered. The first error recorded for a slot/field
/// wins; later rules never overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<(RosterSlot, FieldName), ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, slot: RosterSlot, field: FieldName) -> Option<&ValidationError> {
        self.errors.get(&(slot, field))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RosterSlot, FieldName, &ValidationError)> {
        self.errors
            .iter()
            .map(|((slot, field), error)| (*slot, *field, error))
    }

    fn record(&mut self, slot: RosterSlot, field: FieldName, error: ValidationError) {
        self.errors.entry((slot, field)).or_insert(error);
    }
}

/// Values that occur more than once in `values`. Empty entries are treated
/// as not submitted and ignored.
pub fn find_duplicates<I, S>(values: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }
        *counts.entry(value.to_string()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value)
        .collect()
}

/// Validates a full roster before registration: field formats for the leader
/// and every entered member, required member fields, and cross-roster
/// uniqueness of student IDs and phone numbers.
///
/// Unlike the single-field validators this accumulates every failure it
/// finds, so a form can surface all problems at once.
pub fn validate_roster(leader: &TeamMember, members: &[TeamMember]) -> ValidationReport {
    let mut report = ValidationReport::default();

    // Members with an empty name were never entered on the form.
    let active: Vec<(RosterSlot, &TeamMember)> = members
        .iter()
        .enumerate()
        .filter(|(_, member)| !member.name.trim().is_empty())
        .map(|(index, member)| (RosterSlot::Member(index), member))
        .collect();

    // Teams are capped at three people, so only two member slots exist.
    for (slot, _) in active.iter().skip(2) {
        report.record(*slot, FieldName::Name, ValidationError::TooManyMembers);
    }

    // The surrounding form guarantees the leader's fields are present.
    if let Err(error) = validate_student_id(leader.student_id.trim()) {
        report.record(RosterSlot::Leader, FieldName::StudentId, error);
    }
    if let Err(error) = validate_phone(leader.phone.trim()) {
        report.record(RosterSlot::Leader, FieldName::Phone, error);
    }

    for (slot, member) in &active {
        let student_id = member.student_id.trim();
        if student_id.is_empty() {
            report.record(
                *slot,
                FieldName::StudentId,
                ValidationError::RequiredFieldMissing(FieldName::StudentId.label()),
            );
        } else if let Err(error) = validate_student_id(student_id) {
            report.record(*slot, FieldName::StudentId, error);
        }

        let phone = member.phone.trim();
        if phone.is_empty() {
            report.record(
                *slot,
                FieldName::Phone,
                ValidationError::RequiredFieldMissing(FieldName::Phone.label()),
            );
        } else if let Err(error) = validate_phone(phone) {
            report.record(*slot, FieldName::Phone, error);
        }

        if member.nationality.trim().is_empty() {
            report.record(
                *slot,
                FieldName::Nationality,
                ValidationError::RequiredFieldMissing(FieldName::Nationality.label()),
            );
        }
    }

    check_uniqueness(
        &mut report,
        FieldName::StudentId,
        leader,
        &active,
        |member| normalize_student_id(member.student_id.trim()),
    );
    check_uniqueness(&mut report, FieldName::Phone, leader, &active, |member| {
        normalize_phone(member.phone.trim())
    });

    report
}

fn check_uniqueness(
    report: &mut ValidationReport,
    field: FieldName,
    leader: &TeamMember,
    active: &[(RosterSlot, &TeamMember)],
    normalize: impl Fn(&TeamMember) -> String,
) {
    let leader_value = normalize(leader);

    let mut slots = vec![(RosterSlot::Leader, leader_value.clone())];
    slots.extend(
        active
            .iter()
            .map(|&(slot, member)| (slot, normalize(member))),
    );

    let duplicated = find_duplicates(slots.iter().map(|(_, value)| value.as_str()));

    for (slot, value) in &slots {
        if !duplicated.contains(value) {
            continue;
        }
        let error = if *slot != RosterSlot::Leader && *value == leader_value {
            ValidationError::DuplicateWithLeader(field.label())
        } else {
            ValidationError::DuplicateWithMember(field.label())
        };
        report.record(*slot, field, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, student_id: &str, phone: &str, nationality: &str) -> TeamMember {
        TeamMember {
            name: name.to_string(),
            student_id: student_id.to_string(),
            phone: phone.to_string(),
            nationality: nationality.to_string(),
        }
    }

    fn leader() -> TeamMember {
        member("Rafi", "240042101", "01712345678", "Bangladeshi")
    }

    #[test]
    fn finds_values_that_occur_more_than_once() {
        let duplicates = find_duplicates(["a", "b", "a", "c", "c", "c"]);
        assert_eq!(
            duplicates,
            HashSet::from(["a".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn ignores_empty_values_when_counting() {
        assert!(find_duplicates(Vec::<String>::new()).is_empty());
        assert!(find_duplicates(["", "", "x"]).is_empty());
    }

    #[test]
    fn accepts_a_valid_full_roster() {
        let members = [
            member("Nusrat", "240041102", "01812345678", "Bangladeshi"),
            member("Tahmid", "230031203", "01912345678", "Bangladeshi"),
        ];
        let report = validate_roster(&leader(), &members);
        assert!(report.is_valid(), "unexpected errors: {:?}", report);
    }

    #[test]
    fn blank_name_members_are_treated_as_not_entered() {
        let members = [member("", "", "", ""), member("  ", "", "", "")];
        let report = validate_roster(&leader(), &members);
        assert!(report.is_valid());
    }

    #[test]
    fn requires_student_id_phone_and_nationality_for_entered_members() {
        let members = [member("Nusrat", "", "", "")];
        let report = validate_roster(&leader(), &members);

        assert_eq!(
            report.get(RosterSlot::Member(0), FieldName::StudentId),
            Some(&ValidationError::RequiredFieldMissing("student ID"))
        );
        assert_eq!(
            report.get(RosterSlot::Member(0), FieldName::Phone),
            Some(&ValidationError::RequiredFieldMissing("phone number"))
        );
        assert_eq!(
            report.get(RosterSlot::Member(0), FieldName::Nationality),
            Some(&ValidationError::RequiredFieldMissing("nationality"))
        );
    }

    #[test]
    fn flags_both_slots_when_a_member_repeats_the_leaders_student_id() {
        let members = [member("Nusrat", "24 0042-101", "01812345678", "Bangladeshi")];
        let report = validate_roster(&leader(), &members);

        assert_eq!(
            report.get(RosterSlot::Leader, FieldName::StudentId),
            Some(&ValidationError::DuplicateWithMember("student ID"))
        );
        assert_eq!(
            report.get(RosterSlot::Member(0), FieldName::StudentId),
            Some(&ValidationError::DuplicateWithLeader("student ID"))
        );
    }

    #[test]
    fn flags_duplicate_phones_across_surface_forms() {
        let members = [
            member("Nusrat", "240041102", "+8801812345678", "Bangladeshi"),
            member("Tahmid", "230031203", "01812345678", "Bangladeshi"),
        ];
        let report = validate_roster(&leader(), &members);

        assert_eq!(
            report.get(RosterSlot::Member(0), FieldName::Phone),
            Some(&ValidationError::DuplicateWithMember("phone number"))
        );
        assert_eq!(
            report.get(RosterSlot::Member(1), FieldName::Phone),
            Some(&ValidationError::DuplicateWithMember("phone number"))
        );
        assert!(report.get(RosterSlot::Leader, FieldName::Phone).is_none());
    }

    #[test]
    fn accumulates_errors_across_every_slot() {
        let bad_leader = member("Rafi", "240052101", "0171234", "Bangladeshi");
        let members = [member("Nusrat", "999999999", "01812345678", "")];
        let report = validate_roster(&bad_leader, &members);

        assert!(report.get(RosterSlot::Leader, FieldName::StudentId).is_some());
        assert!(report.get(RosterSlot::Leader, FieldName::Phone).is_some());
        assert!(report
            .get(RosterSlot::Member(0), FieldName::StudentId)
            .is_some());
        assert!(report
            .get(RosterSlot::Member(0), FieldName::Nationality)
            .is_some());
        assert_eq!(report.len(), 4);
    }

    #[test]
    fn format_errors_win_over_duplicate_errors_for_the_same_field() {
        let members = [
            member("Nusrat", "bad-id", "01812345678", "Bangladeshi"),
            member("Tahmid", "bad-id", "01912345678", "Bangladeshi"),
        ];
        let report = validate_roster(&leader(), &members);

        assert_eq!(
            report.get(RosterSlot::Member(0), FieldName::StudentId),
            Some(&ValidationError::MalformedStudentId)
        );
        assert_eq!(
            report.get(RosterSlot::Member(1), FieldName::StudentId),
            Some(&ValidationError::MalformedStudentId)
        );
    }

    #[test]
    fn rejects_rosters_with_more_than_two_members() {
        let members = [
            member("Nusrat", "240041102", "01812345678", "Bangladeshi"),
            member("Tahmid", "230031203", "01912345678", "Bangladeshi"),
            member("Farhan", "220041203", "01612345678", "Bangladeshi"),
            member("Sadia", "220031104", "01512345678", "Bangladeshi"),
        ];
        let report = validate_roster(&leader(), &members);

        assert!(report.get(RosterSlot::Member(0), FieldName::Name).is_none());
        assert!(report.get(RosterSlot::Member(1), FieldName::Name).is_none());
        assert_eq!(
            report.get(RosterSlot::Member(2), FieldName::Name),
            Some(&ValidationError::TooManyMembers)
        );
        assert_eq!(
            report.get(RosterSlot::Member(3), FieldName::Name),
            Some(&ValidationError::TooManyMembers)
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn blank_slots_do_not_count_toward_the_member_cap() {
        let members = [
            member("Nusrat", "240041102", "01812345678", "Bangladeshi"),
            member("", "", "", ""),
            member("Tahmid", "230031203", "01912345678", "Bangladeshi"),
        ];
        let report = validate_roster(&leader(), &members);
        assert!(report.is_valid(), "unexpected errors: {:?}", report);
    }

    #[test]
    fn reports_are_idempotent() {
        let members = [member("Nusrat", "240042101", "01712345678", "")];
        let first = validate_roster(&leader(), &members);
        let second = validate_roster(&leader(), &members);
        assert_eq!(first, second);
        assert!(!first.is_valid());
    }
}
