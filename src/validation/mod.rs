mod phone;
mod roster;
mod student_id;

pub use phone::{normalize_phone, validate_phone};
pub use roster::{find_duplicates, validate_roster, FieldName, RosterSlot, ValidationReport};
pub use student_id::{normalize_student_id, validate_student_id, Department};

/// Why a single field was rejected. These messages are shown to participants
/// as inline form errors, so they stay short and concrete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("student ID must be exactly 9 digits")]
    MalformedStudentId,
    #[error("student ID must start with a valid enrollment year")]
    InvalidYear,
    #[error("digits 3 and 4 of the student ID must be 00")]
    InvalidFixedSegment,
    #[error("the department digit must be between 1 and 5")]
    InvalidDepartment,
    #[error("{0}")]
    InvalidProgramOrSection(String),
    #[error("roll number must be between 01 and 99")]
    InvalidRoll,
    #[error("{0}")]
    UnrecognizedPhoneFormat(String),
    #[error("{0} is required")]
    RequiredFieldMissing(&'static str),
    #[error("a team can have at most two members besides the leader")]
    TooManyMembers,
    #[error("{0} is the same as the team leader's")]
    DuplicateWithLeader(&'static str),
    #[error("{0} is already used by another team member")]
    DuplicateWithMember(&'static str),
}
