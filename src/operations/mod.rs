pub mod register;
pub mod review;
pub mod submit;

pub use register::{register_team, RegistrationError};
pub use review::{reject_payment, verify_payment, ReviewError};
pub use submit::{submit_project, SubmissionError};

pub static TEAMS_TABLE: &str = "teams";
pub static SETTINGS_TABLE: &str = "settings";
pub static SUBMISSIONS_TABLE: &str = "submissions";
