use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One person on a roster, exactly as submitted on the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub nationality: String,
}

/// A registration attempt: the leader plus up to two optional members and
/// the team-level fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRegistration {
    pub team_name: String,
    pub leader: TeamMember,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Pending,
    Verified,
    Rejected,
}

/// The row stored in the teams table once a roster has passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, derive_builder::Builder)]
pub struct TeamRecord {
    #[builder(default)]
    #[serde(default)]
    pub id: Option<String>,
    pub team_name: String,
    pub department: String,
    pub leader: TeamMember,
    #[builder(default)]
    #[serde(default)]
    pub members: Vec<TeamMember>,
    pub transaction_id: String,
    #[builder(default = "TeamStatus::Pending")]
    pub status: TeamStatus,
    #[builder(default = "Utc::now()")]
    pub registered_at: DateTime<Utc>,
}

/// A team's project deliverable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSubmission {
    #[serde(default)]
    pub id: Option<String>,
    pub team_id: String,
    pub repository_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub submitted_at: DateTime<Utc>,
}

/// Admin-controlled portal switches, stored as a single settings row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSettings {
    pub registration_open: bool,
    #[serde(default)]
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl PortalSettings {
    pub fn accepts_registrations_at(&self, now: DateTime<Utc>) -> bool {
        if !self.registration_open {
            return false;
        }
        match self.registration_deadline {
            Some(deadline) => now <= deadline,
            None => true,
        }
    }
}
