use chrono::Utc;

use crate::models::{ProjectSubmission, TeamRecord, TeamStatus};
use crate::operations::{SUBMISSIONS_TABLE, TEAMS_TABLE};
use crate::services::persistence::{RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("repository URL is required")]
    MissingRepositoryUrl,
    #[error("only verified teams can submit a project")]
    TeamNotVerified,
    #[error("this team has already submitted a project")]
    AlreadySubmitted,
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("unexpected error, {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Records a verified team's project deliverable. One submission per team.
#[tracing::instrument(skip_all, fields(team_id = team_id))]
pub async fn submit_project(
    store: &dyn RecordStore,
    team_id: &str,
    repository_url: &str,
    live_url: Option<String>,
) -> Result<ProjectSubmission, SubmissionError> {
    let repository_url = repository_url.trim();
    if repository_url.is_empty() {
        return Err(SubmissionError::MissingRepositoryUrl);
    }

    let team: TeamRecord = serde_json::from_value(store.find(TEAMS_TABLE, team_id).await?)?;
    if team.status != TeamStatus::Verified {
        return Err(SubmissionError::TeamNotVerified);
    }

    let existing = store
        .select(SUBMISSIONS_TABLE, &[("team_id", team_id)])
        .await?;
    if !existing.is_empty() {
        return Err(SubmissionError::AlreadySubmitted);
    }

    let submission = ProjectSubmission {
        id: None,
        team_id: team_id.to_string(),
        repository_url: repository_url.to_string(),
        live_url,
        submitted_at: Utc::now(),
    };
    let stored = store
        .insert(SUBMISSIONS_TABLE, serde_json::to_value(&submission)?)
        .await?;

    tracing::info!(team_id = team_id, "project submitted");
    Ok(serde_json::from_value(stored)?)
}
