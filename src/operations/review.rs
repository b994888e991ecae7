use serde_json::json;

use crate::models::{TeamRecord, TeamStatus};
use crate::operations::TEAMS_TABLE;
use crate::services::identity::{IdentityError, IdentityService};
use crate::services::persistence::{RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("only admins can review payments")]
    Forbidden,
    #[error("{0}")]
    Identity(#[from] IdentityError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("unexpected error, {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Marks a team's payment reference as checked and accepted.
#[tracing::instrument(skip_all, fields(team_id = team_id))]
pub async fn verify_payment(
    store: &dyn RecordStore,
    identity: &dyn IdentityService,
    team_id: &str,
) -> Result<TeamRecord, ReviewError> {
    review(store, identity, team_id, TeamStatus::Verified).await
}

/// Marks a team's payment reference as checked and refused.
#[tracing::instrument(skip_all, fields(team_id = team_id))]
pub async fn reject_payment(
    store: &dyn RecordStore,
    identity: &dyn IdentityService,
    team_id: &str,
) -> Result<TeamRecord, ReviewError> {
    review(store, identity, team_id, TeamStatus::Rejected).await
}

async fn review(
    store: &dyn RecordStore,
    identity: &dyn IdentityService,
    team_id: &str,
    status: TeamStatus,
) -> Result<TeamRecord, ReviewError> {
    let user = identity.current_user().await?;
    if !user.is_admin {
        return Err(ReviewError::Forbidden);
    }

    let updated = store
        .update(TEAMS_TABLE, team_id, json!({ "status": status }))
        .await?;

    tracing::info!(team_id = team_id, reviewer = %user.email, "payment reviewed");
    Ok(serde_json::from_value(updated)?)
}
