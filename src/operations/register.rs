use chrono::Utc;

use crate::models::{PortalSettings, TeamRecord, TeamRecordBuilder, TeamRegistration};
use crate::operations::{SETTINGS_TABLE, TEAMS_TABLE};
use crate::services::persistence::{RecordStore, StoreError};
use crate::validation::{validate_roster, validate_student_id, ValidationReport};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration is currently closed")]
    RegistrationClosed,
    #[error("{0} is required")]
    MissingTeamField(&'static str),
    #[error("the roster has validation errors")]
    InvalidRoster(ValidationReport),
    #[error("a team with this name is already registered")]
    TeamNameTaken,
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("unexpected error, {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validates a submitted registration end to end and, if everything holds,
/// performs the single insert of one team record.
#[tracing::instrument(skip_all, fields(team_name = %registration.team_name))]
pub async fn register_team(
    store: &dyn RecordStore,
    registration: &TeamRegistration,
) -> Result<TeamRecord, RegistrationError> {
    let settings = load_settings(store).await?;
    if !settings.accepts_registrations_at(Utc::now()) {
        return Err(RegistrationError::RegistrationClosed);
    }

    let team_name = registration.team_name.trim();
    if team_name.is_empty() {
        return Err(RegistrationError::MissingTeamField("team name"));
    }
    let transaction_id = registration.transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(RegistrationError::MissingTeamField("transaction ID"));
    }

    let report = validate_roster(&registration.leader, &registration.members);
    let department = match validate_student_id(registration.leader.student_id.trim()) {
        Ok(department) => department,
        // The report already carries the leader's student ID error.
        Err(_) => return Err(RegistrationError::InvalidRoster(report)),
    };
    if !report.is_valid() {
        return Err(RegistrationError::InvalidRoster(report));
    }

    let existing = store.select(TEAMS_TABLE, &[("team_name", team_name)]).await?;
    if !existing.is_empty() {
        return Err(RegistrationError::TeamNameTaken);
    }

    let members: Vec<_> = registration
        .members
        .iter()
        .filter(|member| !member.name.trim().is_empty())
        .cloned()
        .collect();

    let record = TeamRecordBuilder::default()
        .team_name(team_name.to_string())
        .department(department.to_string())
        .leader(registration.leader.clone())
        .members(members)
        .transaction_id(transaction_id.to_string())
        .build()
        .map_err(|error| StoreError::Unexpected(Box::new(error)))?;

    let stored = store
        .insert(TEAMS_TABLE, serde_json::to_value(&record)?)
        .await?;

    tracing::info!(team_name = team_name, "team registered");
    Ok(serde_json::from_value(stored)?)
}

// A missing settings row means the portal has not been opened yet.
async fn load_settings(store: &dyn RecordStore) -> Result<PortalSettings, RegistrationError> {
    let rows = store.select(SETTINGS_TABLE, &[]).await?;
    match rows.into_iter().next() {
        Some(row) => Ok(serde_json::from_value(row)?),
        None => Ok(PortalSettings {
            registration_open: false,
            registration_deadline: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TeamMember, TeamStatus};
    use crate::services::persistence::InMemoryStore;
    use serde_json::json;

    fn registration() -> TeamRegistration {
        TeamRegistration {
            team_name: "Null Pointers".to_string(),
            leader: TeamMember {
                name: "Rafi".to_string(),
                student_id: "240042101".to_string(),
                phone: "01712345678".to_string(),
                nationality: "Bangladeshi".to_string(),
            },
            members: vec![TeamMember {
                name: "Nusrat".to_string(),
                student_id: "240041102".to_string(),
                phone: "01812345678".to_string(),
                nationality: "Bangladeshi".to_string(),
            }],
            transaction_id: "TXN12345".to_string(),
        }
    }

    async fn open_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert(SETTINGS_TABLE, json!({"registration_open": true}))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn registers_a_valid_team() {
        let store = open_store().await;
        let record = register_team(&store, &registration()).await.unwrap();

        assert!(record.id.is_some());
        assert_eq!(record.department, "CSE");
        assert_eq!(record.status, TeamStatus::Pending);
        assert_eq!(record.members.len(), 1);

        let rows = store.select(TEAMS_TABLE, &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn blank_member_slots_are_dropped_before_storage() {
        let store = open_store().await;
        let mut submitted = registration();
        submitted.members.push(TeamMember::default());

        let record = register_team(&store, &submitted).await.unwrap();
        assert_eq!(record.members.len(), 1);
    }

    #[tokio::test]
    async fn refuses_to_register_while_closed() {
        let store = InMemoryStore::new();
        let result = register_team(&store, &registration()).await;
        assert!(matches!(result, Err(RegistrationError::RegistrationClosed)));

        store
            .insert(SETTINGS_TABLE, json!({"registration_open": false}))
            .await
            .unwrap();
        let result = register_team(&store, &registration()).await;
        assert!(matches!(result, Err(RegistrationError::RegistrationClosed)));
    }

    #[tokio::test]
    async fn requires_team_name_and_transaction_id() {
        let store = open_store().await;

        let mut no_name = registration();
        no_name.team_name = "  ".to_string();
        assert!(matches!(
            register_team(&store, &no_name).await,
            Err(RegistrationError::MissingTeamField("team name"))
        ));

        let mut no_txn = registration();
        no_txn.transaction_id = String::new();
        assert!(matches!(
            register_team(&store, &no_txn).await,
            Err(RegistrationError::MissingTeamField("transaction ID"))
        ));
    }

    #[tokio::test]
    async fn rejects_an_invalid_roster_without_storing_anything() {
        let store = open_store().await;
        let mut submitted = registration();
        submitted.leader.student_id = "240052101".to_string();

        let result = register_team(&store, &submitted).await;
        match result {
            Err(RegistrationError::InvalidRoster(report)) => assert!(!report.is_valid()),
            other => panic!("expected an invalid roster, got {:?}", other.map(|r| r.team_name)),
        }

        let rows = store.select(TEAMS_TABLE, &[]).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn rejects_rosters_with_too_many_members() {
        let store = open_store().await;
        let mut submitted = registration();
        submitted.members.push(TeamMember {
            name: "Tahmid".to_string(),
            student_id: "230031203".to_string(),
            phone: "01912345678".to_string(),
            nationality: "Bangladeshi".to_string(),
        });
        submitted.members.push(TeamMember {
            name: "Farhan".to_string(),
            student_id: "220041203".to_string(),
            phone: "01612345678".to_string(),
            nationality: "Bangladeshi".to_string(),
        });

        let result = register_team(&store, &submitted).await;
        assert!(matches!(result, Err(RegistrationError::InvalidRoster(_))));

        let rows = store.select(TEAMS_TABLE, &[]).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_team_names() {
        let store = open_store().await;
        register_team(&store, &registration()).await.unwrap();

        let result = register_team(&store, &registration()).await;
        assert!(matches!(result, Err(RegistrationError::TeamNameTaken)));
    }
}
