use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::identity::{IdentityError, IdentityService, User};
use crate::services::persistence::{RecordStore, StoreError};

/// Client for the hosted backend, speaking its REST conventions:
/// `/rest/v1/{table}` for records and `/auth/v1/*` for sessions.
pub struct Supabase {
    config: SupabaseConfig,
    client: Client,
    // Access token of the signed-in session, if any.
    session: Mutex<Option<String>>,
}

pub struct SupabaseConfig {
    /// Project base URL without a trailing slash.
    pub baseurl: String,
    pub anon_key: String,
}

impl Supabase {
    pub fn new(config: SupabaseConfig) -> anyhow::Result<Self> {
        let header_map = HeaderMap::from_iter([
            ("apikey".parse()?, config.anon_key.parse()?),
            (
                "Authorization".parse()?,
                format!("Bearer {}", config.anon_key).parse()?,
            ),
        ]);
        let client = ClientBuilder::new()
            .user_agent("Hackathon Portal")
            .default_headers(header_map)
            .build()?;

        Ok(Self {
            config,
            client,
            session: Mutex::new(None),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.baseurl, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.baseurl, path)
    }

    fn access_token(&self) -> Result<String, IdentityError> {
        self.session
            .lock()
            .unwrap()
            .clone()
            .ok_or(IdentityError::NotSignedIn)
    }
}

fn store_error(error: reqwest::Error) -> StoreError {
    StoreError::Unexpected(Box::new(error))
}

fn identity_error(error: reqwest::Error) -> IdentityError {
    IdentityError::Unexpected(Box::new(error))
}

#[async_trait]
impl RecordStore for Supabase {
    #[tracing::instrument(skip_all, fields(table = table))]
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(store_error)?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                let mut records: Vec<Value> = response.json().await.map_err(store_error)?;
                records.pop().ok_or(StoreError::NotFound)
            },
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchTable(table.to_string())),
            _ => Err(store_error(response.error_for_status().unwrap_err())),
        }
    }

    #[tracing::instrument(skip_all, fields(table = table))]
    async fn select(&self, table: &str, filters: &[(&str, &str)]) -> Result<Vec<Value>, StoreError> {
        let query: Vec<(String, String)> = filters
            .iter()
            .map(|(column, value)| (column.to_string(), format!("eq.{}", value)))
            .collect();

        let response = self
            .client
            .get(self.rest_url(table))
            .query(&query)
            .send()
            .await
            .map_err(store_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(store_error),
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchTable(table.to_string())),
            _ => Err(store_error(response.error_for_status().unwrap_err())),
        }
    }

    #[tracing::instrument(skip_all, fields(table = table, id = id))]
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .patch(self.rest_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(store_error)?;

        match response.status() {
            StatusCode::OK => {
                let mut records: Vec<Value> = response.json().await.map_err(store_error)?;
                records.pop().ok_or(StoreError::NotFound)
            },
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchTable(table.to_string())),
            _ => Err(store_error(response.error_for_status().unwrap_err())),
        }
    }

    #[tracing::instrument(skip_all, fields(table = table, id = id))]
    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.rest_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(store_error)?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchTable(table.to_string())),
            _ => Err(store_error(response.error_for_status().unwrap_err())),
        }
    }
}

#[async_trait]
impl IdentityService for Supabase {
    #[tracing::instrument(skip_all, fields(email = email))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let response = self
            .client
            .post(self.auth_url("token?grant_type=password"))
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await
            .map_err(identity_error)?;

        match response.status() {
            StatusCode::OK => {
                let session: SessionResponse =
                    response.json().await.map_err(identity_error)?;
                *self.session.lock().unwrap() = Some(session.access_token);
                Ok(session.user.into())
            },
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::InvalidCredentials)
            },
            _ => Err(identity_error(response.error_for_status().unwrap_err())),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn current_user(&self) -> Result<User, IdentityError> {
        let token = self.access_token()?;
        let response = self
            .client
            .get(self.auth_url("user"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(identity_error)?;

        match response.status() {
            StatusCode::OK => {
                let user: SupabaseUser = response.json().await.map_err(identity_error)?;
                Ok(user.into())
            },
            StatusCode::UNAUTHORIZED => Err(IdentityError::NotSignedIn),
            _ => Err(identity_error(response.error_for_status().unwrap_err())),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn sign_out(&self) -> Result<(), IdentityError> {
        let token = self.access_token()?;
        let response = self
            .client
            .post(self.auth_url("logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(identity_error)?;

        *self.session.lock().unwrap() = None;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            _ => Err(identity_error(response.error_for_status().unwrap_err())),
        }
    }
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    user: SupabaseUser,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    app_metadata: AppMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    role: Option<String>,
}

impl From<SupabaseUser> for User {
    fn from(value: SupabaseUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
            is_admin: value.app_metadata.role.as_deref() == Some("admin"),
        }
    }
}
