use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not signed in")]
    NotSignedIn,
    #[error("unexpected error, {0}")]
    Unexpected(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Session boundary to the hosted authentication service.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, IdentityError>;
    async fn current_user(&self) -> Result<User, IdentityError>;
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Always-signed-in identity for tests and local runs.
pub struct FakeIdentityService {
    user: User,
}

impl FakeIdentityService {
    pub fn admin() -> Self {
        Self {
            user: User {
                id: "admin".to_string(),
                email: "admin@example.org".to_string(),
                is_admin: true,
            },
        }
    }

    pub fn participant() -> Self {
        Self {
            user: User {
                id: "participant".to_string(),
                email: "participant@example.org".to_string(),
                is_admin: false,
            },
        }
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<User, IdentityError> {
        Ok(self.user.clone())
    }

    async fn current_user(&self) -> Result<User, IdentityError> {
        Ok(self.user.clone())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}
