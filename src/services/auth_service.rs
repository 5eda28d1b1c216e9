use tracing::{debug, info, warn};

use crate::api::{LoginResponse, LoginUser, PublicUser};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Principal, TokenKeys};
use crate::database::models::NewUser;
use crate::database::{DatabaseError, DynRepository};
use crate::services::error::ServiceError;

/// Registration, login and token verification.
///
/// Tokens are stateless: nothing is stored per session, so an issued token
/// stays valid until its `exp` regardless of later account changes.
#[derive(Clone)]
pub struct AuthService {
    repo: DynRepository,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(repo: DynRepository, keys: TokenKeys, bcrypt_cost: u32) -> Self {
        Self {
            repo,
            keys,
            bcrypt_cost,
        }
    }

    pub async fn register(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<PublicUser, ServiceError> {
        let (email, password) = required_credentials(email, password)?;

        if self.repo.find_user_by_email(&email).await?.is_some() {
            info!("Registration rejected, email already in use");
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = self
            .repo
            .insert_user(NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                DatabaseError::Conflict(_) => ServiceError::Conflict("User already exists".to_string()),
                other => other.into(),
            })?;

        info!("Registered user {}", user.id);
        Ok(user.into())
    }

    pub async fn authenticate(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<LoginResponse, ServiceError> {
        let (email, password) = required_credentials(email, password)?;

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if !verify_password(password, user.password_hash.clone()).await? {
            warn!("Failed login for user {}", user.id);
            return Err(ServiceError::InvalidCredentials("Invalid credentials".to_string()));
        }

        let principal = Principal {
            id: user.id,
            email: user.email,
        };
        let token = self.keys.issue(&principal)?;

        info!("User {} logged in", principal.id);
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user: LoginUser {
                id: principal.id,
                email: principal.email,
            },
        })
    }

    /// Resolve the bearer token of a request into its principal.
    ///
    /// `None` means the request carried no token at all.
    pub fn verify(&self, token: Option<&str>) -> Result<Principal, ServiceError> {
        let token =
            token.ok_or_else(|| ServiceError::Unauthenticated("No token provided".to_string()))?;

        self.keys.validate(token).map(Principal::from).map_err(|e| {
            debug!("Token rejected: {}", e);
            e.into()
        })
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, ServiceError> {
        let users = self.repo.list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }
}

fn required_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ServiceError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(ServiceError::InvalidInput(
            "Email and password are required".to_string(),
        )),
    }
}
