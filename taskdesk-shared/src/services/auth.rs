use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{required_text, ServiceError, ServiceResult};
use crate::auth::jwt::{create_token, validate_refresh_token, Claims, JwtError, TokenType};
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::models::{CreateUser, Role, User};
use crate::repositories::{RepositoryError, UserRepository};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const USER_EXISTS: &str = "User already exists";

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: Arc<str>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: &str) -> Self {
        Self {
            users,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// Creates a `colaborador` account and signs it in
    pub async fn register(&self, input: RegisterUser) -> ServiceResult<AuthSession> {
        let name = required_text(&input.name, "Name")?;
        let email = normalize_email(&input.email);

        if input.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(USER_EXISTS.to_string()));
        }

        let password_hash = hash_blocking(input.password).await?;

        let user = self
            .users
            .create(CreateUser {
                name,
                email,
                password_hash,
                role: Role::Colaborador,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::Conflict(USER_EXISTS.to_string()),
                other => other.into(),
            })?;

        info!(user_id = user.id, "User registered");
        self.issue_session(user)
    }

    /// Same error for unknown email and wrong password
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthSession> {
        let email = normalize_email(email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string())),
        };

        let hash = user.password_hash.clone();
        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::Internal(format!("Password verification task failed: {e}")))??;

        if !valid {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!(user_id = user.id, "User logged in");
        self.issue_session(user)
    }

    /// Exchanges a refresh token for a new access token
    ///
    /// The role is re-read so a role change takes effect on the next refresh.
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<String> {
        let claims = validate_refresh_token(refresh_token, &self.jwt_secret).map_err(|e| {
            ServiceError::Unauthorized(match e {
                JwtError::Expired => "Refresh token expired".to_string(),
                _ => "Invalid refresh token".to_string(),
            })
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))?;

        self.sign(&Claims::new(user.id, user.role, TokenType::Access))
    }

    /// Makes sure the bootstrap administrator exists with the `admin` role
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);

        if let Some(existing) = self.users.find_by_email(&email).await? {
            if existing.role == Role::Admin {
                return Ok(existing);
            }
            let promoted = self
                .users
                .update_role(existing.id, Role::Admin)
                .await?
                .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
            info!(user_id = promoted.id, "Promoted bootstrap user to admin");
            return Ok(promoted);
        }

        let password_hash = hash_blocking(password.to_string()).await?;
        let admin = self
            .users
            .create(CreateUser {
                name: required_text(name, "Name")?,
                email,
                password_hash,
                role: Role::Admin,
            })
            .await?;

        info!(user_id = admin.id, "Created bootstrap admin");
        Ok(admin)
    }

    fn issue_session(&self, user: User) -> ServiceResult<AuthSession> {
        let token = self.sign(&Claims::new(user.id, user.role, TokenType::Access))?;
        let refresh_token = self.sign(&Claims::new(user.id, user.role, TokenType::Refresh))?;

        Ok(AuthSession {
            user,
            token,
            refresh_token,
        })
    }

    fn sign(&self, claims: &Claims) -> ServiceResult<String> {
        create_token(claims, &self.jwt_secret).map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

async fn hash_blocking(password: String) -> ServiceResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(format!("Password hashing task failed: {e}")))??;
    Ok(hash)
}
