use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use rand_core::OsRng;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use disasterhub_db::{DuplicateEmail, LocalState};
use disasterhub_types::api::{LoginRequest, RegisterRequest};
use disasterhub_types::models::{RememberedUser, Role, StoredUser};

const MIN_PASSWORD_LEN: usize = 6;
const ADMIN_ID: &str = "admin-001";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("All fields are required")]
    MissingFields,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Invalid credentials or role")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Admin account supplied through configuration.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

/// Session gate for the dashboard. The local implementation is a
/// placeholder, not a security boundary.
pub trait Authenticator: Send + Sync {
    fn register(&self, req: &RegisterRequest) -> Result<StoredUser, AuthError>;
    fn login(&self, req: &LoginRequest) -> Result<StoredUser, AuthError>;
    fn logout(&self) -> Result<(), AuthError>;
    fn current_user(&self) -> Result<Option<StoredUser>, AuthError>;
    fn remembered(&self) -> Result<Option<RememberedUser>, AuthError>;
}

/// Accounts kept in the local key-value store.
pub struct LocalAuthenticator {
    state: Arc<LocalState>,
    admin: Option<AdminCredentials>,
}

impl LocalAuthenticator {
    pub fn new(state: Arc<LocalState>, admin: Option<AdminCredentials>) -> Self {
        Self { state, admin }
    }

    fn is_admin_email(&self, email: &str) -> bool {
        self.admin.as_ref().is_some_and(|a| a.email == email)
    }

    fn admin_login(&self, req: &LoginRequest) -> Option<StoredUser> {
        let admin = self.admin.as_ref()?;
        if admin.email != req.email || admin.password != req.password {
            return None;
        }
        Some(StoredUser {
            id: ADMIN_ID.into(),
            email: admin.email.clone(),
            username: "Admin".into(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: Utc::now(),
        })
    }

    fn finish_login(&self, user: &StoredUser, remember_me: bool) -> Result<(), AuthError> {
        self.state.set_current_user(user)?;
        if remember_me {
            self.state.set_remembered_user(&RememberedUser {
                email: user.email.clone(),
                role: user.role,
            })?;
        } else {
            self.state.clear_remembered_user()?;
        }
        Ok(())
    }
}

impl Authenticator for LocalAuthenticator {
    fn register(&self, req: &RegisterRequest) -> Result<StoredUser, AuthError> {
        if req.email.is_empty() || req.password.is_empty() || req.username.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.state.find_user_by_email(&req.email)?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let role = if self.is_admin_email(&req.email) { Role::Admin } else { req.role };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
            .to_string();

        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            email: req.email.clone(),
            username: req.username.clone(),
            password_hash,
            role,
            created_at: Utc::now(),
        };

        // The check above is only a fast path; add_user decides under its lock.
        self.state.add_user(&user).map_err(|e| {
            if e.is::<DuplicateEmail>() {
                AuthError::EmailTaken
            } else {
                AuthError::Storage(e)
            }
        })?;
        self.state.set_current_user(&user)?;

        info!("Registered {:?} account {}", user.role, user.email);
        Ok(user)
    }

    fn login(&self, req: &LoginRequest) -> Result<StoredUser, AuthError> {
        if req.email.is_empty() || req.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        // The configured admin pair wins regardless of the requested role.
        if let Some(admin) = self.admin_login(req) {
            self.finish_login(&admin, req.remember_me)?;
            info!("Admin logged in");
            return Ok(admin);
        }

        let user = self
            .state
            .find_user_by_email(&req.email)?
            .filter(|u| u.role == req.role)
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.finish_login(&user, req.remember_me)?;
        info!("User {} logged in", user.email);
        Ok(user)
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.state.clear_current_user()?;
        Ok(())
    }

    fn current_user(&self) -> Result<Option<StoredUser>, AuthError> {
        Ok(self.state.current_user()?)
    }

    fn remembered(&self) -> Result<Option<RememberedUser>, AuthError> {
        Ok(self.state.remembered_user()?)
    }
}
