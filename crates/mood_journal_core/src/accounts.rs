//! crates/mood_journal_core/src/accounts.rs
//!
//! Account registration: input validation and persistence through the ports.

use crate::domain::NewUserAccount;
use crate::ports::{CredentialService, DatabaseService, PortError, PortResult};
use tracing::info;

pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegistrationRequest {
    /// Checks the form in a fixed order and reports the first problem found.
    pub fn validate(&self) -> Result<(), PortError> {
        let fields = [&self.username, &self.email, &self.name, &self.password];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(PortError::Validation("Please fill in all fields".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(PortError::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_CHARS
            )));
        }
        if !self.email.contains('@') {
            return Err(PortError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validates, hashes and stores a new account, returning the new user's row id.
///
/// Duplicate usernames or emails come back as `PortError::Conflict`.
pub async fn register(
    db: &dyn DatabaseService,
    credentials: &dyn CredentialService,
    req: RegistrationRequest,
) -> PortResult<i32> {
    req.validate()?;
    let password_hash = credentials.hash_password(&req.password)?;
    let id = db
        .register_user(NewUserAccount {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            display_name: req.name.trim().to_string(),
            password_hash,
        })
        .await?;
    info!(user_id = id, "Registered new account");
    Ok(id)
}
