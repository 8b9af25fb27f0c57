//! services/api/src/adapters/credentials.rs
//!
//! Password hashing and login sessions. Implements the `CredentialService` port on
//! top of argon2 and the `auth_sessions` table.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mood_journal_core::domain::AuthSession;
use mood_journal_core::ports::{CredentialService, DatabaseService, PortError, PortResult};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct Argon2CredentialAdapter {
    db: Arc<dyn DatabaseService>,
    session_ttl: Duration,
}

impl Argon2CredentialAdapter {
    pub fn new(db: Arc<dyn DatabaseService>, session_ttl_days: i64) -> Self {
        Self {
            db,
            session_ttl: Duration::days(session_ttl_days),
        }
    }
}

fn verify_password(password: &str, stored_hash: &str) -> PortResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        PortError::Unexpected("Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[async_trait]
impl CredentialService for Argon2CredentialAdapter {
    fn hash_password(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("Failed to hash password".to_string())
            })?
            .to_string();
        Ok(hash)
    }

    async fn verify_credentials(&self, username: &str, password: &str) -> PortResult<AuthSession> {
        // 1. Look up the account; unknown users are indistinguishable from bad passwords.
        let account = match self.db.get_user_by_username(username).await {
            Ok(account) => account,
            Err(PortError::NotFound(_)) => {
                warn!(username, "Login attempt for unknown user");
                return Err(PortError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        // 2. Verify the password
        if !verify_password(password, &account.password_hash)? {
            warn!(username, "Login attempt with wrong password");
            return Err(PortError::Unauthorized);
        }

        // 3. Open a session
        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            username: account.username,
            expires_at: Utc::now() + self.session_ttl,
        };
        self.db
            .create_auth_session(&session.token, &session.username, session.expires_at)
            .await?;
        Ok(session)
    }

    async fn end_session(&self, token: &str) -> PortResult<()> {
        self.db.delete_auth_session(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_against_original_password() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"secret1", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("secret1", "not-a-phc-string"),
            Err(PortError::Unexpected(_))
        ));
    }
}
