/// Auth service - exchanges credentials for access tokens
use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::models::User;
use chrono::Duration;
use crypto_core::{hash_password, jwt, verify_password};

const MAX_USERNAME_LENGTH: usize = 150;
const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";

pub struct AuthService {
    store: SharedStore,
}

impl AuthService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Issue an access token for valid credentials.
    ///
    /// Unknown users and wrong passwords produce the same `ValidationError`.
    pub async fn obtain_token(&self, username: &str, password: &str, ttl: Duration) -> Result<String> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::ValidationError(BAD_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(username = %username, "token request with wrong password");
            return Err(AppError::ValidationError(BAD_CREDENTIALS.to_string()));
        }

        jwt::generate_access_token(user.id, &user.username, ttl)
            .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))
    }

    /// Register an account with an Argon2id-hashed password
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        if !is_valid_username(username) {
            return Err(AppError::ValidationError(format!(
                "username must be 1-{MAX_USERNAME_LENGTH} characters: letters, digits and @/./+/-/_"
            )));
        }

        let password_hash = hash_password(password)?;
        let user = self.store.create_user(username, &password_hash).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= MAX_USERNAME_LENGTH
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crypto_core::jwt::test_support::init_test_keys;
    use std::sync::Arc;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("leo.tolstoy+blog@example"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("with space"));
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        init_test_keys();
        let service = AuthService::new(Arc::new(InMemoryStore::new()));
        let user = service.create_user("leo", "war-and-peace").await.unwrap();

        let token = service
            .obtain_token("leo", "war-and-peace", Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(jwt::get_user_id_from_token(&token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_validation_errors() {
        init_test_keys();
        let service = AuthService::new(Arc::new(InMemoryStore::new()));
        service.create_user("leo", "war-and-peace").await.unwrap();

        let wrong_password = service
            .obtain_token("leo", "anna-karenina", Duration::hours(1))
            .await;
        let unknown_user = service
            .obtain_token("fyodor", "war-and-peace", Duration::hours(1))
            .await;

        assert!(matches!(wrong_password, Err(AppError::ValidationError(_))));
        assert!(matches!(unknown_user, Err(AppError::ValidationError(_))));
    }
}
