//! # Auth Service
//!
//! Credential checks and the session token lifecycle: issue, store, resolve,
//! validate, revoke.
//!
//! ## Login Flow
//!
//! ```text
//! login(username, password)
//!   → authenticate_user   (lookup by username + Argon2 verify)
//!   → generate_token      (HS256, Config::token_ttl)
//!   → store_token         (user_tokens row)
//! ```
//!
//! The first failing step aborts and surfaces its error.
//!
//! ## Error Handling
//!
//! All methods return `Result<T, AppError>`:
//! - `AppError::NotFound` - no such user
//! - `AppError::Unauthorized` - wrong password, unknown/revoked/expired token
//! - `AppError::Store` - database failure

use chrono::{DateTime, Utc};
use lib_auth::{check_password_hash, generate_token, hash_password, MIN_PASSWORD_LEN};
use lib_core::{
    dto::{LoginResponse, RegisterRequest, UserInfo},
    model::store::{models::User, TokenRepository, UserRepository},
    AppError, Config, DbPool, Result,
};
use lib_utils::{validate_email, validate_length_range, validate_min_length};
use tracing::{debug, info, instrument, warn};

/// Service for authentication operations.
#[derive(Clone)]
pub struct AuthService {
    db: DbPool,
    config: Config,
}

impl AuthService {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self { db, config }
    }

    /// Look the user up by username and verify the password against the stored hash.
    #[instrument(skip(self, password))]
    pub async fn authenticate_user(&self, username: &str, password: &str) -> Result<User> {
        let user = UserRepository::find_by_username(&self.db, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", username)))?;

        if !check_password_hash(password, &user.password_hash) {
            warn!("[LOGIN] Invalid password for user: {}", user.username);
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }

        Ok(user)
    }

    /// Authenticate, sign a token for the configured TTL, and record it.
    ///
    /// An unknown username is reported as bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        info!("[LOGIN] Login attempt for {}", username);

        let user = match self.authenticate_user(username, password).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                warn!("[LOGIN] User not found: {}", username);
                return Err(AppError::Unauthorized("invalid credentials".to_string()));
            }
            Err(e) => return Err(e),
        };

        let signed = generate_token(&user.username, &self.config.jwt_secret, self.config.token_ttl())
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.store_token(user.id, &signed.token, signed.expires_at).await?;

        info!("[LOGIN] User authenticated: {} (id: {})", user.username, user.id);

        Ok(LoginResponse {
            token: signed.token,
            expires_at: signed.expires_at,
            user: UserInfo::from(&user),
        })
    }

    #[instrument(skip(self, token))]
    pub async fn store_token(&self, user_id: i64, token: &str, expires_at: DateTime<Utc>) -> Result<()> {
        TokenRepository::store(&self.db, user_id, token, expires_at).await?;
        debug!("[AUTH] Stored token for user {}", user_id);
        Ok(())
    }

    /// Resolve a valid (unrevoked, unexpired) token to its owner.
    #[instrument(skip(self, token))]
    pub async fn get_user_by_token(&self, token: &str) -> Result<User> {
        let user_id = TokenRepository::find_valid_user_id(&self.db, token, Utc::now())
            .await?
            .ok_or_else(|| AppError::Unauthorized("token is invalid, revoked or expired".to_string()))?;

        match UserRepository::get_by_id(&self.db, user_id).await {
            Ok(user) => Ok(user),
            Err(sqlx::Error::RowNotFound) => Err(AppError::NotFound(format!("user {} not found", user_id))),
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotent; unknown tokens succeed.
    #[instrument(skip(self, token))]
    pub async fn revoke_token(&self, token: &str) -> Result<()> {
        TokenRepository::revoke(&self.db, token).await?;
        info!("[AUTH] Token revoked");
        Ok(())
    }

    #[instrument(skip(self, token))]
    pub async fn validate_token(&self, token: &str) -> Result<bool> {
        Ok(TokenRepository::is_valid(&self.db, token).await?)
    }

    /// Validate input, hash the password, and insert the user.
    ///
    /// Surrounding whitespace is stripped from the username before it is
    /// checked and stored.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<User> {
        let username = req.username.trim();
        validate_length_range(username, 3, 50, "Username").map_err(AppError::InvalidInput)?;
        validate_email(&req.email).map_err(AppError::InvalidInput)?;
        validate_min_length(&req.password, MIN_PASSWORD_LEN, "Password").map_err(AppError::InvalidInput)?;

        if UserRepository::find_by_username(&self.db, username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if UserRepository::find_by_email(&self.db, &req.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;

        // The unique constraints still catch a concurrent duplicate.
        let user = UserRepository::create(&self.db, username, &req.email, &password_hash).await?;

        info!("[AUTH] Registered user {} (id: {})", user.username, user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup_test_db, test_config};
    use chrono::Duration;

    async fn service_with_user() -> AuthService {
        let pool = setup_test_db().await;
        let hash = hash_password("correct horse").unwrap();
        UserRepository::create(&pool, "alice", "alice@example.com", &hash)
            .await
            .unwrap();
        AuthService::new(pool, test_config())
    }

    #[tokio::test]
    async fn test_authenticate_user_success() {
        let auth = service_with_user().await;
        let user = auth.authenticate_user("alice", "correct horse").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_user_wrong_password_fails() {
        let auth = service_with_user().await;
        let err = auth.authenticate_user("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user_not_found() {
        let auth = service_with_user().await;
        let err = auth.authenticate_user("bob", "whatever").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_login_issues_stored_token() {
        let auth = service_with_user().await;

        let res = auth.login("alice", "correct horse").await.unwrap();

        assert!(!res.token.is_empty());
        assert!(res.expires_at > Utc::now());
        assert!(auth.validate_token(&res.token).await.unwrap());
        assert_eq!(auth.get_user_by_token(&res.token).await.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_two_logins_get_distinct_tokens() {
        let auth = service_with_user().await;

        let a = auth.login("alice", "correct horse").await.unwrap();
        let b = auth.login("alice", "correct horse").await.unwrap();

        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_unauthorized() {
        let auth = service_with_user().await;
        let err = auth.login("bob", "correct horse").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_revoke_token_invalidates() {
        let auth = service_with_user().await;
        let res = auth.login("alice", "correct horse").await.unwrap();

        auth.revoke_token(&res.token).await.unwrap();
        // Idempotent
        auth.revoke_token(&res.token).await.unwrap();

        assert!(!auth.validate_token(&res.token).await.unwrap());
        assert!(matches!(
            auth.get_user_by_token(&res.token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_invalid() {
        let auth = service_with_user().await;
        let user = auth.authenticate_user("alice", "correct horse").await.unwrap();

        auth.store_token(user.id, "stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(!auth.validate_token("stale").await.unwrap());
        assert!(auth.get_user_by_token("stale").await.is_err());
    }

    #[tokio::test]
    async fn test_register_validates_and_rejects_duplicates() {
        let auth = service_with_user().await;

        let short = RegisterRequest {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(matches!(auth.register(&short).await, Err(AppError::InvalidInput(_))));

        let dup = RegisterRequest {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(matches!(auth.register(&dup).await, Err(AppError::Conflict(_))));

        let ok = RegisterRequest {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "long enough".to_string(),
        };
        let user = auth.register(&ok).await.unwrap();
        assert!(check_password_hash("long enough", &user.password_hash));
    }

    #[tokio::test]
    async fn test_register_trims_username() {
        let auth = service_with_user().await;

        let padded_short = RegisterRequest {
            username: "  al".to_string(),
            email: "al@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(matches!(auth.register(&padded_short).await, Err(AppError::InvalidInput(_))));

        let padded = RegisterRequest {
            username: "  dave ".to_string(),
            email: "dave@example.com".to_string(),
            password: "long enough".to_string(),
        };
        let user = auth.register(&padded).await.unwrap();
        assert_eq!(user.username, "dave");
        assert!(auth.login("dave", "long enough").await.is_ok());

        let padded_dup = RegisterRequest {
            username: " alice".to_string(),
            email: "alice2@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(matches!(auth.register(&padded_dup).await, Err(AppError::Conflict(_))));
    }
}
