//! Account management and credential verification.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Duration;

use super::errors::{AuthError, AuthResult};
use super::models::{LoginRequest, LoginResponse, Principal, RegisterRequest, Role, User};
use super::tokens::TokenCodec;
use crate::db::repository::{StoreError, UserStore};

/// Authentication manager.
///
/// Owns account creation, password verification, and the stateless token
/// codec. Everything identity-related that the workflows need goes through
/// the [`UserStore`] abstraction.
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserStore>,
    pepper: String,
    tokens: TokenCodec,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `users` - Identity store
    /// * `pepper` - Server-side pepper for password hashing
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(users: Arc<dyn UserStore>, pepper: String, jwt_secret: String) -> Self {
        Self {
            users,
            pepper,
            tokens: TokenCodec::new(jwt_secret, Duration::hours(1)),
        }
    }

    /// Self-service signup. New accounts always get the Player role;
    /// referees and organizers are created by an organizer via
    /// [`AuthManager::create_user`].
    ///
    /// # Errors
    ///
    /// * `AuthError::UsernameTaken` - Username already exists
    /// * `AuthError::InvalidUsername` - Username format invalid
    /// * `AuthError::WeakPassword` - Password too weak
    pub async fn register_user(&self, request: RegisterRequest) -> AuthResult<User> {
        self.create_user(request, Role::Player).await
    }

    /// Create an account with an explicit role.
    pub async fn create_user(&self, request: RegisterRequest, role: Role) -> AuthResult<User> {
        self.validate_username(&request.username)?;
        self.validate_password(&request.password)?;

        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash_password(&request.password)?;

        // The unique index on username is the authoritative guard; the check
        // above only exists for the friendlier error.
        match self
            .users
            .create(&request.username, &password_hash, &request.name, role)
            .await
        {
            Ok(user) => Ok(user),
            Err(StoreError::Duplicate) => Err(AuthError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - User doesn't exist
    /// * `AuthError::InvalidPassword` - Incorrect password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let (user, password_hash) = self
            .users
            .find_with_password(&request.username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.verify_password(&request.password, &password_hash)?;

        let token = self.tokens.issue(&user.username, user.role)?;

        Ok(LoginResponse {
            token,
            role: user.role,
            username: user.username,
        })
    }

    /// Decode a bearer credential into the acting principal, if valid.
    pub fn verify_token(&self, token: &str) -> Option<Principal> {
        self.tokens.verify(token)
    }

    /// Look up a user by username.
    pub async fn user_by_username(&self, username: &str) -> AuthResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// All users holding a role.
    pub async fn users_by_role(&self, role: Role) -> AuthResult<Vec<User>> {
        Ok(self.users.list_by_role(role).await?)
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidPassword)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidPassword)
    }

    /// Validate username format
    fn validate_username(&self, username: &str) -> AuthResult<()> {
        let len = username.len();
        if !(3..=20).contains(&len) {
            return Err(AuthError::InvalidUsername(
                "Username must be 3-20 characters".to_string(),
            ));
        }

        if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(AuthError::InvalidUsername(
                "Username can only contain letters, numbers, and underscores".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate password strength
    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());

        if !has_digit || !has_uppercase || !has_lowercase {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one number, one uppercase and one lowercase letter"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::mock::MockUserStore;

    fn manager() -> AuthManager {
        AuthManager::new(
            Arc::new(MockUserStore::new()),
            "test_pepper".to_string(),
            "test_jwt_secret_0123456789abcdef".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = manager();

        let user = auth
            .register_user(RegisterRequest {
                username: "alice".to_string(),
                password: "Passw0rd".to_string(),
                name: "Alice".to_string(),
            })
            .await
            .expect("registration should succeed");

        assert_eq!(user.role, Role::Player);

        let response = auth
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "Passw0rd".to_string(),
            })
            .await
            .expect("login should succeed");

        assert_eq!(response.username, "alice");
        assert_eq!(response.role, Role::Player);

        let principal = auth
            .verify_token(&response.token)
            .expect("issued token should verify");
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.role, Role::Player);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let auth = manager();
        let request = RegisterRequest {
            username: "alice".to_string(),
            password: "Passw0rd".to_string(),
            name: "Alice".to_string(),
        };

        auth.register_user(request.clone()).await.unwrap();
        let result = auth.register_user(request).await;
        assert!(matches!(result, Err(AuthError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let auth = manager();
        let result = auth
            .register_user(RegisterRequest {
                username: "alice".to_string(),
                password: "short".to_string(),
                name: "Alice".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));

        let result = auth
            .register_user(RegisterRequest {
                username: "alice".to_string(),
                password: "alllowercase1".to_string(),
                name: "Alice".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_usernames() {
        let auth = manager();
        for username in ["ab", "has spaces", "way_too_long_username_xxxx"] {
            let result = auth
                .register_user(RegisterRequest {
                    username: username.to_string(),
                    password: "Passw0rd".to_string(),
                    name: "X".to_string(),
                })
                .await;
            assert!(
                matches!(result, Err(AuthError::InvalidUsername(_))),
                "{username:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_login_failures() {
        let auth = manager();
        auth.register_user(RegisterRequest {
            username: "alice".to_string(),
            password: "Passw0rd".to_string(),
            name: "Alice".to_string(),
        })
        .await
        .unwrap();

        let result = auth
            .login(LoginRequest {
                username: "nobody".to_string(),
                password: "Passw0rd".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));

        let result = auth
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "WrongPass1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidPassword)));
    }

    #[tokio::test]
    async fn test_create_user_with_role_and_listing() {
        let auth = manager();
        auth.create_user(
            RegisterRequest {
                username: "umpire".to_string(),
                password: "Passw0rd".to_string(),
                name: "The Umpire".to_string(),
            },
            Role::Referee,
        )
        .await
        .unwrap();

        let referees = auth.users_by_role(Role::Referee).await.unwrap();
        assert_eq!(referees.len(), 1);
        assert_eq!(referees[0].username, "umpire");
        assert!(auth.users_by_role(Role::Organizer).await.unwrap().is_empty());
    }
}
