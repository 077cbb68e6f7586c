//! Authentication service.
//!
//! Provides password registration and login plus profile management.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use trove_core::{Email, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{Profile, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
///
/// Handles user registration, login, and profile updates.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::InvalidEmail` if
    /// the identity fields don't validate.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username or email is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        // Friendly pre-check; the unique constraints still catch races below
        if self.users.exists(&username, &email).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// A missing account and a wrong password both return
    /// `AuthError::InvalidCredentials` so the login form cannot be used to
    /// probe which emails are registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Replace a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        profile: &Profile,
    ) -> Result<(), AuthError> {
        self.users
            .update_profile(user_id, profile)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Public so the CLI seed command can hash demo account passwords.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_register_and_login() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);

        let user = service
            .register("magpie", "magpie@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.username.as_str(), "magpie");

        let logged_in = service
            .login("magpie@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);
        service
            .register("magpie", "magpie@example.com", "hunter22")
            .await
            .unwrap();

        let result = service.login("magpie@example.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_indistinguishable() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);

        let result = service.login("nobody@example.com", "hunter22").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // Malformed email gets the same answer
        let result = service.login("not-an-email", "hunter22").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);
        service
            .register("magpie", "magpie@example.com", "hunter22")
            .await
            .unwrap();

        let same_email = service
            .register("other", "magpie@example.com", "hunter22")
            .await;
        assert!(matches!(same_email, Err(AuthError::UserAlreadyExists)));

        let same_username = service
            .register("magpie", "other@example.com", "hunter22")
            .await;
        assert!(matches!(same_username, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);

        let result = service
            .register("magpie", "magpie@example.com", "tiny")
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);

        let result = service
            .register("bad name!", "magpie@example.com", "hunter22")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidUsername(_))));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let pool = test_pool().await;
        let service = AuthService::new(&pool);
        let user = service
            .register("magpie", "magpie@example.com", "hunter22")
            .await
            .unwrap();

        let profile = Profile {
            first_name: Some("Ada".to_string()),
            ..Profile::default()
        };
        service.update_profile(user.id, &profile).await.unwrap();

        let fetched = service.get_user(user.id).await.unwrap();
        assert_eq!(fetched.profile.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
    }
}
