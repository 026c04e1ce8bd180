//! Authentication service.
//!
//! Email + password accounts with Argon2id hashes. The username doubles as
//! the public storefront handle (`/s/{username}`), so it is restricted to a
//! URL-safe alphabet and stored lowercased.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use briklyst_core::Email;

use crate::db::{NewUser, RepositoryError, UserStore};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length, to bound hashing cost.
const MAX_PASSWORD_LENGTH: usize = 128;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 30;

/// Path segments the router owns.
const RESERVED_USERNAMES: &[&str] = &["api", "admin", "dashboard", "go", "health", "s", "static"];

/// Registration form.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Authentication service.
pub struct AuthService<U> {
    users: U,
}

impl<U: UserStore> AuthService<U> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: U) -> Self {
        Self { users }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidUsername` if the handle is not allowed.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email or username is taken.
    #[tracing::instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;
        let username = normalize_username(&registration.username)?;
        validate_password(&registration.password)?;

        let password_hash = hash_password(&registration.password)?;
        let name = registration
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let user = self
            .users
            .create(&NewUser {
                email,
                username,
                name,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .find_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Lowercase and check a storefront handle.
fn normalize_username(raw: &str) -> Result<String, AuthError> {
    let username = raw.trim().to_ascii_lowercase();
    let len = username.len();
    let valid = (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && username
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
        && !RESERVED_USERNAMES.contains(&username.as_str());
    if valid {
        Ok(username)
    } else {
        Err(AuthError::InvalidUsername)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
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
    use crate::db::memory::MemoryStore;

    fn registration(email: &str, username: &str, password: &str) -> Registration {
        Registration {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            name: None,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username(" Noir_Picks ").unwrap(), "noir_picks");
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("-lead").is_err());
        assert!(normalize_username("has space").is_err());
        assert!(normalize_username("api").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = AuthService::new(MemoryStore::new());
        let user = service
            .register(registration("Owner@Example.com", "Noir", "hunter2hunter2"))
            .await
            .unwrap();
        assert_eq!(user.username, "noir");
        assert_eq!(user.email.as_str(), "owner@example.com");

        let logged_in = service
            .login("owner@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            service.login("owner@example.com", "nope-nope").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = AuthService::new(MemoryStore::new());
        service
            .register(registration("a@example.com", "noir", "hunter2hunter2"))
            .await
            .unwrap();
        let err = service
            .register(registration("b@example.com", "noir", "hunter2hunter2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = AuthService::new(MemoryStore::new());
        assert!(matches!(
            service.login("ghost@example.com", "whatever1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
