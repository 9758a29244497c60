//! User service
//!
//! Business logic for registration, login, and token validation:
//! - registration fails if the email (or username) is already in use and
//!   stores a one-way argon2id hash, never the password
//! - login fails with the same authentication error whether the email is
//!   unknown or the password does not match
//! - `validate_token` backs the auth guard: signature, expiry, and user
//!   existence are all checked before a request is considered authenticated

use crate::db::repositories::UserRepository;
use crate::models::{CreateUserInput, User};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::{TokenService, TokenServiceError};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// User service for registration and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl UserService {
    /// Create a new user service
    pub fn new(user_repo: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    /// Register a new user and issue a session token.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username, email, or password is empty
    /// - `UserExists` if the email or username is already taken
    /// - `InternalError` for database or hashing failures
    pub async fn register(
        &self,
        input: CreateUserInput,
    ) -> Result<(User, String), UserServiceError> {
        self.validate_register_input(&input)?;

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        if self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(input.username, input.email, password_hash);
        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        let token = self
            .tokens
            .issue(created.id)
            .context("Failed to issue token")?;

        Ok((created, token))
    }

    /// Log a user in and issue a session token.
    ///
    /// The error for an unknown email is identical to the error for a wrong
    /// password so login cannot be used to probe for registered emails.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, String), UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError("Invalid credentials".to_string())
            })?;

        let matches =
            verify_password(password, &user.password_hash).context("Failed to verify password")?;
        if !matches {
            return Err(UserServiceError::AuthenticationError(
                "Invalid credentials".to_string(),
            ));
        }

        let token = self.tokens.issue(user.id).context("Failed to issue token")?;

        Ok((user, token))
    }

    /// Validate a session token and resolve its user.
    ///
    /// Returns `Ok(None)` for any bad token (malformed, bad signature,
    /// expired, unknown user); `Err` only for internal failures.
    pub async fn validate_token(&self, token: &str) -> Result<Option<User>> {
        let user_id = match self.tokens.verify(token) {
            Ok(user_id) => user_id,
            Err(TokenServiceError::Expired) | Err(TokenServiceError::Invalid) => return Ok(None),
            Err(e) => return Err(e).context("Token verification failed"),
        };

        self.user_repo
            .get_by_id(user_id)
            .await
            .context("Failed to resolve token user")
    }

    fn validate_register_input(&self, input: &CreateUserInput) -> Result<(), UserServiceError> {
        if input.username.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if input.email.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }
        if input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
