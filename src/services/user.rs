//! User service implementation
//!
//! This service handles signup, login and profile management. Credentials
//! and tokens go through [`AuthService`].

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::repositories::UserRepository;
use crate::models::user::{AuthResponse, LoginRequest, SignupRequest, UpdateProfileRequest, User};
use crate::services::auth::AuthService;
use crate::utils::errors::{Entity, MadSocialError, Result};
use crate::utils::logging::log_user_action;

const EMAIL_IN_USE: &str = "Email already in use";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// User service for managing accounts
#[derive(Debug, Clone)]
pub struct UserService {
    user_repository: UserRepository,
    auth: AuthService,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository, auth: AuthService) -> Self {
        Self {
            user_repository,
            auth,
        }
    }

    /// Register a new account and issue its first token
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse> {
        debug!(email = %request.email, "Attempting signup");
        request.validate()?;

        if self.user_repository.email_exists(&request.email).await? {
            warn!(email = %request.email, "Signup rejected, email already registered");
            return Err(MadSocialError::Conflict(EMAIL_IN_USE.to_string()));
        }

        let password_hash = self.auth.hash_password(&request.password)?;
        let user = match self.user_repository.create(request.into_create_request(password_hash)).await {
            Ok(user) => user,
            // Lost a race with a concurrent signup for the same email
            Err(MadSocialError::Database(e)) => return Err(MadSocialError::from_transaction(e, EMAIL_IN_USE)),
            Err(e) => return Err(e),
        };

        let token = self.auth.issue_token(user.id, &user.email)?;
        log_user_action(user.id, "signup", None);
        info!(user_id = %user.id, "New user registered successfully");

        Ok(AuthResponse { user, token })
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        debug!(email = %request.email, "Attempting login");
        request.validate()?;

        let user = match self.user_repository.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                warn!(email = %request.email, "Login for unknown email");
                return Err(MadSocialError::Authentication(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !self.auth.verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(MadSocialError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.auth.issue_token(user.id, &user.email)?;
        log_user_action(user.id, "login", None);

        Ok(AuthResponse { user, token })
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        debug!(user_id = %user_id, "Getting user by ID");
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| MadSocialError::not_found(Entity::User, user_id))
    }

    /// Update the caller's own profile
    pub async fn update_profile(&self, user_id: Uuid, request: UpdateProfileRequest) -> Result<User> {
        debug!(user_id = %user_id, "Updating user profile");
        request.validate()?;

        let user = self.user_repository.update_profile(user_id, request).await?;
        log_user_action(user_id, "update_profile", None);
        info!(user_id = %user_id, "User profile updated successfully");

        Ok(user)
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}
