pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::Session;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{SessionClaims, TokenAuthority, TokenError, TokenKind};

/// Name of the HTTP-only cookie carrying the refresh credential.
pub const REFRESH_COOKIE: &str = "REFRESH_TOKEN";

lazy_static! {
    // Personal names: letters, with interior spaces, apostrophes, hyphens.
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z][A-Za-z '\-]*$").unwrap();
}

/// Login payload. The field is called `username` because the endpoint speaks
/// the OAuth2 password-grant form shape, but it carries the account email.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Payload for a new account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 50),
        regex(path = "NAME_REGEX", message = "First name contains invalid characters")
    )]
    pub user_fname: String,
    #[validate(
        length(min = 1, max = 50),
        regex(path = "NAME_REGEX", message = "Last name contains invalid characters")
    )]
    pub user_lname: String,
    #[validate(email)]
    pub user_email: String,
    #[validate(length(min = 6))]
    pub user_password: String,
}

/// Payload requesting a password-recovery email.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotRequest {
    #[validate(email)]
    pub user_email: String,
}

/// Payload resetting a password through a recovery link.
#[derive(Debug, Deserialize, Validate)]
pub struct RecoverRequest {
    #[validate(email)]
    pub user_email: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

/// Successful login response: the bearer access credential. The refresh
/// credential travels separately as the `REFRESH_TOKEN` cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub access_type: String,
}
