use chrono::NaiveDate;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Avatar assigned at registration; users change it later through the
/// avatar endpoint.
pub const DEFAULT_AVATAR: &str = "default.png";

lazy_static! {
    // Avatar asset names: path-safe characters only, no leading separator.
    static ref AVATAR_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/\-]*$").unwrap();
}

/// An account row. The password digest never leaves the server: it is
/// skipped on serialization.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_uuid: Uuid,
    pub user_fname: String,
    pub user_lname: String,
    pub user_email: String,
    #[serde(skip_serializing)]
    pub user_password: String,
    pub is_premium: bool,
    pub is_confirmed: bool,
    pub user_points: i32,
    pub push_notif: bool,
    pub user_avatar: String,
    pub created_at: NaiveDate,
    pub last_login: NaiveDate,
}

impl User {
    /// Display name embedded in session claims and forum memberships.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user_fname, self.user_lname)
    }
}

/// One leaderboard row: who, how many points, and the avatar to draw.
#[derive(Debug, Serialize, FromRow)]
pub struct PointsRow {
    pub user_fname: String,
    pub user_lname: String,
    pub user_points: i32,
    pub user_avatar: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordChange {
    #[validate(length(min = 6))]
    pub old_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PushToggle {
    pub push_notif: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AvatarChange {
    #[validate(
        length(min = 1, max = 120),
        regex(path = "AVATAR_REGEX", message = "Avatar name contains invalid characters")
    )]
    pub user_avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use validator::Validate;

    fn user() -> User {
        User {
            user_uuid: Uuid::new_v4(),
            user_fname: "Noor".to_string(),
            user_lname: "Haddad".to_string(),
            user_email: "noor@example.com".to_string(),
            user_password: "$2b$12$digest".to_string(),
            is_premium: false,
            is_confirmed: true,
            user_points: 120,
            push_notif: true,
            user_avatar: "cat.png".to_string(),
            created_at: Utc::now().date_naive(),
            last_login: Utc::now().date_naive(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(user().full_name(), "Noor Haddad");
    }

    #[test]
    fn test_password_digest_is_never_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("user_password").is_none());
        assert_eq!(json["user_email"], "noor@example.com");
    }

    #[test]
    fn test_avatar_validation() {
        assert!(AvatarChange {
            user_avatar: "sprites/fox_01.png".to_string()
        }
        .validate()
        .is_ok());

        assert!(AvatarChange {
            user_avatar: "../../../etc/passwd".to_string()
        }
        .validate()
        .is_err());

        assert!(AvatarChange {
            user_avatar: "".to_string()
        }
        .validate()
        .is_err());
    }
}
