use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of user activity ("LOGGED IN", "FORUM POSTED", ...).
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct UserLog {
    pub user_log_uuid: Uuid,
    pub user_log_details: String,
    pub created_at: NaiveDate,
    pub user_uuid: Uuid,
}

impl UserLog {
    pub fn new(details: impl Into<String>, user_uuid: Uuid) -> Self {
        Self {
            user_log_uuid: Uuid::new_v4(),
            user_log_details: details.into(),
            created_at: Utc::now().date_naive(),
            user_uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_creation() {
        let user_uuid = Uuid::new_v4();
        let log = UserLog::new("LOGGED IN", user_uuid);
        assert_eq!(log.user_log_details, "LOGGED IN");
        assert_eq!(log.user_uuid, user_uuid);
    }
}
