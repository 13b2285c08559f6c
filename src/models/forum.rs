use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A discussion thread.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Forum {
    pub forum_uuid: Uuid,
    pub forum_title: String,
    pub forum_category: String,
    pub forum_details: String,
    pub forum_status: String,
    pub created_at: NaiveDate,
}

/// Membership row linking a user to a forum. `user_name` is a display-name
/// snapshot taken when the membership was created.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ForumMember {
    pub forum_member_uuid: Uuid,
    pub user_name: String,
    pub is_owner: bool,
    pub created_at: NaiveDate,
    pub forum_uuid: Uuid,
    pub user_uuid: Uuid,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ForumComment {
    pub forum_comment_uuid: Uuid,
    pub forum_comment: String,
    pub created_at: NaiveDate,
    pub forum_uuid: Uuid,
    pub user_uuid: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ForumInput {
    #[validate(length(min = 1, max = 200))]
    pub forum_title: String,

    #[validate(length(min = 1, max = 50))]
    pub forum_category: String,

    #[validate(length(min = 1, max = 2000))]
    pub forum_details: String,

    #[validate(length(min = 1, max = 20))]
    pub forum_status: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CommentInput {
    pub forum_uuid: Uuid,

    #[validate(length(min = 1, max = 1000))]
    pub forum_comment: String,
}

impl Forum {
    pub fn new(input: ForumInput) -> Self {
        Self {
            forum_uuid: Uuid::new_v4(),
            forum_title: input.forum_title,
            forum_category: input.forum_category,
            forum_details: input.forum_details,
            forum_status: input.forum_status,
            created_at: Utc::now().date_naive(),
        }
    }
}

impl ForumMember {
    pub fn new(forum_uuid: Uuid, user_uuid: Uuid, user_name: impl Into<String>, is_owner: bool) -> Self {
        Self {
            forum_member_uuid: Uuid::new_v4(),
            user_name: user_name.into(),
            is_owner,
            created_at: Utc::now().date_naive(),
            forum_uuid,
            user_uuid,
        }
    }
}

impl ForumComment {
    pub fn new(input: CommentInput, user_uuid: Uuid) -> Self {
        Self {
            forum_comment_uuid: Uuid::new_v4(),
            forum_comment: input.forum_comment,
            created_at: Utc::now().date_naive(),
            forum_uuid: input.forum_uuid,
            user_uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forum_input() -> ForumInput {
        ForumInput {
            forum_title: "Study group for finals".to_string(),
            forum_category: "General".to_string(),
            forum_details: "Looking for people preparing for the June exams.".to_string(),
            forum_status: "open".to_string(),
        }
    }

    #[test]
    fn test_forum_creation() {
        let forum = Forum::new(forum_input());
        assert_eq!(forum.forum_title, "Study group for finals");
        assert_eq!(forum.forum_status, "open");
    }

    #[test]
    fn test_forum_validation() {
        assert!(forum_input().validate().is_ok());

        let mut empty_title = forum_input();
        empty_title.forum_title = "".to_string();
        assert!(empty_title.validate().is_err());

        let mut long_details = forum_input();
        long_details.forum_details = "d".repeat(2001);
        assert!(long_details.validate().is_err());
    }

    #[test]
    fn test_owner_membership() {
        let forum_uuid = Uuid::new_v4();
        let user_uuid = Uuid::new_v4();
        let member = ForumMember::new(forum_uuid, user_uuid, "Ines Laurent", true);
        assert!(member.is_owner);
        assert_eq!(member.forum_uuid, forum_uuid);
        assert_eq!(member.user_uuid, user_uuid);
        assert_eq!(member.user_name, "Ines Laurent");
    }

    #[test]
    fn test_comment_creation_and_validation() {
        let forum_uuid = Uuid::new_v4();
        let author = Uuid::new_v4();
        let input = CommentInput {
            forum_uuid,
            forum_comment: "Count me in.".to_string(),
        };
        assert!(input.validate().is_ok());

        let comment = ForumComment::new(input, author);
        assert_eq!(comment.forum_uuid, forum_uuid);
        assert_eq!(comment.user_uuid, author);

        let empty = CommentInput {
            forum_uuid,
            forum_comment: "".to_string(),
        };
        assert!(empty.validate().is_err());
    }
}
