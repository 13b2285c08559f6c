use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a study task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Normal,
    Low,
}

impl TaskPriority {
    /// Points awarded when a task of this tier is completed. A total
    /// mapping: adding a tier forces an entry here.
    pub const fn point_reward(self) -> i32 {
        match self {
            TaskPriority::High => 30,
            TaskPriority::Normal => 20,
            TaskPriority::Low => 10,
        }
    }
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// What needs doing.
    #[validate(length(min = 1, max = 500))]
    pub task_details: String,

    pub task_priority: TaskPriority,

    #[validate(length(min = 1, max = 50))]
    pub task_category: String,

    /// Day the task is due.
    pub task_deadline: NaiveDate,

    /// Time of day the task is due.
    pub task_time: NaiveTime,
}

/// Input structure for updating an existing task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    pub task_uuid: Uuid,

    #[validate(length(min = 1, max = 500))]
    pub task_details: String,

    pub task_priority: TaskPriority,

    #[validate(length(min = 1, max = 50))]
    pub task_category: String,

    pub task_deadline: NaiveDate,

    pub task_time: NaiveTime,
}

/// A study task as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub task_uuid: Uuid,
    pub task_details: String,
    pub task_priority: TaskPriority,
    pub task_category: String,
    pub task_deadline: NaiveDate,
    pub task_time: NaiveTime,
    pub is_done: bool,
    /// Owning user.
    pub user_uuid: Uuid,
}

impl Task {
    /// Creates a new `Task` from input and the owner's uuid, with a fresh
    /// primary key and the done flag cleared.
    pub fn new(input: TaskInput, user_uuid: Uuid) -> Self {
        Self {
            task_uuid: Uuid::new_v4(),
            task_details: input.task_details,
            task_priority: input.task_priority,
            task_category: input.task_category,
            task_deadline: input.task_deadline,
            task_time: input.task_time,
            is_done: false,
            user_uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn input() -> TaskInput {
        TaskInput {
            task_details: "Review chapter 4".to_string(),
            task_priority: TaskPriority::High,
            task_category: "Biology".to_string(),
            task_deadline: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            task_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(input(), owner);
        assert_eq!(task.task_details, "Review chapter 4");
        assert_eq!(task.user_uuid, owner);
        assert!(!task.is_done);
    }

    #[test]
    fn test_task_validation() {
        assert!(input().validate().is_ok());

        let mut empty_details = input();
        empty_details.task_details = "".to_string();
        assert!(empty_details.validate().is_err());

        let mut long_details = input();
        long_details.task_details = "a".repeat(501);
        assert!(long_details.validate().is_err());

        let mut empty_category = input();
        empty_category.task_category = "".to_string();
        assert!(empty_category.validate().is_err());
    }

    #[test]
    fn test_point_rewards_by_tier() {
        assert_eq!(TaskPriority::High.point_reward(), 30);
        assert_eq!(TaskPriority::Normal.point_reward(), 20);
        assert_eq!(TaskPriority::Low.point_reward(), 10);

        // Higher tiers always pay more.
        assert!(TaskPriority::High.point_reward() > TaskPriority::Normal.point_reward());
        assert!(TaskPriority::Normal.point_reward() > TaskPriority::Low.point_reward());
    }

    #[test]
    fn test_priority_serde_names() {
        assert_eq!(
            serde_json::to_string(&TaskPriority::High).unwrap(),
            "\"high\""
        );
        let parsed: TaskPriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, TaskPriority::Low);
    }
}
