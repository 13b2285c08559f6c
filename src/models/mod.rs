pub mod forum;
pub mod log;
pub mod sprite;
pub mod task;
pub mod user;

pub use forum::{CommentInput, Forum, ForumComment, ForumInput, ForumMember};
pub use log::UserLog;
pub use sprite::{OwnedSprite, Sprite, SpriteInstance};
pub use task::{Task, TaskInput, TaskPriority, TaskUpdate};
pub use user::{AvatarChange, PasswordChange, PointsRow, PushToggle, User, DEFAULT_AVATAR};
