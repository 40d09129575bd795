//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod event;
pub mod function;
pub mod record;

pub use user::User;
pub use message::{FunctionCall, Message, Role};
pub use command::{Command, CommandRegistry};
pub use event::{ChatKind, FriendRequest, InboundEvent, InboundMessage};
pub use function::{FunctionDescriptor, ParameterSchema, Property};
pub use record::ConversationRecord;
