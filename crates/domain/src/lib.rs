mod notification;
mod reminder;
mod shared;
mod task;
mod user;

pub use notification::{
    DispatchOutcome, InvalidReminderKindError, MessageContext, NotificationLog, ReminderKind,
};
pub use reminder::{
    ReminderDecision, ReminderMetadata, ReminderPolicy, RetireReason, TaskReminder,
    MILLIS_PER_MINUTE,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use task::Task;
pub use user::{NotificationTarget, User};
