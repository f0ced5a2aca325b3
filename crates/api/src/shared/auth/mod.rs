mod route_guards;

pub use route_guards::{
    protect_internal_route, protect_reminder_processing_route, API_KEY_HEADER,
    TASK_REMINDER_SECRET_HEADER,
};
