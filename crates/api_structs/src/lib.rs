mod status;
mod task;

pub mod dtos {
    pub use crate::task::dtos::*;
}

pub use crate::status::api::*;
pub use crate::task::api::*;
