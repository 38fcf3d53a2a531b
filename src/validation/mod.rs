//! Construction-time validation of the declared unit order.
pub mod error;
pub mod validator;

pub use error::ScheduleError;
pub use validator::ScheduleValidator;
