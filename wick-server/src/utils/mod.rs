//! Utility modules

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, AppResponse, ok_with_message};
pub use result::AppResult;
