//! Construction-time validation of the summary catalogue.
pub mod error;
pub mod validator;

pub use error::{ValidationError, ValidationErrorType};
pub use validator::SignalValidator;
