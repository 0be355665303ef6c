//! Result extension trait for logging errors with context.
//!
//! Handlers never return storage or encoding errors to clients. They log the
//! cause with [`ResultExt::log`] and answer with a fixed public message via
//! [`ResultExt::or_fail`].

use std::fmt::Display;
use tracing::error;

use crate::error::AppError;

/// Extension trait for logging errors with context.
pub trait ResultExt<T, E> {
    /// Log the error with context if this is an `Err` variant.
    ///
    /// The original `Result` is returned unchanged.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use teamdesk_server::result_ext::ResultExt;
    ///
    /// let result: Result<i32, &str> = Err("something went wrong");
    /// let _ = result.log("processing request");
    /// ```
    fn log<S: ToString>(self, context: S) -> Result<T, E>;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let caller_location = std::panic::Location::caller();
            error!(
                target: "teamdesk_server",
                error = %e,
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Operation failed"
            );
        }
        self
    }
}

/// Replace server-side failures with a public message.
pub trait FailExt<T> {
    /// Client errors (4xx) pass through untouched. Anything that would be a
    /// 500 is logged and replaced by `AppError::Failed(message)`.
    fn or_fail(self, message: &str) -> Result<T, AppError>;
}

impl<T> FailExt<T> for Result<T, AppError> {
    #[track_caller]
    fn or_fail(self, message: &str) -> Result<T, AppError> {
        match self {
            Ok(v) => Ok(v),
            Err(e) if e.status().is_client_error() => Err(e),
            Err(e) => {
                let caller_location = std::panic::Location::caller();
                error!(
                    target: "teamdesk_server",
                    error = %e,
                    file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                    context = %message,
                    "Operation failed"
                );
                Err(AppError::Failed(message.to_string()))
            }
        }
    }
}
