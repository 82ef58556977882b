//! Converting failed requests into fallback values.
//!
//! Most bookshop operations never hand an error to the caller. A failure is
//! logged and replaced by an empty book list or `None`. The conversion goes
//! through `recover` so that the swallowing is visible at every call site.

use serde_json::Value;

use crate::error::Result;

/// Fallback for operations that return a list of books.
pub fn no_books() -> Value {
    Value::Array(Vec::new())
}

/// Return the success value, or log the error and return `fallback`.
pub fn recover<T>(result: Result<T>, fallback: T, operation: &'static str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(operation, error = %err, "request failed, returning fallback");
            fallback
        }
    }
}
