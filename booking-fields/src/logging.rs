//! Logging helpers for field values and schemas.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for printing values in tracing statements as compact YAML.
///
/// ```ignore
/// use booking_fields::logging::Pretty;
/// use tracing::trace;
///
/// trace!(value = %Pretty(&value), "field value changed");
/// ```
///
/// Debug is used as a fallback if YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "{}", yaml.trim_end()),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
