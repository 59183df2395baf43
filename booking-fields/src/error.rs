//! Error types for the booking field registry

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{FieldType, PropsType};

/// Result type for field registry operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while rendering fields or managing form schemas
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A field type tag that is not part of the closed enumeration
    #[error("unknown field type: {tag}")]
    UnknownFieldType { tag: String },

    /// A props type tag that is not part of the closed enumeration
    #[error("unknown props type: {tag}")]
    UnknownPropsType { tag: String },

    /// The component table has no entry for a field type
    #[error("no component registered for field type '{field_type}'")]
    MissingComponent { field_type: FieldType },

    /// Current value does not have the shape its props type requires
    #[error("value {value} is not valid for type {props_type} for field '{field}'")]
    InvalidValue {
        field: String,
        props_type: PropsType,
        value: String,
    },

    /// Select-like field rendered without options
    #[error("field options are not defined for field '{field}'")]
    MissingOptions { field: String },

    /// Name field rendered without a variants config
    #[error("'variants' is required for 'name' type of field '{field}'")]
    MissingVariants { field: String },

    /// Name field asked for a variant other than fullName / firstAndLastName
    #[error("invalid variant name '{variant}' for 'name' type of field '{field}'")]
    InvalidVariant { field: String, variant: String },

    /// Variant name is valid but the config has no usable entry for it
    #[error("variant '{variant}' is not configured for field '{field}'")]
    VariantNotConfigured { field: String, variant: String },

    /// Name value cannot be shaped into the selected variant
    #[error("invalid value for '{variant}' variant of field '{field}'")]
    InvalidVariantValue { field: String, variant: String },

    /// Interaction on a control that has no change handler
    #[error("control '{control}' is not interactive")]
    NotInteractive { control: String },

    /// Booking form not found in the schema store
    #[error("booking form not found: {name}")]
    FormNotFound { name: String },

    /// Form name is not usable as a file name under `forms/`
    #[error("invalid booking form name: '{name}'")]
    InvalidFormName { name: String },

    /// Two fields of one form share a name
    #[error("duplicate field name '{name}' in form '{form}'")]
    DuplicateFieldName { form: String, name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings could not be extracted
    #[error("failed to load settings from {path:?}: {source}")]
    Settings {
        path: Option<PathBuf>,
        source: Box<figment::Error>,
    },
}

impl FieldsError {
    /// True for errors that indicate a schema or programming defect rather
    /// than an IO failure.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownFieldType { .. }
                | Self::UnknownPropsType { .. }
                | Self::MissingComponent { .. }
                | Self::InvalidValue { .. }
                | Self::MissingOptions { .. }
                | Self::MissingVariants { .. }
                | Self::InvalidVariant { .. }
                | Self::VariantNotConfigured { .. }
                | Self::InvalidVariantValue { .. }
                | Self::InvalidFormName { .. }
                | Self::DuplicateFieldName { .. }
        )
    }
}
