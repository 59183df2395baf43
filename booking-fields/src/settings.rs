//! Render settings loaded with Figment.
//!
//! Sources in precedence order (later overrides earlier):
//! 1. Built-in defaults
//! 2. An optional settings file, format picked by extension (toml, yaml/yml, json)
//! 3. Environment variables prefixed `BOOKING_FIELDS_`

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldsError, Result};

/// Environment variable prefix for settings overrides.
pub const ENV_PREFIX: &str = "BOOKING_FIELDS_";

/// Presentation knobs the factories read while rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Visible rows of a textarea field.
    pub textarea_rows: u32,
    /// Text of the button appending another guest email.
    pub add_another_label: String,
    /// Tooltip of the button removing a guest email.
    pub remove_email_tooltip: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            textarea_rows: 3,
            add_another_label: "Add another".to_string(),
            remove_email_tooltip: "Remove email".to_string(),
        }
    }
}

impl RenderSettings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = Self::figment(path)
            .extract::<RenderSettings>()
            .map_err(|e| FieldsError::Settings {
                path: path.map(Path::to_path_buf),
                source: Box::new(e),
            })?;
        debug!(?path, ?settings, "render settings loaded");
        Ok(settings)
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RenderSettings::default()));

        if let Some(path) = path {
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}
