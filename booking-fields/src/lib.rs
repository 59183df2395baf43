//! Booking form field registry
//!
//! `booking-fields` maps each booking question type to a value-shape check
//! and a rendering factory. Rendering produces a [`Control`] tree: a plain
//! description of labels, inputs and buttons whose interactive nodes report
//! changes back to the host through the setter it passed in.
//!
//! # Architecture
//!
//! - **Closed registry**: [`COMPONENTS`] has exactly one entry per [`FieldType`]
//! - **Host owns state**: controls never store values, they emit the next value
//! - **One-shot normalization**: an unset radioInput is corrected once at render
//! - **YAML on disk**: [`FormContext`] keeps one `.yaml` file per booking form

pub mod components;
pub mod context;
pub mod control;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod render;
pub mod settings;
pub mod types;
pub mod validation;
pub mod value;

pub use components::{Component, Factory, RenderProps, COMPONENTS};
pub use context::{FormContext, FormContextBuilder, FormDefaults};
pub use control::{set_value, Control, ControlKind, InputType, ListValue, SetValue};
pub use defaults::{booking_defaults, booking_form, BOOKING_FORM};
pub use error::{FieldsError, Result};
pub use render::{normalize_value, FieldRenderer, SetFieldValue};
pub use settings::RenderSettings;
pub use types::{
    BookingForm, FieldDef, FieldType, NameVariant, OptionInput, PropsType, SelectOption, Variant,
    VariantField, VariantsConfig,
};
pub use validation::is_valid_value;
pub use value::{preprocess_name_value, ObjectiveValue};
