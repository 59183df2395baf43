//! Host-facing rendering entry points.
//!
//! [`FieldRenderer::render`] is what a form host calls for each field: it
//! checks the snapshot against the field's props type, applies the one-shot
//! normalization (reporting the corrected value through the setter) and then
//! dispatches to the field type's factory.

use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::components::{Component, RenderProps};
use crate::control::{Control, SetValue};
use crate::error::{FieldsError, Result};
use crate::logging::Pretty;
use crate::settings::RenderSettings;
use crate::types::{BookingForm, FieldDef, FieldType, PropsType};
use crate::value::ObjectiveValue;

/// Host callback receiving `(field name, next value)` for a whole form.
pub type SetFieldValue<'a> = Rc<dyn Fn(&str, Value) + 'a>;

/// Correct a value before first render.
///
/// Only an unset radioInput is corrected: it starts on its first option with
/// an empty dependent input. Returns `None` when the value is fine as is.
pub fn normalize_value(field: &FieldDef, value: &Value) -> Option<Value> {
    match field.type_ {
        FieldType::RadioInput if value.is_null() => field
            .options()
            .first()
            .map(|first| ObjectiveValue::new(first.value.clone(), "").to_value()),
        _ => None,
    }
}

/// Renders fields through the component table.
#[derive(Debug, Clone, Default)]
pub struct FieldRenderer {
    settings: RenderSettings,
}

impl FieldRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render one field bound to a value snapshot and setter.
    ///
    /// Fails when the value does not fit the field's props type, when a
    /// selection field has no options, or when the factory rejects the
    /// field's configuration. If the value needs normalizing, the setter is
    /// called once with the corrected value before the control is returned
    /// and the control shows the corrected value. Nothing is emitted when
    /// the render fails.
    pub fn render<'a>(
        &self,
        field: &FieldDef,
        value: &Value,
        read_only: bool,
        set_value: SetValue<'a>,
    ) -> Result<Control<'a>> {
        let component = Component::for_type(field.type_)?;
        if !value.is_null() && !component.is_valid_value(value) {
            return Err(FieldsError::InvalidValue {
                field: field.name.clone(),
                props_type: component.props_type,
                value: value.to_string(),
            });
        }
        self.dispatch(component, field, value, read_only, set_value)
    }

    /// Render the dependent input of a radioInput option.
    ///
    /// The input's value is stored as the record's `optionValue` string
    /// whatever the input's type, so its shape is not checked.
    pub(crate) fn render_option_input<'a>(
        &self,
        field: &FieldDef,
        value: &Value,
        read_only: bool,
        set_value: SetValue<'a>,
    ) -> Result<Control<'a>> {
        let component = Component::for_type(field.type_)?;
        self.dispatch(component, field, value, read_only, set_value)
    }

    fn dispatch<'a>(
        &self,
        component: &Component,
        field: &FieldDef,
        value: &Value,
        read_only: bool,
        set_value: SetValue<'a>,
    ) -> Result<Control<'a>> {
        debug!(field = %field.name, field_type = %field.type_, "rendering field");
        check_config(field, component.props_type)?;

        let corrected = normalize_value(field, value);
        let props = RenderProps {
            field,
            value: corrected.clone().unwrap_or_else(|| value.clone()),
            read_only: read_only || field.read_only,
            set_value: set_value.clone(),
            renderer: self,
        };
        let control = component.render(&props)?;

        if let Some(corrected) = corrected {
            debug!(field = %field.name, value = %Pretty(&corrected), "normalized unset value");
            set_value(corrected);
        }
        Ok(control)
    }

    /// Render every visible field of a booking form.
    ///
    /// Each field is wrapped in a group carrying its name, label and required
    /// flag; the field's own control is the group's only child. Hidden fields
    /// are skipped. Values missing from `values` render as unset.
    pub fn render_form<'a>(
        &self,
        form: &BookingForm,
        values: &Map<String, Value>,
        read_only: bool,
        set_field: SetFieldValue<'a>,
    ) -> Result<Control<'a>> {
        debug!(form = %form.name, fields = form.fields.len(), "rendering booking form");
        let mut root = Control::group(Vec::new()).with_name(&form.name);

        for field in form.fields.iter().filter(|f| !f.hidden) {
            let value = values.get(&field.name).cloned().unwrap_or(Value::Null);
            let set_field = set_field.clone();
            let name = field.name.clone();
            let set_value: SetValue<'a> = Rc::new(move |v: Value| set_field(&name, v));

            let control = self.render(field, &value, read_only, set_value)?;
            root.push(
                Control::group(vec![control])
                    .with_name(&field.name)
                    .with_label(field.label.clone())
                    .with_required(field.required),
            );
        }

        Ok(root)
    }
}

/// Selection fields need an options list; radioInput also needs a first
/// option to start on. Absent `optionsInputs` means no option has an input.
fn check_config(field: &FieldDef, props_type: PropsType) -> Result<()> {
    let missing = match props_type {
        PropsType::ObjectiveWithInput => field.options().is_empty(),
        other => other.requires_options() && field.options.is_none(),
    };
    if missing {
        return Err(FieldsError::MissingOptions {
            field: field.name.clone(),
        });
    }
    Ok(())
}
