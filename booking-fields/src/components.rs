//! The component table: one entry per field type.
//!
//! Each entry pairs the field type's props type (which selects the value
//! validator) with a factory that renders the field into a [`Control`] tree.
//! Factories read an immutable snapshot from [`RenderProps`] and report user
//! input only through the props' setter.

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::control::{Control, ControlKind, InputType, ListValue, SetValue};
use crate::error::{FieldsError, Result};
use crate::render::FieldRenderer;
use crate::types::{FieldDef, FieldType, NameVariant, PropsType};
use crate::validation::is_valid_value;
use crate::value::{preprocess_name_value, ObjectiveValue};

/// Everything a factory sees for one render.
pub struct RenderProps<'p, 'a> {
    pub field: &'p FieldDef,
    /// Current value snapshot; `Null` when unset.
    pub value: Value,
    pub read_only: bool,
    pub set_value: SetValue<'a>,
    /// Used for nested fields and settings.
    pub renderer: &'p FieldRenderer,
}

impl<'a> RenderProps<'_, 'a> {
    /// A handler forwarding the control's input to the setter untouched.
    fn forward(&self) -> impl Fn(Value) + 'a {
        let set_value = self.set_value.clone();
        move |value| set_value(value)
    }
}

pub type Factory = for<'p, 'a> fn(&RenderProps<'p, 'a>) -> Result<Control<'a>>;

/// A registry entry.
pub struct Component {
    pub field_type: FieldType,
    pub props_type: PropsType,
    pub factory: Factory,
}

impl Component {
    /// Look up the entry for a field type.
    pub fn for_type(field_type: FieldType) -> Result<&'static Component> {
        COMPONENTS
            .iter()
            .find(|c| c.field_type == field_type)
            .ok_or(FieldsError::MissingComponent { field_type })
    }

    pub fn is_valid_value(&self, value: &Value) -> bool {
        is_valid_value(self.props_type, value)
    }

    pub fn render<'a>(&self, props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
        (self.factory)(props)
    }
}

const fn entry(field_type: FieldType, factory: Factory) -> Component {
    Component {
        field_type,
        props_type: field_type.props_type(),
        factory,
    }
}

/// Every field type's component.
pub static COMPONENTS: [Component; 14] = [
    entry(FieldType::Text, text),
    entry(FieldType::Textarea, textarea),
    entry(FieldType::Number, number),
    entry(FieldType::Name, name),
    entry(FieldType::Phone, phone),
    entry(FieldType::Email, email),
    entry(FieldType::Address, address),
    entry(FieldType::Multiemail, multiemail),
    entry(FieldType::Multiselect, multiselect),
    entry(FieldType::Select, select),
    entry(FieldType::Checkbox, checkbox),
    entry(FieldType::Radio, radio),
    entry(FieldType::RadioInput, radio_input),
    entry(FieldType::Boolean, boolean),
];

// --- Text-like ---

fn text_like<'a>(props: &RenderProps<'_, 'a>, kind: ControlKind, with_label: bool) -> Control<'a> {
    let field = props.field;
    Control::new(kind)
        .with_name(&field.name)
        .with_label(with_label.then(|| field.label.clone()).flatten())
        .with_placeholder(field.placeholder.clone())
        .with_value(props.value.clone())
        .with_required(field.required)
        .with_read_only(props.read_only)
        .on_change(props.forward())
}

fn text<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let kind = ControlKind::TextInput {
        input_type: InputType::Text,
    };
    Ok(text_like(props, kind, false))
}

fn textarea<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let kind = ControlKind::TextArea {
        rows: props.renderer.settings().textarea_rows,
    };
    Ok(text_like(props, kind, true))
}

fn number<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let kind = ControlKind::TextInput {
        input_type: InputType::Number,
    };
    Ok(text_like(props, kind, false))
}

fn email<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let kind = ControlKind::TextInput {
        input_type: InputType::Email,
    };
    Ok(text_like(props, kind, false))
}

fn phone<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    Ok(text_like(props, ControlKind::PhoneInput, true).with_disabled(props.read_only))
}

fn address<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    Ok(text_like(props, ControlKind::AddressInput, true))
}

// --- Name ---

fn name<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let field = props.field;
    let variant_name = field
        .variant
        .as_deref()
        .unwrap_or(NameVariant::FullName.as_str());

    let Some(config) = &field.variants_config else {
        return Err(FieldsError::MissingVariants {
            field: field.name.clone(),
        });
    };
    let Some(variant) = NameVariant::parse(variant_name) else {
        return Err(FieldsError::InvalidVariant {
            field: field.name.clone(),
            variant: variant_name.to_string(),
        });
    };

    let invalid_value = || FieldsError::InvalidVariantValue {
        field: field.name.clone(),
        variant: variant.to_string(),
    };
    let variant_def = config
        .get(variant)
        .filter(|v| !v.fields.is_empty())
        .ok_or_else(|| FieldsError::VariantNotConfigured {
            field: field.name.clone(),
            variant: variant.to_string(),
        })?;

    match preprocess_name_value(variant, &props.value) {
        Value::String(full_name) if variant == NameVariant::FullName => {
            let input = &variant_def.fields[0];
            Ok(Control::new(ControlKind::TextInput {
                input_type: InputType::Text,
            })
            .with_name("name")
            .with_label(input.label.clone())
            .with_placeholder(input.placeholder.clone())
            .with_value(full_name)
            .with_required(input.required)
            .with_read_only(props.read_only)
            .on_change(props.forward()))
        }
        Value::Object(record) if variant == NameVariant::FirstAndLastName => {
            let inputs = variant_def
                .fields
                .iter()
                .map(|input| {
                    let shown = record
                        .get(&input.name)
                        .cloned()
                        .unwrap_or_else(|| Value::String(String::new()));
                    Control::new(ControlKind::TextInput {
                        input_type: InputType::Text,
                    })
                    .with_name(&input.name)
                    .with_test_id(format!("testid-{}", input.name))
                    .with_label(input.label.clone())
                    .with_placeholder(input.placeholder.clone())
                    .with_value(shown)
                    .with_required(input.required)
                    .with_read_only(props.read_only)
                    .on_change(merge_sub_field(
                        props.set_value.clone(),
                        record.clone(),
                        input.name.clone(),
                    ))
                })
                .collect();
            Ok(Control::group(inputs).with_name(&field.name))
        }
        _ => Err(invalid_value()),
    }
}

/// Replace one sub-field of a split name, keeping the others.
fn merge_sub_field<'a>(
    set_value: SetValue<'a>,
    current: Map<String, Value>,
    key: String,
) -> impl Fn(Value) + 'a {
    move |input| {
        let mut next = current.clone();
        next.insert(key.clone(), input);
        set_value(Value::Object(next));
    }
}

// --- Lists ---

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn emit_list<'a>(set_value: &SetValue<'a>, items: Vec<String>) {
    set_value(Value::Array(items.into_iter().map(Value::String).collect()));
}

fn multiemail<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let field = props.field;
    let settings = props.renderer.settings();
    let emails = string_list(&props.value);
    let mut root = Control::group(Vec::new()).with_name(&field.name);

    let add_blank = |emails: Vec<String>| {
        let set_value = props.set_value.clone();
        move |_: Value| {
            let mut next = emails.clone();
            next.push(String::new());
            emit_list(&set_value, next);
        }
    };

    if emails.is_empty() {
        if !props.read_only {
            root.push(
                Control::new(ControlKind::Button)
                    .with_test_id("add-guests")
                    .with_label(field.label.clone())
                    .on_change(add_blank(emails)),
            );
        }
        return Ok(root);
    }

    root.push(Control::new(ControlKind::Label).with_label(field.label.clone()));

    let entries = emails
        .iter()
        .enumerate()
        .map(|(index, address)| {
            let edit = {
                let set_value = props.set_value.clone();
                let emails = emails.clone();
                move |input: Value| {
                    let mut next = emails.clone();
                    next[index] = input.as_str().unwrap_or_default().to_string();
                    emit_list(&set_value, next);
                }
            };
            let mut entry = Control::new(ControlKind::EmailInput)
                .with_name(format!("{}.{}", field.name, index))
                .with_placeholder(field.placeholder.clone())
                .with_value(address.as_str())
                .with_required(true)
                .with_disabled(props.read_only)
                .on_change(edit);

            if !props.read_only {
                let set_value = props.set_value.clone();
                let emails = emails.clone();
                entry.push(
                    Control::new(ControlKind::Button)
                        .with_id(format!("{}.{}.remove", field.name, index))
                        .with_tooltip(&settings.remove_email_tooltip)
                        .on_change(move |_| {
                            let mut next = emails.clone();
                            next.remove(index);
                            emit_list(&set_value, next);
                        }),
                );
            }
            entry
        })
        .collect();
    root.push(Control::group(entries));

    if !props.read_only {
        root.push(
            Control::new(ControlKind::Button)
                .with_test_id("add-another-guest")
                .with_label(Some(settings.add_another_label.clone()))
                .on_change(add_blank(emails)),
        );
    }

    Ok(root)
}

// --- Selection ---

fn list_values(field: &FieldDef) -> Vec<ListValue> {
    field
        .options()
        .iter()
        .map(|o| ListValue {
            title: o.title().to_string(),
            value: o.value.clone(),
        })
        .collect()
}

fn multiselect<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let kind = ControlKind::MultiSelect {
        list_values: list_values(props.field),
    };
    Ok(text_like(props, kind, false))
}

fn select<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let kind = ControlKind::Select {
        list_values: list_values(props.field),
    };
    Ok(text_like(props, kind, false))
}

fn checkbox<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let field = props.field;
    let selected = string_list(&props.value);

    let boxes = field
        .options()
        .iter()
        .map(|option| {
            let set_value = props.set_value.clone();
            let current = selected.clone();
            let option_value = option.value.clone();
            Control::new(ControlKind::Checkbox {
                checked: selected.contains(&option.value),
            })
            .with_name(&field.name)
            .with_label(Some(option.title().to_string()))
            .with_value(option.value.as_str())
            .with_disabled(props.read_only)
            .on_change(move |input| {
                let mut next: Vec<String> = current
                    .iter()
                    .filter(|v| **v != option_value)
                    .cloned()
                    .collect();
                if input.as_bool().unwrap_or(false) {
                    next.push(option_value.clone());
                }
                emit_list(&set_value, next);
            })
        })
        .collect();

    Ok(Control::group(boxes).with_name(&field.name))
}

/// Options are keyed and stored by their label, not their value.
fn radio<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let field = props.field;
    let current = props.value.as_str().unwrap_or_default();

    let radios = field
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let set_value = props.set_value.clone();
            let label = option.title().to_string();
            Control::new(ControlKind::Radio {
                checked: !current.is_empty() && current == label,
            })
            .with_id(format!("{}.option.{}.radio", field.name, i))
            .with_label(Some(label.clone()))
            .with_value(label.as_str())
            .with_disabled(props.read_only)
            .on_change(move |_| set_value(Value::String(label.clone())))
        })
        .collect();

    Ok(Control::new(ControlKind::RadioGroup)
        .with_name(&field.name)
        .with_value(props.value.clone())
        .with_children(radios))
}

fn radio_input<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let field = props.field;
    let options = field.options();
    let Some(first) = options.first() else {
        return Err(FieldsError::MissingOptions {
            field: field.name.clone(),
        });
    };
    let current = ObjectiveValue::from_value(&props.value);
    let mut root = Control::group(Vec::new()).with_name(&field.name);

    if options.len() > 1 {
        let radios = options
            .iter()
            .map(|option| {
                let set_value = props.set_value.clone();
                let option_value = option.value.clone();
                Control::new(ControlKind::Radio {
                    checked: current.value == option.value,
                })
                .with_name(&field.name)
                .with_label(Some(option.title().to_string()))
                .with_value(option.value.as_str())
                .with_disabled(props.read_only)
                .on_change(move |_| {
                    set_value(ObjectiveValue::new(option_value.clone(), "").to_value())
                })
            })
            .collect();
        root.push(
            Control::new(ControlKind::RadioGroup)
                .with_name(&field.name)
                .with_value(current.value.as_str())
                .with_children(radios),
        );
    } else {
        // A lone option is shown as the label itself.
        let input_required = field
            .option_input(&first.value)
            .is_some_and(|input| input.required);
        root.push(
            Control::new(ControlKind::Label)
                .with_label(Some(first.title().to_string()))
                .with_required(!props.read_only && input_required),
        );
    }

    if let Some(input) = field.option_input(&current.value) {
        let sub_field = input.to_field_def("optionField");
        let outer = props.set_value.clone();
        let selected = current.value.clone();
        let sub_setter: SetValue<'a> = Rc::new(move |input: Value| {
            let option_value = match input {
                Value::String(text) => text,
                _ => String::new(),
            };
            outer(ObjectiveValue::new(selected.clone(), option_value).to_value());
        });
        let sub_value = if current.option_value.is_empty() {
            Value::Null
        } else {
            Value::String(current.option_value.clone())
        };
        let sub_control = props.renderer.render_option_input(
            &sub_field,
            &sub_value,
            props.read_only,
            sub_setter,
        )?;
        root.push(sub_control);
    }

    Ok(root)
}

// --- Boolean ---

fn boolean<'a>(props: &RenderProps<'_, 'a>) -> Result<Control<'a>> {
    let field = props.field;
    let checked = props.value.as_bool().unwrap_or(false);
    let set_value = props.set_value.clone();
    Ok(Control::new(ControlKind::Checkbox { checked })
        .with_name(&field.name)
        .with_label(field.label.clone())
        .with_value(checked)
        .with_disabled(props.read_only)
        .on_change(move |input| set_value(Value::Bool(input.as_bool().unwrap_or(false)))))
}
