//! Rendered control descriptions.
//!
//! A factory turns a field into a tree of [`Control`]s. The tree is plain
//! data the host draws however it likes; interactive nodes also carry a
//! change handler that computes the field's next value from the snapshot it
//! was rendered with and hands it to the host's setter. Controls never hold
//! the value themselves beyond that snapshot.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use crate::error::{FieldsError, Result};
use crate::logging::Pretty;

/// Host-supplied callback receiving a field's next value.
pub type SetValue<'a> = Rc<dyn Fn(Value) + 'a>;

type Handler<'a> = Box<dyn Fn(Value) + 'a>;

/// Wrap a closure as a setter.
pub fn set_value<'a>(f: impl Fn(Value) + 'a) -> SetValue<'a> {
    Rc::new(f)
}

/// The `type` attribute of a text-like input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Number,
}

/// An option as handed to a selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValue {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// Container for child controls.
    Group,
    /// Static text, `label` holds the text.
    Label,
    TextInput { input_type: InputType },
    TextArea { rows: u32 },
    PhoneInput,
    AddressInput,
    EmailInput,
    Select { list_values: Vec<ListValue> },
    MultiSelect { list_values: Vec<ListValue> },
    Checkbox { checked: bool },
    Radio { checked: bool },
    RadioGroup,
    Button,
}

/// One node of a rendered field.
pub struct Control<'a> {
    pub kind: ControlKind,
    pub name: Option<String>,
    pub id: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub tooltip: Option<String>,
    pub test_id: Option<String>,
    /// Snapshot the control displays.
    pub value: Value,
    pub required: bool,
    pub read_only: bool,
    pub disabled: bool,
    pub children: Vec<Control<'a>>,
    on_change: Option<Handler<'a>>,
}

impl<'a> Control<'a> {
    pub fn new(kind: ControlKind) -> Self {
        Self {
            kind,
            name: None,
            id: None,
            label: None,
            placeholder: None,
            tooltip: None,
            test_id: None,
            value: Value::Null,
            required: false,
            read_only: false,
            disabled: false,
            children: Vec::new(),
            on_change: None,
        }
    }

    pub fn group(children: Vec<Control<'a>>) -> Self {
        Self {
            children,
            ..Self::new(ControlKind::Group)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_children(mut self, children: Vec<Control<'a>>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: Control<'a>) {
        self.children.push(child);
    }

    /// Attach the handler run on user interaction.
    pub fn on_change(mut self, handler: impl Fn(Value) + 'a) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.on_change.is_some()
    }

    /// Deliver user input: text for inputs, an array for multi-selects.
    pub fn change(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let Some(handler) = &self.on_change else {
            return Err(FieldsError::NotInteractive {
                control: self.describe(),
            });
        };
        trace!(control = %self.describe(), input = %Pretty(&value), "control changed");
        handler(value);
        Ok(())
    }

    /// Press a button.
    pub fn click(&self) -> Result<()> {
        self.change(Value::Null)
    }

    /// Check or uncheck a checkbox.
    pub fn toggle(&self, checked: bool) -> Result<()> {
        self.change(Value::Bool(checked))
    }

    /// Pick a radio option.
    pub fn select(&self) -> Result<()> {
        self.change(self.value.clone())
    }

    /// Depth-first, pre-order walk of this control and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &Control<'a>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    pub fn find(&self, predicate: impl Fn(&Control<'a>) -> bool) -> Option<&Control<'a>> {
        self.iter().find(|c| predicate(c))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Control<'a>> {
        self.find(|c| c.name.as_deref() == Some(name))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Control<'a>> {
        self.find(|c| c.id.as_deref() == Some(id))
    }

    pub fn find_by_test_id(&self, test_id: &str) -> Option<&Control<'a>> {
        self.find(|c| c.test_id.as_deref() == Some(test_id))
    }

    /// All descendants (self included) matching a predicate, in tree order.
    pub fn filter(&self, predicate: impl Fn(&Control<'a>) -> bool) -> Vec<&Control<'a>> {
        self.iter().filter(|c| predicate(c)).collect()
    }

    fn describe(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.test_id.clone())
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| format!("{:?}", self.kind))
    }
}

impl fmt::Debug for Control<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("id", &self.id)
            .field("label", &self.label)
            .field("placeholder", &self.placeholder)
            .field("tooltip", &self.tooltip)
            .field("test_id", &self.test_id)
            .field("value", &self.value)
            .field("required", &self.required)
            .field("read_only", &self.read_only)
            .field("disabled", &self.disabled)
            .field("interactive", &self.is_interactive())
            .field("children", &self.children)
            .finish()
    }
}
