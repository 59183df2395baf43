//! Core field types for booking forms.
//!
//! All types serialize to/from YAML via serde using the camelCase tags the
//! form builder stores (`radioInput`, `optionsInputs`, `variantsConfig`).
//! A field definition describes one booking question; the registry reads it
//! but never mutates it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldsError;

/// The input kind of a booking field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Name,
    Phone,
    Email,
    Address,
    Multiemail,
    Multiselect,
    Select,
    Checkbox,
    Radio,
    RadioInput,
    Boolean,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 14] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Name,
        FieldType::Phone,
        FieldType::Email,
        FieldType::Address,
        FieldType::Multiemail,
        FieldType::Multiselect,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::RadioInput,
        FieldType::Boolean,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Name => "name",
            FieldType::Phone => "phone",
            FieldType::Email => "email",
            FieldType::Address => "address",
            FieldType::Multiemail => "multiemail",
            FieldType::Multiselect => "multiselect",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::RadioInput => "radioInput",
            FieldType::Boolean => "boolean",
        }
    }

    /// The value shape this field type stores.
    pub const fn props_type(&self) -> PropsType {
        match self {
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Number
            | FieldType::Phone
            | FieldType::Email
            | FieldType::Address => PropsType::Text,
            FieldType::Name => PropsType::Variants,
            FieldType::Multiemail => PropsType::TextList,
            FieldType::Multiselect | FieldType::Checkbox => PropsType::Multiselect,
            FieldType::Select | FieldType::Radio => PropsType::Select,
            FieldType::RadioInput => PropsType::ObjectiveWithInput,
            FieldType::Boolean => PropsType::Boolean,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FieldsError::UnknownFieldType { tag: s.to_string() })
    }
}

/// Coarse grouping of field types that share a value shape and validator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PropsType {
    Text,
    TextList,
    Select,
    Boolean,
    Multiselect,
    ObjectiveWithInput,
    Variants,
}

impl PropsType {
    pub const ALL: [PropsType; 7] = [
        PropsType::Text,
        PropsType::TextList,
        PropsType::Select,
        PropsType::Boolean,
        PropsType::Multiselect,
        PropsType::ObjectiveWithInput,
        PropsType::Variants,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PropsType::Text => "text",
            PropsType::TextList => "textList",
            PropsType::Select => "select",
            PropsType::Boolean => "boolean",
            PropsType::Multiselect => "multiselect",
            PropsType::ObjectiveWithInput => "objectiveWithInput",
            PropsType::Variants => "variants",
        }
    }

    /// Props types whose fields cannot render without an options list.
    pub const fn requires_options(&self) -> bool {
        matches!(
            self,
            PropsType::Select | PropsType::Multiselect | PropsType::ObjectiveWithInput
        )
    }
}

impl fmt::Display for PropsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropsType {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropsType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FieldsError::UnknownPropsType { tag: s.to_string() })
    }
}

/// A single option in a select, multiselect, checkbox, radio or radioInput field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: value.into(),
        }
    }

    /// Display text; an option without a label shows nothing.
    pub fn title(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// Dependent input shown under a radioInput option when it is selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionInput {
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl OptionInput {
    pub fn new(type_: FieldType) -> Self {
        Self {
            type_,
            required: false,
            placeholder: None,
        }
    }

    /// Expand into a full field definition so it can go through dispatch.
    pub fn to_field_def(&self, name: &str) -> FieldDef {
        FieldDef {
            required: self.required,
            placeholder: self.placeholder.clone(),
            ..FieldDef::new(name, self.type_)
        }
    }
}

/// The two shapes of the `name` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameVariant {
    /// One string holding the whole name.
    #[default]
    FullName,
    /// A record keyed by sub-field name.
    FirstAndLastName,
}

impl NameVariant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NameVariant::FullName => "fullName",
            NameVariant::FirstAndLastName => "firstAndLastName",
        }
    }

    /// Parse a variant name; `None` for anything else.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "fullName" => Some(NameVariant::FullName),
            "firstAndLastName" => Some(NameVariant::FirstAndLastName),
            _ => None,
        }
    }
}

impl fmt::Display for NameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn text_type() -> FieldType {
    FieldType::Text
}

/// One input inside a variant of the name field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantField {
    pub name: String,
    #[serde(rename = "type", default = "text_type")]
    pub type_: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl VariantField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            type_: FieldType::Text,
            label: Some(label.into()),
            placeholder: None,
            required,
        }
    }
}

/// Ordered inputs of one variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    #[serde(default)]
    pub fields: Vec<VariantField>,
}

/// Variant definitions keyed by variant name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariantsConfig {
    #[serde(default)]
    pub variants: BTreeMap<String, Variant>,
}

impl VariantsConfig {
    /// The stock config of the booking `name` field.
    pub fn name_defaults() -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(
            NameVariant::FullName.as_str().to_string(),
            Variant {
                fields: vec![VariantField::new("fullName", "Your name", true)],
            },
        );
        variants.insert(
            NameVariant::FirstAndLastName.as_str().to_string(),
            Variant {
                fields: vec![
                    VariantField::new("firstName", "First name", true),
                    VariantField::new("lastName", "Last name", false),
                ],
            },
        );
        Self { variants }
    }

    pub fn get(&self, variant: NameVariant) -> Option<&Variant> {
        self.variants.get(variant.as_str())
    }
}

/// A booking field definition: the complete schema for a single question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_inputs: Option<BTreeMap<String, OptionInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants_config: Option<VariantsConfig>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        Self {
            name: name.into(),
            type_,
            label: None,
            placeholder: None,
            required: false,
            read_only: false,
            hidden: false,
            options: None,
            options_inputs: None,
            variant: None,
            variants_config: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_option_input(mut self, option_value: impl Into<String>, input: OptionInput) -> Self {
        self.options_inputs
            .get_or_insert_with(BTreeMap::new)
            .insert(option_value.into(), input);
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_variants_config(mut self, config: VariantsConfig) -> Self {
        self.variants_config = Some(config);
        self
    }

    pub fn props_type(&self) -> PropsType {
        self.type_.props_type()
    }

    /// Options list, empty when none is configured.
    pub fn options(&self) -> &[SelectOption] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Dependent input configured for a radioInput option value.
    pub fn option_input(&self, option_value: &str) -> Option<&OptionInput> {
        self.options_inputs.as_ref()?.get(option_value)
    }
}

/// A booking form: an ordered list of field definitions under a slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingForm {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl BookingForm {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check the form can be stored and rendered.
    ///
    /// The name becomes a file name under `forms/`, so it must be non-empty
    /// and free of path separators and `..`. Field names must be unique
    /// within a form since values are keyed by them.
    pub fn validate(&self) -> Result<(), FieldsError> {
        let name = self.name.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(FieldsError::InvalidFormName {
                name: self.name.clone(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(FieldsError::DuplicateFieldName {
                    form: self.name.clone(),
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_tags_match_form_builder() {
        let tags: Vec<_> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "text",
                "textarea",
                "number",
                "name",
                "phone",
                "email",
                "address",
                "multiemail",
                "multiselect",
                "select",
                "checkbox",
                "radio",
                "radioInput",
                "boolean",
            ]
        );
    }

    #[test]
    fn field_type_serde_uses_same_tags() {
        for ft in FieldType::ALL {
            let yaml = serde_yaml_ng::to_string(&ft).unwrap();
            assert_eq!(yaml.trim(), ft.as_str());
            let parsed: FieldType = serde_yaml_ng::from_str(&yaml).unwrap();
            assert_eq!(parsed, ft);
        }
    }

    #[test]
    fn field_type_from_str() {
        assert_eq!("radioInput".parse::<FieldType>().unwrap(), FieldType::RadioInput);
        let err = "date".parse::<FieldType>().unwrap_err();
        assert!(matches!(err, FieldsError::UnknownFieldType { ref tag } if tag == "date"));
    }

    #[test]
    fn props_type_mapping() {
        assert_eq!(FieldType::Textarea.props_type(), PropsType::Text);
        assert_eq!(FieldType::Address.props_type(), PropsType::Text);
        assert_eq!(FieldType::Name.props_type(), PropsType::Variants);
        assert_eq!(FieldType::Multiemail.props_type(), PropsType::TextList);
        assert_eq!(FieldType::Checkbox.props_type(), PropsType::Multiselect);
        assert_eq!(FieldType::Radio.props_type(), PropsType::Select);
        assert_eq!(FieldType::RadioInput.props_type(), PropsType::ObjectiveWithInput);
        assert_eq!(FieldType::Boolean.props_type(), PropsType::Boolean);
    }

    #[test]
    fn props_type_from_str() {
        assert_eq!(
            "objectiveWithInput".parse::<PropsType>().unwrap(),
            PropsType::ObjectiveWithInput
        );
        assert!("list".parse::<PropsType>().is_err());
    }

    #[test]
    fn name_variant_parse() {
        assert_eq!(NameVariant::parse("fullName"), Some(NameVariant::FullName));
        assert_eq!(
            NameVariant::parse("firstAndLastName"),
            Some(NameVariant::FirstAndLastName)
        );
        assert_eq!(NameVariant::parse("nickname"), None);
        assert_eq!(NameVariant::default(), NameVariant::FullName);
    }

    #[test]
    fn option_without_label_has_empty_title() {
        let opt = SelectOption {
            label: None,
            value: "opt1".into(),
        };
        assert_eq!(opt.title(), "");
        assert_eq!(SelectOption::new("Yes", "yes").title(), "Yes");
    }

    #[test]
    fn option_input_expands_to_field() {
        let input = OptionInput {
            type_: FieldType::Phone,
            required: true,
            placeholder: Some("+1".into()),
        };
        let field = input.to_field_def("optionField");
        assert_eq!(field.name, "optionField");
        assert_eq!(field.type_, FieldType::Phone);
        assert!(field.required);
        assert_eq!(field.placeholder.as_deref(), Some("+1"));
    }

    #[test]
    fn field_def_yaml_uses_camel_case() {
        let field = FieldDef::new("location", FieldType::RadioInput)
            .with_options(vec![SelectOption::new("In person", "attendeeInPerson")])
            .with_option_input("attendeeInPerson", OptionInput::new(FieldType::Address));
        let yaml = serde_yaml_ng::to_string(&field).unwrap();
        assert!(yaml.contains("type: radioInput"));
        assert!(yaml.contains("optionsInputs:"));
        assert!(!yaml.contains("readOnly"));
        let parsed: FieldDef = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn name_field_from_yaml() {
        let yaml_input = r#"
name: name
type: name
required: true
variant: firstAndLastName
variantsConfig:
  variants:
    firstAndLastName:
      fields:
        - name: firstName
          label: First name
          required: true
        - name: lastName
          label: Last name
"#;
        let field: FieldDef = serde_yaml_ng::from_str(yaml_input).unwrap();
        assert_eq!(field.type_, FieldType::Name);
        assert_eq!(field.variant.as_deref(), Some("firstAndLastName"));
        let config = field.variants_config.unwrap();
        let variant = config.get(NameVariant::FirstAndLastName).unwrap();
        assert_eq!(variant.fields.len(), 2);
        assert_eq!(variant.fields[0].type_, FieldType::Text);
        assert!(!variant.fields[1].required);
        assert!(config.get(NameVariant::FullName).is_none());
    }

    #[test]
    fn name_defaults_cover_both_variants() {
        let config = VariantsConfig::name_defaults();
        let full = config.get(NameVariant::FullName).unwrap();
        assert_eq!(full.fields.len(), 1);
        assert!(full.fields[0].required);
        let split = config.get(NameVariant::FirstAndLastName).unwrap();
        let names: Vec<_> = split.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["firstName", "lastName"]);
    }

    #[test]
    fn options_default_to_empty() {
        let field = FieldDef::new("notes", FieldType::Textarea);
        assert!(field.options().is_empty());
        assert!(field.option_input("anything").is_none());
    }

    #[test]
    fn booking_form_rejects_duplicate_names() {
        let form = BookingForm::new(
            "intro-call",
            vec![
                FieldDef::new("email", FieldType::Email),
                FieldDef::new("email", FieldType::Text),
            ],
        );
        let err = form.validate().unwrap_err();
        assert!(
            matches!(err, FieldsError::DuplicateFieldName { ref name, .. } if name == "email")
        );
        assert_eq!(form.field("email").unwrap().type_, FieldType::Email);
        assert!(form.field("notes").is_none());
    }

    #[test]
    fn booking_form_fields_default_to_empty() {
        let form: BookingForm = serde_yaml_ng::from_str("name: empty").unwrap();
        assert!(form.fields.is_empty());
        form.validate().unwrap();
    }

    #[test]
    fn booking_form_name_must_be_a_plain_file_name() {
        for name in ["", "../evil", "a/b", "a\\b", "..", "x..y"] {
            let err = BookingForm::new(name, Vec::new()).validate().unwrap_err();
            assert!(
                matches!(err, FieldsError::InvalidFormName { .. }),
                "{name:?} was accepted"
            );
        }
        BookingForm::new("intro-call", Vec::new()).validate().unwrap();
        BookingForm::new("team.v2", Vec::new()).validate().unwrap();
    }
}
