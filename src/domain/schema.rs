use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Declarative description of a whole form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
    /// Grid/layout hints for the rendering layer. Never read by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<Value>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub id: String,
    /// Storage key inside the value bag.
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// An explicit `null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visibility_rules: Vec<ConditionRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable_rules: Vec<ConditionRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clear_value_rules: Vec<ConditionRule>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub reserve_space: bool,
    #[serde(default)]
    pub validate_on_change: bool,
    /// Reject text changes that do not match the field's pattern rule.
    #[serde(default)]
    pub restrict_input: bool,
    /// The widget offers a clear action.
    #[serde(default)]
    pub clearable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Keys the core does not interpret (`grid`, widget props, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            label: name.clone(),
            name,
            field_type,
            default_value: None,
            validation: Vec::new(),
            visibility_rules: Vec::new(),
            disable_rules: Vec::new(),
            clear_value_rules: Vec::new(),
            multiple: false,
            disabled: false,
            hidden: false,
            reserve_space: false,
            validate_on_change: false,
            restrict_input: false,
            clearable: false,
            placeholder: None,
            helper_text: None,
            options: Vec::new(),
            extra: IndexMap::new(),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required_rule().is_some()
    }

    pub fn required_rule(&self) -> Option<&ValidationRule> {
        self.validation
            .iter()
            .find(|rule| rule.kind == ValidationKind::Required)
    }

    pub fn display_label(&self) -> String {
        if self.label.is_empty() || self.label.eq_ignore_ascii_case(&self.name) {
            self.name.clone()
        } else {
            format!("{} ({})", self.label, self.name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Password,
    Number,
    Email,
    Url,
    Tel,
    Textarea,
    Checkbox,
    Switch,
    Radio,
    Select,
    Autocomplete,
    Date,
    Time,
    Datetime,
    Daterange,
    File,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Tel => "tel",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
            FieldType::Switch => "switch",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::Autocomplete => "autocomplete",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Daterange => "daterange",
            FieldType::File => "file",
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Switch)
    }

    /// Types whose value is free text typed by the user.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Password
                | FieldType::Email
                | FieldType::Url
                | FieldType::Tel
                | FieldType::Textarea
        )
    }

    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldType::Radio | FieldType::Select | FieldType::Autocomplete
        )
    }

    /// Theme component key used to style widgets of this type.
    pub fn component_key(self) -> &'static str {
        match self {
            FieldType::Text
            | FieldType::Password
            | FieldType::Number
            | FieldType::Email
            | FieldType::Url
            | FieldType::Tel => "textInput",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
            FieldType::Switch => "switch",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::Autocomplete => "autocomplete",
            FieldType::Date => "datePicker",
            FieldType::Time => "timePicker",
            FieldType::Datetime => "dateTimePicker",
            FieldType::Daterange => "dateRangePicker",
            FieldType::File => "fileInput",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: ValidationKind,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: ValidationKind) -> Self {
        Self {
            kind,
            value: None,
            message: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ValidationKind {
    Required,
    Email,
    Url,
    MinLength,
    MaxLength,
    Length,
    Pattern,
    Min,
    Max,
    Step,
    /// Any rule type this crate does not know; skipped at compile time.
    #[serde(other)]
    Unknown,
}

/// A condition on another field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionRule {
    pub field: String,
    pub operator: Operator,
    /// `None` stands for an omitted value, which is distinct from `null`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

impl ConditionRule {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Lt,
    In,
    Contains,
    Changed,
    /// Any operator name this crate does not know.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            extra: IndexMap::new(),
        }
    }
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
