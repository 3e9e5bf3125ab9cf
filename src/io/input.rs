use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::domain::{FormSchema, parse_form_schema};
use crate::path::ValueBag;
use crate::theme::Theme;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<toml::Table>(contents)
            .with_context(|| "failed to parse TOML document")
            .and_then(|table| {
                serde_json::to_value(table).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse a form schema document.
pub fn form_schema_from_str(contents: &str, format: DocumentFormat) -> Result<FormSchema> {
    let value = parse_document_str(contents, format)?;
    parse_form_schema(&value).context("failed to load form schema")
}

/// Parse a value bag document; the top level must be an object.
pub fn values_from_str(contents: &str, format: DocumentFormat) -> Result<ValueBag> {
    match parse_document_str(contents, format)? {
        Value::Object(map) => Ok(map),
        other => bail!("value bag must be an object, found {other}"),
    }
}

/// Parse a theme document of static class strings.
pub fn theme_from_str(contents: &str, format: DocumentFormat) -> Result<Theme> {
    let value = parse_document_str(contents, format)?;
    serde_json::from_value(value).context("failed to load theme")
}
