mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{form_schema_from_str, parse_document_str, theme_from_str, values_from_str};
pub use output::render_document;
