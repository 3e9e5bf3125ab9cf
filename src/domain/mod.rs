mod parser;
mod schema;

pub use parser::{SchemaError, document_schema, parse_form_schema};
pub use schema::{
    ConditionRule, FieldOption, FieldSchema, FieldType, FormSchema, Operator, ValidationKind,
    ValidationRule,
};
