use crate::call::CallKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid HAR: {0}")]
    InvalidHar(String),

    #[error("Missing captured calls: {}", format_kinds(.0))]
    MissingCalls(Vec<CallKind>),
}

fn format_kinds(kinds: &[CallKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
