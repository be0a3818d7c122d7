//! Field predicates shared by every form. Each returns `None` when the value
//! is acceptable.

use thiserror::Error;

pub const MIN_TEMPLATE_NAME_SEGMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Project name cannot be empty")]
    EmptyProjectName,
    #[error("Project path cannot be empty")]
    EmptyProjectPath,
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} cannot contain whitespace")]
    ContainsWhitespace { field: &'static str },
    #[error("Name must have at least 3 dot-separated parts, like com.company.template")]
    TooFewSegments,
    #[error("Version must look like 1.0.0")]
    InvalidVersion,
    #[error("A template named '{name}' already exists")]
    TemplateExists { name: String },
}

pub fn project_name(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::EmptyProjectName)
}

pub fn project_path(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::EmptyProjectPath)
}

pub fn non_empty(field: &'static str, value: &str) -> Option<FieldError> {
    value
        .trim()
        .is_empty()
        .then_some(FieldError::Empty { field })
}

/// Package-style identifier such as `com.company.template`.
pub fn template_name(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::Empty { field: "Name" });
    }
    if value.chars().any(char::is_whitespace) {
        return Some(FieldError::ContainsWhitespace { field: "Name" });
    }
    let segments = value.split('.').filter(|segment| !segment.is_empty()).count();
    if segments < MIN_TEMPLATE_NAME_SEGMENTS {
        return Some(FieldError::TooFewSegments);
    }
    None
}

pub fn semantic_version(value: &str) -> Option<FieldError> {
    let parts: Vec<&str> = value.split('.').collect();
    let valid = parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    (!valid).then_some(FieldError::InvalidVersion)
}
