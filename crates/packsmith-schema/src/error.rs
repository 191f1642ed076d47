use crate::module::ModuleType;
use thiserror::Error;

/// Every way building or decoding a manifest can fail.
///
/// Each variant carries the offending field name and, where there is one, the
/// rejected value rendered as text.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Text that is not JSON, or whose root, `metadata` or `generated_with`
    /// is not an object. A wrong JSON type anywhere else is `Malformed` under
    /// that field's name.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed {field}: '{value}' ({reason})")]
    Malformed {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must not be set: '{value}' ({reason})")]
    IllegalField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("{field} out of range: '{value}', expected {bound}")]
    OutOfRange {
        field: &'static str,
        value: String,
        bound: String,
    },
    #[error("modules must not contain both types of {first} and {second}")]
    TypeConflict {
        first: ModuleType,
        second: ModuleType,
    },
    #[error("duplicate {field}: '{key}'")]
    DuplicateKey { field: &'static str, key: String },
}

impl ManifestError {
    pub(crate) fn malformed(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(
        field: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::IllegalField {
            field,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn out_of_range(
        field: &'static str,
        value: impl ToString,
        bound: impl Into<String>,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            bound: bound.into(),
        }
    }

    /// Re-attribute a value-level failure to the field that carried the value.
    pub(crate) fn with_field(self, field: &'static str) -> Self {
        match self {
            Self::Malformed { value, reason, .. } => Self::Malformed {
                field,
                value,
                reason,
            },
            Self::OutOfRange { value, bound, .. } => Self::OutOfRange {
                field,
                value,
                bound,
            },
            other => other,
        }
    }

    /// Name of the field the failure is about, if it concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Malformed { field, .. }
            | Self::MissingField { field }
            | Self::IllegalField { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::DuplicateKey { field, .. } => Some(field),
            Self::TypeConflict { .. } => Some("modules"),
            Self::Parse(_) => None,
        }
    }
}
