use thiserror::Error;
use ulid::Ulid;

use crate::model::RoomType;
use crate::store::StoreError;

/// A single itemized validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or out-of-range input; sub-errors name the offending fields.
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    /// Insufficient role, or not the owner of the record.
    #[error("forbidden")]
    Forbidden,
    #[error("no {0} room available for the requested dates")]
    RoomUnavailable(RoomType),
    /// Cancellation is terminal for content changes.
    #[error("booking {0} is cancelled and cannot be modified")]
    ImmutableState(Ulid),
    #[error("room type already registered: {0}")]
    DuplicateType(RoomType),
    /// Persistence failure, wrapped with the operation that hit it. Never
    /// retried here; retry is a transport-layer concern.
    #[error("storage failure during {op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl EngineError {
    pub fn room_not_found(key: impl ToString) -> Self {
        EngineError::NotFound {
            entity: "room",
            key: key.to_string(),
        }
    }

    pub fn booking_not_found(id: Ulid) -> Self {
        EngineError::NotFound {
            entity: "booking",
            key: id.to_string(),
        }
    }

    pub(crate) fn field(field: &str, message: &str) -> Self {
        EngineError::Validation(vec![FieldError::new(field, message)])
    }
}

/// Flatten `validator` output into our itemized form, sorted for stable
/// reporting.
pub(crate) fn fields_of(errors: validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            fields.push(FieldError::new(field.to_string(), message));
        }
    }
    fields.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    fields
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Validation(fields_of(errors))
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
