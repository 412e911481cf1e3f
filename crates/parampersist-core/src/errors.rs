use parampersist_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ParamPersistError
pub type Result<T> = std::result::Result<T, ParamPersistError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    ConstraintViolation,
    TypeMismatch,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, entity id, request id) needed to debug a failed call.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for serialization and persistence
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamPersistError {
    // ===== Configuration Errors =====
    /// Canonical form has no (or an empty) class_path
    #[error("Param not configured correctly. Missing \"class_path\" definition.")]
    MissingClassPath,

    /// Canonical form has no (or an empty) params list
    #[error("Param not configured correctly. Missing \"params\" definition.")]
    MissingParams,

    // ===== Resolution Errors =====
    /// No class is registered under the given path
    #[error("Defined param class \"class_path\" could not be resolved. Given path is \"{class_path}\"")]
    ClassNotResolvable { class_path: String },

    /// A loaded object is not of the class the caller asked for
    #[error("Expected an instance of \"{expected}\" but found \"{found}\"")]
    ClassMismatch { expected: String, found: String },

    // ===== Decode Errors =====
    /// Type tag is not one of the supported scalar kinds
    #[error("Unknown param type tag \"{tag}\"")]
    UnknownTypeTag { tag: String },

    /// Stored value cannot be converted by the decoder for its tag
    #[error("Value {value} cannot be decoded as \"{tag}\"")]
    InvalidValue { tag: String, value: String },

    /// Value kind does not fit the declared field kind
    #[error("Field \"{field}\" expects {expected} but got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Field name is not declared on the target class
    #[error("Field \"{field}\" is not declared on this class")]
    UnknownField { field: String },

    // ===== Persistence Errors =====
    /// No instance row exists with the given id
    #[error("Parameterized instance with id \"{instance_id}\" does not exist.")]
    InstanceNotFound { instance_id: String },

    // ===== Internal Errors =====
    /// JSON encoding or decoding failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<ParamPersistError> for ExError {
    fn from(err: ParamPersistError) -> Self {
        let message = err.to_string();
        match err {
            ParamPersistError::MissingClassPath => ExError::new(ExErrorKind::InvalidInput)
                .with_op("from_dict")
                .with_message(message),

            ParamPersistError::MissingParams => ExError::new(ExErrorKind::InvalidInput)
                .with_op("from_dict")
                .with_message(message),

            ParamPersistError::ClassNotResolvable { class_path } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("resolve_class")
                    .with_entity_id(class_path)
                    .with_message(message)
            }

            ParamPersistError::ClassMismatch { found, .. } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_entity_id(found)
                    .with_message(message)
            }

            ParamPersistError::UnknownTypeTag { .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("decode_param")
                .with_message(message),

            ParamPersistError::InvalidValue { .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("decode_param")
                .with_message(message),

            ParamPersistError::TypeMismatch { field, .. } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_entity_id(field)
                    .with_message(message)
            }

            ParamPersistError::UnknownField { field } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(field)
                .with_message(message),

            ParamPersistError::InstanceNotFound { instance_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(instance_id)
                    .with_message(message)
            }

            ParamPersistError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to ParamPersistError
impl From<serde_json::Error> for ParamPersistError {
    fn from(err: serde_json::Error) -> Self {
        ParamPersistError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::TypeMismatch, "ERR_TYPE_MISMATCH"),
            (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
            (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_missing_key_messages_are_distinct() {
        let class_path = ParamPersistError::MissingClassPath.to_string();
        let params = ParamPersistError::MissingParams.to_string();
        assert_ne!(class_path, params);
        assert!(class_path.contains("\"class_path\""));
        assert!(params.contains("\"params\""));
    }

    #[test]
    fn test_instance_not_found_maps_to_not_found_kind() {
        let err: ExError = ParamPersistError::InstanceNotFound {
            instance_id: "abc".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("abc"));
        assert!(err
            .to_string()
            .contains("Parameterized instance with id \"abc\" does not exist."));
    }

    #[test]
    fn test_display_includes_source() {
        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Internal)
            .with_op("save")
            .with_source(inner);
        let rendered = outer.to_string();
        assert!(rendered.starts_with("[ERR_INTERNAL] in operation 'save'"));
        assert!(rendered.contains("disk full"));
    }
}
