use fintrack_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on.
/// Kinds split into caller faults (see [`ExErrorKind::is_client_error`]) and
/// server faults; a restore rejected before mutation is always a caller fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller faults
    /// Restore stream missing, empty or unreadable; malformed artifact name
    InvalidInput,
    /// Artifact cannot be decoded, or its identity collections are inconsistent
    InvalidBackup,
    /// Data-only artifact references accounts that do not exist in the target store
    IncompatibleBackup,
    NotFound,

    // Server faults
    Io,
    Serialization,
    Persistence,
    /// Database write lock held by another writer
    Concurrency,
    Config,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidBackup => "ERR_INVALID_BACKUP",
            ExErrorKind::IncompatibleBackup => "ERR_INCOMPATIBLE_BACKUP",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True when the failure is attributable to the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::InvalidBackup
                | ExErrorKind::IncompatibleBackup
                | ExErrorKind::NotFound
        )
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and a chain of
/// underlying errors so a rolled-back restore still reports what failed.
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

    /// Add entity context (a table name, a user id, an artifact name)
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

    /// Get the entity context, if any
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

    /// Walk to the innermost error of the chain
    pub fn root_cause(&self) -> &ExError {
        let mut current = self;
        while let Some(next) = current.source_error() {
            current = next;
        }
        current
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
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failures of the snapshot codec and snapshot validation
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The compressed stream could not be read or written
    #[error("Compression stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// The decompressed payload is not a valid snapshot document
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload decoded to `null`
    #[error("Snapshot root object is missing")]
    MissingRoot,

    /// Identity collections are inconsistent with each other or with the kind tag
    #[error("Malformed identity data: {reason}")]
    MalformedIdentity { reason: String },
}

impl From<SnapshotError> for ExError {
    fn from(err: SnapshotError) -> Self {
        match &err {
            SnapshotError::Stream(_) | SnapshotError::Json(_) | SnapshotError::MissingRoot => {
                ExError::new(ExErrorKind::InvalidBackup)
                    .with_op("decode_snapshot")
                    .with_message(format!("Corrupt backup: {}", err))
            }
            SnapshotError::MalformedIdentity { .. } => ExError::new(ExErrorKind::InvalidBackup)
                .with_op("classify_snapshot")
                .with_message(err.to_string()),
        }
    }
}
