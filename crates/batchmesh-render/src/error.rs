use batchmesh_test_utils::DisplayError;

/// Errors raised by the batching pipeline.
///
/// Every variant is fatal for the owning render context: a surface that could not be
/// created or a renderable that broke its quad contract leaves the pool unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The display provider failed to create a host resource.
    Display(DisplayError),

    /// A renderable emitted a different number of quads than it declared on submit.
    QuadCountMismatch {
        surface: usize,
        declared: usize,
        emitted: usize,
    },

    /// A caller-enforced precondition of the frame protocol was broken.
    InvariantViolation(String),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Display(err) => write!(f, "Display provider error: {}", err),
            BatchError::QuadCountMismatch {
                surface,
                declared,
                emitted,
            } => write!(
                f,
                "Renderable on surface {} declared {} quads but emitted {}",
                surface, declared, emitted
            ),
            BatchError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Display(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DisplayError> for BatchError {
    fn from(err: DisplayError) -> Self {
        BatchError::Display(err)
    }
}

/// Result type for batching operations.
pub type BatchResult<T> = Result<T, BatchError>;
