/// Crate-wide result alias.
pub type StillclipResult<T> = Result<T, StillclipError>;

/// Error taxonomy shared by every pipeline stage.
///
/// Each stage surfaces its own variant to the orchestrating caller; nothing in the crate retries
/// or aborts the process on its own.
#[derive(thiserror::Error, Debug)]
pub enum StillclipError {
    /// Rejected input value (zero/negative/unset duration, bad configuration, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Still image could not be decoded or rasterized.
    #[error("render error: {0}")]
    Render(String),

    /// Frame sequence could not be encoded into a video container.
    #[error("encode error: {0}")]
    Encode(String),

    /// Composed timeline could not be exported.
    #[error("export error: {0}")]
    Export(String),

    /// The library refused access to its storage.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The library failed to persist a file.
    #[error("write error: {0}")]
    Write(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StillclipError {
    /// Build an [`StillclipError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`StillclipError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StillclipError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`StillclipError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`StillclipError::PermissionDenied`].
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Build a [`StillclipError::Write`].
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Return `true` for errors a caller may resolve by asking the user and retrying.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
