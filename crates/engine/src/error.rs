use gpu::SurfaceError;

/// Why a single frame was skipped. The loop keeps running after any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Camera state went NaN/infinite; the last good camera was restored.
    NonFiniteCamera,
    Surface(SurfaceError),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::NonFiniteCamera => write!(f, "camera state is not finite"),
            FrameError::Surface(e) => write!(f, "surface error: {e}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Surface(e) => Some(e),
            FrameError::NonFiniteCamera => None,
        }
    }
}

impl From<SurfaceError> for FrameError {
    fn from(e: SurfaceError) -> Self {
        FrameError::Surface(e)
    }
}
