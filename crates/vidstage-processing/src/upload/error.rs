use vidstage_storage::StorageError;

use crate::validator::ValidationError;
use crate::video::{ProbeError, RemuxError};

/// Why an upload pipeline invocation failed
///
/// Every variant aborts the invocation; temp files are already gone by the
/// time the caller sees the error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Failed to probe video: {message}")]
    Probe {
        message: String,
        stderr: Option<String>,
    },

    #[error("No video streams found")]
    NoStreams,

    #[error("Failed to remux video: {message}")]
    Remux {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Remux produced an empty file")]
    EmptyOutput,

    #[error("Failed to store video: {0}")]
    Store(#[from] StorageError),
}

impl From<ProbeError> for PipelineError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Failed { message, stderr } => PipelineError::Probe { message, stderr },
            ProbeError::NoStreams => PipelineError::NoStreams,
        }
    }
}

impl From<RemuxError> for PipelineError {
    fn from(err: RemuxError) -> Self {
        match err {
            RemuxError::Failed {
                message,
                stderr,
                exit_code,
            } => PipelineError::Remux {
                message,
                stderr,
                exit_code,
            },
            RemuxError::EmptyOutput(_) => PipelineError::EmptyOutput,
        }
    }
}

impl PipelineError {
    /// Short machine-readable reason, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Staging(_) => "staging",
            PipelineError::Probe { .. } => "probe",
            PipelineError::NoStreams => "no_streams",
            PipelineError::Remux { .. } => "remux",
            PipelineError::EmptyOutput => "empty_output",
            PipelineError::Store(_) => "store",
        }
    }

    /// The caller sent something we will never accept. Everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }

    /// Captured stderr of the failing media tool, if any.
    pub fn tool_stderr(&self) -> Option<&str> {
        match self {
            PipelineError::Probe { stderr, .. } | PipelineError::Remux { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }
}
