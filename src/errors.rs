use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the status API.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error("Failed to load webhook definitions from {path}: {message}")]
    WebhookFile { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("State store error ({store}): {message}")]
    Backend { store: String, message: String },
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("K8s API error: {0}")]
    K8sApi(String),

    #[error("Unparseable image reference: {0}")]
    InvalidImage(String),
}

/// Provider error, carrying the provider's own classification code.
#[derive(Debug, Error)]
#[error("CDN provider error [{code}]: {message}")]
pub struct CdnError {
    pub code: String,
    pub message: String,
}

impl CdnError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Failure classes used to decide how loudly a task failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TransientInfra,
    Superseded,
    Timeout,
    NotFound,
}

/// Everything that can stop a coordination task early.
#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("Deployment {workload} updated to {found} while waiting on replicas for tag {expected}")]
    Superseded {
        workload: String,
        expected: String,
        found: String,
    },

    #[error("No replicas found for selector {selector} of {workload}")]
    NoReplicas { workload: String, selector: String },

    #[error("Replicas of {workload} not ready for tag {tag} in time")]
    ReadinessTimeout { workload: String, tag: String },

    #[error("Rollout of {workload}:{tag} did not complete in time on peer {peer}")]
    PeerTimeout {
        peer: String,
        workload: String,
        tag: String,
    },

    #[error("Failed to read {workload} from peer {peer}: {source}")]
    PeerReadError {
        peer: String,
        workload: String,
        #[source]
        source: StoreError,
    },

    #[error("No public host found for {workload}")]
    MissingHost { workload: String },

    #[error("No distribution found for host {host}")]
    DistributionNotFound { host: String },

    #[error("Invalidation {invalidation_id} on {distribution_id} did not complete in time")]
    InvalidationTimeout {
        distribution_id: String,
        invalidation_id: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Cdn(#[from] CdnError),
}

impl CoordinationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoordinationError::Superseded { .. } => ErrorKind::Superseded,
            CoordinationError::ReadinessTimeout { .. }
            | CoordinationError::PeerTimeout { .. }
            | CoordinationError::InvalidationTimeout { .. } => ErrorKind::Timeout,
            CoordinationError::NoReplicas { .. }
            | CoordinationError::MissingHost { .. }
            | CoordinationError::DistributionNotFound { .. } => ErrorKind::NotFound,
            CoordinationError::PeerReadError { .. }
            | CoordinationError::Store(_)
            | CoordinationError::Platform(_)
            | CoordinationError::Cdn(_) => ErrorKind::TransientInfra,
        }
    }
}
