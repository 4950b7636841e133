use thiserror::Error;

use crate::{resources::ResourceKind, templates::TemplateError};

/// Failures that abort the controller. Conditions the controller tolerates
/// (a Service that can be neither created nor updated) never surface here.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("Object is missing metadata!")]
    MissingObjectMetadata,
    #[error("Couldn't render a resource! Reason: {}", .0)]
    TemplateError(TemplateError),
    #[error("Couldn't create or update '{name}' {kind}! Create: {create}, update: {update}")]
    ApplyError {
        kind: ResourceKind,
        name: String,
        create: kube::Error,
        update: kube::Error,
    },
    #[error("Couldn't watch ingresses in '{namespace}' namespace! Reason: {error}")]
    SubscriptionOpenError { namespace: String, error: kube::Error },
}

impl ReconcilerError {
    /// Process exit code used by the controller binary for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReconcilerError::SubscriptionOpenError { .. } => 8,
            ReconcilerError::TemplateError(_) => 9,
            ReconcilerError::ApplyError { .. } => 10,
            ReconcilerError::MissingObjectMetadata => 11,
        }
    }
}

