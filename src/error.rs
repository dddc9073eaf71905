// Errors raised while mirroring a run

use crate::client::ClientError;
use crate::model::RemoteId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("no scenario is open for {event}")]
    NoActiveScenario { event: &'static str },

    #[error("item '{name}' already has remote id {existing}")]
    IdentityReassigned { name: String, existing: RemoteId },

    #[error("feature uri '{uri}' has no path segments")]
    EmptyPath { uri: String },
}
