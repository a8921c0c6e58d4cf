//! Error types for `fleet-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{store::Collection, vehicle::VehicleStatus};

/// A boxed error raised by a [`CollectionStore`](crate::store::CollectionStore)
/// backend.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("driver not found: {0}")]
  DriverNotFound(Uuid),

  #[error("vehicle not found: {0}")]
  VehicleNotFound(Uuid),

  #[error("vehicle {id} is {status}, not available")]
  VehicleUnavailable { id: Uuid, status: VehicleStatus },

  #[error("vehicle {0} already has an active assignment")]
  VehicleAlreadyAssigned(Uuid),

  #[error("driver {0} is not active")]
  DriverInactive(Uuid),

  #[error("failed to persist {collection}: {source}")]
  Persist {
    collection: Collection,
    #[source]
    source:     StoreError,
  },

  #[error("failed to load {collection}: {source}")]
  Load {
    collection: Collection,
    #[source]
    source:     StoreError,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
