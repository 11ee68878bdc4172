//! Refresh trait for re-fetching server state.

use async_trait::async_trait;

use crate::error::Result;

/// Re-fetch an entity from the server.
///
/// Local attributes, links and messages are replaced wholesale by the
/// server's answer. Children that were already loaded are reloaded, so
/// entities deleted elsewhere disappear from in-memory lists.
#[async_trait]
pub trait Refresh {
    /// Reload the entity.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::NotFound`](crate::OpenShiftError::NotFound)
    /// if the entity no longer exists on the server.
    async fn refresh(&mut self) -> Result<()>;
}
