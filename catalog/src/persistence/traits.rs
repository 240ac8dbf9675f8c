//! Async repository trait for the game catalog.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send` and can be driven from `tokio::spawn`
//! by whatever transport sits in front of the catalog.

use super::{CatalogError, Filter};
use gamedata::Game;
use std::future::Future;

/// Repository for games and their player modes.
///
/// Every operation guarantees the backing schema first. Writes touch both the
/// header and the child table inside one transaction.
pub trait GameRepository: Send + Sync {
    /// Create any missing tables. Idempotent.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Insert a new game. Fails with `DuplicateKey` if the id exists and
    /// with `ConstraintViolation` if two player modes share a name.
    fn add(&self, game: &Game) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Games matching every filter; an empty slice returns all games.
    fn query(
        &self,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<Game>, CatalogError>> + Send;

    /// A single game by id. Fails with `NotFound` if absent.
    fn get(&self, id: &str) -> impl Future<Output = Result<Game, CatalogError>> + Send;

    /// Overwrite the header and reconcile player modes against `game`.
    /// Fails with `NotFound` if the id does not exist.
    fn update(&self, game: &Game) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Delete a game and all of its player modes. Missing ids are a no-op.
    fn remove(&self, id: &str) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Drop both tables and recreate them empty.
    fn rebuild(&self) -> impl Future<Output = Result<(), CatalogError>> + Send;
}
