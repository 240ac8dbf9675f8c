//! Persistence for the owned-games catalog.
//!
//! The catalog stores each [`gamedata::Game`] across two SQLite tables: a
//! header row with the scalar attributes and one child row per supported
//! player mode. [`persistence::SqliteGameRepository`] is the entry point for
//! collaborators; it guarantees its own schema before every operation.

pub mod config;
pub mod persistence;

pub use persistence::{
    CatalogError, Database, Filter, FilterField, FilterValue, GameRepository, MatchMode,
    SqliteGameRepository,
};
