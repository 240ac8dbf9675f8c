//! SQLite-backed catalog storage.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode** — allows one writer and multiple concurrent readers.
//! - **Foreign keys enabled** — enforced at the connection level.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`schema`] | Creates `gamedata_info` / `gamedata_player_modes` when missing |
//! | [`query`] | Builds the header ⟕ player-mode join with filters applied |
//! | [`materialize`] | Folds flat joined rows back into nested [`gamedata::Game`]s |
//! | [`reconcile`] | Diffs stored player modes against an incoming list |
//! | [`SqliteGameRepository`] | Runs the above inside transactions |
//!
//! Every repository operation calls [`schema::ensure_schema`] first, so a
//! fresh database file needs no separate provisioning step.

mod database;
mod game_repo;
pub mod materialize;
pub mod query;
pub mod reconcile;
pub mod schema;

pub use database::Database;
pub use game_repo::SqliteGameRepository;
