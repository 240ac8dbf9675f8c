//! Domain types for the owned-games catalog.
//!
//! A [`Game`] is the aggregate root: a header of scalar [`GameAttributes`] plus
//! a list of [`PlayerMode`] entries describing the supported player
//! configurations. The types here carry no storage concerns; persistence lives
//! in the `gamedata-catalog` crate.

pub mod game;
pub mod mode;

pub use game::{Game, GameAttributes};
pub use mode::{duplicate_modes, is_known_mode, PlayerMode, KNOWN_MODES};
