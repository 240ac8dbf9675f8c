//! Player configurations and the recommended mode vocabulary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Mode names offered by the UI. Storage accepts any string.
pub const KNOWN_MODES: [&str; 5] = [
    "single-player",
    "local-multiplayer",
    "local-co-op",
    "online-multiplayer",
    "online-co-op",
];

/// Whether `mode` is one of [`KNOWN_MODES`].
pub fn is_known_mode(mode: &str) -> bool {
    KNOWN_MODES.contains(&mode)
}

/// One supported player configuration, e.g. local co-op for 2 to 4 players.
///
/// `min_players <= max_players` is expected but not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMode {
    #[serde(alias = "playerType")]
    pub mode: String,
    pub min_players: u32,
    pub max_players: u32,
}

impl PlayerMode {
    pub fn new(mode: impl Into<String>, min_players: u32, max_players: u32) -> Self {
        Self {
            mode: mode.into(),
            min_players,
            max_players,
        }
    }
}

/// Mode names that appear more than once in `modes`, in first-repeat order.
pub fn duplicate_modes(modes: &[PlayerMode]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for m in modes {
        if !seen.insert(m.mode.as_str()) && !dupes.contains(&m.mode.as_str()) {
            dupes.push(m.mode.as_str());
        }
    }
    dupes
}
