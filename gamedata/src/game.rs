use serde::{Deserialize, Serialize};

use crate::mode::PlayerMode;

/// An owned game together with its supported player configurations.
///
/// `id` is supplied by the caller and never generated here. It is the primary
/// key of the header row and the foreign key of every player-mode row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    #[serde(alias = "data")]
    pub attributes: GameAttributes,
    #[serde(default, alias = "playerInfo")]
    pub player_modes: Vec<PlayerMode>,
}

impl Game {
    pub fn new(id: impl Into<String>, attributes: GameAttributes) -> Self {
        Self {
            id: id.into(),
            attributes,
            player_modes: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: PlayerMode) -> Self {
        self.player_modes.push(mode);
        self
    }

    /// Look up the entry for `mode`, if the game supports it.
    pub fn mode(&self, mode: &str) -> Option<&PlayerMode> {
        self.player_modes.iter().find(|m| m.mode == mode)
    }

    /// Compare two games ignoring the order of their player modes.
    pub fn same_as(&self, other: &Game) -> bool {
        if self.id != other.id || self.attributes != other.attributes {
            return false;
        }
        let mut ours = self.player_modes.clone();
        let mut theirs = other.player_modes.clone();
        ours.sort_by(|a, b| a.mode.cmp(&b.mode));
        theirs.sort_by(|a, b| a.mode.cmp(&b.mode));
        ours == theirs
    }
}

/// Scalar attributes stored in the header row. All of them are mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAttributes {
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    /// Date-like string as entered by the user, e.g. `2021-11-08`.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub cloud: bool,
    #[serde(default, alias = "seriesx")]
    pub series_x: bool,
    #[serde(default, alias = "xbone", alias = "xbOne")]
    pub xbox_one: bool,
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub crossplat_multiplayer: bool,
    #[serde(default)]
    pub crossplat_coop: bool,
    #[serde(default)]
    pub favorite: bool,
}

impl GameAttributes {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
