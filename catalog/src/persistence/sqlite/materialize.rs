//! Folding flat joined rows back into nested games.

use std::collections::HashMap;

use gamedata::{Game, GameAttributes, PlayerMode};

use crate::persistence::CatalogError;

/// One row of the header ⟕ player-mode join, mapped via `sqlx::FromRow`.
///
/// The child columns are NULL when the game has no player modes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub release_date: String,
    pub genre: String,
    pub cloud: bool,
    pub series_x: bool,
    pub xbox_one: bool,
    pub windows: bool,
    pub crossplat_multiplayer: bool,
    pub crossplat_coop: bool,
    pub favorite: bool,
    pub mode_row_id: Option<i64>,
    pub mode: Option<String>,
    pub min_players: Option<i64>,
    pub max_players: Option<i64>,
}

impl GameRow {
    fn attributes(&self) -> GameAttributes {
        GameAttributes {
            title: self.title.clone(),
            description: self.description.clone(),
            release_date: self.release_date.clone(),
            genre: self.genre.clone(),
            cloud: self.cloud,
            series_x: self.series_x,
            xbox_one: self.xbox_one,
            windows: self.windows,
            crossplat_multiplayer: self.crossplat_multiplayer,
            crossplat_coop: self.crossplat_coop,
            favorite: self.favorite,
        }
    }

    /// The child side of the row. The surrogate row id decides presence.
    fn player_mode(&self) -> Result<Option<PlayerMode>, CatalogError> {
        if self.mode_row_id.is_none() {
            return Ok(None);
        }
        match (&self.mode, self.min_players, self.max_players) {
            (Some(mode), Some(min), Some(max)) => Ok(Some(PlayerMode::new(
                mode.clone(),
                player_count(min, &self.id, mode)?,
                player_count(max, &self.id, mode)?,
            ))),
            _ => Ok(None),
        }
    }
}

/// Convert a stored player count, rejecting values outside `u32`.
pub(crate) fn player_count(value: i64, game_id: &str, mode: &str) -> Result<u32, CatalogError> {
    u32::try_from(value).map_err(|_| {
        CatalogError::CorruptRow(format!(
            "game {game_id} mode {mode} has out-of-range player count {value}"
        ))
    })
}

/// Group rows by game id into games, in order of each id's first appearance.
///
/// Header attributes come from the first row of each group. Player modes are
/// appended in row order; a group whose rows carry no child columns yields an
/// empty list. A player count outside `u32` fails with
/// [`CatalogError::CorruptRow`].
pub fn materialize<I>(rows: I) -> Result<Vec<Game>, CatalogError>
where
    I: IntoIterator<Item = GameRow>,
{
    let mut games: Vec<Game> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.id) {
            Some(&i) => i,
            None => {
                games.push(Game::new(row.id.clone(), row.attributes()));
                index.insert(row.id.clone(), games.len() - 1);
                games.len() - 1
            }
        };
        if let Some(mode) = row.player_mode()? {
            games[slot].player_modes.push(mode);
        }
    }

    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(id: &str, title: &str) -> GameRow {
        GameRow {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            release_date: "2021-11-09".to_string(),
            genre: "Racing".to_string(),
            cloud: true,
            series_x: true,
            xbox_one: false,
            windows: true,
            crossplat_multiplayer: true,
            crossplat_coop: false,
            favorite: false,
            mode_row_id: None,
            mode: None,
            min_players: None,
            max_players: None,
        }
    }

    fn with_mode(mut row: GameRow, row_id: i64, mode: &str, min: i64, max: i64) -> GameRow {
        row.mode_row_id = Some(row_id);
        row.mode = Some(mode.to_string());
        row.min_players = Some(min);
        row.max_players = Some(max);
        row
    }

    #[test]
    fn empty_input_gives_no_games() {
        assert!(materialize(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn null_children_give_empty_mode_list() {
        let games = materialize(vec![header("tetris", "Tetris")]).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "tetris");
        assert!(games[0].player_modes.is_empty());
        assert_eq!(games[0].attributes.genre, "Racing");
        assert!(games[0].attributes.windows);
    }

    #[test]
    fn groups_rows_into_one_game() {
        let rows = vec![
            with_mode(header("forza", "Forza"), 1, "single-player", 1, 1),
            with_mode(header("forza", "Forza"), 2, "online-multiplayer", 2, 12),
        ];
        let games = materialize(rows).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(
            games[0].player_modes,
            vec![
                PlayerMode::new("single-player", 1, 1),
                PlayerMode::new("online-multiplayer", 2, 12),
            ]
        );
    }

    #[test]
    fn scattered_rows_keep_first_appearance_order() {
        let rows = vec![
            with_mode(header("b", "B"), 1, "local-co-op", 2, 4),
            header("a", "A"),
            with_mode(header("b", "B"), 3, "online-co-op", 2, 4),
            with_mode(header("c", "C"), 4, "single-player", 1, 1),
        ];
        let games = materialize(rows).unwrap();
        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(games[0].player_modes.len(), 2);
        assert_eq!(games[0].player_modes[1].mode, "online-co-op");
        assert!(games[1].player_modes.is_empty());
    }

    #[test]
    fn row_without_surrogate_id_is_not_a_child() {
        let mut row = header("halo", "Halo");
        row.mode = Some("single-player".to_string());
        row.min_players = Some(1);
        row.max_players = Some(1);
        let games = materialize(vec![row]).unwrap();
        assert!(games[0].player_modes.is_empty());
    }

    #[test]
    fn negative_player_count_is_corrupt() {
        let row = with_mode(header("halo", "Halo"), 1, "local-co-op", -1, 4);
        let err = materialize(vec![row]).unwrap_err();
        assert!(matches!(err, CatalogError::CorruptRow(ref msg) if msg.contains("-1")));
    }

    #[test]
    fn oversized_player_count_is_corrupt() {
        let row = with_mode(header("halo", "Halo"), 1, "local-co-op", 1, i64::from(u32::MAX) + 1);
        assert!(matches!(
            materialize(vec![row]),
            Err(CatalogError::CorruptRow(_))
        ));
    }

    #[test]
    fn player_count_accepts_u32_range() {
        assert_eq!(player_count(0, "g", "m").unwrap(), 0);
        assert_eq!(player_count(i64::from(u32::MAX), "g", "m").unwrap(), u32::MAX);
    }
}
