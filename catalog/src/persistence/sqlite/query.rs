//! SQL construction for game reads.
//!
//! Every read is a left join from `gamedata_info` to `gamedata_player_modes`,
//! so games without player modes still produce one row (with NULL child
//! columns). Header filters become `WHERE` clauses. A mode filter becomes a
//! semi-join against the set of game ids that have that mode, which keeps the
//! matching game's other modes in the result.

use sqlx::{QueryBuilder, Sqlite};

use super::schema::{GAMES_TABLE, MODES_TABLE};
use crate::persistence::{Filter, FilterField, FilterValue, MatchMode};

const SELECT_COLUMNS: &str = "SELECT g.id, g.title, g.description, g.release_date, g.genre, \
     g.cloud, g.series_x, g.xbox_one, g.windows, g.crossplat_multiplayer, g.crossplat_coop, \
     g.favorite, p.row_id AS mode_row_id, p.mode, p.min_players, p.max_players";

/// Unexecuted description of a game read.
///
/// The same description serves "all games" (no filters), filtered lists and
/// single-id lookups; [`GameQuery::build`] turns it into bound SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    filters: Vec<Filter>,
}

impl GameQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(filters: impl Into<Vec<Filter>>) -> Self {
        Self {
            filters: filters.into(),
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new(vec![Filter::text(FilterField::Id, id)])
    }

    #[cfg(test)]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Build the SQL with every filter value bound as a parameter.
    ///
    /// Rows come back in header insertion order, then child insertion order.
    pub fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(SELECT_COLUMNS);
        qb.push(format_args!(" FROM {GAMES_TABLE} AS g"));

        let modes = self.filters.iter().filter_map(|f| match (&f.field, &f.value) {
            (FilterField::Mode, FilterValue::Text(mode)) => Some(mode.clone()),
            _ => None,
        });
        for (i, mode) in modes.enumerate() {
            qb.push(format_args!(
                " INNER JOIN (SELECT DISTINCT game_id FROM {MODES_TABLE} WHERE mode = "
            ));
            qb.push_bind(mode);
            qb.push(format_args!(") AS pm{i} ON pm{i}.game_id = g.id"));
        }

        qb.push(format_args!(" LEFT JOIN {MODES_TABLE} AS p ON p.game_id = g.id"));

        let mut separator = " WHERE ";
        for filter in &self.filters {
            let Some(column) = filter.field.column() else {
                continue;
            };
            qb.push(separator);
            separator = " AND ";
            match (filter.field.match_mode(), &filter.value) {
                (MatchMode::Substring, FilterValue::Text(needle)) => {
                    let folded = filter.field.folded_column().unwrap_or(column);
                    qb.push(format_args!("g.{folded} LIKE "));
                    qb.push_bind(like_pattern(&needle.to_lowercase()));
                    qb.push(" ESCAPE '\\'");
                }
                (_, FilterValue::Text(value)) => {
                    qb.push(format_args!("g.{column} = "));
                    qb.push_bind(value.clone());
                }
                (_, FilterValue::Bool(value)) => {
                    qb.push(format_args!("g.{column} = "));
                    qb.push_bind(*value);
                }
            }
        }

        qb.push(" ORDER BY g.rowid, p.row_id");
        tracing::debug!(sql = qb.sql(), filters = self.filters.len(), "built game query");
        qb
    }
}

/// `%needle%` with LIKE wildcards in `needle` escaped. Callers lowercase the
/// needle and match it against a column folded the same way.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
