//! SQLite-backed repository for games.

use gamedata::{duplicate_modes, Game, PlayerMode};
use sqlx::{SqliteConnection, SqlitePool};

use super::materialize::{materialize, player_count, GameRow};
use super::query::GameQuery;
use super::{reconcile, schema};
use crate::persistence::traits::GameRepository;
use crate::persistence::{CatalogError, Filter};

/// SQLite implementation of [`GameRepository`].
///
/// Holds no state besides the pool; everything lives in the database.
pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, query: &GameQuery) -> Result<Vec<Game>, CatalogError> {
        let mut qb = query.build();
        let rows: Vec<GameRow> = qb.build_query_as::<GameRow>().fetch_all(&self.pool).await?;
        materialize(rows)
    }
}

impl GameRepository for SqliteGameRepository {
    async fn ensure_schema(&self) -> Result<(), CatalogError> {
        schema::ensure_schema(&self.pool).await
    }

    async fn add(&self, game: &Game) -> Result<(), CatalogError> {
        schema::ensure_schema(&self.pool).await?;
        reject_duplicate_modes(game)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO gamedata_info
                (id, title, title_folded, description, release_date, genre, cloud,
                 series_x, xbox_one, windows, crossplat_multiplayer, crossplat_coop,
                 favorite)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&game.id)
        .bind(&game.attributes.title)
        .bind(game.attributes.title.to_lowercase())
        .bind(&game.attributes.description)
        .bind(&game.attributes.release_date)
        .bind(&game.attributes.genre)
        .bind(game.attributes.cloud)
        .bind(game.attributes.series_x)
        .bind(game.attributes.xbox_one)
        .bind(game.attributes.windows)
        .bind(game.attributes.crossplat_multiplayer)
        .bind(game.attributes.crossplat_coop)
        .bind(game.attributes.favorite)
        .execute(&mut *tx)
        .await
        .map_err(|e| CatalogError::from_insert(e, &game.id))?;

        for mode in &game.player_modes {
            insert_mode(&mut *tx, &game.id, mode).await?;
        }

        tx.commit().await?;
        tracing::info!(id = %game.id, modes = game.player_modes.len(), "added game");
        Ok(())
    }

    async fn query(&self, filters: &[Filter]) -> Result<Vec<Game>, CatalogError> {
        schema::ensure_schema(&self.pool).await?;
        self.fetch(&GameQuery::new(filters.to_vec())).await
    }

    async fn get(&self, id: &str) -> Result<Game, CatalogError> {
        schema::ensure_schema(&self.pool).await?;
        self.fetch(&GameQuery::by_id(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn update(&self, game: &Game) -> Result<(), CatalogError> {
        schema::ensure_schema(&self.pool).await?;
        reject_duplicate_modes(game)?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE gamedata_info
            SET title = ?, title_folded = ?, description = ?, release_date = ?, genre = ?,
                cloud = ?, series_x = ?, xbox_one = ?, windows = ?,
                crossplat_multiplayer = ?, crossplat_coop = ?, favorite = ?
            WHERE id = ?
            "#,
        )
        .bind(&game.attributes.title)
        .bind(game.attributes.title.to_lowercase())
        .bind(&game.attributes.description)
        .bind(&game.attributes.release_date)
        .bind(&game.attributes.genre)
        .bind(game.attributes.cloud)
        .bind(game.attributes.series_x)
        .bind(game.attributes.xbox_one)
        .bind(game.attributes.windows)
        .bind(game.attributes.crossplat_multiplayer)
        .bind(game.attributes.crossplat_coop)
        .bind(game.attributes.favorite)
        .bind(&game.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Dropping `tx` rolls back.
        if updated == 0 {
            return Err(CatalogError::NotFound(game.id.clone()));
        }

        let stored = load_modes(&mut *tx, &game.id).await?;
        let plan = reconcile::plan(&stored, &game.player_modes);
        tracing::debug!(
            id = %game.id,
            deletes = plan.deletes.len(),
            updates = plan.updates.len(),
            inserts = plan.inserts.len(),
            unchanged = plan.unchanged,
            "reconciling player modes"
        );

        for mode in &plan.deletes {
            sqlx::query("DELETE FROM gamedata_player_modes WHERE game_id = ? AND mode = ?")
                .bind(&game.id)
                .bind(mode)
                .execute(&mut *tx)
                .await?;
        }

        for mode in &plan.updates {
            sqlx::query(
                r#"
                UPDATE gamedata_player_modes
                SET min_players = ?, max_players = ?
                WHERE game_id = ? AND mode = ?
                "#,
            )
            .bind(i64::from(mode.min_players))
            .bind(i64::from(mode.max_players))
            .bind(&game.id)
            .bind(&mode.mode)
            .execute(&mut *tx)
            .await?;
        }

        for mode in &plan.inserts {
            insert_mode(&mut *tx, &game.id, mode).await?;
        }

        tx.commit().await?;
        tracing::info!(id = %game.id, modes = game.player_modes.len(), "updated game");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), CatalogError> {
        schema::ensure_schema(&self.pool).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM gamedata_player_modes WHERE game_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM gamedata_info WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if removed == 0 {
            tracing::debug!(id, "remove: no such game");
        } else {
            tracing::info!(id, "removed game");
        }
        Ok(())
    }

    async fn rebuild(&self) -> Result<(), CatalogError> {
        schema::drop_tables(&self.pool).await?;
        schema::ensure_schema(&self.pool).await
    }
}

fn reject_duplicate_modes(game: &Game) -> Result<(), CatalogError> {
    let dupes = duplicate_modes(&game.player_modes);
    if dupes.is_empty() {
        return Ok(());
    }
    Err(CatalogError::ConstraintViolation(format!(
        "game {} lists player mode(s) more than once: {}",
        game.id,
        dupes.join(", ")
    )))
}

async fn insert_mode(
    conn: &mut SqliteConnection,
    game_id: &str,
    mode: &PlayerMode,
) -> Result<(), CatalogError> {
    sqlx::query(
        r#"
        INSERT INTO gamedata_player_modes (game_id, mode, min_players, max_players)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(game_id)
    .bind(&mode.mode)
    .bind(i64::from(mode.min_players))
    .bind(i64::from(mode.max_players))
    .execute(conn)
    .await?;
    Ok(())
}

/// Stored player modes for a game, in insertion order.
async fn load_modes(
    conn: &mut SqliteConnection,
    game_id: &str,
) -> Result<Vec<PlayerMode>, CatalogError> {
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        r#"
        SELECT mode, min_players, max_players
        FROM gamedata_player_modes
        WHERE game_id = ?
        ORDER BY row_id
        "#,
    )
    .bind(game_id)
    .fetch_all(conn)
    .await?;

    rows.into_iter()
        .map(|(mode, min, max)| {
            let min = player_count(min, game_id, &mode)?;
            let max = player_count(max, game_id, &mode)?;
            Ok(PlayerMode::new(mode, min, max))
        })
        .collect()
}
