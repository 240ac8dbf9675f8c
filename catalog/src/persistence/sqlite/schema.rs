//! Idempotent creation of the two backing tables.

use sqlx::SqlitePool;

use crate::persistence::CatalogError;

/// Header table: one row per game.
pub const GAMES_TABLE: &str = "gamedata_info";

/// Child table: one row per (game, player mode).
pub const MODES_TABLE: &str = "gamedata_player_modes";

const CREATE_GAMES: &str = r#"
    CREATE TABLE IF NOT EXISTS gamedata_info (
        id                    TEXT PRIMARY KEY NOT NULL,
        title                 TEXT NOT NULL,
        title_folded          TEXT NOT NULL DEFAULT '',
        description           TEXT NOT NULL DEFAULT '',
        release_date          TEXT NOT NULL DEFAULT '',
        genre                 TEXT NOT NULL DEFAULT '',
        cloud                 INTEGER NOT NULL DEFAULT 0,
        series_x              INTEGER NOT NULL DEFAULT 0,
        xbox_one              INTEGER NOT NULL DEFAULT 0,
        windows               INTEGER NOT NULL DEFAULT 0,
        crossplat_multiplayer INTEGER NOT NULL DEFAULT 0,
        crossplat_coop        INTEGER NOT NULL DEFAULT 0,
        favorite              INTEGER NOT NULL DEFAULT 0
    )
"#;

// row_id only gives joined rows a stable order; (game_id, mode) is the key.
const CREATE_MODES: &str = r#"
    CREATE TABLE IF NOT EXISTS gamedata_player_modes (
        row_id      INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id     TEXT NOT NULL REFERENCES gamedata_info(id) ON DELETE CASCADE,
        mode        TEXT NOT NULL,
        min_players INTEGER NOT NULL CHECK (min_players BETWEEN 0 AND 4294967295),
        max_players INTEGER NOT NULL CHECK (max_players BETWEEN 0 AND 4294967295),
        UNIQUE (game_id, mode)
    )
"#;

const TABLES: [(&str, &str); 2] = [(GAMES_TABLE, CREATE_GAMES), (MODES_TABLE, CREATE_MODES)];

/// Create whichever of the two tables is missing.
///
/// Safe to call concurrently: a caller that loses the race to create a table
/// sees `IF NOT EXISTS` succeed. DDL failures surface as
/// [`CatalogError::Schema`] and are not retried.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), CatalogError> {
    for (table, ddl) in TABLES {
        if table_exists(pool, table).await? {
            continue;
        }
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(CatalogError::Schema)?;
        tracing::info!(table, "created table");
    }
    Ok(())
}

/// Drop both tables, children first.
pub async fn drop_tables(pool: &SqlitePool) -> Result<(), CatalogError> {
    let mut tx = pool.begin().await?;
    for (table, _) in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&mut *tx)
            .await
            .map_err(CatalogError::Schema)?;
    }
    tx.commit().await?;
    tracing::info!("dropped catalog tables");
    Ok(())
}

async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, CatalogError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::Database;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(pool)
                .await
                .unwrap();
        rows.into_iter().map(|r| r.0).collect()
    }

    #[tokio::test]
    async fn test_creates_both_tables() {
        let db = Database::new_in_memory().await.unwrap();
        let names = table_names(db.pool()).await;
        assert!(names.contains(&GAMES_TABLE.to_string()));
        assert!(names.contains(&MODES_TABLE.to_string()));
    }

    #[tokio::test]
    async fn test_ensure_twice_is_noop() {
        let db = Database::new_in_memory().await.unwrap();
        sqlx::query("INSERT INTO gamedata_info (id, title) VALUES ('tetris', 'Tetris')")
            .execute(db.pool())
            .await
            .unwrap();

        ensure_schema(db.pool()).await.unwrap();
        ensure_schema(db.pool()).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gamedata_info")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_recreates_missing_child_table() {
        let db = Database::new_in_memory().await.unwrap();
        sqlx::query("DROP TABLE gamedata_player_modes")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(!table_exists(db.pool(), MODES_TABLE).await.unwrap());

        ensure_schema(db.pool()).await.unwrap();
        assert!(table_exists(db.pool(), MODES_TABLE).await.unwrap());
    }

    #[tokio::test]
    async fn test_drop_tables() {
        let db = Database::new_in_memory().await.unwrap();
        drop_tables(db.pool()).await.unwrap();
        assert!(!table_exists(db.pool(), GAMES_TABLE).await.unwrap());
        assert!(!table_exists(db.pool(), MODES_TABLE).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_mode_rejected_by_store() {
        let db = Database::new_in_memory().await.unwrap();
        sqlx::query("INSERT INTO gamedata_info (id, title) VALUES ('halo', 'Halo')")
            .execute(db.pool())
            .await
            .unwrap();
        let insert = "INSERT INTO gamedata_player_modes (game_id, mode, min_players, max_players) \
                      VALUES ('halo', 'local-co-op', 2, 4)";
        sqlx::query(insert).execute(db.pool()).await.unwrap();
        let err = sqlx::query(insert).execute(db.pool()).await.unwrap_err();
        match err {
            sqlx::Error::Database(e) => assert!(e.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_player_count_rejected_by_store() {
        let db = Database::new_in_memory().await.unwrap();
        sqlx::query("INSERT INTO gamedata_info (id, title) VALUES ('halo', 'Halo')")
            .execute(db.pool())
            .await
            .unwrap();
        for (min, max) in [(-1_i64, 4_i64), (1, 4_294_967_296)] {
            let err = sqlx::query(
                "INSERT INTO gamedata_player_modes (game_id, mode, min_players, max_players) \
                 VALUES ('halo', 'local-co-op', ?, ?)",
            )
            .bind(min)
            .bind(max)
            .execute(db.pool())
            .await
            .unwrap_err();
            match err {
                sqlx::Error::Database(e) => assert!(e.is_check_violation(), "{min}..{max}"),
                other => panic!("expected check violation, got {other:?}"),
            }
        }
    }
}
