use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqliteConnection, SqlitePool};

use super::{FavoritesError, FavoritesSet, FavoritesStore};

/// Favorites in a SQLite table; `position` keeps insertion order.
#[derive(Debug, Clone)]
pub struct SqliteFavoritesStore {
    pool: SqlitePool,
}

impl SqliteFavoritesStore {
    pub async fn connect(database_url: &str) -> Result<Self, FavoritesError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

async fn load_ids(connection: &mut SqliteConnection) -> Result<FavoritesSet, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT resource_id
        FROM favorites
        ORDER BY position ASC
        "#,
    )
    .fetch_all(connection)
    .await?;
    Ok(ids.into_iter().collect())
}

#[async_trait]
impl FavoritesStore for SqliteFavoritesStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> Result<FavoritesSet, FavoritesError> {
        let mut connection = self.pool.acquire().await?;
        Ok(load_ids(&mut connection).await?)
    }

    async fn add(&self, id: &str) -> Result<FavoritesSet, FavoritesError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO favorites (resource_id)
            VALUES (?1)
            ON CONFLICT(resource_id) DO NOTHING
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let set = load_ids(&mut tx).await?;
        tx.commit().await?;
        Ok(set)
    }

    async fn remove(&self, id: &str) -> Result<FavoritesSet, FavoritesError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM favorites WHERE resource_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let set = load_ids(&mut tx).await?;
        tx.commit().await?;
        Ok(set)
    }
}
