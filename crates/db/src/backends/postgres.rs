//! Relational backend over PostgreSQL.
//!
//! The only backend with real uniqueness enforcement: duplicate category
//! ids are rejected by the primary key and surface as
//! [`StoreError::Conflict`].

use async_trait::async_trait;
use atelier_core::naming::{category_slug, picture_id};
use atelier_core::seed::{DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::{Category, CreateCategory, CreatePicture, Picture};
use crate::store::{MetadataStore, StoreError};

/// Column list for `categories` queries.
const CATEGORY_COLUMNS: &str = "id, name, color, created_at";

/// Column list for `pictures` queries.
const PICTURE_COLUMNS: &str = "id, url, file_name, description, category_id, uploaded_at";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Postgres-backed [`MetadataStore`].
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, verify, and migrate in one step.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = create_pool(database_url).await?;
        health_check(&pool).await?;
        run_migrations(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Migration failed: {e}")))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert the default category batch if the table is empty.
    ///
    /// `ON CONFLICT DO NOTHING` makes the batch safe to attempt twice: if a
    /// concurrent first caller seeded between our count and our insert, the
    /// duplicate rows are silently skipped rather than failing the caller.
    async fn seed_if_empty(&self) -> Result<(), StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for seed in DEFAULT_CATEGORIES {
            sqlx::query(
                "INSERT INTO categories (id, name, color) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(seed.id)
            .bind(seed.name)
            .bind(seed.color)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!("Seeded default categories");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.seed_if_empty().await?;
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at, id");
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        let id = category_slug(&input.name);
        let color = input.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR);

        let query = format!(
            "INSERT INTO categories (id, name, color) \
             VALUES ($1, $2, $3) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&id)
            .bind(&input.name)
            .bind(color)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| classify_unique_violation(err, &id))
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Nullify references first: a crash between the two statements
        // leaves a harmless orphaned category, never dangling pictures.
        sqlx::query("UPDATE pictures SET category_id = NULL WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Category",
                id: id.to_string(),
            });
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_pictures(&self) -> Result<Vec<Picture>, StoreError> {
        let query = format!("SELECT {PICTURE_COLUMNS} FROM pictures ORDER BY uploaded_at DESC");
        let pictures = sqlx::query_as::<_, Picture>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(pictures)
    }

    async fn create_picture(&self, input: &CreatePicture) -> Result<Picture, StoreError> {
        let query = format!(
            "INSERT INTO pictures (id, url, file_name, description, category_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PICTURE_COLUMNS}"
        );
        let picture = sqlx::query_as::<_, Picture>(&query)
            .bind(picture_id())
            .bind(&input.url)
            .bind(&input.file_name)
            .bind(input.description.as_deref())
            .bind(input.category_id.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(picture)
    }

    async fn update_picture_category(
        &self,
        picture_id: &str,
        category_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE pictures SET category_id = $2 WHERE id = $1")
            .bind(picture_id)
            .bind(category_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Picture",
                id: picture_id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_picture(&self, picture_id: &str) -> Result<String, StoreError> {
        let url: Option<String> =
            sqlx::query_scalar("DELETE FROM pictures WHERE id = $1 RETURNING url")
                .bind(picture_id)
                .fetch_optional(&self.pool)
                .await?;
        url.ok_or_else(|| StoreError::NotFound {
            entity: "Picture",
            id: picture_id.to_string(),
        })
    }

    async fn delete_all_pictures(&self) -> Result<Vec<String>, StoreError> {
        let urls: Vec<String> = sqlx::query_scalar("DELETE FROM pictures RETURNING url")
            .fetch_all(&self.pool)
            .await?;
        Ok(urls)
    }
}

/// Map a PostgreSQL unique violation (code 23505) on category insert to
/// [`StoreError::Conflict`]; pass everything else through.
fn classify_unique_violation(err: sqlx::Error, id: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::Conflict(format!("Category '{id}' already exists"));
        }
    }
    StoreError::Database(err)
}
