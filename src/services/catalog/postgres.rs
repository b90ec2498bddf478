use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{
        ContentItem, ContentType, Interaction, InteractionKind, Profile, ProfilePreferences,
        DEFAULT_POPULARITY,
    },
    services::catalog::CatalogStore,
};

/// Catalog store reading the `content`, `profiles` and `interactions` tables
///
/// Rows come back ordered by their primary key (interactions by insertion
/// time) so catalog order is the same on every load.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: String,
    title: Option<String>,
    genres: Vec<String>,
    year: Option<i32>,
    content_type: String,
    popularity: Option<f64>,
    rating: Option<f64>,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        let content_type = match row.content_type.as_str() {
            "series" => ContentType::Series,
            _ => ContentType::Movie,
        };

        ContentItem {
            id: row.id,
            title: row.title,
            genres: row.genres,
            year: row.year,
            content_type,
            popularity: row.popularity.unwrap_or(DEFAULT_POPULARITY),
            rating: row.rating,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: String,
    name: Option<String>,
    preferred_genres: Vec<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            name: row.name,
            preferences: ProfilePreferences {
                genres: row.preferred_genres,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct InteractionRow {
    profile_id: String,
    content_id: String,
    interaction_type: String,
    duration_secs: Option<f64>,
    created_at: Option<DateTime<Utc>>,
}

impl From<InteractionRow> for Interaction {
    fn from(row: InteractionRow) -> Self {
        Interaction {
            profile_id: row.profile_id,
            content_id: row.content_id,
            kind: InteractionKind::from(row.interaction_type),
            timestamp: row.created_at,
            duration: row.duration_secs,
        }
    }
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn load_content_catalog(&self) -> AppResult<Vec<ContentItem>> {
        let rows: Vec<ContentRow> = sqlx::query_as(
            r#"
            SELECT id, title, genres, year, content_type, popularity, rating
            FROM content
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn load_profile_catalog(&self) -> AppResult<Vec<Profile>> {
        let rows: Vec<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, name, preferred_genres
            FROM profiles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn load_interaction_log(&self) -> AppResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(
            r#"
            SELECT profile_id, content_id, interaction_type, duration_secs, created_at
            FROM interactions
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Interaction::from).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
