use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::Payload;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub application_id: Uuid,
    pub slug: String,
    pub title: String,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub meta: CategoryMeta,
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const NAME: &'static str = "category";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub application_id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub status: LifecycleStatus,
    #[serde(default)]
    pub meta: CategoryMeta,
}

impl Payload for NewCategory {
    const REQUIRED: &'static [&'static str] = &["applicationId", "slug", "title"];
}

impl Insert for NewCategory {
    type Record = Category;

    async fn insert(self, pool: &PgPool) -> Result<Category, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, sid, created_at, status, application_id, slug, title, meta)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.application_id)
        .bind(&self.slug)
        .bind(&self.title)
        .bind(Json(&self.meta))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
