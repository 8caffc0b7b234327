use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::{Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::Payload;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Top-level tenant. Owns applications.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub title: String,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub meta: OrganizationMeta,
}

impl Record for Organization {
    const TABLE: &'static str = "organizations";
    const NAME: &'static str = "organization";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub status: LifecycleStatus,
    pub meta: OrganizationMeta,
}

impl Payload for NewOrganization {
    const REQUIRED: &'static [&'static str] = &["title", "desc", "meta"];
}

impl Insert for NewOrganization {
    type Record = Organization;

    async fn insert(self, pool: &PgPool) -> Result<Organization, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (id, sid, created_at, status, title, description, meta)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(&self.title)
        .bind(&self.desc)
        .bind(Json(&self.meta))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
