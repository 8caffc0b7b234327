use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::{check_length, Payload, ValidationError};

/// A named feed slot: documents from the given category slugs, capped at
/// `limit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_slugs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub application_id: Uuid,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub slug: String,
    pub title: String,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub resources: Vec<ChannelResource>,
}

impl Record for Channel {
    const TABLE: &'static str = "channels";
    const NAME: &'static str = "channel";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChannel {
    pub application_id: Uuid,
    pub desc: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub status: LifecycleStatus,
    pub resources: Vec<ChannelResource>,
}

impl Payload for NewChannel {
    const REQUIRED: &'static [&'static str] =
        &["applicationId", "desc", "slug", "title", "resources"];

    fn check(&self, errors: &mut ValidationError) {
        check_length(errors, "title", &self.title, 1, 255);
    }
}

impl Insert for NewChannel {
    type Record = Channel;

    async fn insert(self, pool: &PgPool) -> Result<Channel, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, Channel>(
            r#"
            INSERT INTO channels (
                id, sid, created_at, status, application_id, description, slug, title, resources
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.application_id)
        .bind(&self.desc)
        .bind(&self.slug)
        .bind(&self.title)
        .bind(Json(&self.resources))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
