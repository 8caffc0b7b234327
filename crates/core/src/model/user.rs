use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::{check_length, Payload, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Role names keyed by application id and by organization id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub organization_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image_id: String,
    pub slug: String,
    pub timezone: String,
    pub bio: String,
    pub hash: String,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub meta: UserMeta,
    #[sqlx(json)]
    pub roles: Roles,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const NAME: &'static str = "user";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub organization_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image_id: String,
    pub slug: String,
    pub timezone: String,
    pub bio: String,
    pub hash: String,
    #[serde(default)]
    pub status: LifecycleStatus,
    pub meta: UserMeta,
    pub roles: Roles,
}

impl Payload for NewUser {
    const REQUIRED: &'static [&'static str] = &[
        "organizationId",
        "username",
        "email",
        "firstName",
        "lastName",
        "imageId",
        "slug",
        "timezone",
        "bio",
        "hash",
        "meta",
        "roles",
    ];

    fn check(&self, errors: &mut ValidationError) {
        check_length(errors, "username", &self.username, 1, 255);
        check_length(errors, "firstName", &self.first_name, 1, 30);
        check_length(errors, "lastName", &self.last_name, 1, 30);
    }
}

impl Insert for NewUser {
    type Record = User;

    async fn insert(self, pool: &PgPool) -> Result<User, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, sid, created_at, status, organization_id, username, email,
                first_name, last_name, image_id, slug, timezone, bio, hash, meta, roles
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.organization_id)
        .bind(&self.username)
        .bind(&self.email)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.image_id)
        .bind(&self.slug)
        .bind(&self.timezone)
        .bind(&self.bio)
        .bind(&self.hash)
        .bind(Json(&self.meta))
        .bind(Json(&self.roles))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
