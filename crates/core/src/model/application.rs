use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::{check_length, Payload, ValidationError};

/// Branding, social credentials, CDN and per-environment host settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn: Option<CdnSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Environments>,
    /// Keys without a typed field, stored and returned as submitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apple_news: Option<AppleNewsCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<FacebookCredentials>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleNewsCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbia_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_keys: Option<CacheKeys>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<CdnServices>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheKeys {
    #[serde(
        rename = "channelAPI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub channel_api: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CdnServices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Hostname>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Hostname>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hostname {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<EnvironmentHosts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging: Option<EnvironmentHosts>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentHosts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A site or app run by an organization. Owns the content entities.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub organization_id: Uuid,
    pub title: String,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub meta: ApplicationMeta,
}

impl Record for Application {
    const TABLE: &'static str = "applications";
    const NAME: &'static str = "application";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub organization_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub status: LifecycleStatus,
    pub meta: ApplicationMeta,
}

impl Payload for NewApplication {
    const REQUIRED: &'static [&'static str] = &["organizationId", "title", "meta"];

    fn check(&self, errors: &mut ValidationError) {
        check_length(errors, "title", &self.title, 1, 255);
    }
}

impl Insert for NewApplication {
    type Record = Application;

    async fn insert(self, pool: &PgPool) -> Result<Application, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (id, sid, created_at, status, organization_id, title, meta)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.organization_id)
        .bind(&self.title)
        .bind(Json(&self.meta))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
