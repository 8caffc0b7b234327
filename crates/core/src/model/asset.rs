use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{text_enum, Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::Payload;

text_enum! {
    /// Processing state of an uploaded asset.
    #[derive(Default)]
    pub enum AssetState {
        Processing => "processing",
        #[default]
        Ready => "ready",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// File, embed and crop details. Key names follow the upstream upload and
/// oEmbed providers, hence the mix of snake and camel case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    #[serde(
        rename = "originalEmbedUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_embed_url: Option<String>,
    #[serde(
        rename = "originalFileUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
    #[serde(
        rename = "customWidth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_width: Option<Number>,
    #[serde(
        rename = "customHeight",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_height: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    #[serde(default)]
    pub state: AssetState,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Keys without a typed field, stored and returned as submitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An uploaded image, video or embed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DigitalAsset {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub application_id: Uuid,
    pub title: Option<String>,
    #[sqlx(rename = "description")]
    pub desc: Option<String>,
    pub mimetype: String,
    pub attribution: bool,
    pub html: Option<String>,
    pub filename: Option<String>,
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub meta: AssetMeta,
}

impl Record for DigitalAsset {
    const TABLE: &'static str = "digital_assets";
    const NAME: &'static str = "digital asset";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDigitalAsset {
    pub application_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    pub mimetype: String,
    #[serde(default)]
    pub attribution: bool,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: LifecycleStatus,
    pub meta: AssetMeta,
}

impl Payload for NewDigitalAsset {
    const REQUIRED: &'static [&'static str] = &["applicationId", "mimetype", "meta"];
    const NON_NULLABLE: &'static [&'static str] = &["attribution", "tags", "status"];
}

impl Insert for NewDigitalAsset {
    type Record = DigitalAsset;

    async fn insert(self, pool: &PgPool) -> Result<DigitalAsset, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, DigitalAsset>(
            r#"
            INSERT INTO digital_assets (
                id, sid, created_at, status, application_id, title, description,
                mimetype, attribution, html, filename, url, tags, meta
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.application_id)
        .bind(&self.title)
        .bind(&self.desc)
        .bind(&self.mimetype)
        .bind(self.attribution)
        .bind(&self.html)
        .bind(&self.filename)
        .bind(&self.url)
        .bind(&self.tags)
        .bind(Json(&self.meta))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse;
    use serde_json::json;

    #[test]
    fn numeric_meta_keeps_integer_representation() {
        let asset: NewDigitalAsset = parse(json!({
            "applicationId": "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c",
            "mimetype": "image/png",
            "meta": {
                "width": 1200,
                "cache_age": 3600,
                "crop": { "aspect": 1.5, "x": 0, "y": 10 },
                "customWidth": 640,
                "state": "processing",
                "type": "photo"
            }
        }))
        .unwrap();

        let meta = serde_json::to_value(&asset.meta).unwrap();
        assert_eq!(meta["width"], json!(1200));
        assert_eq!(meta["crop"]["aspect"], json!(1.5));
        assert_eq!(meta["customWidth"], json!(640));
        assert_eq!(meta["state"], json!("processing"));
        assert_eq!(meta["type"], json!("photo"));
        assert!(!asset.attribution);
    }

    #[test]
    fn state_defaults_to_ready() {
        let meta: AssetMeta = serde_json::from_value(json!({})).unwrap();
        assert_eq!(meta.state, AssetState::Ready);
    }

    #[test]
    fn mimetype_is_required() {
        let err = parse::<NewDigitalAsset>(json!({
            "applicationId": "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c",
            "meta": {}
        }))
        .unwrap_err();
        assert!(err.fields().contains_key("mimetype"));
    }
}
