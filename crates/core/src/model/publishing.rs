//! Mirror records of articles pushed to external publishing platforms.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::document::Document;
use super::{text_enum, Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::Payload;

/// An Apple News article generated from a document.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppleNewsArticle {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub article_id: String,
    #[sqlx(json)]
    pub article_json: Map<String, Value>,
    pub article_revision: String,
    pub document_id: Uuid,
    pub status: LifecycleStatus,
}

impl Record for AppleNewsArticle {
    const TABLE: &'static str = "apple_news";
    const NAME: &'static str = "apple news article";
}

/// An Apple News article with its source document embedded.
#[derive(Debug, Clone, Serialize)]
pub struct AppleNewsWithDocument {
    #[serde(flatten)]
    pub article: AppleNewsArticle,
    pub document: Document,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppleNewsArticle {
    pub article_id: String,
    pub article_json: Map<String, Value>,
    pub article_revision: String,
    pub document_id: Uuid,
    #[serde(default)]
    pub status: LifecycleStatus,
}

impl Payload for NewAppleNewsArticle {
    const REQUIRED: &'static [&'static str] =
        &["articleId", "articleJson", "articleRevision", "documentId"];
}

impl Insert for NewAppleNewsArticle {
    type Record = AppleNewsArticle;

    async fn insert(self, pool: &PgPool) -> Result<AppleNewsArticle, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, AppleNewsArticle>(
            r#"
            INSERT INTO apple_news (
                id, sid, created_at, status, article_id, article_json, article_revision, document_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(&self.article_id)
        .bind(Json(&self.article_json))
        .bind(&self.article_revision)
        .bind(self.document_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}

text_enum! {
    /// Progress of an Instant Articles import.
    #[derive(Default)]
    pub enum ImportStatus {
        Success => "success",
        #[default]
        Importing => "importing",
        Failed => "failed",
    }
}

/// A Facebook Instant Article import. Not tied to a stored document.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FacebookInstantArticle {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub article_id: String,
    pub article_import_id: String,
    pub canonical_url: String,
    pub import_status: ImportStatus,
    pub markup: String,
    pub status: LifecycleStatus,
}

impl Record for FacebookInstantArticle {
    const TABLE: &'static str = "facebook_ias";
    const NAME: &'static str = "facebook instant article";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFacebookInstantArticle {
    pub article_id: String,
    pub article_import_id: String,
    pub canonical_url: String,
    #[serde(default)]
    pub import_status: ImportStatus,
    pub markup: String,
    #[serde(default)]
    pub status: LifecycleStatus,
}

impl Payload for NewFacebookInstantArticle {
    const REQUIRED: &'static [&'static str] =
        &["articleId", "articleImportId", "canonicalUrl", "markup"];
}

impl Insert for NewFacebookInstantArticle {
    type Record = FacebookInstantArticle;

    async fn insert(self, pool: &PgPool) -> Result<FacebookInstantArticle, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, FacebookInstantArticle>(
            r#"
            INSERT INTO facebook_ias (
                id, sid, created_at, status, article_id, article_import_id,
                canonical_url, import_status, markup
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(&self.article_id)
        .bind(&self.article_import_id)
        .bind(&self.canonical_url)
        .bind(self.import_status.as_str())
        .bind(&self.markup)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
