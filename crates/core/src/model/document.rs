use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use super::asset::DigitalAsset;
use super::category::Category;
use super::revision::DocumentRevision;
use super::user::User;
use super::{text_enum, Base, Record};
use crate::validate::{nullable, Payload};

text_enum! {
    /// Editorial state of a document.
    #[derive(Default)]
    pub enum DocumentStatus {
        #[default]
        Draft => "draft",
        Published => "published",
        Scheduled => "scheduled",
        Deleted => "deleted",
    }
}

text_enum! {
    /// Presentation format of a document.
    #[derive(Default)]
    pub enum DocumentMode {
        #[default]
        Article => "article",
        Listacle => "listacle",
        Slideshow => "slideshow",
    }
}

/// SEO and social sharing overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    /// Keys without a typed field, stored and returned as submitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub application_id: Uuid,
    pub active_revision_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub status: DocumentStatus,
    pub mode: DocumentMode,
    pub excerpt: Option<String>,
    pub featured_image_id: Option<Uuid>,
    pub permalink: Option<String>,
    pub timezone: Option<String>,
    pub last_purged_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    #[sqlx(json)]
    pub meta: DocumentMeta,
}

impl Record for Document {
    const TABLE: &'static str = "documents";
    const NAME: &'static str = "document";
}

/// A document with its author, active revision, featured image and
/// categories loaded. Categories are ordered by title.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub user: Option<User>,
    pub active_revision: Option<DocumentRevision>,
    pub featured_image: Option<DigitalAsset>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub application_id: Uuid,
    #[serde(default)]
    pub active_revision_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub mode: DocumentMode,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image_id: Option<Uuid>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub last_purged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub meta: DocumentMeta,
    /// Categories to link after insert. Not a column.
    #[serde(default)]
    pub category_ids: Option<Vec<Uuid>>,
}

impl Payload for NewDocument {
    const REQUIRED: &'static [&'static str] = &["applicationId", "title", "slug", "meta"];
    const NON_NULLABLE: &'static [&'static str] = &["status", "mode", "tags"];
}

/// Partial update of a document. `None` leaves a column untouched; for
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default)]
    pub application_id: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable")]
    pub active_revision_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub mode: Option<DocumentMode>,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub featured_image_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub permalink: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub timezone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_purged_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub meta: Option<DocumentMeta>,
    /// Replacement category set. Absent or `null` keeps the current links.
    #[serde(default)]
    pub category_ids: Option<Vec<Uuid>>,
}

impl Payload for DocumentPatch {
    const REQUIRED: &'static [&'static str] = &[];
    const NON_NULLABLE: &'static [&'static str] = &[
        "applicationId",
        "title",
        "slug",
        "status",
        "mode",
        "tags",
        "meta",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::parse;
    use serde_json::json;

    #[test]
    fn new_document_splits_off_category_ids() {
        let doc: NewDocument = parse(json!({
            "applicationId": "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c",
            "organizationId": "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5d",
            "title": "Hello",
            "slug": "hello",
            "meta": { "instant": true },
            "categoryIds": [
                "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b60",
                "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b61"
            ],
            "publishedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.mode, DocumentMode::Article);
        assert_eq!(doc.category_ids.map(|ids| ids.len()), Some(2));
        assert!(doc.published_at.is_some());
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn meta_keeps_undeclared_keys() {
        let meta: DocumentMeta =
            serde_json::from_value(json!({ "title": "SEO", "customKey": 7 })).unwrap();
        assert_eq!(meta.title.as_deref(), Some("SEO"));
        assert_eq!(meta.extra.get("customKey"), Some(&json!(7)));
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({ "title": "SEO", "customKey": 7 })
        );
    }

    #[test]
    fn new_document_rejects_unknown_mode() {
        let err = parse::<NewDocument>(json!({
            "applicationId": "0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c",
            "title": "Hello",
            "slug": "hello",
            "mode": "podcast",
            "meta": {}
        }))
        .unwrap_err();
        assert!(err.fields().contains_key("body"));
    }

    #[test]
    fn patch_distinguishes_cleared_from_untouched() {
        let patch: DocumentPatch = parse(json!({
            "userId": null,
            "title": "Renamed",
            "categoryIds": []
        }))
        .unwrap();
        assert_eq!(patch.user_id, Some(None));
        assert_eq!(patch.featured_image_id, None);
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert_eq!(patch.category_ids, Some(vec![]));
    }

    #[test]
    fn patch_refuses_null_title() {
        let err = parse::<DocumentPatch>(json!({ "title": null })).unwrap_err();
        assert_eq!(err.to_string(), "title: must not be null");
    }

    #[test]
    fn null_category_ids_keep_links() {
        let patch: DocumentPatch = parse(json!({ "categoryIds": null })).unwrap();
        assert!(patch.category_ids.is_none());
    }

    #[test]
    fn status_text_matches_wire_format() {
        assert_eq!(DocumentStatus::Published.as_str(), "published");
        assert_eq!(
            "scheduled".parse::<DocumentStatus>().unwrap(),
            DocumentStatus::Scheduled
        );
        assert_eq!(DocumentMode::ALL.len(), 3);
    }
}
