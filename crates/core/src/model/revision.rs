use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::Payload;

/// One content block of a revision. Cards are heterogeneous; only the
/// object shape is enforced.
pub type Card = Map<String, Value>;

/// A content snapshot of a document.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRevision {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub document_id: Uuid,
    pub status: LifecycleStatus,
    #[sqlx(json)]
    pub cards: Vec<Card>,
}

impl Record for DocumentRevision {
    const TABLE: &'static str = "document_revisions";
    const NAME: &'static str = "document revision";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocumentRevision {
    pub document_id: Uuid,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub status: LifecycleStatus,
}

impl Payload for NewDocumentRevision {
    const REQUIRED: &'static [&'static str] = &["documentId", "cards"];
}

impl Insert for NewDocumentRevision {
    type Record = DocumentRevision;

    async fn insert(self, pool: &PgPool) -> Result<DocumentRevision, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, DocumentRevision>(
            r#"
            INSERT INTO document_revisions (id, sid, created_at, status, document_id, cards)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.document_id)
        .bind(Json(&self.cards))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
