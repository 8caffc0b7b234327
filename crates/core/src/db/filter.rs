//! Document listing predicates.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::model::document::DocumentStatus;

/// Which documents a listing returns. Every populated field narrows the
/// result; empty lists and `None` are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    pub application_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<DocumentStatus>,
    /// Case-sensitive substring of the title.
    pub title: Option<String>,
    pub ignore_ids: Vec<Uuid>,
    /// A document matches when it is linked to any of these categories.
    pub category_ids: Vec<Uuid>,
}

impl DocumentFilter {
    pub fn for_application(application_id: Uuid) -> Self {
        Self {
            application_id: Some(application_id),
            ..Self::default()
        }
    }

    pub fn for_user(user_id: Uuid, status: Option<DocumentStatus>) -> Self {
        Self {
            user_id: Some(user_id),
            status,
            ..Self::default()
        }
    }

    /// `SELECT` over `documents` with this filter applied, in insertion order.
    pub fn select(&self) -> QueryBuilder<'_, Postgres> {
        let mut qb = QueryBuilder::new("SELECT documents.* FROM documents");
        self.push_where(&mut qb);
        qb.push(" ORDER BY documents.created_at, documents.id");
        qb
    }

    /// Append the `WHERE` clause. Every value is bound, never interpolated.
    pub fn push_where<'a>(&'a self, qb: &mut QueryBuilder<'a, Postgres>) {
        qb.push(" WHERE TRUE");

        if let Some(application_id) = self.application_id {
            qb.push(" AND documents.application_id = ")
                .push_bind(application_id);
        }

        if !self.ignore_ids.is_empty() {
            qb.push(" AND documents.id <> ALL(")
                .push_bind(&self.ignore_ids)
                .push(")");
        }

        if let Some(user_id) = self.user_id {
            qb.push(" AND documents.user_id = ").push_bind(user_id);
        }

        if let Some(status) = self.status {
            qb.push(" AND documents.status = ").push_bind(status.as_str());
        }

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            qb.push(" AND strpos(documents.title, ")
                .push_bind(title)
                .push(") > 0");
        }

        if !self.category_ids.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM documents_categories dc \
                 WHERE dc.document_id = documents.id AND dc.category_id = ANY(",
            )
            .push_bind(&self.category_ids)
            .push("))");
        }
    }
}
