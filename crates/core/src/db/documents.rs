//! Document persistence.
//!
//! Documents are the only entity with a many-to-many relation and the only
//! one that can be patched, so they get a repository of their own. Reads
//! always return [`ExpandedDocument`]s; relations are fetched with one query
//! per relation for the whole batch.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use super::filter::DocumentFilter;
use super::{delete_by_id, find_many, get, RepoError};
use crate::model::asset::DigitalAsset;
use crate::model::category::Category;
use crate::model::document::{
    Document, DocumentPatch, DocumentStatus, ExpandedDocument, NewDocument,
};
use crate::model::publishing::{AppleNewsArticle, AppleNewsWithDocument};
use crate::model::revision::DocumentRevision;
use crate::model::user::User;
use crate::model::Base;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

/// A category together with the document it was reached from.
#[derive(Debug, FromRow)]
struct CategoryLink {
    document_id: Uuid,
    #[sqlx(flatten)]
    category: Category,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &DocumentFilter) -> Result<Vec<ExpandedDocument>, RepoError> {
        let mut qb = filter.select();
        let docs = qb
            .build_query_as::<Document>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = docs.len(), "Listed documents");
        self.expand(docs).await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: Uuid) -> Result<Option<ExpandedDocument>, RepoError> {
        let Some(doc) = super::find_by_id::<Document>(&self.pool, id).await? else {
            return Ok(None);
        };
        Ok(self.expand(vec![doc]).await?.pop())
    }

    /// Like [`find`](Self::find), but a missing document is an error.
    pub async fn get(&self, id: Uuid) -> Result<ExpandedDocument, RepoError> {
        self.find(id)
            .await?
            .ok_or_else(|| RepoError::not_found::<Document>(id))
    }

    /// Insert a document and link its categories in the order given.
    #[instrument(skip_all, fields(slug = %doc.slug))]
    pub async fn create(&self, mut doc: NewDocument) -> Result<ExpandedDocument, RepoError> {
        let category_ids = doc.category_ids.take().unwrap_or_default();
        let base = Base::generate();

        let mut tx = self.pool.begin().await?;
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO documents (
                id, sid, created_at, application_id, active_revision_id, user_id,
                title, slug, status, mode, excerpt, featured_image_id, permalink,
                timezone, last_purged_at, published_at, tags, meta
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING id
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(doc.application_id)
        .bind(doc.active_revision_id)
        .bind(doc.user_id)
        .bind(&doc.title)
        .bind(&doc.slug)
        .bind(doc.status.as_str())
        .bind(doc.mode.as_str())
        .bind(&doc.excerpt)
        .bind(doc.featured_image_id)
        .bind(&doc.permalink)
        .bind(&doc.timezone)
        .bind(doc.last_purged_at)
        .bind(doc.published_at)
        .bind(&doc.tags)
        .bind(Json(&doc.meta))
        .fetch_one(&mut *tx)
        .await?;

        link_categories(&mut tx, id, &category_ids).await?;
        tx.commit().await?;

        tracing::info!(
            document_id = %id,
            categories = category_ids.len(),
            "Document created"
        );
        self.get(id).await
    }

    /// Apply a partial update. When the patch carries a category list it
    /// replaces every existing link.
    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: Uuid, patch: DocumentPatch) -> Result<ExpandedDocument, RepoError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<Uuid> = update_query(id, &patch, Utc::now())
            .build_query_scalar()
            .fetch_optional(&mut *tx)
            .await?;
        if updated.is_none() {
            return Err(RepoError::not_found::<Document>(id));
        }

        if let Some(category_ids) = &patch.category_ids {
            sqlx::query("DELETE FROM documents_categories WHERE document_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_categories(&mut tx, id, category_ids).await?;
        }
        tx.commit().await?;

        tracing::info!(
            document_id = %id,
            relinked = patch.category_ids.is_some(),
            "Document updated"
        );
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        delete_by_id::<Document>(&self.pool, id).await
    }

    /// Documents authored by a user. Fails with `NotFound` for an unknown user.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<ExpandedDocument>, RepoError> {
        get::<User>(&self.pool, user_id).await?;
        self.list(&DocumentFilter::for_user(user_id, status)).await
    }

    /// Apple News records generated from a document, oldest first.
    #[instrument(skip(self))]
    pub async fn apple_news(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<AppleNewsWithDocument>, RepoError> {
        let document = get::<Document>(&self.pool, document_id).await?;

        let articles = sqlx::query_as::<_, AppleNewsArticle>(
            "SELECT * FROM apple_news WHERE document_id = $1 ORDER BY created_at, id",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles
            .into_iter()
            .map(|article| AppleNewsWithDocument {
                article,
                document: document.clone(),
            })
            .collect())
    }

    async fn expand(&self, docs: Vec<Document>) -> Result<Vec<ExpandedDocument>, RepoError> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let doc_ids: Vec<Uuid> = docs.iter().map(|d| d.base.id).collect();
        let user_ids = distinct(docs.iter().filter_map(|d| d.user_id));
        let revision_ids = distinct(docs.iter().filter_map(|d| d.active_revision_id));
        let asset_ids = distinct(docs.iter().filter_map(|d| d.featured_image_id));

        let users = find_many::<User>(&self.pool, &user_ids).await?;
        let revisions = find_many::<DocumentRevision>(&self.pool, &revision_ids).await?;
        let assets = find_many::<DigitalAsset>(&self.pool, &asset_ids).await?;
        let links = sqlx::query_as::<_, CategoryLink>(
            r#"
            SELECT dc.document_id, c.*
            FROM documents_categories dc
            JOIN categories c ON c.id = dc.category_id
            WHERE dc.document_id = ANY($1)
            ORDER BY c.title, c.id
            "#,
        )
        .bind(&doc_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(docs, users, revisions, assets, links))
    }
}

async fn link_categories(
    conn: &mut PgConnection,
    document_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), RepoError> {
    for category_id in category_ids {
        sqlx::query("INSERT INTO documents_categories (document_id, category_id) VALUES ($1, $2)")
            .bind(document_id)
            .bind(category_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// `UPDATE` for the supplied columns only. Yields the id of the updated row.
fn update_query(id: Uuid, patch: &DocumentPatch, now: DateTime<Utc>) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE documents SET updated_at = ");
    qb.push_bind(now);

    if let Some(v) = patch.application_id {
        qb.push(", application_id = ").push_bind(v);
    }
    if let Some(v) = patch.active_revision_id {
        qb.push(", active_revision_id = ").push_bind(v);
    }
    if let Some(v) = patch.user_id {
        qb.push(", user_id = ").push_bind(v);
    }
    if let Some(v) = &patch.title {
        qb.push(", title = ").push_bind(v.as_str());
    }
    if let Some(v) = &patch.slug {
        qb.push(", slug = ").push_bind(v.as_str());
    }
    if let Some(v) = patch.status {
        qb.push(", status = ").push_bind(v.as_str());
    }
    if let Some(v) = patch.mode {
        qb.push(", mode = ").push_bind(v.as_str());
    }
    if let Some(v) = &patch.excerpt {
        qb.push(", excerpt = ").push_bind(v.as_deref());
    }
    if let Some(v) = patch.featured_image_id {
        qb.push(", featured_image_id = ").push_bind(v);
    }
    if let Some(v) = &patch.permalink {
        qb.push(", permalink = ").push_bind(v.as_deref());
    }
    if let Some(v) = &patch.timezone {
        qb.push(", timezone = ").push_bind(v.as_deref());
    }
    if let Some(v) = patch.last_purged_at {
        qb.push(", last_purged_at = ").push_bind(v);
    }
    if let Some(v) = patch.published_at {
        qb.push(", published_at = ").push_bind(v);
    }
    if let Some(v) = &patch.tags {
        qb.push(", tags = ").push_bind(v);
    }
    if let Some(v) = &patch.meta {
        qb.push(", meta = ").push_bind(Json(v));
    }

    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING id");
    qb
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// Attach loaded relations to their documents, keeping document order.
fn assemble(
    docs: Vec<Document>,
    users: Vec<User>,
    revisions: Vec<DocumentRevision>,
    assets: Vec<DigitalAsset>,
    links: Vec<CategoryLink>,
) -> Vec<ExpandedDocument> {
    let users: HashMap<Uuid, User> = users.into_iter().map(|u| (u.base.id, u)).collect();
    let revisions: HashMap<Uuid, DocumentRevision> =
        revisions.into_iter().map(|r| (r.base.id, r)).collect();
    let assets: HashMap<Uuid, DigitalAsset> =
        assets.into_iter().map(|a| (a.base.id, a)).collect();

    let mut categories: HashMap<Uuid, Vec<Category>> = HashMap::new();
    for link in links {
        categories
            .entry(link.document_id)
            .or_default()
            .push(link.category);
    }

    docs.into_iter()
        .map(|document| {
            let mut cats = categories.remove(&document.base.id).unwrap_or_default();
            cats.sort_by(|a, b| a.title.cmp(&b.title));

            ExpandedDocument {
                user: document.user_id.and_then(|id| users.get(&id).cloned()),
                active_revision: document
                    .active_revision_id
                    .and_then(|id| revisions.get(&id).cloned()),
                featured_image: document
                    .featured_image_id
                    .and_then(|id| assets.get(&id).cloned()),
                categories: cats,
                document,
            }
        })
        .collect()
}
