use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use paradigm_core::db::filter::DocumentFilter;
use paradigm_core::model::document::{DocumentPatch, DocumentStatus, ExpandedDocument, NewDocument};
use paradigm_core::model::publishing::AppleNewsWithDocument;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{EntityId, ValidJson, ValidQuery};
use crate::state::AppState;

/// Document routes, including the per-user listing.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list).post(create))
        .route("/documents/{id}", get(find).patch(update).delete(remove))
        .route("/documents/{id}/apple-news", get(apple_news))
        .route("/users/{id}/documents", get(user_documents))
}

/// Query string of `GET /documents`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub application_id: Uuid,
    /// Accepted for client compatibility; applications already scope tenants.
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "ignoreDocumentIds[]")]
    pub ignore_document_ids: Vec<Uuid>,
    #[serde(default, rename = "categoryIds[]")]
    pub category_ids: Vec<Uuid>,
    // Unbracketed spellings. Both forms may appear in one query.
    #[serde(default, rename = "ignoreDocumentIds")]
    pub plain_ignore_document_ids: Vec<Uuid>,
    #[serde(default, rename = "categoryIds")]
    pub plain_category_ids: Vec<Uuid>,
}

impl From<DocumentQuery> for DocumentFilter {
    fn from(mut query: DocumentQuery) -> Self {
        query.ignore_document_ids.append(&mut query.plain_ignore_document_ids);
        query.category_ids.append(&mut query.plain_category_ids);
        DocumentFilter {
            application_id: Some(query.application_id),
            user_id: query.user_id,
            status: query.status,
            title: query.title,
            ignore_ids: query.ignore_document_ids,
            category_ids: query.category_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: Option<DocumentStatus>,
}

async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<DocumentQuery>,
) -> ApiResult<Json<Vec<ExpandedDocument>>> {
    tracing::debug!(organization_id = ?query.organization_id, "Listing documents");
    let filter = DocumentFilter::from(query);
    Ok(Json(state.documents().list(&filter).await?))
}

async fn create(
    State(state): State<AppState>,
    ValidJson(doc): ValidJson<NewDocument>,
) -> ApiResult<Json<ExpandedDocument>> {
    Ok(Json(state.documents().create(doc).await?))
}

async fn find(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<ExpandedDocument>> {
    Ok(Json(state.documents().get(id).await?))
}

async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(patch): ValidJson<DocumentPatch>,
) -> ApiResult<Json<ExpandedDocument>> {
    Ok(Json(state.documents().patch(id, patch).await?))
}

async fn remove(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<StatusCode> {
    state.documents().delete(id).await?;
    Ok(StatusCode::OK)
}

async fn apple_news(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<Vec<AppleNewsWithDocument>>> {
    Ok(Json(state.documents().apple_news(id).await?))
}

async fn user_documents(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
    ValidQuery(query): ValidQuery<StatusQuery>,
) -> ApiResult<Json<Vec<ExpandedDocument>>> {
    Ok(Json(
        state
            .documents()
            .list_for_user(user_id, query.status)
            .await?,
    ))
}
