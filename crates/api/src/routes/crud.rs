//! List, create, fetch and delete handlers shared by every plain entity.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use paradigm_core::db::{self, Insert};
use paradigm_core::model::Record;
use serde::Serialize;

use crate::error::ApiResult;
use crate::extract::{EntityId, ValidJson};
use crate::state::AppState;

/// `GET/POST {path}` and `GET/DELETE {path}/{id}` for payload `P`.
pub fn routes<P>(path: &str) -> Router<AppState>
where
    P: Insert,
    P::Record: Serialize,
{
    Router::new()
        .route(path, get(list::<P::Record>).post(create::<P>))
        .route(
            &format!("{path}/{{id}}"),
            get(find::<P::Record>).delete(remove::<P::Record>),
        )
}

async fn list<T: Record + Serialize>(State(state): State<AppState>) -> ApiResult<Json<Vec<T>>> {
    Ok(Json(db::list_all::<T>(state.pool()).await?))
}

async fn create<P>(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<P>,
) -> ApiResult<Json<P::Record>>
where
    P: Insert,
    P::Record: Serialize,
{
    Ok(Json(db::create(state.pool(), payload).await?))
}

async fn find<T: Record + Serialize>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<T>> {
    Ok(Json(db::get::<T>(state.pool(), id).await?))
}

async fn remove<T: Record>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    db::delete_by_id::<T>(state.pool(), id).await?;
    Ok(StatusCode::OK)
}
