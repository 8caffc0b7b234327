//! Request extractors that reject with [`ApiError`] instead of axum's plain
//! text rejections.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use axum_extra::extract::Query;
use paradigm_core::id;
use paradigm_core::validate::{self, Payload};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;

/// A JSON body validated against the payload's declared shape.
#[derive(Debug)]
pub struct ValidJson<P>(pub P);

impl<S, P> FromRequest<S> for ValidJson<P>
where
    S: Send + Sync,
    P: Payload + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(validate::parse(body)?))
    }
}

/// Query string parameters. Repeated keys (`categoryIds[]=a&categoryIds[]=b`)
/// collect into sequences.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.to_string()))?;
        Ok(Self(value))
    }
}

/// The `{id}` path segment. An id that is not a UUID cannot name a row, so
/// it is a 404 rather than a 400.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub Uuid);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;
        id::parse(&raw).map(Self).ok_or(ApiError::NotFound)
    }
}
