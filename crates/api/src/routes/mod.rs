pub mod crud;
pub mod documents;
pub mod health;

use axum::Router;
use paradigm_core::model::ads::{NewAdAccount, NewAdCampaign};
use paradigm_core::model::application::NewApplication;
use paradigm_core::model::asset::NewDigitalAsset;
use paradigm_core::model::category::NewCategory;
use paradigm_core::model::channel::NewChannel;
use paradigm_core::model::organization::NewOrganization;
use paradigm_core::model::publishing::{NewAppleNewsArticle, NewFacebookInstantArticle};
use paradigm_core::model::revision::NewDocumentRevision;
use paradigm_core::model::user::NewUser;

use crate::middleware::body_limit;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config().max_body_bytes;

    let router = Router::new()
        .merge(health::routes())
        .merge(crud::routes::<NewOrganization>("/organizations"))
        .merge(crud::routes::<NewApplication>("/applications"))
        .merge(crud::routes::<NewUser>("/users"))
        .merge(crud::routes::<NewDigitalAsset>("/digital-assets"))
        .merge(crud::routes::<NewCategory>("/categories"))
        .merge(crud::routes::<NewChannel>("/channels"))
        .merge(crud::routes::<NewFacebookInstantArticle>("/facebook-ias"))
        .merge(crud::routes::<NewAppleNewsArticle>("/apple-news"))
        .merge(crud::routes::<NewAdAccount>("/ad-accounts"))
        .merge(crud::routes::<NewAdCampaign>("/ad-campaigns"))
        .merge(crud::routes::<NewDocumentRevision>("/document-revisions"))
        .merge(documents::routes());

    body_limit::apply(router, max_body_bytes).with_state(state)
}
