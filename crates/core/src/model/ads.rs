//! Advertising accounts and the campaigns run through them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{text_enum, Base, LifecycleStatus, Record};
use crate::db::{Insert, RepoError};
use crate::validate::Payload;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdAccount {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub application_id: Uuid,
    pub title: String,
    pub facebook_ad_account_id: String,
    pub facebook_custom_conversion_id: Option<String>,
    pub status: LifecycleStatus,
}

impl Record for AdAccount {
    const TABLE: &'static str = "ad_accounts";
    const NAME: &'static str = "ad account";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdAccount {
    pub application_id: Uuid,
    pub title: String,
    pub facebook_ad_account_id: String,
    #[serde(default)]
    pub facebook_custom_conversion_id: Option<String>,
    #[serde(default)]
    pub status: LifecycleStatus,
}

impl Payload for NewAdAccount {
    const REQUIRED: &'static [&'static str] = &["applicationId", "title", "facebookAdAccountId"];
}

impl Insert for NewAdAccount {
    type Record = AdAccount;

    async fn insert(self, pool: &PgPool) -> Result<AdAccount, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, AdAccount>(
            r#"
            INSERT INTO ad_accounts (
                id, sid, created_at, status, application_id, title,
                facebook_ad_account_id, facebook_custom_conversion_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.application_id)
        .bind(&self.title)
        .bind(&self.facebook_ad_account_id)
        .bind(&self.facebook_custom_conversion_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}

text_enum! {
    /// Where a campaign's rollout stands.
    pub enum Activation {
        Finished => "finished",
        Progress => "progress",
        Error => "error",
    }
}

text_enum! {
    /// Network a campaign is published to.
    #[derive(Default)]
    pub enum Platform {
        #[default]
        Twitter => "twitter",
        Facebook => "facebook",
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdCampaign {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: Base,
    pub ad_account_id: Uuid,
    pub application_id: Uuid,
    pub activation: Option<Activation>,
    pub clone: bool,
    pub digital_asset_ids: Vec<String>,
    pub fb_ad_campaign_configs: Vec<String>,
    pub headlines: Vec<String>,
    pub in_progress_date: Option<DateTime<Utc>>,
    pub platforms: Platform,
    pub link: String,
    pub texts: Vec<String>,
    pub title: String,
    pub status: LifecycleStatus,
}

impl Record for AdCampaign {
    const TABLE: &'static str = "ad_campaigns";
    const NAME: &'static str = "ad campaign";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdCampaign {
    pub ad_account_id: Uuid,
    pub application_id: Uuid,
    #[serde(default)]
    pub activation: Option<Activation>,
    #[serde(default)]
    pub clone: bool,
    pub digital_asset_ids: Vec<String>,
    #[serde(default)]
    pub fb_ad_campaign_configs: Vec<String>,
    pub headlines: Vec<String>,
    #[serde(default)]
    pub in_progress_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub platforms: Platform,
    pub link: String,
    pub texts: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub status: LifecycleStatus,
}

impl Payload for NewAdCampaign {
    const REQUIRED: &'static [&'static str] = &[
        "adAccountId",
        "applicationId",
        "digitalAssetIds",
        "headlines",
        "link",
        "texts",
        "title",
    ];
    const NON_NULLABLE: &'static [&'static str] =
        &["clone", "fbAdCampaignConfigs", "platforms", "status"];
}

impl Insert for NewAdCampaign {
    type Record = AdCampaign;

    async fn insert(self, pool: &PgPool) -> Result<AdCampaign, RepoError> {
        let base = Base::generate();
        let row = sqlx::query_as::<_, AdCampaign>(
            r#"
            INSERT INTO ad_campaigns (
                id, sid, created_at, status, ad_account_id, application_id, activation,
                clone, digital_asset_ids, fb_ad_campaign_configs, headlines,
                in_progress_date, platforms, link, texts, title
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(base.id)
        .bind(&base.sid)
        .bind(base.created_at)
        .bind(self.status.as_str())
        .bind(self.ad_account_id)
        .bind(self.application_id)
        .bind(self.activation.map(|a| a.as_str()))
        .bind(self.clone)
        .bind(&self.digital_asset_ids)
        .bind(&self.fb_ad_campaign_configs)
        .bind(&self.headlines)
        .bind(self.in_progress_date)
        .bind(self.platforms.as_str())
        .bind(&self.link)
        .bind(&self.texts)
        .bind(&self.title)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
