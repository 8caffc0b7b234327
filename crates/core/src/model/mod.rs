//! Entity models.
//!
//! Each entity has a row type (what is stored and returned) and a `New*`
//! payload type (what a client submits). Enumerations are stored as TEXT and
//! JSON-shaped metadata as JSONB.

pub mod ads;
pub mod application;
pub mod asset;
pub mod category;
pub mod channel;
pub mod document;
pub mod organization;
pub mod publishing;
pub mod revision;
pub mod user;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::id;

/// Defines a string-backed enum that serializes as its lowercase text and
/// decodes from a TEXT column. Values are bound with `as_str()`.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "invalid {}: '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <str as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<Self>()?)
            }
        }
    };
}

pub(crate) use text_enum;

text_enum! {
    /// Lifecycle status shared by every entity except documents.
    #[derive(Default)]
    pub enum LifecycleStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
        Deleted => "deleted",
    }
}

/// Columns every table carries.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: Uuid,
    pub sid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Base {
    /// Fresh identifiers and creation timestamp for a row about to be inserted.
    pub fn generate() -> Self {
        Self {
            id: id::generate(),
            sid: id::short_id(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// A table that rows of `Self` are read from.
pub trait Record: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Singular name used in log fields and error messages.
    const NAME: &'static str;
}
