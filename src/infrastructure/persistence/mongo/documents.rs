//! BSON document shapes and conversions.
//!
//! Field names follow the lowercase layout of existing `littleu` databases.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{RequestHeaders, ShortLink, User, VisitStat};

pub const URL_COLLECTION: &str = "url";
pub const USER_COLLECTION: &str = "user";
pub const STATS_COLLECTION: &str = "stats";
pub const COUNTER_COLLECTION: &str = "counters";

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "shortid")]
    pub short_id: i64,
    pub url: String,
    #[serde(rename = "userid")]
    pub user_id: ObjectId,
    #[serde(rename = "createdat")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedat")]
    pub updated_at: bson::DateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub password: String,
    #[serde(rename = "createdat")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedat")]
    pub updated_at: bson::DateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisitDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "shortid")]
    pub short_id: i64,
    #[serde(rename = "userid")]
    pub user_id: ObjectId,
    pub timestamp: bson::DateTime,
    pub headers: RequestHeaders,
}

/// Named sequence used to number visits.
#[derive(Debug, Serialize, Deserialize)]
pub struct CounterDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub seq: i64,
}

pub fn to_chrono(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl From<UrlDocument> for ShortLink<ObjectId> {
    fn from(doc: UrlDocument) -> Self {
        ShortLink::new(
            doc.short_id,
            doc.url,
            doc.user_id,
            to_chrono(doc.created_at),
            to_chrono(doc.updated_at),
        )
    }
}

impl From<UserDocument> for User<ObjectId> {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id,
            username: doc.username,
            password_hash: doc.password,
            created_at: to_chrono(doc.created_at),
            updated_at: to_chrono(doc.updated_at),
        }
    }
}

impl From<VisitDocument> for VisitStat<ObjectId> {
    fn from(doc: VisitDocument) -> Self {
        VisitStat {
            id: doc.id,
            short_link_id: doc.short_id,
            owner: doc.user_id,
            timestamp: to_chrono(doc.timestamp),
            request_headers: doc.headers,
        }
    }
}
