//! Typed entities for the known tables.
//!
//! The materializer produces order-preserving generic records; consumers that
//! want strong types decode them into these structs. [`TableData`] tags the
//! decoded collection by table, with an explicit fallback for tables the
//! schema map does not know.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::Record;
use crate::schema::TableKind;

/// Error type for entity decoding.
#[derive(Debug, Clone)]
pub enum EntityError {
    Decode { table: String, reason: String },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::Decode { table, reason } => {
                write!(f, "failed to decode '{}' record: {}", table, reason)
            }
        }
    }
}

impl std::error::Error for EntityError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub release_year: Option<i64>,
    pub genre: Option<String>,
    pub duration: Option<i64>,
    pub description: Option<String>,
    pub average_rating: Option<f64>,
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub join_date: Option<String>,
    pub age: Option<i64>,
    pub most_watched_genre: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub rating_id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub rating_value: f64,
    pub rating_date: Option<String>,
    /// Joined from users at seed time; absent in raw dump rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Joined from movies at seed time; absent in raw dump rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEntry {
    pub history_id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub last_watch_date: Option<String>,
    pub progress: Option<String>,
    /// Alias of `last_watch_date` kept for report compatibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub rec_id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
}

/// A decoded table, tagged by kind, with a fallback for unknown tables.
#[derive(Debug, Clone, PartialEq)]
pub enum TableData {
    Users(Vec<User>),
    Movies(Vec<Movie>),
    Ratings(Vec<Rating>),
    WatchHistory(Vec<WatchEntry>),
    Recommendations(Vec<Recommendation>),
    Genres(Vec<Genre>),
    Unknown { table: String, records: Vec<Record> },
}

impl TableData {
    pub fn len(&self) -> usize {
        match self {
            TableData::Users(v) => v.len(),
            TableData::Movies(v) => v.len(),
            TableData::Ratings(v) => v.len(),
            TableData::WatchHistory(v) => v.len(),
            TableData::Recommendations(v) => v.len(),
            TableData::Genres(v) => v.len(),
            TableData::Unknown { records, .. } => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode materialized records into their per-table typed form.
pub fn decode_table(table: &str, records: Vec<Record>) -> Result<TableData, EntityError> {
    let Some(kind) = TableKind::from_name(table) else {
        return Ok(TableData::Unknown {
            table: table.to_string(),
            records,
        });
    };

    Ok(match kind {
        TableKind::Users => TableData::Users(decode_records(table, &records)?),
        TableKind::Movies => TableData::Movies(decode_records(table, &records)?),
        TableKind::Ratings => TableData::Ratings(decode_records(table, &records)?),
        TableKind::WatchHistory => TableData::WatchHistory(decode_records(table, &records)?),
        TableKind::Recommendations => {
            TableData::Recommendations(decode_records(table, &records)?)
        }
        TableKind::Genres => TableData::Genres(decode_records(table, &records)?),
    })
}

/// Decode a slice of generic records into a typed collection.
pub fn decode_records<T: DeserializeOwned>(
    table: &str,
    records: &[Record],
) -> Result<Vec<T>, EntityError> {
    records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .and_then(serde_json::from_value)
                .map_err(|e| EntityError::Decode {
                    table: table.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}
