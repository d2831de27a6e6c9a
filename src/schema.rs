//! Static column schema for the known dump tables.
//!
//! Column order is authoritative and fixed: it mirrors the table definitions
//! in the SQL dumps and drives the positional zip in the row materializer.

/// The six tables the dump files are expected to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Users,
    Movies,
    Ratings,
    WatchHistory,
    Recommendations,
    Genres,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Users,
        TableKind::Movies,
        TableKind::Ratings,
        TableKind::WatchHistory,
        TableKind::Recommendations,
        TableKind::Genres,
    ];

    /// Resolve a table name as it appears in a dump. Matching is
    /// case-insensitive; the dump's own casing is irrelevant here.
    pub fn from_name(name: &str) -> Option<TableKind> {
        match name.to_lowercase().as_str() {
            "users" => Some(TableKind::Users),
            "movies" => Some(TableKind::Movies),
            "ratings" => Some(TableKind::Ratings),
            "watchhistory" => Some(TableKind::WatchHistory),
            "recommendations" => Some(TableKind::Recommendations),
            "genres" => Some(TableKind::Genres),
            _ => None,
        }
    }

    /// Ordered column names, exactly as declared in the dump schema.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Users => &[
                "user_id",
                "username",
                "email",
                "password_hash",
                "join_date",
                "age",
                "most_watched_genre",
            ],
            TableKind::Movies => &[
                "movie_id",
                "title",
                "release_year",
                "genre",
                "duration",
                "description",
                "average_rating",
                "poster_url",
            ],
            TableKind::Ratings => &[
                "rating_id",
                "user_id",
                "movie_id",
                "rating_value",
                "rating_date",
            ],
            TableKind::WatchHistory => &[
                "history_id",
                "user_id",
                "movie_id",
                "last_watch_date",
                "progress",
            ],
            TableKind::Recommendations => &["rec_id", "user_id", "movie_id", "reason"],
            TableKind::Genres => &["genre_id", "genre_name"],
        }
    }

    /// Canonical lowercase table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            TableKind::Users => "users",
            TableKind::Movies => "movies",
            TableKind::Ratings => "ratings",
            TableKind::WatchHistory => "watchhistory",
            TableKind::Recommendations => "recommendations",
            TableKind::Genres => "genres",
        }
    }
}
