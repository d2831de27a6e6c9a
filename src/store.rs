//! Mock persistence store for the console's simulated backend.
//!
//! An explicit store object with a version-gated initialize/reseed
//! lifecycle: when the stored data-version tag does not match the expected
//! one (or the store was never seeded), the whole state is reset and
//! reseeded from the parsed dump data. Persistence is a best-effort JSON
//! state file; durability is explicitly not a goal.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::codegen::Dataset;
use crate::entity::{
    decode_records, EntityError, Genre, Movie, Rating, Recommendation, User, WatchEntry,
};

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    NotFound { entity: &'static str, id: i64 },
    Io(io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Encode(e) => write!(f, "encoding error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Encode(err)
    }
}

/// The six decoded seed collections, as parsed from the dump files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    pub movies: Vec<Movie>,
    pub users: Vec<User>,
    pub ratings: Vec<Rating>,
    pub watch_history: Vec<WatchEntry>,
    pub recommendations: Vec<Recommendation>,
    pub genres: Vec<Genre>,
}

impl SeedData {
    /// Decode a parsed dataset (keyed by export key) into typed seed data.
    pub fn from_dataset(dataset: &Dataset) -> Result<SeedData, EntityError> {
        fn collection<T: DeserializeOwned>(
            dataset: &Dataset,
            key: &str,
        ) -> Result<Vec<T>, EntityError> {
            match dataset.get(key) {
                Some(records) => decode_records(key, records),
                None => Ok(Vec::new()),
            }
        }

        Ok(SeedData {
            movies: collection(dataset, "movies")?,
            users: collection(dataset, "users")?,
            ratings: collection(dataset, "ratings")?,
            watch_history: collection(dataset, "watchHistory")?,
            recommendations: collection(dataset, "recommendations")?,
            genres: collection(dataset, "genres")?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NextIds {
    pub movies: i64,
    pub ratings: i64,
    pub watch_history: i64,
    pub recommendations: i64,
}

/// In-memory store simulating the backend's persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockStore {
    /// Data-version tag of the last seeding; `None` until first seeded.
    version: Option<String>,
    movies: Vec<Movie>,
    users: Vec<User>,
    ratings: Vec<Rating>,
    watch_history: Vec<WatchEntry>,
    recommendations: Vec<Recommendation>,
    genres: Vec<Genre>,
    next_ids: NextIds,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the stored data-version tag against `version` and perform a
    /// full reset-and-reseed when it mismatches or the store was never
    /// seeded. Returns true when a reseed happened.
    pub fn initialize(&mut self, version: &str, seed: &SeedData) -> bool {
        if self.version.as_deref() == Some(version) {
            return false;
        }
        info!(version, "reseeding mock store from dump data");
        self.reseed(seed);
        self.version = Some(version.to_string());
        true
    }

    fn reseed(&mut self, seed: &SeedData) {
        let user_names: HashMap<i64, String> = seed
            .users
            .iter()
            .map(|u| (u.user_id, u.username.clone()))
            .collect();
        let movie_titles: HashMap<i64, String> = seed
            .movies
            .iter()
            .map(|m| (m.movie_id, m.title.clone()))
            .collect();

        let username_for = |id: i64| {
            user_names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| format!("User {}", id))
        };
        let title_for = |id: i64| {
            movie_titles
                .get(&id)
                .cloned()
                .unwrap_or_else(|| format!("Movie {}", id))
        };

        self.movies = seed.movies.clone();
        self.users = seed.users.clone();
        self.genres = seed.genres.clone();

        self.ratings = seed
            .ratings
            .iter()
            .cloned()
            .map(|mut rating| {
                rating.username = Some(username_for(rating.user_id));
                rating.movie_title = Some(title_for(rating.movie_id));
                rating
            })
            .collect();

        self.watch_history = seed
            .watch_history
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.watch_date = entry.last_watch_date.clone();
                entry.username = Some(username_for(entry.user_id));
                entry.movie_title = Some(title_for(entry.movie_id));
                entry
            })
            .collect();

        self.recommendations = seed
            .recommendations
            .iter()
            .cloned()
            .map(|mut rec| {
                rec.username = Some(username_for(rec.user_id));
                rec.movie_title = Some(title_for(rec.movie_id));
                rec
            })
            .collect();

        self.next_ids = NextIds {
            movies: next_id(self.movies.iter().map(|m| m.movie_id)),
            ratings: next_id(self.ratings.iter().map(|r| r.rating_id)),
            watch_history: next_id(self.watch_history.iter().map(|w| w.history_id)),
            recommendations: next_id(self.recommendations.iter().map(|r| r.rec_id)),
        };
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    // ---- movies ----

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, id: i64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.movie_id == id)
    }

    pub fn create_movie(&mut self, mut movie: Movie) -> Movie {
        movie.movie_id = self.next_ids.movies;
        if movie.average_rating.is_none() {
            movie.average_rating = Some(0.0);
        }
        self.next_ids.movies += 1;
        self.movies.push(movie.clone());
        movie
    }

    pub fn update_movie(&mut self, id: i64, patch: &JsonValue) -> Result<Movie, StoreError> {
        let index = self
            .movies
            .iter()
            .position(|m| m.movie_id == id)
            .ok_or(StoreError::NotFound { entity: "movie", id })?;
        let merged: Movie = merge_patch(&self.movies[index], patch)?;
        self.movies[index] = merged.clone();
        Ok(merged)
    }

    pub fn delete_movie(&mut self, id: i64) -> Result<(), StoreError> {
        delete_by(&mut self.movies, "movie", id, |m| m.movie_id)
    }

    // ---- users / genres (read-only collections) ----

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == id)
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    // ---- ratings ----

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn rating(&self, id: i64) -> Option<&Rating> {
        self.ratings.iter().find(|r| r.rating_id == id)
    }

    pub fn ratings_by_user(&self, user_id: i64) -> Vec<Rating> {
        self.ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn ratings_by_movie(&self, movie_id: i64) -> Vec<Rating> {
        self.ratings
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect()
    }

    pub fn create_rating(&mut self, mut rating: Rating) -> Rating {
        rating.rating_id = self.next_ids.ratings;
        if rating.rating_date.is_none() {
            rating.rating_date = Some(today());
        }
        rating.username = Some(self.username_or_placeholder(rating.user_id));
        rating.movie_title = Some(self.title_or_placeholder(rating.movie_id));
        self.next_ids.ratings += 1;
        self.ratings.push(rating.clone());
        rating
    }

    pub fn update_rating(&mut self, id: i64, patch: &JsonValue) -> Result<Rating, StoreError> {
        let index = self
            .ratings
            .iter()
            .position(|r| r.rating_id == id)
            .ok_or(StoreError::NotFound { entity: "rating", id })?;
        let merged: Rating = merge_patch(&self.ratings[index], patch)?;
        self.ratings[index] = merged.clone();
        Ok(merged)
    }

    pub fn delete_rating(&mut self, id: i64) -> Result<(), StoreError> {
        delete_by(&mut self.ratings, "rating", id, |r| r.rating_id)
    }

    // ---- watch history ----

    pub fn watch_history(&self) -> &[WatchEntry] {
        &self.watch_history
    }

    pub fn watch_entry(&self, id: i64) -> Option<&WatchEntry> {
        self.watch_history.iter().find(|w| w.history_id == id)
    }

    pub fn watch_history_by_user(&self, user_id: i64) -> Vec<WatchEntry> {
        self.watch_history
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn create_watch_entry(&mut self, mut entry: WatchEntry) -> WatchEntry {
        entry.history_id = self.next_ids.watch_history;
        let date = entry
            .watch_date
            .clone()
            .or_else(|| entry.last_watch_date.clone())
            .unwrap_or_else(today);
        entry.last_watch_date = Some(date.clone());
        entry.watch_date = Some(date);
        if entry.progress.is_none() {
            entry.progress = Some("0%".to_string());
        }
        entry.username = Some(self.username_or_placeholder(entry.user_id));
        entry.movie_title = Some(self.title_or_placeholder(entry.movie_id));
        self.next_ids.watch_history += 1;
        self.watch_history.push(entry.clone());
        entry
    }

    pub fn update_watch_entry(
        &mut self,
        id: i64,
        patch: &JsonValue,
    ) -> Result<WatchEntry, StoreError> {
        let index = self
            .watch_history
            .iter()
            .position(|w| w.history_id == id)
            .ok_or(StoreError::NotFound {
                entity: "watch history entry",
                id,
            })?;
        let merged: WatchEntry = merge_patch(&self.watch_history[index], patch)?;
        self.watch_history[index] = merged.clone();
        Ok(merged)
    }

    pub fn delete_watch_entry(&mut self, id: i64) -> Result<(), StoreError> {
        delete_by(&mut self.watch_history, "watch history entry", id, |w| {
            w.history_id
        })
    }

    // ---- recommendations ----

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn recommendation(&self, id: i64) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.rec_id == id)
    }

    pub fn recommendations_by_user(&self, user_id: i64) -> Vec<Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn create_recommendation(&mut self, mut rec: Recommendation) -> Recommendation {
        rec.rec_id = self.next_ids.recommendations;
        rec.username = Some(self.username_or_placeholder(rec.user_id));
        rec.movie_title = Some(self.title_or_placeholder(rec.movie_id));
        self.next_ids.recommendations += 1;
        self.recommendations.push(rec.clone());
        rec
    }

    pub fn delete_recommendation(&mut self, id: i64) -> Result<(), StoreError> {
        delete_by(&mut self.recommendations, "recommendation", id, |r| {
            r.rec_id
        })
    }

    /// Generate recommendations for a user from their rating history.
    ///
    /// Genres are weighted by the sum of the user's rating values; a movie is
    /// recommended when it is not already recommended to the user and either
    /// matches a preferred genre, carries an average rating of at least 3.5,
    /// or the user has no rating history at all.
    pub fn generate_recommendations(&mut self, user_id: i64) -> Vec<Recommendation> {
        let mut preferred: HashMap<String, f64> = HashMap::new();
        for rating in self.ratings.iter().filter(|r| r.user_id == user_id) {
            let genre = self
                .movies
                .iter()
                .find(|m| m.movie_id == rating.movie_id)
                .and_then(|m| m.genre.clone());
            if let Some(genre) = genre {
                *preferred.entry(genre).or_insert(0.0) += rating.rating_value;
            }
        }

        let already_recommended: HashSet<i64> = self
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.movie_id)
            .collect();
        let username = self.username_or_placeholder(user_id);

        let mut new_recs = Vec::new();
        for movie in &self.movies {
            if already_recommended.contains(&movie.movie_id) {
                continue;
            }

            let genre = movie.genre.as_deref().unwrap_or("Unknown");
            let average = movie.average_rating.unwrap_or(0.0);
            // A genre only counts as preferred with a positive summed weight.
            let matches_preference = preferred.get(genre).is_some_and(|weight| *weight > 0.0);
            let highly_rated = average >= 3.5;
            let no_preferences = preferred.is_empty();

            if !(matches_preference || highly_rated || no_preferences) {
                continue;
            }

            let reason = if matches_preference {
                format!("Based on your interest in {} movies", genre)
            } else if highly_rated {
                format!("Highly rated {} movie ({:.1}/5.0)", genre, average)
            } else {
                format!("Popular {} movie you might enjoy", genre)
            };

            new_recs.push(Recommendation {
                rec_id: self.next_ids.recommendations + new_recs.len() as i64,
                user_id,
                movie_id: movie.movie_id,
                reason: Some(reason),
                username: Some(username.clone()),
                movie_title: Some(movie.title.clone()),
            });
        }

        if let Some(last) = new_recs.last() {
            self.next_ids.recommendations = last.rec_id + 1;
        }
        self.recommendations.extend(new_recs.iter().cloned());
        new_recs
    }

    // ---- persistence ----

    /// Best-effort persistence of the whole store state as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let state = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, state)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<MockStore, StoreError> {
        let state = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&state)?)
    }

    fn username_or_placeholder(&self, user_id: i64) -> String {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| format!("User {}", user_id))
    }

    fn title_or_placeholder(&self, movie_id: i64) -> String {
        self.movies
            .iter()
            .find(|m| m.movie_id == movie_id)
            .map(|m| m.title.clone())
            .unwrap_or_else(|| format!("Movie {}", movie_id))
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Merge a JSON object patch over an entity, field by field.
fn merge_patch<T: Serialize + DeserializeOwned>(
    current: &T,
    patch: &JsonValue,
) -> Result<T, StoreError> {
    let mut base = serde_json::to_value(current)?;
    if let (JsonValue::Object(base), JsonValue::Object(patch)) = (&mut base, patch) {
        for (key, value) in patch {
            base.insert(key.clone(), value.clone());
        }
    }
    Ok(serde_json::from_value(base)?)
}

fn delete_by<T>(
    items: &mut Vec<T>,
    entity: &'static str,
    id: i64,
    id_of: impl Fn(&T) -> i64,
) -> Result<(), StoreError> {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    if items.len() == before {
        return Err(StoreError::NotFound { entity, id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed() -> SeedData {
        SeedData {
            movies: vec![
                Movie {
                    movie_id: 101,
                    title: "The Last Stand".to_string(),
                    release_year: Some(2023),
                    genre: Some("Action".to_string()),
                    duration: Some(125),
                    description: None,
                    average_rating: Some(4.3),
                    poster_url: None,
                },
                Movie {
                    movie_id: 102,
                    title: "Eternal Love".to_string(),
                    release_year: Some(2022),
                    genre: Some("Drama".to_string()),
                    duration: Some(138),
                    description: None,
                    average_rating: Some(4.5),
                    poster_url: None,
                },
                Movie {
                    movie_id: 103,
                    title: "Sleepy Town".to_string(),
                    release_year: Some(2020),
                    genre: Some("Documentary".to_string()),
                    duration: Some(80),
                    description: None,
                    average_rating: Some(2.1),
                    poster_url: None,
                },
            ],
            users: vec![User {
                user_id: 1,
                username: "john_doe".to_string(),
                email: None,
                password_hash: None,
                join_date: None,
                age: None,
                most_watched_genre: None,
            }],
            ratings: vec![Rating {
                rating_id: 1,
                user_id: 1,
                movie_id: 101,
                rating_value: 4.5,
                rating_date: Some("2023-04-01".to_string()),
                username: None,
                movie_title: None,
            }],
            watch_history: vec![WatchEntry {
                history_id: 1,
                user_id: 1,
                movie_id: 101,
                last_watch_date: Some("2023-04-01".to_string()),
                progress: Some("100%".to_string()),
                watch_date: None,
                username: None,
                movie_title: None,
            }],
            recommendations: vec![],
            genres: vec![Genre {
                genre_id: 1,
                genre_name: "Action".to_string(),
            }],
        }
    }

    #[test]
    fn test_initialize_is_version_gated() {
        let mut store = MockStore::new();
        assert!(store.initialize("3.0", &seed()));
        assert_eq!(store.movies().len(), 3);

        // Same version, already seeded: no reseed.
        store.delete_movie(103).unwrap();
        assert!(!store.initialize("3.0", &seed()));
        assert_eq!(store.movies().len(), 2);

        // Version bump: full reset-and-reseed.
        assert!(store.initialize("3.1", &seed()));
        assert_eq!(store.movies().len(), 3);
        assert_eq!(store.version(), Some("3.1"));
    }

    #[test]
    fn test_empty_movie_seed_does_not_reseed_forever() {
        let mut store = MockStore::new();
        let mut data = seed();
        data.movies.clear();

        // A dump that legitimately yields zero movies still counts as seeded.
        assert!(store.initialize("3.0", &data));
        assert!(store.movies().is_empty());

        store.create_movie(Movie {
            movie_id: 0,
            title: "Only Movie".to_string(),
            release_year: None,
            genre: None,
            duration: None,
            description: None,
            average_rating: None,
            poster_url: None,
        });
        assert!(!store.initialize("3.0", &data));
        assert_eq!(store.movies().len(), 1);
    }

    #[test]
    fn test_seeding_enriches_relationships() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());

        let rating = &store.ratings()[0];
        assert_eq!(rating.username.as_deref(), Some("john_doe"));
        assert_eq!(rating.movie_title.as_deref(), Some("The Last Stand"));

        let entry = &store.watch_history()[0];
        assert_eq!(entry.watch_date, entry.last_watch_date);
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());

        let created = store.create_movie(Movie {
            movie_id: 0,
            title: "New Movie".to_string(),
            release_year: Some(2024),
            genre: Some("Action".to_string()),
            duration: Some(100),
            description: None,
            average_rating: None,
            poster_url: None,
        });
        assert_eq!(created.movie_id, 104);
        assert_eq!(created.average_rating, Some(0.0));
        assert_eq!(store.movie(104).unwrap().title, "New Movie");
    }

    #[test]
    fn test_update_merges_patch() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());

        let updated = store
            .update_movie(101, &json!({"duration": 130}))
            .unwrap();
        assert_eq!(updated.duration, Some(130));
        assert_eq!(updated.title, "The Last Stand");
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());
        assert!(matches!(
            store.delete_rating(999),
            Err(StoreError::NotFound { entity: "rating", id: 999 })
        ));
    }

    #[test]
    fn test_create_rating_stamps_defaults() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());

        let rating = store.create_rating(Rating {
            rating_id: 0,
            user_id: 1,
            movie_id: 102,
            rating_value: 4.0,
            rating_date: None,
            username: None,
            movie_title: None,
        });
        assert_eq!(rating.rating_id, 2);
        assert!(rating.rating_date.is_some());
        assert_eq!(rating.movie_title.as_deref(), Some("Eternal Love"));
    }

    #[test]
    fn test_generate_recommendations_prefers_rated_genres() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());

        let recs = store.generate_recommendations(1);
        // 101 matches the preferred Action genre, 102 is highly rated,
        // 103 is neither preferred nor highly rated.
        let by_movie: HashMap<i64, &Recommendation> =
            recs.iter().map(|r| (r.movie_id, r)).collect();
        assert!(by_movie[&101]
            .reason
            .as_deref()
            .unwrap()
            .starts_with("Based on your interest in Action"));
        assert!(by_movie[&102]
            .reason
            .as_deref()
            .unwrap()
            .starts_with("Highly rated Drama movie (4.5/5.0)"));
        assert!(!by_movie.contains_key(&103));
        assert_eq!(store.recommendations().len(), recs.len());
    }

    #[test]
    fn test_zero_weight_genre_is_not_preferred() {
        let mut store = MockStore::new();
        let mut data = seed();
        // The user's only rating is a zero for the low-rated documentary.
        data.ratings = vec![Rating {
            rating_id: 1,
            user_id: 1,
            movie_id: 103,
            rating_value: 0.0,
            rating_date: Some("2023-04-01".to_string()),
            username: None,
            movie_title: None,
        }];
        store.initialize("3.0", &data);

        let recs = store.generate_recommendations(1);
        // Documentary carries no positive weight, so 103 only qualifies via
        // its average rating, which is below the 3.5 bar.
        assert!(recs.iter().all(|r| r.movie_id != 103));
        // The highly rated movies still come through.
        assert!(recs.iter().any(|r| r.movie_id == 101));
        assert!(recs.iter().any(|r| r.movie_id == 102));
    }

    #[test]
    fn test_generate_recommendations_without_history() {
        let mut store = MockStore::new();
        let mut data = seed();
        data.ratings.clear();
        store.initialize("3.0", &data);

        let recs = store.generate_recommendations(7);
        // No preferences: every movie qualifies, including the low-rated one.
        assert_eq!(recs.len(), 3);
        assert!(recs
            .iter()
            .any(|r| r.reason.as_deref().unwrap().starts_with("Popular Documentary")));
        assert_eq!(recs[0].username.as_deref(), Some("User 7"));
    }

    #[test]
    fn test_generate_skips_existing_recommendations() {
        let mut store = MockStore::new();
        store.initialize("3.0", &seed());
        let first = store.generate_recommendations(1);
        let second = store.generate_recommendations(1);
        assert!(!first.is_empty());
        assert!(second.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/mock_store.json");

        let mut store = MockStore::new();
        store.initialize("3.0", &seed());
        store.save(&path).unwrap();

        let loaded = MockStore::load(&path).unwrap();
        assert_eq!(loaded.version(), Some("3.0"));
        assert_eq!(loaded.movies().len(), store.movies().len());
        assert_eq!(loaded.ratings()[0], store.ratings()[0]);
    }
}
