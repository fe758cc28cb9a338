use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title reported when an attempt outlives the quiz it was taken on.
pub const FALLBACK_QUIZ_TITLE: &str = "Quiz";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub published: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(title: &str, published: bool) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            published,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_quiz_gets_unique_id_and_matching_timestamps() {
        let first = Quiz::new("Rust basics", true);
        let second = Quiz::new("Rust basics", true);

        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
        assert!(first.published);
        assert!(first.description.is_none());
    }
}
