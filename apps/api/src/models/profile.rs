use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The single résumé record owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    #[serde(skip_serializing, default)]
    pub user_id: Uuid,
    pub full_name: String,
    pub professional_title: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub city: String,
    pub country: String,
    pub years_experience: i32,
    pub summary: Option<String>,
    pub photo_url: Option<String>,
    pub slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// `city, country`, skipping whichever half is blank.
    pub fn location(&self) -> String {
        [self.city.trim(), self.country.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
