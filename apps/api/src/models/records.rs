use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations (backed by PostgreSQL enum types)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "education_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EducationStatus {
    Completed,
    InProgress,
    Incomplete,
}

impl EducationStatus {
    /// Display label used on the CV.
    pub fn label(&self) -> &'static str {
        match self {
            EducationStatus::Completed => "Finalizado",
            EducationStatus::InProgress => "En curso",
            EducationStatus::Incomplete => "Incompleto",
        }
    }
}

/// Skill category. Declaration order is the display order and matches the
/// order of the PostgreSQL enum, so `ORDER BY category` agrees with `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "skill_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Language,
    Tool,
}

// ────────────────────────────────────────────────────────────────────────────
// Section records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub degree: String,
    pub institution: String,
    pub start_date: NaiveDate,
    /// `None` while the studies are in progress.
    pub end_date: Option<NaiveDate>,
    pub status: EducationStatus,
    /// Grade on a 0–10 scale.
    pub grade: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub role: String,
    pub company: String,
    pub city: String,
    pub country: String,
    pub start_date: NaiveDate,
    /// Always `None` when `is_current` is set.
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: Option<String>,
    pub achievements: Option<String>,
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ExperienceRecord {
    pub fn is_ongoing(&self) -> bool {
        self.is_current || self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    /// Proficiency, 0–100.
    pub level: i16,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub technologies: Vec<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub featured: bool,
    pub start_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferenceRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub position: String,
    pub company: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub relationship: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CertificationRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub institution: String,
    pub obtained_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub credential_code: Option<String>,
    pub credential_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
