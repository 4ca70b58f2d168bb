//! Request bodies for the profile and section CRUD endpoints.
//!
//! Field rules are declared with `validator`; date rules that relate two
//! fields or depend on today's date are checked in [`RecordInput::check_dates`].
//! Blank optional strings are normalised to `None` before validation so that
//! downstream code only ever branches on present vs. absent.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{EducationStatus, SkillCategory};

const MAX_NAME_LENGTH: u64 = 150;
const MAX_SHORT_TEXT_LENGTH: u64 = 300;
const MAX_LONG_TEXT_LENGTH: u64 = 5000;

// ────────────────────────────────────────────────────────────────────────────
// Shared rules
// ────────────────────────────────────────────────────────────────────────────

/// Trims a required string in place.
fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional string and drops it when blank.
fn blank_to_none(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}

fn clean_list(values: &mut Vec<String>) {
    values.iter_mut().for_each(trim);
    values.retain(|v| !v.is_empty());
}

fn not_in_future(field: &str, date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date > today {
        return Err(AppError::Validation(format!(
            "{field}: la fecha no puede ser futura"
        )));
    }
    Ok(())
}

fn not_before(
    field: &str,
    later: NaiveDate,
    earlier_field: &str,
    earlier: NaiveDate,
) -> Result<(), AppError> {
    if later < earlier {
        return Err(AppError::Validation(format!(
            "{field}: no puede ser anterior a {earlier_field}"
        )));
    }
    Ok(())
}

/// Normalises, validates, then checks dates.
pub trait RecordInput: Validate + Sized {
    fn normalize(&mut self);

    fn check_dates(&self, _today: NaiveDate) -> Result<(), AppError> {
        Ok(())
    }

    fn prepare(mut self, today: NaiveDate) -> Result<Self, AppError> {
        self.normalize();
        self.validate()?;
        self.check_dates(today)?;
        Ok(self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub full_name: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub professional_title: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub country: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 80))]
    pub years_experience: i32,
    #[validate(length(max = MAX_LONG_TEXT_LENGTH))]
    pub summary: Option<String>,
    #[validate(url)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl RecordInput for ProfileInput {
    fn normalize(&mut self) {
        trim(&mut self.full_name);
        trim(&mut self.professional_title);
        trim(&mut self.email);
        trim(&mut self.city);
        trim(&mut self.country);
        for field in [
            &mut self.phone,
            &mut self.linkedin_url,
            &mut self.github_url,
            &mut self.website_url,
            &mut self.summary,
            &mut self.photo_url,
        ] {
            blank_to_none(field);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EducationInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub degree: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub institution: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: EducationStatus,
    #[validate(range(min = 0.0, max = 10.0))]
    pub grade: Option<f64>,
    #[validate(length(max = MAX_LONG_TEXT_LENGTH))]
    pub description: Option<String>,
}

impl RecordInput for EducationInput {
    fn normalize(&mut self) {
        trim(&mut self.degree);
        trim(&mut self.institution);
        blank_to_none(&mut self.description);
    }

    fn check_dates(&self, today: NaiveDate) -> Result<(), AppError> {
        not_in_future("start_date", self.start_date, today)?;
        if let Some(end) = self.end_date {
            not_in_future("end_date", end, today)?;
            not_before("end_date", end, "start_date", self.start_date)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExperienceInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub role: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub company: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[validate(length(max = MAX_LONG_TEXT_LENGTH))]
    pub description: Option<String>,
    #[validate(length(max = MAX_LONG_TEXT_LENGTH))]
    pub achievements: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl RecordInput for ExperienceInput {
    fn normalize(&mut self) {
        trim(&mut self.role);
        trim(&mut self.company);
        trim(&mut self.city);
        trim(&mut self.country);
        blank_to_none(&mut self.description);
        blank_to_none(&mut self.achievements);
        clean_list(&mut self.technologies);
        if self.is_current {
            self.end_date = None;
        }
    }

    fn check_dates(&self, today: NaiveDate) -> Result<(), AppError> {
        not_in_future("start_date", self.start_date, today)?;
        if let Some(end) = self.end_date {
            not_in_future("end_date", end, today)?;
            not_before("end_date", end, "start_date", self.start_date)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SkillInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub category: SkillCategory,
    #[validate(range(min = 0, max = 100))]
    pub level: i16,
    #[serde(default)]
    pub featured: bool,
}

impl RecordInput for SkillInput {
    fn normalize(&mut self) {
        trim(&mut self.name);
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub short_description: String,
    #[validate(length(max = MAX_LONG_TEXT_LENGTH))]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[validate(url)]
    pub demo_url: Option<String>,
    #[validate(url)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub start_date: Option<NaiveDate>,
}

impl RecordInput for ProjectInput {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.short_description);
        blank_to_none(&mut self.long_description);
        blank_to_none(&mut self.demo_url);
        blank_to_none(&mut self.repo_url);
        clean_list(&mut self.technologies);
    }

    fn check_dates(&self, today: NaiveDate) -> Result<(), AppError> {
        match self.start_date {
            Some(start) => not_in_future("start_date", start, today),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReferenceInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub position: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub company: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub relationship: Option<String>,
}

impl RecordInput for ReferenceInput {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.position);
        trim(&mut self.company);
        blank_to_none(&mut self.phone);
        blank_to_none(&mut self.email);
        blank_to_none(&mut self.relationship);
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CertificationInput {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub institution: String,
    pub obtained_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub credential_code: Option<String>,
    #[validate(url)]
    pub credential_url: Option<String>,
}

impl RecordInput for CertificationInput {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.institution);
        blank_to_none(&mut self.credential_code);
        blank_to_none(&mut self.credential_url);
    }

    fn check_dates(&self, today: NaiveDate) -> Result<(), AppError> {
        not_in_future("obtained_on", self.obtained_on, today)?;
        if let Some(expires) = self.expires_on {
            not_before("expires_on", expires, "obtained_on", self.obtained_on)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "full_name": "  Ana Pérez ",
            "professional_title": "Backend Engineer",
            "email": "ana@example.com",
            "phone": "   ",
            "github_url": "https://github.com/ana",
            "city": "Quito",
            "country": "Ecuador",
            "years_experience": 5
        })
    }

    #[test]
    fn test_profile_input_normalizes_blanks() {
        let input: ProfileInput = serde_json::from_value(profile_json()).unwrap();
        let input = input.prepare(today()).unwrap();
        assert_eq!(input.full_name, "Ana Pérez");
        assert_eq!(input.phone, None);
        assert!(!input.is_public);
    }

    #[test]
    fn test_profile_input_rejects_bad_email() {
        let mut body = profile_json();
        body["email"] = json!("not-an-email");
        let input: ProfileInput = serde_json::from_value(body).unwrap();
        assert!(matches!(input.prepare(today()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_profile_input_rejects_bad_url() {
        let mut body = profile_json();
        body["linkedin_url"] = json!("linkedin");
        let input: ProfileInput = serde_json::from_value(body).unwrap();
        assert!(matches!(input.prepare(today()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_profile_input_rejects_out_of_range_years() {
        let mut body = profile_json();
        body["years_experience"] = json!(81);
        let input: ProfileInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_err());
    }

    #[test]
    fn test_blank_required_name_is_rejected() {
        let mut body = profile_json();
        body["full_name"] = json!("   ");
        let input: ProfileInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_err());
    }

    fn experience_json() -> serde_json::Value {
        json!({
            "role": "Backend Engineer",
            "company": "Acme",
            "city": "Quito",
            "country": "Ecuador",
            "start_date": "2020-01-01",
            "end_date": "2021-06-30",
            "technologies": ["Rust", " ", " PostgreSQL "]
        })
    }

    #[test]
    fn test_current_experience_clears_end_date() {
        let mut body = experience_json();
        body["is_current"] = json!(true);
        let input: ExperienceInput = serde_json::from_value(body).unwrap();
        let input = input.prepare(today()).unwrap();
        assert_eq!(input.end_date, None);
        assert_eq!(input.technologies, vec!["Rust", "PostgreSQL"]);
    }

    #[test]
    fn test_experience_end_before_start_is_rejected() {
        let mut body = experience_json();
        body["end_date"] = json!("2019-12-31");
        let input: ExperienceInput = serde_json::from_value(body).unwrap();
        let err = input.prepare(today()).unwrap_err();
        assert!(err.to_string().contains("end_date"));
    }

    #[test]
    fn test_experience_future_start_is_rejected() {
        let mut body = experience_json();
        body["start_date"] = json!("2027-01-01");
        body["end_date"] = json!(null);
        let input: ExperienceInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_err());
    }

    #[test]
    fn test_education_grade_range() {
        let body = json!({
            "degree": "BSc",
            "institution": "Universidad Central",
            "start_date": "2012-09-01",
            "end_date": "2016-07-01",
            "status": "completed",
            "grade": 10.5
        });
        let input: EducationInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_err());
    }

    #[test]
    fn test_skill_level_range() {
        let body = json!({ "name": "Rust", "category": "technical", "level": 101 });
        let input: SkillInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_err());

        let body = json!({ "name": "Rust", "category": "technical", "level": 100 });
        let input: SkillInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_ok());
    }

    #[test]
    fn test_certification_expiry_may_be_future_but_not_before_obtained() {
        let body = json!({
            "name": "CKA",
            "institution": "CNCF",
            "obtained_on": "2025-01-10",
            "expires_on": "2028-01-10"
        });
        let input: CertificationInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_ok());

        let body = json!({
            "name": "CKA",
            "institution": "CNCF",
            "obtained_on": "2025-01-10",
            "expires_on": "2024-01-10"
        });
        let input: CertificationInput = serde_json::from_value(body).unwrap();
        assert!(input.prepare(today()).is_err());
    }

    #[test]
    fn test_project_blank_links_become_none() {
        let body = json!({
            "name": "alpha",
            "short_description": "A thing",
            "demo_url": "",
            "repo_url": "https://github.com/ana/alpha"
        });
        let input: ProjectInput = serde_json::from_value(body).unwrap();
        let input = input.prepare(today()).unwrap();
        assert_eq!(input.demo_url, None);
        assert!(input.repo_url.is_some());
    }
}
