//! Record builders shared by the pipeline tests.

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{
    CertificationRecord, EducationRecord, EducationStatus, ExperienceRecord, Profile,
    ProjectRecord, SkillCategory, SkillRecord,
};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn profile() -> Profile {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Profile {
        id: Uuid::from_u128(1),
        user_id: Uuid::from_u128(2),
        full_name: "Ana Pérez".to_string(),
        professional_title: "Backend Engineer".to_string(),
        email: "ana@example.com".to_string(),
        phone: Some("0991234567".to_string()),
        linkedin_url: None,
        github_url: None,
        website_url: None,
        city: "Quito".to_string(),
        country: "Ecuador".to_string(),
        years_experience: 5,
        summary: Some("Backend engineer focused on data-heavy services.".to_string()),
        photo_url: None,
        slug: "ana-perez-1a2b3c4d".to_string(),
        is_public: true,
        created_at: ts,
        updated_at: ts,
    }
}

pub fn experience(role: &str, start: NaiveDate, end: Option<NaiveDate>) -> ExperienceRecord {
    ExperienceRecord {
        id: Uuid::new_v4(),
        profile_id: Uuid::from_u128(1),
        role: role.to_string(),
        company: "Acme".to_string(),
        city: "Quito".to_string(),
        country: "Ecuador".to_string(),
        start_date: start,
        end_date: end,
        is_current: end.is_none(),
        description: None,
        achievements: None,
        technologies: Vec::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn education(degree: &str, start: NaiveDate, end: Option<NaiveDate>) -> EducationRecord {
    EducationRecord {
        id: Uuid::new_v4(),
        profile_id: Uuid::from_u128(1),
        degree: degree.to_string(),
        institution: "Universidad Central".to_string(),
        start_date: start,
        end_date: end,
        status: if end.is_some() {
            EducationStatus::Completed
        } else {
            EducationStatus::InProgress
        },
        grade: None,
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn skill(name: &str, category: SkillCategory, level: i16, featured: bool) -> SkillRecord {
    SkillRecord {
        id: Uuid::new_v4(),
        profile_id: Uuid::from_u128(1),
        name: name.to_string(),
        category,
        level,
        featured,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn project(name: &str, featured: bool) -> ProjectRecord {
    ProjectRecord {
        id: Uuid::new_v4(),
        profile_id: Uuid::from_u128(1),
        name: name.to_string(),
        short_description: format!("{name} short description"),
        long_description: None,
        technologies: Vec::new(),
        demo_url: None,
        repo_url: None,
        featured,
        start_date: Some(ymd(2022, 1, 1)),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn certification(name: &str, obtained_on: NaiveDate) -> CertificationRecord {
    CertificationRecord {
        id: Uuid::new_v4(),
        profile_id: Uuid::from_u128(1),
        name: name.to_string(),
        institution: "Cloud Institute".to_string(),
        obtained_on,
        expires_on: None,
        credential_code: None,
        credential_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
