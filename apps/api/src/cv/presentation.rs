//! CV payloads for the JSON endpoints, enriched with display helpers
//! (durations, proficiency labels, initials, link domains).

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::cv::accessor::ProfileSnapshot;
use crate::models::{
    CertificationRecord, EducationRecord, ExperienceRecord, Profile, ProjectRecord,
    ReferenceRecord, SkillRecord,
};

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn plural(n: i32, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Calendar-month distance between two dates, in Spanish:
/// `2 años y 3 meses`, `1 año`, `5 meses`, `Menos de un mes`.
pub fn duration_es(start: NaiveDate, end: NaiveDate) -> String {
    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    if months < 0 {
        years -= 1;
        months += 12;
    }

    match (years > 0, months > 0) {
        (true, true) => format!(
            "{} y {}",
            plural(years, "año", "años"),
            plural(months, "mes", "meses")
        ),
        (true, false) => plural(years, "año", "años"),
        (false, true) => plural(months, "mes", "meses"),
        (false, false) => "Menos de un mes".to_string(),
    }
}

/// Proficiency label for a 0–100 level.
pub fn proficiency_label(level: i16) -> &'static str {
    match level {
        90.. => "Experto",
        70..=89 => "Avanzado",
        50..=69 => "Intermedio",
        30..=49 => "Básico",
        _ => "Principiante",
    }
}

/// Badge colour for a 0–100 level.
pub fn level_color(level: i16) -> &'static str {
    match level {
        80.. => "#28a745",
        60..=79 => "#17a2b8",
        40..=59 => "#ffc107",
        _ => "#dc3545",
    }
}

/// First letters of the first and last names; the first two letters of a
/// single name; `CV` when the name is blank.
pub fn initials(full_name: &str) -> String {
    let words: Vec<&str> = full_name.split_whitespace().collect();
    match words.as_slice() {
        [] => "CV".to_string(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// Host part of a URL without scheme or a leading `www.`.
pub fn url_domain(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.split('/').next().unwrap_or_default().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
    #[serde(flatten)]
    pub record: ExperienceRecord,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillView {
    #[serde(flatten)]
    pub record: SkillRecord,
    pub proficiency: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub record: ProjectRecord,
    pub demo_domain: Option<String>,
    pub repo_domain: Option<String>,
}

/// A profile and its sections as served by the CV endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CvView {
    pub profile: Profile,
    pub initials: String,
    pub location: String,
    pub experience: Vec<ExperienceView>,
    pub education: Vec<EducationRecord>,
    pub skills: Vec<SkillView>,
    pub projects: Vec<ProjectView>,
    pub certifications: Vec<CertificationRecord>,
    pub references: Vec<ReferenceRecord>,
}

impl CvView {
    /// Ongoing experiences are measured up to `today`.
    pub fn from_snapshot(snapshot: ProfileSnapshot, today: NaiveDate) -> Self {
        let ProfileSnapshot {
            profile,
            education,
            experience,
            skills,
            projects,
            certifications,
            references,
        } = snapshot;

        let experience = experience
            .into_iter()
            .map(|record| {
                let end = if record.is_ongoing() {
                    today
                } else {
                    record.end_date.unwrap_or(today)
                };
                ExperienceView {
                    duration: duration_es(record.start_date, end),
                    record,
                }
            })
            .collect();

        let skills = skills
            .into_iter()
            .map(|record| SkillView {
                proficiency: proficiency_label(record.level),
                color: level_color(record.level),
                record,
            })
            .collect();

        let projects = projects
            .into_iter()
            .map(|record| ProjectView {
                demo_domain: record.demo_url.as_deref().map(url_domain),
                repo_domain: record.repo_url.as_deref().map(url_domain),
                record,
            })
            .collect();

        Self {
            initials: initials(&profile.full_name),
            location: profile.location(),
            profile,
            experience,
            education,
            skills,
            projects,
            certifications,
            references,
        }
    }
}
