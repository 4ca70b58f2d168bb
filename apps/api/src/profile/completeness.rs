use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Profile;

/// Number of records per section for one profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SectionCounts {
    pub education: i64,
    pub experience: i64,
    pub skills: i64,
    pub projects: i64,
    pub certifications: i64,
    pub references: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Partial,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub entry_count: i64,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Share of the six dashboard checks that pass, 0–100.
    pub progress: u8,
    /// Weighted ten-point score, 0–100.
    pub completeness: u8,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Skills needed for full skill points.
const SKILLS_FOR_FULL_POINTS: i64 = 5;

/// `floor(done / 6 * 100)` over: education, experience, skills, projects,
/// summary, photo.
pub fn progress_percent(counts: &SectionCounts, profile: &Profile) -> u8 {
    let checks = [
        counts.education > 0,
        counts.experience > 0,
        counts.skills > 0,
        counts.projects > 0,
        profile.summary.is_some(),
        profile.photo_url.is_some(),
    ];
    let done = checks.iter().filter(|c| **c).count();
    (done * 100 / checks.len()) as u8
}

/// Ten points: photo 1, summary 1, education 2, experience 2, skills 2 (five
/// or more) or 1 (at least one), projects 1, certifications 1.
pub fn completeness_percent(counts: &SectionCounts, profile: &Profile) -> u8 {
    let mut points = 0u8;
    if profile.photo_url.is_some() {
        points += 1;
    }
    if profile.summary.is_some() {
        points += 1;
    }
    if counts.education > 0 {
        points += 2;
    }
    if counts.experience > 0 {
        points += 2;
    }
    points += match counts.skills {
        n if n >= SKILLS_FOR_FULL_POINTS => 2,
        n if n > 0 => 1,
        _ => 0,
    };
    if counts.projects > 0 {
        points += 1;
    }
    if counts.certifications > 0 {
        points += 1;
    }
    points * 10
}

pub fn compute_completeness_report(counts: &SectionCounts, profile: &Profile) -> CompletenessReport {
    let entries = [
        ("education", counts.education),
        ("experience", counts.experience),
        ("skills", counts.skills),
        ("projects", counts.projects),
        ("certifications", counts.certifications),
        ("references", counts.references),
    ];

    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut recommendations = Vec::new();

    for (section, entry_count) in entries {
        let status = match (section, entry_count) {
            (_, 0) => SectionStatus::Missing,
            ("skills", n) if n < SKILLS_FOR_FULL_POINTS => SectionStatus::Partial,
            _ => SectionStatus::Complete,
        };
        if status == SectionStatus::Missing {
            missing_sections.push(section.to_string());
        }
        sections.push(SectionHealth {
            section: section.to_string(),
            entry_count,
            status,
        });
    }

    if profile.summary.is_none() {
        recommendations.push("Agrega un resumen profesional".to_string());
    }
    if profile.photo_url.is_none() {
        recommendations.push("Agrega una foto de perfil".to_string());
    }
    if (1..SKILLS_FOR_FULL_POINTS).contains(&counts.skills) {
        recommendations.push(format!(
            "Registra al menos {SKILLS_FOR_FULL_POINTS} habilidades"
        ));
    }

    CompletenessReport {
        progress: progress_percent(counts, profile),
        completeness: completeness_percent(counts, profile),
        sections,
        missing_sections,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::fixtures::profile;

    fn bare_profile() -> Profile {
        let mut p = profile();
        p.summary = None;
        p.photo_url = None;
        p
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let counts = SectionCounts::default();
        let p = bare_profile();
        assert_eq!(progress_percent(&counts, &p), 0);
        assert_eq!(completeness_percent(&counts, &p), 0);
    }

    #[test]
    fn test_progress_floors() {
        let counts = SectionCounts {
            education: 1,
            ..Default::default()
        };
        // 1 of 6 checks → 16.67 → 16
        assert_eq!(progress_percent(&counts, &bare_profile()), 16);

        let counts = SectionCounts {
            education: 1,
            experience: 2,
            skills: 3,
            projects: 1,
            ..Default::default()
        };
        // 4 of 6 → 66
        assert_eq!(progress_percent(&counts, &bare_profile()), 66);
    }

    #[test]
    fn test_full_profile_scores_hundred() {
        let counts = SectionCounts {
            education: 1,
            experience: 1,
            skills: 5,
            projects: 1,
            certifications: 1,
            references: 0,
        };
        let mut p = profile();
        p.photo_url = Some("https://cdn.example.com/ana.jpg".to_string());
        assert_eq!(progress_percent(&counts, &p), 100);
        assert_eq!(completeness_percent(&counts, &p), 100);
    }

    #[test]
    fn test_few_skills_earn_one_point() {
        let counts = SectionCounts {
            skills: 4,
            ..Default::default()
        };
        assert_eq!(completeness_percent(&counts, &bare_profile()), 10);
    }

    #[test]
    fn test_report_lists_missing_sections() {
        let counts = SectionCounts {
            experience: 2,
            skills: 2,
            ..Default::default()
        };
        let report = compute_completeness_report(&counts, &bare_profile());
        assert_eq!(
            report.missing_sections,
            vec!["education", "projects", "certifications", "references"]
        );
        let skills = report
            .sections
            .iter()
            .find(|s| s.section == "skills")
            .unwrap();
        assert_eq!(skills.status, SectionStatus::Partial);
        assert_eq!(report.recommendations.len(), 3);
    }
}
