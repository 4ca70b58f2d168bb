//! Fetches a profile's related records, ordered and
//! capped according to an explicit [`SectionCaps`] policy.
//!
//! The ordering rules exist in two forms: SQL (`ORDER BY` + `LIMIT`) in
//! [`PgProfileSource`], and pure functions (`order_*`, [`assemble_snapshot`])
//! used by in-memory sources. Both must agree.

use std::cmp::Reverse;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CertificationRecord, EducationRecord, ExperienceRecord, Profile, ProjectRecord,
    ReferenceRecord, SkillRecord,
};
use crate::profile::completeness::SectionCounts;

// ────────────────────────────────────────────────────────────────────────────
// Cap policy
// ────────────────────────────────────────────────────────────────────────────

/// Per-section maximum item counts. `None` means uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionCaps {
    pub education: Option<usize>,
    pub experience: Option<usize>,
    pub skills: Option<usize>,
    pub projects: Option<usize>,
    /// Restrict projects to the featured subset before capping.
    pub featured_projects_only: bool,
    pub certifications: Option<usize>,
    pub references: Option<usize>,
}

impl SectionCaps {
    /// Caps used by the PDF document.
    pub const PDF_DOCUMENT: SectionCaps = SectionCaps {
        education: Some(5),
        experience: Some(10),
        skills: Some(15),
        projects: Some(4),
        featured_projects_only: true,
        certifications: Some(5),
        references: Some(3),
    };

    /// Caps used by the public CV page. Shows up to 6 featured projects,
    /// unlike the PDF's 4; both limits are kept as-is.
    pub const PUBLIC_PAGE: SectionCaps = SectionCaps {
        education: Some(5),
        experience: Some(10),
        skills: Some(20),
        projects: Some(6),
        featured_projects_only: true,
        certifications: Some(10),
        references: Some(3),
    };

    /// Dashboard "latest activity": three experiences and three projects.
    pub const DASHBOARD_LATEST: SectionCaps = SectionCaps {
        education: Some(0),
        experience: Some(3),
        skills: Some(0),
        projects: Some(3),
        featured_projects_only: false,
        certifications: Some(0),
        references: Some(0),
    };

    /// The owner's own full CV view.
    pub const UNBOUNDED: SectionCaps = SectionCaps {
        education: None,
        experience: None,
        skills: None,
        projects: None,
        featured_projects_only: false,
        certifications: None,
        references: None,
    };
}

fn sql_limit(cap: Option<usize>) -> Option<i64> {
    cap.map(|n| i64::try_from(n).unwrap_or(i64::MAX))
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot
// ────────────────────────────────────────────────────────────────────────────

/// A profile and its related records, read once, ordered and capped.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSnapshot {
    pub profile: Profile,
    pub education: Vec<EducationRecord>,
    pub experience: Vec<ExperienceRecord>,
    pub skills: Vec<SkillRecord>,
    pub projects: Vec<ProjectRecord>,
    pub certifications: Vec<CertificationRecord>,
    pub references: Vec<ReferenceRecord>,
}

impl ProfileSnapshot {
    pub fn empty(profile: Profile) -> Self {
        Self {
            profile,
            education: Vec::new(),
            experience: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            references: Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ordering rules
// ────────────────────────────────────────────────────────────────────────────

/// Most recent first (start date descending).
pub fn order_education(records: &mut [EducationRecord]) {
    records.sort_by_key(|r| (Reverse(r.start_date), Reverse(r.created_at)));
}

/// Most recent first (start date descending).
pub fn order_experience(records: &mut [ExperienceRecord]) {
    records.sort_by_key(|r| (Reverse(r.start_date), Reverse(r.created_at)));
}

/// Featured first, then category, then proficiency descending.
pub fn order_skills(records: &mut [SkillRecord]) {
    records.sort_by_key(|r| (Reverse(r.featured), r.category, Reverse(r.level)));
}

/// Featured first, then most recent (undated projects last).
pub fn order_projects(records: &mut [ProjectRecord]) {
    records.sort_by_key(|r| {
        (
            Reverse(r.featured),
            r.start_date.is_none(),
            Reverse(r.start_date),
            Reverse(r.created_at),
        )
    });
}

/// Most recently obtained first.
pub fn order_certifications(records: &mut [CertificationRecord]) {
    records.sort_by_key(|r| Reverse(r.obtained_on));
}

/// Insertion order.
pub fn order_references(records: &mut [ReferenceRecord]) {
    records.sort_by_key(|r| r.created_at);
}

fn capped<T>(mut records: Vec<T>, cap: Option<usize>) -> Vec<T> {
    if let Some(max) = cap {
        records.truncate(max);
    }
    records
}

/// Unordered section records for one profile.
#[derive(Debug, Clone, Default)]
pub struct SectionRecords {
    pub education: Vec<EducationRecord>,
    pub experience: Vec<ExperienceRecord>,
    pub skills: Vec<SkillRecord>,
    pub projects: Vec<ProjectRecord>,
    pub certifications: Vec<CertificationRecord>,
    pub references: Vec<ReferenceRecord>,
}

/// Orders, filters and caps raw section records into a snapshot.
pub fn assemble_snapshot(
    profile: Profile,
    records: SectionRecords,
    caps: &SectionCaps,
) -> ProfileSnapshot {
    let SectionRecords {
        mut education,
        mut experience,
        mut skills,
        mut projects,
        mut certifications,
        mut references,
    } = records;

    order_education(&mut education);
    order_experience(&mut experience);
    order_skills(&mut skills);
    if caps.featured_projects_only {
        projects.retain(|p| p.featured);
    }
    order_projects(&mut projects);
    order_certifications(&mut certifications);
    order_references(&mut references);

    ProfileSnapshot {
        profile,
        education: capped(education, caps.education),
        experience: capped(experience, caps.experience),
        skills: capped(skills, caps.skills),
        projects: capped(projects, caps.projects),
        certifications: capped(certifications, caps.certifications),
        references: capped(references, caps.references),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Source trait
// ────────────────────────────────────────────────────────────────────────────

/// Read access to profiles for the document pipeline.
///
/// Carried in `AppState` as `Arc<dyn ProfileSource>`.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    async fn profile_by_slug(&self, slug: &str) -> Result<Option<Profile>, AppError>;

    async fn snapshot(
        &self,
        profile: Profile,
        caps: &SectionCaps,
    ) -> Result<ProfileSnapshot, AppError>;

    async fn section_counts(&self, profile_id: Uuid) -> Result<SectionCounts, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct PgProfileSource {
    pool: PgPool,
}

impl PgProfileSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileSource for PgProfileSource {
    async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn profile_by_slug(&self, slug: &str) -> Result<Option<Profile>, AppError> {
        Ok(
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn snapshot(
        &self,
        profile: Profile,
        caps: &SectionCaps,
    ) -> Result<ProfileSnapshot, AppError> {
        let profile_id = profile.id;

        // LIMIT NULL is LIMIT ALL in PostgreSQL.
        let education = sqlx::query_as::<_, EducationRecord>(
            "SELECT * FROM education WHERE profile_id = $1 \
             ORDER BY start_date DESC, created_at DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(sql_limit(caps.education))
        .fetch_all(&self.pool)
        .await?;

        let experience = sqlx::query_as::<_, ExperienceRecord>(
            "SELECT * FROM experience WHERE profile_id = $1 \
             ORDER BY start_date DESC, created_at DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(sql_limit(caps.experience))
        .fetch_all(&self.pool)
        .await?;

        let skills = sqlx::query_as::<_, SkillRecord>(
            "SELECT * FROM skills WHERE profile_id = $1 \
             ORDER BY featured DESC, category ASC, level DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(sql_limit(caps.skills))
        .fetch_all(&self.pool)
        .await?;

        let projects = sqlx::query_as::<_, ProjectRecord>(
            "SELECT * FROM projects WHERE profile_id = $1 AND (NOT $3 OR featured) \
             ORDER BY featured DESC, start_date DESC NULLS LAST, created_at DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(sql_limit(caps.projects))
        .bind(caps.featured_projects_only)
        .fetch_all(&self.pool)
        .await?;

        let certifications = sqlx::query_as::<_, CertificationRecord>(
            "SELECT * FROM certifications WHERE profile_id = $1 \
             ORDER BY obtained_on DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(sql_limit(caps.certifications))
        .fetch_all(&self.pool)
        .await?;

        let references = sqlx::query_as::<_, ReferenceRecord>(
            "SELECT * FROM profile_references WHERE profile_id = $1 \
             ORDER BY created_at ASC LIMIT $2",
        )
        .bind(profile_id)
        .bind(sql_limit(caps.references))
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Loaded snapshot for profile {profile_id}: {} edu, {} exp, {} skills, {} projects, {} certs, {} refs",
            education.len(),
            experience.len(),
            skills.len(),
            projects.len(),
            certifications.len(),
            references.len()
        );

        Ok(ProfileSnapshot {
            profile,
            education,
            experience,
            skills,
            projects,
            certifications,
            references,
        })
    }

    async fn section_counts(&self, profile_id: Uuid) -> Result<SectionCounts, AppError> {
        Ok(sqlx::query_as::<_, SectionCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM education WHERE profile_id = $1)          AS education,
                (SELECT COUNT(*) FROM experience WHERE profile_id = $1)         AS experience,
                (SELECT COUNT(*) FROM skills WHERE profile_id = $1)             AS skills,
                (SELECT COUNT(*) FROM projects WHERE profile_id = $1)           AS projects,
                (SELECT COUNT(*) FROM certifications WHERE profile_id = $1)     AS certifications,
                (SELECT COUNT(*) FROM profile_references WHERE profile_id = $1) AS "references"
            "#,
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementation (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use super::*;

    /// A single-profile source holding raw records in memory.
    pub struct InMemoryProfileSource {
        pub profile: Option<Profile>,
        pub records: SectionRecords,
    }

    #[async_trait]
    impl ProfileSource for InMemoryProfileSource {
        async fn profile_for_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
            Ok(self.profile.clone().filter(|p| p.user_id == user_id))
        }

        async fn profile_by_slug(&self, slug: &str) -> Result<Option<Profile>, AppError> {
            Ok(self.profile.clone().filter(|p| p.slug == slug))
        }

        async fn snapshot(
            &self,
            profile: Profile,
            caps: &SectionCaps,
        ) -> Result<ProfileSnapshot, AppError> {
            Ok(assemble_snapshot(profile, self.records.clone(), caps))
        }

        async fn section_counts(&self, profile_id: Uuid) -> Result<SectionCounts, AppError> {
            let owned = self.profile.as_ref().is_some_and(|p| p.id == profile_id);
            if !owned {
                return Ok(SectionCounts::default());
            }
            let r = &self.records;
            Ok(SectionCounts {
                education: r.education.len() as i64,
                experience: r.experience.len() as i64,
                skills: r.skills.len() as i64,
                projects: r.projects.len() as i64,
                certifications: r.certifications.len() as i64,
                references: r.references.len() as i64,
            })
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
