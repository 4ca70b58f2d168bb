//! PostgreSQL persistence for profiles and their section records.
//!
//! Every section statement is scoped by `profile_id`, so a record id that
//! belongs to another profile behaves exactly like an unknown id.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CertificationRecord, EducationRecord, ExperienceRecord, Profile, ProjectRecord,
    ReferenceRecord, SkillRecord,
};
use crate::profile::inputs::{
    CertificationInput, EducationInput, ExperienceInput, ProfileInput, ProjectInput,
    RecordInput, ReferenceInput, SkillInput,
};

/// Length of the random suffix appended to profile slugs.
const SLUG_SUFFIX_LENGTH: usize = 8;

/// `<slugified name>-<8 hex chars>`.
pub fn generate_slug(full_name: &str) -> String {
    let base = slug::slugify(full_name);
    let base = if base.is_empty() { "cv".to_string() } else { base };
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{base}-{}", &suffix[..SLUG_SUFFIX_LENGTH])
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_profile_for_user(db: &PgPool, user_id: Uuid) -> Result<Option<Profile>, AppError> {
    Ok(
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?,
    )
}

/// Creates the caller's profile. A user owns at most one.
pub async fn create_profile(
    db: &PgPool,
    user_id: Uuid,
    input: &ProfileInput,
) -> Result<Profile, AppError> {
    if find_profile_for_user(db, user_id).await?.is_some() {
        return Err(AppError::Conflict("Ya tienes un perfil creado.".to_string()));
    }

    let slug = generate_slug(&input.full_name);
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles
            (id, user_id, full_name, professional_title, email, phone, linkedin_url,
             github_url, website_url, city, country, years_experience, summary,
             photo_url, slug, is_public)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&input.full_name)
    .bind(&input.professional_title)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.linkedin_url)
    .bind(&input.github_url)
    .bind(&input.website_url)
    .bind(&input.city)
    .bind(&input.country)
    .bind(input.years_experience)
    .bind(&input.summary)
    .bind(&input.photo_url)
    .bind(&slug)
    .bind(input.is_public)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Ya tienes un perfil creado.".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Created profile {} ({}) for user {user_id}", profile.id, profile.slug);
    Ok(profile)
}

/// Updates the profile's fields. The slug never changes.
pub async fn update_profile(
    db: &PgPool,
    profile_id: Uuid,
    input: &ProfileInput,
) -> Result<Profile, AppError> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET
            full_name = $2, professional_title = $3, email = $4, phone = $5,
            linkedin_url = $6, github_url = $7, website_url = $8, city = $9,
            country = $10, years_experience = $11, summary = $12, photo_url = $13,
            is_public = $14, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(&input.full_name)
    .bind(&input.professional_title)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.linkedin_url)
    .bind(&input.github_url)
    .bind(&input.website_url)
    .bind(&input.city)
    .bind(&input.country)
    .bind(input.years_experience)
    .bind(&input.summary)
    .bind(&input.photo_url)
    .bind(input.is_public)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))
}

#[derive(Debug, Clone, Copy, Serialize, FromRow)]
pub struct SiteStats {
    pub total_profiles: i64,
    pub public_profiles: i64,
}

pub async fn site_stats(db: &PgPool) -> Result<SiteStats, AppError> {
    Ok(sqlx::query_as::<_, SiteStats>(
        "SELECT COUNT(*) AS total_profiles, \
                COUNT(*) FILTER (WHERE is_public) AS public_profiles \
         FROM profiles",
    )
    .fetch_one(db)
    .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// A validated request body that maps onto one section table.
#[async_trait]
pub trait SectionInput: RecordInput + DeserializeOwned + Send + Sync + 'static {
    type Record: Serialize + Send + Unpin + for<'r> FromRow<'r, PgRow>;

    /// Table holding the section's rows.
    const TABLE: &'static str;

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<Self::Record, AppError>;

    /// `None` when no row with `id` belongs to `profile_id`.
    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self::Record>, AppError>;
}

/// Deletes a section row owned by `profile_id`. Returns whether a row was removed.
pub async fn delete_section_record<I: SectionInput>(
    db: &PgPool,
    profile_id: Uuid,
    id: Uuid,
) -> Result<bool, AppError> {
    let sql = format!("DELETE FROM {} WHERE id = $1 AND profile_id = $2", I::TABLE);
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(profile_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl SectionInput for EducationInput {
    type Record = EducationRecord;
    const TABLE: &'static str = "education";

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<EducationRecord, AppError> {
        Ok(sqlx::query_as::<_, EducationRecord>(
            r#"
            INSERT INTO education
                (id, profile_id, degree, institution, start_date, end_date, status, grade, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&self.degree)
        .bind(&self.institution)
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(self.status)
        .bind(self.grade)
        .bind(&self.description)
        .fetch_one(db)
        .await?)
    }

    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<EducationRecord>, AppError> {
        Ok(sqlx::query_as::<_, EducationRecord>(
            r#"
            UPDATE education SET
                degree = $3, institution = $4, start_date = $5, end_date = $6,
                status = $7, grade = $8, description = $9
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .bind(&self.degree)
        .bind(&self.institution)
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(self.status)
        .bind(self.grade)
        .bind(&self.description)
        .fetch_optional(db)
        .await?)
    }
}

#[async_trait]
impl SectionInput for ExperienceInput {
    type Record = ExperienceRecord;
    const TABLE: &'static str = "experience";

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<ExperienceRecord, AppError> {
        Ok(sqlx::query_as::<_, ExperienceRecord>(
            r#"
            INSERT INTO experience
                (id, profile_id, role, company, city, country, start_date, end_date,
                 is_current, description, achievements, technologies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&self.role)
        .bind(&self.company)
        .bind(&self.city)
        .bind(&self.country)
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(self.is_current)
        .bind(&self.description)
        .bind(&self.achievements)
        .bind(&self.technologies)
        .fetch_one(db)
        .await?)
    }

    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ExperienceRecord>, AppError> {
        Ok(sqlx::query_as::<_, ExperienceRecord>(
            r#"
            UPDATE experience SET
                role = $3, company = $4, city = $5, country = $6, start_date = $7,
                end_date = $8, is_current = $9, description = $10, achievements = $11,
                technologies = $12
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .bind(&self.role)
        .bind(&self.company)
        .bind(&self.city)
        .bind(&self.country)
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(self.is_current)
        .bind(&self.description)
        .bind(&self.achievements)
        .bind(&self.technologies)
        .fetch_optional(db)
        .await?)
    }
}

#[async_trait]
impl SectionInput for SkillInput {
    type Record = SkillRecord;
    const TABLE: &'static str = "skills";

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<SkillRecord, AppError> {
        Ok(sqlx::query_as::<_, SkillRecord>(
            r#"
            INSERT INTO skills (id, profile_id, name, category, level, featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&self.name)
        .bind(self.category)
        .bind(self.level)
        .bind(self.featured)
        .fetch_one(db)
        .await?)
    }

    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<SkillRecord>, AppError> {
        Ok(sqlx::query_as::<_, SkillRecord>(
            r#"
            UPDATE skills SET name = $3, category = $4, level = $5, featured = $6
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .bind(&self.name)
        .bind(self.category)
        .bind(self.level)
        .bind(self.featured)
        .fetch_optional(db)
        .await?)
    }
}

#[async_trait]
impl SectionInput for ProjectInput {
    type Record = ProjectRecord;
    const TABLE: &'static str = "projects";

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<ProjectRecord, AppError> {
        Ok(sqlx::query_as::<_, ProjectRecord>(
            r#"
            INSERT INTO projects
                (id, profile_id, name, short_description, long_description, technologies,
                 demo_url, repo_url, featured, start_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&self.name)
        .bind(&self.short_description)
        .bind(&self.long_description)
        .bind(&self.technologies)
        .bind(&self.demo_url)
        .bind(&self.repo_url)
        .bind(self.featured)
        .bind(self.start_date)
        .fetch_one(db)
        .await?)
    }

    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ProjectRecord>, AppError> {
        Ok(sqlx::query_as::<_, ProjectRecord>(
            r#"
            UPDATE projects SET
                name = $3, short_description = $4, long_description = $5,
                technologies = $6, demo_url = $7, repo_url = $8, featured = $9,
                start_date = $10
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .bind(&self.name)
        .bind(&self.short_description)
        .bind(&self.long_description)
        .bind(&self.technologies)
        .bind(&self.demo_url)
        .bind(&self.repo_url)
        .bind(self.featured)
        .bind(self.start_date)
        .fetch_optional(db)
        .await?)
    }
}

#[async_trait]
impl SectionInput for ReferenceInput {
    type Record = ReferenceRecord;
    const TABLE: &'static str = "profile_references";

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<ReferenceRecord, AppError> {
        Ok(sqlx::query_as::<_, ReferenceRecord>(
            r#"
            INSERT INTO profile_references
                (id, profile_id, name, position, company, phone, email, relationship)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&self.name)
        .bind(&self.position)
        .bind(&self.company)
        .bind(&self.phone)
        .bind(&self.email)
        .bind(&self.relationship)
        .fetch_one(db)
        .await?)
    }

    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ReferenceRecord>, AppError> {
        Ok(sqlx::query_as::<_, ReferenceRecord>(
            r#"
            UPDATE profile_references SET
                name = $3, position = $4, company = $5, phone = $6, email = $7,
                relationship = $8
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .bind(&self.name)
        .bind(&self.position)
        .bind(&self.company)
        .bind(&self.phone)
        .bind(&self.email)
        .bind(&self.relationship)
        .fetch_optional(db)
        .await?)
    }
}

#[async_trait]
impl SectionInput for CertificationInput {
    type Record = CertificationRecord;
    const TABLE: &'static str = "certifications";

    async fn insert(&self, db: &PgPool, profile_id: Uuid) -> Result<CertificationRecord, AppError> {
        Ok(sqlx::query_as::<_, CertificationRecord>(
            r#"
            INSERT INTO certifications
                (id, profile_id, name, institution, obtained_on, expires_on,
                 credential_code, credential_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&self.name)
        .bind(&self.institution)
        .bind(self.obtained_on)
        .bind(self.expires_on)
        .bind(&self.credential_code)
        .bind(&self.credential_url)
        .fetch_one(db)
        .await?)
    }

    async fn update(
        &self,
        db: &PgPool,
        profile_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CertificationRecord>, AppError> {
        Ok(sqlx::query_as::<_, CertificationRecord>(
            r#"
            UPDATE certifications SET
                name = $3, institution = $4, obtained_on = $5, expires_on = $6,
                credential_code = $7, credential_url = $8
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .bind(&self.name)
        .bind(&self.institution)
        .bind(self.obtained_on)
        .bind(self.expires_on)
        .bind(&self.credential_code)
        .bind(&self.credential_url)
        .fetch_optional(db)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_has_name_and_hex_suffix() {
        let slug = generate_slug("Ana Pérez");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "ana-perez");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_slug_for_unsluggable_name() {
        let slug = generate_slug("***");
        assert!(slug.starts_with("cv-"));
    }

    #[test]
    fn test_slugs_differ_for_same_name() {
        assert_ne!(generate_slug("Ana Pérez"), generate_slug("Ana Pérez"));
    }

    #[test]
    fn test_section_tables() {
        assert_eq!(<ReferenceInput as SectionInput>::TABLE, "profile_references");
        assert_eq!(<SkillInput as SectionInput>::TABLE, "skills");
    }
}
