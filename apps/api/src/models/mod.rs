pub mod profile;
pub mod records;

pub use profile::Profile;
pub use records::{
    CertificationRecord, EducationRecord, EducationStatus, ExperienceRecord, ProjectRecord,
    ReferenceRecord, SkillCategory, SkillRecord,
};
