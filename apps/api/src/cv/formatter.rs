//! Turns a [`ProfileSnapshot`] into an ordered sequence of
//! [`ContentBlock`]s.
//!
//! Pure and single-pass: no I/O, no clock (the generation date is a
//! parameter), no mutation of the snapshot. Every section other than the
//! header and footer is emitted only when its collection is non-empty, and
//! every optional field produces its line only when present.
//!
//! Capping and ordering are the accessor's job; the formatter renders what it
//! is given, except that the projects section only ever shows featured
//! projects and the skills section never shows tool skills.

use chrono::NaiveDate;

use crate::cv::accessor::ProfileSnapshot;
use crate::cv::blocks::{ContactCell, ContactRow, ContentBlock, Paragraph, TextRun, TextStyle};
use crate::models::{
    CertificationRecord, EducationRecord, ExperienceRecord, Profile, ProjectRecord,
    SkillCategory, SkillRecord,
};

// ────────────────────────────────────────────────────────────────────────────
// Fixed document text
// ────────────────────────────────────────────────────────────────────────────

pub const HEADING_SUMMARY: &str = "RESUMEN PROFESIONAL";
pub const HEADING_EXPERIENCE: &str = "EXPERIENCIA PROFESIONAL";
pub const HEADING_EDUCATION: &str = "FORMACIÓN ACADÉMICA";
pub const HEADING_SKILLS: &str = "HABILIDADES";
pub const HEADING_PROJECTS: &str = "PROYECTOS DESTACADOS";
pub const HEADING_CERTIFICATIONS: &str = "CERTIFICACIONES";

/// End-date placeholder for a current job.
pub const ONGOING_JOB: &str = "Presente";
/// End-date placeholder for studies in progress.
pub const ONGOING_STUDIES: &str = "En curso";
const NOT_AVAILABLE: &str = "N/A";

const SKILL_GROUPS: [(SkillCategory, &str); 3] = [
    (SkillCategory::Technical, "Habilidades Técnicas:"),
    (SkillCategory::Soft, "Habilidades Blandas:"),
    (SkillCategory::Language, "Idiomas:"),
];

// Vertical rhythm, in centimetres.
const SECTION_GAP_CM: f32 = 0.3;
const HEADER_GAP_CM: f32 = 0.5;
const RECORD_GAP_CM: f32 = 0.3;
const CERTIFICATION_GAP_CM: f32 = 0.2;
const SKILL_GROUP_GAP_CM: f32 = 0.2;
const FOOTER_GAP_CM: f32 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Formats a snapshot into the CV's block sequence.
pub fn format_document(snapshot: &ProfileSnapshot, generated_on: NaiveDate) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    push_header(&mut blocks, &snapshot.profile);

    if let Some(summary) = &snapshot.profile.summary {
        blocks.push(ContentBlock::spacer(SECTION_GAP_CM));
        blocks.push(ContentBlock::heading(HEADING_SUMMARY));
        blocks.push(ContentBlock::paragraph(TextStyle::Body, summary.clone()));
        blocks.push(ContentBlock::spacer(SECTION_GAP_CM));
    }

    if !snapshot.experience.is_empty() {
        blocks.push(ContentBlock::heading(HEADING_EXPERIENCE));
        blocks.extend(snapshot.experience.iter().map(experience_group));
    }

    if !snapshot.education.is_empty() {
        blocks.push(ContentBlock::spacer(SECTION_GAP_CM));
        blocks.push(ContentBlock::heading(HEADING_EDUCATION));
        blocks.extend(snapshot.education.iter().map(education_group));
    }

    if !snapshot.skills.is_empty() {
        blocks.push(ContentBlock::spacer(SECTION_GAP_CM));
        blocks.push(ContentBlock::heading(HEADING_SKILLS));
        push_skill_groups(&mut blocks, &snapshot.skills);
    }

    let featured: Vec<&ProjectRecord> = snapshot.projects.iter().filter(|p| p.featured).collect();
    if !featured.is_empty() {
        blocks.push(ContentBlock::spacer(SECTION_GAP_CM));
        blocks.push(ContentBlock::heading(HEADING_PROJECTS));
        blocks.extend(featured.into_iter().map(project_group));
    }

    if !snapshot.certifications.is_empty() {
        blocks.push(ContentBlock::spacer(SECTION_GAP_CM));
        blocks.push(ContentBlock::heading(HEADING_CERTIFICATIONS));
        blocks.extend(snapshot.certifications.iter().map(certification_group));
    }

    blocks.push(ContentBlock::spacer(FOOTER_GAP_CM));
    blocks.push(ContentBlock::Paragraph(Paragraph::new(
        TextStyle::Footer,
        vec![TextRun::italic(format!(
            "CV generado el {}",
            generated_on.format("%d/%m/%Y")
        ))],
    )));

    blocks
}

/// `MM/YYYY`.
pub fn month_year(date: NaiveDate) -> String {
    date.format("%m/%Y").to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

fn cell(label: &str, value: impl Into<String>) -> Option<ContactCell> {
    Some(ContactCell {
        label: label.to_string(),
        value: value.into(),
    })
}

fn push_header(blocks: &mut Vec<ContentBlock>, profile: &Profile) {
    blocks.push(ContentBlock::Title {
        text: profile.full_name.to_uppercase(),
    });
    blocks.push(ContentBlock::Subtitle {
        text: profile.professional_title.clone(),
    });

    let mut rows = vec![
        ContactRow {
            left: cell("Email", profile.email.clone()),
            right: profile
                .phone
                .as_deref()
                .and_then(|phone| cell("Teléfono", phone)),
        },
        ContactRow {
            left: cell("Ubicación", profile.location()),
            right: cell("Experiencia", format!("{} años", profile.years_experience)),
        },
    ];

    if profile.linkedin_url.is_some() || profile.github_url.is_some() {
        rows.push(ContactRow {
            left: cell(
                "LinkedIn",
                profile.linkedin_url.as_deref().unwrap_or(NOT_AVAILABLE),
            ),
            right: cell(
                "GitHub",
                profile.github_url.as_deref().unwrap_or(NOT_AVAILABLE),
            ),
        });
    }

    blocks.push(ContentBlock::ContactGrid { rows });
    blocks.push(ContentBlock::spacer(HEADER_GAP_CM));
    blocks.push(ContentBlock::Rule);
}

// ────────────────────────────────────────────────────────────────────────────
// Record groups
// ────────────────────────────────────────────────────────────────────────────

fn technologies_line(style: TextStyle, technologies: &[String]) -> Option<ContentBlock> {
    if technologies.is_empty() {
        return None;
    }
    Some(ContentBlock::Paragraph(Paragraph::new(
        style,
        vec![TextRun::italic(format!(
            "Tecnologías: {}",
            technologies.join(", ")
        ))],
    )))
}

fn experience_group(exp: &ExperienceRecord) -> ContentBlock {
    let end = match exp.end_date {
        Some(end) if !exp.is_current => month_year(end),
        _ => ONGOING_JOB.to_string(),
    };
    let location = [exp.city.trim(), exp.country.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let mut group = vec![
        ContentBlock::paragraph(TextStyle::Strong, format!("{} - {}", exp.role, exp.company)),
        ContentBlock::paragraph(
            TextStyle::Meta,
            format!("{} - {} | {}", month_year(exp.start_date), end, location),
        ),
    ];

    if let Some(description) = &exp.description {
        group.push(ContentBlock::paragraph(TextStyle::Body, description.clone()));
    }
    if let Some(achievements) = &exp.achievements {
        group.push(ContentBlock::Paragraph(Paragraph::new(
            TextStyle::Body,
            vec![
                TextRun::bold("Logros:"),
                TextRun::plain(format!(" {achievements}")),
            ],
        )));
    }
    group.extend(technologies_line(TextStyle::Detail, &exp.technologies));
    group.push(ContentBlock::spacer(RECORD_GAP_CM));

    ContentBlock::KeepTogether { blocks: group }
}

fn education_group(edu: &EducationRecord) -> ContentBlock {
    let end = edu
        .end_date
        .map(month_year)
        .unwrap_or_else(|| ONGOING_STUDIES.to_string());

    let mut group = vec![
        ContentBlock::paragraph(
            TextStyle::Strong,
            format!("{} - {}", edu.degree, edu.institution),
        ),
        ContentBlock::paragraph(
            TextStyle::Meta,
            format!(
                "{} - {} | {}",
                month_year(edu.start_date),
                end,
                edu.status.label()
            ),
        ),
    ];

    if let Some(grade) = edu.grade {
        group.push(ContentBlock::paragraph(
            TextStyle::Body,
            format!("Promedio: {grade:.2}/10"),
        ));
    }
    if let Some(description) = &edu.description {
        group.push(ContentBlock::paragraph(TextStyle::Body, description.clone()));
    }
    group.push(ContentBlock::spacer(RECORD_GAP_CM));

    ContentBlock::KeepTogether { blocks: group }
}

fn project_group(project: &ProjectRecord) -> ContentBlock {
    let mut group = vec![
        ContentBlock::paragraph(TextStyle::Strong, project.name.clone()),
        ContentBlock::paragraph(TextStyle::Body, project.short_description.clone()),
    ];

    group.extend(technologies_line(TextStyle::Body, &project.technologies));

    let links: Vec<String> = [
        project.demo_url.as_ref().map(|u| format!("Demo: {u}")),
        project.repo_url.as_ref().map(|u| format!("Repo: {u}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !links.is_empty() {
        group.push(ContentBlock::paragraph(TextStyle::Links, links.join(" | ")));
    }
    group.push(ContentBlock::spacer(RECORD_GAP_CM));

    ContentBlock::KeepTogether { blocks: group }
}

fn certification_group(cert: &CertificationRecord) -> ContentBlock {
    let mut meta = format!("Obtenido: {}", month_year(cert.obtained_on));
    if let Some(expires_on) = cert.expires_on {
        meta.push_str(&format!(" | Vence: {}", month_year(expires_on)));
    }

    let mut group = vec![
        ContentBlock::paragraph(
            TextStyle::Strong,
            format!("{} - {}", cert.name, cert.institution),
        ),
        ContentBlock::paragraph(TextStyle::Meta, meta),
    ];
    if let Some(code) = &cert.credential_code {
        group.push(ContentBlock::paragraph(
            TextStyle::Body,
            format!("Credencial: {code}"),
        ));
    }
    group.push(ContentBlock::spacer(CERTIFICATION_GAP_CM));

    ContentBlock::KeepTogether { blocks: group }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

fn skill_entry(skill: &SkillRecord) -> String {
    match skill.category {
        SkillCategory::Soft => skill.name.clone(),
        _ => format!("{} ({}%)", skill.name, skill.level),
    }
}

fn push_skill_groups(blocks: &mut Vec<ContentBlock>, skills: &[SkillRecord]) {
    for (category, label) in SKILL_GROUPS {
        let entries: Vec<String> = skills
            .iter()
            .filter(|s| s.category == category)
            .map(skill_entry)
            .collect();
        if entries.is_empty() {
            continue;
        }

        blocks.push(ContentBlock::Paragraph(Paragraph::new(
            TextStyle::Strong,
            vec![TextRun::bold(label)],
        )));
        blocks.push(ContentBlock::paragraph(TextStyle::Body, entries.join(", ")));
        if category != SkillCategory::Language {
            blocks.push(ContentBlock::spacer(SKILL_GROUP_GAP_CM));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::accessor::{assemble_snapshot, SectionCaps, SectionRecords};
    use crate::cv::fixtures::{certification, education, experience, profile, project, skill, ymd};

    fn today() -> NaiveDate {
        ymd(2026, 3, 9)
    }

    fn all_texts(blocks: &[ContentBlock]) -> Vec<String> {
        blocks.iter().flat_map(ContentBlock::texts).collect()
    }

    fn headings(blocks: &[ContentBlock]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::SectionHeading { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn groups(blocks: &[ContentBlock]) -> Vec<Vec<String>> {
        blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::KeepTogether { .. } => Some(b.texts()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header_uppercases_name_and_ends_with_rule() {
        let snapshot = ProfileSnapshot::empty(profile());
        let blocks = format_document(&snapshot, today());

        assert_eq!(
            blocks[0],
            ContentBlock::Title {
                text: "ANA PÉREZ".to_string()
            }
        );
        assert_eq!(
            blocks[1],
            ContentBlock::Subtitle {
                text: "Backend Engineer".to_string()
            }
        );
        assert!(matches!(blocks[2], ContentBlock::ContactGrid { .. }));
        assert_eq!(blocks[3], ContentBlock::spacer(0.5));
        assert_eq!(blocks[4], ContentBlock::Rule);
    }

    #[test]
    fn test_contact_grid_has_two_rows_without_links() {
        let blocks = format_document(&ProfileSnapshot::empty(profile()), today());
        let ContentBlock::ContactGrid { rows } = &blocks[2] else {
            panic!("expected contact grid, got {:?}", blocks[2]);
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].left.as_ref().unwrap().value, "Quito, Ecuador");
        assert_eq!(rows[1].right.as_ref().unwrap().value, "5 años");
    }

    #[test]
    fn test_contact_grid_links_row_fills_missing_with_na() {
        let mut p = profile();
        p.github_url = Some("https://github.com/ana".to_string());
        let blocks = format_document(&ProfileSnapshot::empty(p), today());
        let ContentBlock::ContactGrid { rows } = &blocks[2] else {
            panic!("expected contact grid");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].left.as_ref().unwrap().value, "N/A");
        assert_eq!(
            rows[2].right.as_ref().unwrap().value,
            "https://github.com/ana"
        );
    }

    #[test]
    fn test_missing_phone_leaves_cell_empty() {
        let mut p = profile();
        p.phone = None;
        let blocks = format_document(&ProfileSnapshot::empty(p), today());
        let ContentBlock::ContactGrid { rows } = &blocks[2] else {
            panic!("expected contact grid");
        };
        assert!(rows[0].right.is_none());
        assert_eq!(rows[0].left.as_ref().unwrap().value, "ana@example.com");
    }

    #[test]
    fn test_empty_sections_emit_nothing() {
        let mut p = profile();
        p.summary = None;
        let blocks = format_document(&ProfileSnapshot::empty(p), today());

        assert!(headings(&blocks).is_empty());
        assert!(groups(&blocks).is_empty());
        // header (5 blocks) + footer spacer + footer
        assert_eq!(blocks.len(), 7);
    }

    #[test]
    fn test_no_skills_no_projects_yields_header_summary_footer() {
        let blocks = format_document(&ProfileSnapshot::empty(profile()), today());
        assert_eq!(headings(&blocks), vec![HEADING_SUMMARY]);
        let last = blocks.last().unwrap();
        assert_eq!(last.texts(), vec!["CV generado el 09/03/2026"]);
        assert!(matches!(
            last,
            ContentBlock::Paragraph(Paragraph {
                style: TextStyle::Footer,
                ..
            })
        ));
    }

    #[test]
    fn test_current_job_meta_line_uses_presente() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.experience = vec![experience("Backend Engineer", ymd(2020, 1, 1), None)];
        let blocks = format_document(&snapshot, today());

        let group = &groups(&blocks)[0];
        assert_eq!(group[0], "Backend Engineer - Acme");
        assert_eq!(group[1], "01/2020 - Presente | Quito, Ecuador");
    }

    #[test]
    fn test_current_flag_wins_over_stale_end_date() {
        let mut exp = experience("Dev", ymd(2019, 6, 1), Some(ymd(2021, 6, 1)));
        exp.is_current = true;
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.experience = vec![exp];
        let group = &groups(&format_document(&snapshot, today()))[0];
        assert_eq!(group[1], "06/2019 - Presente | Quito, Ecuador");
    }

    #[test]
    fn test_finished_job_shows_end_date() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.experience = vec![experience("Dev", ymd(2018, 2, 1), Some(ymd(2019, 11, 30)))];
        let group = &groups(&format_document(&snapshot, today()))[0];
        assert_eq!(group[1], "02/2018 - 11/2019 | Quito, Ecuador");
    }

    #[test]
    fn test_experience_optional_lines_only_when_present() {
        let mut exp = experience("Dev", ymd(2018, 2, 1), None);
        exp.achievements = Some("Cut p99 latency by 40%".to_string());
        exp.technologies = vec!["Rust".to_string(), "PostgreSQL".to_string()];
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.experience = vec![exp];

        let group = &groups(&format_document(&snapshot, today()))[0];
        assert_eq!(
            group,
            &vec![
                "Dev - Acme".to_string(),
                "02/2018 - Presente | Quito, Ecuador".to_string(),
                "Logros: Cut p99 latency by 40%".to_string(),
                "Tecnologías: Rust, PostgreSQL".to_string(),
            ]
        );
    }

    #[test]
    fn test_education_in_progress_uses_en_curso() {
        let mut edu = education("MSc Computer Science", ymd(2023, 9, 1), None);
        edu.grade = Some(9.25);
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.education = vec![edu];

        let group = &groups(&format_document(&snapshot, today()))[0];
        assert_eq!(group[0], "MSc Computer Science - Universidad Central");
        assert_eq!(group[1], "09/2023 - En curso | En curso");
        assert_eq!(group[2], "Promedio: 9.25/10");
    }

    #[test]
    fn test_skills_grouped_by_category_and_tools_hidden() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.skills = vec![
            skill("Rust", SkillCategory::Technical, 90, true),
            skill("SQL", SkillCategory::Technical, 80, false),
            skill("Liderazgo", SkillCategory::Soft, 70, false),
            skill("Docker", SkillCategory::Tool, 85, false),
        ];
        let blocks = format_document(&snapshot, today());
        let texts = all_texts(&blocks);

        assert!(texts.contains(&"Habilidades Técnicas:".to_string()));
        assert!(texts.contains(&"Rust (90%), SQL (80%)".to_string()));
        assert!(texts.contains(&"Habilidades Blandas:".to_string()));
        assert!(texts.contains(&"Liderazgo".to_string()));
        assert!(!texts.contains(&"Idiomas:".to_string()));
        assert!(!texts.iter().any(|t| t.contains("Docker")));
        assert!(groups(&blocks).is_empty(), "skills are not grouped per record");
    }

    #[test]
    fn test_languages_show_level() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.skills = vec![skill("Inglés", SkillCategory::Language, 85, false)];
        let texts = all_texts(&format_document(&snapshot, today()));
        assert!(texts.contains(&"Idiomas:".to_string()));
        assert!(texts.contains(&"Inglés (85%)".to_string()));
    }

    #[test]
    fn test_only_tool_skills_still_emit_heading() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.skills = vec![skill("Docker", SkillCategory::Tool, 85, false)];
        let blocks = format_document(&snapshot, today());
        assert!(headings(&blocks).contains(&HEADING_SKILLS.to_string()));
        assert!(!all_texts(&blocks).iter().any(|t| t.contains("Docker")));
    }

    #[test]
    fn test_two_featured_of_five_projects_yield_two_groups() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.projects = vec![
            project("alpha", true),
            project("beta", false),
            project("gamma", true),
            project("delta", false),
            project("epsilon", false),
        ];
        let blocks = format_document(&snapshot, today());
        let project_groups: Vec<_> = groups(&blocks);
        assert_eq!(project_groups.len(), 2);
        assert_eq!(project_groups[0][0], "alpha");
        assert_eq!(project_groups[1][0], "gamma");
    }

    #[test]
    fn test_no_featured_projects_skips_section() {
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.projects = vec![project("beta", false)];
        let blocks = format_document(&snapshot, today());
        assert!(!headings(&blocks).contains(&HEADING_PROJECTS.to_string()));
    }

    #[test]
    fn test_project_links_line() {
        let mut p = project("alpha", true);
        p.repo_url = Some("https://github.com/ana/alpha".to_string());
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.projects = vec![p];
        let group = &groups(&format_document(&snapshot, today()))[0];
        assert_eq!(
            group.last().unwrap(),
            "Repo: https://github.com/ana/alpha"
        );
    }

    #[test]
    fn test_certification_meta_and_credential() {
        let mut cert = certification("AWS SAA", ymd(2022, 3, 15));
        cert.expires_on = Some(ymd(2025, 3, 15));
        cert.credential_code = Some("ABC-123".to_string());
        let mut snapshot = ProfileSnapshot::empty(profile());
        snapshot.certifications = vec![cert];

        let blocks = format_document(&snapshot, today());
        let group = &groups(&blocks)[0];
        assert_eq!(group[0], "AWS SAA - Cloud Institute");
        assert_eq!(group[1], "Obtenido: 03/2022 | Vence: 03/2025");
        assert_eq!(group[2], "Credencial: ABC-123");
    }

    #[test]
    fn test_section_order_is_fixed() {
        let records = SectionRecords {
            education: vec![education("BSc", ymd(2012, 1, 1), Some(ymd(2016, 7, 1)))],
            experience: vec![experience("Dev", ymd(2017, 1, 1), None)],
            skills: vec![skill("Rust", SkillCategory::Technical, 90, false)],
            projects: vec![project("alpha", true)],
            certifications: vec![certification("CKA", ymd(2021, 1, 1))],
            references: Vec::new(),
        };
        let snapshot = assemble_snapshot(profile(), records, &SectionCaps::PDF_DOCUMENT);
        let blocks = format_document(&snapshot, today());
        assert_eq!(
            headings(&blocks),
            vec![
                HEADING_SUMMARY,
                HEADING_EXPERIENCE,
                HEADING_EDUCATION,
                HEADING_SKILLS,
                HEADING_PROJECTS,
                HEADING_CERTIFICATIONS
            ]
        );
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let records = SectionRecords {
            experience: vec![experience("Dev", ymd(2017, 1, 1), None)],
            skills: vec![skill("Rust", SkillCategory::Technical, 90, false)],
            ..Default::default()
        };
        let snapshot = assemble_snapshot(profile(), records, &SectionCaps::PDF_DOCUMENT);
        let first = serde_json::to_vec(&format_document(&snapshot, today())).unwrap();
        let second = serde_json::to_vec(&format_document(&snapshot, today())).unwrap();
        assert_eq!(first, second);
    }
}
