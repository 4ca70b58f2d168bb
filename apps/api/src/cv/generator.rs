//! CV generation, the pipeline's single entry point.
//!
//! Flow: snapshot (accessor, capped) → format_document → render_pdf.
//!
//! The caller's profile is resolved by the handler and passed in; the
//! pipeline never looks up the current user itself.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::cv::accessor::{ProfileSource, SectionCaps};
use crate::cv::formatter::format_document;
use crate::errors::AppError;
use crate::models::Profile;
use crate::render::{render_pdf, PageConfig};

/// Loads the profile owned by `user_id`, or reports it missing with the setup
/// flow as the redirect target.
pub async fn require_profile(
    source: &dyn ProfileSource,
    user_id: Uuid,
    setup_url: &str,
) -> Result<Profile, AppError> {
    source
        .profile_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::ProfileMissing {
            redirect_to: setup_url.to_string(),
        })
}

/// Title embedded in the PDF metadata.
pub fn document_title(profile: &Profile) -> String {
    format!("CV - {}", profile.full_name)
}

/// Download filename: `CV_<full name>.pdf`.
pub fn document_filename(profile: &Profile) -> String {
    format!("CV_{}.pdf", profile.full_name)
}

/// Produces the CV document for `profile` as PDF bytes.
///
/// The snapshot is read once; formatting and rendering run on the blocking
/// pool. `today` is printed in the footer.
pub async fn generate_document(
    source: &dyn ProfileSource,
    profile: Profile,
    caps: &SectionCaps,
    today: NaiveDate,
    page_config: &PageConfig,
) -> Result<Vec<u8>, AppError> {
    let profile_id = profile.id;
    let title = document_title(&profile);
    let snapshot = source.snapshot(profile, caps).await?;
    let config = page_config.clone();

    let bytes = tokio::task::spawn_blocking(move || {
        let blocks = format_document(&snapshot, today);
        render_pdf(&blocks, &title, &config)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    info!(
        "Generated CV for profile {profile_id} ({} bytes)",
        bytes.len()
    );
    Ok(bytes)
}
