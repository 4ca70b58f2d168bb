//! Axum route handlers for the CV endpoints.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::auth::AuthUser;
use crate::cv::accessor::SectionCaps;
use crate::cv::blocks::ContentBlock;
use crate::cv::formatter::format_document;
use crate::cv::generator::{document_filename, generate_document, require_profile};
use crate::cv::presentation::CvView;
use crate::errors::AppError;
use crate::state::AppState;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy)]
enum Disposition {
    Attachment,
    Inline,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

fn content_disposition(kind: Disposition, filename: &str) -> Result<HeaderValue, AppError> {
    let value = format!(
        "{}; filename=\"{}\"",
        kind.as_str(),
        filename.replace(['"', '\r', '\n'], "")
    );
    HeaderValue::from_bytes(value.as_bytes()).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("invalid Content-Disposition header: {e}"))
    })
}

async fn pdf_response(
    state: &AppState,
    AuthUser(user_id): AuthUser,
    kind: Disposition,
) -> Result<Response, AppError> {
    let profile = require_profile(
        state.profiles.as_ref(),
        user_id,
        &state.config.profile_setup_url,
    )
    .await?;
    let filename = document_filename(&profile);

    let bytes = generate_document(
        state.profiles.as_ref(),
        profile,
        &SectionCaps::PDF_DOCUMENT,
        today(),
        &state.page_config,
    )
    .await?;

    info!("Serving {filename} ({})", kind.as_str());

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, content_disposition(kind, &filename)?),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cv
///
/// The caller's complete CV, no section caps.
pub async fn get_my_cv(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CvView>, AppError> {
    let profile = require_profile(
        state.profiles.as_ref(),
        user.0,
        &state.config.profile_setup_url,
    )
    .await?;
    let snapshot = state
        .profiles
        .snapshot(profile, &SectionCaps::UNBOUNDED)
        .await?;
    Ok(Json(CvView::from_snapshot(snapshot, today())))
}

/// GET /api/v1/cv/blocks
///
/// The document's content blocks, as the PDF endpoints would render them.
pub async fn get_cv_blocks(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ContentBlock>>, AppError> {
    let profile = require_profile(
        state.profiles.as_ref(),
        user.0,
        &state.config.profile_setup_url,
    )
    .await?;
    let snapshot = state
        .profiles
        .snapshot(profile, &SectionCaps::PDF_DOCUMENT)
        .await?;
    Ok(Json(format_document(&snapshot, today())))
}

/// GET /api/v1/cv/pdf/download
pub async fn download_cv_pdf(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    pdf_response(&state, user, Disposition::Attachment).await
}

/// GET /api/v1/cv/pdf/view
pub async fn view_cv_pdf(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    pdf_response(&state, user, Disposition::Inline).await
}

/// GET /api/v1/public/cv/:slug
///
/// Anyone may read a CV its owner has made public. Private and unknown slugs
/// are indistinguishable.
pub async fn get_public_cv(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CvView>, AppError> {
    let profile = state
        .profiles
        .profile_by_slug(&slug)
        .await?
        .filter(|p| p.is_public)
        .ok_or_else(|| AppError::NotFound(format!("CV '{slug}' not found")))?;

    let snapshot = state
        .profiles
        .snapshot(profile, &SectionCaps::PUBLIC_PAGE)
        .await?;
    Ok(Json(CvView::from_snapshot(snapshot, today())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition_keeps_utf8_name() {
        let value = content_disposition(Disposition::Attachment, "CV_Ana Pérez.pdf").unwrap();
        assert_eq!(
            value.as_bytes(),
            "attachment; filename=\"CV_Ana Pérez.pdf\"".as_bytes()
        );
    }

    #[test]
    fn test_disposition_strips_quotes_and_newlines() {
        let value = content_disposition(Disposition::Inline, "CV_\"x\"\r\n.pdf").unwrap();
        assert_eq!(value.to_str().unwrap(), "inline; filename=\"CV_x.pdf\"");
    }
}
