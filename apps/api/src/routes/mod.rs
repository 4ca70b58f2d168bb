pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::cv::handlers as cv;
use crate::profile::handlers as profile;
use crate::profile::inputs::{
    CertificationInput, EducationInput, ExperienceInput, ProjectInput, ReferenceInput, SkillInput,
};
use crate::profile::repository::SectionInput;
use crate::state::AppState;

/// POST on `path`, PUT and DELETE on `path/:id`, all backed by `I`.
fn section_routes<I: SectionInput>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(path, post(profile::create_record::<I>))
        .route(
            &format!("{path}/:id"),
            put(profile::update_record::<I>).delete(profile::delete_record::<I>),
        )
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/stats", get(profile::get_stats))
        .route("/api/v1/dashboard", get(profile::get_dashboard))
        .route(
            "/api/v1/profile",
            post(profile::create_profile)
                .get(profile::get_profile)
                .put(profile::update_profile),
        );

    let router = section_routes::<EducationInput>(router, "/api/v1/profile/education");
    let router = section_routes::<ExperienceInput>(router, "/api/v1/profile/experience");
    let router = section_routes::<SkillInput>(router, "/api/v1/profile/skills");
    let router = section_routes::<ProjectInput>(router, "/api/v1/profile/projects");
    let router = section_routes::<ReferenceInput>(router, "/api/v1/profile/references");
    let router = section_routes::<CertificationInput>(router, "/api/v1/profile/certifications");

    router
        // CV document
        .route("/api/v1/cv", get(cv::get_my_cv))
        .route("/api/v1/cv/blocks", get(cv::get_cv_blocks))
        .route("/api/v1/cv/pdf/download", get(cv::download_cv_pdf))
        .route("/api/v1/cv/pdf/view", get(cv::view_cv_pdf))
        .route("/api/v1/public/cv/:slug", get(cv::get_public_cv))
        .with_state(state)
}
