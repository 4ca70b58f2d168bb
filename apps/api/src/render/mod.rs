// Document renderer: content blocks -> paginated display list -> PDF bytes.
// CPU-bound; callers run it inside tokio::task::spawn_blocking.

pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod styles;

use tracing::debug;

use crate::cv::blocks::ContentBlock;
use crate::errors::AppError;

pub use layout::{default_page_config, PageConfig};

/// Lays out and draws `blocks` into a PDF document titled `title`.
pub fn render_pdf(
    blocks: &[ContentBlock],
    title: &str,
    config: &PageConfig,
) -> Result<Vec<u8>, AppError> {
    let pages = layout::paginate(blocks, config);
    debug!(
        "Rendering {} blocks onto {} page(s)",
        blocks.len(),
        pages.len()
    );
    pdf::write_pdf(&pages, title, config)
}
