// CV document pipeline.
// accessor (ordered, capped snapshot) -> formatter (content blocks) -> render (PDF bytes).
// Rendering is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod accessor;
pub mod blocks;
pub mod formatter;
pub mod generator;
pub mod handlers;
pub mod presentation;

#[cfg(test)]
pub mod fixtures;

pub use accessor::PgProfileSource;
