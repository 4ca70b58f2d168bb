// Profile and section CRUD, plus dashboard scoring.

pub mod completeness;
pub mod handlers;
pub mod inputs;
pub mod repository;
