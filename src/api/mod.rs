//! HTTP API for notes, links and graph analytics

pub mod extract;
pub mod graph_handlers;
pub mod handlers;
pub mod note_handlers;
pub mod routes;

pub use handlers::{ApiState, AppError, ServerState};
pub use routes::create_router;
