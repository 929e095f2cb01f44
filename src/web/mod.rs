//! Web server module
//!
//! Exposes the dispatcher and scan flow as a JSON API.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
