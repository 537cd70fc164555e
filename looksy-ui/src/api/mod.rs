//! HTTP API handlers for looksy-ui

pub mod auth;
pub mod health;
pub mod session;
pub mod sse;
pub mod ui;

pub use auth::auth_routes;
pub use health::health_routes;
pub use session::session_routes;
pub use sse::session_event_stream;
pub use ui::ui_routes;
