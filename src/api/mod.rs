//! HTTP API handlers for a11yd

pub mod check;
pub mod health;
pub mod ui;

pub use check::check_url;
pub use health::health_routes;
pub use ui::serve_index;
