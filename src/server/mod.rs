//! HTTP host of the dashboard
//!
//! - [`builder`]: `ServerBuilder`, wiring services, auth and cache into a router
//! - [`router`]: the route table
//! - [`handlers`]: request handlers and shared state
//! - [`middleware`]: the access gate

pub mod builder;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_dashboard_routes;
