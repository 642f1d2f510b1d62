pub mod views;

#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub use routes::{build_router, AppState};
