pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod response;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
