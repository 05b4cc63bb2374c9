pub mod handlers;
pub mod middleware;
pub mod openings;
pub mod popular;
pub mod routes;
pub mod search;
pub mod stats;

pub use routes::create_router;
