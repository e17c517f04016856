pub mod clients;
pub mod licenses;
pub mod profiles;
pub mod routes;
pub mod users;

pub use routes::{build_router, AppState};
