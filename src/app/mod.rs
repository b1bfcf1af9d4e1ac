pub mod api;
pub mod response;
pub mod server;

pub use api::{router, DEFAULT_BASE_PATH};
pub use server::{build_service, serve};
