// Adapters layer: concrete implementations of the domain ports (address lookup over HTTP, contact storage).

pub mod http;
pub mod storage;

pub use http::{ViaCepClient, DEFAULT_VIACEP_URL};
pub use storage::{FileContactRepository, InMemoryContactRepository, LocalStorage};
