// Domain layer: contact model, partial-update fields and the ports the service depends on.

pub mod model;
pub mod patch;
pub mod ports;

pub use model::{Address, Contact};
pub use patch::{apply_patch, ContactField};
pub use ports::{AddressLookup, ContactRepository, Storage};
