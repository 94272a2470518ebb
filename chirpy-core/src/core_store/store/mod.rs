/*
    Store subsystem - File-backed document persistence
*/

pub mod chirps;
pub mod errors;
pub mod file_store;
pub mod tokens;
pub mod users;

pub use errors::*;
pub use file_store::{Store, StoreStats};
