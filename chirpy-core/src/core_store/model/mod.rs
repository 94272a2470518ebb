/*
    Model subsystem - Records held in the document
*/

pub mod chirp;
pub mod document;
pub mod token;
pub mod types;
pub mod user;

pub use chirp::*;
pub use document::*;
pub use token::*;
pub use types::*;
pub use user::*;
