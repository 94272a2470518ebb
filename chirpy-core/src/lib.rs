pub mod config;
pub mod core_auth;
pub mod core_content;
pub mod core_store;
pub mod logging;

pub use config::{Config, ConfigError};
pub use core_auth::{AuthError, Authenticator, Session, TokenPurpose, TokenSigner};
pub use core_content::{ContentError, ContentFilter};
pub use core_store::{Chirp, ChirpId, Store, StoreError, User, UserId, UserView};
pub use logging::{init_logging, LogLevel};
