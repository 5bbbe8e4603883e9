pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, ParleyError};
pub use id::{new_id, MessageId, SessionId};
pub use types::ModelVariant;

pub type Result<T> = std::result::Result<T, ParleyError>;
