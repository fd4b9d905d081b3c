pub mod models;
pub mod money;
pub mod pii;
pub mod service;

pub use models::Validate;
pub use pii::Masked;
pub use service::ServiceKind;
