//! Request and response types of the registry API
//!
//! Field names follow the service's camelCase JSON. Optional fields that are
//! unset are left out of serialized requests; missing fields in responses
//! deserialize as `None`.

pub mod auth;
pub mod image;
pub mod layer;
pub mod lifecycle;
pub mod repository;
pub mod serde_ext;
pub mod types;
pub mod validation;

pub use auth::*;
pub use image::*;
pub use layer::*;
pub use lifecycle::*;
pub use repository::*;
pub use types::*;
pub use validation::Validate;
