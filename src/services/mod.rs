//! Services layer
//!
//! The post store coordinates the repositories and maps their failures to
//! connection and query errors.

pub mod post;

pub use post::{PostStore, PostStoreError};
