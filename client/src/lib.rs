//! Typed client for the mail admin REST backend.
//!
//! One [`ApiClient`] is built from a [`ClientConfig`] plus the transport,
//! timer and token source of the host environment, then handed to the domain
//! services in [`services`].

pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod sync;
pub mod transport;

pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use http::{ApiClient, RequestOptions};
pub use services::Services;
pub use sync::{SyncGate, SyncOutcome};
