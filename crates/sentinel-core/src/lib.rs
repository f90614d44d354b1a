//! Sentinel Core - Shared types and traits
//!
//! This crate defines the lifecycle vocabulary used by sentinel-agent:
//! - Collaborator traits (metadata, notification, termination, credentials)
//! - Instance identity and lifecycle configuration
//! - The pure TTL / preemption decision helpers
//! - Error types

pub mod error;
pub mod policy;
pub mod traits;
pub mod types;

pub use error::*;
pub use policy::*;
pub use traits::*;
pub use types::*;
