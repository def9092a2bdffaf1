//! Core types for the framing layer.
//!
//! This module provides foundational types used throughout the crate:
//! - **IDs**: Strongly-typed tokens (MessageId, ReplyId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Wire and observability configuration

mod config;
mod errors;
mod ids;

pub use config::{Config, ObservabilityConfig, TypeRendering, WireConfig};
pub use errors::{Error, Result};
pub use ids::{MessageId, ReplyId};
