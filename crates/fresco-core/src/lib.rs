//! Core types, configuration, and error handling for Fresco.
//!
//! This crate provides the shared foundation used by the pipeline and binary
//! crates:
//! - [`FrescoError`] — unified error type using `thiserror`
//! - [`FrescoConfig`] — configuration loaded from `.fresco.toml`
//! - Shared types: [`PrReference`], [`ContentBundle`], [`ImageArtifact`],
//!   [`PublishedComment`]

mod config;
mod error;
mod types;

pub use config::{FrescoConfig, GenerationConfig, OpenAiConfig};
pub use error::FrescoError;
pub use types::{
    ContentBundle, ContentFragment, ContentOrigin, ImageArtifact, PrReference, PublishedComment,
};

/// A convenience `Result` type for Fresco operations.
pub type Result<T> = std::result::Result<T, FrescoError>;
