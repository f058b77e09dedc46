//! Core traits
//!
//! - [`Provider`]: list, upsert and delete DNS records at a backend
//! - [`ProviderFactory`]: build a provider from configuration

pub mod provider;

pub use provider::{Provider, ProviderFactory};
