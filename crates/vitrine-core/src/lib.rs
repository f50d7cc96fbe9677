//! vitrine-core - Core library for Vitrine
//!
//! This crate contains the collection cache, admin API client, and the
//! optimistic collection synchronizer shared by all Vitrine client surfaces.

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
pub mod remote;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Page, Promotion, PromotionId};
