//! Data models for Vitrine

mod page;
mod promotion;

pub use page::Page;
pub use promotion::{Promotion, PromotionId};
