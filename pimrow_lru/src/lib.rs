#![cfg_attr(docsrs, feature(doc_cfg))]

//! Bounded caches for row windows and key frames
//! 行窗口与关键帧的有界缓存
//!
//! # Complexity
//! 复杂度
//!
//! - get / peek / set / rm: O(1)
//! - clear: O(n)

mod cache;
mod lru;
mod no;

pub use cache::Cache;
pub use lru::Lru;
pub use no::NoCache;
