#![cfg_attr(docsrs, feature(doc_cfg))]

//! pimrow - windowed row-order cache over a filtered, sorted SQL table
//! pimrow - 基于过滤排序 SQL 表的窗口化行序缓存
//!
//! Maps row numbers of a large view to record ids and back without loading
//! the whole view: a bounded row window, sparse sort-key checkpoints every
//! `row_step` rows, and a cooperative prefetcher that warms rows ahead.

mod bus;
pub mod conf;
pub mod error;
pub mod filter;
mod keyframe;
mod model;
mod prefetch;
mod query;
mod rows;
mod table;
mod window;

pub use bus::{Bus, Watch};
pub use conf::{Conf, Opt};
pub use error::{Error, Result};
pub use filter::{CategoryFilter, ContextFilter, Join, JoinKind, Sort, quote, starts_with};
pub use keyframe::KeyFrames;
pub use model::{Hook, Model};
pub use pimrow_sql::{Db, Sqlite};
pub use pimrow_val::{Dir, RecordId, SortKey, Val};
pub use prefetch::{Prefetch, State};
pub use query::{Query, Texts};
pub use rows::RowCache;
pub use table::Table;
pub use window::Window;
