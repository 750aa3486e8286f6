#![cfg_attr(docsrs, feature(doc_cfg))]

//! pimrow_val - SQL scalar values, record ids and sort keys
//! pimrow_val - SQL 标量值、记录 ID 与排序键

mod id;
mod key;
mod val;

pub use id::RecordId;
pub use key::{Dir, SortKey};
pub use val::Val;
