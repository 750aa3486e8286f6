#![cfg_attr(docsrs, feature(doc_cfg))]

//! pimrow_sql - prepared statement access to the record tables
//! pimrow_sql - 通过预编译语句访问记录表

mod db;
mod error;
mod sqlite;

pub use db::Db;
pub use error::{Error, Result};
pub use sqlite::Sqlite;
