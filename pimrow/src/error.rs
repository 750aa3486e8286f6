//! Error types for pimrow
//! pimrow 错误类型定义

use pimrow_val::Val;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("SQL: {0}")]
  Sql(#[from] pimrow_sql::Error),

  #[error("Bad recid: {0:?}")]
  BadId(Val),

  #[error("Short row: want {want} columns, got {got}")]
  BadRow { want: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Log a failed operation that degrades to a sentinel
/// 记录降级为哨兵值的失败操作
#[cold]
pub(crate) fn log_err(op: &str, e: &Error) {
  log::warn!("{op}: {e}");
}
