//! Error types for statement execution
//! 语句执行错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("SQLite: {0}")]
  Sqlite(rusqlite::Error),

  /// Failure reported by the database engine, with its extended code
  /// 数据库引擎报告的错误，附扩展错误码
  #[error("Driver {code}: {msg}")]
  Driver { code: i32, msg: String },
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    match e {
      rusqlite::Error::SqliteFailure(f, msg) => Self::Driver {
        code: f.extended_code,
        msg: msg.unwrap_or_else(|| f.to_string()),
      },
      e => Self::Sqlite(e),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
