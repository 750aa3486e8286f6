//! SQLite backend
//! SQLite 后端

use std::path::Path;

use log::trace;
use pimrow_val::Val;
use rusqlite::{
  Connection, params_from_iter,
  types::{ToSqlOutput, ValueRef},
};

use crate::{Db, Result};

/// Statement cache capacity / 语句缓存容量
pub const STMT_CACHE: usize = 64;

/// SQLite connection with a compiled statement cache
/// 带预编译语句缓存的 SQLite 连接
pub struct Sqlite(Connection);

impl Sqlite {
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self::wrap(Connection::open(path)?))
  }

  pub fn open_in_memory() -> Result<Self> {
    Ok(Self::wrap(Connection::open_in_memory()?))
  }

  pub fn wrap(conn: Connection) -> Self {
    conn.set_prepared_statement_cache_capacity(STMT_CACHE);
    Self(conn)
  }

  /// Raw connection, for schema setup / 原始连接，用于建表
  #[inline]
  pub fn conn(&self) -> &Connection {
    &self.0
  }

  /// Run a batch of `;` separated statements / 执行以 `;` 分隔的批量语句
  pub fn batch(&self, sql: &str) -> Result<()> {
    self.0.execute_batch(sql)?;
    Ok(())
  }
}

/// Bind without copying; text goes in byte-for-byte
/// 零拷贝绑定；文本按原始字节写入
fn to_sql(v: &Val) -> ToSqlOutput<'_> {
  ToSqlOutput::Borrowed(match v {
    Val::Null => ValueRef::Null,
    Val::Int(i) => ValueRef::Integer(*i),
    Val::Real(f) => ValueRef::Real(f.0),
    Val::Str(s) => ValueRef::Text(s.as_bytes()),
    Val::Text(b) => ValueRef::Text(b.as_slice()),
    Val::Bin(b) => ValueRef::Blob(b.as_slice()),
  })
}

fn from_sql(v: ValueRef<'_>) -> Val {
  match v {
    ValueRef::Null => Val::Null,
    ValueRef::Integer(i) => Val::Int(i),
    ValueRef::Real(f) => Val::from(f),
    ValueRef::Text(t) => Val::text(t),
    ValueRef::Blob(b) => Val::from(b),
  }
}

impl Db for Sqlite {
  fn each(&self, sql: &str, args: &[Val], row: &mut dyn FnMut(&[Val]) -> bool) -> Result<()> {
    trace!("sql {sql}");
    let mut stmt = self.0.prepare_cached(sql)?;
    let n = stmt.column_count();
    let mut rows = stmt.query(params_from_iter(args.iter().map(to_sql)))?;
    let mut buf = Vec::with_capacity(n);
    while let Some(r) = rows.next()? {
      buf.clear();
      for i in 0..n {
        buf.push(from_sql(r.get_ref(i)?));
      }
      if !row(&buf) {
        break;
      }
    }
    Ok(())
  }

  fn execute(&self, sql: &str, args: &[Val]) -> Result<usize> {
    let mut stmt = self.0.prepare_cached(sql)?;
    Ok(stmt.execute(params_from_iter(args.iter().map(to_sql)))?)
  }
}
