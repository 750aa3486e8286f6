//! Statement execution trait
//! 语句执行 trait

use std::rc::Rc;

use pimrow_val::Val;

use crate::Result;

/// Prepared statement execution over a forward-only cursor
/// 基于只进游标的预编译语句执行
///
/// Parameters are positional (`?1`, `?2`, ...). Implementations are expected
/// to keep compiled statements keyed by text so repeated calls are cheap.
pub trait Db {
  /// Run `sql`, feeding rows to `row` until it returns false or rows run out
  /// 执行 `sql`，逐行交给 `row`，直到其返回 false 或无更多行
  fn each(&self, sql: &str, args: &[Val], row: &mut dyn FnMut(&[Val]) -> bool) -> Result<()>;

  /// Run a statement that returns no rows, returning changed row count
  /// 执行不返回行的语句，返回受影响行数
  fn execute(&self, sql: &str, args: &[Val]) -> Result<usize>;

  /// First row, if any / 第一行（如有）
  fn one(&self, sql: &str, args: &[Val]) -> Result<Option<Box<[Val]>>> {
    let mut out = None;
    self.each(sql, args, &mut |r| {
      out = Some(r.into());
      false
    })?;
    Ok(out)
  }
}

impl<T: Db + ?Sized> Db for Rc<T> {
  #[inline]
  fn each(&self, sql: &str, args: &[Val], row: &mut dyn FnMut(&[Val]) -> bool) -> Result<()> {
    (**self).each(sql, args, row)
  }

  #[inline]
  fn execute(&self, sql: &str, args: &[Val]) -> Result<usize> {
    (**self).execute(sql, args)
  }
}

impl<T: Db + ?Sized> Db for &T {
  #[inline]
  fn each(&self, sql: &str, args: &[Val], row: &mut dyn FnMut(&[Val]) -> bool) -> Result<()> {
    (**self).each(sql, args, row)
  }

  #[inline]
  fn execute(&self, sql: &str, args: &[Val]) -> Result<usize> {
    (**self).execute(sql, args)
  }
}
