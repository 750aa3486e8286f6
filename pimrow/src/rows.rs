//! Per-row payload cache
//! 行数据缓存

use pimrow_val::{RecordId, Val};

/// Strategy caching extra row data from the same scan that fills the window
/// 在填充行窗口的同一次扫描中缓存额外行数据的策略
///
/// Fields are appended to the row query after `recid` and the sort columns,
/// so they must be expressions over the base table `t1`.
pub trait RowCache {
  /// Extra select expressions / 额外的查询表达式
  fn fields(&self) -> Vec<String> {
    Vec::new()
  }

  /// Called for every row written into the window, `vals` match `fields`
  /// 每写入窗口一行调用一次，`vals` 与 `fields` 对应
  fn cache_row(&mut self, row: usize, id: RecordId, vals: &[Val]);

  fn clear(&mut self);
}

impl RowCache for () {
  #[inline]
  fn cache_row(&mut self, _: usize, _: RecordId, _: &[Val]) {}

  #[inline]
  fn clear(&mut self) {}
}
