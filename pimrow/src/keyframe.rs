//! Sparse block checkpoints
//! 稀疏块检查点
//!
//! Block `b` holds the sort key of row `b * row_step` in the current view.
//! 块 `b` 保存当前视图中第 `b * row_step` 行的排序键。

use pimrow_lru::{Cache, Lru};
use pimrow_val::SortKey;

pub struct KeyFrames(Lru<usize, SortKey>);

impl KeyFrames {
  pub fn new(cap: usize) -> Self {
    Self(Lru::new(cap))
  }

  /// Nearest checkpoint at or before `block`, refreshed as recently used
  /// `block` 及之前最近的检查点，并标记为最近使用
  pub fn nearest(&mut self, block: usize) -> Option<(usize, SortKey)> {
    let b = self.0.keys().copied().filter(|b| *b <= block).max()?;
    self.0.get(&b).map(|k| (b, k.clone()))
  }

  #[inline]
  pub fn record(&mut self, block: usize, key: SortKey) {
    self.0.set(block, key);
  }

  #[inline]
  pub fn get(&self, block: usize) -> Option<&SortKey> {
    self.0.peek(&block)
  }

  #[inline]
  pub fn clear(&mut self) {
    self.0.clear();
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use pimrow_val::{RecordId, Val};

  use super::*;

  fn key(id: u32) -> SortKey {
    SortKey::new(vec![Val::from(id)], RecordId(id))
  }

  #[test]
  fn nearest_at_or_before() {
    let mut k = KeyFrames::new(8);
    assert!(k.nearest(3).is_none());
    k.record(0, key(0));
    k.record(2, key(20));
    k.record(5, key(50));
    assert_eq!(k.nearest(4).map(|(b, _)| b), Some(2));
    assert_eq!(k.nearest(2).map(|(_, s)| s.id), Some(RecordId(20)));
    assert_eq!(k.nearest(1).map(|(b, _)| b), Some(0));
    assert_eq!(k.nearest(usize::MAX).map(|(b, _)| b), Some(5));
  }

  #[test]
  fn nearest_refreshes_recency() {
    let mut k = KeyFrames::new(2);
    k.record(0, key(0));
    k.record(1, key(1));
    k.nearest(0);
    k.record(2, key(2));
    assert!(k.get(0).is_some());
    assert!(k.get(1).is_none());
    assert_eq!(k.len(), 2);
    k.clear();
    assert!(k.is_empty());
  }
}
