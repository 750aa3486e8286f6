//! Row window: exact row to record id
//! 行窗口：精确行号到记录 ID

use pimrow_lru::{Cache, Lru, NoCache};
use pimrow_val::RecordId;

pub struct Window(Box<dyn Cache<usize, RecordId>>);

impl Window {
  /// Capacity 0 keeps nothing / 容量为 0 时不缓存
  pub fn new(cap: usize) -> Self {
    if cap == 0 {
      Self(Box::new(NoCache))
    } else {
      Self(Box::new(Lru::new(cap)))
    }
  }

  #[inline]
  pub fn get(&mut self, row: usize) -> Option<RecordId> {
    self.0.get(&row).copied()
  }

  #[inline]
  pub fn put(&mut self, row: usize, id: RecordId) {
    self.0.set(row, id);
  }

  #[inline]
  pub fn contains(&self, row: usize) -> bool {
    self.0.contains(&row)
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
