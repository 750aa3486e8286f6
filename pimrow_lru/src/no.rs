//! NoCache - caching disabled
//! NoCache - 关闭缓存

use crate::Cache;

/// Holds nothing; every lookup misses
/// 不保存任何内容，每次查找都未命中
pub struct NoCache;

impl<K, V> Cache<K, V> for NoCache {
  #[inline]
  fn get(&mut self, _: &K) -> Option<&V> {
    None
  }

  #[inline]
  fn peek(&self, _: &K) -> Option<&V> {
    None
  }

  #[inline]
  fn set(&mut self, _: K, _: V) {}

  #[inline]
  fn rm(&mut self, _: &K) {}

  #[inline]
  fn clear(&mut self) {}

  #[inline]
  fn len(&self) -> usize {
    0
  }
}
