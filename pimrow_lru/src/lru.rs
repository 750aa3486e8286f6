//! LRU map over hashlink
//! 基于 hashlink 的 LRU 映射

use std::hash::Hash;

use hashlink::LruCache;

use crate::Cache;

/// Fixed-capacity LRU map
/// 固定容量的 LRU 映射
pub struct Lru<K: Hash + Eq, V>(LruCache<K, V>);

impl<K: Hash + Eq, V> Lru<K, V> {
  /// Create with capacity (min 1)
  /// 创建，指定容量（最小 1）
  #[inline]
  pub fn new(cap: usize) -> Self {
    Self(LruCache::new(cap.max(1)))
  }

  #[inline]
  pub fn cap(&self) -> usize {
    self.0.capacity()
  }

  /// Keys from least to most recently used, order untouched
  /// 按最久到最近使用的顺序遍历键，不改变顺序
  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.0.iter().map(|(k, _)| k)
  }
}

impl<K: Hash + Eq, V> Cache<K, V> for Lru<K, V> {
  #[inline]
  fn get(&mut self, key: &K) -> Option<&V> {
    self.0.get(key)
  }

  #[inline]
  fn peek(&self, key: &K) -> Option<&V> {
    self.0.peek(key)
  }

  #[inline]
  fn set(&mut self, key: K, val: V) {
    self.0.insert(key, val);
  }

  #[inline]
  fn rm(&mut self, key: &K) {
    self.0.remove(key);
  }

  #[inline]
  fn clear(&mut self) {
    self.0.clear();
  }

  #[inline]
  fn len(&self) -> usize {
    self.0.len()
  }
}
