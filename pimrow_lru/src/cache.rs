/// Bounded cache operations
/// 有界缓存操作
///
/// Eviction under capacity pressure is silent: a later `get` simply misses.
/// 容量不足时静默淘汰：之后的 `get` 仅返回未命中。
pub trait Cache<K, V> {
  /// Get and mark as recently used
  /// 获取并标记为最近使用
  fn get(&mut self, key: &K) -> Option<&V>;

  /// Get without touching recency
  /// 获取但不改变使用顺序
  fn peek(&self, key: &K) -> Option<&V>;

  /// Insert or overwrite
  /// 插入或覆盖
  fn set(&mut self, key: K, val: V);

  fn rm(&mut self, key: &K);

  /// Drop every entry
  /// 清空全部条目
  fn clear(&mut self);

  fn len(&self) -> usize;

  #[inline]
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[inline]
  fn contains(&self, key: &K) -> bool {
    self.peek(key).is_some()
  }
}
