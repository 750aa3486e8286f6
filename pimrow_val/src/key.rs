//! Sort direction and sort key
//! 排序方向与排序键

use std::cmp::Ordering;

use crate::{RecordId, Val};

/// Sort direction / 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
  #[default]
  Asc,
  Desc,
}

impl Dir {
  /// Orient an ascending comparison / 按方向调整升序比较结果
  #[inline]
  pub fn apply(self, ord: Ordering) -> Ordering {
    match self {
      Self::Asc => ord,
      Self::Desc => ord.reverse(),
    }
  }

  /// SQL suffix / SQL 后缀
  #[inline]
  pub fn sql(self) -> &'static str {
    match self {
      Self::Asc => "",
      Self::Desc => " DESC",
    }
  }
}

/// Position of a record under the active sort
/// 记录在当前排序下的位置
///
/// `vals` holds one value per sort column, `id` is the final tie-break.
/// NULL sorts first ascending and last descending; `id` always ascends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
  pub vals: Box<[Val]>,
  pub id: RecordId,
}

impl SortKey {
  #[inline]
  pub fn new(vals: impl Into<Box<[Val]>>, id: RecordId) -> Self {
    Self {
      vals: vals.into(),
      id,
    }
  }

  /// Compare under per-column directions (missing ones ascend)
  /// 按各列方向比较（缺省为升序）
  pub fn cmp_by(&self, other: &Self, dirs: &[Dir]) -> Ordering {
    for (i, (a, b)) in self.vals.iter().zip(other.vals.iter()).enumerate() {
      let dir = dirs.get(i).copied().unwrap_or_default();
      match dir.apply(a.cmp(b)) {
        Ordering::Equal => {}
        ord => return ord,
      }
    }
    self
      .vals
      .len()
      .cmp(&other.vals.len())
      .then(self.id.cmp(&other.id))
  }
}
