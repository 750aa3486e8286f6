//! Record identifier
//! 记录标识符

use std::fmt;

use crate::Val;

/// Stable identifier of a logical record (column `recid`)
/// 逻辑记录的稳定标识符（`recid` 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u32);

impl RecordId {
  #[inline]
  pub const fn get(self) -> u32 {
    self.0
  }
}

impl From<u32> for RecordId {
  #[inline]
  fn from(v: u32) -> Self {
    Self(v)
  }
}

impl From<RecordId> for Val {
  #[inline]
  fn from(v: RecordId) -> Self {
    Val::Int(i64::from(v.0))
  }
}

/// Decode from a `recid` column value, rejecting NULL and out of range
/// 从 `recid` 列值解码，拒绝 NULL 和越界值
impl TryFrom<&Val> for RecordId {
  type Error = ();

  fn try_from(v: &Val) -> Result<Self, Self::Error> {
    match v {
      Val::Int(i) => u32::try_from(*i).map(Self).map_err(|_| ()),
      _ => Err(()),
    }
  }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
