use std::cmp::Ordering;

use hipstr::{HipByt, HipStr};
use ordered_float::OrderedFloat;

/// SQL scalar value
/// SQL 标量值
///
/// Ordering follows SQLite: NULL < numbers < text < blob.
/// Integers and reals compare numerically, text bytewise.
/// 排序遵循 SQLite：NULL < 数值 < 文本 < 二进制。
///
/// TEXT that is not valid UTF-8 is kept as raw bytes in `Text`, so binding it
/// back compares equal to the stored value.
#[derive(Debug, Clone, Default)]
pub enum Val {
  #[default]
  Null,
  Int(i64),
  Real(OrderedFloat<f64>),
  Str(HipStr<'static>),
  /// TEXT holding invalid UTF-8 / 含非法 UTF-8 的 TEXT
  Text(HipByt<'static>),
  Bin(HipByt<'static>),
}

impl Val {
  #[inline]
  pub fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  #[inline]
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Int(i) => Some(*i),
      _ => None,
    }
  }

  #[inline]
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Str(s) => Some(s.as_str()),
      _ => None,
    }
  }

  /// TEXT bytes of `Str` or `Text` / `Str` 或 `Text` 的文本字节
  #[inline]
  pub fn text_bytes(&self) -> Option<&[u8]> {
    match self {
      Self::Str(s) => Some(s.as_bytes()),
      Self::Text(b) => Some(b.as_slice()),
      _ => None,
    }
  }

  /// TEXT from raw bytes, `Str` when valid UTF-8
  /// 由原始字节构造 TEXT，合法 UTF-8 时为 `Str`
  pub fn text(bytes: &[u8]) -> Self {
    match std::str::from_utf8(bytes) {
      Ok(s) => Self::from(s),
      Err(_) => Self::Text(HipByt::from(bytes.to_vec())),
    }
  }

  /// Storage class rank / 存储类别排名
  #[inline]
  fn rank(&self) -> u8 {
    match self {
      Self::Null => 0,
      Self::Int(_) | Self::Real(_) => 1,
      Self::Str(_) | Self::Text(_) => 2,
      Self::Bin(_) => 3,
    }
  }
}

impl Ord for Val {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      (Self::Int(a), Self::Int(b)) => a.cmp(b),
      (Self::Real(a), Self::Real(b)) => a.cmp(b),
      (Self::Int(a), Self::Real(b)) => OrderedFloat(*a as f64).cmp(b),
      (Self::Real(a), Self::Int(b)) => a.cmp(&OrderedFloat(*b as f64)),
      (Self::Str(a), Self::Str(b)) => a.as_str().cmp(b.as_str()),
      (Self::Str(_) | Self::Text(_), Self::Str(_) | Self::Text(_)) => {
        self.text_bytes().cmp(&other.text_bytes())
      }
      (Self::Bin(a), Self::Bin(b)) => a.as_slice().cmp(b.as_slice()),
      _ => self.rank().cmp(&other.rank()),
    }
  }
}

impl PartialOrd for Val {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for Val {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Val {}

macro_rules! impl_from_int {
  ($($src:ty),+ $(,)?) => {
    $(
      impl From<$src> for Val {
        #[inline]
        fn from(v: $src) -> Self {
          Val::Int(v.into())
        }
      }
    )+
  };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Val {
  #[inline]
  fn from(v: bool) -> Self {
    Val::Int(v.into())
  }
}

impl From<f64> for Val {
  #[inline]
  fn from(v: f64) -> Self {
    Val::Real(OrderedFloat(v))
  }
}

impl From<&str> for Val {
  #[inline]
  fn from(v: &str) -> Self {
    Val::Str(HipStr::from(v.to_owned()))
  }
}

impl From<String> for Val {
  #[inline]
  fn from(v: String) -> Self {
    Val::Str(HipStr::from(v))
  }
}

impl From<&[u8]> for Val {
  #[inline]
  fn from(v: &[u8]) -> Self {
    Val::Bin(HipByt::from(v.to_vec()))
  }
}

impl From<Vec<u8>> for Val {
  #[inline]
  fn from(v: Vec<u8>) -> Self {
    Val::Bin(HipByt::from(v))
  }
}

impl<T: Into<Val>> From<Option<T>> for Val {
  #[inline]
  fn from(v: Option<T>) -> Self {
    v.map_or(Val::Null, Into::into)
  }
}
