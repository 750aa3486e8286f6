//! Clause sets: joins, sort order, category and context filters
//! 子句集合：连接、排序、分类与上下文过滤

use std::collections::BTreeSet;

use pimrow_val::Dir;

/// Alias of the base table in every generated statement
/// 生成语句中基础表的别名
pub const BASE: &str = "t1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
  Inner,
  Left,
}

/// Auxiliary table joined on `recid`
/// 按 `recid` 连接的辅助表
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Join {
  pub table: String,
  pub kind: JoinKind,
}

impl Join {
  pub fn inner(table: impl Into<String>) -> Self {
    Self {
      table: table.into(),
      kind: JoinKind::Inner,
    }
  }

  pub fn left(table: impl Into<String>) -> Self {
    Self {
      table: table.into(),
      kind: JoinKind::Left,
    }
  }

  pub(crate) fn sql(&self) -> String {
    let kw = match self.kind {
      JoinKind::Inner => "JOIN",
      JoinKind::Left => "LEFT JOIN",
    };
    format!(" {kw} {t} ON ({BASE}.recid = {t}.recid)", t = self.table)
  }
}

/// Sort column of the base table
/// 基础表的排序列
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
  pub col: String,
  pub dir: Dir,
}

impl Sort {
  pub fn asc(col: impl Into<String>) -> Self {
    Self {
      col: col.into(),
      dir: Dir::Asc,
    }
  }

  pub fn desc(col: impl Into<String>) -> Self {
    Self {
      col: col.into(),
      dir: Dir::Desc,
    }
  }

  #[inline]
  pub(crate) fn qualified(&self) -> String {
    format!("{BASE}.{}", self.col)
  }
}

/// Category membership predicate
/// 分类成员谓词
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  /// Records without any category / 无任何分类的记录
  Unfiled,
  /// Records filed under every listed category / 属于全部所列分类的记录
  List(BTreeSet<String>),
}

impl CategoryFilter {
  pub fn list<I, S>(ids: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::List(ids.into_iter().map(Into::into).collect())
  }

  pub(crate) fn sql(&self, cat_table: &str) -> Option<String> {
    match self {
      Self::All => None,
      Self::Unfiled => Some(format!(
        "{BASE}.recid NOT IN (SELECT recid FROM {cat_table})"
      )),
      Self::List(ids) => {
        if ids.is_empty() {
          return None;
        }
        let li: Vec<String> = ids
          .iter()
          .map(|id| {
            format!(
              "{BASE}.recid IN (SELECT recid FROM {cat_table} WHERE categoryid = {})",
              quote(id)
            )
          })
          .collect();
        Some(li.join(" AND "))
      }
    }
  }
}

/// Source context predicate
/// 数据源上下文谓词
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextFilter {
  /// Hide these contexts, empty shows all / 排除这些上下文，空集显示全部
  Exclude(BTreeSet<i64>),
  /// Show only these contexts, empty shows none / 仅显示这些上下文，空集不显示
  Restrict(BTreeSet<i64>),
}

impl Default for ContextFilter {
  fn default() -> Self {
    Self::Exclude(BTreeSet::new())
  }
}

impl ContextFilter {
  pub(crate) fn sql(&self, col: &str) -> Option<String> {
    let join = |set: &BTreeSet<i64>| {
      set
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
    };
    match self {
      Self::Exclude(set) if set.is_empty() => None,
      Self::Exclude(set) => Some(format!("{BASE}.{col} NOT IN ({})", join(set))),
      Self::Restrict(set) if set.is_empty() => Some("0".into()),
      Self::Restrict(set) => Some(format!("{BASE}.{col} IN ({})", join(set))),
    }
  }
}

/// Quote as a SQL string literal
/// 转为 SQL 字符串字面量
pub fn quote(s: &str) -> String {
  format!("'{}'", s.replace('\'', "''"))
}

/// Case-insensitive "field or any word in it starts with `text`" clause
/// 不区分大小写的"字段或其中某个词以 `text` 开头"子句
///
/// Returns `None` for empty text or no columns.
pub fn starts_with(cols: &[&str], text: &str) -> Option<String> {
  if text.is_empty() || cols.is_empty() {
    return None;
  }
  let mut esc = String::with_capacity(text.len());
  for c in text.to_lowercase().chars() {
    if matches!(c, '\\' | '%' | '_') {
      esc.push('\\');
    }
    esc.push(c);
  }
  let head = quote(&format!("{esc}%"));
  let word = quote(&format!("% {esc}%"));
  let li: Vec<String> = cols
    .iter()
    .map(|c| {
      format!(
        "lower({BASE}.{c}) LIKE {head} ESCAPE '\\' OR lower({BASE}.{c}) LIKE {word} ESCAPE '\\'"
      )
    })
    .collect();
  Some(li.join(" OR "))
}
