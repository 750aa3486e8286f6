/// Base table layout
/// 基础表结构
///
/// The base table has an integer `recid` column. Category filters need a
/// category table of `(recid, categoryid)`; context filters read `context`
/// unless renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  pub name: String,
  pub category: Option<String>,
  pub context: String,
}

impl Table {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      category: None,
      context: "context".into(),
    }
  }

  /// Set category table / 设置分类表
  pub fn category(mut self, table: impl Into<String>) -> Self {
    self.category = Some(table.into());
    self
  }

  /// Rename context column / 重命名上下文列
  pub fn context(mut self, col: impl Into<String>) -> Self {
    self.context = col.into();
    self
  }
}
