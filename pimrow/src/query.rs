//! Statement composition and execution for the filtered, sorted view
//! 过滤排序视图的语句组装与执行
//!
//! Every row statement orders by the sort columns and then `t1.recid`, so the
//! view is a total order and a scan can resume from any row's key.
//! 所有行语句按排序列再按 `t1.recid` 排序，视图为全序，可从任一行的键恢复扫描。

use std::rc::Rc;

use pimrow_sql::Db;
use pimrow_val::{Dir, RecordId, SortKey, Val};

use crate::{
  CategoryFilter, ContextFilter, Error, Join, Result, Sort, Table,
  filter::BASE,
};

/// Prepared statement texts for the current clause sets
/// 当前子句集合对应的预编译语句文本
#[derive(Debug)]
pub struct Texts {
  /// Row scan from the first row / 从首行开始的行扫描
  pub start: String,
  /// Row scan from a key, inclusive / 从某个键（含）开始的行扫描
  pub from_key: String,
  pub count: String,
  /// Sort key of one record in view / 视图内单条记录的排序键
  pub point: String,
  /// Rows strictly before a key / 严格位于某键之前的行数
  pub before: String,
  pub contains: String,
}

/// Query builder and executor
/// 查询构建与执行器
pub struct Query {
  table: Table,
  filters: Vec<String>,
  joins: Vec<Join>,
  order: Vec<Sort>,
  cat: CategoryFilter,
  ctx: ContextFilter,
  fields: Vec<String>,
  texts: Option<Rc<Texts>>,
  execs: usize,
}

macro_rules! setter {
  ($name:ident, $field:ident, $ty:ty) => {
    /// Replace, returns false if unchanged / 替换，未变化时返回 false
    pub fn $name(&mut self, v: $ty) -> bool {
      if self.$field == v {
        return false;
      }
      self.$field = v;
      self.texts = None;
      true
    }
  };
}

impl Query {
  pub fn new(table: Table, fields: Vec<String>) -> Self {
    Self {
      table,
      filters: Vec::new(),
      joins: Vec::new(),
      order: Vec::new(),
      cat: CategoryFilter::All,
      ctx: ContextFilter::default(),
      fields,
      texts: None,
      execs: 0,
    }
  }

  setter!(set_filters, filters, Vec<String>);
  setter!(set_joins, joins, Vec<Join>);
  setter!(set_order_by, order, Vec<Sort>);
  setter!(set_category_filter, cat, CategoryFilter);
  setter!(set_context_filter, ctx, ContextFilter);

  #[inline]
  pub fn filters(&self) -> &[String] {
    &self.filters
  }

  #[inline]
  pub fn joins(&self) -> &[Join] {
    &self.joins
  }

  #[inline]
  pub fn order_by(&self) -> &[Sort] {
    &self.order
  }

  #[inline]
  pub fn category_filter(&self) -> &CategoryFilter {
    &self.cat
  }

  #[inline]
  pub fn context_filter(&self) -> &ContextFilter {
    &self.ctx
  }

  #[inline]
  pub fn table(&self) -> &Table {
    &self.table
  }

  /// Sort directions, one per sort column / 各排序列的方向
  pub fn dirs(&self) -> Vec<Dir> {
    self.order.iter().map(|s| s.dir).collect()
  }

  /// Statements executed so far / 已执行的语句数
  #[inline]
  pub fn execs(&self) -> usize {
    self.execs
  }

  fn preds(&self, extra: &[String]) -> Vec<String> {
    let mut li = Vec::new();
    if let Some(cat_table) = &self.table.category
      && let Some(p) = self.cat.sql(cat_table)
    {
      li.push(p);
    }
    if let Some(p) = self.ctx.sql(&self.table.context) {
      li.push(p);
    }
    li.extend(self.filters.iter().chain(extra).cloned());
    li
  }

  /// `FROM ... [WHERE ...]` without ordering
  /// 不含排序的 `FROM ... [WHERE ...]`
  pub fn from_where(&self, extra_filters: &[String], extra_joins: &[Join]) -> String {
    let mut s = format!("FROM {} AS {BASE}", self.table.name);
    for j in &self.joins {
      s.push_str(&j.sql());
    }
    for j in extra_joins {
      if !self.joins.iter().any(|o| o.table == j.table) {
        s.push_str(&j.sql());
      }
    }
    let preds = self.preds(extra_filters);
    if !preds.is_empty() {
      s.push_str(" WHERE ");
      let li: Vec<String> = preds.iter().map(|p| format!("({p})")).collect();
      s.push_str(&li.join(" AND "));
    }
    s
  }

  fn order_sql(&self) -> String {
    let mut li: Vec<String> = self
      .order
      .iter()
      .map(|s| format!("{}{}", s.qualified(), s.dir.sql()))
      .collect();
    li.push(format!("{BASE}.recid"));
    format!(" ORDER BY {}", li.join(", "))
  }

  /// Full ordered SELECT over the view plus extra clauses
  /// 视图加额外子句的完整有序 SELECT
  pub fn select_text(&self, fields: &str, extra_filters: &[String], extra_joins: &[Join]) -> String {
    format!(
      "SELECT {fields} {}{}",
      self.from_where(extra_filters, extra_joins),
      self.order_sql()
    )
  }

  /// `recid, sort columns, row cache fields`
  fn row_fields(&self) -> String {
    let mut li = vec![format!("DISTINCT {BASE}.recid")];
    li.extend(self.order.iter().map(Sort::qualified));
    li.extend(self.fields.iter().cloned());
    li.join(", ")
  }

  /// Lexicographic key predicate over `?1..?n` (sort values) and `?n+1` (recid)
  /// 基于 `?1..?n`（排序值）与 `?n+1`（recid）的字典序键谓词
  fn key_pred(&self, after: bool) -> String {
    let n = self.order.len();
    let mut ors = Vec::with_capacity(n + 1);
    for i in 0..=n {
      let mut ands: Vec<String> = self.order[..i]
        .iter()
        .enumerate()
        .map(|(j, s)| format!("{} IS ?{}", s.qualified(), j + 1))
        .collect();
      if i < n {
        ands.push(cmp_col(&self.order[i], i + 1, after));
      } else if after {
        ands.push(format!("{BASE}.recid >= ?{}", n + 1));
      } else {
        ands.push(format!("{BASE}.recid < ?{}", n + 1));
      }
      ors.push(format!("({})", ands.join(" AND ")));
    }
    ors.join(" OR ")
  }

  /// Build (once per clause change) the row, count and lookup statements
  /// 构建行、计数与查找语句（子句变化后构建一次）
  pub fn prepare_row_queries(&mut self) -> Rc<Texts> {
    if let Some(t) = &self.texts {
      return t.clone();
    }
    let fields = self.row_fields();
    let keys: Vec<String> = self.order.iter().map(Sort::qualified).collect();
    let point_fields = if keys.is_empty() {
      format!("{BASE}.recid")
    } else {
      format!("{BASE}.recid, {}", keys.join(", "))
    };
    let by_id = [format!("{BASE}.recid = ?1")];
    let t = Rc::new(Texts {
      start: self.select_text(&fields, &[], &[]),
      from_key: self.select_text(&fields, &[self.key_pred(true)], &[]),
      count: format!("SELECT COUNT(DISTINCT {BASE}.recid) {}", self.from_where(&[], &[])),
      point: format!("SELECT {point_fields} {} LIMIT 1", self.from_where(&by_id, &[])),
      before: format!(
        "SELECT COUNT(DISTINCT {BASE}.recid) {}",
        self.from_where(&[self.key_pred(false)], &[])
      ),
      contains: format!("SELECT 1 {} LIMIT 1", self.from_where(&by_id, &[])),
    });
    self.texts = Some(t.clone());
    t
  }

  /// Stream view rows from the start or from `from` (inclusive)
  /// 从首行或从 `from`（含）开始流式读取视图行
  ///
  /// `row` gets the sort key and the row cache values and returns false to
  /// stop. Returns true when the scan ran out of rows.
  pub fn scan<D: Db + ?Sized>(
    &mut self,
    db: &D,
    from: Option<&SortKey>,
    mut row: impl FnMut(SortKey, &[Val]) -> bool,
  ) -> Result<bool> {
    let t = self.prepare_row_queries();
    self.execs += 1;
    let n = self.order.len();
    let (sql, args) = match from {
      Some(k) => (&t.from_key, key_args(k)),
      None => (&t.start, Vec::new()),
    };
    let mut err = None;
    let mut exhausted = true;
    db.each(sql, &args, &mut |r| match decode(r, n) {
      Ok(key) => {
        if row(key, &r[1 + n..]) {
          true
        } else {
          exhausted = false;
          false
        }
      }
      Err(e) => {
        err = Some(e);
        false
      }
    })?;
    match err {
      Some(e) => Err(e),
      None => Ok(exhausted),
    }
  }

  pub fn count<D: Db + ?Sized>(&mut self, db: &D) -> Result<usize> {
    let t = self.prepare_row_queries();
    self.execs += 1;
    let r = db.one(&t.count, &[])?;
    Ok(r.as_deref().map_or(0, first_usize))
  }

  /// Sort key of `id` if it is in the view / `id` 在视图内时返回其排序键
  pub fn point<D: Db + ?Sized>(&mut self, db: &D, id: RecordId) -> Result<Option<SortKey>> {
    let t = self.prepare_row_queries();
    self.execs += 1;
    match db.one(&t.point, &[id.into()])? {
      Some(r) => decode(&r, self.order.len()).map(Some),
      None => Ok(None),
    }
  }

  /// Rows strictly before `key` / 严格位于 `key` 之前的行数
  pub fn before<D: Db + ?Sized>(&mut self, db: &D, key: &SortKey) -> Result<usize> {
    let t = self.prepare_row_queries();
    self.execs += 1;
    let r = db.one(&t.before, &key_args(key))?;
    Ok(r.as_deref().map_or(0, first_usize))
  }

  pub fn contains<D: Db + ?Sized>(&mut self, db: &D, id: RecordId) -> Result<bool> {
    let t = self.prepare_row_queries();
    self.execs += 1;
    Ok(db.one(&t.contains, &[id.into()])?.is_some())
  }

  /// Ids matching the view plus extra clauses, in view order
  /// 满足视图及额外子句的 ID，按视图顺序
  pub fn matches<D: Db + ?Sized>(
    &mut self,
    db: &D,
    extra_filters: &[String],
    extra_joins: &[Join],
  ) -> Result<Vec<RecordId>> {
    let mut fields = vec![format!("DISTINCT {BASE}.recid")];
    fields.extend(self.order.iter().map(Sort::qualified));
    let sql = self.select_text(&fields.join(", "), extra_filters, extra_joins);
    self.execs += 1;
    let mut li = Vec::new();
    let mut err = None;
    db.each(&sql, &[], &mut |r| match decode(r, 0) {
      Ok(k) => {
        li.push(k.id);
        true
      }
      Err(e) => {
        err = Some(e);
        false
      }
    })?;
    match err {
      Some(e) => Err(e),
      None => Ok(li),
    }
  }
}

/// Strict comparison of one sort column against `?p`, NULL-aware
/// 单个排序列与 `?p` 的严格比较，处理 NULL
fn cmp_col(s: &Sort, p: usize, after: bool) -> String {
  let c = s.qualified();
  // NULL is the lowest value, so "greater" in view order depends on both
  let greater = matches!((s.dir, after), (Dir::Asc, true) | (Dir::Desc, false));
  if greater {
    format!("({c} > ?{p} OR ({c} IS NOT NULL AND ?{p} IS NULL))")
  } else {
    format!("({c} < ?{p} OR ({c} IS NULL AND ?{p} IS NOT NULL))")
  }
}

fn key_args(k: &SortKey) -> Vec<Val> {
  let mut li = Vec::with_capacity(k.vals.len() + 1);
  li.extend(k.vals.iter().cloned());
  li.push(k.id.into());
  li
}

/// `recid, k1..kn, ...` into a sort key / 将 `recid, k1..kn, ...` 解码为排序键
fn decode(r: &[Val], n: usize) -> Result<SortKey> {
  if r.len() < 1 + n {
    return Err(Error::BadRow {
      want: 1 + n,
      got: r.len(),
    });
  }
  let id = RecordId::try_from(&r[0]).map_err(|_| Error::BadId(r[0].clone()))?;
  Ok(SortKey::new(r[1..1 + n].to_vec(), id))
}

fn first_usize(r: &[Val]) -> usize {
  r.first()
    .and_then(Val::as_i64)
    .and_then(|n| usize::try_from(n).ok())
    .unwrap_or(0)
}
