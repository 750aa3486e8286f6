//! Row order model: row number <-> record id over the filtered, sorted view
//! 行序模型：过滤排序视图上的行号与记录 ID 双向映射

use std::{
  cell::{Cell, RefCell, RefMut},
  collections::BTreeSet,
  rc::{Rc, Weak},
  time::Duration,
};

use compio::runtime::Runtime;
use log::{debug, trace};
use pimrow_sql::Db;
use pimrow_val::{RecordId, SortKey};

use crate::{
  Bus, CategoryFilter, Conf, ContextFilter, Join, KeyFrames, Opt, Prefetch, Query, RowCache,
  Sort, Table, Watch, Window, error::log_err,
};

/// Listener for "records updated" / "记录已更新"监听器
pub type Hook = Rc<dyn Fn()>;

struct Inner<D, C> {
  db: D,
  query: Query,
  opt: Opt,
  window: Window,
  keys: KeyFrames,
  count: Option<usize>,
  rows: C,
  prefetch: Prefetch,
  /// Bumped on every invalidation / 每次失效时递增
  generation: u64,
}

impl<D: Db, C: RowCache> Inner<D, C> {
  fn reset(&mut self) {
    self.window.clear();
    self.keys.clear();
    self.count = None;
    self.rows.clear();
    self.prefetch.stop();
    self.generation += 1;
    debug!(
      "invalidate {} generation {}",
      self.query.table().name,
      self.generation
    );
  }

  fn count(&mut self) -> usize {
    if let Some(c) = self.count {
      return c;
    }
    match self.query.count(&self.db) {
      Ok(c) => {
        self.count = Some(c);
        c
      }
      Err(e) => {
        log_err("count", &e);
        0
      }
    }
  }

  /// Returns the id and the prefetch run armed by this miss, if any
  /// 返回 ID 以及本次未命中启动的预取运行（如有）
  fn id(&mut self, row: usize) -> (Option<RecordId>, Option<u64>) {
    if self.count.is_some_and(|c| row >= c) {
      return (None, None);
    }
    if let Some(id) = self.window.get(row) {
      return (Some(id), None);
    }
    let id = self.build(row);
    let run = self.prefetch.arm(
      row,
      self.opt.row_step,
      self.opt.look_ahead,
      self.count,
      self.generation,
    );
    if let Some(run) = run {
      debug!("prefetch run {run} armed after row {row}");
    }
    (id, run)
  }

  /// Fill the window block holding `row`, resuming from the nearest checkpoint
  /// 填充 `row` 所在的窗口块，从最近的检查点恢复扫描
  fn build(&mut self, row: usize) -> Option<RecordId> {
    let step = self.opt.row_step;
    let block = row / step;
    let (mut cur, from) = match self.keys.nearest(block) {
      Some((b, key)) => (b * step, Some(key)),
      None => (0, None),
    };
    let win_start = block * step;
    let win_end = win_start + step;
    trace!("build row {row} from row {cur}");

    let mut found = None;
    let Self {
      db,
      query,
      window,
      keys,
      rows,
      ..
    } = &mut *self;
    let r = query.scan(&*db, from.as_ref(), |key: SortKey, vals| {
      let id = key.id;
      if cur % step == 0 {
        keys.record(cur / step, key);
      }
      if cur >= win_start {
        window.put(cur, id);
        rows.cache_row(cur, id, vals);
        if cur == row {
          found = Some(id);
        }
      }
      cur += 1;
      cur < win_end
    });

    match r {
      // Ran out before the window end, so `cur` is the total
      Ok(true) => self.count = Some(cur),
      Ok(false) => {}
      Err(e) => log_err("build cache", &e),
    }
    found
  }

  fn row(&mut self, id: RecordId) -> Option<usize> {
    let key = match self.query.point(&self.db, id) {
      Ok(Some(k)) => k,
      Ok(None) => return None,
      Err(e) => {
        log_err("row lookup", &e);
        return None;
      }
    };
    match self.query.before(&self.db, &key) {
      Ok(n) => Some(n),
      Err(e) => {
        log_err("row count", &e);
        None
      }
    }
  }

  /// One prefetch step; false once the prefetcher is idle
  /// 执行一步预取；预取空闲后返回 false
  fn tick(&mut self) -> bool {
    if self.prefetch.is_idle() {
      return false;
    }
    let count = self.count();
    match self.prefetch.next(self.generation, count, self.opt.row_step) {
      Some(row) => {
        if !self.window.contains(row) {
          self.build(row);
        }
        true
      }
      None => {
        debug!("prefetch idle");
        false
      }
    }
  }
}

struct Shared<D, C> {
  inner: RefCell<Inner<D, C>>,
  hooks: RefCell<Vec<Hook>>,
  /// Set when a bus publish found the model busy / 总线发布时模型忙则置位
  stale: Cell<bool>,
}

impl<D: Db, C: RowCache> Shared<D, C> {
  fn inner(&self) -> RefMut<'_, Inner<D, C>> {
    let mut inner = self.inner.borrow_mut();
    if self.stale.take() {
      inner.reset();
    }
    inner
  }

  fn emit(&self) {
    let hooks: Vec<Hook> = self.hooks.borrow().clone();
    for h in hooks {
      h();
    }
  }
}

impl<D: Db, C: RowCache> Watch for Shared<D, C> {
  fn invalidate(&self) {
    match self.inner.try_borrow_mut() {
      Ok(mut inner) => inner.reset(),
      Err(_) => self.stale.set(true),
    }
    self.emit();
  }
}

/// Background tick task for one prefetch run, holds the model weakly
/// 单次预取运行的后台 tick 任务，弱引用模型
async fn timer<D, C>(weak: Weak<Shared<D, C>>, run: u64, dur: Duration)
where
  D: Db,
  C: RowCache,
{
  loop {
    compio::time::sleep(dur).await;
    let Some(s) = weak.upgrade() else {
      break;
    };
    let mut inner = s.inner();
    // Stopped, invalidated or replaced by a newer run
    if !inner.prefetch.running(run) || !inner.tick() {
      break;
    }
  }
}

/// Windowed row-order model over one table
/// 单表上的窗口化行序模型
///
/// Clones share the same caches. All access is single-threaded; listeners run
/// after internal state is released and may call back into the model.
pub struct Model<D: Db + 'static, C: RowCache + 'static = ()>(Rc<Shared<D, C>>);

impl<D: Db + 'static, C: RowCache + 'static> Clone for Model<D, C> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<D: Db + 'static> Model<D> {
  pub fn new(db: D, table: Table, conf: &[Conf]) -> Self {
    Self::with_rows(db, table, (), conf)
  }
}

impl<D: Db + 'static, C: RowCache + 'static> Model<D, C> {
  /// Create with an injected row cache / 以注入的行缓存创建
  pub fn with_rows(db: D, table: Table, rows: C, conf: &[Conf]) -> Self {
    let opt = Opt::new(conf);
    let query = Query::new(table, rows.fields());
    Self(Rc::new(Shared {
      inner: RefCell::new(Inner {
        db,
        query,
        opt,
        window: Window::new(opt.window_cap),
        keys: KeyFrames::new(opt.key_cap),
        count: None,
        rows,
        prefetch: Prefetch::default(),
        generation: 0,
      }),
      hooks: RefCell::new(Vec::new()),
      stale: Cell::new(false),
    }))
  }

  /// Record id at `row`, `None` if out of range or unavailable
  /// `row` 处的记录 ID，越界或不可用时为 `None`
  pub fn id(&self, row: usize) -> Option<RecordId> {
    let (id, run, opt) = {
      let mut inner = self.0.inner();
      let (id, run) = inner.id(row);
      (id, run, inner.opt)
    };
    if let Some(run) = run
      && opt.background
    {
      self.spawn_timer(run, opt.tick);
    }
    id
  }

  /// Tick in the background on the current compio runtime; without one the
  /// run stays armed for `prefetch_tick`
  /// 在当前 compio 运行时上后台 tick；无运行时则留给 `prefetch_tick` 手动驱动
  fn spawn_timer(&self, run: u64, dur: Duration) {
    let task = timer(Rc::downgrade(&self.0), run, dur);
    if Runtime::try_with_current(|rt| rt.spawn(task).detach()).is_err() {
      debug!("no compio runtime, prefetch run {run} left for manual ticks");
    }
  }

  /// Ids of `rows`, skipping unavailable ones / `rows` 对应的 ID，跳过不可用的
  pub fn ids(&self, rows: &[usize]) -> Vec<RecordId> {
    rows.iter().filter_map(|r| self.id(*r)).collect()
  }

  /// Position of `id` in the view / `id` 在视图中的位置
  pub fn row(&self, id: RecordId) -> Option<usize> {
    self.0.inner().row(id)
  }

  pub fn count(&self) -> usize {
    self.0.inner().count()
  }

  pub fn contains(&self, id: RecordId) -> bool {
    let mut inner = self.0.inner();
    let Inner { db, query, .. } = &mut *inner;
    query.contains(&*db, id).unwrap_or_else(|e| {
      log_err("contains", &e);
      false
    })
  }

  /// Ids in view order matching extra clauses / 按视图顺序返回满足额外子句的 ID
  pub fn matches(&self, extra_filters: &[String], extra_joins: &[Join]) -> Vec<RecordId> {
    let mut inner = self.0.inner();
    let Inner { db, query, .. } = &mut *inner;
    query
      .matches(&*db, extra_filters, extra_joins)
      .unwrap_or_else(|e| {
        log_err("matches", &e);
        Vec::new()
      })
  }

  pub fn select_text(&self, fields: &str, extra_filters: &[String], extra_joins: &[Join]) -> String {
    self
      .0
      .inner()
      .query
      .select_text(fields, extra_filters, extra_joins)
  }

  fn update(&self, f: impl FnOnce(&mut Query) -> bool) {
    let changed = {
      let mut inner = self.0.inner();
      let changed = f(&mut inner.query);
      if changed {
        inner.reset();
      }
      changed
    };
    if changed {
      self.0.emit();
    }
  }

  pub fn set_filters(&self, filters: Vec<String>) {
    self.update(|q| q.set_filters(filters));
  }

  /// Single filter clause / 单个过滤子句
  pub fn set_filter(&self, clause: impl Into<String>) {
    self.set_filters(vec![clause.into()]);
  }

  pub fn clear_filter(&self) {
    self.set_filters(Vec::new());
  }

  pub fn set_joins(&self, joins: Vec<Join>) {
    self.update(|q| q.set_joins(joins));
  }

  pub fn set_order_by(&self, order: Vec<Sort>) {
    self.update(|q| q.set_order_by(order));
  }

  pub fn set_category_filter(&self, f: CategoryFilter) {
    self.update(|q| q.set_category_filter(f));
  }

  pub fn set_context_filter(&self, f: ContextFilter) {
    self.update(|q| q.set_context_filter(f));
  }

  pub fn filters(&self) -> Vec<String> {
    self.0.inner().query.filters().to_vec()
  }

  pub fn joins(&self) -> Vec<Join> {
    self.0.inner().query.joins().to_vec()
  }

  pub fn order_by(&self) -> Vec<Sort> {
    self.0.inner().query.order_by().to_vec()
  }

  pub fn category_filter(&self) -> CategoryFilter {
    self.0.inner().query.category_filter().clone()
  }

  pub fn context_filter(&self) -> ContextFilter {
    self.0.inner().query.context_filter().clone()
  }

  /// Contexts of the current context filter / 当前上下文过滤的上下文集合
  pub fn contexts(&self) -> BTreeSet<i64> {
    match self.context_filter() {
      ContextFilter::Exclude(s) | ContextFilter::Restrict(s) => s,
    }
  }

  /// Drop all cached rows, checkpoints and count, then notify listeners
  /// 丢弃所有缓存的行、检查点与计数，然后通知监听者
  pub fn invalidate_cache(&self) {
    self.0.invalidate();
  }

  /// Register a "records updated" listener / 注册"记录已更新"监听器
  pub fn on_update(&self, f: impl Fn() + 'static) {
    self.0.hooks.borrow_mut().push(Rc::new(f));
  }

  /// Get invalidated whenever `bus` publishes / 在 `bus` 发布时失效
  pub fn subscribe(&self, bus: &Bus) {
    let rc: Rc<dyn Watch> = self.0.clone();
    bus.subscribe(Rc::downgrade(&rc));
  }

  /// Access the injected row cache / 访问注入的行缓存
  pub fn rows<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
    f(&mut self.0.inner().rows)
  }

  /// Run one prefetch step by hand, false once idle
  /// 手动执行一步预取，空闲后返回 false
  pub fn prefetch_tick(&self) -> bool {
    self.0.inner().tick()
  }

  pub fn prefetch_idle(&self) -> bool {
    self.0.inner().prefetch.is_idle()
  }

  pub fn stop_prefetch(&self) {
    self.0.inner().prefetch.stop();
  }

  /// Statements executed so far / 已执行的语句数
  pub fn queries(&self) -> usize {
    self.0.inner().query.execs()
  }

  /// Whether `row` sits in the window / `row` 是否在窗口中
  pub fn cached(&self, row: usize) -> bool {
    self.0.inner().window.contains(row)
  }

  /// Checkpoint of `block`, if kept / `block` 的检查点（如有）
  pub fn checkpoint(&self, block: usize) -> Option<SortKey> {
    self.0.inner().keys.get(block).cloned()
  }

  /// Invalidation generation / 失效代数
  pub fn generation(&self) -> u64 {
    self.0.inner().generation
  }
}
