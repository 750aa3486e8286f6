//! Model configuration
//! 模型配置

use std::time::Duration;

/// Rows per key frame block, default 20
/// 每个关键帧块的行数，默认 20
pub const DEFAULT_ROW_STEP: usize = 20;
/// Row window capacity, default 500
/// 行窗口容量，默认 500
pub const DEFAULT_WINDOW_CAP: usize = 500;
/// Key frame capacity, default 500
/// 关键帧容量，默认 500
pub const DEFAULT_KEY_CAP: usize = 500;
/// Rows to prefetch past the last miss, default 100
/// 最近一次未命中之后预取的行数，默认 100
pub const DEFAULT_LOOK_AHEAD: usize = 100;
/// Prefetch tick interval, default 5ms
/// 预取间隔，默认 5 毫秒
pub const DEFAULT_TICK_MS: u64 = 5;

/// Configuration item
/// 配置项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conf {
  /// Rows per block (min 1) / 每块行数（最小 1）
  RowStep(usize),
  /// Row window capacity, 0 disables the window / 行窗口容量，0 表示关闭
  WindowCap(usize),
  /// Key frame capacity (min 1) / 关键帧容量（最小 1）
  KeyCap(usize),
  /// Prefetch distance, 0 disables prefetch / 预取距离，0 表示关闭
  LookAhead(usize),
  /// Tick interval in ms / 预取间隔（毫秒）
  TickMs(u64),
  /// Spawn the tick task on the compio runtime / 在 compio 运行时上启动预取任务
  Background(bool),
}

/// Resolved configuration
/// 解析后的配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opt {
  pub row_step: usize,
  pub window_cap: usize,
  pub key_cap: usize,
  pub look_ahead: usize,
  pub tick: Duration,
  pub background: bool,
}

impl Default for Opt {
  fn default() -> Self {
    Self {
      row_step: DEFAULT_ROW_STEP,
      window_cap: DEFAULT_WINDOW_CAP,
      key_cap: DEFAULT_KEY_CAP,
      look_ahead: DEFAULT_LOOK_AHEAD,
      tick: Duration::from_millis(DEFAULT_TICK_MS),
      background: true,
    }
  }
}

impl Opt {
  pub fn new(conf: &[Conf]) -> Self {
    let mut o = Self::default();
    for c in conf {
      match *c {
        Conf::RowStep(n) => o.row_step = n.max(1),
        Conf::WindowCap(n) => o.window_cap = n,
        Conf::KeyCap(n) => o.key_cap = n.max(1),
        Conf::LookAhead(n) => o.look_ahead = n,
        Conf::TickMs(ms) => o.tick = Duration::from_millis(ms),
        Conf::Background(b) => o.background = b,
      }
    }
    o
  }
}
