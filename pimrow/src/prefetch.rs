//! Look-ahead prefetch state machine
//! 预取状态机
//!
//! Idle -> Run -> Idle. Each tick hands out one block start to build; a
//! changed generation, the look-ahead limit or the end of the view stops it.
//! 空闲 -> 运行 -> 空闲。每次 tick 给出一个待构建的块起点；代数变化、
//! 到达预取上限或视图末尾时停止。

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
  #[default]
  Idle,
  Run {
    /// Next block start to build / 下一个待构建的块起点
    next: usize,
    /// Exclusive row bound / 行上界（不含）
    limit: usize,
    /// Generation the run was armed under / 启动时的代数
    generation: u64,
    /// Id of this run, unique per prefetcher / 本次运行的 ID，预取器内唯一
    run: u64,
  },
}

#[derive(Debug, Default)]
pub struct Prefetch {
  state: State,
  runs: u64,
}

impl Prefetch {
  /// Arm after a miss at `row`, returns the new run id
  /// 在 `row` 未命中后启动，返回新运行的 ID
  ///
  /// `None` if already running or nothing to do.
  pub fn arm(
    &mut self,
    row: usize,
    step: usize,
    look_ahead: usize,
    count: Option<usize>,
    generation: u64,
  ) -> Option<u64> {
    if look_ahead == 0 || self.state != State::Idle {
      return None;
    }
    let next = (row / step + 1) * step;
    let mut limit = next.saturating_add(look_ahead);
    if let Some(c) = count {
      limit = limit.min(c);
    }
    if next >= limit {
      return None;
    }
    self.runs += 1;
    let run = self.runs;
    self.state = State::Run {
      next,
      limit,
      generation,
      run,
    };
    Some(run)
  }

  /// Row to build on this tick, `None` once the run is over
  /// 本次 tick 要构建的行，结束后返回 `None`
  ///
  /// Stops at `next >= count`: the last row `count - 1` is still handed out
  /// when it starts a block.
  /// 在 `next >= count` 时停止：最后一行 `count - 1` 若为块起点仍会给出。
  pub fn next(&mut self, generation: u64, count: usize, step: usize) -> Option<usize> {
    let State::Run {
      next,
      limit,
      generation: armed,
      run,
    } = self.state
    else {
      return None;
    };
    if armed != generation || next >= limit || next >= count {
      self.state = State::Idle;
      return None;
    }
    self.state = State::Run {
      next: next + step,
      limit,
      generation: armed,
      run,
    };
    Some(next)
  }

  #[inline]
  pub fn stop(&mut self) {
    self.state = State::Idle;
  }

  #[inline]
  pub fn state(&self) -> State {
    self.state
  }

  #[inline]
  pub fn is_idle(&self) -> bool {
    self.state == State::Idle
  }

  /// Whether run `id` is the one in progress / 运行 `id` 是否仍在进行
  #[inline]
  pub fn running(&self, id: u64) -> bool {
    matches!(self.state, State::Run { run, .. } if run == id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arm_from_next_block() {
    let mut p = Prefetch::default();
    assert_eq!(p.arm(3, 2, 4, None, 1), Some(1));
    assert_eq!(
      p.state(),
      State::Run {
        next: 4,
        limit: 8,
        generation: 1,
        run: 1,
      }
    );
    // already running
    assert!(p.arm(9, 2, 4, None, 1).is_none());
  }

  #[test]
  fn clamp_to_count() {
    let mut p = Prefetch::default();
    assert!(p.arm(0, 2, 100, Some(5), 0).is_some());
    assert_eq!(p.next(0, 5, 2), Some(2));
    assert_eq!(p.next(0, 5, 2), Some(4));
    assert_eq!(p.next(0, 5, 2), None);
    assert!(p.is_idle());
  }

  #[test]
  fn nothing_past_end() {
    let mut p = Prefetch::default();
    assert!(p.arm(4, 2, 10, Some(5), 0).is_none());
    assert!(p.arm(0, 2, 0, None, 0).is_none());
    assert!(p.is_idle());
  }

  #[test]
  fn stale_generation_aborts() {
    let mut p = Prefetch::default();
    assert!(p.arm(0, 10, 50, None, 3).is_some());
    assert_eq!(p.next(4, 1000, 10), None);
    assert!(p.is_idle());
  }

  #[test]
  fn rearm_gets_new_run() {
    let mut p = Prefetch::default();
    let a = p.arm(0, 2, 10, None, 0).unwrap_or_default();
    assert!(p.running(a));
    p.stop();
    assert!(!p.running(a));
    let b = p.arm(0, 2, 10, None, 0).unwrap_or_default();
    assert_ne!(a, b);
    assert!(p.running(b));
    assert!(!p.running(a));
  }

  #[test]
  fn always_terminates() {
    for step in 1..6 {
      for look in 0..30 {
        for count in 0..40 {
          let mut p = Prefetch::default();
          p.arm(0, step, look, None, 0);
          let mut ticks = 0;
          while p.next(0, count, step).is_some() {
            ticks += 1;
            assert!(ticks <= look / step + 1);
          }
          assert!(p.is_idle());
        }
      }
    }
  }
}
