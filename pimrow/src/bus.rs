//! Change bus: invalidate every live model over the same table
//! 变更总线：使同一张表上的所有存活模型失效

use std::{
  cell::RefCell,
  rc::{Rc, Weak},
};

/// Something holding view caches / 持有视图缓存的对象
pub trait Watch {
  fn invalidate(&self);
}

/// Publish / subscribe invalidation channel
/// 发布/订阅失效通道
///
/// Writers publish after committing; subscribers are held weakly and pruned
/// once dropped.
#[derive(Clone, Default)]
pub struct Bus(Rc<RefCell<Vec<Weak<dyn Watch>>>>);

impl Bus {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&self, w: Weak<dyn Watch>) {
    self.0.borrow_mut().push(w);
  }

  /// Invalidate all live subscribers, returns how many were reached
  /// 使所有存活订阅者失效，返回通知数量
  pub fn publish(&self) -> usize {
    let live: Vec<Rc<dyn Watch>> = {
      let mut li = self.0.borrow_mut();
      li.retain(|w| w.strong_count() > 0);
      li.iter().filter_map(Weak::upgrade).collect()
    };
    for w in &live {
      w.invalidate();
    }
    live.len()
  }

  /// Live subscribers / 存活订阅者数量
  pub fn len(&self) -> usize {
    self.0.borrow().iter().filter(|w| w.strong_count() > 0).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
