use std::cmp::Ordering;

use aok::{OK, Void};
use log::info;
use pimrow_val::{Dir, RecordId, SortKey, Val};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn key(vals: Vec<Val>, id: u32) -> SortKey {
  SortKey::new(vals, RecordId(id))
}

#[test]
fn test_storage_class_order() -> Void {
  info!("> NULL < 数值 < 文本 < 二进制");
  let li = [
    Val::Null,
    Val::from(-5),
    Val::from(1.5),
    Val::from(2),
    Val::from("a"),
    Val::from("b"),
    Val::from(vec![0u8]),
  ];
  for w in li.windows(2) {
    assert_eq!(w[0].cmp(&w[1]), Ordering::Less, "{:?} < {:?}", w[0], w[1]);
  }
  OK
}

#[test]
fn test_numeric_cross_compare() -> Void {
  assert_eq!(Val::from(1), Val::from(1.0));
  assert!(Val::from(1) < Val::from(1.25));
  assert!(Val::from(3.5) > Val::from(3));
  OK
}

#[test]
fn test_option_into_null() -> Void {
  let v: Val = Option::<&str>::None.into();
  assert!(v.is_null());
  let v: Val = Some("x").into();
  assert_eq!(v.as_str(), Some("x"));
  OK
}

#[test]
fn test_record_id_decode() -> Void {
  assert_eq!(RecordId::try_from(&Val::from(7)), Ok(RecordId(7)));
  assert!(RecordId::try_from(&Val::Null).is_err());
  assert!(RecordId::try_from(&Val::Int(-1)).is_err());
  assert!(RecordId::try_from(&Val::Int(i64::from(u32::MAX) + 1)).is_err());
  assert_eq!(Val::from(RecordId(9)), Val::Int(9));
  OK
}

#[test]
fn test_null_first_asc_last_desc() -> Void {
  let a = key(vec![Val::Null], 1);
  let b = key(vec![Val::from("x")], 2);
  assert_eq!(a.cmp_by(&b, &[Dir::Asc]), Ordering::Less);
  assert_eq!(a.cmp_by(&b, &[Dir::Desc]), Ordering::Greater);
  OK
}

#[test]
fn test_tie_break_ascends_in_desc() -> Void {
  let a = key(vec![Val::from("same")], 3);
  let b = key(vec![Val::from("same")], 8);
  // recid 始终升序
  assert_eq!(a.cmp_by(&b, &[Dir::Asc]), Ordering::Less);
  assert_eq!(a.cmp_by(&b, &[Dir::Desc]), Ordering::Less);
  OK
}

#[test]
fn test_multi_column() -> Void {
  let dirs = [Dir::Asc, Dir::Desc];
  let a = key(vec![Val::from("smith"), Val::from("zoe")], 1);
  let b = key(vec![Val::from("smith"), Val::from("adam")], 2);
  let c = key(vec![Val::from("young"), Val::from("zoe")], 3);
  assert_eq!(a.cmp_by(&b, &dirs), Ordering::Less);
  assert_eq!(b.cmp_by(&c, &dirs), Ordering::Less);
  assert_eq!(a.cmp_by(&a, &dirs), Ordering::Equal);
  OK
}

#[test]
fn test_raw_text_order() -> Void {
  info!("> 非法 UTF-8 文本按字节比较");
  let raw = Val::text(&[0xff]);
  assert!(matches!(raw, Val::Text(_)));
  assert!(matches!(Val::text(b"ok"), Val::Str(_)));
  assert_eq!(raw.text_bytes(), Some(&[0xffu8][..]));
  assert_eq!(raw.as_str(), None);

  // 0xf0 9f 98 80 is valid UTF-8, 0xff is not; bytes decide
  assert!(Val::from("z") < Val::text(&[0xf0, 0x9f, 0x98, 0x80]));
  assert!(Val::text(&[0xf0, 0x9f, 0x98, 0x80]) < raw);
  assert!(raw < Val::from(vec![0u8]));
  assert!(Val::Int(9) < raw);
  assert_eq!(Val::text(&[b'a', 0xff]), Val::text(&[b'a', 0xff]));
  assert_ne!(Val::text(&[b'a', 0xff]), Val::from("a\u{fffd}"));
  OK
}

mod proptest_key {
  use pimrow_val::{Dir, RecordId, SortKey, Val};
  use proptest::prelude::*;

  fn arb_val() -> impl Strategy<Value = Val> {
    prop_oneof![
      Just(Val::Null),
      any::<i32>().prop_map(Val::from),
      "[a-c]{0,3}".prop_map(Val::from),
    ]
  }

  fn arb_dir() -> impl Strategy<Value = Dir> {
    prop_oneof![Just(Dir::Asc), Just(Dir::Desc)]
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sorting with cmp_by yields a total order consistent with reversal
    /// cmp_by 是全序，且交换参数结果相反
    #[test]
    fn prop_total_order(
      rows in prop::collection::vec((arb_val(), arb_val()), 1..40),
      dirs in prop::collection::vec(arb_dir(), 2),
    ) {
      let mut keys: Vec<SortKey> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (a, b))| SortKey::new(vec![a, b], RecordId(i as u32)))
        .collect();
      keys.sort_by(|a, b| a.cmp_by(b, &dirs));
      for w in keys.windows(2) {
        prop_assert!(w[0].cmp_by(&w[1], &dirs).is_lt());
        prop_assert!(w[1].cmp_by(&w[0], &dirs).is_gt());
      }
    }
  }
}
