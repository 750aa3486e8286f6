use std::rc::Rc;

use aok::{OK, Void};
use log::info;
use pimrow_sql::{Db, Error, Sqlite};
use pimrow_val::Val;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn fixture() -> pimrow_sql::Result<Sqlite> {
  let db = Sqlite::open_in_memory()?;
  db.batch(
    "CREATE TABLE t (recid INTEGER PRIMARY KEY, name TEXT, score REAL, raw BLOB);
     INSERT INTO t VALUES (1, 'a', 1.5, x'00ff');
     INSERT INTO t VALUES (2, NULL, NULL, NULL);
     INSERT INTO t VALUES (3, 'c', 3.0, NULL);",
  )?;
  Ok(db)
}

#[test]
fn test_each_decodes_types() -> Void {
  info!("> 行值解码");
  let db = fixture()?;
  let mut li = Vec::new();
  db.each("SELECT recid, name, score, raw FROM t ORDER BY recid", &[], &mut |r| {
    li.push(r.to_vec());
    true
  })?;
  assert_eq!(li.len(), 3);
  assert_eq!(li[0][0], Val::Int(1));
  assert_eq!(li[0][1].as_str(), Some("a"));
  assert_eq!(li[0][2], Val::from(1.5));
  assert_eq!(li[0][3], Val::from(vec![0u8, 0xff]));
  assert!(li[1][1].is_null());
  assert!(li[1][2].is_null());
  OK
}

#[test]
fn test_each_stops_early() -> Void {
  let db = fixture()?;
  let mut n = 0;
  db.each("SELECT recid FROM t ORDER BY recid", &[], &mut |_| {
    n += 1;
    n < 2
  })?;
  assert_eq!(n, 2);
  OK
}

#[test]
fn test_positional_args() -> Void {
  let db = fixture()?;
  let r = db.one(
    "SELECT count(*) FROM t WHERE recid >= ?1 AND name IS ?2",
    &[Val::from(2), Val::Null],
  )?;
  assert_eq!(r.as_deref(), Some(&[Val::Int(1)][..]));
  let none = db.one("SELECT recid FROM t WHERE recid = ?1", &[Val::from(99)])?;
  assert!(none.is_none());
  OK
}

#[test]
fn test_execute_and_shared_handle() -> Void {
  let db = Rc::new(fixture()?);
  let n = db.execute("UPDATE t SET name = ?1 WHERE recid = ?2", &[Val::from("b"), Val::from(2)])?;
  assert_eq!(n, 1);
  let r = db.one("SELECT name FROM t WHERE recid = 2", &[])?;
  assert_eq!(r.and_then(|r| r[0].as_str().map(str::to_owned)).as_deref(), Some("b"));
  OK
}

#[test]
fn test_bad_sql_is_error() -> Void {
  let db = fixture()?;
  let r = db.each("SELECT nope FROM missing", &[], &mut |_| true);
  let e = r.unwrap_err();
  info!("{e}");
  assert!(matches!(e, Error::Driver { code: 1, .. }));
  assert!(e.to_string().contains("missing"));
  OK
}

#[test]
fn test_raw_text_round_trip() -> Void {
  info!("> 非法 UTF-8 文本原样回绑");
  let db = fixture()?;
  db.batch("INSERT INTO t (recid, name) VALUES (9, CAST(X'61FF' AS TEXT));")?;
  let r = db
    .one("SELECT name, typeof(name) FROM t WHERE recid = 9", &[])?
    .unwrap();
  assert_eq!(r[0].text_bytes(), Some(&[b'a', 0xff][..]));
  assert_eq!(r[1].as_str(), Some("text"));

  // bound back as TEXT with identical bytes
  let hit = db.one("SELECT recid FROM t WHERE name = ?1", &[r[0].clone()])?;
  assert_eq!(hit.map(|h| h[0].clone()), Some(Val::Int(9)));
  let before = db.one("SELECT COUNT(*) FROM t WHERE name < ?1", &[r[0].clone()])?;
  assert_eq!(before.map(|h| h[0].clone()), Some(Val::Int(1)));
  OK
}

#[test]
fn test_open_file() -> Void {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("pim.db");
  {
    let db = Sqlite::open(&path)?;
    db.batch("CREATE TABLE x (recid INTEGER); INSERT INTO x VALUES (7);")?;
  }
  let db = Sqlite::open(&path)?;
  let r = db.one("SELECT recid FROM x", &[])?;
  assert_eq!(r.map(|r| r[0].clone()), Some(Val::Int(7)));
  OK
}
