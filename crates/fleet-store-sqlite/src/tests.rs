//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use strum::IntoEnumIterator as _;

use fleet_core::{
  Workspace, WorkspaceSettings,
  clock::{Env, FixedClock, SequentialIds},
  driver::NewDriver,
  log::{LogDetails, NewLogEntry, PaymentStatus},
  store::{Collection, CollectionStore},
  vehicle::NewVehicle,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn env() -> Env {
  let now = Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap();
  Env::new(Arc::new(FixedClock::new(now)), Arc::new(SequentialIds::default()))
}

fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

// ─── Raw collections ─────────────────────────────────────────────────────────

#[tokio::test]
async fn absent_collection_loads_none() {
  let s = store().await;
  for collection in Collection::iter() {
    assert!(s.load(collection).await.unwrap().is_none());
    assert!(s.saved_at(collection).await.unwrap().is_none());
  }
}

#[tokio::test]
async fn save_then_load() {
  let s = store().await;
  s.save(Collection::Drivers, r#"[{"id":"a"}]"#.into())
    .await
    .unwrap();

  let body = s.load(Collection::Drivers).await.unwrap();
  assert_eq!(body.as_deref(), Some(r#"[{"id":"a"}]"#));
  assert!(s.load(Collection::Vehicles).await.unwrap().is_none());
  assert!(s.saved_at(Collection::Drivers).await.unwrap().is_some());
}

#[tokio::test]
async fn saved_at_comes_from_the_injected_clock() {
  let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap()));
  let s = store().await.with_clock(clock.clone());

  s.save(Collection::Vehicles, "[]".into()).await.unwrap();
  assert_eq!(
    s.saved_at(Collection::Vehicles).await.unwrap(),
    Some(Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap())
  );

  clock.advance(Duration::hours(2));
  s.save(Collection::Vehicles, "[]".into()).await.unwrap();
  assert_eq!(
    s.saved_at(Collection::Vehicles).await.unwrap(),
    Some(Utc.with_ymd_and_hms(2025, 6, 10, 11, 30, 0).unwrap())
  );
}

#[tokio::test]
async fn save_overwrites_whole_body() {
  let s = store().await;
  s.save(Collection::Logs, "[1,2,3]".into()).await.unwrap();
  s.save(Collection::Logs, "[]".into()).await.unwrap();

  assert_eq!(s.load(Collection::Logs).await.unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn remove_deletes_and_tolerates_absence() {
  let s = store().await;
  s.save(Collection::Notifications, "[]".into()).await.unwrap();

  s.remove(Collection::Notifications).await.unwrap();
  assert!(s.load(Collection::Notifications).await.unwrap().is_none());

  s.remove(Collection::Notifications).await.unwrap();
  s.remove(Collection::ActivityHistory).await.unwrap();
}

#[tokio::test]
async fn collections_are_keyed_by_snake_case_name() {
  let s = store().await;
  s.save(Collection::ActivityHistory, "[]".into()).await.unwrap();

  let name = s
    .conn
    .call(|conn| {
      let name: String = conn.query_row("SELECT name FROM collections", [], |r| r.get(0))?;
      Ok(name)
    })
    .await
    .unwrap();
  assert_eq!(name, "activity_history");
}

// ─── Workspace over SQLite ───────────────────────────────────────────────────

#[tokio::test]
async fn workspace_state_survives_reopen() {
  let s = Arc::new(store().await);

  let mut ws = Workspace::open(s.clone(), env(), WorkspaceSettings::default())
    .await
    .unwrap()
    .into_result()
    .unwrap();
  let ada = ws
    .register_driver(NewDriver::new("Ada", "DL-1", date("2024-01-15")))
    .await
    .into_result()
    .unwrap();
  let van = ws
    .register_vehicle(
      NewVehicle::new("KJA-101", "Toyota", "Hiace", 2019).with_license_expiry(date("2025-06-14")),
    )
    .await
    .into_result()
    .unwrap();
  ws.assign(van.id, ada.id).await.unwrap().into_result().unwrap();
  ws.record_log(NewLogEntry::new(
    ada.id,
    van.id,
    date("2025-06-09"),
    LogDetails::Remittance {
      amount:  150.0,
      status:  PaymentStatus::Paid,
      week_of: date("2025-06-09"),
    },
  ))
  .await
  .into_result()
  .unwrap();

  let reopened = Workspace::open(s.clone(), env(), WorkspaceSettings::default())
    .await
    .unwrap()
    .into_result()
    .unwrap();
  assert_eq!(reopened.repository().drivers(), ws.repository().drivers());
  assert_eq!(reopened.repository().vehicles(), ws.repository().vehicles());
  assert_eq!(reopened.repository().assignments(), ws.repository().assignments());
  assert_eq!(reopened.repository().logs(), ws.repository().logs());
  assert_eq!(reopened.notifications().items(), ws.notifications().items());
  assert_eq!(reopened.activity().all(), ws.activity().all());
  assert_eq!(reopened.notifications().items().len(), 1);
}

#[tokio::test]
async fn malformed_row_loads_empty() {
  let s = Arc::new(store().await);
  s.save(Collection::Vehicles, "not json at all".into())
    .await
    .unwrap();
  s.save(Collection::Drivers, "[]".into()).await.unwrap();

  let ws = Workspace::open(s, env(), WorkspaceSettings::default())
    .await
    .unwrap()
    .into_result()
    .unwrap();
  assert!(ws.repository().vehicles().is_empty());
}

#[tokio::test]
async fn stored_bodies_are_json_arrays() {
  let s = Arc::new(store().await);
  let mut ws = Workspace::open(s.clone(), env(), WorkspaceSettings::default())
    .await
    .unwrap()
    .into_result()
    .unwrap();
  ws.register_driver(NewDriver::new("Ada", "DL-1", date("2024-01-15")))
    .await
    .into_result()
    .unwrap();

  let body = s.load(Collection::Drivers).await.unwrap().unwrap();
  let value: serde_json::Value = serde_json::from_str(&body).unwrap();
  assert_eq!(value[0]["name"], "Ada");
  assert_eq!(value[0]["dateJoined"], "2024-01-15");

  let history = s.load(Collection::ActivityHistory).await.unwrap().unwrap();
  let value: serde_json::Value = serde_json::from_str(&history).unwrap();
  assert_eq!(value[0]["message"], "Driver Ada added");
  assert_eq!(value[0]["type"], "driver");
}
