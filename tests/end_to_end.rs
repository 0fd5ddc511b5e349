use std::time::Duration;

use chrono::{Local, Timelike, Utc};
use roosty_chrono::{
    alarm::{Alarm, DailyTime, Target},
    board::AlarmBoard,
    store::{JsonFileStore, MemoryStore},
    webhook::Dispatcher,
};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn daily_alarm_posts_its_webhook_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alarm"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let target = Local::now() + chrono::Duration::seconds(2);
    let alarm = Alarm::new(
        Target::Daily(
            DailyTime::from_hms(target.hour(), target.minute(), target.second()).unwrap(),
        ),
        Some(format!("{}/alarm", server.uri())),
        Some("stretch".to_string()),
    );
    let id = alarm.id;
    let mut board = AlarmBoard::load(MemoryStore::new());
    board.add(alarm);
    let dispatcher = Dispatcher::spawn(Duration::from_secs(5));

    // sample at about display rate for a bit longer than the two seconds
    let deadline = tokio::time::Instant::now() + Duration::from_millis(3500);
    let mut fired = Vec::new();
    while tokio::time::Instant::now() < deadline {
        let now = Local::now();
        for alarm in board.tick(&now) {
            assert!(dispatcher.dispatch(&alarm, &now));
            fired.push(alarm.id);
        }
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
    assert_eq!(fired, [id]);
    assert!(board.alarms()[0].is_triggered());

    for offset in [1, 60, 86_400] {
        let later = Local::now() + chrono::Duration::seconds(offset);
        assert!(board.tick(&later).is_empty());
    }
    assert!(board.alarms()[0].is_triggered());
    let saved: Vec<Alarm> = serde_json::from_str(&board.store().blob().unwrap()).unwrap();
    assert!(saved[0].is_triggered());

    // waits for the queued request to go out
    tokio::task::spawn_blocking(move || dispatcher.shutdown())
        .await
        .unwrap();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["event"], "clock_alarm");
    assert_eq!(body["alarmId"], id.to_string());
    assert_eq!(body["label"], "stretch");
    assert!(body["time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_webhook_is_not_retried_and_alarm_stays_triggered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut board = AlarmBoard::load(MemoryStore::new());
    board.add(Alarm::new(
        Target::Absolute(Utc::now()),
        Some(format!("{}/broken", server.uri())),
        None,
    ));
    let dispatcher = Dispatcher::spawn(Duration::from_secs(5));

    for _ in 0..10 {
        let now = Utc::now();
        for alarm in board.tick(&now) {
            dispatcher.dispatch(&alarm, &now);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::task::spawn_blocking(move || dispatcher.shutdown())
        .await
        .unwrap();

    assert!(board.alarms()[0].is_triggered());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[test]
fn deleted_alarm_is_gone_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let alarms_path = dir.path().join("alarms.json");
    let now = Utc::now();

    let mut board = AlarmBoard::load(JsonFileStore::new(alarms_path.clone()));
    let soon = Alarm::new(
        Target::Absolute(now + chrono::Duration::minutes(10)),
        None,
        Some("soon".to_string()),
    );
    let later = Alarm::new(
        Target::Absolute(now + chrono::Duration::hours(3)),
        None,
        Some("later".to_string()),
    );
    let (soon_id, later_id) = (soon.id, later.id);
    board.add(soon);
    board.add(later);
    assert_eq!(board.next(&now).unwrap().alarm.id, soon_id);
    board.remove(soon_id).unwrap();
    drop(board);

    let board = AlarmBoard::load(JsonFileStore::new(alarms_path));
    assert_eq!(board.alarms().len(), 1);
    assert_eq!(board.alarms()[0].id, later_id);
    assert_eq!(board.next(&now).unwrap().alarm.id, later_id);
}
