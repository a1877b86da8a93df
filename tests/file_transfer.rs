use std::sync::Mutex;

use chrono::NaiveDate;
use kma_portal::{Portal, ProgressSink};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn portal_for(server: &MockServer) -> (Portal, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let portal = Portal::with_data_folder(&server.uri(), dir.path().to_path_buf())
        .await
        .expect("portal");
    (portal, dir)
}

#[tokio::test]
async fn file_listing_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                {
                    "name": "new.csv",
                    "path": "단기예보/new.csv",
                    "size": 2048,
                    "modified": "2024-03-02T10:00:00"
                },
                {
                    "name": "old.csv",
                    "path": "단기예보/old.csv",
                    "size": 0,
                    "modified": "2024-03-01T10:00:00"
                }
            ]
        })))
        .mount(&server)
        .await;

    let (portal, _dir) = portal_for(&server).await;
    let files = portal.files().await.expect("listing");
    assert_eq!(files.len(), 2);
    // Backend sorts newest first; the order is preserved as-is.
    assert!(files[0].modified > files[1].modified);
    assert_eq!(files[0].human_size(), "2.00 KB");
    assert_eq!(files[1].human_size(), "0 Bytes");
}

#[tokio::test]
async fn fetch_file_writes_body_preserving_hierarchy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/forecast/seoul/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("time,temp\n2024,1.5\n"))
        .mount(&server)
        .await;

    let (portal, dir) = portal_for(&server).await;
    let saved = portal
        .fetch_file()
        .path("forecast/seoul/data.csv")
        .dest_dir(dir.path().join("out"))
        .call()
        .await
        .expect("download ok");

    assert_eq!(saved, dir.path().join("out/forecast/seoul/data.csv"));
    let contents = tokio::fs::read_to_string(&saved).await.unwrap();
    assert_eq!(contents, "time,temp\n2024,1.5\n");
}

#[tokio::test]
async fn fetch_file_percent_encodes_segments() {
    let server = MockServer::start().await;
    // The request path must arrive with the space encoded but the
    // separator kept literal.
    Mock::given(method("GET"))
        .and(path("/api/download-file/forecast/my%20file.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let (portal, dir) = portal_for(&server).await;
    let saved = portal
        .fetch_file()
        .path("forecast/my file.csv")
        .dest_dir(dir.path().join("out"))
        .call()
        .await
        .expect("download ok");
    assert!(saved.ends_with("forecast/my file.csv"));
}

#[tokio::test]
async fn missing_file_aborts_without_writing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/gone.csv"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "File not found"
        })))
        .mount(&server)
        .await;

    let (portal, dir) = portal_for(&server).await;
    let err = portal
        .fetch_file()
        .path("gone.csv")
        .dest_dir(dir.path().join("out"))
        .call()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("File not found"));
    assert!(!dir.path().join("out/gone.csv").exists());
}

#[tokio::test]
async fn traversal_path_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let (portal, dir) = portal_for(&server).await;

    let err = portal
        .fetch_file()
        .path("../outside.csv")
        .dest_dir(dir.path().join("out"))
        .call()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unsafe path"));
    // The request was refused locally and nothing escaped the destination.
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!dir.path().join("outside.csv").exists());
}

#[derive(Default)]
struct StationLog {
    events: Mutex<Vec<(String, usize, usize, String)>>,
}

impl StationLog {
    fn take(&self) -> Vec<(String, usize, usize, String)> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for StationLog {
    fn station_started(&self, done: usize, total: usize, code: &str) {
        self.events
            .lock()
            .unwrap()
            .push(("start".to_string(), done, total, code.to_string()));
    }

    fn station_finished(&self, done: usize, total: usize, code: &str) {
        self.events
            .lock()
            .unwrap()
            .push(("finish".to_string(), done, total, code.to_string()));
    }
}

#[tokio::test]
async fn asos_batch_continues_past_failed_station() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/asos"))
        .and(query_param("stnIds", "108"))
        .and(query_param("start", "20240101"))
        .and(query_param("end", "20240131"))
        .respond_with(ResponseTemplate::new(200).set_body_string("time,temperature\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/asos"))
        .and(query_param("stnIds", "999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "해당 조건의 데이터가 없습니다."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/asos"))
        .and(query_param("stnIds", "112"))
        .respond_with(ResponseTemplate::new(200).set_body_string("time,temperature\n"))
        .mount(&server)
        .await;

    let (portal, dir) = portal_for(&server).await;
    let log = StationLog::default();
    let report = portal
        .download_asos()
        .service_key("test-key")
        .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        .stations(vec![
            "108".to_string(),
            "999".to_string(),
            "112".to_string(),
        ])
        .dest_dir(dir.path().join("asos"))
        .sink(&log)
        .call()
        .await
        .expect("batch runs to the end");

    assert!(!report.is_complete());
    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].station, "999");
    assert!(report.failures[0]
        .error
        .to_string()
        .contains("해당 조건의 데이터가 없습니다."));

    // Files are named after station and date range.
    assert!(dir
        .path()
        .join("asos/ASOS_108_20240101_20240131.csv")
        .exists());
    assert!(dir
        .path()
        .join("asos/ASOS_112_20240101_20240131.csv")
        .exists());
    assert!(!dir
        .path()
        .join("asos/ASOS_999_20240101_20240131.csv")
        .exists());

    // Every station produced a start and a finish event, in order.
    let events = log.take();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], ("start".to_string(), 0, 3, "108".to_string()));
    assert_eq!(events[1], ("finish".to_string(), 1, 3, "108".to_string()));
    assert_eq!(events[2], ("start".to_string(), 1, 3, "999".to_string()));
    assert_eq!(events[5], ("finish".to_string(), 3, 3, "112".to_string()));
}
