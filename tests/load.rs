use solr_dump::{Error, FailurePolicy, LoadConfig, Loader, SolrClient};
use std::path::Path;
use wiremock::matchers::{any, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_dump(dir: &Path) {
    // written out of order on purpose
    std::fs::write(dir.join("genome.00002.json"), r#"[{"id":"5"}]"#).unwrap();
    std::fs::write(dir.join("genome.00000.json"), r#"[{"id":"1"},{"id":"2"}]"#).unwrap();
    std::fs::write(dir.join("genome.00001.json"), r#"[{"id":"3"},{"id":"4"}]"#).unwrap();
}

fn update_mock(status: u16) -> Mock {
    Mock::given(method("POST"))
        .and(path("/solr/genome/update"))
        .and(query_param("commit", "false"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(status))
}

#[tokio::test]
async fn posts_files_in_serial_order() {
    let server = MockServer::start().await;
    update_mock(200).expect(3).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path());

    let loader = Loader::new(
        SolrClient::new(&server.uri()),
        LoadConfig::new("genome", dir.path()),
    );
    let summary = loader.run().await.unwrap();

    assert_eq!(summary.posted, 3);
    assert_eq!(summary.failed, 0);

    let bodies: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| String::from_utf8(r.body.clone()).unwrap())
        .collect();
    assert_eq!(
        bodies,
        vec![
            r#"[{"id":"1"},{"id":"2"}]"#,
            r#"[{"id":"3"},{"id":"4"}]"#,
            r#"[{"id":"5"}]"#,
        ]
    );
}

#[tokio::test]
async fn failed_file_does_not_stop_the_load() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains(r#""id":"3""#))
        .respond_with(ResponseTemplate::new(400).set_body_string("ERROR: [doc=3] unknown field"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    update_mock(200).expect(2).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path());

    let summary = Loader::new(
        SolrClient::new(&server.uri()),
        LoadConfig::new("genome", dir.path()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(summary.posted, 2);
    assert_eq!(summary.failed, 1);
    server.verify().await;
}

#[tokio::test]
async fn fail_fast_stops_at_first_failure() {
    let server = MockServer::start().await;
    update_mock(503).expect(1).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path());

    let config = LoadConfig {
        on_failure: FailurePolicy::Abort,
        ..LoadConfig::new("genome", dir.path())
    };
    let err = Loader::new(SolrClient::new(&server.uri()), config)
        .run()
        .await
        .unwrap_err();

    match err {
        Error::LoadAborted { file, cause } => {
            assert!(file.ends_with("genome.00000.json"));
            assert!(matches!(*cause, Error::UpdateRejected { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn pattern_limits_posted_files() {
    let server = MockServer::start().await;
    update_mock(200).expect(3).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path());
    std::fs::write(dir.path().join("notes.txt"), "not a dump").unwrap();

    let config = LoadConfig {
        pattern: "*.json".to_string(),
        ..LoadConfig::new("genome", dir.path())
    };
    let summary = Loader::new(SolrClient::new(&server.uri()), config)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.posted, 3);
    server.verify().await;
}

#[tokio::test]
async fn missing_dir_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = Loader::new(
        SolrClient::new(&server.uri()),
        LoadConfig::new("genome", dir.path().join("missing")),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(err, Error::DirectoryNotFound { .. }));
    server.verify().await;
}

#[tokio::test]
async fn huge_serial_in_dir_still_loads() {
    let server = MockServer::start().await;
    update_mock(200).expect(2).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("genome.00000.json"), r#"[{"id":"1"}]"#).unwrap();
    std::fs::write(dir.path().join("export.2026101900.json"), r#"[{"id":"2"}]"#).unwrap();

    let summary = Loader::new(
        SolrClient::new(&server.uri()),
        LoadConfig::new("genome", dir.path()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(summary.posted, 2);
    assert_eq!(summary.failed, 0);
    server.verify().await;
}

#[tokio::test]
async fn empty_dir_completes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let summary = Loader::new(
        SolrClient::new(&server.uri()),
        LoadConfig::new("genome", dir.path()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(summary.posted, 0);
    assert_eq!(summary.failed, 0);
}
