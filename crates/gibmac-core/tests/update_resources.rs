#![allow(clippy::unwrap_used)]
// Resource refresh against a mock upstream.

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gibmac_api::{ResourceClient, TransportConfig};
use gibmac_core::resources::update_resources;
use gibmac_core::{CoreError, ResourceKind, ResourcePaths, ResourceSources, UpdateEvent};

async fn mount(server: &MockServer, file: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/macrecovery/{file}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn sources(server: &MockServer) -> ResourceSources {
    let base = Url::parse(&format!("{}/macrecovery/", server.uri())).unwrap();
    ResourceSources::from_base(&base).unwrap()
}

#[tokio::test]
async fn update_fetches_all_resources_then_loads() {
    let server = MockServer::start().await;
    mount(&server, "boards.json", 200, r#"{"Mac-1":"10.15"}"#).await;
    mount(&server, "macrecovery.py", 200, "print('hi')\n").await;
    mount(
        &server,
        "recovery_urls.txt",
        200,
        "10.15:\n./macrecovery.py -b Mac-1 -m 00000000000000000 download\n",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let paths = ResourcePaths::new(dir.path().join("data"));
    let client = ResourceClient::new(&TransportConfig::default()).unwrap();

    let mut finished = Vec::new();
    let fetched = update_resources(&client, &sources(&server), &paths, |event| {
        if let UpdateEvent::Finished { kind, .. } = event {
            finished.push(kind);
        }
    })
    .await
    .unwrap();

    assert_eq!(fetched.len(), 3);
    assert_eq!(
        finished,
        [
            ResourceKind::Boards,
            ResourceKind::Macrecovery,
            ResourceKind::RecoveryUrls
        ]
    );
    assert!(paths.all_present());

    let data = paths.load();
    assert_eq!(data.board_map.first_board_for("10.15"), Some("Mac-1"));
    assert_eq!(data.catalog.record_count(), 1);
}

#[tokio::test]
async fn update_stops_at_first_failure() {
    let server = MockServer::start().await;
    mount(&server, "boards.json", 200, "{}").await;
    mount(&server, "macrecovery.py", 404, "").await;

    let dir = tempfile::tempdir().unwrap();
    let paths = ResourcePaths::new(dir.path());
    let client = ResourceClient::new(&TransportConfig::default()).unwrap();

    let err = update_resources(&client, &sources(&server), &paths, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::ResourceUnavailable { status: 404, .. }
    ));
    assert!(paths.is_present(ResourceKind::Boards));
    assert!(!paths.is_present(ResourceKind::RecoveryUrls));
}
