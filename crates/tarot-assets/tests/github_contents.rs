use serde_json::json;
use tarot_assets::{
    AssetError, AssetSync, ContentsClient, EntryKind, GithubContentsClient, RepoConfig, SyncMode,
    SyncOptions,
};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GithubContentsClient {
    GithubContentsClient::new(RepoConfig {
        api_base: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

fn listing(server: &MockServer, folder: &str, names: &[&str]) -> serde_json::Value {
    let mut items: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "path": format!("result/{folder}/{name}"),
                "type": "file",
                "download_url": format!("{}/raw/{folder}/{name}", server.uri()),
            })
        })
        .collect();
    items.push(json!({
        "name": "nested",
        "path": format!("result/{folder}/nested"),
        "type": "dir",
        "download_url": null,
    }));
    serde_json::Value::Array(items)
}

#[tokio::test]
async fn test_list_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/ricarvy/tarot_source/contents/result/Major"))
        .and(query_param("ref", "main"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            &server,
            "Major",
            &["The_Fool_New_beginnings.png", "notes.txt"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let entries = client_for(&server).list("result/Major").await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name, "The_Fool_New_beginnings.png");
    assert!(entries[0].is_image());
    assert!(!entries[1].is_image());
    assert_eq!(entries[2].kind, EntryKind::Dir);
}

#[tokio::test]
async fn test_file_path_listing_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/ricarvy/tarot_source/contents/result/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "README.md",
            "type": "file",
        })))
        .mount(&server)
        .await;

    let entries = client_for(&server).list("result/README.md").await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_missing_directory_is_listing_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/ricarvy/tarot_source/contents/result/Nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let err = client_for(&server).list("result/Nope").await.unwrap_err();
    match err {
        AssetError::Listing { path, message } => {
            assert_eq!(path, "result/Nope");
            assert!(message.contains("Not Found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_download_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/Major/Death_Change.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .download(&format!("{}/raw/Major/Death_Change.png", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_download_sync_skips_existing_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/ricarvy/tarot_source/contents/result/Major"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            &server,
            "Major",
            &["The_Fool_New_beginnings.png", "Death_Change.png"],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/Major/The_Fool_New_beginnings.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fool".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/Major/Death_Change.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"death".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let target = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(target.path().join("Major")).unwrap();
    std::fs::write(target.path().join("Major/Death_Change.png"), b"already here").unwrap();

    let sync = AssetSync::new(
        client_for(&server),
        SyncOptions {
            root: "result".into(),
            folders: vec!["Major".into()],
        },
    );
    let report = sync
        .run(&SyncMode::Download {
            target_dir: target.path().to_path_buf(),
            pause: std::time::Duration::ZERO,
        })
        .await
        .unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(
        std::fs::read(target.path().join("Major/The_Fool_New_beginnings.png")).unwrap(),
        b"fool"
    );
    assert_eq!(
        std::fs::read(target.path().join("Major/Death_Change.png")).unwrap(),
        b"already here"
    );
}

#[tokio::test]
async fn test_manifest_sync_continues_past_failed_folder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/ricarvy/tarot_source/contents/result/Major"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/ricarvy/tarot_source/contents/result/Minor"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(&server, "Minor", &["Ace_of_Cups_Love.png"])),
        )
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("nested/tarot-image-urls.json");

    let report = AssetSync::new(client_for(&server), SyncOptions::default())
        .run(&SyncMode::Manifest { output: output.clone() })
        .await
        .unwrap();

    assert_eq!(report.failed_listings, vec!["Major".to_string()]);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({ "Ace_of_Cups_Love": format!("{}/raw/Minor/Ace_of_Cups_Love.png", server.uri()) })
    );
}
