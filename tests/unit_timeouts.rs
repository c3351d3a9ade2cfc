// Timeout bounds on the HTTP collaborators, exercised against a local
// socket that accepts connections and never answers. A hung external
// service must surface as a soft failure, not stall the sequential run.

use std::net::TcpListener;
use std::time::Duration;

use magpie::enrich::models::Fetched;
use magpie::enrich::resolve::{HttpRedirectResolver, UrlResolver};
use magpie::enrich::transcript::{HttpTranscriptFetcher, TranscriptFetcher};
use magpie::routing::destinations::{Destination, WebhookDestination};
use serde_json::json;

/// Bind a listener that accepts connections but never writes a byte.
fn stalled_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            match stream {
                Ok(s) => held.push(s),
                Err(_) => break,
            }
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn transcript_fetch_is_timeout_bounded() {
    let fetcher = HttpTranscriptFetcher::new(&stalled_server(), 200).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch("vid42"))
        .await
        .expect("fetch must complete within its timeout");
    assert!(matches!(result, Fetched::Failed(_)));
}

#[tokio::test]
async fn redirect_resolution_falls_back_to_the_original_url() {
    let resolver = HttpRedirectResolver::new(200).unwrap();
    let url = format!("{}/short", stalled_server());

    let resolved = tokio::time::timeout(Duration::from_secs(5), resolver.resolve(&url))
        .await
        .expect("resolution must complete within its timeout");
    assert_eq!(resolved, url);
}

#[tokio::test]
async fn webhook_send_is_timeout_bounded() {
    let dest = WebhookDestination::new("tasks", Some(stalled_server()), 200);

    let result = tokio::time::timeout(Duration::from_secs(5), dest.send(&json!({"title": "x"})))
        .await
        .expect("send must complete within its timeout");
    assert!(result.is_err());
}
