//! Generation client fallback behavior against an unreachable upstream.

use futures_util::StreamExt;
use outflo::{
    llm::{fallback_message, GenConfig, Generate, GroqClient},
    messages::Profile,
};

// Port 9 (discard) refuses connections immediately.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/v1/chat/completions";

fn profile() -> Profile {
    Profile {
        name: "Ada Lovelace".to_owned(),
        job_title: "Engineer".to_owned(),
        company: "Acme".to_owned(),
        location: Some("London".to_owned()),
        summary: None,
    }
}

fn client() -> GroqClient {
    GroqClient::custom("test-key", DEAD_ENDPOINT, GenConfig::default()).unwrap()
}

#[tokio::test]
async fn batch_falls_back_when_upstream_unreachable() {
    let message = client().generate(&profile()).await;
    assert_eq!(message, fallback_message(&profile()));
    assert!(!message.is_empty());
}

#[tokio::test]
async fn stream_yields_single_fallback_fragment_when_upstream_unreachable() {
    let fragments: Vec<String> = client().generate_stream(profile()).collect().await;
    assert_eq!(fragments, vec![fallback_message(&profile())]);
}

#[tokio::test]
async fn stream_concatenation_matches_batch_on_failure() {
    let streamed: String = client()
        .generate_stream(profile())
        .collect::<Vec<String>>()
        .await
        .concat();
    let batch = client().generate(&profile()).await;
    assert_eq!(streamed, batch);
}
