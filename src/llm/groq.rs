use async_stream::{stream, try_stream};
use async_trait::async_trait;
use futures_core::Stream;
use futures_util::{pin_mut, stream::BoxStream, StreamExt};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Method,
};
use serde::{Deserialize, Serialize};

use crate::messages::Profile;

use super::{fallback_message, GenConfig, Generate};

/// Groq chat completions endpoint (OpenAI-compatible).
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

const SYSTEM_PROMPT: &str =
    "You are a professional sales assistant that creates personalized LinkedIn outreach messages.";

/// Client for the Groq chat completions API.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
    config: GenConfig,
}

impl GroqClient {
    pub fn new(key: &str, config: GenConfig) -> anyhow::Result<Self> {
        Self::custom(key, GROQ_ENDPOINT, config)
    }

    /// Target a custom OpenAI-compatible endpoint.
    pub fn custom(key: &str, endpoint: &str, config: GenConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client: Client::new(),
            headers,
            endpoint: endpoint.to_owned(),
            config,
        })
    }

    fn request_body(&self, profile: &Profile, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt(profile),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream,
        }
    }

    /// One non-streaming completion call; the full trimmed message text.
    async fn complete(&self, profile: &Profile) -> anyhow::Result<String> {
        let body = self.request_body(profile, false);
        let text = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: ChatResponse = serde_json::from_str(&text)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow::anyhow!("no content returned from API"))
    }

    /// Raw fragment stream off the wire; errors surface as stream items.
    fn fragments(
        &self,
        profile: &Profile,
    ) -> impl Stream<Item = anyhow::Result<String>> + Send + 'static {
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&self.request_body(profile, true));

        try_stream! {
            let response = request.send().await?.error_for_status()?;
            let mut stream = response.bytes_stream();
            // An event can straddle two reads; incomplete tails stay
            // buffered until the closing blank line arrives.
            let mut buf = String::new();
            while let Some(next) = stream.next().await {
                let bytes = next?;
                buf.push_str(&String::from_utf8_lossy(&bytes));
                tracing::trace!("buffered: {}", buf);
                for fragment in drain_fragments(&mut buf) {
                    yield fragment;
                }
            }
            // stream ended without a trailing blank line
            for fragment in delta_fragments(&buf) {
                yield fragment;
            }
        }
    }
}

#[async_trait]
impl Generate for GroqClient {
    async fn generate(&self, profile: &Profile) -> String {
        match self.complete(profile).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("generation failed, using fallback: {e}");
                fallback_message(profile)
            }
        }
    }

    fn generate_stream(&self, profile: Profile) -> BoxStream<'static, String> {
        let inner = self.fragments(&profile);
        stream! {
            pin_mut!(inner);
            let mut yielded = false;
            loop {
                match inner.next().await {
                    Some(Ok(fragment)) => {
                        yielded = true;
                        yield fragment;
                    }
                    // The fallback is terminal: nothing follows it.
                    Some(Err(e)) => {
                        tracing::error!("stream generation failed, using fallback: {e}");
                        yield fallback_message(&profile);
                        return;
                    }
                    None => break,
                }
            }
            if !yielded {
                yield fallback_message(&profile);
            }
        }
        .boxed()
    }
}

fn prompt(profile: &Profile) -> String {
    format!(
        "Generate a personalized LinkedIn outreach message for:\n\
         - Name: {}\n\
         - Job title: {}\n\
         - Company: {}\n\
         - Location: {}\n\
         - Summary: {}\n\n\
         The message should be friendly and professional, mention their name and role \
         at their company, briefly explain how Outflo can help automate their outreach \
         to increase meetings and sales, and end with a call to action to connect. \
         Keep it concise (max 3-4 sentences) and natural, not salesy. \
         Return ONLY the message text without any additional formatting or explanations.",
        profile.name,
        profile.job_title,
        profile.company,
        profile.location.as_deref().unwrap_or("Not specified"),
        profile.summary.as_deref().unwrap_or("Not available"),
    )
}

/// Parse every complete event out of the buffer, leaving any
/// incomplete tail in place for the next transport read.
fn drain_fragments(buf: &mut String) -> Vec<String> {
    match buf.rfind("\n\n") {
        Some(end) => {
            let rest = buf.split_off(end + 2);
            let complete = std::mem::replace(buf, rest);
            delta_fragments(&complete)
        }
        None => Vec::new(),
    }
}

/// Pull the delta contents out of a run of complete SSE events.
///
/// Parses `data: ` prefixed segments, skips the `[DONE]` sentinel and
/// empty deltas (role-only or finish chunks).
fn delta_fragments(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    for data in text.split("data: ").skip(1).filter(|s| !s.starts_with("[DONE]")) {
        let trimmed = data.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<StreamChunk>(trimmed) {
            Ok(chunk) => {
                if let Some(content) = chunk.content() {
                    fragments.push(content.to_owned());
                }
            }
            Err(e) => tracing::warn!("failed to parse chunk: {e}, data: {trimmed}"),
        }
    }
    fragments
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

impl StreamChunk {
    fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_fragments_parses_data_lines() {
        let raw = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Ada\"}}]}\n\n",
        );
        assert_eq!(delta_fragments(raw), vec!["Hi ", "Ada"]);
    }

    #[test]
    fn delta_fragments_skips_done_and_empty_deltas() {
        let raw = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        assert_eq!(delta_fragments(raw), vec!["!"]);
    }

    #[test]
    fn fragment_split_across_reads_is_reassembled() {
        let raw = "data: {\"choices\":[{\"delta\":{\"content\":\"Hello world\"}}]}\n\n";
        let (first_read, second_read) = raw.split_at(30);

        let mut buf = String::new();
        buf.push_str(first_read);
        assert!(drain_fragments(&mut buf).is_empty());

        buf.push_str(second_read);
        assert_eq!(drain_fragments(&mut buf), vec!["Hello world"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn incomplete_tail_stays_buffered_behind_complete_events() {
        let mut buf = String::from(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi \"}}]}\n\ndata: {\"choi",
        );
        assert_eq!(drain_fragments(&mut buf), vec!["Hi "]);
        assert_eq!(buf, "data: {\"choi");

        buf.push_str("ces\":[{\"delta\":{\"content\":\"Ada\"}}]}\n\n");
        assert_eq!(drain_fragments(&mut buf), vec!["Ada"]);
    }

    #[test]
    fn delta_fragments_ignores_garbage_segments() {
        let raw = "data: not json\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n";
        assert_eq!(delta_fragments(raw), vec!["ok"]);
    }

    #[test]
    fn prompt_substitutes_optional_fields() {
        let profile = Profile {
            name: "John Doe".to_owned(),
            job_title: "Software Engineer".to_owned(),
            company: "TechCorp".to_owned(),
            location: None,
            summary: None,
        };
        let text = prompt(&profile);
        assert!(text.contains("- Name: John Doe"));
        assert!(text.contains("- Location: Not specified"));
        assert!(text.contains("- Summary: Not available"));
    }
}
