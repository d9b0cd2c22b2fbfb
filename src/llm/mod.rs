mod groq;

pub use groq::GroqClient;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::messages::Profile;

/// Upstream text generation, injectable so the relay can be driven by a
/// fake in tests.
#[async_trait]
pub trait Generate: Send + Sync {
    /// Generate the complete outreach message in one call.
    ///
    /// Never fails: any upstream error is absorbed into the fallback
    /// message built from the profile fields alone.
    async fn generate(&self, profile: &Profile) -> String;

    /// Generate the message as a finite stream of text fragments.
    ///
    /// Concatenating every fragment in order gives the full message. If
    /// the upstream errors out, the stream yields the fallback message
    /// as its one final fragment and ends; errors never escape.
    fn generate_stream(&self, profile: Profile) -> BoxStream<'static, String>;
}

/// Chat completion parameters, fixed per deployment.
#[derive(Debug, Clone)]
pub struct GenConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_owned(),
            temperature: 0.7,
            max_tokens: 200,
        }
    }
}

/// Canned outreach message used whenever the upstream call fails or
/// returns nothing usable. Built only from local fields, cannot fail.
pub fn fallback_message(profile: &Profile) -> String {
    format!(
        "Hi {}, I noticed you're a {} at {}. Outflo can help automate your outreach to increase meetings and sales. Let's connect!",
        profile.name, profile.job_title, profile.company,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_uses_required_profile_fields() {
        let profile = Profile {
            name: "Ada Lovelace".to_owned(),
            job_title: "Engineer".to_owned(),
            company: "Acme".to_owned(),
            location: None,
            summary: None,
        };

        let message = fallback_message(&profile);
        assert!(message.starts_with("Hi Ada Lovelace, I noticed you're a Engineer at Acme."));
        assert!(message.ends_with("Let's connect!"));
    }
}
