mod batch;
mod store;
mod stream;

pub use batch::create_message;
pub use store::{save, GeneratedMessage};
pub use stream::create_message_stream;

use axum::{routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub(crate) const REQUIRED_FIELDS_ERROR: &str =
    "Name, job title, and company are required fields";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(stream::create_message_stream))
        .route("/batch", post(batch::create_message))
}

/// Lead profile submitted by the client. Request-scoped, only persisted
/// as part of a generated message record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    pub summary: Option<String>,
}

impl Profile {
    /// All required fields present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.job_title.is_empty() && !self.company.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: "Ada Lovelace".to_owned(),
            job_title: "Engineer".to_owned(),
            company: "Acme".to_owned(),
            location: None,
            summary: None,
        }
    }

    #[test]
    fn complete_profile_passes_validation() {
        assert!(profile().is_complete());
    }

    #[test]
    fn empty_required_field_fails_validation() {
        let mut p = profile();
        p.company = String::new();
        assert!(!p.is_complete());
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let p: Profile = serde_json::from_str(r#"{"name":"Ada Lovelace"}"#).unwrap();
        assert!(!p.is_complete());
    }
}
