//! Resume parser client: the only place that talks to the external parsing provider.
//!
//! The provider returns a structured resume; the portal keeps just two opaque
//! strings from it (skills and experience) which the matching engine scores.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.affinda.com/v1/resumes";
const MAX_RETRIES: u32 = 3;
const WORK_EXPERIENCE_SECTION: &str = "WorkExperience";

#[derive(Debug, Error)]
pub enum ResumeParserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Parser unavailable after {retries} retries")]
    Exhausted { retries: u32 },
}

/// Profile text extracted from a resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResume {
    /// Skill names joined with ", ".
    pub skills: String,
    /// Work-experience section text, or the stated profession when there is none.
    pub experience: String,
    /// Seconds spent waiting on the provider.
    pub parse_time: f64,
}

/// Parser seam. `AppState` carries one behind an `Arc<dyn ResumeParser>`.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(
        &self,
        filename: &str,
        content_type: &str,
        file: Bytes,
    ) -> Result<ParsedResume, ResumeParserError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Provider response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    data: Option<ProviderResume>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderResume {
    #[serde(default)]
    skills: Vec<ProviderSkill>,
    #[serde(default)]
    sections: Vec<ProviderSection>,
    #[serde(default)]
    profession: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSkill {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSection {
    #[serde(rename = "sectionType")]
    section_type: Option<String>,
    text: Option<String>,
}

impl ProviderResume {
    fn into_profile(self, parse_time: f64) -> ParsedResume {
        let skills = self
            .skills
            .into_iter()
            .filter_map(|s| s.name)
            .collect::<Vec<_>>()
            .join(", ");

        let experience = self
            .sections
            .into_iter()
            .filter(|s| s.section_type.as_deref() == Some(WORK_EXPERIENCE_SECTION))
            .filter_map(|s| s.text)
            .collect::<Vec<_>>()
            .join(" ");

        let experience = if experience.is_empty() {
            self.profession.unwrap_or_default()
        } else {
            experience
        };

        ParsedResume {
            skills,
            experience,
            parse_time,
        }
    }
}

/// Maps a raw provider body to profile text. A missing `data` object yields empty fields.
fn parse_provider_body(body: &str, parse_time: f64) -> Result<ParsedResume, ResumeParserError> {
    let response: ProviderResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .unwrap_or_default()
        .into_profile(parse_time))
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AffindaClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl AffindaClient {
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            endpoint,
        }
    }

    fn form(
        filename: &str,
        content_type: &str,
        file: Bytes,
    ) -> Result<multipart::Form, ResumeParserError> {
        let part = multipart::Part::stream(file)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        Ok(multipart::Form::new().part("file", part))
    }
}

#[async_trait]
impl ResumeParser for AffindaClient {
    /// Uploads the file and maps the response. Retries on 429 and 5xx with
    /// exponential backoff; other non-success statuses fail immediately.
    async fn parse(
        &self,
        filename: &str,
        content_type: &str,
        file: Bytes,
    ) -> Result<ParsedResume, ResumeParserError> {
        let started = Instant::now();
        let mut last_error: Option<ResumeParserError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Resume parse attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .multipart(Self::form(filename, content_type, file.clone())?)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ResumeParserError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 || status.is_server_error() {
                warn!("Resume parser returned {}: {}", status, body);
                last_error = Some(ResumeParserError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                return Err(ResumeParserError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let parse_time = started.elapsed().as_secs_f64();
            debug!("Resume parsed in {parse_time:.3}s ({filename})");
            return parse_provider_body(&body, parse_time);
        }

        Err(last_error.unwrap_or(ResumeParserError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_joined_with_comma_space() {
        let body = r#"{"data": {"skills": [{"name": "Python"}, {"name": "SQL"}, {"id": 3}]}}"#;
        let parsed = parse_provider_body(body, 0.5).unwrap();
        assert_eq!(parsed.skills, "Python, SQL");
        assert_eq!(parsed.parse_time, 0.5);
    }

    #[test]
    fn test_experience_from_work_experience_sections() {
        let body = r#"{"data": {
            "sections": [
                {"sectionType": "WorkExperience", "text": "Backend at Acme"},
                {"sectionType": "Education", "text": "BSc CS"},
                {"sectionType": "WorkExperience", "text": "SRE at Initech"}
            ],
            "profession": "Engineer"
        }}"#;
        let parsed = parse_provider_body(body, 0.0).unwrap();
        assert_eq!(parsed.experience, "Backend at Acme SRE at Initech");
    }

    #[test]
    fn test_experience_falls_back_to_profession() {
        let body = r#"{"data": {"sections": [], "profession": "Data Analyst"}}"#;
        let parsed = parse_provider_body(body, 0.0).unwrap();
        assert_eq!(parsed.experience, "Data Analyst");
    }

    #[test]
    fn test_missing_data_gives_empty_profile() {
        let parsed = parse_provider_body("{}", 0.0).unwrap();
        assert_eq!(parsed.skills, "");
        assert_eq!(parsed.experience, "");
    }

    #[test]
    fn test_null_profession_is_empty() {
        let body = r#"{"data": {"profession": null}}"#;
        let parsed = parse_provider_body(body, 0.0).unwrap();
        assert_eq!(parsed.experience, "");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_provider_body("not json", 0.0).unwrap_err();
        assert!(matches!(err, ResumeParserError::Parse(_)));
    }
}
