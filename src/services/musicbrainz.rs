//! MusicBrainz recording search client
//!
//! Queries the recording search endpoint by (artist, title) and selects
//! the single best candidate: the first service-ordered result that has
//! a non-empty title, at least one artist credit, and a confidence score
//! at or above the acceptance threshold. The service already ranks by
//! relevance, so surviving candidates are not re-sorted.

use crate::services::rate_limiter::RateLimiter;
use crate::services::resolver::CatalogSearch;
use crate::types::CatalogMatch;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const USER_AGENT: &str = "TrackForge/0.1.0 (https://github.com/trackforge/trackforge)";
const SEARCH_LIMIT: u32 = 5;
const ACCEPT_THRESHOLD: u8 = 90;

/// MusicBrainz client errors
#[derive(Debug, Error)]
pub enum MBError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Recording search response
#[derive(Debug, Deserialize)]
struct MBSearchResponse {
    #[serde(default)]
    recordings: Vec<MBRecordingMatch>,
}

/// One candidate recording from a search response
#[derive(Debug, Deserialize)]
struct MBRecordingMatch {
    /// Relevance score (0-100) assigned by the search service
    #[serde(default)]
    score: u8,
    #[serde(default)]
    title: String,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<MBArtistCredit>,
    #[serde(default)]
    releases: Vec<MBRelease>,
}

#[derive(Debug, Deserialize)]
struct MBArtistCredit {
    /// Display name (may differ from artist.name for collaborations)
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MBRelease {
    #[serde(default)]
    title: String,
}

/// MusicBrainz API client with request-rate spacing
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl MusicBrainzClient {
    pub fn new(request_delay_ms: u64) -> Result<Self, MBError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(request_delay_ms),
        })
    }

    async fn search_recordings(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<Vec<MBRecordingMatch>, MBError> {
        let url = format!("{}/recording", MUSICBRAINZ_BASE_URL);
        let query = build_query(artist, title);
        let limit = SEARCH_LIMIT.to_string();

        tracing::debug!(artist = %artist, title = %title, "Querying MusicBrainz recording search");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query.as_str()),
                ("fmt", "json"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MBError::ApiError(status.as_u16(), error_text));
        }

        let parsed: MBSearchResponse = response
            .json()
            .await
            .map_err(|e| MBError::ParseError(e.to_string()))?;

        Ok(parsed.recordings)
    }
}

impl CatalogSearch for MusicBrainzClient {
    type Error = MBError;

    /// Search for the best matching recording by artist and title.
    ///
    /// Returns `Ok(None)` when either query term is blank (no network
    /// call is made) or when no candidate survives selection.
    async fn search(&self, artist: &str, title: &str) -> Result<Option<CatalogMatch>, MBError> {
        let artist = artist.trim();
        let title = title.trim();
        if artist.is_empty() || title.is_empty() {
            return Ok(None);
        }

        self.rate_limiter.await_turn().await;

        let recordings = self.search_recordings(artist, title).await?;
        let selected = select_candidate(recordings);

        if let Some(m) = &selected {
            tracing::info!(
                title = %m.title.as_deref().unwrap_or(""),
                artist = %m.artist.as_deref().unwrap_or(""),
                score = m.score,
                "Accepted catalog match"
            );
        } else {
            tracing::debug!(artist = %artist, title = %title, "No catalog match above threshold");
        }

        Ok(selected)
    }
}

/// Build a Lucene query over the artist and recording fields.
fn build_query(artist: &str, title: &str) -> String {
    format!(
        "artist:\"{}\" AND recording:\"{}\"",
        escape_lucene(artist),
        escape_lucene(title)
    )
}

fn escape_lucene(term: &str) -> String {
    term.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Select the first service-ordered candidate that survives the
/// discard rules: non-empty title, at least one artist credit, and
/// score at or above the acceptance threshold.
fn select_candidate(recordings: Vec<MBRecordingMatch>) -> Option<CatalogMatch> {
    recordings.into_iter().find_map(|r| {
        let title = r.title.trim();
        if title.is_empty() {
            return None;
        }

        let artist = r
            .artist_credit
            .iter()
            .map(|ac| ac.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if artist.trim().is_empty() {
            return None;
        }

        if r.score < ACCEPT_THRESHOLD {
            return None;
        }

        let album = r
            .releases
            .first()
            .map(|rel| rel.title.trim().to_string())
            .filter(|t| !t.is_empty());

        Some(CatalogMatch {
            title: Some(title.to_string()),
            artist: Some(artist),
            album,
            score: r.score,
        })
    })
}
