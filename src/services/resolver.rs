//! Metadata resolution cascade
//!
//! Combines embedded tags with an optional external catalog match into
//! one [`ResolvedTrack`]. The cascade starts from the embedded tags,
//! queries the catalog only when enhanced lookup is enabled and both
//! artist and title are present, and overlays an accepted match field
//! by field. Resolution never fails: catalog errors are logged and
//! degrade to "no match".

use crate::services::run_log::RunLog;
use crate::types::{CatalogMatch, RawTags, ResolvedTrack, TrackSource};

/// Search seam for the external catalog, so the cascade can be tested
/// without a network.
#[allow(async_fn_in_trait)]
pub trait CatalogSearch {
    type Error: std::fmt::Display;

    async fn search(&self, artist: &str, title: &str)
        -> Result<Option<CatalogMatch>, Self::Error>;
}

/// Metadata resolver applying the precedence cascade.
pub struct MetadataResolver<C> {
    catalog: Option<C>,
    lookup_enabled: bool,
    enhanced_enabled: bool,
}

impl<C: CatalogSearch> MetadataResolver<C> {
    pub fn new(catalog: Option<C>, lookup_enabled: bool, enhanced_enabled: bool) -> Self {
        Self {
            catalog,
            lookup_enabled,
            enhanced_enabled,
        }
    }

    /// Resolve one file's naming identity.
    ///
    /// Always produces a [`ResolvedTrack`]; a lookup failure is recorded
    /// in the run log and treated as "no match".
    pub async fn resolve(&self, raw: RawTags, run_log: &RunLog) -> ResolvedTrack {
        let mut resolved = ResolvedTrack {
            source: if raw.title.is_some() {
                TrackSource::Embedded
            } else {
                TrackSource::None
            },
            title: raw.title,
            artist: raw.artist,
            album: raw.album,
        };

        if !(self.lookup_enabled && self.enhanced_enabled) {
            return resolved;
        }

        let (catalog, artist, title) = match (&self.catalog, &resolved.artist, &resolved.title) {
            (Some(c), Some(a), Some(t)) => (c, a.clone(), t.clone()),
            _ => return resolved,
        };

        match catalog.search(&artist, &title).await {
            Ok(Some(m)) => {
                // Field-wise overlay: unset catalog fields keep the
                // embedded value.
                if m.title.is_some() {
                    resolved.title = m.title;
                }
                if m.artist.is_some() {
                    resolved.artist = m.artist;
                }
                if m.album.is_some() {
                    resolved.album = m.album;
                }
                resolved.source = TrackSource::Catalog;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(artist = %artist, title = %title, error = %e, "Catalog lookup failed");
                run_log
                    .append(&format!(
                        "lookup error: {} - {} ({})",
                        artist, title, e
                    ))
                    .await;
            }
        }

        resolved
    }
}
