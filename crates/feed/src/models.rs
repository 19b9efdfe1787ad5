// ABOUTME: Owned models for parsed podcast data: Feed, Episode, and FeedList.
// ABOUTME: Values are handed to the caller by move; the parser keeps no references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One playable entry within a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub description: String,
    /// Always valid; unparsable source dates are replaced by the parse time.
    pub published: DateTime<Utc>,
    pub author: String,
    /// Enclosure or media link. Never empty for episodes attached to a [`Feed`].
    pub url: String,
    pub duration_secs: u64,
}

impl Default for Episode {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            published: DateTime::<Utc>::UNIX_EPOCH,
            author: String::new(),
            url: String::new(),
            duration_secs: 0,
        }
    }
}

/// One podcast's metadata and its episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    /// Declared canonical URL, or the URL the document was fetched from.
    pub url: String,
    pub description: String,
    pub copyright: String,
    pub image_url_large: String,
    pub owner_name: String,
    pub owner_email: String,
    pub episodes: Vec<Episode>,
}

impl Feed {
    /// Appends `episode` unless it has no media URL.
    ///
    /// Returns whether the episode was kept.
    pub fn add_episode(&mut self, episode: Episode) -> bool {
        if episode.url.is_empty() {
            return false;
        }
        self.episodes.push(episode);
        true
    }
}

/// Feeds in document or discovery order.
pub type FeedList = Vec<Feed>;
