use crate::error::RecommendError;
use crate::models::{Mood, Tab};

/// A validated request for recommendations. A `BySong` title is always
/// trimmed and non-empty; construct it through [`RecommendationRequest::by_song`]
/// or [`RecommendationRequest::from_inputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationRequest {
    BySong(String),
    ByMood(Mood),
}

impl RecommendationRequest {
    pub fn by_song(title: &str) -> Result<Self, RecommendError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(RecommendError::EmptyTitle);
        }
        Ok(Self::BySong(trimmed.to_string()))
    }

    /// Pick the input that belongs to the active tab.
    pub fn from_inputs(tab: Tab, title: &str, mood: Mood) -> Result<Self, RecommendError> {
        match tab {
            Tab::Song => Self::by_song(title),
            Tab::Mood => Ok(Self::ByMood(mood)),
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            Self::BySong(_) => Tab::Song,
            Self::ByMood(_) => Tab::Mood,
        }
    }

    /// Path and query relative to the API base address.
    pub fn path_and_query(&self) -> String {
        match self {
            Self::BySong(title) => {
                format!("/recommend?song_title={}", urlencoding::encode(title))
            }
            Self::ByMood(mood) => format!("/mood?mood={}", mood.as_str()),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query())
    }
}
