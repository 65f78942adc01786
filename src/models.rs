//! Domain models shared by the HTTP client and the TUI. These stay plain data
//! holders: the API layer decodes into them and the result renderer turns them
//! into display cards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One recommended song as returned by the recommendation API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Song {
    /// Track title shown in bold on each result card.
    pub name: String,
    /// Artist names as a JSON-encoded array inside a string, e.g.
    /// `"[\"Queen\", \"David Bowie\"]"`. The API ships it this way, so it is
    /// kept raw and decoded on demand by [`Song::artist_names`].
    pub artists: String,
    /// Popularity score when the API includes it.
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl Song {
    /// Decode the JSON-encoded artist list.
    pub fn artist_names(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.artists)
    }
}

/// The two mutually exclusive input modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Song,
    Mood,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Song, Tab::Mood];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Song => "By Song",
            Tab::Mood => "By Mood",
        }
    }
}

/// Moods the recommendation API knows how to filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
    Chill,
    Energetic,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Chill, Mood::Energetic];

    /// Value sent in the `mood` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Chill => "chill",
            Mood::Energetic => "energetic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Chill => "Chill",
            Mood::Energetic => "Energetic",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
