use crate::error::RecommendError;
use crate::models::{Song, Tab};

pub(crate) const NO_RESULTS: &str = "No songs found. Try something else!";

/// One recommendation ready for display.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SongCard {
    pub(crate) name: String,
    /// Comma-joined artist names.
    pub(crate) artists: String,
    pub(crate) popularity: Option<f64>,
    /// Outbound video search for "name artists".
    pub(crate) listen_url: String,
    /// Set on the first card of a song search: the song the user asked about.
    pub(crate) seed: bool,
}

impl SongCard {
    pub(crate) fn byline(&self) -> String {
        format!("by {}", self.artists)
    }
}

/// Entries in the results pane.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResultEntry {
    Placeholder(String),
    Error(String),
    Song(SongCard),
}

/// Turn API records into display entries. An empty list renders a single
/// placeholder. A record whose artist field does not decode fails the whole
/// render.
pub(crate) fn render(
    records: &[Song],
    tab: Tab,
    video_search_url: &str,
) -> Result<Vec<ResultEntry>, RecommendError> {
    if records.is_empty() {
        return Ok(vec![ResultEntry::Placeholder(NO_RESULTS.to_string())]);
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| -> Result<ResultEntry, RecommendError> {
            let artists = record.artist_names()?.join(", ");
            let query = format!("{} {}", record.name, artists);
            Ok(ResultEntry::Song(SongCard {
                name: record.name.clone(),
                listen_url: format!("{video_search_url}{}", urlencoding::encode(&query)),
                artists,
                popularity: record.popularity,
                seed: tab == Tab::Song && index == 0,
            }))
        })
        .collect()
}

/// The results pane: its entries plus a selection cursor over them.
#[derive(Debug, Default)]
pub(crate) struct ResultList {
    entries: Vec<ResultEntry>,
    selected: usize,
}

impl ResultList {
    pub(crate) fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    /// Replace whatever was shown with the outcome of a request. Any failure,
    /// including a record that does not render, becomes one error entry.
    pub(crate) fn show_outcome(
        &mut self,
        outcome: Result<Vec<Song>, RecommendError>,
        tab: Tab,
        video_search_url: &str,
    ) {
        let entries = outcome.and_then(|records| render(&records, tab, video_search_url));
        match entries {
            Ok(entries) => self.entries = entries,
            Err(err) => self.show_error(&err.to_string()),
        }
        self.selected = 0;
    }

    pub(crate) fn show_error(&mut self, message: &str) {
        self.entries = vec![ResultEntry::Error(format!("Error: {message}"))];
        self.selected = 0;
    }

    pub(crate) fn current_card(&self) -> Option<&SongCard> {
        match self.entries.get(self.selected)? {
            ResultEntry::Song(card) => Some(card),
            _ => None,
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        let next = (self.selected as isize + offset).clamp(0, last);
        self.selected = next as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }
}
