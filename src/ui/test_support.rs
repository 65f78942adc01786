//! Fake recommendation sources shared by the UI tests.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::api::{RecommendationRequest, RecommendationSource};
use crate::error::RecommendError;
use crate::models::Song;

pub(crate) fn song(name: &str, artists: &str) -> Song {
    Song {
        name: name.to_string(),
        artists: artists.to_string(),
        popularity: None,
    }
}

/// Answers every request with the result of a closure.
pub(crate) struct FnSource<F> {
    respond: F,
}

impl<F> FnSource<F>
where
    F: Fn(&RecommendationRequest) -> Result<Vec<Song>, RecommendError> + Send + Sync,
{
    pub(crate) fn new(respond: F) -> Self {
        Self { respond }
    }
}

impl<F> RecommendationSource for FnSource<F>
where
    F: Fn(&RecommendationRequest) -> Result<Vec<Song>, RecommendError> + Send + Sync,
{
    fn fetch(&self, request: &RecommendationRequest) -> Result<Vec<Song>, RecommendError> {
        (self.respond)(request)
    }
}

/// Holds every request open until the test sends on the paired channel.
pub(crate) struct GatedSource {
    release: Receiver<()>,
}

impl GatedSource {
    pub(crate) fn new() -> (Self, Sender<()>) {
        let (sender, release) = bounded(1);
        (Self { release }, sender)
    }
}

impl RecommendationSource for GatedSource {
    fn fetch(&self, _request: &RecommendationRequest) -> Result<Vec<Song>, RecommendError> {
        self.release
            .recv()
            .map_err(|err| RecommendError::Transport(err.to_string()))?;
        Ok(Vec::new())
    }
}
