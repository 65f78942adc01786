use std::io;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use thiserror::Error;
use tracing::{debug, error};

use crate::api::{RecommendationRequest, RecommendationSource};
use crate::error::RecommendError;
use crate::models::{Song, Tab};

/// Label the trigger shows whenever it is enabled.
pub(crate) const TRIGGER_LABEL: &str = "Get Recommendations";
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    #[error("A request is already in progress.")]
    Busy,
    #[error("failed to start request worker: {0}")]
    Spawn(#[from] io::Error),
}

/// Outcome of one finished request, tagged with the tab it was sent from.
pub(crate) struct Completed {
    pub(crate) tab: Tab,
    pub(crate) result: Result<Vec<Song>, RecommendError>,
}

struct InFlight {
    tab: Tab,
    receiver: Receiver<Result<Vec<Song>, RecommendError>>,
}

/// Runs at most one request at a time. The blocking HTTP call happens on a
/// worker thread; the UI thread polls for its outcome on every tick. Holding
/// an `InFlight` is what makes the trigger disabled, and every way of leaving
/// that state (answer, error, worker gone) goes through [`Dispatcher::finish`].
pub(crate) struct Dispatcher {
    source: Arc<dyn RecommendationSource>,
    in_flight: Option<InFlight>,
    spinner: usize,
}

impl Dispatcher {
    pub(crate) fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            source,
            in_flight: None,
            spinner: 0,
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Text for the trigger control: the fixed label when enabled, a spinner
    /// while a request is outstanding.
    pub(crate) fn label(&self) -> String {
        if self.is_busy() {
            format!("{} Loading", SPINNER_FRAMES[self.spinner % SPINNER_FRAMES.len()])
        } else {
            TRIGGER_LABEL.to_string()
        }
    }

    /// Start `request` on a worker thread. Refuses while another request is
    /// still in flight.
    pub(crate) fn dispatch(&mut self, request: RecommendationRequest) -> Result<(), DispatchError> {
        if self.is_busy() {
            return Err(DispatchError::Busy);
        }

        let tab = request.tab();
        let (sender, receiver) = bounded(1);
        let source = Arc::clone(&self.source);
        thread::Builder::new()
            .name("recommend-request".to_string())
            .spawn(move || {
                let result = source.fetch(&request);
                // The receiver only goes away when the app is shutting down.
                let _ = sender.send(result);
            })?;

        debug!(?tab, "request dispatched");
        self.spinner = 0;
        self.in_flight = Some(InFlight { tab, receiver });
        Ok(())
    }

    /// Non-blocking check for a finished request.
    pub(crate) fn poll(&mut self) -> Option<Completed> {
        let in_flight = self.in_flight.as_ref()?;
        match in_flight.receiver.try_recv() {
            Ok(result) => Some(self.finish(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                error!("request worker exited without a result");
                Some(self.finish(Err(RecommendError::Transport(
                    "request worker stopped unexpectedly".to_string(),
                ))))
            }
        }
    }

    /// Advance the busy animation.
    pub(crate) fn tick(&mut self) {
        if self.is_busy() {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }

    fn finish(&mut self, result: Result<Vec<Song>, RecommendError>) -> Completed {
        let tab = self
            .in_flight
            .take()
            .map(|in_flight| in_flight.tab)
            .unwrap_or_default();
        Completed { tab, result }
    }

    /// Block until the in-flight request finishes.
    #[cfg(test)]
    pub(crate) fn wait(&mut self) -> Option<Completed> {
        use std::time::Duration;

        let in_flight = self.in_flight.as_ref()?;
        let result = match in_flight.receiver.recv_timeout(Duration::from_secs(5)) {
            Ok(result) => result,
            Err(_) => Err(RecommendError::Transport(
                "request worker stopped unexpectedly".to_string(),
            )),
        };
        Some(self.finish(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use crate::ui::test_support::{song, FnSource, GatedSource};

    #[test]
    fn label_returns_after_success() {
        let source = FnSource::new(|_| Ok(vec![song("A", r#"["X"]"#)]));
        let mut dispatcher = Dispatcher::new(Arc::new(source));
        assert_eq!(dispatcher.label(), TRIGGER_LABEL);

        dispatcher
            .dispatch(RecommendationRequest::ByMood(Mood::Happy))
            .expect("idle dispatcher accepts a request");
        assert!(dispatcher.is_busy());
        assert_ne!(dispatcher.label(), TRIGGER_LABEL);

        let completed = dispatcher.wait().expect("request was in flight");
        assert_eq!(completed.tab, Tab::Mood);
        assert_eq!(completed.result.expect("source succeeds").len(), 1);
        assert!(!dispatcher.is_busy());
        assert_eq!(dispatcher.label(), TRIGGER_LABEL);
    }

    #[test]
    fn second_dispatch_is_refused_while_busy() {
        let (source, release) = GatedSource::new();
        let mut dispatcher = Dispatcher::new(Arc::new(source));

        dispatcher
            .dispatch(RecommendationRequest::ByMood(Mood::Sad))
            .expect("first request starts");
        let err = dispatcher
            .dispatch(RecommendationRequest::ByMood(Mood::Chill))
            .expect_err("second request must be refused");
        assert!(matches!(err, DispatchError::Busy));
        assert!(dispatcher.poll().is_none());

        release.send(()).expect("worker is waiting");
        let completed = dispatcher.wait().expect("request was in flight");
        assert!(completed.result.is_ok());
        assert!(!dispatcher.is_busy());
    }

    #[test]
    fn failure_also_reenables_trigger() {
        let source = FnSource::new(|_| Err(RecommendError::Api("not found".to_string())));
        let mut dispatcher = Dispatcher::new(Arc::new(source));
        let request = RecommendationRequest::by_song("Imagine").expect("valid title");
        dispatcher.dispatch(request).expect("idle dispatcher");

        let completed = dispatcher.wait().expect("request was in flight");
        assert_eq!(completed.tab, Tab::Song);
        assert!(completed.result.is_err());
        assert_eq!(dispatcher.label(), TRIGGER_LABEL);
    }

    #[test]
    fn vanished_worker_reenables_trigger() {
        let source = FnSource::new(|_| panic!("worker blew up"));
        let mut dispatcher = Dispatcher::new(Arc::new(source));
        dispatcher
            .dispatch(RecommendationRequest::ByMood(Mood::Energetic))
            .expect("idle dispatcher");

        let completed = loop {
            if let Some(done) = dispatcher.poll() {
                break done;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        };
        assert!(matches!(
            completed.result,
            Err(RecommendError::Transport(_))
        ));
        assert!(!dispatcher.is_busy());
    }

    #[test]
    fn poll_without_request_is_empty() {
        let mut dispatcher = Dispatcher::new(Arc::new(FnSource::new(|_| Ok(Vec::new()))));
        assert!(dispatcher.poll().is_none());
        dispatcher.tick();
        assert_eq!(dispatcher.label(), TRIGGER_LABEL);
    }
}
