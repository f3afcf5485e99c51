use crate::dataset::ContributionDataset;
use crate::github::UserStats;
use crate::source::ContributionSource;
use crate::year::CalendarYear;
use rand::Rng;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use tracing::{debug, error};

/// Identifies what the calendar is currently asking for.  A result is only
/// applied if its key still matches.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct RequestKey {
    pub(crate) username: String,
    pub(crate) year: CalendarYear,
}

impl RequestKey {
    pub(crate) fn new<S: Into<String>>(username: S, year: CalendarYear) -> RequestKey {
        RequestKey {
            username: username.into(),
            year,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Loaded {
    pub(crate) key: RequestKey,
    pub(crate) dataset: ContributionDataset,
    pub(crate) stats: UserStats,
}

impl Loaded {
    pub(crate) fn fetch<R: Rng>(source: &mut ContributionSource<R>, key: RequestKey) -> Loaded {
        let dataset = source.contributions(&key.username, key.year);
        let stats = source.user_stats(&key.username);
        Loaded {
            key,
            dataset,
            stats,
        }
    }
}

/// Runs fetches on a worker thread so that the UI keeps responding
#[derive(Debug)]
pub(crate) struct Loader {
    requests: Sender<RequestKey>,
    results: Receiver<Loaded>,
}

impl Loader {
    pub(crate) fn spawn<R: Rng + Send + 'static>(mut source: ContributionSource<R>) -> Loader {
        let (requests, inbox) = channel::<RequestKey>();
        let (outbox, results) = channel();
        thread::spawn(move || {
            while let Ok(mut key) = inbox.recv() {
                // Only the newest of any queued requests is worth fetching
                while let Ok(newer) = inbox.try_recv() {
                    debug!(skipped = ?key, "superseded before fetching");
                    key = newer;
                }
                if outbox.send(Loaded::fetch(&mut source, key)).is_err() {
                    break;
                }
            }
        });
        Loader { requests, results }
    }

    pub(crate) fn request(&self, key: RequestKey) {
        debug!(?key, "requesting contributions");
        if self.requests.send(key).is_err() {
            error!("contribution loader has stopped");
        }
    }

    pub(crate) fn try_recv(&self) -> Option<Loaded> {
        self.results.try_recv().ok()
    }

    #[cfg(test)]
    pub(crate) fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Loaded> {
        use std::sync::mpsc::RecvTimeoutError;
        match self.results.recv_timeout(timeout) {
            Ok(loaded) => Some(loaded),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                error!("contribution loader has stopped");
                None
            }
        }
    }
}
