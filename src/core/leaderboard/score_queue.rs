//=========================================================================
// Score Load Queue
//=========================================================================
//
// Serializes leaderboard score fetches against a single backend.
//
// Flow:
//   enqueue() → pending (FIFO) → try_advance() → backend fetch
//                                      ↑                 │
//                                      └── complete() ←──┘ (owner context)
//
// At most one fetch is in flight. A request leaves `pending` the moment
// it is issued; its callback fires once when the matching completion is
// drained on the owner context, then the next request starts.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{LoadMode, Score, ScoreCallback, ScoreLoadRequest, ScoreResult};
use crate::core::platform_bridge::{
    FetchFailure, LeaderboardService, LocalScoreReply, PlatformEvent, Reply, RequestTicket,
    ScoreReply, TicketCounter,
};

//=== RejectedSubmission ==================================================

/// Synchronous refusal of [`ScoreLoadQueue::enqueue`]. Nothing is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedSubmission {
    /// The backend is not initialized or authenticated.
    ServiceNotReady,

    /// The leaderboard is not known.
    UnknownLeaderboard(String),
}

impl fmt::Display for RejectedSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceNotReady => write!(f, "Leaderboard service is not ready"),
            Self::UnknownLeaderboard(id) => write!(f, "Unknown leaderboard: {:?}", id),
        }
    }
}

impl std::error::Error for RejectedSubmission {}

//=== InFlightFetch =======================================================

struct InFlightFetch {
    ticket: RequestTicket,
    leaderboard_id: String,
    on_complete: ScoreCallback,
    /// Set by the first `expire()` that sees this fetch, on the caller's clock.
    started: Option<Instant>,
}

//=== ScoreLoadQueue ======================================================

/// FIFO queue of score requests with a single in-flight fetch.
///
/// The queue does not own the backend; every operation that may issue a
/// fetch borrows it. Completions travel over the event channel given to
/// [`ScoreLoadQueue::new`] and must be fed back through
/// [`ScoreLoadQueue::complete`] on the owner context.
pub struct ScoreLoadQueue {
    pending: VecDeque<ScoreLoadRequest>,
    in_flight: Option<InFlightFetch>,
    tickets: TicketCounter,
    events: Sender<PlatformEvent>,
    fetch_timeout: Option<Duration>,
}

impl ScoreLoadQueue {
    //--- Construction -----------------------------------------------------

    /// Creates an empty queue whose replies report to `events`.
    pub fn new(events: Sender<PlatformEvent>) -> Self {
        Self {
            pending: VecDeque::new(),
            in_flight: None,
            tickets: TicketCounter::default(),
            events,
            fetch_timeout: None,
        }
    }

    /// Sets how long a fetch may stay in flight before [`expire`](Self::expire)
    /// fails it. `None` (the default) waits forever.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    //--- Submission -------------------------------------------------------

    /// Appends a request and starts it if the backend is idle.
    ///
    /// # Errors
    ///
    /// Returns [`RejectedSubmission`] without queueing anything when the
    /// backend is not ready or the leaderboard id is empty.
    pub fn enqueue<S>(
        &mut self,
        request: ScoreLoadRequest,
        service: &mut S,
    ) -> Result<(), RejectedSubmission>
    where
        S: LeaderboardService + ?Sized,
    {
        if !service.is_ready() {
            warn!(target: "score_queue", "Load scores REJECTED: service not ready");
            return Err(RejectedSubmission::ServiceNotReady);
        }

        if request.leaderboard_id.is_empty() {
            warn!(target: "score_queue", "Load scores REJECTED: empty leaderboard id");
            return Err(RejectedSubmission::UnknownLeaderboard(String::new()));
        }

        debug!(target: "score_queue", "Queued {:?}", request);
        self.pending.push_back(request);
        self.try_advance(service);
        Ok(())
    }

    //--- Completion -------------------------------------------------------

    /// Delivers the outcome of the fetch identified by `ticket`.
    ///
    /// Invokes the request's callback, clears the in-flight slot and
    /// starts the next request. Returns `false` for stale or unknown
    /// tickets, which are ignored.
    pub fn complete<S>(&mut self, ticket: RequestTicket, result: ScoreResult, service: &mut S) -> bool
    where
        S: LeaderboardService + ?Sized,
    {
        match self.in_flight.take() {
            Some(current) if current.ticket == ticket => {
                match &result {
                    Ok(scores) => debug!(
                        target: "score_queue",
                        "Fetch {} for {} completed with {} scores",
                        ticket,
                        current.leaderboard_id,
                        scores.len()
                    ),
                    Err(e) => warn!(
                        target: "score_queue",
                        "Fetch {} for {} failed: {}",
                        ticket,
                        current.leaderboard_id,
                        e
                    ),
                }

                (current.on_complete)(&current.leaderboard_id, result);
                self.try_advance(service);
                true
            }
            other => {
                self.in_flight = other;
                warn!(target: "score_queue", "Ignoring stale completion for fetch {}", ticket);
                false
            }
        }
    }

    /// Fails the in-flight fetch with [`FetchFailure::TimedOut`] if it has
    /// been running longer than the configured timeout.
    ///
    /// Age is measured on the clock passed in: the first call that sees a
    /// fetch records `now` as its start.
    ///
    /// Returns `true` if a fetch was expired. A late completion for it is
    /// treated as stale.
    pub fn expire<S>(&mut self, now: Instant, service: &mut S) -> bool
    where
        S: LeaderboardService + ?Sized,
    {
        let Some(timeout) = self.fetch_timeout else {
            return false;
        };
        let Some(current) = self.in_flight.as_mut() else {
            return false;
        };

        let started = *current.started.get_or_insert(now);
        if now.saturating_duration_since(started) < timeout {
            return false;
        }

        let ticket = current.ticket;
        warn!(
            target: "score_queue",
            "Fetch {} for {} exceeded {:?}, failing it",
            ticket,
            current.leaderboard_id,
            timeout
        );
        self.complete(ticket, Err(FetchFailure::TimedOut), service)
    }

    //--- Query API --------------------------------------------------------

    /// Number of requests waiting behind the in-flight fetch.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if no request is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns true while a fetch is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    //--- Internal ---------------------------------------------------------

    fn try_advance<S>(&mut self, service: &mut S)
    where
        S: LeaderboardService + ?Sized,
    {
        if let Some(current) = &self.in_flight {
            debug!(
                target: "score_queue",
                "Advance postponed: fetch {} still in flight",
                current.ticket
            );
            return;
        }

        let Some(request) = self.pending.pop_front() else {
            debug!(target: "score_queue", "Queue drained");
            return;
        };

        let ScoreLoadRequest {
            leaderboard_id,
            mode,
            on_complete,
        } = request;
        let ticket = self.tickets.next();

        debug!(
            target: "score_queue",
            "Starting fetch {} for {} ({:?}), {} waiting",
            ticket,
            leaderboard_id,
            mode,
            self.pending.len()
        );

        // Marked before the call: a backend may answer synchronously.
        self.in_flight = Some(InFlightFetch {
            ticket,
            leaderboard_id: leaderboard_id.clone(),
            on_complete,
            started: None,
        });

        match mode {
            LoadMode::DefaultWindow => {
                service.fetch_default_window(&leaderboard_id, self.score_reply(ticket));
            }
            LoadMode::CustomWindow(window) => {
                service.fetch_custom_window(
                    &leaderboard_id,
                    window.range(),
                    window.time_scope,
                    window.user_scope,
                    self.score_reply(ticket),
                );
            }
            LoadMode::LocalUserOnly => {
                service.fetch_local_user_score(&leaderboard_id, self.local_score_reply(ticket));
            }
        }
    }

    fn score_reply(&self, ticket: RequestTicket) -> ScoreReply {
        Reply::new(
            self.events.clone(),
            || Err(FetchFailure::Abandoned),
            move |result| PlatformEvent::ScoresFetched { ticket, result },
        )
    }

    fn local_score_reply(&self, ticket: RequestTicket) -> LocalScoreReply {
        Reply::new(
            self.events.clone(),
            || Err(FetchFailure::Abandoned),
            move |result: Result<Score, FetchFailure>| PlatformEvent::ScoresFetched {
                ticket,
                result: result.map(|score| vec![score]),
            },
        )
    }
}

impl fmt::Debug for ScoreLoadQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreLoadQueue")
            .field("pending", &self.pending.len())
            .field("in_flight", &self.in_flight.as_ref().map(|c| c.ticket))
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
