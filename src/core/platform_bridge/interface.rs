//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the game service and platform backends.
//
// Backends receive one-shot `Reply` handles and may complete them from
// any thread. Every reply turns into exactly one `PlatformEvent` on the
// owner's channel, which the owner drains during `update()`.
//
//   backend thread ──Reply::send()──> Sender<PlatformEvent>
//                                            │
//   owner context  <──EventCollector::collect()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::Sender;
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::leaderboard::{Score, ScoreRange, ScoreResult, TimeScope, UserScope};

//=== RequestTicket =======================================================

/// Identifies one outstanding asynchronous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw ticket number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic ticket allocator.
#[derive(Debug, Default)]
pub(crate) struct TicketCounter {
    next: u64,
}

impl TicketCounter {
    pub(crate) fn next(&mut self) -> RequestTicket {
        self.next += 1;
        RequestTicket(self.next)
    }
}

//=== FetchFailure ========================================================

/// Why an asynchronous platform request produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The platform reported an error.
    Platform(String),

    /// The backend dropped its reply without answering.
    Abandoned,

    /// No answer arrived within the configured fetch timeout.
    TimedOut,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(e) => write!(f, "Platform request failed: {}", e),
            Self::Abandoned => write!(f, "Platform dropped the request without answering"),
            Self::TimedOut => write!(f, "Platform request timed out"),
        }
    }
}

impl std::error::Error for FetchFailure {}

//=== Profiles ============================================================

/// Public profile of a platform user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub user_name: String,
    pub is_friend: bool,
}

/// Achievement state as reported by the platform after authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementProgress {
    pub id: String,
    pub percent_completed: f64,
    pub completed: bool,
}

//=== PlatformKind ========================================================

/// Which social backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// Apple Game Center.
    GameCenter,

    /// Google Play Games.
    PlayGames,

    /// No backend available on this build or device.
    Unsupported,
}

impl PlatformKind {
    /// Whether custom score windows honor the requested starting rank.
    ///
    /// Play Games always starts custom windows at rank 1 regardless of the
    /// requested start. This is a platform limitation and is passed
    /// through unchanged.
    pub fn honors_start_rank(self) -> bool {
        !matches!(self, Self::PlayGames)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameCenter => write!(f, "Game Center"),
            Self::PlayGames => write!(f, "Play Games"),
            Self::Unsupported => write!(f, "unsupported platform"),
        }
    }
}

//=== PlatformEvent =======================================================

/// Completion notifications sent from backends to the owner context.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// A score fetch issued by the score queue finished.
    ScoresFetched {
        ticket: RequestTicket,
        result: ScoreResult,
    },

    /// Authentication finished.
    Authenticated { success: bool },

    /// A score report finished.
    ScoreReported {
        leaderboard_id: String,
        value: i64,
        success: bool,
    },

    /// An achievement progress report finished.
    ProgressReported {
        achievement_id: String,
        progress: f64,
        success: bool,
    },

    /// Achievement states loaded after authentication.
    AchievementsLoaded {
        result: Result<Vec<AchievementProgress>, FetchFailure>,
    },

    /// The local user's friend list loaded.
    FriendsLoaded {
        result: Result<Vec<UserProfile>, FetchFailure>,
    },

    /// A profile lookup finished.
    UsersLoaded {
        ticket: RequestTicket,
        result: Result<Vec<UserProfile>, FetchFailure>,
    },
}

//=== Reply ===============================================================

type Wrap<T> = Box<dyn FnOnce(T) -> PlatformEvent + Send>;

/// One-shot completion handle passed to a backend.
///
/// `send` consumes the handle. Dropping it unsent delivers the
/// "abandoned" outcome instead, so each handle yields exactly one event.
pub struct Reply<T> {
    sink: Option<(Sender<PlatformEvent>, Wrap<T>)>,
    abandoned: fn() -> T,
}

impl<T> Reply<T> {
    pub(crate) fn new<F>(events: Sender<PlatformEvent>, abandoned: fn() -> T, wrap: F) -> Self
    where
        F: FnOnce(T) -> PlatformEvent + Send + 'static,
    {
        Self {
            sink: Some((events, Box::new(wrap))),
            abandoned,
        }
    }

    /// Delivers the outcome to the owner context.
    pub fn send(mut self, value: T) {
        self.deliver(value);
    }

    fn deliver(&mut self, value: T) {
        if let Some((events, wrap)) = self.sink.take() {
            if events.send(wrap(value)).is_err() {
                debug!(target: "platform", "Reply discarded: game service is gone");
            }
        }
    }
}

impl<T> Drop for Reply<T> {
    fn drop(&mut self) {
        if self.sink.is_some() {
            let value = (self.abandoned)();
            self.deliver(value);
        }
    }
}

impl<T> fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply")
            .field("pending", &self.sink.is_some())
            .finish()
    }
}

/// Reply for a window of scores.
pub type ScoreReply = Reply<ScoreResult>;

/// Reply for the local user's score.
pub type LocalScoreReply = Reply<Result<Score, FetchFailure>>;

/// Reply for authentication and fire-and-forget reports.
pub type StatusReply = Reply<bool>;

/// Reply for profile lists.
pub type ProfilesReply = Reply<Result<Vec<UserProfile>, FetchFailure>>;

/// Reply for achievement states.
pub type AchievementsReply = Reply<Result<Vec<AchievementProgress>, FetchFailure>>;

//=== LeaderboardService ==================================================

/// External leaderboard backend driven by the score queue.
///
/// Each fetch must eventually complete its reply exactly once (sending,
/// or dropping it). The backend is assumed to support one concurrent
/// query; the queue never overlaps calls.
pub trait LeaderboardService {
    /// Whether the backend is initialized and authenticated.
    fn is_ready(&self) -> bool;

    /// Loads the platform's default window of scores.
    fn fetch_default_window(&mut self, leaderboard_id: &str, reply: ScoreReply);

    /// Loads a custom window. `range` is `None` when the platform's own
    /// default range should be used.
    fn fetch_custom_window(
        &mut self,
        leaderboard_id: &str,
        range: Option<ScoreRange>,
        time_scope: TimeScope,
        user_scope: UserScope,
        reply: ScoreReply,
    );

    /// Loads the local user's score only.
    fn fetch_local_user_score(&mut self, leaderboard_id: &str, reply: LocalScoreReply);
}

//=== SocialPlatform ======================================================

/// Full social backend capability.
///
/// Implemented once per platform and selected at startup. See
/// [`UnavailablePlatform`](super::UnavailablePlatform) for the fallback.
pub trait SocialPlatform: LeaderboardService + Send {
    /// Which backend this is.
    fn kind(&self) -> PlatformKind;

    /// Starts authentication, possibly showing a login UI.
    fn authenticate(&mut self, reply: StatusReply);

    /// The signed-in user, if authenticated.
    fn local_user(&self) -> Option<UserProfile>;

    /// Submits a score.
    fn report_score(&mut self, leaderboard_id: &str, value: i64, reply: StatusReply);

    /// Reports achievement progress in percent (0 reveals, 100 unlocks).
    fn report_progress(&mut self, achievement_id: &str, progress: f64, reply: StatusReply);

    /// Loads the user's achievement states.
    fn load_achievements(&mut self, reply: AchievementsReply);

    /// Loads the user's friend list.
    fn load_friends(&mut self, reply: ProfilesReply);

    /// Looks up profiles for the given user ids.
    fn load_users(&mut self, user_ids: &[String], reply: ProfilesReply);

    /// Presents the native leaderboard UI.
    fn show_leaderboard_ui(&mut self);

    /// Presents the native achievements UI.
    fn show_achievements_ui(&mut self);
}

//=========================================================================
// Unit Tests
//=========================================================================
