//=========================================================================
// Leaderboard Data Model
//=========================================================================
//
// Value types shared by the score queue and platform backends.
//
// Architecture:
//   ScoreLoadRequest
//     ├─ leaderboard_id: String
//     ├─ mode: LoadMode (DefaultWindow | CustomWindow | LocalUserOnly)
//     └─ on_complete: FnOnce(&str, ScoreResult)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::FetchFailure;

//=== Module Declarations =================================================

mod score_queue;

//=== Public API ==========================================================

pub use score_queue::{RejectedSubmission, ScoreLoadQueue};

//=== Score ===============================================================

/// A single leaderboard entry as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Platform identifier of the user owning this score.
    pub user_id: String,

    /// Raw score value.
    pub value: i64,

    /// 1-based rank on the leaderboard.
    pub rank: u32,

    /// Platform-formatted value (e.g. "1:02.30"), may be empty.
    pub formatted: String,
}

impl Score {
    /// Creates a score with an empty formatted value.
    pub fn new(user_id: impl Into<String>, value: i64, rank: u32) -> Self {
        Self {
            user_id: user_id.into(),
            value,
            rank,
            formatted: String::new(),
        }
    }
}

/// Ordered list of scores returned by one fetch.
pub type ScoreList = Vec<Score>;

/// Outcome delivered to a score request callback.
pub type ScoreResult = Result<ScoreList, FetchFailure>;

//=== Scopes ==============================================================

/// Time period a leaderboard query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeScope {
    #[default]
    AllTime,
    Week,
    Today,
}

/// Population of users a leaderboard query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserScope {
    #[default]
    Global,
    FriendsOnly,
}

//=== ScoreRange ==========================================================

/// Validated rank range: `count` scores starting at rank `from`.
///
/// Only constructed through [`ScoreWindow::range`], so both fields are >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange {
    from: u32,
    count: u32,
}

impl ScoreRange {
    /// First rank to load (1-based).
    pub fn from(&self) -> u32 {
        self.from
    }

    /// Number of scores to load.
    pub fn count(&self) -> u32 {
        self.count
    }
}

//=== ScoreWindow =========================================================

/// Caller-requested custom window over a leaderboard.
///
/// The starting rank is a hint. Some platforms (see
/// [`PlatformKind::honors_start_rank`](crate::core::platform_bridge::PlatformKind::honors_start_rank))
/// always start at rank 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWindow {
    pub start_rank: u32,
    pub count: u32,
    pub time_scope: TimeScope,
    pub user_scope: UserScope,
}

impl ScoreWindow {
    /// Creates a window with the given range and scopes.
    pub fn new(start_rank: u32, count: u32, time_scope: TimeScope, user_scope: UserScope) -> Self {
        Self {
            start_rank,
            count,
            time_scope,
            user_scope,
        }
    }

    /// Returns the explicit rank range, or `None` when either bound is
    /// below 1 and the platform's default windowing should be used.
    ///
    /// Scopes apply in both cases.
    pub fn range(&self) -> Option<ScoreRange> {
        if self.start_rank >= 1 && self.count >= 1 {
            Some(ScoreRange {
                from: self.start_rank,
                count: self.count,
            })
        } else {
            None
        }
    }
}

//=== LoadMode ============================================================

/// Which slice of a leaderboard a request loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Platform default window (typically scores around the local user).
    DefaultWindow,

    /// Caller-specified rank range and scopes.
    CustomWindow(ScoreWindow),

    /// Only the local user's own score.
    LocalUserOnly,
}

//=== ScoreLoadRequest ====================================================

/// Callback invoked exactly once with `(leaderboard_id, result)`.
pub type ScoreCallback = Box<dyn FnOnce(&str, ScoreResult) + Send>;

/// One pending score fetch.
pub struct ScoreLoadRequest {
    pub(crate) leaderboard_id: String,
    pub(crate) mode: LoadMode,
    pub(crate) on_complete: ScoreCallback,
}

impl ScoreLoadRequest {
    /// Creates a request for the given leaderboard and mode.
    pub fn new<F>(leaderboard_id: impl Into<String>, mode: LoadMode, on_complete: F) -> Self
    where
        F: FnOnce(&str, ScoreResult) + Send + 'static,
    {
        Self {
            leaderboard_id: leaderboard_id.into(),
            mode,
            on_complete: Box::new(on_complete),
        }
    }

    /// Platform identifier of the target leaderboard.
    pub fn leaderboard_id(&self) -> &str {
        &self.leaderboard_id
    }

    /// Requested load mode.
    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

impl fmt::Debug for ScoreLoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreLoadRequest")
            .field("leaderboard_id", &self.leaderboard_id)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
