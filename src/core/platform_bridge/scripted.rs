//=========================================================================
// Scripted Platform (test support)
//=========================================================================
//
// In-memory backend for unit tests. Records every call, holds replies
// until the test completes them, and asserts that score fetches never
// overlap.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

//=== Internal Dependencies ===============================================

use super::interface::{
    AchievementsReply, FetchFailure, LeaderboardService, LocalScoreReply, PlatformKind,
    ProfilesReply, ScoreReply, SocialPlatform, StatusReply, UserProfile,
};
use crate::core::leaderboard::{Score, ScoreRange, ScoreResult, TimeScope, UserScope};

//=== Call ================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    DefaultWindow(String),
    CustomWindow {
        id: String,
        range: Option<ScoreRange>,
        time_scope: TimeScope,
        user_scope: UserScope,
    },
    LocalUser(String),
    Authenticate,
    ReportScore(String, i64),
    ReportProgress(String, f64),
    LoadAchievements,
    LoadFriends,
    LoadUsers(Vec<String>),
    ShowLeaderboards,
    ShowAchievements,
}

impl Call {
    pub(crate) fn is_fetch(&self) -> bool {
        matches!(
            self,
            Self::DefaultWindow(_) | Self::CustomWindow { .. } | Self::LocalUser(_)
        )
    }
}

//=== ScriptState =========================================================

enum PendingFetch {
    Window(ScoreReply),
    Local(LocalScoreReply),
}

#[derive(Default)]
pub(crate) struct ScriptState {
    pub(crate) ready: bool,
    pub(crate) report_success: bool,
    pub(crate) allow_overlap: bool,
    pub(crate) calls: Vec<Call>,
    fetches: VecDeque<PendingFetch>,
    auth: VecDeque<StatusReply>,
    friends: VecDeque<ProfilesReply>,
    users: VecDeque<ProfilesReply>,
}

//=== ScriptedPlatform ====================================================

/// Cloneable handle; clones share state so tests keep one after boxing.
#[derive(Clone)]
pub(crate) struct ScriptedPlatform {
    kind: PlatformKind,
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedPlatform {
    pub(crate) fn new(kind: PlatformKind) -> Self {
        let state = ScriptState {
            report_success: true,
            ..ScriptState::default()
        };
        Self {
            kind,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// A backend that is already authenticated.
    pub(crate) fn ready() -> Self {
        let platform = Self::new(PlatformKind::GameCenter);
        platform.state().ready = true;
        platform
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn fetch_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_fetch).collect()
    }

    pub(crate) fn outstanding_fetches(&self) -> usize {
        self.state().fetches.len()
    }

    /// Completes the oldest outstanding fetch. Local-user fetches take the
    /// first score of `result`.
    pub(crate) fn complete_fetch(&self, result: ScoreResult) {
        let pending = self.state().fetches.pop_front().expect("no outstanding fetch");
        match pending {
            PendingFetch::Window(reply) => reply.send(result),
            PendingFetch::Local(reply) => {
                let single = result.and_then(|scores| {
                    scores
                        .into_iter()
                        .next()
                        .ok_or_else(|| FetchFailure::Platform("no local score".to_string()))
                });
                reply.send(single);
            }
        }
    }

    /// Drops the oldest outstanding fetch reply without answering.
    pub(crate) fn abandon_fetch(&self) {
        let pending = self.state().fetches.pop_front().expect("no outstanding fetch");
        drop(pending);
    }

    /// Completes the oldest authentication and updates readiness.
    pub(crate) fn complete_auth(&self, success: bool) {
        let reply = {
            let mut state = self.state();
            state.ready = success;
            state.auth.pop_front().expect("no outstanding authentication")
        };
        reply.send(success);
    }

    pub(crate) fn complete_friends(&self, result: Result<Vec<UserProfile>, FetchFailure>) {
        let reply = self.state().friends.pop_front().expect("no outstanding friends load");
        reply.send(result);
    }

    pub(crate) fn complete_users(&self, result: Result<Vec<UserProfile>, FetchFailure>) {
        let reply = self.state().users.pop_front().expect("no outstanding users load");
        reply.send(result);
    }

    fn push_fetch(&self, call: Call, pending: PendingFetch) {
        let mut state = self.state();
        assert!(
            state.allow_overlap || state.fetches.is_empty(),
            "overlapping fetch issued: {:?}",
            call
        );
        state.calls.push(call);
        state.fetches.push_back(pending);
    }
}

//=== Helpers =============================================================

pub(crate) fn score(user: &str, value: i64, rank: u32) -> Score {
    Score::new(user, value, rank)
}

pub(crate) fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        user_name: format!("user-{}", id),
        is_friend: true,
    }
}

//=== Trait Implementations ===============================================

impl LeaderboardService for ScriptedPlatform {
    fn is_ready(&self) -> bool {
        self.state().ready
    }

    fn fetch_default_window(&mut self, leaderboard_id: &str, reply: ScoreReply) {
        self.push_fetch(
            Call::DefaultWindow(leaderboard_id.to_string()),
            PendingFetch::Window(reply),
        );
    }

    fn fetch_custom_window(
        &mut self,
        leaderboard_id: &str,
        range: Option<ScoreRange>,
        time_scope: TimeScope,
        user_scope: UserScope,
        reply: ScoreReply,
    ) {
        self.push_fetch(
            Call::CustomWindow {
                id: leaderboard_id.to_string(),
                range,
                time_scope,
                user_scope,
            },
            PendingFetch::Window(reply),
        );
    }

    fn fetch_local_user_score(&mut self, leaderboard_id: &str, reply: LocalScoreReply) {
        self.push_fetch(
            Call::LocalUser(leaderboard_id.to_string()),
            PendingFetch::Local(reply),
        );
    }
}

impl SocialPlatform for ScriptedPlatform {
    fn kind(&self) -> PlatformKind {
        self.kind
    }

    fn authenticate(&mut self, reply: StatusReply) {
        let mut state = self.state();
        state.calls.push(Call::Authenticate);
        state.auth.push_back(reply);
    }

    fn local_user(&self) -> Option<UserProfile> {
        if self.state().ready {
            Some(profile("local"))
        } else {
            None
        }
    }

    fn report_score(&mut self, leaderboard_id: &str, value: i64, reply: StatusReply) {
        let success = {
            let mut state = self.state();
            state.calls.push(Call::ReportScore(leaderboard_id.to_string(), value));
            state.report_success
        };
        reply.send(success);
    }

    fn report_progress(&mut self, achievement_id: &str, progress: f64, reply: StatusReply) {
        let success = {
            let mut state = self.state();
            state.calls.push(Call::ReportProgress(achievement_id.to_string(), progress));
            state.report_success
        };
        reply.send(success);
    }

    fn load_achievements(&mut self, reply: AchievementsReply) {
        self.state().calls.push(Call::LoadAchievements);
        reply.send(Ok(Vec::new()));
    }

    fn load_friends(&mut self, reply: ProfilesReply) {
        let mut state = self.state();
        state.calls.push(Call::LoadFriends);
        state.friends.push_back(reply);
    }

    fn load_users(&mut self, user_ids: &[String], reply: ProfilesReply) {
        let mut state = self.state();
        state.calls.push(Call::LoadUsers(user_ids.to_vec()));
        state.users.push_back(reply);
    }

    fn show_leaderboard_ui(&mut self) {
        self.state().calls.push(Call::ShowLeaderboards);
    }

    fn show_achievements_ui(&mut self) {
        self.state().calls.push(Call::ShowAchievements);
    }
}
