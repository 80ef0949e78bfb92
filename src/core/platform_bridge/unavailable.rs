//=========================================================================
// Unavailable Platform
//=========================================================================
//
// Fallback backend for builds without a social platform SDK.
//
// Never becomes ready: authentication fails, reports fail, and the
// score queue rejects every submission up front.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::interface::{
    AchievementsReply, FetchFailure, LeaderboardService, LocalScoreReply, PlatformKind,
    ProfilesReply, ScoreReply, SocialPlatform, StatusReply, UserProfile,
};
use crate::core::leaderboard::{ScoreRange, TimeScope, UserScope};

const UNSUPPORTED: &str = "platform not supported";

//=== UnavailablePlatform =================================================

/// Social backend used when no platform is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailablePlatform;

impl UnavailablePlatform {
    pub fn new() -> Self {
        Self
    }

    fn unsupported() -> FetchFailure {
        FetchFailure::Platform(UNSUPPORTED.to_string())
    }
}

impl LeaderboardService for UnavailablePlatform {
    fn is_ready(&self) -> bool {
        false
    }

    fn fetch_default_window(&mut self, _leaderboard_id: &str, reply: ScoreReply) {
        reply.send(Err(Self::unsupported()));
    }

    fn fetch_custom_window(
        &mut self,
        _leaderboard_id: &str,
        _range: Option<ScoreRange>,
        _time_scope: TimeScope,
        _user_scope: UserScope,
        reply: ScoreReply,
    ) {
        reply.send(Err(Self::unsupported()));
    }

    fn fetch_local_user_score(&mut self, _leaderboard_id: &str, reply: LocalScoreReply) {
        reply.send(Err(Self::unsupported()));
    }
}

impl SocialPlatform for UnavailablePlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Unsupported
    }

    fn authenticate(&mut self, reply: StatusReply) {
        warn!(target: "platform", "Authentication FAILED: {}", UNSUPPORTED);
        reply.send(false);
    }

    fn local_user(&self) -> Option<UserProfile> {
        None
    }

    fn report_score(&mut self, _leaderboard_id: &str, _value: i64, reply: StatusReply) {
        reply.send(false);
    }

    fn report_progress(&mut self, _achievement_id: &str, _progress: f64, reply: StatusReply) {
        reply.send(false);
    }

    fn load_achievements(&mut self, reply: AchievementsReply) {
        reply.send(Err(Self::unsupported()));
    }

    fn load_friends(&mut self, reply: ProfilesReply) {
        reply.send(Err(Self::unsupported()));
    }

    fn load_users(&mut self, _user_ids: &[String], reply: ProfilesReply) {
        reply.send(Err(Self::unsupported()));
    }

    fn show_leaderboard_ui(&mut self) {}

    fn show_achievements_ui(&mut self) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform_bridge::{PlatformEvent, Reply};
    use crossbeam_channel::unbounded;

    #[test]
    fn never_ready() {
        let platform = UnavailablePlatform::new();
        assert!(!platform.is_ready());
        assert_eq!(platform.kind(), PlatformKind::Unsupported);
        assert!(platform.local_user().is_none());
    }

    #[test]
    fn authentication_fails_immediately() {
        let (tx, rx) = unbounded();
        let mut platform = UnavailablePlatform::new();

        platform.authenticate(Reply::new(tx, || false, |success| {
            PlatformEvent::Authenticated { success }
        }));

        assert!(matches!(
            rx.try_recv().unwrap(),
            PlatformEvent::Authenticated { success: false }
        ));
    }
}
