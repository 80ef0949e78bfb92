//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges social platform backends (Game Center, Play Games, ...) with
// the game service.
//
// This module defines the contract between platform implementations and
// the service, so backends can be swapped at startup without changing
// service code.
//
// Components:
// - `interface`: capability traits, reply handles, events, failures
// - `event_collector`: owner-side event draining
// - `unavailable`: fallback backend for unsupported builds
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;
mod unavailable;

#[cfg(test)]
pub(crate) mod scripted;

//=== Public API ==========================================================

pub use interface::{
    AchievementProgress, AchievementsReply, FetchFailure, LeaderboardService, LocalScoreReply,
    PlatformEvent, PlatformKind, ProfilesReply, Reply, RequestTicket, ScoreReply, SocialPlatform,
    StatusReply, UserProfile,
};
pub use unavailable::UnavailablePlatform;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub(crate) use interface::TicketCounter;
