//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use game_services::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Service facade
pub use crate::service::{GameService, GameServiceBuilder, GameServiceError, UserAuthenticated};

// Configuration
pub use crate::core::catalog::{Achievement, Leaderboard};
pub use crate::core::settings::{GameServiceSettings, SettingsError};

// Scores
pub use crate::core::leaderboard::{Score, ScoreResult, ScoreWindow, TimeScope, UserScope};

// Platform backends
pub use crate::core::platform_bridge::{
    FetchFailure, PlatformKind, SocialPlatform, UnavailablePlatform, UserProfile,
};
