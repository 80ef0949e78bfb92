//=========================================================================
// Core
//=========================================================================
//
// Building blocks of the game service.
//
// Architecture:
//   leaderboard      ScoreLoadQueue + score data model
//   platform_bridge  backend contract, replies, event collection
//   catalog          named leaderboards / achievements
//   settings         TOML configuration
//   login_policy     managed-init login budget
//   scheduler        delayed tasks (auto init)
//   subscribers      multicast notifications
//
//=========================================================================

//=== Module Declarations =================================================

pub mod catalog;
pub mod leaderboard;
pub mod login_policy;
pub mod platform_bridge;
pub mod scheduler;
pub mod settings;
pub mod subscribers;
