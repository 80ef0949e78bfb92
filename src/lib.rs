//=========================================================================
// Game Services - Library Root
//
// This crate exposes leaderboards, achievements and friends over a
// pluggable social platform backend (Game Center, Play Games, ...).
//
// Responsibilities:
// - Expose the service facade (`GameService`) and its builder
// - Serialize leaderboard score loads so at most one is in flight
// - Keep platform backends behind a capability trait so they can be
//   selected at startup
//
// Typical usage:
// ```no_run
// use game_services::prelude::*;
//
// let mut service = GameServiceBuilder::new()
//     .with_platform(MyGameCenterBackend::new())
//     .build();
//
// loop {
//     service.update();
//     // ... game tick
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the score queue, platform contract, catalog and
// settings. Backend implementors need `core::platform_bridge`; game code
// mostly uses the `GameService` facade.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `service` defines the facade and its builder.
//
mod service;

//--- Public Exports ------------------------------------------------------

pub use service::{GameService, GameServiceBuilder, GameServiceError, UserAuthenticated};
