//=========================================================================
// Catalog
//=========================================================================
//
// Declared leaderboards and achievements, looked up by name.
//
// Callers address entries by a stable, platform-independent name; each
// entry maps it to the id of every supported backend.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformKind;

//=== Entries =============================================================

/// A leaderboard declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Leaderboard {
    pub name: String,
    #[serde(default)]
    pub ios_id: String,
    #[serde(default)]
    pub android_id: String,
}

/// An achievement declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Achievement {
    pub name: String,
    #[serde(default)]
    pub ios_id: String,
    #[serde(default)]
    pub android_id: String,
}

macro_rules! impl_platform_ids {
    ($entry:ty) => {
        impl $entry {
            /// Creates an entry with per-platform ids.
            pub fn new(
                name: impl Into<String>,
                ios_id: impl Into<String>,
                android_id: impl Into<String>,
            ) -> Self {
                Self {
                    name: name.into(),
                    ios_id: ios_id.into(),
                    android_id: android_id.into(),
                }
            }

            /// The id used by `kind`. Empty on unsupported platforms.
            pub fn id_for(&self, kind: PlatformKind) -> &str {
                match kind {
                    PlatformKind::GameCenter => &self.ios_id,
                    PlatformKind::PlayGames => &self.android_id,
                    PlatformKind::Unsupported => "",
                }
            }
        }
    };
}

impl_platform_ids!(Leaderboard);
impl_platform_ids!(Achievement);

//=== Catalog =============================================================

/// Name-indexed set of leaderboards and achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    leaderboards: Vec<Leaderboard>,
    achievements: Vec<Achievement>,
}

impl Catalog {
    pub fn new(leaderboards: Vec<Leaderboard>, achievements: Vec<Achievement>) -> Self {
        Self {
            leaderboards,
            achievements,
        }
    }

    /// Returns the first leaderboard declared with `name`.
    pub fn leaderboard(&self, name: &str) -> Option<&Leaderboard> {
        self.leaderboards.iter().find(|l| l.name == name)
    }

    /// Returns the first achievement declared with `name`.
    pub fn achievement(&self, name: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.name == name)
    }

    pub fn leaderboards(&self) -> &[Leaderboard] {
        &self.leaderboards
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
