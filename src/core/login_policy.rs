//=========================================================================
// Login Policy
//=========================================================================
//
// Limits how often managed init may prompt the user to sign in.
//
// Every managed init attempt on an unauthenticated service consumes one
// login request. Once the budget is spent, further attempts are skipped
// until a successful sign-in resets the counter.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== LoginPolicy =========================================================

/// Counter of login prompts shown without a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPolicy {
    max_requests: u32,
    requests: u32,
}

impl LoginPolicy {
    /// `max_requests == 0` means unlimited.
    pub fn new(max_requests: u32) -> Self {
        Self {
            max_requests,
            requests: 0,
        }
    }

    /// Restores a counter persisted by the host application.
    pub fn with_requests(mut self, requests: u32) -> Self {
        self.requests = requests;
        self
    }

    /// Consumes one login request if the budget allows it.
    ///
    /// Returns `true` when authentication should be attempted.
    pub fn try_acquire(&mut self) -> bool {
        if self.max_requests > 0 && self.requests >= self.max_requests {
            info!(
                target: "game_service",
                "Managed init skipped: max login requests exceeded ({} attempted)",
                self.requests
            );
            return false;
        }

        self.requests += 1;
        debug!(target: "game_service", "Login request {} of {}", self.requests, self.limit_label());
        true
    }

    /// Clears the counter after a successful sign-in.
    pub fn reset(&mut self) {
        self.requests = 0;
    }

    /// Login requests consumed since the last successful sign-in.
    pub fn requests(&self) -> u32 {
        self.requests
    }

    fn limit_label(&self) -> String {
        if self.max_requests == 0 {
            "unlimited".to_string()
        } else {
            self.max_requests.to_string()
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
