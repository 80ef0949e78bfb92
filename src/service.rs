//=========================================================================
// Game Service
//
// Main entry point: leaderboards, achievements and friends over one
// social platform backend.
//
// Architecture:
// ```text
//     GameServiceBuilder ──build()──> GameService ──update()──> [owner tick]
//         │                              │
//         ├─ with_settings()             ├─ ScoreLoadQueue (one fetch at a time)
//         ├─ with_platform()             ├─ EventCollector (platform → owner)
//         └─ with_fetch_timeout()        └─ auto-init timer, login policy
// ```
//
// Backends complete requests from any thread by sending `PlatformEvent`s.
// Nothing reaches caller callbacks until the owner calls `update()`, so
// all service state is mutated from a single context.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Sender};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::catalog::{Achievement, Catalog, Leaderboard};
use crate::core::leaderboard::{
    LoadMode, RejectedSubmission, Score, ScoreLoadQueue, ScoreLoadRequest, ScoreResult,
    ScoreWindow,
};
use crate::core::login_policy::LoginPolicy;
use crate::core::platform_bridge::{
    AchievementProgress, EventCollector, FetchFailure, PlatformEvent, PlatformKind,
    Reply, RequestTicket, SocialPlatform, StatusReply, TicketCounter, UnavailablePlatform,
    UserProfile,
};
use crate::core::scheduler::DelayedTask;
use crate::core::settings::GameServiceSettings;
use crate::core::subscribers::{SubscriptionId, Subscribers};

//=== GameServiceError ====================================================

/// Synchronous failures of [`GameService`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameServiceError {
    /// The user is not signed in.
    NotInitialized,

    /// No social platform is available on this build.
    Unsupported,

    /// No leaderboard with this name is declared for the active platform.
    UnknownLeaderboard(String),

    /// No achievement with this name is declared for the active platform.
    UnknownAchievement(String),

    /// The score queue refused the request.
    Rejected(RejectedSubmission),
}

impl fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "User is not logged in"),
            Self::Unsupported => write!(f, "Platform not supported"),
            Self::UnknownLeaderboard(name) => write!(f, "Unknown leaderboard name: {:?}", name),
            Self::UnknownAchievement(name) => write!(f, "Unknown achievement name: {:?}", name),
            Self::Rejected(e) => write!(f, "Score request rejected: {}", e),
        }
    }
}

impl std::error::Error for GameServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RejectedSubmission> for GameServiceError {
    fn from(e: RejectedSubmission) -> Self {
        Self::Rejected(e)
    }
}

//=== UserAuthenticated ===================================================

/// Published to subscribers after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAuthenticated {
    pub user: Option<UserProfile>,
}

type ProfilesCallback = Box<dyn FnOnce(&[UserProfile]) + Send>;

//=== GameServiceBuilder ==================================================

/// Builder for configuring and constructing a [`GameService`].
///
/// # Default Values
///
/// - **Settings**: [`GameServiceSettings::default`] (auto init, no delay)
/// - **Platform**: [`UnavailablePlatform`]
/// - **Login requests already used**: 0
///
/// # Examples
///
/// ```no_run
/// use game_services::prelude::*;
///
/// let settings = GameServiceSettings::from_file("game_services.toml").unwrap();
/// let mut service = GameServiceBuilder::new()
///     .with_settings(settings)
///     .build();
///
/// loop {
///     service.update();
///     # break;
/// }
/// ```
pub struct GameServiceBuilder {
    settings: GameServiceSettings,
    platform: Option<Box<dyn SocialPlatform>>,
    login_requests: u32,
}

impl GameServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: GameServiceSettings::default(),
            platform: None,
            login_requests: 0,
        }
    }

    /// Replaces all settings.
    pub fn with_settings(mut self, settings: GameServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the social platform backend.
    pub fn with_platform<P>(mut self, platform: P) -> Self
    where
        P: SocialPlatform + 'static,
    {
        self.platform = Some(Box::new(platform));
        self
    }

    /// Enables or disables automatic init after `delay`.
    pub fn with_auto_init(mut self, enabled: bool, delay: Duration) -> Self {
        self.settings.auto_init = enabled;
        self.settings.auto_init_delay_secs = delay.as_secs_f64();
        self
    }

    /// Fails score fetches that stay in flight longer than `timeout`.
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "Fetch timeout must be positive");
        self.settings.fetch_timeout_secs = Some(timeout.as_secs_f64());
        self
    }

    /// Sets how many platform events one update may process.
    ///
    /// # Panics
    ///
    /// Panics if `budget == 0`.
    pub fn with_event_budget(mut self, budget: usize) -> Self {
        assert!(budget > 0, "Event budget must be positive");
        self.settings.event_budget = budget;
        self
    }

    /// Restores the number of login prompts already shown, as persisted
    /// by the host application.
    pub fn with_login_requests(mut self, requests: u32) -> Self {
        self.login_requests = requests;
        self
    }

    /// Builds the service, scheduling auto init relative to now.
    pub fn build(self) -> GameService {
        self.build_at(Instant::now())
    }

    /// Builds the service, scheduling auto init relative to `now`.
    pub fn build_at(self, now: Instant) -> GameService {
        let platform = self
            .platform
            .unwrap_or_else(|| Box::new(UnavailablePlatform::new()) as Box<dyn SocialPlatform>);
        let settings = self.settings;

        info!(
            target: "game_service",
            "Building game service (platform: {}, leaderboards: {}, achievements: {})",
            platform.kind(),
            settings.leaderboards.len(),
            settings.achievements.len()
        );

        let (events, receiver) = unbounded();
        let auto_init = if settings.auto_init {
            DelayedTask::after(now, settings.auto_init_delay())
        } else {
            DelayedTask::idle()
        };

        GameService {
            queue: ScoreLoadQueue::new(events.clone()).with_fetch_timeout(settings.fetch_timeout()),
            collector: EventCollector::new(receiver, settings.event_budget.max(1)),
            catalog: settings.catalog(),
            login_policy: LoginPolicy::new(settings.max_login_requests)
                .with_requests(self.login_requests),
            platform,
            events,
            auto_init,
            authenticating: false,
            on_authenticated: Subscribers::new(),
            achievements: Vec::new(),
            friends: None,
            friend_callbacks: Vec::new(),
            user_callbacks: HashMap::new(),
            tickets: TicketCounter::default(),
        }
    }
}

impl Default for GameServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== GameService =========================================================

/// Leaderboards, achievements and friends over one social platform.
///
/// Create via [`GameServiceBuilder`] and call [`GameService::update`]
/// regularly from the owning thread; callbacks fire from inside it.
pub struct GameService {
    platform: Box<dyn SocialPlatform>,
    catalog: Catalog,
    queue: ScoreLoadQueue,
    collector: EventCollector,
    events: Sender<PlatformEvent>,
    login_policy: LoginPolicy,
    auto_init: DelayedTask,
    authenticating: bool,
    on_authenticated: Subscribers<UserAuthenticated>,
    achievements: Vec<AchievementProgress>,
    friends: Option<Vec<UserProfile>>,
    friend_callbacks: Vec<ProfilesCallback>,
    user_callbacks: HashMap<RequestTicket, ProfilesCallback>,
    tickets: TicketCounter,
}

impl GameService {
    //--- Initialization ---------------------------------------------------

    /// Starts authentication. A login UI may appear if the user has not
    /// signed in before; otherwise it completes silently.
    ///
    /// # Errors
    ///
    /// [`GameServiceError::Unsupported`] when no platform is available.
    pub fn init(&mut self) -> Result<(), GameServiceError> {
        self.ensure_supported()?;

        if self.authenticating {
            debug!(target: "game_service", "Init ignored: authentication in progress");
            return Ok(());
        }

        info!(target: "game_service", "Authenticating with {}", self.platform.kind());
        self.authenticating = true;
        let reply = self.status_reply(|success| PlatformEvent::Authenticated { success });
        self.platform.authenticate(reply);
        Ok(())
    }

    /// Calls [`init`](Self::init) unless already signed in or the login
    /// request budget is spent.
    ///
    /// Returns `true` if authentication was started.
    pub fn managed_init(&mut self) -> Result<bool, GameServiceError> {
        self.ensure_supported()?;

        if self.is_initialized() || self.authenticating {
            return Ok(false);
        }

        if !self.login_policy.try_acquire() {
            return Ok(false);
        }

        self.init()?;
        Ok(true)
    }

    /// Whether the user is signed in and the service is usable.
    pub fn is_initialized(&self) -> bool {
        self.platform.is_ready()
    }

    /// The signed-in user, if any.
    pub fn local_user(&self) -> Option<UserProfile> {
        if self.is_initialized() {
            self.platform.local_user()
        } else {
            None
        }
    }

    /// Login prompts shown since the last successful sign-in. Hosts may
    /// persist this and restore it via the builder.
    pub fn login_requests(&self) -> u32 {
        self.login_policy.requests()
    }

    /// Cancels a pending auto init. Returns `true` if one was pending.
    pub fn cancel_auto_init(&mut self) -> bool {
        self.auto_init.cancel()
    }

    //--- Update Loop ------------------------------------------------------

    /// Processes platform completions and timers. Call once per tick.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// [`update`](Self::update) with an explicit clock.
    pub fn update_at(&mut self, now: Instant) {
        if self.auto_init.poll(now) {
            info!(target: "game_service", "Auto init");
            if let Err(e) = self.managed_init() {
                warn!(target: "game_service", "Auto init FAILED: {}", e);
            }
        }

        // The service holds a sender itself, so the channel never disconnects.
        self.collector.collect();
        for event in self.collector.take_events() {
            self.dispatch(event);
        }

        if let Some(friends) = &self.friends {
            for callback in self.friend_callbacks.drain(..) {
                callback(friends.as_slice());
            }
        }

        self.queue.expire(now, &mut *self.platform);
    }

    //--- Subscriptions ----------------------------------------------------

    /// Registers a handler for successful sign-ins.
    pub fn on_user_authenticated<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&UserAuthenticated) + Send + 'static,
    {
        self.on_authenticated.subscribe(handler)
    }

    /// Removes a handler registered with [`on_user_authenticated`](Self::on_user_authenticated).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_authenticated.unsubscribe(id)
    }

    //--- Native UI --------------------------------------------------------

    /// Shows the platform leaderboard UI.
    pub fn show_leaderboard_ui(&mut self) -> Result<(), GameServiceError> {
        self.require_init("ShowLeaderboardUI")?;
        self.platform.show_leaderboard_ui();
        Ok(())
    }

    /// Shows the platform achievements UI.
    pub fn show_achievements_ui(&mut self) -> Result<(), GameServiceError> {
        self.require_init("ShowAchievementsUI")?;
        self.platform.show_achievements_ui();
        Ok(())
    }

    //--- Reporting --------------------------------------------------------

    /// Reports `value` to the leaderboard named `leaderboard_name`.
    pub fn report_score(&mut self, value: i64, leaderboard_name: &str) -> Result<(), GameServiceError> {
        let id = self.leaderboard_id(leaderboard_name)?;
        self.require_init("ReportScore")?;

        debug!(target: "game_service", "Reporting score {} to {}", value, id);
        let leaderboard_id = id.clone();
        let reply = self.status_reply(move |success| PlatformEvent::ScoreReported {
            leaderboard_id,
            value,
            success,
        });
        self.platform.report_score(&id, value, reply);
        Ok(())
    }

    /// Reveals a hidden achievement.
    pub fn reveal_achievement(&mut self, achievement_name: &str) -> Result<(), GameServiceError> {
        self.report_achievement_progress(achievement_name, 0.0)
    }

    /// Unlocks an achievement.
    pub fn unlock_achievement(&mut self, achievement_name: &str) -> Result<(), GameServiceError> {
        self.report_achievement_progress(achievement_name, 100.0)
    }

    /// Reports progress (percent) of an incremental achievement.
    pub fn report_achievement_progress(
        &mut self,
        achievement_name: &str,
        progress: f64,
    ) -> Result<(), GameServiceError> {
        let id = self.achievement_id(achievement_name)?;
        self.require_init("ReportAchievementProgress")?;

        debug!(target: "game_service", "Reporting progress of {}% for achievement {}", progress, id);
        let achievement_id = id.clone();
        let reply = self.status_reply(move |success| PlatformEvent::ProgressReported {
            achievement_id,
            progress,
            success,
        });
        self.platform.report_progress(&id, progress, reply);
        Ok(())
    }

    //--- Users ------------------------------------------------------------

    /// Loads the signed-in user's friends.
    ///
    /// Served from cache once loaded, including an empty list. Concurrent
    /// calls share one platform request. On failure the callback receives
    /// an empty list. The callback always runs inside a later
    /// [`update`](Self::update), even on a cache hit.
    pub fn load_friends<F>(&mut self, callback: F) -> Result<(), GameServiceError>
    where
        F: FnOnce(&[UserProfile]) + Send + 'static,
    {
        self.require_init("LoadFriends")?;

        self.friend_callbacks.push(Box::new(callback));
        if self.friends.is_none() && self.friend_callbacks.len() == 1 {
            let reply = Reply::new(
                self.events.clone(),
                || Err(FetchFailure::Abandoned),
                |result| PlatformEvent::FriendsLoaded { result },
            );
            self.platform.load_friends(reply);
        }
        Ok(())
    }

    /// Loads profiles for `user_ids`. On failure the callback receives an
    /// empty list.
    pub fn load_users<F>(&mut self, user_ids: &[String], callback: F) -> Result<(), GameServiceError>
    where
        F: FnOnce(&[UserProfile]) + Send + 'static,
    {
        self.require_init("LoadUsers")?;

        let ticket = self.tickets.next();
        self.user_callbacks.insert(ticket, Box::new(callback));
        let reply = Reply::new(
            self.events.clone(),
            || Err(FetchFailure::Abandoned),
            move |result| PlatformEvent::UsersLoaded { ticket, result },
        );
        self.platform.load_users(user_ids, reply);
        Ok(())
    }

    //--- Scores -----------------------------------------------------------

    /// Loads the default set of scores of a leaderboard, typically the
    /// entries around the local user (global, all time).
    ///
    /// Requests are queued and run one at a time in submission order.
    /// The callback receives the leaderboard name.
    pub fn load_scores<F>(&mut self, leaderboard_name: &str, callback: F) -> Result<(), GameServiceError>
    where
        F: FnOnce(&str, ScoreResult) + Send + 'static,
    {
        self.submit_scores(leaderboard_name, LoadMode::DefaultWindow, callback)
    }

    /// Loads `window.count` scores starting at `window.start_rank` within
    /// the given scopes. A start or count below 1 uses the platform's
    /// default range.
    ///
    /// On Play Games the range always starts at rank 1.
    pub fn load_scores_in_window<F>(
        &mut self,
        leaderboard_name: &str,
        window: ScoreWindow,
        callback: F,
    ) -> Result<(), GameServiceError>
    where
        F: FnOnce(&str, ScoreResult) + Send + 'static,
    {
        let kind = self.platform.kind();
        if window.start_rank > 1 && !kind.honors_start_rank() {
            debug!(
                target: "game_service",
                "{} ignores start rank {}, scores will start at rank 1",
                kind,
                window.start_rank
            );
        }
        self.submit_scores(leaderboard_name, LoadMode::CustomWindow(window), callback)
    }

    /// Loads the signed-in user's score on a leaderboard.
    pub fn load_local_user_score<F>(
        &mut self,
        leaderboard_name: &str,
        callback: F,
    ) -> Result<(), GameServiceError>
    where
        F: FnOnce(&str, Result<Score, FetchFailure>) + Send + 'static,
    {
        self.submit_scores(leaderboard_name, LoadMode::LocalUserOnly, move |name, result| {
            let score = result.and_then(|scores| {
                scores
                    .into_iter()
                    .next()
                    .ok_or_else(|| FetchFailure::Platform("no local user score".to_string()))
            });
            callback(name, score);
        })
    }

    /// Score requests waiting behind the in-flight fetch.
    pub fn pending_score_requests(&self) -> usize {
        self.queue.len()
    }

    /// Whether a score fetch is outstanding.
    pub fn is_loading_scores(&self) -> bool {
        self.queue.is_in_flight()
    }

    //--- Catalog ----------------------------------------------------------

    /// The declared leaderboard named `name`.
    pub fn leaderboard(&self, name: &str) -> Option<&Leaderboard> {
        self.catalog.leaderboard(name)
    }

    /// The declared achievement named `name`.
    pub fn achievement(&self, name: &str) -> Option<&Achievement> {
        self.catalog.achievement(name)
    }

    /// Achievement states loaded after the last sign-in.
    pub fn achievement_states(&self) -> &[AchievementProgress] {
        &self.achievements
    }

    //--- Internal ---------------------------------------------------------

    fn submit_scores<F>(
        &mut self,
        leaderboard_name: &str,
        mode: LoadMode,
        callback: F,
    ) -> Result<(), GameServiceError>
    where
        F: FnOnce(&str, ScoreResult) + Send + 'static,
    {
        if !self.is_initialized() {
            warn!(target: "game_service", "LoadScores FAILED: user is not logged in");
            return Err(RejectedSubmission::ServiceNotReady.into());
        }

        let id = self
            .leaderboard_id(leaderboard_name)
            .map_err(|_| RejectedSubmission::UnknownLeaderboard(leaderboard_name.to_string()))?;

        let name = leaderboard_name.to_string();
        let request = ScoreLoadRequest::new(id, mode, move |_id: &str, result| {
            callback(name.as_str(), result)
        });
        self.queue.enqueue(request, &mut *self.platform)?;
        Ok(())
    }

    fn dispatch(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::ScoresFetched { ticket, result } => {
                self.queue.complete(ticket, result, &mut *self.platform);
            }
            PlatformEvent::Authenticated { success } => self.on_authentication(success),
            PlatformEvent::ScoreReported {
                leaderboard_id,
                value,
                success,
            } => {
                if success {
                    debug!(target: "game_service", "Score {} reported to {}", value, leaderboard_id);
                } else {
                    warn!(target: "game_service", "Failed to report score {} to {}", value, leaderboard_id);
                }
            }
            PlatformEvent::ProgressReported {
                achievement_id,
                progress,
                success,
            } => {
                if success {
                    debug!(
                        target: "game_service",
                        "Reported progress of {}% for achievement {}",
                        progress,
                        achievement_id
                    );
                } else {
                    warn!(
                        target: "game_service",
                        "Failed to report progress for achievement {}",
                        achievement_id
                    );
                }
            }
            PlatformEvent::AchievementsLoaded { result } => match result {
                Ok(achievements) => {
                    info!(target: "game_service", "Got {} achievements", achievements.len());
                    self.achievements = achievements;
                }
                Err(e) => warn!(target: "game_service", "Failed to load achievements: {}", e),
            },
            PlatformEvent::FriendsLoaded { result } => {
                match result {
                    Ok(friends) => {
                        debug!(target: "game_service", "Got {} friends", friends.len());
                        self.friends = Some(friends);
                    }
                    Err(e) => warn!(target: "game_service", "LoadFriends FAILED: {}", e),
                }
                let friends = self.friends.as_deref().unwrap_or(&[]);
                for callback in self.friend_callbacks.drain(..) {
                    callback(friends);
                }
            }
            PlatformEvent::UsersLoaded { ticket, result } => {
                let Some(callback) = self.user_callbacks.remove(&ticket) else {
                    warn!(target: "game_service", "Ignoring unknown users load {}", ticket);
                    return;
                };
                let users = result.unwrap_or_else(|e| {
                    warn!(target: "game_service", "LoadUsers FAILED: {}", e);
                    Vec::new()
                });
                callback(users.as_slice());
            }
        }
    }

    fn on_authentication(&mut self, success: bool) {
        self.authenticating = false;

        if !success {
            warn!(target: "game_service", "Failed to authenticate user");
            return;
        }

        info!(target: "game_service", "User authenticated, loading achievements");
        self.login_policy.reset();

        let event = UserAuthenticated {
            user: self.platform.local_user(),
        };
        self.on_authenticated.notify(&event);

        let reply = Reply::new(
            self.events.clone(),
            || Err(FetchFailure::Abandoned),
            |result| PlatformEvent::AchievementsLoaded { result },
        );
        self.platform.load_achievements(reply);
    }

    fn status_reply<F>(&self, wrap: F) -> StatusReply
    where
        F: FnOnce(bool) -> PlatformEvent + Send + 'static,
    {
        Reply::new(self.events.clone(), || false, wrap)
    }

    fn ensure_supported(&self) -> Result<(), GameServiceError> {
        if self.platform.kind() == PlatformKind::Unsupported {
            warn!(target: "game_service", "Init FAILED: platform not supported");
            return Err(GameServiceError::Unsupported);
        }
        Ok(())
    }

    fn require_init(&self, operation: &str) -> Result<(), GameServiceError> {
        if self.is_initialized() {
            Ok(())
        } else {
            warn!(target: "game_service", "{} FAILED: user is not logged in", operation);
            Err(GameServiceError::NotInitialized)
        }
    }

    fn leaderboard_id(&self, name: &str) -> Result<String, GameServiceError> {
        let kind = self.platform.kind();
        match self.catalog.leaderboard(name).map(|l| l.id_for(kind)) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => {
                warn!(target: "game_service", "Unknown leaderboard name {:?} on {}", name, kind);
                Err(GameServiceError::UnknownLeaderboard(name.to_string()))
            }
        }
    }

    fn achievement_id(&self, name: &str) -> Result<String, GameServiceError> {
        let kind = self.platform.kind();
        match self.catalog.achievement(name).map(|a| a.id_for(kind)) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => {
                warn!(target: "game_service", "Unknown achievement name {:?} on {}", name, kind);
                Err(GameServiceError::UnknownAchievement(name.to_string()))
            }
        }
    }
}

impl fmt::Debug for GameService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameService")
            .field("platform", &self.platform.kind())
            .field("initialized", &self.is_initialized())
            .field("queue", &self.queue)
            .field("login_policy", &self.login_policy)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
