//! Progress sync client
//!
//! Owns the player's in-memory score and decides when to pull from and push
//! to the backend. The local score is optimistic; the backend is only
//! authoritative when a profile is loaded.
//!
//! ## Ordering
//!
//! A profile is not *ready* until its initial pull has settled (either way).
//! Pushes are only armed for a ready profile, so a fresh local zero can
//! never race ahead of the pull and overwrite a higher remote score.
//!
//! ## Failure
//!
//! Network failures never interrupt play. They flip `backend_reachable`,
//! set the status to [`SyncStatus::Error`], and record a message. A failed
//! push is not retried until the score changes again.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::error::{SyncError, SyncResult};
use super::profile::LocalProfile;
use super::transport::{HttpProgressApi, ProgressApi};
use crate::config::Config;
use crate::models::{normalize_player_name, PlayerProgress};

/// What the client is currently doing with the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Nothing in flight, last operation succeeded
    #[default]
    Idle,
    /// Pulling a profile
    Loading,
    /// Pushing a score
    Saving,
    /// Last operation failed; playing locally
    Error,
}

/// Read-only view of the client state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncSnapshot {
    /// Active player; empty means no profile selected
    pub player_name: String,
    pub score: u64,
    pub status: SyncStatus,
    pub last_synced_at: Option<DateTime<Utc>>,
    /// As last observed by the client
    pub backend_reachable: bool,
    pub sync_error: Option<String>,
    /// The active profile's initial pull has settled
    pub profile_ready: bool,
}

impl SyncSnapshot {
    pub fn has_profile(&self) -> bool {
        !self.player_name.is_empty()
    }

    /// Whether a score change should arm a push
    fn can_push(&self) -> bool {
        self.has_profile() && self.profile_ready
    }

    fn record_failure(&mut self, err: &SyncError) {
        self.backend_reachable = false;
        self.status = SyncStatus::Error;
        self.sync_error = Some(err.to_string());
    }
}

/// Handles for the two independent startup tasks
#[derive(Debug)]
pub struct Bootstrap {
    /// Resolves to the observed reachability
    pub probe: JoinHandle<bool>,
    /// Pull of the saved profile; `None` if no name was saved
    pub profile: Option<JoinHandle<SyncResult<PlayerProgress>>>,
}

impl Bootstrap {
    /// Wait for both tasks; neither failure is fatal
    pub async fn wait(self) {
        if let Err(e) = self.probe.await {
            warn!("Reachability probe task failed: {}", e);
        }
        if let Some(profile) = self.profile {
            if let Err(e) = profile.await {
                warn!("Profile load task failed: {}", e);
            }
        }
    }
}

struct Inner<A> {
    api: A,
    profile: LocalProfile,
    state: watch::Sender<SyncSnapshot>,
    debouncer: Debouncer,
}

/// Client-side owner of the player's score
///
/// Cheap to clone; clones share the same state. Operations that spawn
/// tasks must run inside a Tokio runtime.
pub struct ProgressSyncClient<A: ProgressApi> {
    inner: Arc<Inner<A>>,
}

impl<A: ProgressApi> Clone for ProgressSyncClient<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ProgressSyncClient<HttpProgressApi> {
    /// Client talking HTTP to `config.api_url`, remembering the player
    /// name under `config.data_dir`
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpProgressApi::new(config)?;
        Ok(Self::new(api, LocalProfile::new(config), config.push_debounce()))
    }
}

impl<A: ProgressApi> ProgressSyncClient<A> {
    pub fn new(api: A, profile: LocalProfile, push_debounce: Duration) -> Self {
        let (state, _) = watch::channel(SyncSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                api,
                profile,
                state,
                debouncer: Debouncer::new(push_debounce),
            }),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> SyncSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes (for a status indicator)
    pub fn subscribe(&self) -> watch::Receiver<SyncSnapshot> {
        self.inner.state.subscribe()
    }

    /// Start the liveness probe and, if a player name was saved, that
    /// player's pull. The two run independently of each other.
    ///
    /// With no saved name the client is ready at once with score 0.
    pub fn bootstrap(&self) -> Bootstrap {
        let client = self.clone();
        let probe = tokio::spawn(async move { client.probe().await });

        let saved = self
            .inner
            .profile
            .load()
            .unwrap_or_else(|e| {
                warn!("Ignoring unreadable saved profile: {:#}", e);
                None
            })
            .and_then(|name| normalize_player_name(&name).ok());

        let profile = match saved {
            Some(name) => {
                info!(player = %name, "Restoring saved profile");
                self.activate(&name);
                let client = self.clone();
                Some(tokio::spawn(async move { client.load_profile(&name).await }))
            }
            None => {
                self.inner.state.send_modify(|s| s.profile_ready = true);
                None
            }
        };

        Bootstrap { probe, profile }
    }

    /// Check whether the backend answers at all
    ///
    /// Only updates `backend_reachable`; never records an error.
    pub async fn probe(&self) -> bool {
        let reachable = match self.inner.api.health().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        };
        self.inner
            .state
            .send_modify(|s| s.backend_reachable = reachable);
        reachable
    }

    /// Fetch `name`'s remote record and adopt it as the local score
    ///
    /// On failure the local score is left alone and the client carries on
    /// in local-only mode. The result is only applied while `name` is still
    /// the active player.
    pub async fn pull(&self, name: &str) -> SyncResult<PlayerProgress> {
        self.update_if_active(name, |s| {
            s.status = SyncStatus::Loading;
            s.sync_error = None;
        });

        match self.inner.api.get_progress(name).await {
            Ok(progress) => {
                if progress.is_saved() {
                    debug!(player = %name, score = progress.score, "Pulled progress");
                } else {
                    info!(player = %name, "New player, starting from zero");
                }
                self.update_if_active(name, |s| {
                    s.score = progress.score;
                    s.last_synced_at = progress.updated_at;
                    s.backend_reachable = true;
                    s.status = SyncStatus::Idle;
                });
                Ok(progress)
            }
            Err(err) => {
                warn!(player = %name, "Could not load profile: {}", err);
                self.update_if_active(name, |s| s.record_failure(&err));
                Err(err)
            }
        }
    }

    /// Select a player and load their progress
    ///
    /// Blank input is ignored (`Ok(None)`). Otherwise the name is
    /// normalized the way the backend keys it (trimmed, at most 40
    /// characters), saved as the active profile and pulled; the profile
    /// becomes ready once the pull settles. A pull error is returned so the
    /// caller can show it, but play continues on the local score.
    pub async fn set_player_name(&self, name: &str) -> SyncResult<Option<PlayerProgress>> {
        let Ok(name) = normalize_player_name(name) else {
            return Ok(None);
        };

        self.flush_previous_profile();
        self.activate(&name);
        if let Err(e) = self.inner.profile.save(&name) {
            warn!("Could not remember player name: {:#}", e);
        }

        self.load_profile(&name).await.map(Some)
    }

    /// Count one correct answer
    ///
    /// Purely local; arms the debounced push when a ready profile is active.
    pub fn increment_score(&self) -> u64 {
        let mut score = 0;
        let mut arm = false;
        self.inner.state.send_modify(|s| {
            s.score = s.score.saturating_add(1);
            score = s.score;
            arm = s.can_push();
        });

        if arm {
            self.schedule_push();
        }
        score
    }

    /// Send the active player's current score now
    ///
    /// Returns `Ok(None)` when there is no ready profile to save.
    pub async fn push(&self) -> SyncResult<Option<PlayerProgress>> {
        let snapshot = self.snapshot();
        if !snapshot.can_push() {
            return Ok(None);
        }
        self.save(&snapshot.player_name, snapshot.score).await.map(Some)
    }

    /// Clear the displayed error message
    pub fn dismiss_error(&self) {
        self.inner.state.send_modify(|s| {
            s.sync_error = None;
            if s.status == SyncStatus::Error {
                s.status = SyncStatus::Idle;
            }
        });
    }

    /// Whether a debounced push is waiting to fire
    pub fn push_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Apply `update` only while `name` is still the active player, so a
    /// late result for a previous player leaves the current one alone
    fn update_if_active(&self, name: &str, update: impl FnOnce(&mut SyncSnapshot)) {
        self.inner.state.send_if_modified(|s| {
            if s.player_name != name {
                return false;
            }
            update(s);
            true
        });
    }

    fn activate(&self, name: &str) {
        self.inner.state.send_modify(|s| {
            s.player_name = name.to_string();
            s.profile_ready = false;
        });
    }

    /// Pull, then mark the profile ready whatever the outcome
    async fn load_profile(&self, name: &str) -> SyncResult<PlayerProgress> {
        let result = self.pull(name).await;

        let mut arm = false;
        self.inner.state.send_modify(|s| {
            if s.player_name == name {
                s.profile_ready = true;
                // Register the profile with the pulled score. After a failed
                // pull the remote score is unknown, so wait for a real change.
                arm = result.is_ok();
            }
        });

        if arm {
            self.schedule_push();
        }
        result
    }

    /// Switching players must not drop the previous player's unsent score
    fn flush_previous_profile(&self) {
        if !self.inner.debouncer.cancel() {
            return;
        }

        let previous = self.snapshot();
        if previous.can_push() {
            debug!(player = %previous.player_name, "Flushing pending push before switching player");
            let client = self.clone();
            tokio::spawn(async move {
                let _ = client.save(&previous.player_name, previous.score).await;
            });
        }
    }

    fn schedule_push(&self) {
        let client = self.clone();
        self.inner.debouncer.schedule(move || async move {
            if let Err(e) = client.push().await {
                debug!("Debounced push failed: {}", e);
            }
        });
    }

    async fn save(&self, name: &str, score: u64) -> SyncResult<PlayerProgress> {
        self.update_if_active(name, |s| {
            s.status = SyncStatus::Saving;
            s.sync_error = None;
        });

        match self.inner.api.save_progress(name, score).await {
            Ok(progress) => {
                debug!(player = %name, score, "Pushed progress");
                self.update_if_active(name, |s| {
                    s.last_synced_at = progress.updated_at;
                    s.backend_reachable = true;
                    s.status = SyncStatus::Idle;
                });
                Ok(progress)
            }
            Err(err) => {
                warn!(player = %name, score, "Could not save score: {}", err);
                self.update_if_active(name, |s| s.record_failure(&err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    /// In-memory backend that records every save attempt
    #[derive(Default)]
    struct FakeApi {
        records: Mutex<HashMap<String, u64>>,
        saves: Mutex<Vec<(String, u64)>>,
        save_attempts: AtomicUsize,
        offline: AtomicBool,
        held_players: Mutex<HashMap<String, Arc<Notify>>>,
    }

    impl FakeApi {
        fn with_record(name: &str, score: u64) -> Self {
            let api = Self::default();
            api.records.lock().unwrap().insert(name.to_string(), score);
            api
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn saves(&self) -> Vec<(String, u64)> {
            self.saves.lock().unwrap().clone()
        }

        fn check_online(&self) -> SyncResult<()> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(SyncError::Unreachable("connection refused".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProgressApi for FakeApi {
        async fn health(&self) -> SyncResult<crate::models::HealthStatus> {
            self.check_online()?;
            Ok(crate::models::HealthStatus::now())
        }

        async fn get_progress(&self, player_name: &str) -> SyncResult<PlayerProgress> {
            let gate = self.held_players.lock().unwrap().get(player_name).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.check_online()?;
            let score = self.records.lock().unwrap().get(player_name).copied();
            Ok(match score {
                Some(score) => PlayerProgress {
                    player_name: player_name.to_string(),
                    score,
                    updated_at: Some(Utc::now()),
                },
                None => PlayerProgress::unsaved(player_name),
            })
        }

        async fn save_progress(
            &self,
            player_name: &str,
            score: u64,
        ) -> SyncResult<PlayerProgress> {
            self.save_attempts.fetch_add(1, Ordering::SeqCst);
            self.check_online()?;
            self.records
                .lock()
                .unwrap()
                .insert(player_name.to_string(), score);
            self.saves
                .lock()
                .unwrap()
                .push((player_name.to_string(), score));
            Ok(PlayerProgress {
                player_name: player_name.to_string(),
                score,
                updated_at: Some(Utc::now()),
            })
        }
    }

    fn client(api: &Arc<FakeApi>) -> ProgressSyncClient<Arc<FakeApi>> {
        ProgressSyncClient::new(api.clone(), LocalProfile::in_memory(), DEBOUNCE)
    }

    async fn settle() {
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(100)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_player_starts_at_zero() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);

        let progress = client.set_player_name("Ava").await.unwrap().unwrap();
        assert_eq!(progress, PlayerProgress::unsaved("Ava"));

        let state = client.snapshot();
        assert_eq!(state.player_name, "Ava");
        assert_eq!(state.score, 0);
        assert!(state.profile_ready);
        assert!(state.backend_reachable);
        assert_eq!(state.status, SyncStatus::Idle);
        assert!(state.last_synced_at.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pull_adopts_remote_score() {
        let api = Arc::new(FakeApi::with_record("Ava", 12));
        let client = client(&api);

        client.increment_score();
        client.set_player_name("  Ava ").await.unwrap();

        let state = client.snapshot();
        assert_eq!(state.player_name, "Ava");
        assert_eq!(state.score, 12);
        assert!(state.last_synced_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_name_is_ignored() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let before = client.snapshot();

        assert_eq!(client.set_player_name("   ").await.unwrap(), None);
        assert_eq!(client.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_increments_coalesce_into_one_push() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        client.set_player_name("Ava").await.unwrap();

        for _ in 0..5 {
            client.increment_score();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(api.saves().is_empty());

        settle().await;
        assert_eq!(api.saves(), vec![("Ava".to_string(), 5)]);
        assert!(client.snapshot().last_synced_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_increment_restarts_quiet_period() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        client.set_player_name("Ava").await.unwrap();

        client.increment_score();
        tokio::time::sleep(Duration::from_millis(200)).await;
        client.increment_score();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(api.saves().is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(api.saves(), vec![("Ava".to_string(), 2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_load_registers_profile() {
        let api = Arc::new(FakeApi::with_record("Ava", 4));
        let client = client(&api);
        client.set_player_name("Ava").await.unwrap();

        settle().await;
        assert_eq!(api.saves(), vec![("Ava".to_string(), 4)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_profile_means_no_push() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);

        assert_eq!(client.increment_score(), 1);
        assert_eq!(client.increment_score(), 2);
        assert!(!client.push_pending());

        settle().await;
        assert_eq!(api.save_attempts.load(Ordering::SeqCst), 0);
        assert_eq!(client.push().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_pull_degrades_to_local_play() {
        let api = Arc::new(FakeApi::default());
        api.set_offline(true);
        let client = client(&api);

        let err = client.set_player_name("Ava").await.unwrap_err();
        assert!(matches!(err, SyncError::Unreachable(_)));

        let state = client.snapshot();
        assert_eq!(state.score, 0);
        assert!(!state.backend_reachable);
        assert_eq!(state.status, SyncStatus::Error);
        assert!(state.sync_error.is_some());
        assert!(state.profile_ready);

        // Still playable
        assert_eq!(client.increment_score(), 1);
        settle().await;
        assert_eq!(client.snapshot().score, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_pull_does_not_arm_push() {
        let api = Arc::new(FakeApi::default());
        api.set_offline(true);
        let client = client(&api);
        let _ = client.set_player_name("Ava").await;

        settle().await;
        assert_eq!(api.save_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_push_keeps_score_and_waits_for_next_change() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        client.set_player_name("Ava").await.unwrap();
        settle().await;
        assert_eq!(api.saves().len(), 1);

        api.set_offline(true);
        client.increment_score();
        settle().await;

        let state = client.snapshot();
        assert_eq!(state.score, 1);
        assert_eq!(state.status, SyncStatus::Error);
        assert!(!state.backend_reachable);
        assert_eq!(api.save_attempts.load(Ordering::SeqCst), 2);

        // Backend returns, but nothing retries on its own
        api.set_offline(false);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.save_attempts.load(Ordering::SeqCst), 2);

        client.increment_score();
        settle().await;
        assert_eq!(api.saves().last(), Some(&("Ava".to_string(), 2)));
        let state = client.snapshot();
        assert!(state.backend_reachable);
        assert_eq!(state.status, SyncStatus::Idle);
        assert!(state.sync_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_push_before_initial_pull_settles() {
        let api = Arc::new(FakeApi::with_record("Ava", 10));
        let gate = Arc::new(Notify::new());
        api.held_players
            .lock()
            .unwrap()
            .insert("Ava".to_string(), gate.clone());
        let client = client(&api);

        let loading = {
            let client = client.clone();
            tokio::spawn(async move { client.set_player_name("Ava").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(client.snapshot().status, SyncStatus::Loading);
        assert!(!client.snapshot().profile_ready);

        client.increment_score();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(api.save_attempts.load(Ordering::SeqCst), 0);

        gate.notify_one();
        loading.await.unwrap().unwrap();
        settle().await;

        // The remote score won; the local zero never reached the backend
        assert_eq!(client.snapshot().score, 10);
        assert_eq!(api.saves(), vec![("Ava".to_string(), 10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_player_flushes_pending_push() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        client.set_player_name("Ava").await.unwrap();

        client.increment_score();
        client.increment_score();
        client.set_player_name("Ben").await.unwrap();
        settle().await;

        assert_eq!(
            api.saves(),
            vec![("Ava".to_string(), 2), ("Ben".to_string(), 0)]
        );
        assert_eq!(client.snapshot().player_name, "Ben");
        assert_eq!(client.snapshot().score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_for_previous_player_is_ignored() {
        let api = Arc::new(FakeApi::with_record("Ben", 3));
        let gate = Arc::new(Notify::new());
        api.held_players
            .lock()
            .unwrap()
            .insert("Ava".to_string(), gate.clone());
        let client = client(&api);

        let ava = {
            let client = client.clone();
            tokio::spawn(async move { client.set_player_name("Ava").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        client.set_player_name("Ben").await.unwrap();
        assert_eq!(client.snapshot().status, SyncStatus::Idle);

        // Ava's pull lands late and fails
        api.set_offline(true);
        gate.notify_one();
        assert!(ava.await.unwrap().is_err());

        let state = client.snapshot();
        assert_eq!(state.player_name, "Ben");
        assert_eq!(state.score, 3);
        assert_eq!(state.status, SyncStatus::Idle);
        assert!(state.backend_reachable);
        assert!(state.sync_error.is_none());
        assert!(state.profile_ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_name_uses_stored_key() {
        let long_name = "z".repeat(45);
        let key = "z".repeat(40);
        let api = Arc::new(FakeApi::with_record(&key, 10));
        let client = client(&api);

        let progress = client.set_player_name(&long_name).await.unwrap().unwrap();
        assert_eq!(progress.score, 10);
        assert_eq!(client.snapshot().player_name, key);

        settle().await;
        assert_eq!(api.saves(), vec![(key, 10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_normalizes_saved_long_name() {
        let temp_dir = TempDir::new().unwrap();
        let profile = LocalProfile::with_path(temp_dir.path().join("player_name"));
        profile.save(&"z".repeat(45)).unwrap();

        let key = "z".repeat(40);
        let api = Arc::new(FakeApi::with_record(&key, 10));
        let client = ProgressSyncClient::new(api.clone(), profile, DEBOUNCE);

        client.bootstrap().wait().await;
        settle().await;

        let state = client.snapshot();
        assert_eq!(state.player_name, key);
        assert_eq!(state.score, 10);
        assert_eq!(api.records.lock().unwrap().get(&key), Some(&10));
        assert!(api.saves().iter().all(|(_, score)| *score == 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_error() {
        let api = Arc::new(FakeApi::default());
        api.set_offline(true);
        let client = client(&api);
        let _ = client.set_player_name("Ava").await;
        assert!(client.snapshot().sync_error.is_some());

        client.dismiss_error();
        let state = client.snapshot();
        assert!(state.sync_error.is_none());
        assert_eq!(state.status, SyncStatus::Idle);
        // Reachability is still the last observation
        assert!(!state.backend_reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_sets_reachability_without_error() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);

        assert!(client.probe().await);
        assert!(client.snapshot().backend_reachable);

        api.set_offline(true);
        assert!(!client.probe().await);
        let state = client.snapshot();
        assert!(!state.backend_reachable);
        assert!(state.sync_error.is_none());
        assert_eq!(state.status, SyncStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_without_saved_profile() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);

        let bootstrap = client.bootstrap();
        assert!(bootstrap.profile.is_none());
        assert!(client.snapshot().profile_ready);
        bootstrap.wait().await;

        let state = client.snapshot();
        assert!(!state.has_profile());
        assert_eq!(state.score, 0);
        assert!(state.backend_reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_restores_saved_profile() {
        let temp_dir = TempDir::new().unwrap();
        let profile = LocalProfile::with_path(temp_dir.path().join("player_name"));
        profile.save("Ava").unwrap();

        let api = Arc::new(FakeApi::with_record("Ava", 7));
        let client = ProgressSyncClient::new(api.clone(), profile, DEBOUNCE);

        client.bootstrap().wait().await;

        let state = client.snapshot();
        assert_eq!(state.player_name, "Ava");
        assert_eq!(state.score, 7);
        assert!(state.profile_ready);
        assert!(state.backend_reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_offline_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let profile = LocalProfile::with_path(temp_dir.path().join("player_name"));
        profile.save("Ava").unwrap();

        let api = Arc::new(FakeApi::default());
        api.set_offline(true);
        let client = ProgressSyncClient::new(api.clone(), profile, DEBOUNCE);

        client.bootstrap().wait().await;

        let state = client.snapshot();
        assert_eq!(state.player_name, "Ava");
        assert!(state.profile_ready);
        assert!(!state.backend_reachable);
        assert_eq!(client.increment_score(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_player_name_remembers_profile() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("player_name");
        let api = Arc::new(FakeApi::default());
        let client =
            ProgressSyncClient::new(api.clone(), LocalProfile::with_path(path.clone()), DEBOUNCE);

        client.set_player_name("  Ava  ").await.unwrap();
        assert_eq!(
            LocalProfile::with_path(path).load().unwrap(),
            Some("Ava".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_sees_changes() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let mut rx = client.subscribe();

        client.increment_score();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().score, 1);
    }
}
