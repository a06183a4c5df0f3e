//! Launch bootstrap and the auth-gated navigation controller.
//!
//! [`SessionController`] reads the persisted flags once, decides which screen
//! group is mounted and re-derives that decision on every mutation. Screens
//! reach back into it through [`SessionController::set_is_logged_in`].

pub mod state;

use crate::navigation::{Navigator, Screen};
use crate::notify::Notifier;
use crate::store::{mask_token, SessionStore, FIRST_LAUNCH_KEY, TOKEN_KEY};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub use state::{derive_screen, BootstrapState, TriState};

pub const DEFAULT_SPLASH_DELAY_MS: u64 = 2_000;

struct Mounted {
    state: BootstrapState,
    screen: Option<Screen>,
}

struct Inner {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    splash_delay: Duration,
    mounted: Mutex<Mounted>,
    screen_tx: watch::Sender<Option<Screen>>,
    splash_cancel: CancellationToken,
    bootstrapped: AtomicBool,
}

impl Inner {
    /// Applies one mutation and remounts if the derived group changed.
    fn apply(&self, mutate: impl FnOnce(&mut BootstrapState)) -> Option<Screen> {
        let mut mounted = self.mounted.lock();
        mutate(&mut mounted.state);
        let screen = mounted.state.screen();
        if screen != mounted.screen {
            if let Some(screen) = screen {
                self.navigator.reset(vec![screen.entry_route()]);
            }
            tracing::debug!(
                from = ?mounted.screen,
                to = ?screen,
                "mounted screen changed"
            );
            mounted.screen = screen;
            self.screen_tx.send_replace(screen);
        }
        screen
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.splash_cancel.cancel();
    }
}

/// Owns [`BootstrapState`]. Clones share the same state; the splash timer is
/// cancelled once the last clone is dropped or [`shutdown`](Self::shutdown)
/// is called.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        splash_delay: Duration,
    ) -> Self {
        let (screen_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                store,
                navigator,
                notifier,
                splash_delay,
                mounted: Mutex::new(Mounted {
                    state: BootstrapState::default(),
                    screen: None,
                }),
                screen_tx,
                splash_cancel: CancellationToken::new(),
                bootstrapped: AtomicBool::new(false),
            }),
        }
    }

    /// Reads the persisted session once and resolves the initial screen.
    ///
    /// Store read failures count as "absent". Only the very first bootstrap
    /// of an install writes to the store. Later calls return the current
    /// screen without touching anything.
    pub async fn bootstrap(&self) -> Option<Screen> {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.current_screen();
        }

        let store = &self.inner.store;
        let token = read_or_absent(store.as_ref(), TOKEN_KEY)
            .await
            .filter(|t| !t.is_empty());
        let first_launch_flag = read_or_absent(store.as_ref(), FIRST_LAUNCH_KEY).await;
        let logged_in = token.is_some();

        let screen = if first_launch_flag.is_none() {
            if let Err(err) = store.set(FIRST_LAUNCH_KEY, "false").await {
                tracing::warn!("failed to persist first-launch flag: {err}");
            }
            let screen = self.inner.apply(|state| {
                state.is_first_launch = TriState::True;
                state.is_logged_in = logged_in.into();
            });
            self.schedule_splash_completion();
            screen
        } else {
            self.inner.apply(|state| {
                state.is_first_launch = TriState::False;
                state.is_logged_in = logged_in.into();
                state.splash_done = true;
            })
        };

        let masked = token.as_deref().map(mask_token).unwrap_or_default();
        tracing::info!(
            first_launch = first_launch_flag.is_none(),
            logged_in,
            token = %masked,
            "session bootstrap complete"
        );
        screen
    }

    fn schedule_splash_completion(&self) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let cancel = self.inner.splash_cancel.clone();
        let delay = self.inner.splash_delay;

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("splash timer cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    if let Some(inner) = weak.upgrade() {
                        inner.apply(|state| state.splash_done = true);
                    }
                }
            }
        });
    }

    /// Login/logout signal from a screen. Does not touch the store: callers
    /// persist or remove the token first.
    pub fn set_is_logged_in(&self, status: bool) -> Option<Screen> {
        self.inner.apply(|state| state.is_logged_in = status.into())
    }

    pub fn current_screen(&self) -> Option<Screen> {
        self.inner.mounted.lock().state.screen()
    }

    pub fn state(&self) -> BootstrapState {
        self.inner.mounted.lock().state
    }

    /// Receives every change of the mounted screen group.
    pub fn subscribe(&self) -> watch::Receiver<Option<Screen>> {
        self.inner.screen_tx.subscribe()
    }

    /// Resolves once the splash phase is over and a real group is mounted.
    pub async fn wait_past_splash(&self) -> Option<Screen> {
        let mut rx = self.subscribe();
        let result = rx
            .wait_for(|screen| matches!(screen, Some(s) if *s != Screen::Splash))
            .await
            .ok()
            .and_then(|screen| *screen);
        result
    }

    pub fn navigation(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.inner.navigator)
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.inner.notifier)
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.inner.store)
    }

    /// Cancels the pending splash timer, if any.
    pub fn shutdown(&self) {
        self.inner.splash_cancel.cancel();
    }
}

async fn read_or_absent(store: &dyn SessionStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("session store read of '{key}' failed, treating as absent: {err}");
            None
        }
    }
}
