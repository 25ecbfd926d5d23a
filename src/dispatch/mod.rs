// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Action dispatch manager
//!
//! Owns the single process-wide auto-dispatch countdown. Two states:
//! Idle (no countdown) and Counting (remaining >= 1, one decrement per
//! second). Scheduling while a countdown is live is a dropped no-op, not
//! a queue. Cancellation and the final tick contend on the same lock, so
//! once a cancel is accepted no further tick can emit. Explicit dispatch
//! bypasses the countdown entirely and never touches its state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::EventBus;

/// Action type emitted when a countdown elapses uncancelled.
pub const AUTO_DISPATCH: &str = "AUTO_DISPATCH";

/// Seconds in the undo window.
pub const DEFAULT_WINDOW_SECS: u32 = 7;

/// A dispatched operator action, broadcast to all observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub action_type: String,
    pub zone: String,
    pub note: String,
    pub t: i64,
}

impl Action {
    fn new(action_type: &str, zone: &str, note: &str) -> Self {
        Self {
            id: format!("act_{}", Uuid::new_v4()),
            action_type: action_type.to_string(),
            zone: zone.to_string(),
            note: note.to_string(),
            t: Utc::now().timestamp_millis(),
        }
    }
}

/// Observer view of a live countdown.
#[derive(Debug, Clone, Serialize)]
pub struct CountdownStatus {
    pub zone: String,
    pub remaining: u32,
}

struct Countdown {
    zone: String,
    remaining: u32,
    generation: u64,
    task: JoinHandle<()>,
}

struct Inner {
    countdown: Option<Countdown>,
    // bumped on every schedule so a stale tick task can never touch a
    // newer countdown
    generation: u64,
}

/// One-at-a-time cancellable auto-dispatch, plus immediate dispatch.
pub struct DispatchManager {
    events: Arc<EventBus>,
    inner: Arc<Mutex<Inner>>,
    window_secs: u32,
}

impl DispatchManager {
    pub fn new(events: Arc<EventBus>, window_secs: u32) -> Self {
        Self {
            events,
            inner: Arc::new(Mutex::new(Inner {
                countdown: None,
                generation: 0,
            })),
            window_secs,
        }
    }

    /// Start a countdown for `zone`. Returns false (and does nothing)
    /// when one is already live. Must be called from within a tokio
    /// runtime.
    pub fn schedule(&self, zone: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.countdown.is_some() {
            debug!(%zone, "auto-dispatch already counting, schedule dropped");
            return false;
        }

        inner.generation += 1;
        let generation = inner.generation;
        let task = tokio::spawn(run_countdown(
            self.inner.clone(),
            self.events.clone(),
            generation,
        ));
        inner.countdown = Some(Countdown {
            zone: zone.to_string(),
            remaining: self.window_secs,
            generation,
            task,
        });
        info!(%zone, window = self.window_secs, "auto-dispatch scheduled");
        true
    }

    /// Cancel the live countdown. No-op (false) when Idle. No action is
    /// emitted for a cancelled countdown.
    pub fn cancel(&self) -> bool {
        let taken = self.inner.lock().countdown.take();
        match taken {
            Some(cd) => {
                cd.task.abort();
                info!(zone = %cd.zone, "auto-dispatch cancelled");
                true
            }
            None => {
                debug!("cancel requested while idle, ignored");
                false
            }
        }
    }

    /// Build and broadcast an action immediately, countdown state
    /// untouched.
    pub fn trigger(&self, action_type: &str, zone: &str, note: &str) -> Action {
        let action = Action::new(action_type, zone, note);
        info!(id = %action.id, %action_type, %zone, "action dispatched");
        self.events.publish_action(action.clone());
        action
    }

    /// Snapshot of the live countdown, if any.
    pub fn status(&self) -> Option<CountdownStatus> {
        self.inner.lock().countdown.as_ref().map(|cd| CountdownStatus {
            zone: cd.zone.clone(),
            remaining: cd.remaining,
        })
    }
}

async fn run_countdown(inner: Arc<Mutex<Inner>>, events: Arc<EventBus>, generation: u64) {
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    // the first interval tick completes immediately; the countdown starts
    // one full second after scheduling
    tick.tick().await;

    loop {
        tick.tick().await;

        let mut guard = inner.lock();
        let Some(mut cd) = guard.countdown.take() else {
            // cancelled, stop silently
            return;
        };
        if cd.generation != generation {
            // a newer countdown took over, leave it alone
            guard.countdown = Some(cd);
            return;
        }

        cd.remaining -= 1;
        if cd.remaining == 0 {
            // elapsed: back to Idle, emit exactly one action
            let zone = cd.zone;
            drop(guard);
            let action = Action::new(AUTO_DISPATCH, &zone, "Auto-dispatch (undo window elapsed)");
            info!(id = %action.id, %zone, "auto-dispatch window elapsed");
            events.publish_action(action);
            return;
        }

        debug!(zone = %cd.zone, remaining = cd.remaining, "auto-dispatch tick");
        guard.countdown = Some(cd);
    }
}
