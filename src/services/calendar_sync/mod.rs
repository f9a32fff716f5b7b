//! Two-way merge between the local calendar and a remote provider.
//!
//! The merge runs on a worker thread. It never touches the database: the
//! main thread snapshots the local events, the worker computes what to
//! import and pushes local-only events to the provider, and the result comes
//! back as a [`ThreadedEvent::CalendarSynced`] which the main thread applies.
//! Failures are logged and produce no event.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::events::{ThreadedEvent, ThreadedSender};
use crate::models::calendar_event::CalendarEvent;
use crate::models::user::User;

/// The only thing the sync and sign-in workers need from a calendar backend.
#[cfg_attr(test, mockall::automock)]
pub trait CalendarProvider: Send + Sync {
    /// Sign in, optionally as a specific account.
    fn authenticate(&self, email: Option<String>) -> Result<User>;
    fn fetch_events(&self, user: &User) -> Result<Vec<CalendarEvent>>;
    fn insert_event(&self, user: &User, event: &CalendarEvent) -> Result<()>;
}

/// Provider used when no calendar backend is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedProvider;

impl CalendarProvider for DisconnectedProvider {
    fn authenticate(&self, _email: Option<String>) -> Result<User> {
        anyhow::bail!("no calendar provider configured")
    }

    fn fetch_events(&self, _user: &User) -> Result<Vec<CalendarEvent>> {
        anyhow::bail!("no calendar provider configured")
    }

    fn insert_event(&self, _user: &User, _event: &CalendarEvent) -> Result<()> {
        anyhow::bail!("no calendar provider configured")
    }
}

/// Outcome of one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Remote events missing locally; the main thread stores them.
    pub imported: Vec<CalendarEvent>,
    /// Number of local events that were pushed to the provider.
    pub pushed: usize,
}

/// Remote-only events are imported, local-only events are pushed. Events
/// are matched with [`CalendarEvent::same_entry`].
pub fn merge(
    provider: &dyn CalendarProvider,
    user: &User,
    local: &[CalendarEvent],
) -> Result<SyncSummary> {
    let remote = provider
        .fetch_events(user)
        .with_context(|| format!("Failed to fetch events for {}", user.email))?;

    let imported: Vec<CalendarEvent> = remote
        .iter()
        .filter(|r| !local.iter().any(|l| l.same_entry(r)))
        .map(|r| CalendarEvent { id: None, ..r.clone() })
        .collect();

    let mut pushed = 0;
    for event in local.iter().filter(|l| !remote.iter().any(|r| r.same_entry(l))) {
        provider
            .insert_event(user, event)
            .with_context(|| format!("Failed to push '{}'", event.description))?;
        pushed += 1;
    }

    Ok(SyncSummary { imported, pushed })
}

#[derive(Clone)]
pub struct CalendarSyncManager {
    provider: Arc<dyn CalendarProvider>,
}

impl std::fmt::Debug for CalendarSyncManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarSyncManager").finish_non_exhaustive()
    }
}

impl CalendarSyncManager {
    pub fn new(provider: Arc<dyn CalendarProvider>) -> Self {
        Self { provider }
    }

    /// Run [`merge`] off the main thread and hand the summary back through
    /// `sender`. There is no cancellation; overlapping syncs may both report.
    pub fn sync_in_background(
        &self,
        user: User,
        local: Vec<CalendarEvent>,
        sender: ThreadedSender,
    ) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        thread::spawn(move || match merge(provider.as_ref(), &user, &local) {
            Ok(summary) => {
                log::info!(
                    "Calendar sync for {}: {} imported, {} pushed",
                    user.email,
                    summary.imported.len(),
                    summary.pushed
                );
                sender.enqueue_threaded_event(ThreadedEvent::CalendarSynced(summary));
            }
            Err(err) => log::error!("Calendar sync failed: {:#}", err),
        })
    }
}
