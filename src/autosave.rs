//! Background autosave for a [`SharedStore`].
//!
//! Each tick takes a point-in-time copy of the document under the lock and
//! writes it on the blocking pool, so setters never wait on storage I/O.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error};

use crate::store::SharedStore;

pub struct AutoSaveHandle {
    task: JoinHandle<()>,
}

impl AutoSaveHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Start saving `store` every `interval` while it has unsaved changes.
/// Must be called from within a tokio runtime.
pub fn spawn(store: SharedStore, interval: Duration) -> AutoSaveHandle {
    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            save_if_dirty(&store).await;
        }
    });
    AutoSaveHandle { task }
}

/// Returns whether a save was committed.
pub async fn save_if_dirty(store: &SharedStore) -> bool {
    let pending = {
        let guard = store.lock();
        if !guard.is_dirty() {
            return false;
        }
        guard.prepare_save()
    };

    let written = tokio::task::spawn_blocking(move || pending.commit().map(|()| pending)).await;
    match written {
        Ok(Ok(pending)) => {
            store.lock().finish_save(pending.document());
            debug!("Autosaved settings to {}", pending.path().display());
            true
        }
        Ok(Err(e)) => {
            error!("Autosave failed: {}", e);
            false
        }
        Err(e) => {
            error!("Autosave task failed: {}", e);
            false
        }
    }
}
