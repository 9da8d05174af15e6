//! ``src/tasks/intake_task.rs``
//! ============================================================================
//! # Intake Task: background file reads for the staging area
//!
//! Metadata and content sniffing happen off the event loop. The finished
//! batch comes back as a single [`TaskResult::FilesRead`] and is staged on
//! the main task, so the store is still only mutated one event at a time.
//! Each result carries the generation of the form that asked for it.

use std::{path::PathBuf, time::Instant};

use stagr::IntakeSource;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{Instrument, info, info_span, warn};

use crate::{controller::event_loop::TaskResult, fs::intake};

/// Read `paths` and report back on `task_tx`.
pub fn spawn_intake(
    task_tx: UnboundedSender<TaskResult>,
    generation: u64,
    source: IntakeSource,
    paths: Vec<PathBuf>,
) -> JoinHandle<()> {
    let span = info_span!("intake_task", generation, %source, paths = paths.len());

    tokio::spawn(
        async move {
            let started = Instant::now();
            let outcome = intake::read_files(paths).await;

            info!(
                files = outcome.files.len(),
                failures = outcome.failures.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "intake read complete"
            );

            if task_tx
                .send(TaskResult::FilesRead {
                    generation,
                    source,
                    outcome,
                })
                .is_err()
            {
                warn!("event loop gone, intake result dropped");
            }
        }
        .instrument(span),
    )
}

/// Resolve dropped text into paths, then read them like [`spawn_intake`].
pub fn spawn_drop_intake(
    task_tx: UnboundedSender<TaskResult>,
    generation: u64,
    text: String,
) -> JoinHandle<()> {
    let span = info_span!("drop_intake", generation, bytes = text.len());

    tokio::spawn(
        async move {
            let paths = intake::resolve_paste(&text).await;
            let outcome = intake::read_files(paths).await;

            if task_tx
                .send(TaskResult::FilesRead {
                    generation,
                    source: IntakeSource::Drop,
                    outcome,
                })
                .is_err()
            {
                warn!("event loop gone, drop result dropped");
            }
        }
        .instrument(span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn reports_back_on_channel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("a.pdf");
        std::fs::write(&file, b"%PDF-1.7\n").expect("write");

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_drop_intake(tx, 7, format!("'{}'", file.display()))
            .await
            .expect("task completes");

        match rx.recv().await {
            Some(TaskResult::FilesRead {
                generation,
                source,
                outcome,
            }) => {
                assert_eq!(generation, 7);
                assert_eq!(source, IntakeSource::Drop);
                assert_eq!(outcome.files.len(), 1);
                assert_eq!(outcome.files[0].mime_type, "application/pdf");
            }
            None => panic!("no result"),
        }
    }
}
