//! CLI driver for the roadmap tracker.
//!
//! # Responsibility
//! - Load a document layout and a SQLite-backed snapshot slot.
//! - Perform at most one interaction, flush the save, print progress.
//!
//! Usage:
//! `roadmap_cli <layout.json> <state.db> [cycle <task> | toggle <stage> | notes <task> <text>]`
//!
//! Set `ROADMAP_LOG_DIR` to an absolute path to enable file logging.

use log::warn;
use roadmap_core::{
    core_version, default_log_level, init_logging, Document, DocumentLayout, KeyValueStore,
    MemoryDocument, SqliteKeyValueStore, Tracker, TrackerConfig, UiEvent,
};
use std::error::Error;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("roadmap_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("ROADMAP_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("roadmap_cli: logging disabled: {err}");
        }
    }

    let [layout_path, db_path, action @ ..] = args.as_slice() else {
        return Err(format!(
            "roadmap_cli {}\nusage: roadmap_cli <layout.json> <state.db> [cycle <task> | toggle <stage> | notes <task> <text>]",
            core_version()
        )
        .into());
    };

    let layout: DocumentLayout = serde_json::from_str(&std::fs::read_to_string(layout_path)?)?;
    let store = SqliteKeyValueStore::open(db_path)?;
    let mut tracker = Tracker::new(
        MemoryDocument::from_layout(&layout),
        store,
        TrackerConfig::default(),
    );
    let report = tracker.start();
    for task_id in &report.drift.purged_tasks {
        warn!("event=cli_drift module=cli status=purged kind=task id={task_id}");
    }

    let now = Instant::now();
    match action {
        [] => {}
        [verb, task_id] if verb == "cycle" => {
            tracker
                .cycle_status(Some(task_id.as_str()), now)
                .ok_or_else(|| format!("unknown task `{task_id}`"))?;
        }
        [verb, stage_id] if verb == "toggle" => {
            tracker
                .toggle_stage(Some(stage_id.as_str()), now)
                .ok_or_else(|| format!("unknown stage `{stage_id}`"))?;
        }
        [verb, task_id, text @ ..] if verb == "notes" => {
            tracker.handle(
                UiEvent::NotesInput {
                    task_id: Some(task_id.clone()),
                    text: text.join(" "),
                },
                now,
            );
        }
        other => return Err(format!("unrecognized action `{}`", other.join(" ")).into()),
    }
    flush_pending_save(&mut tracker)?;

    let document = tracker.document();
    for stage_id in document.stage_ids() {
        let marker = if document.stage_collapsed(&stage_id) == Some(true) {
            "+"
        } else {
            "-"
        };
        println!(
            "{marker} {stage_id} {}%",
            document.stage_progress(&stage_id).unwrap_or(0)
        );
        for task_id in document.stage_task_ids(&stage_id) {
            let status = document.task_status(&task_id).unwrap_or_default();
            println!("    [{status}] {task_id}");
        }
    }
    println!("overall {}%", tracker.progress());
    Ok(())
}

/// Writes any pending save; a failed final write is an error.
fn flush_pending_save<D: Document, S: KeyValueStore>(
    tracker: &mut Tracker<D, S>,
) -> Result<(), String> {
    if tracker.save_pending() && !tracker.flush() {
        return Err("failed to persist roadmap state; see log for details".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::flush_pending_save;
    use roadmap_core::{
        DocumentLayout, MemoryDocument, MemoryKeyValueStore, StageLayout, TaskLayout, Tracker,
        TrackerConfig,
    };
    use std::time::Instant;

    fn tracker(backend: MemoryKeyValueStore) -> Tracker<MemoryDocument, MemoryKeyValueStore> {
        let layout = DocumentLayout {
            stages: vec![StageLayout::new("s1", vec![TaskLayout::new("t1")])],
        };
        let mut tracker = Tracker::new(
            MemoryDocument::from_layout(&layout),
            backend,
            TrackerConfig::default(),
        );
        tracker.start();
        tracker
    }

    #[test]
    fn nothing_pending_is_not_an_error() {
        let mut tracker = tracker(MemoryKeyValueStore::new());
        assert_eq!(flush_pending_save(&mut tracker), Ok(()));
    }

    #[test]
    fn successful_final_write_is_ok() {
        let mut tracker = tracker(MemoryKeyValueStore::new());
        tracker.cycle_status(Some("t1"), Instant::now());
        assert_eq!(flush_pending_save(&mut tracker), Ok(()));
        assert_eq!(tracker.store().backend().write_count(), 1);
    }

    #[test]
    fn failed_final_write_is_reported() {
        let mut tracker = tracker(MemoryKeyValueStore::with_quota(8));
        tracker.cycle_status(Some("t1"), Instant::now());
        let err = flush_pending_save(&mut tracker).unwrap_err();
        assert!(err.contains("failed to persist"));
    }
}
