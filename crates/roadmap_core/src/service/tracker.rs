//! Tracker service: the single owner of document, snapshot and store.
//!
//! # Responsibility
//! - Run startup reconciliation (load, apply, progress).
//! - Implement status cycling, stage toggling, notes visibility and notes
//!   editing.
//! - Drive deferred work and the debounced save from `advance(now)`.
//!
//! # Invariants
//! - Every state-changing interaction requests a save; none writes directly.
//! - A save always re-derives the snapshot from the document first.
//! - Notes visibility is never persisted.

use crate::config::TrackerConfig;
use crate::document::{Document, NotesPanel, StagePresentation, StatusIndicator};
use crate::model::snapshot::{Snapshot, StageId, TaskId, TaskStatus};
use crate::progress;
use crate::reconcile::{DriftReport, LoadOutcome, Reconciler};
use crate::schedule::debounce::Debouncer;
use crate::schedule::timer::TimerQueue;
use crate::service::events::{ClickTarget, UiEvent};
use crate::store::kv::KeyValueStore;
use crate::store::snapshot_store::SnapshotStore;
use log::{debug, info, warn};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Deferred {
    EndPulse(TaskId),
    RemeasureStage(StageId),
}

/// Result of `Tracker::start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    pub load: LoadOutcome,
    pub drift: DriftReport,
    pub progress: u8,
}

/// Progress tracker over one document and one persisted slot.
pub struct Tracker<D: Document, S: KeyValueStore> {
    config: TrackerConfig,
    document: D,
    store: SnapshotStore<S>,
    reconciler: Reconciler,
    save_debounce: Debouncer,
    timers: TimerQueue<Deferred>,
    progress: u8,
}

impl<D: Document, S: KeyValueStore> Tracker<D, S> {
    pub fn new(document: D, backend: S, config: TrackerConfig) -> Self {
        let store = SnapshotStore::new(backend, config.storage_key.clone());
        let save_debounce = Debouncer::new(config.save_debounce);
        Self {
            config,
            document,
            store,
            reconciler: Reconciler::new(),
            save_debounce,
            timers: TimerQueue::new(),
            progress: 0,
        }
    }

    /// Loads or defaults the snapshot, applies it, and computes progress.
    pub fn start(&mut self) -> StartReport {
        let load = self.reconciler.load(&self.document, &mut self.store);
        let drift = self
            .reconciler
            .apply(&mut self.document, self.config.expanded_on_load_max_height_px);
        let progress = self.refresh_progress();
        info!(
            "event=tracker_start module=service status=ok load={:?} purged_tasks={} purged_stages={} progress={}",
            load,
            drift.purged_tasks.len(),
            drift.purged_stages.len(),
            progress
        );
        StartReport {
            load,
            drift,
            progress,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Direct document access for shells that mutate structure.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.reconciler.snapshot()
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    /// Last published overall completion percentage.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn save_pending(&self) -> bool {
        self.save_debounce.is_pending()
    }

    /// Earliest instant at which `advance` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.timers.next_deadline(), self.save_debounce.deadline()) {
            (Some(timer), Some(save)) => Some(timer.min(save)),
            (timer, save) => timer.or(save),
        }
    }

    /// Routes one user interaction to its handler.
    ///
    /// Returns `false` when the event was not addressed to the tracker.
    pub fn handle(&mut self, event: UiEvent, now: Instant) -> bool {
        match event {
            UiEvent::Click(ClickTarget::StageToggle { stage_id }) => {
                self.toggle_stage(stage_id.as_deref(), now);
                true
            }
            UiEvent::Click(ClickTarget::StageHeader {
                stage_id,
                on_other_control: false,
            }) => {
                self.toggle_stage(stage_id.as_deref(), now);
                true
            }
            UiEvent::Click(ClickTarget::NotesToggle { task_id }) => {
                self.toggle_notes(task_id.as_deref());
                true
            }
            UiEvent::Click(ClickTarget::CycleStatus { task_id }) => {
                self.cycle_status(task_id.as_deref(), now);
                true
            }
            UiEvent::Click(ClickTarget::StageHeader { .. } | ClickTarget::Other) => false,
            UiEvent::NotesInput { task_id, text } => {
                self.on_notes_input(task_id.as_deref(), &text, now);
                true
            }
            UiEvent::NotesTransitionEnd { task_id } => {
                self.notes_transition_end(&task_id);
                true
            }
        }
    }

    /// Advances a task to its next status.
    ///
    /// Returns the new status, or `None` when the task or its indicator
    /// cannot be resolved.
    pub fn cycle_status(&mut self, task_id: Option<&str>, now: Instant) -> Option<TaskStatus> {
        let task_id = task_id?;
        let current = self.document.task_status(task_id)?;
        let next = current.next();

        self.document
            .render_status(task_id, StatusIndicator::for_status(next));
        if !self.reconciler.set_task_status(task_id, next) {
            warn!(
                "event=state_recovered module=service status=created kind=task id={task_id} trigger=cycle"
            );
        }

        self.document.set_pulse(task_id, true);
        self.timers.schedule(
            now,
            self.config.pulse_duration,
            Deferred::EndPulse(task_id.to_string()),
        );

        debug!("event=task_cycle module=service status=ok id={task_id} from={current} to={next}");
        self.request_save(now);
        self.refresh_progress();
        Some(next)
    }

    /// Flips a stage between collapsed and expanded.
    ///
    /// Returns the new collapsed flag, or `None` when the stage is unknown.
    pub fn toggle_stage(&mut self, stage_id: Option<&str>, now: Instant) -> Option<bool> {
        let stage_id = stage_id?;
        let collapsed = !self.document.stage_collapsed(stage_id)?;

        if collapsed {
            self.document
                .render_stage(stage_id, StagePresentation::collapsed());
        } else {
            let height = self.document.stage_content_height(stage_id).unwrap_or(0);
            self.document
                .render_stage(stage_id, StagePresentation::expanded(height));
            self.timers.schedule(
                now,
                self.config.stage_remeasure_delay,
                Deferred::RemeasureStage(stage_id.to_string()),
            );
        }

        if !self.reconciler.set_stage_collapsed(stage_id, collapsed) {
            warn!(
                "event=state_recovered module=service status=created kind=stage id={stage_id} trigger=toggle"
            );
        }

        self.request_save(now);
        Some(collapsed)
    }

    /// Shows or hides a task's notes area. Visual only.
    pub fn toggle_notes(&mut self, task_id: Option<&str>) -> Option<NotesPanel> {
        let task_id = task_id?;
        let panel = match self.document.notes_panel(task_id)? {
            NotesPanel::Hidden => NotesPanel::Shown {
                max_height_px: self.document.notes_content_height(task_id).unwrap_or(0),
            },
            NotesPanel::Shown { .. } | NotesPanel::Hiding => NotesPanel::Hiding,
        };
        self.document.set_notes_panel(task_id, panel);
        Some(panel)
    }

    /// Finishes a hide transition if the panel is still hiding.
    pub fn notes_transition_end(&mut self, task_id: &str) {
        if self.document.notes_panel(task_id) == Some(NotesPanel::Hiding) {
            self.document.set_notes_panel(task_id, NotesPanel::Hidden);
        }
    }

    /// Records a keystroke in a task's notes field.
    ///
    /// The text always lands in the field; tracked state and a save request
    /// follow only for tasks already in the snapshot.
    pub fn on_notes_input(&mut self, task_id: Option<&str>, text: &str, now: Instant) -> bool {
        let Some(task_id) = task_id else {
            return false;
        };
        self.document.set_notes_text(task_id, text);
        if !self.reconciler.set_task_notes(task_id, text) {
            debug!("event=notes_input module=service status=ignored id={task_id}");
            return false;
        }
        self.request_save(now);
        true
    }

    /// Schedules a save, replacing any pending one.
    pub fn request_save(&mut self, now: Instant) {
        self.save_debounce.request(now);
    }

    /// Runs deferred work that is due at `now`.
    ///
    /// Returns `true` when a save was attempted and succeeded.
    pub fn advance(&mut self, now: Instant) -> bool {
        for deferred in self.timers.pop_due(now) {
            match deferred {
                Deferred::EndPulse(task_id) => self.document.set_pulse(&task_id, false),
                Deferred::RemeasureStage(stage_id) => self.remeasure_stage(&stage_id),
            }
        }

        if self.save_debounce.poll(now) {
            return self.save_now();
        }
        false
    }

    /// Performs a pending save immediately, e.g. before the process exits.
    ///
    /// Returns `true` when a pending save was written.
    pub fn flush(&mut self) -> bool {
        if !self.save_debounce.take_pending() {
            return false;
        }
        self.save_now()
    }

    fn save_now(&mut self) -> bool {
        let snapshot = self.reconciler.capture_for_save(&self.document);
        self.store.save(snapshot)
    }

    fn remeasure_stage(&mut self, stage_id: &str) {
        if self.document.stage_collapsed(stage_id) != Some(false) {
            return;
        }
        if let Some(height) = self.document.stage_content_height(stage_id) {
            self.document
                .render_stage(stage_id, StagePresentation::expanded(height));
        }
    }

    fn refresh_progress(&mut self) -> u8 {
        self.progress = progress::refresh(&mut self.document);
        self.progress
    }
}
