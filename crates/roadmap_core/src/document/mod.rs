//! Observable document contract.
//!
//! # Responsibility
//! - Describe the visible structure the tracker reads and mutates: tasks with
//!   status indicators and notes, stages with collapsible content.
//! - Define explicit presentation values rendered from tracked state.
//!
//! # Invariants
//! - The tracker never creates or destroys document elements.
//! - The document is ground truth for which tasks and stages exist.
//! - Operations addressing a missing element are no-ops.

mod memory;
mod presentation;

pub use memory::{DocumentLayout, MemoryDocument, StageLayout, TaskLayout};
pub use presentation::{NotesPanel, StagePresentation, StatusIndicator};

use crate::model::snapshot::{StageId, TaskId, TaskStatus};

/// Externally observable checklist structure.
pub trait Document {
    /// All task IDs in document order.
    fn task_ids(&self) -> Vec<TaskId>;
    /// All stage IDs in document order.
    fn stage_ids(&self) -> Vec<StageId>;
    /// Task IDs contained in one stage, in document order.
    fn stage_task_ids(&self, stage_id: &str) -> Vec<TaskId>;

    fn has_task(&self, task_id: &str) -> bool;
    fn has_stage(&self, stage_id: &str) -> bool;

    /// Status shown by the task's indicator.
    ///
    /// `None` when the task or its indicator is absent.
    fn task_status(&self, task_id: &str) -> Option<TaskStatus>;
    fn render_status(&mut self, task_id: &str, indicator: StatusIndicator);

    /// Current text of the task's notes input, `None` when it has none.
    fn notes_text(&self, task_id: &str) -> Option<String>;
    fn set_notes_text(&mut self, task_id: &str, text: &str);

    fn notes_panel(&self, task_id: &str) -> Option<NotesPanel>;
    fn set_notes_panel(&mut self, task_id: &str, panel: NotesPanel);
    /// Natural height of the notes area when fully shown.
    fn notes_content_height(&self, task_id: &str) -> Option<u32>;

    /// Turns the short attention pulse on a task on or off.
    fn set_pulse(&mut self, task_id: &str, active: bool);

    /// Collapsed flag of a stage, `None` when the stage is absent.
    fn stage_collapsed(&self, stage_id: &str) -> Option<bool>;
    fn render_stage(&mut self, stage_id: &str, presentation: StagePresentation);
    /// Natural height of a stage's content area.
    fn stage_content_height(&self, stage_id: &str) -> Option<u32>;

    fn set_overall_progress(&mut self, percent: u8);
    fn set_stage_progress(&mut self, stage_id: &str, percent: u8);
}
