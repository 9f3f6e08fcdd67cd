//! User interaction events delivered by the embedding shell.
//!
//! Target resolution is the shell's job: an event carries the task or stage
//! ID found by walking up from the clicked element, or `None` when the walk
//! found nothing.

use crate::model::snapshot::{StageId, TaskId};

/// Element a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// The stage's dedicated expand/collapse button (or its icon).
    StageToggle { stage_id: Option<StageId> },
    /// Anywhere in a stage header.
    StageHeader {
        stage_id: Option<StageId>,
        /// Click landed on a link or another button inside the header.
        on_other_control: bool,
    },
    /// A task's show/hide notes button.
    NotesToggle { task_id: Option<TaskId> },
    /// A task's status cycling control.
    CycleStatus { task_id: Option<TaskId> },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click(ClickTarget),
    /// Keystroke in a task's notes field; `text` is the field's full value.
    NotesInput { task_id: Option<TaskId>, text: String },
    /// The notes area height transition finished.
    NotesTransitionEnd { task_id: TaskId },
}
