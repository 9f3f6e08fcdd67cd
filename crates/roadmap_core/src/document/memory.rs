//! In-memory document built from a declarative layout.
//!
//! # Responsibility
//! - Hold the visible state of stages and tasks for embedding shells and tests.
//! - Allow structure drift (removing elements) between sessions.

use super::presentation::{NotesPanel, StagePresentation, StatusIndicator};
use super::Document;
use crate::model::snapshot::{StageId, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

const DEFAULT_STAGE_CONTENT_HEIGHT_PX: u32 = 480;
const DEFAULT_NOTES_HEIGHT_PX: u32 = 96;

/// Declarative document structure: stages in order, each holding tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLayout {
    #[serde(default)]
    pub stages: Vec<StageLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLayout {
    pub id: StageId,
    /// Collapsed state present in the markup before any state is applied.
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default = "default_stage_content_height")]
    pub content_height_px: u32,
    #[serde(default)]
    pub tasks: Vec<TaskLayout>,
}

impl StageLayout {
    pub fn new(id: impl Into<StageId>, tasks: Vec<TaskLayout>) -> Self {
        Self {
            id: id.into(),
            collapsed: false,
            content_height_px: DEFAULT_STAGE_CONTENT_HEIGHT_PX,
            tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLayout {
    pub id: TaskId,
    /// Status class present in the markup.
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "default_true")]
    pub has_indicator: bool,
    #[serde(default = "default_true")]
    pub has_notes: bool,
    /// Initial notes text in the markup.
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_notes_height")]
    pub notes_height_px: u32,
}

impl TaskLayout {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::NotStarted,
            has_indicator: true,
            has_notes: true,
            notes: String::new(),
            notes_height_px: DEFAULT_NOTES_HEIGHT_PX,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn without_notes(mut self) -> Self {
        self.has_notes = false;
        self
    }

    pub fn without_indicator(mut self) -> Self {
        self.has_indicator = false;
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_stage_content_height() -> u32 {
    DEFAULT_STAGE_CONTENT_HEIGHT_PX
}

fn default_notes_height() -> u32 {
    DEFAULT_NOTES_HEIGHT_PX
}

#[derive(Debug, Clone)]
struct TaskElement {
    id: TaskId,
    indicator: Option<StatusIndicator>,
    notes: Option<String>,
    notes_panel: NotesPanel,
    notes_height_px: u32,
    pulse: bool,
}

#[derive(Debug, Clone)]
struct StageElement {
    id: StageId,
    presentation: StagePresentation,
    content_height_px: u32,
    progress: Option<u8>,
    tasks: Vec<TaskElement>,
}

/// `Document` implementation kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    stages: Vec<StageElement>,
    overall_progress: Option<u8>,
}

impl MemoryDocument {
    pub fn from_layout(layout: &DocumentLayout) -> Self {
        let stages = layout
            .stages
            .iter()
            .map(|stage| StageElement {
                id: stage.id.clone(),
                presentation: if stage.collapsed {
                    StagePresentation::collapsed()
                } else {
                    StagePresentation::expanded(stage.content_height_px)
                },
                content_height_px: stage.content_height_px,
                progress: None,
                tasks: stage.tasks.iter().map(task_element).collect(),
            })
            .collect();
        Self {
            stages,
            overall_progress: None,
        }
    }

    /// Removes a task element; returns whether it existed.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        for stage in &mut self.stages {
            if let Some(index) = stage.tasks.iter().position(|task| task.id == task_id) {
                stage.tasks.remove(index);
                return true;
            }
        }
        false
    }

    /// Removes a stage element and its tasks; returns whether it existed.
    pub fn remove_stage(&mut self, stage_id: &str) -> bool {
        let before = self.stages.len();
        self.stages.retain(|stage| stage.id != stage_id);
        self.stages.len() != before
    }

    /// Changes a stage's natural content height (late-loading content).
    pub fn set_stage_content_height(&mut self, stage_id: &str, height_px: u32) {
        if let Some(stage) = self.stage_mut(stage_id) {
            stage.content_height_px = height_px;
        }
    }

    pub fn status_indicator(&self, task_id: &str) -> Option<StatusIndicator> {
        self.task(task_id).and_then(|task| task.indicator)
    }

    pub fn stage_presentation(&self, stage_id: &str) -> Option<StagePresentation> {
        self.stage(stage_id).map(|stage| stage.presentation)
    }

    pub fn pulse_active(&self, task_id: &str) -> bool {
        self.task(task_id).is_some_and(|task| task.pulse)
    }

    pub fn overall_progress(&self) -> Option<u8> {
        self.overall_progress
    }

    pub fn stage_progress(&self, stage_id: &str) -> Option<u8> {
        self.stage(stage_id).and_then(|stage| stage.progress)
    }

    fn stage(&self, stage_id: &str) -> Option<&StageElement> {
        self.stages.iter().find(|stage| stage.id == stage_id)
    }

    fn stage_mut(&mut self, stage_id: &str) -> Option<&mut StageElement> {
        self.stages.iter_mut().find(|stage| stage.id == stage_id)
    }

    fn task(&self, task_id: &str) -> Option<&TaskElement> {
        self.stages
            .iter()
            .flat_map(|stage| stage.tasks.iter())
            .find(|task| task.id == task_id)
    }

    fn task_mut(&mut self, task_id: &str) -> Option<&mut TaskElement> {
        self.stages
            .iter_mut()
            .flat_map(|stage| stage.tasks.iter_mut())
            .find(|task| task.id == task_id)
    }
}

fn task_element(layout: &TaskLayout) -> TaskElement {
    TaskElement {
        id: layout.id.clone(),
        indicator: layout
            .has_indicator
            .then(|| StatusIndicator::for_status(layout.status)),
        notes: layout.has_notes.then(|| layout.notes.clone()),
        notes_panel: NotesPanel::Hidden,
        notes_height_px: layout.notes_height_px,
        pulse: false,
    }
}

impl Document for MemoryDocument {
    fn task_ids(&self) -> Vec<TaskId> {
        self.stages
            .iter()
            .flat_map(|stage| stage.tasks.iter().map(|task| task.id.clone()))
            .collect()
    }

    fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|stage| stage.id.clone()).collect()
    }

    fn stage_task_ids(&self, stage_id: &str) -> Vec<TaskId> {
        self.stage(stage_id)
            .map(|stage| stage.tasks.iter().map(|task| task.id.clone()).collect())
            .unwrap_or_default()
    }

    fn has_task(&self, task_id: &str) -> bool {
        self.task(task_id).is_some()
    }

    fn has_stage(&self, stage_id: &str) -> bool {
        self.stage(stage_id).is_some()
    }

    fn task_status(&self, task_id: &str) -> Option<TaskStatus> {
        self.status_indicator(task_id)
            .map(|indicator| indicator.status)
    }

    fn render_status(&mut self, task_id: &str, indicator: StatusIndicator) {
        if let Some(task) = self.task_mut(task_id) {
            if task.indicator.is_some() {
                task.indicator = Some(indicator);
            }
        }
    }

    fn notes_text(&self, task_id: &str) -> Option<String> {
        self.task(task_id).and_then(|task| task.notes.clone())
    }

    fn set_notes_text(&mut self, task_id: &str, text: &str) {
        if let Some(notes) = self.task_mut(task_id).and_then(|task| task.notes.as_mut()) {
            text.clone_into(notes);
        }
    }

    fn notes_panel(&self, task_id: &str) -> Option<NotesPanel> {
        self.task(task_id).map(|task| task.notes_panel)
    }

    fn set_notes_panel(&mut self, task_id: &str, panel: NotesPanel) {
        if let Some(task) = self.task_mut(task_id) {
            task.notes_panel = panel;
        }
    }

    fn notes_content_height(&self, task_id: &str) -> Option<u32> {
        self.task(task_id).map(|task| task.notes_height_px)
    }

    fn set_pulse(&mut self, task_id: &str, active: bool) {
        if let Some(task) = self.task_mut(task_id) {
            task.pulse = active;
        }
    }

    fn stage_collapsed(&self, stage_id: &str) -> Option<bool> {
        self.stage(stage_id)
            .map(|stage| stage.presentation.collapsed)
    }

    fn render_stage(&mut self, stage_id: &str, presentation: StagePresentation) {
        if let Some(stage) = self.stage_mut(stage_id) {
            stage.presentation = presentation;
        }
    }

    fn stage_content_height(&self, stage_id: &str) -> Option<u32> {
        self.stage(stage_id).map(|stage| stage.content_height_px)
    }

    fn set_overall_progress(&mut self, percent: u8) {
        self.overall_progress = Some(percent);
    }

    fn set_stage_progress(&mut self, stage_id: &str, percent: u8) {
        if let Some(stage) = self.stage_mut(stage_id) {
            stage.progress = Some(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentLayout, MemoryDocument, StageLayout, TaskLayout};
    use crate::document::Document;
    use crate::model::snapshot::TaskStatus;

    #[test]
    fn layout_json_fills_defaults() {
        let layout: DocumentLayout = serde_json::from_str(
            r#"{"stages": [{"id": "s1", "tasks": [{"id": "t1"}, {"id": "t2", "has_notes": false}]}]}"#,
        )
        .unwrap();
        let doc = MemoryDocument::from_layout(&layout);

        assert_eq!(doc.task_ids(), vec!["t1".to_string(), "t2".to_string()]);
        assert_eq!(doc.task_status("t1"), Some(TaskStatus::NotStarted));
        assert_eq!(doc.notes_text("t1").as_deref(), Some(""));
        assert_eq!(doc.notes_text("t2"), None);
        assert_eq!(doc.stage_collapsed("s1"), Some(false));
    }

    #[test]
    fn removing_elements_hides_them_from_queries() {
        let layout = DocumentLayout {
            stages: vec![StageLayout::new(
                "s1",
                vec![TaskLayout::new("a"), TaskLayout::new("b")],
            )],
        };
        let mut doc = MemoryDocument::from_layout(&layout);

        assert!(doc.remove_task("a"));
        assert!(!doc.remove_task("a"));
        assert_eq!(doc.stage_task_ids("s1"), vec!["b".to_string()]);

        assert!(doc.remove_stage("s1"));
        assert!(doc.task_ids().is_empty());
        assert!(!doc.has_task("b"));
    }
}
