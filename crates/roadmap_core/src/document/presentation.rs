//! Rendering of tracked state into visual presentation values.

use crate::model::snapshot::TaskStatus;

/// Visible status marker of a task: state class, icon and accessible label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    pub status: TaskStatus,
    pub icon_class: &'static str,
    pub title: &'static str,
}

impl StatusIndicator {
    pub fn for_status(status: TaskStatus) -> Self {
        let (icon_class, title) = match status {
            TaskStatus::NotStarted => ("far fa-circle", "Not Started"),
            TaskStatus::InProgress => ("fas fa-circle-notch fa-spin", "In Progress"),
            TaskStatus::Completed => ("fas fa-check-circle", "Completed"),
        };
        Self {
            status,
            icon_class,
            title,
        }
    }
}

/// Collapse/expand rendering of a stage's content area and chevron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePresentation {
    pub collapsed: bool,
    pub max_height_px: u32,
    /// Vertical padding forced to zero while collapsed.
    pub padding_collapsed: bool,
    pub chevron_rotation_deg: i16,
}

impl StagePresentation {
    pub fn collapsed() -> Self {
        Self {
            collapsed: true,
            max_height_px: 0,
            padding_collapsed: true,
            chevron_rotation_deg: -90,
        }
    }

    pub fn expanded(max_height_px: u32) -> Self {
        Self {
            collapsed: false,
            max_height_px,
            padding_collapsed: false,
            chevron_rotation_deg: 0,
        }
    }
}

/// Visibility of a task's notes area.
///
/// Never persisted; every load starts from `Hidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotesPanel {
    #[default]
    Hidden,
    /// Visible, height transitioned to the content height.
    Shown { max_height_px: u32 },
    /// Height transitioning to zero; becomes `Hidden` on transition end.
    Hiding,
}
