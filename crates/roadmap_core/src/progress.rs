//! Completion aggregation.
//!
//! # Responsibility
//! - Compute completion percentages from what the document currently shows.
//! - Publish overall and per-stage percentages to the document.
//!
//! # Invariants
//! - Reads the document, never the snapshot, so unsaved changes count.
//! - An empty task set yields 0, never a division by zero.

use crate::document::Document;
use crate::model::snapshot::TaskStatus;

/// Rounds `completed / total` to the nearest whole percent, halves up.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (completed.min(total) * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}

/// Overall completion over every task in the document.
pub fn compute<D: Document + ?Sized>(document: &D) -> u8 {
    percent_of(document, &document.task_ids())
}

/// Completion over the tasks of one stage.
pub fn compute_stage<D: Document + ?Sized>(document: &D, stage_id: &str) -> u8 {
    percent_of(document, &document.stage_task_ids(stage_id))
}

/// Recomputes overall and per-stage progress and writes both displays.
///
/// Returns the overall percentage.
pub fn refresh<D: Document + ?Sized>(document: &mut D) -> u8 {
    let overall = compute(&*document);
    document.set_overall_progress(overall);
    for stage_id in document.stage_ids() {
        let percent = compute_stage(&*document, &stage_id);
        document.set_stage_progress(&stage_id, percent);
    }
    overall
}

fn percent_of<D: Document + ?Sized>(document: &D, task_ids: &[String]) -> u8 {
    let completed = task_ids
        .iter()
        .filter(|task_id| document.task_status(task_id) == Some(TaskStatus::Completed))
        .count();
    completion_percent(completed, task_ids.len())
}

#[cfg(test)]
mod tests {
    use super::{completion_percent, compute, compute_stage, refresh};
    use crate::document::{DocumentLayout, MemoryDocument, StageLayout, TaskLayout};
    use crate::model::snapshot::TaskStatus;

    fn doc_with(statuses: &[TaskStatus]) -> MemoryDocument {
        let tasks = statuses
            .iter()
            .enumerate()
            .map(|(index, status)| TaskLayout::new(format!("t{index}")).with_status(*status))
            .collect();
        MemoryDocument::from_layout(&DocumentLayout {
            stages: vec![StageLayout::new("s1", tasks)],
        })
    }

    #[test]
    fn percentages_match_reference_cases() {
        use TaskStatus::{Completed, InProgress, NotStarted};

        assert_eq!(compute(&doc_with(&[Completed, NotStarted, InProgress, NotStarted])), 25);
        assert_eq!(compute(&doc_with(&[])), 0);
        assert_eq!(compute(&doc_with(&[Completed, Completed, Completed])), 100);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(completion_percent(1, 8), 13);
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(0, 0), 0);
    }

    #[test]
    fn refresh_publishes_overall_and_stage_progress() {
        let mut doc = MemoryDocument::from_layout(&DocumentLayout {
            stages: vec![
                StageLayout::new(
                    "done",
                    vec![TaskLayout::new("a").with_status(TaskStatus::Completed)],
                ),
                StageLayout::new("todo", vec![TaskLayout::new("b")]),
                StageLayout::new("empty", Vec::new()),
            ],
        });

        assert_eq!(refresh(&mut doc), 50);
        assert_eq!(doc.overall_progress(), Some(50));
        assert_eq!(doc.stage_progress("done"), Some(100));
        assert_eq!(doc.stage_progress("todo"), Some(0));
        assert_eq!(doc.stage_progress("empty"), Some(0));
        assert_eq!(compute_stage(&doc, "missing"), 0);
    }
}
