//! Stage progression rules. Everything here works on rows already loaded in
//! memory; callers persist whatever the functions report as changed.

use serde::Serialize;
use uuid::Uuid;

use crate::models::timeline::{StageStatus, StageTask, TimelineStageRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

/// `round(100 * completed / total)`, or 0 for an empty list.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

pub fn progress(tasks: &[StageTask]) -> StageProgress {
    let completed = tasks.iter().filter(|t| t.completed).count();
    StageProgress {
        completed,
        total: tasks.len(),
        percentage: completion_percentage(completed, tasks.len()),
    }
}

fn set_status(stage: &mut TimelineStageRow, status: StageStatus, changed: &mut Vec<Uuid>) {
    if stage.status != status {
        stage.status = status;
        changed.push(stage.id);
    }
}

/// Flips one task. Returns the new completion flag, or `None` when `index`
/// is out of range.
pub fn toggle_task(stage: &mut TimelineStageRow, index: usize) -> Option<bool> {
    let task = stage.tasks.0.get_mut(index)?;
    task.completed = !task.completed;
    Some(task.completed)
}

/// After a toggle: a stage at 100% becomes completed and the next stage
/// starts if it has not started yet. Unchecking never reverts anything.
/// Returns the ids whose status changed.
pub fn auto_progress(stages: &mut [TimelineStageRow], stage_id: Uuid) -> Vec<Uuid> {
    let mut changed = Vec::new();
    let Some(idx) = stages.iter().position(|s| s.id == stage_id) else {
        return changed;
    };
    if progress(&stages[idx].tasks).percentage < 100 {
        return changed;
    }

    set_status(&mut stages[idx], StageStatus::Completed, &mut changed);
    let next_order = stages[idx].stage_order + 1;
    if let Some(next) = stages.iter_mut().find(|s| s.stage_order == next_order) {
        if next.status == StageStatus::NotStarted {
            set_status(next, StageStatus::InProgress, &mut changed);
        }
    }
    changed
}

/// Manual "mark complete" on stage `order`: every stage up to it is
/// completed and the one right after is in progress, whatever the tasks say.
/// Later stages are left alone.
pub fn mark_complete(stages: &mut [TimelineStageRow], order: i32) -> Vec<Uuid> {
    let mut changed = Vec::new();
    for stage in stages.iter_mut() {
        if stage.stage_order <= order {
            set_status(stage, StageStatus::Completed, &mut changed);
        } else if stage.stage_order == order + 1 {
            set_status(stage, StageStatus::InProgress, &mut changed);
        }
    }
    changed
}

/// The stage the user is working on: the first in progress, else the first
/// not started. `None` once everything is complete.
pub fn current_stage(stages: &[TimelineStageRow]) -> Option<&TimelineStageRow> {
    stages
        .iter()
        .find(|s| s.status == StageStatus::InProgress)
        .or_else(|| stages.iter().find(|s| s.status == StageStatus::NotStarted))
}
