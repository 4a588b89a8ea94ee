use crate::error::CoreError;
use crate::models::{DueValue, SchedulingDecision, Task, TaskSelector, TaskUpdate};
use crate::scheduler::{DueDateScheduler, LocalNow};
use crate::service::TaskService;
use chrono::TimeZone;
use chrono_tz::Tz;
use tracing::{debug, info, warn};

/// Whether a pass writes its decisions back to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    Apply,
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Update accepted by the service. `verified` is false when the returned
    /// record does not carry the due value that was sent.
    Moved {
        from: DueValue,
        to: DueValue,
        verified: bool,
    },
    /// Would be moved, but the pass ran in dry-run mode.
    Planned { from: DueValue, to: DueValue },
    /// Due, but already sits on the value a reschedule would produce.
    Unchanged(DueValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task_id: String,
    pub task_name: String,
    pub outcome: Outcome,
}

/// Record dropped from the pass because its dates could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub task_id: String,
    pub task_name: String,
    pub reason: String,
}

/// Decisions for every readable task, due or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub fetched: usize,
    pub skipped: Vec<SkippedTask>,
    pub decisions: Vec<SchedulingDecision>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub fetched: usize,
    pub skipped: Vec<SkippedTask>,
    pub outcomes: Vec<TaskOutcome>,
}

impl PassReport {
    pub fn due(&self) -> usize {
        self.outcomes.len()
    }

    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Moved { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Planned { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged(_)))
    }

    pub fn unverified(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Moved { verified: false, .. }))
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|t| predicate(&t.outcome)).count()
    }
}

/// One fetch, filter, reschedule and update sweep over a task selector.
///
/// Tasks are processed sequentially. The first failed update aborts the pass
/// and is returned as-is; rerunning is safe because due status is derived
/// again from the service's current state.
pub struct RolloverPass<'a, S, Z: TimeZone = Tz> {
    service: &'a S,
    scheduler: &'a DueDateScheduler<Z>,
}

impl<'a, S: TaskService, Z: TimeZone> RolloverPass<'a, S, Z> {
    pub fn new(service: &'a S, scheduler: &'a DueDateScheduler<Z>) -> Self {
        Self { service, scheduler }
    }

    /// Evaluates every readable task without touching the service's data.
    pub async fn plan(&self, selector: &TaskSelector, now: LocalNow) -> Result<Plan, CoreError> {
        let mut report = PassReport::default();
        let tasks = self.fetch(selector, &mut report).await?;

        Ok(Plan {
            fetched: report.fetched,
            skipped: report.skipped,
            decisions: tasks
                .iter()
                .map(|task| self.scheduler.decide(task, &now))
                .collect(),
        })
    }

    pub async fn run(
        &self,
        selector: &TaskSelector,
        now: LocalNow,
        mode: PassMode,
    ) -> Result<PassReport, CoreError> {
        let mut report = PassReport::default();
        let tasks = self.fetch(selector, &mut report).await?;

        for task in self.scheduler.filter_due(&tasks, &now) {
            let Some(from) = task.due() else {
                continue;
            };
            let to = self.scheduler.reschedule(task, &now);

            let outcome = if from == to {
                debug!(task.id = %task.id, task.name = %task.name, due = %to, "Task already due tomorrow.");
                Outcome::Unchanged(to)
            } else {
                match mode {
                    PassMode::DryRun => {
                        info!(task.id = %task.id, task.name = %task.name, from = %from, to = %to, "Would move task.");
                        Outcome::Planned { from, to }
                    }
                    PassMode::Apply => {
                        let verified = self.apply(task, to).await?;
                        info!(task.id = %task.id, task.name = %task.name, from = %from, to = %to, "Moved task.");
                        Outcome::Moved { from, to, verified }
                    }
                }
            };

            report.outcomes.push(TaskOutcome {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                outcome,
            });
        }

        Ok(report)
    }

    async fn fetch(
        &self,
        selector: &TaskSelector,
        report: &mut PassReport,
    ) -> Result<Vec<Task>, CoreError> {
        let records = self.service.fetch_tasks(selector).await?;
        info!(selector = %selector, tasks = records.len(), "Fetched incomplete tasks.");
        report.fetched = records.len();

        let mut tasks = Vec::with_capacity(records.len());
        for record in records {
            let (task_id, task_name) = (record.gid.clone(), record.name.clone());
            match Task::try_from(record) {
                Ok(task) => tasks.push(task),
                Err(err) => {
                    warn!(task.id = %task_id, task.name = %task_name, "Skipping task: {err}");
                    report.skipped.push(SkippedTask {
                        task_id,
                        task_name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(tasks)
    }

    async fn apply(&self, task: &Task, to: DueValue) -> Result<bool, CoreError> {
        let record = self
            .service
            .update_task(&task.id, &TaskUpdate::from(to))
            .await?;

        let stored = match Task::try_from(record) {
            Ok(updated) => updated.due(),
            Err(err) => {
                warn!(task.id = %task.id, "Could not read updated task: {err}");
                return Ok(false);
            }
        };

        if stored != Some(to) {
            warn!(
                task.id = %task.id,
                expected = %to,
                stored = ?stored.map(|due| due.to_string()),
                "Service stored a different due value than requested."
            );
            return Ok(false);
        }

        Ok(true)
    }
}
