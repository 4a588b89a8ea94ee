use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use rollover_core::error::CoreError;
use rollover_core::models::{TaskRecord, TaskSelector, TaskUpdate};
use rollover_core::scheduler::{DueDateScheduler, LocalNow};
use rollover_core::service::TaskService;
use std::sync::Mutex;

/// In-memory stand-in for the task-tracking service.
#[derive(Default)]
pub struct InMemoryTaskService {
    tasks: Mutex<Vec<TaskRecord>>,
    updates: Mutex<Vec<(String, TaskUpdate)>>,
    fetches: Mutex<Vec<TaskSelector>>,
    failing_ids: Mutex<Vec<String>>,
    ignore_updates: bool,
}

impl InMemoryTaskService {
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    /// Accepts updates but keeps the stored task as it was.
    pub fn ignoring_updates(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ignore_updates: true,
            ..Default::default()
        }
    }

    pub fn fail_updates_for(&self, id: &str) {
        self.failing_ids.lock().unwrap().push(id.to_string());
    }

    pub fn recover(&self) {
        self.failing_ids.lock().unwrap().clear();
    }

    pub fn updates(&self) -> Vec<(String, TaskUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<TaskSelector> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn task(&self, id: &str) -> TaskRecord {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.gid == id)
            .cloned()
            .expect("task exists")
    }
}

#[async_trait]
impl TaskService for InMemoryTaskService {
    async fn fetch_tasks(&self, selector: &TaskSelector) -> Result<Vec<TaskRecord>, CoreError> {
        self.fetches.lock().unwrap().push(selector.clone());
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<TaskRecord, CoreError> {
        if self.failing_ids.lock().unwrap().iter().any(|f| f == id) {
            return Err(CoreError::Service {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), update.clone()));

        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.gid == id)
            .ok_or_else(|| CoreError::Service {
                status: 404,
                body: format!("task {id} not found"),
            })?;

        if self.ignore_updates {
            return Ok(task.clone());
        }

        match (&update.due_on, &update.due_at) {
            (_, Some(due_at)) => {
                task.due_on = Some(due_at[..10].to_string());
                task.due_at = Some(due_at.clone());
            }
            (Some(due_on), None) => {
                task.due_on = Some(due_on.clone());
                task.due_at = None;
            }
            (None, None) => {}
        }
        Ok(task.clone())
    }
}

pub fn record(gid: &str, due_on: Option<&str>, due_at: Option<&str>) -> TaskRecord {
    TaskRecord {
        gid: gid.to_string(),
        name: format!("Task {gid}"),
        due_on: due_on.map(String::from),
        due_at: due_at.map(String::from),
    }
}

pub fn utc_minus_five() -> DueDateScheduler<FixedOffset> {
    DueDateScheduler::new(FixedOffset::west_opt(5 * 3600).unwrap())
}

/// 2024-01-12 20:00 local.
pub fn evening() -> LocalNow {
    LocalNow::new(
        NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
    )
}

pub fn project() -> TaskSelector {
    TaskSelector::Project("1200".to_string())
}
