//! Due-date rollover decisions.
//!
//! Everything in here is a pure function of a task snapshot and the current
//! local instant. The timezone is a type parameter so callers can use an IANA
//! zone from `chrono-tz` in production and a `FixedOffset` where an exact
//! offset matters.

use crate::models::{DueValue, SchedulingDecision, Task};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Current wall-clock date and time of day in the scheduler's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalNow {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl LocalNow {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    pub fn from_instant<Z: TimeZone>(instant: DateTime<Utc>, timezone: &Z) -> Self {
        let local = instant.with_timezone(timezone);
        Self {
            date: local.date_naive(),
            time: local.time(),
        }
    }

    pub fn tomorrow(&self) -> NaiveDate {
        self.date + Days::new(1)
    }
}

#[derive(Debug, Clone)]
pub struct DueDateScheduler<Z: TimeZone = Tz> {
    timezone: Z,
}

impl<Z: TimeZone> DueDateScheduler<Z> {
    pub fn new(timezone: Z) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> &Z {
        &self.timezone
    }

    /// Reads the system clock and converts it to local time.
    pub fn now(&self) -> LocalNow {
        LocalNow::from_instant(Utc::now(), &self.timezone)
    }

    /// Local calendar date the task is due on.
    ///
    /// Timed tasks are converted to local time first; date-only tasks are used as-is.
    pub fn task_date(&self, task: &Task) -> Option<NaiveDate> {
        match task.due_at {
            Some(at) => Some(at.with_timezone(&self.timezone).date_naive()),
            None => task.due_date,
        }
    }

    /// A task is due when its local date is today or earlier, or when it is a
    /// timed task due tomorrow at a local time of day that is already behind us.
    pub fn is_due(&self, task: &Task, now: &LocalNow) -> bool {
        let Some(task_date) = self.task_date(task) else {
            return false;
        };

        if task_date <= now.date {
            return true;
        }

        match task.due_at {
            Some(at) if task_date == now.tomorrow() => {
                at.with_timezone(&self.timezone).time() < now.time
            }
            _ => false,
        }
    }

    /// Tasks that should move to tomorrow, in their original order.
    pub fn filter_due<'a>(&self, tasks: &'a [Task], now: &LocalNow) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.is_due(task, now)).collect()
    }

    /// New due value for tomorrow.
    ///
    /// Timed tasks keep their UTC time of day. If that instant still falls on
    /// today (or earlier) in local time, it is pushed one more day so the local
    /// due date always lands after today.
    pub fn reschedule(&self, task: &Task, now: &LocalNow) -> DueValue {
        let tomorrow = now.tomorrow();

        let Some(due_at) = task.due_at else {
            return DueValue::On(tomorrow);
        };

        let candidate = tomorrow.and_time(due_at.time()).and_utc();
        if candidate.with_timezone(&self.timezone).date_naive() <= now.date {
            DueValue::At(candidate + Duration::days(1))
        } else {
            DueValue::At(candidate)
        }
    }

    pub fn decide(&self, task: &Task, now: &LocalNow) -> SchedulingDecision {
        let should_move = self.is_due(task, now);
        SchedulingDecision {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            should_move,
            current_due: task.due(),
            new_due: should_move.then(|| self.reschedule(task, now)),
        }
    }
}
