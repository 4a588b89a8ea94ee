use anyhow::Result;
use rollover_core::pass::{PassMode, RolloverPass};
use rollover_core::scheduler::DueDateScheduler;
use rollover_core::service::TaskService;
use tracing::info;

use crate::cli::RunCommand;
use crate::config::Settings;
use crate::views::table::display_summary;

pub async fn run_pass(
    service: &impl TaskService,
    scheduler: &DueDateScheduler,
    settings: &Settings,
    command: RunCommand,
) -> Result<()> {
    let now = scheduler.now();
    let mode = if command.dry_run {
        PassMode::DryRun
    } else {
        PassMode::Apply
    };

    info!(
        mode = %settings.mode,
        selector = %settings.selector,
        timezone = %settings.timezone,
        today = %now.date,
        dry_run = command.dry_run,
        "Moving due tasks to tomorrow."
    );

    let report = RolloverPass::new(service, scheduler)
        .run(&settings.selector, now, mode)
        .await?;

    display_summary(&report, mode, scheduler.timezone());

    Ok(())
}
