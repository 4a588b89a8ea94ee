use anyhow::Result;
use rollover_core::pass::RolloverPass;
use rollover_core::scheduler::DueDateScheduler;
use rollover_core::service::TaskService;

use crate::cli::PreviewCommand;
use crate::config::Settings;
use crate::views::table::display_plan;

pub async fn preview(
    service: &impl TaskService,
    scheduler: &DueDateScheduler,
    settings: &Settings,
    command: PreviewCommand,
) -> Result<()> {
    let now = scheduler.now();
    let plan = RolloverPass::new(service, scheduler)
        .plan(&settings.selector, now)
        .await?;

    println!(
        "Today is {} {} ({}).",
        now.date,
        now.time.format("%H:%M"),
        settings.timezone
    );
    display_plan(&plan, scheduler.timezone(), command.all);

    Ok(())
}
