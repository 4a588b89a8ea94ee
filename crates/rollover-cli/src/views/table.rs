use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::{OwoColorize, Style};
use rollover_core::models::SchedulingDecision;
use rollover_core::pass::{Outcome, PassMode, PassReport, Plan, SkippedTask};
use rollover_core::timezone::format_due_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStatus {
    Move,
    Unchanged,
    NotDue,
}

impl DecisionStatus {
    pub fn of(decision: &SchedulingDecision) -> Self {
        match (decision.should_move, decision.new_due) {
            (true, new_due) if new_due == decision.current_due => DecisionStatus::Unchanged,
            (true, _) => DecisionStatus::Move,
            (false, _) => DecisionStatus::NotDue,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DecisionStatus::Move => "move",
            DecisionStatus::Unchanged => "unchanged",
            DecisionStatus::NotDue => "not due",
        }
    }

    fn color(self) -> Color {
        match self {
            DecisionStatus::Move => Color::Yellow,
            DecisionStatus::Unchanged => Color::Green,
            DecisionStatus::NotDue => Color::DarkGrey,
        }
    }
}

pub fn build_plan_table(decisions: &[&SchedulingDecision], timezone: &Tz) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Current Due", "New Due", "Status"]);

    for decision in decisions {
        let status = DecisionStatus::of(decision);
        let mut row = Row::new();
        row.add_cell(Cell::new(&decision.task_id));
        row.add_cell(Cell::new(&decision.task_name));
        row.add_cell(Cell::new(
            decision
                .current_due
                .map(|due| format_due_local(&due, timezone))
                .unwrap_or_else(|| "-".to_string()),
        ));

        let new_due = decision
            .new_due
            .map(|due| format_due_local(&due, timezone))
            .unwrap_or_else(|| "-".to_string());
        let mut new_due_cell = Cell::new(new_due);
        if status == DecisionStatus::Move {
            new_due_cell = new_due_cell.add_attribute(Attribute::Bold);
        }
        row.add_cell(new_due_cell);
        row.add_cell(Cell::new(status.label()).fg(status.color()));

        table.add_row(row);
    }

    table
}

pub fn display_plan(plan: &Plan, timezone: &Tz, show_all: bool) {
    let decisions: Vec<&SchedulingDecision> = plan
        .decisions
        .iter()
        .filter(|d| show_all || d.should_move)
        .collect();

    if decisions.is_empty() {
        if plan.fetched == 0 {
            println!("No incomplete tasks found.");
        } else {
            println!("No tasks are due. {} incomplete tasks checked.", plan.fetched);
        }
    } else {
        println!("{}", build_plan_table(&decisions, timezone));
    }

    display_skipped(&plan.skipped);
}

pub fn display_summary(report: &PassReport, mode: PassMode, timezone: &Tz) {
    let success_style = Style::new().green().bold();
    let warning_style = Style::new().yellow().bold();

    if report.fetched == 0 {
        println!("No incomplete tasks found.");
        display_skipped(&report.skipped);
        return;
    }

    println!(
        "Found {} incomplete tasks, {} due.",
        report.fetched,
        report.due()
    );

    for task in &report.outcomes {
        match &task.outcome {
            Outcome::Moved { from, to, verified } => {
                println!(
                    "  {} '{}' from {} to {}",
                    "Moved".style(success_style),
                    task.task_name,
                    format_due_local(from, timezone),
                    format_due_local(to, timezone).bold()
                );
                if !verified {
                    println!(
                        "    {} the service reported a different due value; check this task manually",
                        "Warning:".style(warning_style)
                    );
                }
            }
            Outcome::Planned { from, to } => {
                println!(
                    "  {} '{}' from {} to {}",
                    "Would move".style(warning_style),
                    task.task_name,
                    format_due_local(from, timezone),
                    format_due_local(to, timezone).bold()
                );
            }
            Outcome::Unchanged(due) => {
                println!(
                    "  {} '{}' already due {}",
                    "Kept".dimmed(),
                    task.task_name,
                    format_due_local(due, timezone)
                );
            }
        }
    }

    display_skipped(&report.skipped);

    println!("{}", summary_footer(report, mode));
}

fn summary_footer(report: &PassReport, mode: PassMode) -> String {
    match mode {
        PassMode::DryRun => format!("Dry run: would move {} tasks to tomorrow.", report.planned()),
        PassMode::Apply => format!(
            "{} Moved {} tasks to tomorrow.",
            "Done!".style(Style::new().green().bold()),
            report.moved()
        ),
    }
}

pub fn display_skipped(skipped: &[SkippedTask]) {
    if skipped.is_empty() {
        return;
    }

    let warning_style = Style::new().yellow().bold();
    println!(
        "{} skipped {} tasks with unreadable due dates:",
        "Warning:".style(warning_style),
        skipped.len()
    );
    for task in skipped {
        println!("  {} '{}': {}", task.task_id.yellow(), task.task_name, task.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rollover_core::models::DueValue;
    use rollover_core::pass::TaskOutcome;

    fn decision(should_move: bool, current: Option<DueValue>, new: Option<DueValue>) -> SchedulingDecision {
        SchedulingDecision {
            task_id: "1201".to_string(),
            task_name: "Pay rent".to_string(),
            should_move,
            current_due: current,
            new_due: new,
        }
    }

    fn on(d: u32) -> DueValue {
        DueValue::On(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    #[test]
    fn test_decision_status() {
        assert_eq!(DecisionStatus::of(&decision(true, Some(on(10)), Some(on(13)))), DecisionStatus::Move);
        assert_eq!(DecisionStatus::of(&decision(true, Some(on(13)), Some(on(13)))), DecisionStatus::Unchanged);
        assert_eq!(DecisionStatus::of(&decision(false, Some(on(20)), None)), DecisionStatus::NotDue);
        assert_eq!(DecisionStatus::of(&decision(false, None, None)), DecisionStatus::NotDue);
    }

    #[test]
    fn test_plan_table_contents() {
        let moving = decision(true, Some(on(10)), Some(on(13)));
        let undated = decision(false, None, None);
        let rendered = build_plan_table(&[&moving, &undated], &Tz::UTC).to_string();
        assert!(rendered.contains("Current Due"));
        assert!(rendered.contains("Pay rent"));
        assert!(rendered.contains("2024-01-10"));
        assert!(rendered.contains("2024-01-13"));
        assert!(rendered.contains("not due"));
    }

    #[test]
    fn test_dry_run_footer_without_due_tasks() {
        let report = PassReport {
            fetched: 1,
            ..Default::default()
        };
        let footer = summary_footer(&report, PassMode::DryRun);
        assert_eq!(footer, "Dry run: would move 0 tasks to tomorrow.");
        assert!(!footer.contains("Moved"));
    }

    #[test]
    fn test_apply_footer_counts_moved_tasks() {
        let report = PassReport {
            fetched: 2,
            skipped: Vec::new(),
            outcomes: vec![TaskOutcome {
                task_id: "1201".to_string(),
                task_name: "Pay rent".to_string(),
                outcome: Outcome::Moved {
                    from: on(10),
                    to: on(13),
                    verified: true,
                },
            }],
        };
        assert!(summary_footer(&report, PassMode::Apply).contains("Moved 1 tasks to tomorrow."));
    }
}
