//! `obra dashboard` command - Project counts and recent activity

use chrono::Utc;
use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::output::print_structured;
use crate::cli::{App, GlobalOpts, OutputFormat};
use crate::core::dashboard::{DashboardStats, DateRange};

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// Creation-date window (week, month, year)
    #[arg(long, short = 'r', default_value = "month")]
    pub range: DateRange,

    /// Rows in the recent-projects table (default from config, else 5)
    #[arg(long, short = 'n')]
    pub recent: Option<usize>,
}

pub fn run(app: &mut App, args: DashboardArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let limit = args.recent.unwrap_or_else(|| app.config.recent_limit());
    let stats = DashboardStats::compute(&app.store.snapshot(), args.range, Utc::now(), limit);

    if print_structured(&stats, format)? {
        return Ok(());
    }

    let table_style = matches!(format, OutputFormat::Md);
    let render = |builder: Builder| {
        let mut table = builder.build();
        if table_style {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        table.to_string()
    };

    println!("{}", style("Dashboard").bold().underlined());
    println!();
    println!("  Projects        {}", style(stats.total_projects).cyan().bold());
    println!("  Clients         {}", style(stats.total_clients).cyan().bold());
    println!("  In progress     {}", style(stats.in_progress).yellow());
    println!("  Finished        {}", style(stats.finished).green());
    println!(
        "  Created this {:<5} {}",
        stats.range.to_string(),
        style(stats.created_in_range).cyan()
    );
    println!();

    let mut by_status = Builder::default();
    by_status.push_record(["Status", "Projects"]);
    for s in &stats.by_status {
        by_status.push_record([s.status.to_string(), s.count.to_string()]);
    }
    let mut by_company = Builder::default();
    by_company.push_record(["Company", "Projects"]);
    for c in &stats.by_company {
        by_company.push_record([c.company.to_string(), c.count.to_string()]);
    }
    println!("{}", render(by_status));
    println!();
    println!("{}", render(by_company));

    println!();
    println!("{}", style("Recent projects").bold());
    if stats.recent.is_empty() {
        println!("  No projects yet.");
        return Ok(());
    }
    let mut recent = Builder::default();
    recent.push_record(["Project", "Client", "Status", "Updated"]);
    for r in &stats.recent {
        recent.push_record([
            r.name.clone(),
            r.client_name.clone().unwrap_or_else(|| "-".to_string()),
            r.status.to_string(),
            r.updated_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    println!("{}", render(recent));
    Ok(())
}
