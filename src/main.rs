use anyhow::Result;
use colored::Colorize;

use album_rankings::cli::Command;
use album_rankings::ranking::{ItemKind, PairwiseComparison, Scope};
use album_rankings::services::AggregationSummary;
use album_rankings::{
    handle_aggregate, handle_coherence, handle_compare, handle_completions, handle_init, handle_schedule,
    handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Init => handle_init(),
        Command::Aggregate => handle_aggregate().map(|summary| print_summary(&summary)),
        Command::Schedule { interval_minutes } => handle_schedule(*interval_minutes),
        Command::Serve { port } => handle_serve(*port),
        Command::Compare { user_a, user_b, album } => {
            let comparison = handle_compare(*user_a, *user_b, *album)?;
            let scope = album.map_or(Scope::Albums, Scope::TracksOfAlbum);
            print_comparison(*user_a, *user_b, &comparison, scope.item_kind());
            Ok(())
        }
        Command::Coherence { group_id } => {
            let coherence = handle_coherence(*group_id)?;
            println!("Group {} coherence: {}", group_id, format!("{:.2}%", coherence).bold());
            Ok(())
        }
        Command::Completions { shell } => {
            handle_completions(*shell);
            Ok(())
        }
    }
}

fn print_summary(summary: &AggregationSummary) {
    println!(
        "{} {} countries written, {} skipped, {} pruned",
        "Aggregation done:".green().bold(),
        summary.countries_written,
        summary.countries_skipped,
        summary.countries_pruned
    );
}

fn print_comparison(user_a: i64, user_b: i64, comparison: &PairwiseComparison, kind: ItemKind) {
    let percent = format!("{:.2}%", comparison.compatibility_percent);
    let percent = match comparison.compatibility_percent {
        p if p >= 75.0 => percent.green(),
        p if p >= 40.0 => percent.yellow(),
        _ => percent.red(),
    };
    println!(
        "Users {} and {}: {} compatible over {} shared {}s",
        user_a,
        user_b,
        percent.bold(),
        comparison.shared_count,
        kind.as_str()
    );
    if let Some(report) = &comparison.report {
        println!("  favorite:        {}", report.favorite_id);
        println!("  least favorite:  {}", report.least_favorite_id);
        println!(
            "  most divergent:  {} (difference {})",
            report.most_divergent_id, report.max_position_difference
        );
        println!(
            "  most concordant: {} (difference {})",
            report.most_concordant_id, report.min_position_difference
        );
    }
}
