use anyhow::{Context, Result};
use clap::Parser;
use correlation_toolkit::{
    analysis::rolling::CorrelationSummary, compute_correlation_series,
    visualization::render_correlation_chart, Cli,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let config = args
        .resolve_config()
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    log::debug!("Resolved configuration: {:?}", config);

    println!(
        "Analysing {} to {} with a {}-day window",
        config.analysis.start_date, config.analysis.end_date, config.analysis.window_size
    );
    println!("Bitcoin prices: {}", config.bitcoin.path.display());
    println!("Gold prices:    {}", config.gold.path.display());

    let series = compute_correlation_series(&config)?;

    match series.summary() {
        Some(summary) => print_summary(&summary),
        None => println!("\nNo correlation windows were produced"),
    }

    render_correlation_chart(&series, &config.chart).context("rendering chart")?;
    println!("\nChart saved to {}", config.chart.output.display());

    Ok(())
}

fn print_summary(summary: &CorrelationSummary) {
    println!("\n=== Rolling Regression Slope (gold on bitcoin) ===");
    println!(
        "Windows: {} ({} to {})",
        summary.count, summary.first_date, summary.last_date
    );
    println!("{:<10} {:>10}", "Statistic", "Slope");
    println!("{:-<21}", "");
    println!("{:<10} {:>10.4}", "Min", summary.min_slope);
    println!("{:<10} {:>10.4}", "Max", summary.max_slope);
    println!("{:<10} {:>10.4}", "Mean", summary.mean_slope);
    println!("{:<10} {:>10.4}", "Latest", summary.latest_slope);
}
