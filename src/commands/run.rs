use anyhow::Result;

use pamyat::collector::RunCoordinator;
use pamyat::config::Config;

pub async fn run(config: Config) -> Result<()> {
    println!("Starting full collection run");
    println!("============================");

    let coordinator = RunCoordinator::new(config);
    let report = coordinator.run().await?;

    let elapsed = report.finished_at - report.started_at;

    println!();
    println!("Run finished in {}s", elapsed.num_seconds());
    println!("  Names harvested:    {}", report.names_collected);
    println!("  Unique ids by year: {}", report.year_report.unique_count);
    println!("  Unique ids by name: {}", report.name_report.unique_count);
    println!("  Total unique ids:   {}", report.total_unique);

    let skipped = report.year_report.skipped.len() + report.name_report.skipped.len();
    if skipped > 0 {
        println!();
        println!("{skipped} query values were skipped:");
        for skip in report
            .year_report
            .skipped
            .iter()
            .chain(report.name_report.skipped.iter())
        {
            println!("  {}: {}", skip.value, skip.reason);
        }
    }

    Ok(())
}
