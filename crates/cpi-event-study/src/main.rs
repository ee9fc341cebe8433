mod bootstrap;

use anyhow::{Context, Result};
use study_core::settings::Settings;
use study_data::export::{cpi_summary_line, export_block, t_test_lines};
use study_data::{run_study, StudyReport};
use study_ui::app::App;
use study_ui::chart_data::ChartData;
use study_ui::components::logo::Logo;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("CPI event study v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.study_config()?;
    let layout = settings.source_layout();
    tracing::info!(
        "Target: {}, {} comparables, reference month: {}",
        config.target,
        config.comparables.len(),
        config.reference_month
    );

    let result = run_study(&layout, &config)?;

    // ── Console report ────────────────────────────────────────────────────────
    println!("{}", cpi_summary_line(&result));
    println!();
    println!("Final data for export to Excel:");
    for line in export_block(&result) {
        println!("{}", line);
    }
    println!();
    for line in t_test_lines(&result, &config) {
        println!("{}", line);
    }
    if !result.dropped.is_empty() {
        println!();
        println!("Dropped (incomplete data): {}", result.dropped.join(", "));
    }

    if let Some(path) = &settings.report {
        StudyReport::new(&result, &config)
            .write_to(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    if settings.no_ui {
        return Ok(());
    }

    // ── Charts ────────────────────────────────────────────────────────────────
    let logo = Logo::try_load(&bootstrap::locate_logo(&settings.logo, &settings.data_dir));
    let app = App::new(&settings.theme, ChartData::from_result(&result, &config), logo);
    app.run()?;

    Ok(())
}
