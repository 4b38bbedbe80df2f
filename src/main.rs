use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

use mortality_core::config::{DashboardConfig, DataSources};
use mortality_core::context::month_from_number;
use mortality_core::geo::unmapped_departments;
use mortality_core::loader::{LoadStats, ReferenceWarning};
use mortality_core::{
    AggregateSet, FilterPredicate, MannerOfDeath, MapRegion, MortalityContext, Sex, map_regions,
};

/// Join the mortality records with their references and print the dashboard
/// aggregates of one filter selection as JSON.
#[derive(Parser, Debug)]
#[command(name = "mortality-core", version, about)]
struct Cli {
    /// Directory holding the three sources under their canonical names
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Mortality record table, overriding the data directory
    #[arg(long)]
    records: Option<PathBuf>,

    /// Cause-of-death reference, overriding the data directory
    #[arg(long)]
    causes: Option<PathBuf>,

    /// Geographic reference, overriding the data directory
    #[arg(long)]
    geo: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Department name or code
    #[arg(long)]
    department: Option<String>,

    /// Sex label or code
    #[arg(long)]
    sex: Option<Sex>,

    /// Month number, 1 to 12
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Manner of death
    #[arg(long)]
    manner: Option<MannerOfDeath>,

    /// Compute the aggregates in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    stats: &'a LoadStats,
    warnings: &'a [ReferenceWarning],
    aggregates: AggregateSet,
    map_regions: Vec<MapRegion>,
}

impl Cli {
    fn sources(&self) -> DataSources {
        let mut sources = DataSources::from_dir(&self.data_dir);
        if let Some(path) = &self.records {
            sources.records.clone_from(path);
        }
        if let Some(path) = &self.causes {
            sources.causes.clone_from(path);
        }
        if let Some(path) = &self.geo {
            sources.geo.clone_from(path);
        }
        sources
    }

    fn predicate(&self) -> FilterPredicate {
        let mut predicate = FilterPredicate::empty();
        if let Some(department) = &self.department {
            predicate = predicate.with_department(department);
        }
        if let Some(sex) = self.sex {
            predicate = predicate.with_sex(sex);
        }
        if let Some(month) = self.month.and_then(month_from_number) {
            predicate = predicate.with_month(month);
        }
        if let Some(manner) = self.manner {
            predicate = predicate.with_manner(manner);
        }
        predicate
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    config.aggregate.parallel |= cli.parallel;
    config.loader.show_progress = true;
    log::debug!("{config}");

    let sources = cli.sources();
    let context =
        MortalityContext::load(&sources, &config.loader).context("loading mortality data")?;

    let predicate = cli.predicate();
    let start = Instant::now();
    let aggregates = context
        .aggregate(&predicate, &config.aggregate)
        .context("computing aggregates")?;
    info!(
        "Aggregated {} records in {:?}",
        aggregates.record_count,
        start.elapsed()
    );

    let unmapped = unmapped_departments(context.geo(), &aggregates.department_counts);
    if !unmapped.is_empty() {
        warn!(
            "{} departments have no boundary key and stay unshaded: {}",
            unmapped.len(),
            unmapped.join(", ")
        );
    }

    let report = Report {
        stats: context.stats(),
        warnings: context.warnings(),
        map_regions: map_regions(context.geo(), &aggregates.department_counts),
        aggregates,
    };

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.flush()?;
            info!("Report written to {}", path.display());
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
