use crate::cli::{ConvertArgs, ProfilesArgs};
use crate::upload::file;
use crate::upload::generator::{EntryGenerator, ReferenceData, RunReport};
use crate::upload::profile::Settings;
use crate::upload::reference::{BlockIndex, QtyPerUnitIndex};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcome of a conversion run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub profile: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub report: RunReport,
}

/**
Converts the stock extract named in `args` into an upload file.

Both references and the whole extract are processed before the upload file
is created, so any error leaves no output behind.
*/
pub fn convert(args: &ConvertArgs) -> Result<RunSummary> {
    let run_id = Uuid::now_v7();
    let settings = Settings::locate(args.settings.as_deref()).context("loading settings")?;
    let mut config = settings.profile(&args.profile)?.clone();
    if args.no_serial_limit {
        config.serial_limit = None;
    } else if let Some(limit) = args.serial_limit {
        config.serial_limit = Some(limit);
    }
    info!(%run_id, profile = %config.name, "conversion started");

    let delimiter = settings.delimiter_byte()?;
    let data = ReferenceData {
        blocks: BlockIndex::from_csv_path(&args.blocks, delimiter, &settings.relevant_block_types)
            .with_context(|| format!("reading blocks from {}", args.blocks.display()))?,
        qty_per_hu: QtyPerUnitIndex::from_csv_path(&args.qty_per_hu, delimiter)
            .with_context(|| format!("reading quantity per HU from {}", args.qty_per_hu.display()))?,
    };
    let records = file::read_stock(&args.source, delimiter)
        .with_context(|| format!("reading stock from {}", args.source.display()))?;

    let mut generator = EntryGenerator::new(&config, &settings, &data)?;
    let rows = generator.run(records).context("generating upload rows")?;
    debug!(skipped = ?generator.report().skipped, "skip reasons");
    let report = generator.into_report();

    let output = file::upload_file_path(&args.out_dir, &config.name, chrono::Local::now());
    file::write_upload(&output, delimiter, &rows)
        .with_context(|| format!("writing {}", output.display()))?;

    if report.skipped_total() > 0 {
        warn!(skipped = report.skipped_total(), "stock lines without upload rows");
    }
    info!(
        output = %output.display(),
        records = report.records,
        rows = report.rows.total(),
        "upload file written"
    );
    let summary = RunSummary {
        run_id,
        profile: config.name,
        source: args.source.clone(),
        output,
        report,
    };
    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(summary)
}

/// Prints one line per configured profile.
pub fn list_profiles(args: &ProfilesArgs) -> Result<()> {
    let settings = Settings::locate(args.settings.as_deref()).context("loading settings")?;
    for p in &settings.profiles {
        let limit = p
            .serial_limit
            .map_or_else(|| "none".to_string(), |l| l.to_string());
        println!(
            "{:<10} bin={:?} record_hu={} record_quant={} consider_bin={} consider_serial={} generate_serial={} generate_hu={} serial_limit={}",
            p.name,
            p.standard_bin,
            p.record_hu,
            p.record_quant,
            p.consider_bin,
            p.consider_serial,
            p.generate_serial,
            p.generate_hu,
            limit,
        );
    }
    Ok(())
}
