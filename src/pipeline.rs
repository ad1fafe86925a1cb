use chrono::Utc;
use tracing::info;

use crate::{
    config::PipelineConfig,
    error::PipelineResult,
    process::{
        self, annotate_years,
        dedup::{dedup_first, sort_records},
        filter::{drop_invalid_years, keep_year_range, StageCounts},
        with_year_column, write::write_csv, KeyColumns, RawTable,
    },
    summary::PipelineSummary,
};

/// Result of the in-memory part of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub table: RawTable,
    pub cleaned: StageCounts,
    pub year_filtered: StageCounts,
}

/// Derive years, filter, sort and dedup. No I/O.
pub fn transform(table: RawTable, keys: KeyColumns, cfg: &PipelineConfig) -> Transformed {
    let RawTable { headers, rows } = table;

    let records = annotate_years(rows, keys.sid);
    let (records, cleaned) = drop_invalid_years(records, keys.sid);
    let (mut records, year_filtered) = keep_year_range(records, cfg.year_min..=cfg.year_max);

    sort_records(&mut records, &keys);
    let records = dedup_first(records, &keys);

    Transformed {
        table: with_year_column(&headers, records, &cfg.year_column),
        cleaned,
        year_filtered,
    }
}

/// Load, transform and write one file. Nothing is written unless every
/// earlier stage succeeded.
#[tracing::instrument(level = "info", skip(cfg), fields(input = %cfg.input_path.display()))]
pub fn run(cfg: &PipelineConfig) -> PipelineResult<PipelineSummary> {
    cfg.validate()?;
    let started_at = Utc::now();

    let table = process::load_csv(&cfg.input_path)?;
    let keys = KeyColumns::resolve(&table, cfg, &cfg.input_path)?;
    process::log_preview(&table, &keys);
    let original_count = table.len();

    let out = transform(table, keys, cfg);
    let output_count = write_csv(&cfg.output_path, &out.table, cfg.create_output_dir)?;

    let summary = PipelineSummary {
        input_path: cfg.input_path.clone(),
        output_path: cfg.output_path.clone(),
        year_min: cfg.year_min,
        year_max: cfg.year_max,
        original_count,
        cleaned_count: out.cleaned.output,
        year_filtered_count: out.year_filtered.output,
        output_count,
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        original = summary.original_count,
        cleaned = summary.cleaned_count,
        year_filtered = summary.year_filtered_count,
        output = summary.output_count,
        "pipeline finished"
    );
    Ok(summary)
}
