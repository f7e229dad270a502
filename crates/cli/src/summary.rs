//! Per-part summary table (polars): one row per polygon part of every
//! orthogonalized feature, written as CSV or Parquet by file extension.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use ortho::api::{OrthoResult, PartResult};

/// One summary row.
#[derive(Clone, Debug, PartialEq)]
pub struct PartRow {
    pub feature: u64,
    pub part: u32,
    /// Verdict name, or `failed` when the part errored.
    pub verdict: String,
    pub overlap_ratio: Option<f64>,
    pub dispersion: Option<f64>,
    /// Rotation applied to the exterior ring (degrees).
    pub rotation_deg: Option<f64>,
    pub error: Option<String>,
}

impl PartRow {
    fn new(feature: usize, part: usize, r: &PartResult) -> Self {
        match &r.outcome {
            Ok(a) => Self {
                feature: feature as u64,
                part: part as u32,
                verdict: a.verdict.to_string(),
                overlap_ratio: Some(a.overlap_ratio),
                dispersion: a.dispersion,
                rotation_deg: a.rotations.first().copied(),
                error: None,
            },
            Err(err) => Self {
                feature: feature as u64,
                part: part as u32,
                verdict: "failed".into(),
                overlap_ratio: None,
                dispersion: None,
                rotation_deg: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Flatten `(feature index, result)` pairs into part rows.
pub fn part_rows<'a>(results: impl IntoIterator<Item = (usize, &'a OrthoResult)>) -> Vec<PartRow> {
    results
        .into_iter()
        .flat_map(|(feature, res)| {
            res.parts
                .iter()
                .enumerate()
                .map(move |(part, r)| PartRow::new(feature, part, r))
        })
        .collect()
}

pub fn to_frame(rows: &[PartRow]) -> PolarsResult<DataFrame> {
    df!(
        "feature" => rows.iter().map(|r| r.feature).collect::<Vec<_>>(),
        "part" => rows.iter().map(|r| r.part).collect::<Vec<_>>(),
        "verdict" => rows.iter().map(|r| r.verdict.clone()).collect::<Vec<_>>(),
        "overlap_ratio" => rows.iter().map(|r| r.overlap_ratio).collect::<Vec<_>>(),
        "dispersion" => rows.iter().map(|r| r.dispersion).collect::<Vec<_>>(),
        "rotation_deg" => rows.iter().map(|r| r.rotation_deg).collect::<Vec<_>>(),
        "error" => rows.iter().map(|r| r.error.clone()).collect::<Vec<_>>(),
    )
}

fn is_parquet(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("parquet")
}

/// Write the table; `.parquet` selects Parquet, anything else CSV.
pub fn write(path: &Path, rows: &[PartRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut df = to_frame(rows)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if is_parquet(path) {
        ParquetWriter::new(file).finish(&mut df)?;
    } else {
        CsvWriter::new(file).finish(&mut df)?;
    }
    tracing::info!(rows = df.height(), path = %path.display(), "summary_written");
    Ok(())
}

/// Part count and mean overlap per verdict, sorted by verdict.
pub fn verdict_table(path: &Path) -> Result<DataFrame> {
    let lf = if is_parquet(path) {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    let df = lf
        .group_by([col("verdict")])
        .agg([
            len().alias("parts"),
            col("overlap_ratio").mean().alias("mean_overlap"),
        ])
        .sort_by_exprs([col("verdict")], SortMultipleOptions::default())
        .collect()
        .with_context(|| format!("summarizing {}", path.display()))?;
    Ok(df)
}
