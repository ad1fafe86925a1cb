use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::error::{PipelineError, PipelineResult};

/// Row counts after each stage of one run, plus when and where it ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub year_min: i32,
    pub year_max: i32,
    /// Rows read from the input.
    pub original_count: usize,
    /// Rows left after dropping unparseable SIDs.
    pub cleaned_count: usize,
    /// Rows left after the year window.
    pub year_filtered_count: usize,
    /// Rows written.
    pub output_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineSummary {
    pub fn invalid_sid_count(&self) -> usize {
        self.original_count.saturating_sub(self.cleaned_count)
    }

    pub fn out_of_range_count(&self) -> usize {
        self.cleaned_count.saturating_sub(self.year_filtered_count)
    }

    pub fn duplicate_count(&self) -> usize {
        self.year_filtered_count.saturating_sub(self.output_count)
    }

    /// The human readable report printed at the end of a run.
    pub fn render(&self) -> String {
        let window = format!("{}-{}", self.year_min, self.year_max);
        let mut out = format!(
            "Saved {} first storm locations from {} to {}\n",
            self.output_count,
            window,
            self.output_path.display()
        );
        out.push_str(&format!("\n{: <36} {:>12} {:>12}\n", "Stage", "Records", "Dropped"));
        out.push_str(&format!("{:-<62}\n", ""));
        let lines = [
            ("Original dataset", self.original_count, 0),
            (
                "After cleaning invalid SID values",
                self.cleaned_count,
                self.invalid_sid_count(),
            ),
            (
                "After filtering to year window",
                self.year_filtered_count,
                self.out_of_range_count(),
            ),
            (
                "Final first locations",
                self.output_count,
                self.duplicate_count(),
            ),
        ];
        for (stage, count, dropped) in lines {
            out.push_str(&format!("{: <36} {:>12} {:>12}\n", stage, count, dropped));
        }
        out
    }

    /// Write the summary as pretty JSON with a trailing newline.
    pub fn write_json(&self, path: &Path) -> PipelineResult<()> {
        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, self)
            .map_err(|e| PipelineError::io(path, e.into()))?;
        w.write_all(b"\n").map_err(|e| PipelineError::io(path, e))?;
        w.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn summary() -> PipelineSummary {
        let now = Utc::now();
        PipelineSummary {
            input_path: "in.csv".into(),
            output_path: "out.csv".into(),
            year_min: 2005,
            year_max: 2025,
            original_count: 10,
            cleaned_count: 8,
            year_filtered_count: 5,
            output_count: 3,
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn dropped_counts() {
        let s = summary();
        assert_eq!(s.invalid_sid_count(), 2);
        assert_eq!(s.out_of_range_count(), 3);
        assert_eq!(s.duplicate_count(), 2);
    }

    #[test]
    fn inconsistent_counts_render_without_panicking() {
        let s = PipelineSummary {
            cleaned_count: 20,
            output_count: 9,
            ..summary()
        };
        assert_eq!(s.invalid_sid_count(), 0);
        assert_eq!(s.duplicate_count(), 0);
        assert!(s.render().contains("Final first locations"));
    }

    #[test]
    fn render_mentions_every_stage() {
        let text = summary().render();
        assert!(text.starts_with("Saved 3 first storm locations from 2005-2025 to out.csv"));
        assert!(text.contains("After cleaning invalid SID values"));
        assert!(text.contains("After filtering to year window"));
        assert!(text.contains("Final first locations"));
    }

    #[test]
    fn json_report_round_trips_counts() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("summary.json");
        summary().write_json(&path)?;

        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(v["original_count"], 10);
        assert_eq!(v["output_count"], 3);
        assert_eq!(v["year_max"], 2025);
        Ok(())
    }
}
