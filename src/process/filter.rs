use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{debug, info};

use super::Record;

/// Row counts on either side of one filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub input: usize,
    pub output: usize,
}

impl StageCounts {
    pub fn dropped(&self) -> usize {
        self.input - self.output
    }
}

/// Drop rows whose storm id did not yield a year.
pub fn drop_invalid_years(records: Vec<Record>, sid: usize) -> (Vec<Record>, StageCounts) {
    let input = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| {
            if r.year.is_none() {
                debug!(sid = %r.fields[sid], "dropping row with unparseable SID");
            }
            r.year.is_some()
        })
        .collect();

    let counts = StageCounts {
        input,
        output: kept.len(),
    };
    info!(dropped = counts.dropped(), kept = counts.output, "removed invalid SIDs");
    (kept, counts)
}

/// Keep rows whose year lies in `years`, bounds included.
pub fn keep_year_range(
    records: Vec<Record>,
    years: RangeInclusive<i32>,
) -> (Vec<Record>, StageCounts) {
    let input = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| r.year.is_some_and(|y| years.contains(&y)))
        .collect();

    let counts = StageCounts {
        input,
        output: kept.len(),
    };
    info!(
        min = years.start(),
        max = years.end(),
        kept = counts.output,
        "applied year filter"
    );
    (kept, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: Option<i32>) -> Record {
        Record {
            year,
            fields: vec![year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".into())],
        }
    }

    #[test]
    fn null_years_are_dropped_and_counted() {
        let (kept, counts) = drop_invalid_years(vec![rec(Some(2010)), rec(None), rec(None)], 0);
        assert_eq!(kept.len(), 1);
        assert_eq!(counts, StageCounts { input: 3, output: 1 });
        assert_eq!(counts.dropped(), 2);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let input = vec![
            rec(Some(2004)),
            rec(Some(2005)),
            rec(Some(2015)),
            rec(Some(2025)),
            rec(Some(2026)),
        ];
        let (kept, counts) = keep_year_range(input, 2005..=2025);
        let years: Vec<i32> = kept.iter().filter_map(|r| r.year).collect();
        assert_eq!(years, vec![2005, 2015, 2025]);
        assert_eq!(counts, StageCounts { input: 5, output: 3 });
    }

    #[test]
    fn range_filter_never_keeps_null_year() {
        let (kept, _) = keep_year_range(vec![rec(None)], i32::MIN..=i32::MAX);
        assert!(kept.is_empty());
    }
}
