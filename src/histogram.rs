//! # Monthly Histogram Module
//!
//! Buckets new song listens by year and month.
//!
//! Years come from the data: every distinct year seen in the events' `endTime`
//! values gets a row of twelve months, even if it has no new listens.
//! Percentages are relative to the total number of stream events, not to
//! the number of new listens.
//!
//! ## Timestamp handling
//!
//! `endTime` is split on `-`: segment 0 is the year, segment 1 the two-digit
//! month. An event whose timestamp does not split that way is skipped with a
//! warning and counted in [`MonthlyHistogram::skipped`].

use crate::classify::ClassifiedEvent;
use crate::error::MalformedTimestampError;
use log::{debug, trace, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    const CODES: [&'static str; 12] = [
        "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
    ];

    const LABELS: [&'static str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    /// Month from its two-digit code, `"01"` through `"12"`.
    pub fn from_code(code: &str) -> Option<Month> {
        Self::CODES
            .iter()
            .position(|c| *c == code)
            .map(|i| Self::ALL[i])
    }

    /// Zero-based position, January = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Three-letter label used for presentation.
    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Split `YYYY-MM-...` into its year and month.
pub fn split_timestamp(end_time: &str) -> Result<(&str, Month), MalformedTimestampError> {
    let malformed = |reason| MalformedTimestampError {
        end_time: end_time.to_string(),
        reason,
    };

    let mut segments = end_time.split('-');
    let year = segments.next().unwrap_or_default().trim();
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("year segment is not numeric"));
    }
    let month = segments.next().ok_or_else(|| malformed("no month segment"))?;
    let month = Month::from_code(month).ok_or_else(|| malformed("month is not 01-12"))?;
    Ok((year, month))
}

/// New listen counts and percentages for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRow {
    pub year: String,
    /// Indexed by [`Month::index`].
    pub counts: [u64; 12],
    pub percentages: [f64; 12],
}

impl YearRow {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// New listens per (year, month). Built once by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyHistogram {
    rows: Vec<YearRow>,
    total_events: usize,
    skipped: usize,
}

impl MonthlyHistogram {
    /// Rows in ascending year order.
    pub fn rows(&self) -> &[YearRow] {
        &self.rows
    }

    pub fn years(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|r| r.year.as_str())
    }

    pub fn row(&self, year: &str) -> Option<&YearRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    pub fn count(&self, year: &str, month: Month) -> Option<u64> {
        self.row(year).map(|r| r.counts[month.index()])
    }

    pub fn percentage(&self, year: &str, month: Month) -> Option<f64> {
        self.row(year).map(|r| r.percentages[month.index()])
    }

    /// Number of stream events the percentages are relative to.
    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// New listens dropped because of a malformed timestamp.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn total_new_listens(&self) -> u64 {
        self.rows.iter().map(YearRow::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Count new song listens per year and month.
///
/// Every year with at least one well-formed `endTime` gets a row, so a year
/// of owned plays only shows up as zeros. Percentages divide by
/// `classified.len()`.
pub fn aggregate(classified: &[ClassifiedEvent<'_>]) -> MonthlyHistogram {
    let mut counts: BTreeMap<String, [u64; 12]> = BTreeMap::new();

    for item in classified {
        if let Ok((year, _)) = split_timestamp(&item.event.end_time) {
            counts.entry(year.to_string()).or_insert([0; 12]);
        }
    }
    debug!("Observed years: {:?}", counts.keys().collect::<Vec<_>>());

    let mut skipped = 0;
    for item in classified.iter().filter(|c| c.is_new_song_listen()) {
        match split_timestamp(&item.event.end_time) {
            Ok((year, month)) => {
                trace!("New listen {} in {} {}", item.unique_id, month, year);
                // Years were seeded from the same split above.
                if let Some(row) = counts.get_mut(year) {
                    row[month.index()] += 1;
                }
            }
            Err(err) => {
                warn!("Skipping new listen {}: {err}", item.unique_id);
                skipped += 1;
            }
        }
    }

    let total_events = classified.len();
    let rows = counts
        .into_iter()
        .map(|(year, counts)| YearRow {
            percentages: counts.map(|c| percentage_of(c, total_events)),
            year,
            counts,
        })
        .collect();

    MonthlyHistogram {
        rows,
        total_events,
        skipped,
    }
}

fn percentage_of(count: u64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
