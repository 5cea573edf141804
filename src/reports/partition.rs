use crate::reports::registry::RegistryLine;
use crate::reports::row::{LineKind, ReportRow};
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub retained: Vec<RegistryLine>,
    pub archived: Vec<ReportRow>,
}

impl Partition {
    pub fn remaining_rows(&self) -> usize {
        self.retained
            .iter()
            .filter(|line| matches!(line.kind, LineKind::Report(_)))
            .count()
    }
}

/// First date that is kept. `None` when the threshold reaches past the
/// start of the calendar, in which case nothing is old enough.
pub fn cutoff_date(today: NaiveDate, threshold_days: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(threshold_days)))
}

pub fn is_older_than(date: NaiveDate, cutoff: Option<NaiveDate>) -> bool {
    cutoff.is_some_and(|cutoff| date < cutoff)
}

/// Splits registry lines into the ones that stay and the report rows that
/// move to the archive. Retained lines keep their original order.
pub fn partition(lines: Vec<RegistryLine>, cutoff: Option<NaiveDate>) -> Partition {
    let mut out = Partition::default();
    for line in lines {
        match line.kind {
            LineKind::Report(row) if is_older_than(row.date, cutoff) => out.archived.push(row),
            kind => out.retained.push(RegistryLine {
                text: line.text,
                kind,
            }),
        }
    }
    out
}
