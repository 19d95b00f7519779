use crate::domain::Transaction;
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Calendar date used everywhere a report renders a timestamp.
pub fn report_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Top `n` transactions ranked by absolute amount, descending. The sort is
/// stable, so equal amounts keep their insertion order and none collapse.
pub fn top_expenses(transactions: &[Transaction], n: usize) -> Vec<(String, Decimal)> {
    let mut ranked: Vec<&Transaction> = transactions.iter().collect();
    ranked.sort_by(|a, b| b.amount().abs().cmp(&a.amount().abs()));
    ranked
        .into_iter()
        .take(n)
        .map(|t| (t.category().to_string(), t.amount()))
        .collect()
}

/// Top `n` categories by the absolute value of their summed signed amounts.
/// Groups form in first-encountered order, which the stable sort preserves
/// for ties.
pub fn top_categories(transactions: &[Transaction], n: usize) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for t in transactions {
        match totals.iter_mut().find(|(c, _)| c == t.category()) {
            Some((_, sum)) => *sum += t.amount(),
            None => totals.push((t.category().to_string(), t.amount())),
        }
    }

    totals.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()));
    totals.truncate(n);
    totals
}

/// Renders the persisted report block: a dated header and one detail line
/// per transaction, in the given order.
pub fn format_report(
    transactions: &[Transaction],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> String {
    let mut out = format!(
        "Financial Reports for {} - {}:\n",
        report_date(start),
        report_date(end)
    );
    out.push_str("Detailed Transactions:\n");
    for t in transactions {
        out.push_str(&format!(
            "Date: {} | Amount: ${} | Category: {}\n",
            report_date(t.timestamp()),
            t.amount(),
            t.category()
        ));
    }
    out
}

/// Ranked breakdowns for one labeled sub-period of a report.
#[derive(Debug)]
pub struct PeriodBreakdown {
    pub label: &'static str,
    pub expenses: Vec<(String, Decimal)>,
    pub categories: Vec<(String, Decimal)>,
}

#[derive(Debug)]
pub struct GeneratedReport {
    pub text: String,
    pub breakdowns: Vec<PeriodBreakdown>,
    pub path: PathBuf,
}

/// Filters the ledger to `[start, end]`, computes the "Week" and "Month"
/// breakdowns, and persists the detailed report to `path`, overwriting any
/// prior file.
///
/// Both breakdowns are computed over the same filtered set rather than
/// re-derived week/month sub-windows; the labels are fixed.
pub fn generate_reports(
    ledger: &Ledger,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    path: &Path,
    n: usize,
) -> Result<GeneratedReport, LedgerError> {
    let selected = ledger.transactions_in_period(start, end);

    let breakdowns = ["Week", "Month"]
        .into_iter()
        .map(|label| PeriodBreakdown {
            label,
            expenses: top_expenses(&selected, n),
            categories: top_categories(&selected, n),
        })
        .collect();

    let text = format_report(&selected, start, end);
    fs::write(path, &text).map_err(|source| LedgerError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), transactions = selected.len(), "report written");

    Ok(GeneratedReport {
        text,
        breakdowns,
        path: path.to_path_buf(),
    })
}
