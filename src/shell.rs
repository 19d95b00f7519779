use crate::cli::{
    AccountCmd, BalanceArgs, ExpenseArgs, MovementArgs, RankArgs, ReportArgs, ShellCommand,
    ShellLine,
};
use crate::config::{AppConfig, now_utc};
use crate::domain::{AccountKind, EXPENSE_CATEGORIES, Transaction};
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::report::{self, report_date};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use clap::Parser;
use rust_decimal::Decimal;
use std::io::{self, BufRead};
use std::path::Path;

enum LoopControl {
    Continue,
    Exit,
}

enum Ranking {
    Expenses,
    Categories,
}

/// Runs the interactive session until `exit` or end of input. Command
/// failures are printed and the session continues.
pub fn run(ledger: &mut Ledger, cfg: &AppConfig, report_path: &Path) -> Result<()> {
    println!("monedero: personal finance ledger. Type 'help' for commands, 'exit' to leave.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match handle_line(ledger, cfg, report_path, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => println!("{err:#}"),
        }
    }
    Ok(())
}

fn handle_line(
    ledger: &mut Ledger,
    cfg: &AppConfig,
    report_path: &Path,
    line: &str,
) -> Result<LoopControl> {
    let tokens = shell_words::split(line).map_err(|err| anyhow!("Invalid input: {err}"))?;

    match ShellLine::try_parse_from(tokens) {
        Ok(parsed) => dispatch(ledger, cfg, report_path, parsed.command),
        Err(err) => {
            // clap renders usage/help text itself, including the `help` command.
            err.print().ok();
            Ok(LoopControl::Continue)
        }
    }
}

fn dispatch(
    ledger: &mut Ledger,
    cfg: &AppConfig,
    report_path: &Path,
    command: ShellCommand,
) -> Result<LoopControl> {
    match command {
        ShellCommand::Wallet(args) => handle_account(ledger, AccountKind::Wallet, args.cmd)?,
        ShellCommand::Card(args) => handle_account(ledger, AccountKind::Card, args.cmd)?,
        ShellCommand::Deposit(args) => {
            let (kind, amount) = parse_movement(&args)?;
            let balance = ledger.deposit(kind, &args.name, amount)?;
            println!("Deposit successful. New balance: ${balance}");
        }
        ShellCommand::Withdraw(args) => {
            let (kind, amount) = parse_movement(&args)?;
            let balance = ledger.withdraw(kind, &args.name, amount)?;
            println!("Withdrawal successful. New balance: ${balance}");
        }
        ShellCommand::Expense(args) => {
            let balance = handle_expense(ledger, &args)?;
            println!("Expense added. New balance: ${balance}");
        }
        ShellCommand::Balance(args) => handle_balance(ledger, &args)?,
        ShellCommand::Categories => {
            for (i, category) in EXPENSE_CATEGORIES.iter().enumerate() {
                println!("{:2}. {category}", i + 1);
            }
        }
        ShellCommand::TopExpenses(args) => {
            handle_ranking(ledger, cfg, args, Ranking::Expenses)?;
        }
        ShellCommand::TopCategories(args) => {
            handle_ranking(ledger, cfg, args, Ranking::Categories)?;
        }
        ShellCommand::Report(args) => handle_report(ledger, cfg, report_path, args)?,
        ShellCommand::Exit => {
            println!("Exiting.");
            return Ok(LoopControl::Exit);
        }
    }
    Ok(LoopControl::Continue)
}

fn handle_account(ledger: &mut Ledger, kind: AccountKind, cmd: AccountCmd) -> Result<()> {
    match cmd {
        AccountCmd::Add { name } => {
            if kind == AccountKind::Card && !is_valid_card_name(&name) {
                return Err(anyhow!("Invalid card name. Only digits are allowed."));
            }
            ledger.add_account(kind, name.as_str());
            println!("Added {kind} '{name}'.");
        }
        AccountCmd::Remove { name } => {
            let removed = ledger.remove_accounts(kind, &name);
            if removed == 0 {
                println!("No {kind} named '{name}'.");
            } else {
                println!("Removed {removed} {kind}(s) named '{name}'.");
            }
        }
        AccountCmd::List => {
            let accounts = ledger.accounts(kind);
            if accounts.is_empty() {
                println!("(no {kind}s)");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = accounts
                .iter()
                .map(|a| vec![a.name().to_string(), format!("${}", a.balance())])
                .collect();
            print_table(&["NAME", "BALANCE"], &rows);
        }
    }
    Ok(())
}

fn handle_expense(ledger: &mut Ledger, args: &ExpenseArgs) -> Result<Decimal> {
    let kind = parse_kind(&args.kind)?;
    let amount = parse_positive_decimal(&args.amount)?;
    let category = resolve_category_arg(&args.category)?;
    Ok(ledger.record_expense(kind, &args.name, amount, &category)?)
}

fn handle_balance(ledger: &Ledger, args: &BalanceArgs) -> Result<()> {
    let kind = parse_kind(&args.kind)?;
    let account = ledger
        .find_account(kind, &args.name)
        .ok_or(LedgerError::AccountNotFound {
            kind,
            name: args.name.clone(),
        })?;
    println!("{kind} '{}' balance: ${}", account.name(), account.balance());
    Ok(())
}

fn handle_ranking(
    ledger: &Ledger,
    cfg: &AppConfig,
    args: RankArgs,
    which: Ranking,
) -> Result<()> {
    let n = args.limit.unwrap_or(cfg.top_n);

    match parse_window(args.month.as_deref(), args.range.as_deref())? {
        Some((start, end)) => {
            let selected = ledger.transactions_in_period(start, end);
            let label = format!("{} - {}", report_date(start), report_date(end));
            print_ranking(&which, &label, &selected, n);
        }
        None => {
            let now = now_utc();
            for (label, days) in [("the Last Week", 7), ("the Last Month", 30)] {
                let selected = ledger.transactions_in_period(now - Duration::days(days), now);
                print_ranking(&which, label, &selected, n);
            }
        }
    }
    Ok(())
}

fn handle_report(
    ledger: &Ledger,
    cfg: &AppConfig,
    report_path: &Path,
    args: ReportArgs,
) -> Result<()> {
    let Some((start, end)) = parse_window(args.month.as_deref(), args.range.as_deref())? else {
        return Err(anyhow!(
            "Report needs a window: --month YYYY-MM or --range YYYY-MM-DD..YYYY-MM-DD"
        ));
    };

    let generated = report::generate_reports(ledger, start, end, report_path, cfg.top_n)?;

    print!("{}", generated.text);
    for breakdown in &generated.breakdowns {
        println!("Top {} Expenses in {}:", cfg.top_n, breakdown.label);
        print_entries(&breakdown.expenses);
    }
    for breakdown in &generated.breakdowns {
        println!("Top {} Categories in {}:", cfg.top_n, breakdown.label);
        print_entries(&breakdown.categories);
    }
    println!("Reports saved to '{}'.", generated.path.display());
    Ok(())
}

fn print_ranking(which: &Ranking, label: &str, transactions: &[Transaction], n: usize) {
    match which {
        Ranking::Expenses => {
            println!("Top {n} Expenses in {label}:");
            print_entries(&report::top_expenses(transactions, n));
        }
        Ranking::Categories => {
            println!("Top {n} Categories in {label}:");
            print_entries(&report::top_categories(transactions, n));
        }
    }
}

fn print_entries(entries: &[(String, Decimal)]) {
    if entries.is_empty() {
        println!("(no transactions)");
        return;
    }
    for (category, amount) in entries {
        println!("{category:>15}: ${amount}");
    }
}

fn parse_movement(args: &MovementArgs) -> Result<(AccountKind, Decimal)> {
    Ok((parse_kind(&args.kind)?, parse_positive_decimal(&args.amount)?))
}

fn parse_kind(raw: &str) -> Result<AccountKind> {
    raw.parse::<AccountKind>().map_err(|err| anyhow!(err))
}

fn parse_positive_decimal(raw: &str) -> Result<Decimal> {
    let amount = raw
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal amount: {raw}"))?;
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Amount must be positive, got {amount}"));
    }
    Ok(amount)
}

/// Catalog category by canonical/case-insensitive name, or 1-based index as
/// shown by `categories`. Non-catalog names are passed through for the
/// ledger to reject.
fn resolve_category_arg(raw: &str) -> Result<String> {
    if let Ok(index) = raw.parse::<usize>() {
        return EXPENSE_CATEGORIES
            .get(index.wrapping_sub(1))
            .map(|c| c.to_string())
            .ok_or_else(|| {
                anyhow!(
                    "Category index out of range: {index} (expected 1-{})",
                    EXPENSE_CATEGORIES.len()
                )
            });
    }
    Ok(raw.to_string())
}

/// Card names mirror card numbers: digits only.
fn is_valid_card_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

fn parse_window(
    month: Option<&str>,
    range: Option<&str>,
) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
    if let Some(m) = month {
        return Ok(Some(parse_month_range(m)?));
    }
    if let Some(r) = range {
        return Ok(Some(parse_date_range(r)?));
    }
    Ok(None)
}

fn parse_month_range(raw: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let (y, m) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid --month. Expected YYYY-MM"))?;
    let year: i32 = y.parse()?;
    let month: u32 = m.parse()?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("Invalid month value"));
    }
    let start_date =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| anyhow!("Invalid date"))?;
    let start = Utc.from_utc_datetime(&NaiveDateTime::new(
        start_date,
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
    ));
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_start_date =
        NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| anyhow!("Invalid date"))?;
    let end = Utc.from_utc_datetime(&NaiveDateTime::new(
        next_start_date,
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
    )) - Duration::seconds(1);
    Ok((start, end))
}

fn parse_date_range(raw: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let (start, end) = raw
        .split_once("..")
        .ok_or_else(|| anyhow!("Invalid --range. Expected YYYY-MM-DD..YYYY-MM-DD"))?;
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")?;
    let start_dt = Utc.from_utc_datetime(&NaiveDateTime::new(
        start,
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
    ));
    let end_dt = Utc.from_utc_datetime(&NaiveDateTime::new(
        end,
        NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
    ));
    Ok((start_dt, end_dt))
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if headers.is_empty() {
        println!("(no columns)");
        return;
    }

    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();

    for row in rows {
        for (i, cell) in row.iter().take(cols).enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    fn print_row(cells: &[String], widths: &[usize]) {
        print!("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            print!(" {:width$} |", cell, width = *w);
        }
        println!();
    }

    fn print_sep(widths: &[usize]) {
        print!("|");
        for w in widths {
            print!("{}|", "-".repeat(w + 2));
        }
        println!();
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    print_row(&header_cells, &widths);
    print_sep(&widths);
    for row in rows {
        print_row(row, &widths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_names_must_be_all_digits() {
        assert!(is_valid_card_name("1234"));
        assert!(!is_valid_card_name(""));
        assert!(!is_valid_card_name("12a4"));
        assert!(!is_valid_card_name("main"));
    }

    #[test]
    fn category_arg_accepts_one_based_catalog_indices() {
        assert_eq!(resolve_category_arg("1").unwrap(), "Food");
        assert_eq!(resolve_category_arg("14").unwrap(), "Personal Care");
        assert!(resolve_category_arg("0").is_err());
        assert!(resolve_category_arg("15").is_err());
        assert_eq!(resolve_category_arg("Rent").unwrap(), "Rent");
    }

    #[test]
    fn month_window_covers_the_whole_month_inclusive() {
        let (start, end) = parse_month_range("2026-02").unwrap();
        assert_eq!(report_date(start), "2026-02-01");
        assert_eq!(report_date(end), "2026-02-28");
        assert!(parse_month_range("2026-13").is_err());
        assert!(parse_month_range("nope").is_err());
    }

    #[test]
    fn date_range_window_is_inclusive_of_both_days() {
        let (start, end) = parse_date_range("2026-01-05..2026-01-09").unwrap();
        assert_eq!(report_date(start), "2026-01-05");
        assert_eq!(report_date(end), "2026-01-09");
        assert!(parse_date_range("2026-01-05").is_err());
    }

    #[test]
    fn amounts_must_be_positive_decimals() {
        assert_eq!(parse_positive_decimal("12.50").unwrap(), "12.50".parse().unwrap());
        assert!(parse_positive_decimal("0").is_err());
        assert!(parse_positive_decimal("-5").is_err());
        assert!(parse_positive_decimal("abc").is_err());
    }
}
