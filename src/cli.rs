use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "monedero")]
#[command(about = "Personal finance ledger", long_about = None)]
pub struct Cli {
    /// Override Monedero home directory (config subdir will be created inside it).
    #[arg(long, env = "MONEDERO_HOME")]
    pub home: Option<PathBuf>,

    /// Override the report output path (default: financial_reports.txt in the
    /// working directory).
    #[arg(long)]
    pub report_file: Option<PathBuf>,
}

/// One interactive line. `multicall` treats the first token as the command.
#[derive(Debug, Parser)]
#[command(name = "monedero", multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Manage wallets
    Wallet(AccountArgs),
    /// Manage cards (names must be all digits)
    Card(AccountArgs),
    /// Deposit into an account
    Deposit(MovementArgs),
    /// Withdraw from an account
    Withdraw(MovementArgs),
    /// Record a categorized expense against an account
    Expense(ExpenseArgs),
    /// Show the balance of one account
    Balance(BalanceArgs),
    /// List the expense category catalog
    Categories,
    /// Rank transactions by amount
    TopExpenses(RankArgs),
    /// Rank categories by summed spend
    TopCategories(RankArgs),
    /// Generate the detailed report and persist it
    Report(ReportArgs),
    /// End the session
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Subcommand)]
pub enum AccountCmd {
    Add { name: String },
    Remove { name: String },
    List,
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub cmd: AccountCmd,
}

#[derive(Debug, Args)]
pub struct MovementArgs {
    /// Account kind: wallet or card.
    pub kind: String,

    pub name: String,

    /// Positive decimal amount.
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct ExpenseArgs {
    /// Account kind: wallet or card.
    pub kind: String,

    pub name: String,

    /// Positive decimal amount.
    pub amount: String,

    /// Catalog category, by name (quote multi-word names) or 1-based index.
    pub category: String,
}

#[derive(Debug, Args)]
pub struct BalanceArgs {
    /// Account kind: wallet or card.
    pub kind: String,

    pub name: String,
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Window as a month, YYYY-MM. Without a window, last-week and
    /// last-month sections are shown.
    #[arg(long)]
    pub month: Option<String>,

    /// Window as an inclusive date range, YYYY-MM-DD..YYYY-MM-DD.
    #[arg(long, conflicts_with = "month")]
    pub range: Option<String>,

    /// How many entries to show (default: configured top_n).
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Window as a month, YYYY-MM.
    #[arg(long)]
    pub month: Option<String>,

    /// Window as an inclusive date range, YYYY-MM-DD..YYYY-MM-DD.
    #[arg(long, conflicts_with = "month")]
    pub range: Option<String>,
}
