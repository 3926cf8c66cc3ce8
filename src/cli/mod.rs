use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;

use crate::application::{Ledger, SpendingReport};
use crate::domain::{
    format_amount, parse_date, parse_positive_amount, validate_category, ExpenseRecord,
};
use crate::storage::{StoreKind, DEFAULT_EXPENSE_FILE};

/// Width of the longest bar in the summary chart.
const CHART_WIDTH: usize = 40;

/// Spendlog - Personal Expense Logger
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "A personal expense logger backed by a CSV file or an in-memory session")]
#[command(version)]
pub struct Cli {
    /// Storage backend: csv or memory
    #[arg(long, env = "SPENDLOG_STORE", default_value_t = StoreKind::Csv, global = true)]
    pub store: StoreKind,

    /// Expense file path (csv store only)
    #[arg(short, long, env = "SPENDLOG_FILE", default_value = DEFAULT_EXPENSE_FILE, global = true)]
    pub file: PathBuf,

    /// Log level: off, error, warn, info, debug, trace (RUST_LOG takes precedence)
    #[arg(long, default_value_t = LevelFilter::WARN, global = true)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session; with --store memory the data lives for the session only
    Shell,

    #[command(flatten)]
    Ledger(LedgerCommand),
}

/// Commands available both from the command line and inside the shell.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Create the expense store if it does not exist yet
    Init,

    /// Record a new expense
    Add {
        /// Amount spent (e.g., "12.50" or "12")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Category (e.g., "Food", "Rent")
        #[arg(short, long)]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all expenses
    List,

    /// List expenses of one category (case-insensitive)
    Filter {
        /// Category to match
        category: String,
    },

    /// Delete all expenses
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Totals per category
    Summary {
        /// Output format: chart, table, json, csv
        #[arg(long, default_value = "chart")]
        format: String,
    },
}

impl LedgerCommand {
    fn is_mutating(&self) -> bool {
        matches!(self, LedgerCommand::Add { .. } | LedgerCommand::Clear { .. })
    }
}

/// Parser for one line typed into the shell.
#[derive(Parser)]
#[command(name = "spendlog", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: LedgerCommand,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut ledger = Ledger::new(self.store.open(&self.file));
        ledger
            .initialize()
            .with_context(|| format!("Failed to initialize expense store at {}", ledger.location()))?;

        let mut session = Session::new(&mut ledger, io::stdin().lock(), io::stdout().lock());

        match self.command {
            Commands::Shell => session.run_shell(),
            Commands::Ledger(command) => {
                if self.store == StoreKind::Memory && command.is_mutating() {
                    warn!(
                        "the in-memory store is discarded when this command exits; \
                         use `spendlog --store memory shell` to keep data for a session"
                    );
                }
                session.execute(command)
            }
        }
    }
}

/// Drives a ledger from user commands, reading confirmations from `input`
/// and writing everything meant for the user to `out`.
pub struct Session<'a, R, W> {
    ledger: &'a mut Ledger,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(ledger: &'a mut Ledger, input: R, out: W) -> Self {
        Self { ledger, input, out }
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run a single command.
    pub fn execute(&mut self, command: LedgerCommand) -> Result<()> {
        debug!(?command, "executing command");

        match command {
            LedgerCommand::Init => {
                self.ledger.initialize()?;
                writeln!(
                    self.out,
                    "Expense store initialized: {}",
                    self.ledger.location()
                )?;
            }

            LedgerCommand::Add {
                amount,
                category,
                date,
                description,
            } => self.run_add(&amount, &category, date.as_deref(), description)?,

            LedgerCommand::List => {
                let records = self.ledger.list_all()?;
                if records.is_empty() {
                    writeln!(self.out, "No expenses recorded yet.")?;
                } else {
                    write_expense_table(&mut self.out, &records)?;
                }
            }

            LedgerCommand::Filter { category } => {
                let records = self.ledger.filter_by_category(&category)?;
                if records.is_empty() {
                    writeln!(self.out, "No records found.")?;
                } else {
                    write_expense_table(&mut self.out, &records)?;
                }
            }

            LedgerCommand::Clear { yes } => self.run_clear(yes)?,

            LedgerCommand::Summary { format } => self.run_summary(&format)?,
        }

        Ok(())
    }

    /// Read commands line by line until `exit`, `quit` or end of input.
    pub fn run_shell(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "spendlog shell ({}). Type 'help' for commands, 'exit' to quit.",
            self.ledger.location()
        )?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let words = match split_words(line.trim()) {
                Ok(words) => words,
                Err(e) => {
                    writeln!(self.out, "Error: {}", e)?;
                    continue;
                }
            };

            match words.first().map(String::as_str) {
                None => continue,
                Some("exit" | "quit") => break,
                Some(_) => {}
            }

            match ShellLine::try_parse_from(&words) {
                Ok(parsed) => {
                    if let Err(e) = self.execute(parsed.command) {
                        writeln!(self.out, "Error: {:#}", e)?;
                    }
                }
                Err(e) => write!(self.out, "{}", e.render())?,
            }
        }

        Ok(())
    }

    fn run_add(
        &mut self,
        amount: &str,
        category: &str,
        date: Option<&str>,
        description: Option<String>,
    ) -> Result<()> {
        let amount = parse_positive_amount(amount)?;
        let category = validate_category(category)?;
        let date = match date {
            Some(date_str) => parse_date(date_str)?,
            None => Local::now().date_naive(),
        };
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let record = self
            .ledger
            .add_expense(date, category, amount, description)
            .context("Failed to save expense")?;

        writeln!(
            self.out,
            "Added expense: {} {} {}",
            record.date, record.category, record.amount
        )?;
        Ok(())
    }

    fn run_clear(&mut self, confirmed: bool) -> Result<()> {
        let confirmed = confirmed || {
            write!(self.out, "Type 'yes' to delete all expenses: ")?;
            self.out.flush()?;
            let mut answer = String::new();
            self.input.read_line(&mut answer)?;
            answer.trim().eq_ignore_ascii_case("yes")
        };

        if !confirmed {
            warn!("clear aborted, not confirmed");
            writeln!(self.out, "Aborted: nothing was deleted.")?;
            return Ok(());
        }

        self.ledger.clear_all()?;
        writeln!(self.out, "All expenses cleared.")?;
        Ok(())
    }

    fn run_summary(&mut self, format: &str) -> Result<()> {
        let report = self.ledger.spending_report()?;

        match format {
            "json" => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(&report)?)?;
            }
            "csv" => {
                let mut writer = csv::Writer::from_writer(&mut self.out);
                writer.write_record(["category", "total", "count", "percentage"])?;
                for cat in &report.categories {
                    writer.write_record([
                        cat.category.clone(),
                        format_amount(cat.total),
                        cat.count.to_string(),
                        format!("{:.2}", cat.percentage),
                    ])?;
                }
                writer.flush()?;
            }
            "table" | "chart" => {
                if report.is_empty() {
                    writeln!(self.out, "No expenses to summarize.")?;
                } else if format == "table" {
                    write_summary_table(&mut self.out, &report)?;
                } else {
                    write_bar_chart(&mut self.out, &report)?;
                }
                if report.skipped > 0 {
                    writeln!(
                        self.out,
                        "({} record(s) with a non-numeric amount left out)",
                        report.skipped
                    )?;
                }
            }
            _ => {
                anyhow::bail!(
                    "Invalid summary format '{}'. Valid formats: chart, table, json, csv",
                    format
                );
            }
        }

        Ok(())
    }
}

fn write_expense_table<W: Write>(out: &mut W, records: &[ExpenseRecord]) -> Result<()> {
    writeln!(
        out,
        "{:<12} {:<20} {:>12} DESCRIPTION",
        "DATE", "CATEGORY", "AMOUNT"
    )?;
    writeln!(out, "{}", "-".repeat(70))?;
    for record in records {
        writeln!(
            out,
            "{:<12} {:<20} {:>12} {}",
            record.date.format("%Y-%m-%d"),
            truncate(&record.category, 20),
            record.display_amount(),
            truncate(record.description.as_deref().unwrap_or(""), 30)
        )?;
    }
    Ok(())
}

fn write_summary_table<W: Write>(out: &mut W, report: &SpendingReport) -> Result<()> {
    writeln!(
        out,
        "{:<20} {:>12} {:>8} {:>8}",
        "CATEGORY", "TOTAL", "COUNT", "PERCENT"
    )?;
    writeln!(out, "{}", "-".repeat(51))?;
    for cat in &report.categories {
        writeln!(
            out,
            "{:<20} {:>12} {:>8} {:>7.1}%",
            truncate(&cat.category, 20),
            format_amount(cat.total),
            cat.count,
            cat.percentage
        )?;
    }
    writeln!(out, "{}", "-".repeat(51))?;
    writeln!(out, "{:<20} {:>12}", "TOTAL", format_amount(report.total))?;
    Ok(())
}

/// One horizontal bar per category, scaled to the largest total.
fn write_bar_chart<W: Write>(out: &mut W, report: &SpendingReport) -> Result<()> {
    let label_width = report
        .categories
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0)
        .min(20);
    let max = report.max_total();

    writeln!(out, "Spending by category")?;
    writeln!(out)?;
    for cat in &report.categories {
        writeln!(
            out,
            "{:<width$} | {} {}",
            truncate(&cat.category, 20),
            "█".repeat(bar_length(cat.total, max)),
            format_amount(cat.total),
            width = label_width
        )?;
    }
    Ok(())
}

fn bar_length(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max * CHART_WIDTH as f64).round() as usize).clamp(1, CHART_WIDTH)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Split a shell line into words. Single or double quotes group words.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        anyhow::bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
