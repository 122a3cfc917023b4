use anyhow::Result;
use clap::Args;
use console::{Term, style};
use photometer::{Config, PersistentLog};

use crate::ui::table::{Formatter, HistoryRow};

#[derive(Clone, Debug, Args)]
pub struct HistoryArg {
    #[command(subcommand)]
    pub cmd: HistoryCommands,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum HistoryCommands {
    #[command(alias = "ls", name = "list")]
    List(ListArg),
    #[command(name = "clear")]
    Clear(ClearArg),
}

#[derive(Clone, Debug, Args)]
pub struct ListArg {
    /// Show at most this many of the most recent records.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct ClearArg {
    /// Skip the confirmation prompt.
    #[arg(long, short)]
    pub yes: bool,
}

impl HistoryArg {
    pub fn run(self, config: &Config) -> Result<()> {
        let log = PersistentLog::new(super::open_store(config)?);
        match self.cmd {
            HistoryCommands::List(arg) => arg.run(&log),
            HistoryCommands::Clear(arg) => arg.run(&log),
        }
    }
}

impl ListArg {
    fn run(self, log: &PersistentLog) -> Result<()> {
        let records = log.load_all()?;
        if records.is_empty() {
            println!("{}", style("no measurements yet").dim());
            return Ok(());
        }

        let total = records.len();
        let rows = records
            .iter()
            .take(self.limit.unwrap_or(total))
            .enumerate()
            .map(|(i, record)| HistoryRow::new(i + 1, record))
            .collect::<Vec<_>>();
        let shown = rows.len();
        let table = Formatter {
            header: Some("Measurement history".to_string()),
            footer: (shown < total).then(|| format!("{shown} of {total} measurements")),
        }
        .build(rows);
        println!("{table}");
        Ok(())
    }
}

impl ClearArg {
    fn run(self, log: &PersistentLog) -> Result<()> {
        if !self.yes && !confirm("Clear all measurement history? This cannot be undone. [y/N] ")? {
            println!("{}", style("aborted").dim());
            return Ok(());
        }
        log.clear()?;
        println!("{}", style("history cleared").green());
        Ok(())
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(prompt)?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
