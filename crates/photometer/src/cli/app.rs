use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use super::history::HistoryArg;
use super::measure::MeasureArg;

#[derive(Clone, Debug, Parser)]
#[command(name = "photometer", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Config file; defaults to ~/.photometer/config.toml when present.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides it.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "m", name = "measure", about = "Upload images and show their measurements")]
    Measure(MeasureArg),
    #[command(alias = "h", name = "history", about = "List or clear past measurements")]
    History(HistoryArg),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::history::HistoryCommands;
    use clap::CommandFactory;
    use photometer::RequestKind;

    #[test]
    fn command_is_consistent() {
        App::command().debug_assert();
    }

    #[test]
    fn parses_measure_with_kind() {
        let app = App::try_parse_from(["photometer", "-v", "m", "a.jpg", "b.jpg", "--kind", "absorbance"])
            .unwrap();
        assert_eq!(app.verbose, 1);
        let Commands::Measure(arg) = app.cmd else {
            panic!("expected measure");
        };
        assert_eq!(arg.images, vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert_eq!(arg.kind, Some(RequestKind::Absorbance));
    }

    #[test]
    fn parses_history_clear() {
        let app = App::try_parse_from(["photometer", "history", "clear", "--yes"]).unwrap();
        assert!(matches!(
            app.cmd,
            Commands::History(ref arg) if matches!(arg.cmd, HistoryCommands::Clear(ref clear) if clear.yes)
        ));
        assert!(App::try_parse_from(["photometer", "measure"]).is_err());
    }
}
