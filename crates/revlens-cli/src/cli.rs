use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "revlens",
    about = "Revlens -- structural comparison of channel revisions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two channel files
    Compare(CompareArgs),
    /// List the components of one channel file
    Decompose(DecomposeArgs),
    /// Show the stored revisions of a channel
    History(HistoryArgs),
    /// Compare two stored revisions of a channel
    Diff(DiffArgs),
}

/// Presentation flags shared by `compare` and `diff`.
#[derive(Args, Clone, Debug, Default)]
pub struct ViewArgs {
    /// Hide unchanged components and groups
    #[arg(long)]
    pub changed_only: bool,
    /// Show the side-by-side diff of one component (e.g. "Destination [1]/Script")
    #[arg(long, value_name = "KEY")]
    pub component: Option<String>,
    /// Show the side-by-side diff of every changed component
    #[arg(long, conflicts_with = "component")]
    pub all: bool,
    /// Show the whole documents side by side
    #[arg(long)]
    pub raw: bool,
    /// Highlight whole lines only
    #[arg(long)]
    pub no_intraline: bool,
    /// Treat each filter or transformer as a single component
    #[arg(long)]
    pub block: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Args)]
pub struct DecomposeArgs {
    pub file: PathBuf,
    /// Print the content of one component
    #[arg(long, value_name = "KEY")]
    pub show: Option<String>,
    #[arg(long)]
    pub block: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub item: String,
    /// Revision store directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct DiffArgs {
    pub item: String,
    /// Older revision, or the revision to compare with its predecessor.
    /// Defaults to the newest revision.
    pub left: Option<String>,
    pub right: Option<String>,
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    #[command(flatten)]
    pub view: ViewArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compare() {
        let cli = Cli::try_parse_from(["revlens", "compare", "a.xml", "b.xml"]).unwrap();
        if let Command::Compare(args) = cli.command {
            assert_eq!(args.old, PathBuf::from("a.xml"));
            assert_eq!(args.new, PathBuf::from("b.xml"));
            assert!(!args.view.changed_only);
            assert!(!args.view.raw);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_compare_view_flags() {
        let cli = Cli::try_parse_from([
            "revlens", "compare", "a.xml", "b.xml",
            "--changed-only", "--no-intraline", "--block",
            "--component", "Destination [1]/Script",
        ])
        .unwrap();
        if let Command::Compare(args) = cli.command {
            assert!(args.view.changed_only);
            assert!(args.view.no_intraline);
            assert!(args.view.block);
            assert_eq!(args.view.component.as_deref(), Some("Destination [1]/Script"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn all_conflicts_with_component() {
        assert!(Cli::try_parse_from([
            "revlens", "compare", "a", "b", "--all", "--component", "x",
        ])
        .is_err());
    }

    #[test]
    fn parse_decompose_show() {
        let cli = Cli::try_parse_from(["revlens", "decompose", "c.xml", "--show", "Channel Properties"]).unwrap();
        if let Command::Decompose(args) = cli.command {
            assert_eq!(args.show.as_deref(), Some("Channel Properties"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_history() {
        let cli = Cli::try_parse_from(["revlens", "history", "orders", "--root", "/srv/channels"]).unwrap();
        if let Command::History(args) = cli.command {
            assert_eq!(args.item, "orders");
            assert_eq!(args.root, PathBuf::from("/srv/channels"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_with_previous() {
        let cli = Cli::try_parse_from(["revlens", "diff", "orders", "7"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.left.as_deref(), Some("7"));
            assert_eq!(args.right, None);
            assert_eq!(args.root, PathBuf::from("."));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_latest() {
        let cli = Cli::try_parse_from(["revlens", "diff", "orders"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.item, "orders");
            assert_eq!(args.left, None);
            assert_eq!(args.right, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_two_revisions() {
        let cli = Cli::try_parse_from(["revlens", "diff", "orders", "3", "7", "--all"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.right.as_deref(), Some("7"));
            assert!(args.view.all);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "revlens", "history", "orders", "--verbose", "--format", "json", "--config", "revlens.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("revlens.toml")));
    }
}
