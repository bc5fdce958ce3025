use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rInvoice
/// Terminal invoice builder with PDF export and WhatsApp sharing
#[derive(Parser)]
#[command(
    name = "rinvoice",
    version = env!("CARGO_PKG_VERSION"),
    about = "Build an invoice from line items, preview it, export it to PDF or share it via WhatsApp",
    long_about = None
)]
pub struct Cli {
    /// Override the configuration file (useful for tests or multiple issuers)
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Invoice content given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct DraftArgs {
    /// Recipient name ("Issued To")
    #[arg(long = "to", value_name = "NAME")]
    pub to: Option<String>,

    /// Line item as "description;qty;price" (repeatable)
    #[arg(long = "item", value_name = "ITEM")]
    pub items: Vec<String>,

    /// Start from a draft saved with the shell's `save` command
    #[arg(long = "draft", value_name = "FILE")]
    pub draft: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        #[arg(long, short = 'f', help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Interactive invoice editor session
    Shell {
        #[arg(long = "draft", value_name = "FILE", help = "Draft to load at start")]
        draft: Option<PathBuf>,
    },

    /// Render the invoice and save it as a one-page PDF
    Export {
        #[command(flatten)]
        draft: DraftArgs,

        #[arg(long = "out", value_name = "DIR", help = "Output directory (default: config output_dir)")]
        out: Option<PathBuf>,

        #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Issue date (default: today)")]
        date: Option<String>,

        #[arg(long = "open", help = "Open the preview in the system PDF viewer")]
        open: bool,

        #[arg(long, short = 'y', help = "Save without asking for confirmation")]
        yes: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file")]
        force: bool,
    },

    /// Share the invoice total via a WhatsApp link
    Share {
        #[command(flatten)]
        draft: DraftArgs,

        #[arg(long = "print-only", help = "Print the link instead of opening it")]
        print_only: bool,
    },
}
