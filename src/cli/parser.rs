use crate::models::shift_entry::ShiftId;
use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for rShiftClock
/// CLI shift clock that records completed shifts in a Google Sheets ledger
#[derive(Parser)]
#[command(
    name = "rshiftclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple shift clock: clock operators in and out and record each shift in a spreadsheet",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        /// Print the current configuration file to stdout
        #[arg(long = "print", help = "Print the current configuration (token masked)")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Clock in a new shift
    In {
        /// Operator name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Show a shift that is already on the roster
    ///
    /// The selection lasts for this invocation only; `out` and `cancel` still take an id.
    Select {
        /// Shift id as shown by `list`
        id: ShiftId,
    },

    /// Clock out a shift and record it in the spreadsheet
    Out {
        /// Shift id as shown by `list`
        id: ShiftId,
    },

    /// Re-attempt recording shifts that are clocked out but not yet in the spreadsheet
    #[command(group(ArgGroup::new("target").required(true).args(["id", "all"])))]
    Retry {
        /// Shift id to retry
        id: Option<ShiftId>,

        /// Retry every pending shift
        #[arg(long)]
        all: bool,
    },

    /// Remove a shift from the roster without recording it
    Cancel {
        /// Shift id as shown by `list`
        id: ShiftId,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List shifts on the roster
    List,

    /// Show or change the spreadsheet used as ledger
    #[command(group(ArgGroup::new("action").args(["select", "clear", "verify"])))]
    Sheet {
        /// Spreadsheet id returned by the picker
        #[arg(long, value_name = "ID")]
        select: Option<String>,

        /// Human label for the selected spreadsheet
        #[arg(long, value_name = "NAME", requires = "select")]
        name: Option<String>,

        /// Forget the selected spreadsheet
        #[arg(long)]
        clear: bool,

        /// Check that the selected spreadsheet still exists
        #[arg(long)]
        verify: bool,
    },

    /// Toggle dark mode, or force it with --on / --off
    Dark {
        #[arg(long, conflicts_with = "off")]
        on: bool,

        #[arg(long)]
        off: bool,
    },

    /// Sign in or out of the spreadsheet service
    #[command(group(ArgGroup::new("auth_action").required(true).args(["token", "logout", "status"])))]
    Auth {
        /// Store an OAuth access token obtained from the sign-in flow
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// Forget the stored token
        #[arg(long)]
        logout: bool,

        /// Show whether a token is stored
        #[arg(long)]
        status: bool,
    },

    /// Print the internal audit log
    Log {
        /// Print rows from the internal `log` table
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
