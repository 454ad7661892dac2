use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "toondo",
    bin_name = "toondo",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "A plain text task list for the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the task list (overrides config and TOONDO_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task description (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Print tasks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every task with this description
    #[command(alias = "rm")]
    Delete {
        /// Task description (words are joined with spaces)
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        description: Vec<String>,

        /// Delete a single task by id instead
        #[arg(long)]
        id: Option<String>,
    },

    /// Check and repair the task list file
    Doctor,

    /// Create the task list file
    Init,

    /// Print the task list location
    Path,
}

/// Join positional words into one description.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
