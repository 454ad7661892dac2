//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the logger
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Logging**: `env_logger` on stderr, `warn` by default, `debug` with `-v`
//! 3. **Context Setup**: Load configuration and build the API
//! 4. **Dispatch**: Route commands to API calls
//! 5. **Output Formatting**: Hand results to `render.rs`

use super::render::{print_messages, print_tasks, tasks_json};
use super::setup::{join_words, Cli, Commands};
use clap::Parser;
use log::debug;
use toondoapp::api::TaskApi;
use toondoapp::error::Result;
use toondoapp::init::initialize;
use toondoapp::store::StorageBackend;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let ctx = initialize(cli.data.clone())?;
    debug!("using task list at {}", ctx.api.location().display());

    dispatch(&ctx.api, cli.command.unwrap_or(Commands::List { json: false }))
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn dispatch<B: StorageBackend>(api: &TaskApi<B>, command: Commands) -> Result<()> {
    match command {
        Commands::Add { description } => {
            let result = api.add_task(&join_words(&description))?;
            print_messages(&result.messages);
        }
        Commands::List { json } => {
            let result = api.list_tasks()?;
            if json {
                println!("{}", tasks_json(&result.listed_tasks)?);
            } else {
                print_tasks(&result.listed_tasks);
            }
            print_messages(&result.messages);
        }
        Commands::Delete { description, id } => {
            let result = match id {
                Some(id) => api.delete_task_by_id(&id)?,
                None => api.delete_task(&join_words(&description))?,
            };
            print_messages(&result.messages);
        }
        Commands::Doctor => print_messages(&api.doctor()?.messages),
        Commands::Init => print_messages(&api.init()?.messages),
        Commands::Path => println!("{}", api.location().display()),
    }
    Ok(())
}
