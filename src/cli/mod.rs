mod commands;

pub use commands::Cli;
pub use commands::Commands;

use crate::error::Result;
use crate::storage::Store;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(Store::default_dir);
    let store = Store::new(&data_dir);
    let json_output = cli.json;

    match cli.command {
        Some(Commands::List) => commands::list(&store, json_output),
        Some(Commands::Add { text, to }) => commands::add(&store, &text, &to, json_output),
        Some(Commands::Move { id, to, at }) => commands::move_card(&store, &id, &to, at, json_output),
        Some(Commands::Delete { id }) => commands::delete(&store, &id, json_output),
        Some(Commands::Tui) => crate::tui::run_tui(store),
        Some(Commands::Version) => commands::version(),
        None => commands::default_action(),
    }
}
