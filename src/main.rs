mod cli;

use clap::Parser;
use cli::{Cli, CookieCommands, Commands};
use crawlstore::config::Config;
use crawlstore::observability;
use crawlstore::store::CrawlStore;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(path) = cli.path {
        config.store.path = path;
        config.validate()?;
    }

    observability::init_logging(&config.logging);

    if let Commands::Config = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let store = CrawlStore::open(&config.store)?;

    match cli.command {
        Commands::Init | Commands::Config => {}
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&store.stats()?)?);
        }
        Commands::Enqueue { payload } => {
            let seq = store.queue().enqueue(payload.as_bytes())?;
            println!("{seq}");
        }
        Commands::Dequeue => match store.queue().dequeue() {
            Ok(item) => println!("{}", String::from_utf8_lossy(&item)),
            Err(e) if e.is_empty_queue() => println!("{e}"),
            Err(e) => return Err(e.into()),
        },
        Commands::Visit { id } => store.visited().mark_visited(id)?,
        Commands::Visited { id } => println!("{}", store.visited().is_visited(id)?),
        Commands::Cookies { command } => match command {
            CookieCommands::Get { origin } => {
                let cookies = store.cookies().try_get_cookies(&origin)?;
                println!("{}", cookies.unwrap_or_default());
            }
            CookieCommands::Set { origin, value } => {
                store.cookies().try_set_cookies(&origin, &value)?;
            }
        },
    }

    store.close()?;
    Ok(())
}
