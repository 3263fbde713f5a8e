use clap::Parser;
use color_eyre::Result;
use agenda::{
    cli::{self, Cli, Commands},
    logging::{init_logging, LogTarget},
    tui,
    utils::today,
    Agenda, AgendaOptions, Config, NoteStore, Profile, SqliteStorage,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config and store apart from the real ones
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = Config::load_with_profile(profile, cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Tui);
    let target = match command {
        Commands::Tui => LogTarget::Tui,
        _ => LogTarget::Cli,
    };
    init_logging(config.get_log_path().as_deref(), target)?;

    let store_path = config.get_store_path();
    let storage = SqliteStorage::open(
        store_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Store path contains invalid UTF-8"))?,
    )?;
    let options = AgendaOptions {
        accent: config.accent(),
        default_category: config.default_category(),
        view_mode: config.view_mode(),
    };
    let mut agenda = Agenda::new(NoteStore::new(Box::new(storage)), options, today());

    match command {
        Commands::Tui => {
            let config_path = match cli.config {
                Some(path) => Some(path),
                None => Config::get_config_path(profile).ok(),
            };
            let app = tui::App::new(config, config_path, agenda, today());
            tui::run_event_loop(app)?;
        }
        Commands::Add { title, category, date, color, description } => {
            cli::handle_add(title, category, date, color, description, &mut agenda)?;
        }
        Commands::Edit { id, title, date, category, color, description } => {
            cli::handle_edit(id, title, date, category, color, description, &mut agenda)?;
        }
        Commands::Delete { id, yes } => {
            cli::handle_delete(id, yes, &mut agenda)?;
        }
        Commands::Day { date } => {
            cli::handle_day(date, &agenda)?;
        }
        Commands::Upcoming { limit } => {
            cli::handle_upcoming(limit, &agenda)?;
        }
        Commands::Grid { date, view } => {
            cli::handle_grid(date, view, &agenda)?;
        }
        Commands::Export => {
            cli::handle_export(&agenda)?;
        }
        Commands::Import { file } => {
            cli::handle_import(file, &mut agenda)?;
        }
    }

    Ok(())
}
