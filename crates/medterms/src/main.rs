//! `medterms` - CLI for the medical abbreviations reference
//!
//! This binary browses, searches, and edits the abbreviation store and runs
//! the seed converter.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use medterms::cli::{
    self, render, AddCommand, Cli, Command, ConfigCommand, EditCommand, EntryRef,
    IngestCommand, ListCommand, OutputFormat, SearchCommand, ShowCommand,
};
use medterms::{
    ingest, init_logging, Config, Entry, EntryUpdate, Error, FavoritesChange, LoadedFrom, Section,
    Store,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Favorites(cmd) => {
            let store = open_store(&config)?;
            print!("{}", render::entries(&store.favorites(), cmd.format)?);
            Ok(())
        }
        Command::Search(cmd) => handle_search(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Add(cmd) => handle_add(&config, cmd),
        Command::Edit(cmd) => handle_edit(&config, cmd),
        Command::Favorite(entry) => handle_favorite(&config, &entry),
        Command::Delete(entry) => handle_delete(&config, &entry),
        Command::Ingest(cmd) => handle_ingest(&config, cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> Result<Store> {
    let store = Store::load(config.document_path(), &config.seed())
        .context("failed to load the abbreviation store")?;
    Ok(store.with_pretty(config.storage.pretty))
}

/// Open the store with an observer that records favorites changes.
fn open_store_watched(config: &Config) -> Result<(Store, Rc<Cell<usize>>)> {
    let mut store = open_store(config)?;
    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    store.subscribe(Box::new(move |change: &FavoritesChange| {
        debug!("Favorites changed: {change:?}");
        counter.set(counter.get() + 1);
    }));
    Ok((store, changes))
}

fn save_if_dirty(store: &mut Store) -> Result<()> {
    if store.is_dirty() {
        store
            .save()
            .with_context(|| format!("failed to save {}", store.path().display()))?;
    }
    Ok(())
}

fn report_favorites(store: &Store, changes: &Cell<usize>) {
    if changes.get() > 0 {
        println!("Favorites: {}", store.favorites().len());
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let store = open_store(config)?;

    let out = if let Some(name) = &cmd.section {
        let Some(section) = store
            .sections()
            .iter()
            .find(|section| section.name().eq_ignore_ascii_case(name))
        else {
            bail!(Error::invalid_input(format!("no section named '{name}'")));
        };
        render::listing(&[], &[section], cmd.format)?
    } else {
        let sections: Vec<&Section> = store.sections().iter().collect();
        render::listing(&store.favorites(), &sections, cmd.format)?
    };

    print!("{out}");
    Ok(())
}

fn handle_search(config: &Config, cmd: &SearchCommand) -> Result<()> {
    let store = open_store(config)?;

    if cmd.query.is_empty() {
        let sections: Vec<&Section> = store.sections().iter().collect();
        print!("{}", render::listing(&store.favorites(), &sections, cmd.format)?);
        return Ok(());
    }

    let found = store.search(&cmd.query);
    if found.is_empty() && cmd.format != OutputFormat::Json {
        println!("No entries match \"{}\"", cmd.query);
        return Ok(());
    }
    print!("{}", render::entries(&found, cmd.format)?);
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> Result<()> {
    let store = open_store(config)?;
    let id = cli::resolve(&store, &cmd.entry)?;

    let section = store
        .sections()
        .iter()
        .find(|section| section.entries().iter().any(|entry| entry.id() == id))
        .ok_or(Error::EntryNotFound(id))?;
    let entry = store.entry(id).ok_or(Error::EntryNotFound(id))?;

    print!("{}", render::detail(entry, section.name(), cmd.format)?);
    Ok(())
}

fn handle_add(config: &Config, cmd: AddCommand) -> Result<()> {
    let abbreviation = cmd.abbreviation.trim();
    let term = cmd.term.trim();
    if abbreviation.is_empty() || term.is_empty() {
        bail!(Error::invalid_input("abbreviation and term must not be empty"));
    }
    let comment = cmd.comment.filter(|comment| !comment.trim().is_empty());

    let (mut store, changes) = open_store_watched(config)?;
    let text = render::entry_text(store.create_entry(
        abbreviation,
        term,
        comment,
        Some(!cmd.no_favorite),
    ));
    save_if_dirty(&mut store)?;

    println!("Added {text}");
    report_favorites(&store, &changes);
    Ok(())
}

fn handle_edit(config: &Config, cmd: EditCommand) -> Result<()> {
    let update = EntryUpdate {
        abbreviation: cmd.rename,
        term: cmd.term,
        comment: cmd.comment,
    };
    if update.is_empty() {
        bail!(Error::invalid_input(
            "nothing to change; pass --term, --comment, or --rename"
        ));
    }
    if update.abbreviation.as_deref().is_some_and(|a| a.trim().is_empty())
        || update.term.as_deref().is_some_and(|t| t.trim().is_empty())
    {
        bail!(Error::invalid_input("abbreviation and term must not be empty"));
    }

    let mut store = open_store(config)?;
    let id = cli::resolve(&store, &cmd.entry)?;

    if store.update_entry(id, update)? {
        save_if_dirty(&mut store)?;
        if let Some(entry) = store.entry(id) {
            println!("Updated {}", render::entry_text(entry));
        }
    } else {
        println!("No changes.");
    }
    Ok(())
}

fn handle_favorite(config: &Config, entry: &EntryRef) -> Result<()> {
    let (mut store, changes) = open_store_watched(config)?;
    let id = cli::resolve(&store, entry)?;

    let favorite = store.toggle_favorite(id)?;
    save_if_dirty(&mut store)?;

    let abbreviation = store.entry(id).map_or("", Entry::abbreviation);
    if favorite {
        println!("Added {abbreviation} to favorites");
    } else {
        println!("Removed {abbreviation} from favorites");
    }
    report_favorites(&store, &changes);
    Ok(())
}

fn handle_delete(config: &Config, entry: &EntryRef) -> Result<()> {
    let (mut store, changes) = open_store_watched(config)?;
    let id = cli::resolve(&store, entry)?;

    let removed = store.delete_entry(id)?;
    save_if_dirty(&mut store)?;

    println!("Deleted {}", render::entry_text(&removed));
    report_favorites(&store, &changes);
    Ok(())
}

fn handle_ingest(config: &Config, cmd: IngestCommand) -> Result<()> {
    let input = std::fs::read_to_string(&cmd.input)
        .with_context(|| format!("failed to read {}", cmd.input.display()))?;
    let ingestion = ingest::parse(&input);

    let csv_path = cmd.csv.unwrap_or_else(|| config.ingest.csv_file.clone());
    let json_path = cmd.json.unwrap_or_else(|| config.ingest.json_file.clone());
    ingest::write_outputs(&ingestion, &csv_path, &json_path, config.csv_delimiter())?;

    println!(
        "Converted {} entries under {} headers",
        ingestion.entry_count(),
        ingestion.header_count()
    );
    let per_section: Vec<String> = ingestion
        .sections
        .iter()
        .filter(|section| !section.is_empty())
        .map(|section| format!("{} {}", section.name(), section.len()))
        .collect();
    if !per_section.is_empty() {
        println!("  Sections: {}", per_section.join(", "));
    }
    println!("  CSV:  {}", csv_path.display());
    println!("  JSON: {}", json_path.display());
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats();
    let source = match store.loaded_from() {
        LoadedFrom::Document(path) => path.display().to_string(),
        LoadedFrom::Seed(seed) => seed.to_string(),
    };

    if json {
        let status = serde_json::json!({
            "document_path": store.path(),
            "loaded_from": source,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("medterms status");
        println!("---------------");
        println!("Document:      {}", store.path().display());
        println!("Loaded from:   {source}");
        println!("Sections:      {}", stats.sections);
        println!("Entries:       {}", stats.entries);
        println!("Favorites:     {}", stats.favorites);
        println!("Added by you:  {}", stats.custom);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Document path:  {}", config.document_path().display());
                println!("  Seed:           {}", config.seed());
                println!("  Pretty JSON:    {}", config.storage.pretty);
                println!();
                println!("[Ingest]");
                println!("  CSV delimiter:  {:?}", config.ingest.csv_delimiter);
                println!("  CSV file:       {}", config.ingest.csv_file.display());
                println!("  JSON file:      {}", config.ingest.json_file.display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path: PathBuf = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
