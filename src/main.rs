//! pagekit - replay page interactions against a page fixture
//!
//! Mounts every page behavior on a TOML page fixture, optionally replays an
//! event script, and prints the resulting visual state.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use pagekit::page::Page;
use pagekit::{
    AnyStore, FileStore, MemoryStore, PageFixture, PreferenceStore, Script, Simulation, SiteConfig,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = Command::new("pagekit")
        .version(pagekit::VERSION)
        .about("Replay theme, menu, scroll and gallery interactions against a page fixture")
        .long_about(
            "pagekit mounts the interactive behaviors of a static site on a page described \
             in TOML, replays a scripted sequence of loads, clicks, scrolls and waits, and \
             prints the resulting classes, inline styles and scroll position.",
        )
        .arg(
            Arg::new("fixture")
                .help("Path to the page fixture (TOML)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("script")
                .long("script")
                .short('s')
                .value_name("FILE")
                .help("Event script to replay (TOML)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Site configuration overriding ids, classes and timings"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .value_name("FILE")
                .help("Preference file (defaults to the user data directory)"),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .action(ArgAction::SetTrue)
                .conflicts_with("store")
                .help("Keep preferences in memory only"),
        )
        .get_matches();

    let fixture_path = PathBuf::from(
        matches
            .get_one::<String>("fixture")
            .context("fixture argument is required")?,
    );
    if !fixture_path.is_file() {
        anyhow::bail!("Fixture is not a regular file: {}", fixture_path.display());
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            SiteConfig::load(path).with_context(|| format!("Failed to load config {}", path))?
        }
        None => SiteConfig::default(),
    };

    let store = if matches.get_flag("ephemeral") {
        AnyStore::Memory(MemoryStore::new())
    } else if let Some(path) = matches.get_one::<String>("store") {
        AnyStore::File(FileStore::new(path))
    } else {
        AnyStore::File(FileStore::default_location()?)
    };

    let fixture = PageFixture::load(&fixture_path)?.build()?;
    let mut simulation = Simulation::start(fixture, store, &config)?;

    if let Some(path) = matches.get_one::<String>("script") {
        let script = Script::load(path)?;
        simulation.run(&script).await?;
    }

    let app = simulation.app();
    let page = app.page();
    println!("scroll offset: {}", page.scroll_offset());
    if let Some(theme) = app.theme() {
        println!("theme: {:?}", theme.mode());
    }
    if let Some(stored) = app.store().get(&config.theme.storage_key)? {
        println!("stored {}: {}", config.theme.storage_key, stored);
    }
    for element in page.snapshot() {
        if element.id.is_some() || !element.classes.is_empty() || !element.styles.is_empty() {
            println!("  {}", element);
        }
    }

    Ok(())
}
