use crate::{OutputMode, emit_success};
use owo_colors::OwoColorize;
use savespot::config::{self, SavespotConfig};
use savespot::navigation::{self, SystemOpener, UrlDispatcher};
use savespot::storage::DestinationStore;
use savespot::ui::{self, Icons, section, success, warn};
use savespot::workflow::{AddDestinationFlow, MapView, Region};
use savespot::{Destination, DestinationId, DestinationPatch, NewDestination, PlaceDetails, Platform};
use std::io::Read;
use std::path::Path;

/// Destinations saved by `seed`
const SAMPLE_DESTINATIONS: &[(&str, &str, f64, f64)] = &[
    ("Boston Logan International Airport", "East Boston, MA 02128, USA", 42.3656, -71.0096),
    ("Dollar Tree", "123 Main St, Boston, MA", 42.3601, -71.0589),
    ("Local Gym", "456 Fitness Ave, Boston, MA", 42.3505, -71.0765),
];

pub fn run_init(
    output_mode: OutputMode,
    config_path: &Path,
    database: &Path,
    force: bool,
) -> anyhow::Result<()> {
    let config = SavespotConfig {
        database: Some(database.display().to_string()),
        platform: None,
    };
    config::write_config(config_path, &config, force)?;
    config::ensure_db_dir(database)?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", config_path.display()));
        ui::status(Icons::DATABASE, "Database", &database.display().to_string());
    } else {
        emit_success(
            output_mode,
            "init",
            serde_json::json!({
                "config": config_path.display().to_string(),
                "database": database.display().to_string(),
            }),
        )?;
    }
    Ok(())
}

pub async fn run_add(
    store: &DestinationStore,
    output_mode: OutputMode,
    name: String,
    address: String,
    lat: f64,
    lng: f64,
) -> anyhow::Result<()> {
    let saved = store.create(NewDestination::new(name, address, lat, lng)).await?;
    report_saved(output_mode, "add", &saved)
}

/// Map stand-in that reports where it would move
struct TerminalMap {
    announce: bool,
}

impl MapView for TerminalMap {
    fn animate_to(&mut self, region: Region) {
        if self.announce && region != Region::INITIAL {
            ui::status(Icons::MAP, "Map centered on", &region.center.to_string());
        }
    }
}

pub async fn run_pick(
    store: &DestinationStore,
    output_mode: OutputMode,
    place: &Path,
    yes: bool,
) -> anyhow::Result<()> {
    let raw = if place == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(place)?
    };
    let details: PlaceDetails = serde_json::from_str(&raw)?;

    let mut flow = AddDestinationFlow::new(TerminalMap {
        announce: output_mode.is_human(),
    });

    if !flow.select_place(details) {
        if output_mode.is_human() {
            warn("Selected place has no location; nothing saved.");
        } else {
            emit_success(output_mode, "pick", serde_json::Value::Null)?;
        }
        return Ok(());
    }

    if !yes {
        let Some(pending) = flow.pending() else {
            return Ok(());
        };
        section("Add Destination?");
        println!("  {}", pending.name.bold());
        println!("  {}", ui::dim(&pending.address));

        if !confirm_prompt()? {
            flow.cancel();
            ui::empty("Cancelled.");
            return Ok(());
        }
    }

    match flow.confirm(store).await? {
        Some(saved) => report_saved(output_mode, "pick", &saved),
        None => Ok(()),
    }
}

fn confirm_prompt() -> anyhow::Result<bool> {
    let term = console::Term::stdout();
    term.write_str("Add? [y/N] ")?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn report_saved(output_mode: OutputMode, command: &str, saved: &Destination) -> anyhow::Result<()> {
    if output_mode.is_human() {
        success(&format!("Destination \"{}\" saved!", saved.name));
        ui::destination_new(saved);
    } else {
        emit_success(output_mode, command, serde_json::to_value(saved)?)?;
    }
    Ok(())
}

pub async fn run_list(store: &DestinationStore, output_mode: OutputMode) -> anyhow::Result<()> {
    let destinations = store.list_all().await?;

    if output_mode.is_human() {
        if destinations.is_empty() {
            ui::empty("No saved destinations yet");
            println!("  {}", ui::muted("Add your first destination to get started"));
        } else {
            ui::header(&format!("Saved destinations ({})", destinations.len()));
            println!("{}", ui::destinations_table(&destinations));
        }
    } else {
        emit_success(output_mode, "list", serde_json::to_value(&destinations)?)?;
    }
    Ok(())
}

pub async fn run_show(store: &DestinationStore, output_mode: OutputMode, id: &str) -> anyhow::Result<()> {
    let id = DestinationId::parse(id)?;
    let Some(destination) = store.get(&id).await? else {
        anyhow::bail!("no destination with id {}", id);
    };

    if output_mode.is_human() {
        println!("{}", ui::destination_detail_table(&destination));
    } else {
        emit_success(output_mode, "show", serde_json::to_value(&destination)?)?;
    }
    Ok(())
}

pub async fn run_search(store: &DestinationStore, output_mode: OutputMode, term: &str) -> anyhow::Result<()> {
    let hits = store.search(term).await?;

    if output_mode.is_human() {
        ui::status(Icons::SEARCH, "Searching names for", term);
        if hits.is_empty() {
            ui::empty("No destinations found.");
        } else {
            for destination in &hits {
                ui::destination_line(destination);
            }
        }
    } else {
        emit_success(output_mode, "search", serde_json::to_value(&hits)?)?;
    }
    Ok(())
}

pub async fn run_update(
    store: &DestinationStore,
    output_mode: OutputMode,
    id: &str,
    patch: DestinationPatch,
) -> anyhow::Result<()> {
    let id = DestinationId::parse(id)?;
    if patch.is_empty() {
        anyhow::bail!("nothing to update: pass --name, --address, --lat or --lng");
    }

    let found = store.update(&id, &patch).await?;
    let updated = if found { store.get(&id).await? } else { None };

    if output_mode.is_human() {
        match &updated {
            Some(destination) => ui::destination_updated(destination),
            None => warn(&format!("No destination with id {}; nothing changed.", id)),
        }
    } else {
        emit_success(
            output_mode,
            "update",
            serde_json::json!({ "found": found, "destination": updated }),
        )?;
    }
    Ok(())
}

pub async fn run_delete(store: &DestinationStore, output_mode: OutputMode, id: &str) -> anyhow::Result<()> {
    let id = DestinationId::parse(id)?;
    let removed = store.delete(&id).await?;

    if output_mode.is_human() {
        if removed {
            ui::destination_deleted(&id.to_string());
        } else {
            warn(&format!("No destination with id {}; nothing deleted.", id));
        }
    } else {
        emit_success(output_mode, "delete", serde_json::json!({ "removed": removed, "id": id }))?;
    }
    Ok(())
}

/// Dispatcher for `--print`: accepts everything and prints instead of opening
struct PrintDispatcher;

impl UrlDispatcher for PrintDispatcher {
    fn can_open(&self, _url: &str) -> savespot::Result<bool> {
        Ok(true)
    }

    fn open(&self, _url: &str) -> savespot::Result<()> {
        Ok(())
    }
}

pub async fn run_navigate(
    store: &DestinationStore,
    output_mode: OutputMode,
    id: &str,
    platform: Platform,
    print: bool,
) -> anyhow::Result<()> {
    let id = DestinationId::parse(id)?;
    let Some(destination) = store.get(&id).await? else {
        anyhow::bail!("no destination with id {}", id);
    };

    let dispatcher: &dyn UrlDispatcher = if print { &PrintDispatcher } else { &SystemOpener };
    let url = navigation::launch(dispatcher, platform, destination.coordinate())?;

    if output_mode.is_human() {
        if print {
            println!("{}", url);
        } else {
            ui::status(Icons::MAP, &format!("Navigating to {}", destination.name), &url);
        }
    } else {
        emit_success(
            output_mode,
            "navigate",
            serde_json::json!({ "id": id, "platform": platform, "url": url }),
        )?;
    }
    Ok(())
}

pub async fn run_seed(store: &DestinationStore, output_mode: OutputMode) -> anyhow::Result<()> {
    let mut saved = Vec::with_capacity(SAMPLE_DESTINATIONS.len());
    for &(name, address, lat, lng) in SAMPLE_DESTINATIONS {
        saved.push(store.create(NewDestination::new(name, address, lat, lng)).await?);
    }

    if output_mode.is_human() {
        for destination in &saved {
            ui::destination_new(destination);
        }
        success(&format!("Seeded {} destinations", saved.len()));
    } else {
        emit_success(output_mode, "seed", serde_json::to_value(&saved)?)?;
    }
    Ok(())
}
