//! `crewctl` - CLI for crewmates
//!
//! This binary provides the command-line interface for creating, browsing and
//! analysing a crew stored in a local `SQLite` database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;

use crewmates::cli::{
    AddCommand, BucketScheme, BulkDeleteCommand, Cli, Command, ConfigCommand, EditCommand,
    ExportCommand, ListCommand, OutputFormat, ReportCommand, StatsCommand, TrendCommand,
};
use crewmates::config::ExportFormat;
use crewmates::stats::{daily_trend, SpeedBand, SpeedTier};
use crewmates::{
    evaluate, init_logging, transfer, CollectionView, Config, Crewmate, CrewmateDraft,
    CrewmateId, CrewmatePatch, CrewmateStore, Gallery, Storage,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    if let Command::Config(cmd) = cli.command {
        return handle_config(cli.config, cmd);
    }

    let config = load_config(cli.config)?;
    let storage = Storage::open(config.database_path())?;

    match cli.command {
        Command::List(cmd) => handle_list(&storage, &config, &cmd),
        Command::Show { id, json } => handle_show(&storage, &id, json),
        Command::Add(cmd) => handle_add(&storage, cmd),
        Command::Edit(cmd) => handle_edit(&storage, cmd),
        Command::Favorite { id } => handle_favorite(&storage, &id),
        Command::Delete { id } => handle_delete(&storage, &id),
        Command::BulkDelete(cmd) => handle_bulk_delete(&storage, &config, cmd),
        Command::Stats(cmd) => handle_stats(&storage, &config, &cmd),
        Command::Trend(cmd) => handle_trend(&storage, &config, &cmd),
        Command::Achievements { json } => handle_achievements(&storage, json),
        Command::Export(cmd) => handle_export(&storage, &config, &cmd),
        Command::Import { file } => handle_import(&storage, &file),
        Command::Report(cmd) => handle_report(&storage, &config, &cmd),
        Command::Config(_) => Ok(()),
    }
}

fn handle_list(storage: &Storage, config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let crew = storage.list()?;
    let params = cmd.view.to_params(&config.gallery);
    let mut visible = params.apply(&crew, Utc::now());
    if let Some(limit) = cmd.limit {
        visible.truncate(limit);
    }

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
        OutputFormat::Plain => {
            for c in &visible {
                println!("{}", c.name);
            }
        }
        OutputFormat::Table => {
            if visible.is_empty() {
                println!("No crewmates found.");
                return Ok(());
            }
            println!(
                "{:<36}  {:<20}  {:<8}  {:>5}  {:<3}  Created",
                "ID", "Name", "Color", "Speed", "Fav"
            );
            for c in &visible {
                println!(
                    "{:<36}  {:<20}  {:<8}  {:>5}  {:<3}  {}",
                    c.id,
                    truncate(&c.name, 20),
                    c.color,
                    c.speed,
                    if c.is_favorite { "*" } else { "" },
                    c.created_on()
                );
            }
            println!();
            println!("{} of {} crewmates", visible.len(), crew.len());
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}~")
    }
}

fn find(storage: &Storage, id: &str) -> anyhow::Result<Crewmate> {
    storage
        .get(&CrewmateId::from(id))?
        .with_context(|| format!("crewmate not found: {id}"))
}

fn handle_show(storage: &Storage, id: &str, json: bool) -> anyhow::Result<()> {
    let c = find(storage, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&c)?);
        return Ok(());
    }
    println!("{}", c.name);
    println!("{}", "=".repeat(c.name.chars().count()));
    println!("ID:        {}", c.id);
    println!("Color:     {} ({})", c.color, c.display_hex());
    println!("Speed:     {}", c.speed);
    println!("Favorite:  {}", if c.is_favorite { "yes" } else { "no" });
    if let Some(category) = &c.category {
        println!("Category:  {category}");
    }
    if let Some(metric) = &c.success_metric {
        println!("Metric:    {metric}");
    }
    println!("Created:   {}", c.created_at.to_rfc3339());
    println!("Updated:   {}", c.updated_at.to_rfc3339());
    Ok(())
}

fn handle_add(storage: &Storage, cmd: AddCommand) -> anyhow::Result<()> {
    let draft = CrewmateDraft {
        name: cmd.name,
        speed: cmd.speed,
        color: cmd.color.to_string(),
        category: cmd.category,
        success_metric: cmd.metric,
        is_favorite: cmd.favorite,
    };
    let mut gallery = Gallery::load(storage)?;
    let created = gallery.create(&draft)?;
    println!("Created {} ({})", created.name, created.id);
    Ok(())
}

fn handle_edit(storage: &Storage, cmd: EditCommand) -> anyhow::Result<()> {
    let patch = CrewmatePatch {
        name: cmd.name,
        speed: cmd.speed,
        color: cmd.color.map(|c| c.to_string()),
        category: if cmd.clear_category {
            Some(None)
        } else {
            cmd.category.map(Some)
        },
        success_metric: if cmd.clear_metric {
            Some(None)
        } else {
            cmd.metric.map(Some)
        },
        is_favorite: None,
    };
    if patch.is_empty() {
        bail!("nothing to change; pass at least one field to edit");
    }
    let mut gallery = Gallery::load(storage)?;
    let updated = gallery.update(&CrewmateId::from(cmd.id), &patch)?;
    println!("Updated {} ({})", updated.name, updated.id);
    Ok(())
}

fn handle_favorite(storage: &Storage, id: &str) -> anyhow::Result<()> {
    let mut gallery = Gallery::load(storage)?;
    let c = gallery.toggle_favorite(&CrewmateId::from(id))?;
    if c.is_favorite {
        println!("{} is now a favorite", c.name);
    } else {
        println!("{} is no longer a favorite", c.name);
    }
    Ok(())
}

fn handle_delete(storage: &Storage, id: &str) -> anyhow::Result<()> {
    let mut gallery = Gallery::load(storage)?;
    if gallery.delete(&CrewmateId::from(id))? {
        println!("Deleted {id}");
        Ok(())
    } else {
        bail!("crewmate not found: {id}")
    }
}

fn handle_bulk_delete(
    storage: &Storage,
    config: &Config,
    cmd: BulkDeleteCommand,
) -> anyhow::Result<()> {
    let mut gallery = Gallery::load(storage)?;
    if cmd.visible {
        gallery.set_params(cmd.view.to_params(&config.gallery));
        gallery.select_all(Utc::now());
    } else {
        for id in cmd.ids {
            gallery.select(CrewmateId::from(id));
        }
    }

    let count = gallery.selection().len();
    if count == 0 {
        println!("Nothing to delete.");
        return Ok(());
    }
    if !cmd.yes {
        println!("This will delete {count} crewmates.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let removed = gallery.delete_selected()?;
    println!("Deleted {removed} crewmates");
    Ok(())
}

fn handle_stats(storage: &Storage, config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let crew = storage.list()?;
    let params = cmd.view.to_analytics_params(&config.gallery);
    let view = CollectionView::compute(&crew, &params, Utc::now());
    let agg = &view.aggregates;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(agg)?);
        return Ok(());
    }

    let s = &agg.summary;
    println!("Crew Statistics ({})", params.time_range);
    println!("================");
    println!("Total crewmates:   {}", s.total);
    println!("Average speed:     {:.1}", s.average_speed);
    println!("Favorites:         {} ({}%)", s.favorites, s.favorite_percentage);
    println!("Distinct colors:   {}", s.distinct_colors);
    println!(
        "Most popular:      {}",
        s.most_popular_color
            .map_or_else(|| "None".to_string(), |b| b.label())
    );
    println!("Created per day:   {:.1}", s.creation_rate);

    println!();
    println!("[Colors]");
    for (bucket, count) in agg.colors.ranked() {
        println!(
            "  {:<8} {:>4}  {:>3}%  {}",
            bucket.label(),
            count,
            agg.colors.percentage(bucket, s.total),
            bucket.hex()
        );
    }

    println!();
    println!("[Speed]");
    match cmd.buckets {
        BucketScheme::Tiers => {
            for tier in SpeedTier::ALL {
                println!("  {:<20} {:>4}", tier.label(), agg.speed_tiers.get(tier));
            }
        }
        BucketScheme::Bands => {
            for band in SpeedBand::ALL {
                println!("  {:<20} {:>4}", band.label(), agg.speed_bands.get(band));
            }
        }
    }

    if !agg.categories.is_empty() {
        println!();
        println!("[Categories]");
        for (category, count) in &agg.categories {
            println!("  {category:<20} {count:>4}");
        }
    }
    Ok(())
}

fn handle_trend(storage: &Storage, config: &Config, cmd: &TrendCommand) -> anyhow::Result<()> {
    let crew = storage.list()?;
    let range = cmd.range.unwrap_or(config.gallery.default_time_range);
    let trend = daily_trend(&crew, range.trend_days(), Utc::now());

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&trend)?);
        return Ok(());
    }
    for day in trend.iter().filter(|d| d.count > 0 || range.days().is_some()) {
        println!("{}  {:>3}  {}", day.date, day.count, "#".repeat(day.count.min(60)));
    }
    Ok(())
}

fn handle_achievements(storage: &Storage, json: bool) -> anyhow::Result<()> {
    let crew = storage.list()?;
    let card = evaluate(&crew);

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    println!("Rank:   {}", card.rank);
    println!("Level:  {}", card.level);
    println!("Score:  {}", card.total_points);
    if let Some((threshold, next)) = card.rank.next() {
        println!("Next:   {next} at {threshold}");
    }
    println!(
        "Unlocked {} of {}",
        card.unlocked_count(),
        card.achievements.len()
    );
    println!();
    for a in &card.achievements {
        println!(
            "[{}] {:<20} {:<10} {:>4} pts  {}/{}  {}",
            if a.unlocked { "x" } else { " " },
            a.name,
            a.rarity,
            a.points,
            a.progress.current,
            a.progress.target,
            a.description
        );
    }
    Ok(())
}

fn handle_export(storage: &Storage, config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let mut gallery = Gallery::load(storage)?;
    gallery.set_params(cmd.view.to_params(&config.gallery));

    let records: Vec<Crewmate> = if cmd.ids.is_empty() {
        gallery.visible(Utc::now()).into_iter().cloned().collect()
    } else {
        for id in &cmd.ids {
            gallery.select(CrewmateId::from(id.as_str()));
        }
        gallery.selected().into_iter().cloned().collect()
    };
    if records.is_empty() {
        bail!("no crewmates to export");
    }

    let dir = cmd.output.clone().unwrap_or_else(|| PathBuf::from("."));
    let today = Utc::now().date_naive();
    let format = cmd.format.map_or(config.export.format, ExportFormat::from);

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = dir.join(transfer::default_export_filename(today, "json"));
        write_file(&path, &transfer::export_json(&records)?)?;
        println!("Exported {} crewmates to {}", records.len(), path.display());
    }
    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let path = dir.join(transfer::default_export_filename(today, "csv"));
        write_file(&path, &transfer::export_csv(&records))?;
        println!("Exported {} crewmates to {}", records.len(), path.display());
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn handle_import(storage: &Storage, file: &Path) -> anyhow::Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let mut gallery = Gallery::load(storage)?;
    let created = gallery.import(&text)?;
    println!("Successfully imported {} crewmates!", created.len());
    Ok(())
}

fn handle_report(storage: &Storage, config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let crew = storage.list()?;
    let params = cmd.view.to_params(&config.gallery);
    let visible = params.apply(&crew, Utc::now());
    let report = transfer::crew_report(&visible, Utc::now().date_naive());

    match &cmd.output {
        Some(path) => {
            write_file(path, &report)?;
            println!("Wrote report to {}", path.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("failed to load configuration")
}

/// Config subcommands that repair or inspect the file itself never load it
/// first, so they still work when it is broken.
fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    let path = config_path
        .clone()
        .unwrap_or_else(Config::default_config_path);
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", config.to_json()?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Display]");
                println!("  Theme:              {:?}", config.display.theme);
                println!("  Density:            {:?}", config.display.density);
                println!("  Animations:         {}", config.display.animations_enabled);
                println!("  Sound:              {}", config.display.sound_enabled);
                println!("  Language:           {}", config.display.language);
                println!();
                println!("[Gallery]");
                println!("  Default sort:       {}", config.gallery.default_sort);
                println!("  Default range:      {}", config.gallery.default_time_range);
                println!();
                println!("[Export]");
                println!("  Format:             {:?}", config.export.format);
                println!();
                println!("[Preferences]");
                println!("  Notifications:      {}", config.preferences.notifications);
                println!("  Auto save:          {}", config.preferences.auto_save);
                println!("  Analytics:          {}", config.preferences.analytics);
                println!("  Sharing:            {}", config.preferences.sharing);
            }
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Reset { yes } => {
            if yes {
                Config::reset(&path)?;
                println!("Configuration reset to defaults: {}", path.display());
            } else {
                println!("This will reset all configuration to defaults.");
                println!("Use --yes to confirm.");
            }
        }
        ConfigCommand::Validate { file } => {
            let target = file.unwrap_or(path);
            println!("Validating configuration: {}", target.display());
            match Config::load_from(Some(target)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
        ConfigCommand::Export { output } => {
            let json = load_config(config_path)?.to_json()?;
            match output {
                Some(out) => {
                    write_file(&out, &json)?;
                    println!("Exported settings to {}", out.display());
                }
                None => println!("{json}"),
            }
        }
        ConfigCommand::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let imported = Config::from_json(&text).context("invalid settings file")?;
            imported.save(&path)?;
            println!("Imported settings into {}", path.display());
        }
    }
    Ok(())
}
