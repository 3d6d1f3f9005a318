mod error;

use chrono::{Local, NaiveTime, Timelike};
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use error::CliError;
use recipe_core::{
    Recipe, SCALED_FIELDS, format_minutes, format_quantity, parse_minutes, parse_quantity_string,
    scale_line, total_minutes,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "recipe-cli",
    about = "Scale recipe ingredients and add up cooking times.",
    version
)]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Load a profile JSON before applying CLI overrides
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Save the current effective parameters to a profile JSON
    #[arg(long, global = true)]
    save_profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rescale a recipe JSON file for a new number of servings
    Scale {
        /// Recipe JSON file
        file: PathBuf,

        /// Target servings (falls back to the profile)
        #[arg(long)]
        servings: Option<u32>,

        /// Write the scaled recipe as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how ingredient quantities are read and re-written
    Quantity {
        /// Ingredient lines, e.g. "1 1/2 cups flour"
        #[arg(required = true)]
        text: Vec<String>,

        /// Multiplier applied to each line
        #[arg(long, default_value_t = 1.0)]
        times: f64,
    },

    /// Add up durations such as "1 hour 30 minutes" or "45 min"
    Time {
        #[arg(required = true)]
        phrases: Vec<String>,

        /// Start time HH:MM (optional); defaults to now
        #[arg(long)]
        start: Option<String>,
    },
}

/// Saved defaults; values given on the command line win.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<String>,
}

fn load_profile(path: Option<&Path>) -> Result<Profile, CliError> {
    let Some(path) = path else {
        return Ok(Profile::default());
    };
    let txt = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let profile = serde_json::from_str(&txt).map_err(|source| CliError::Profile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), ?profile, "profile loaded");
    Ok(profile)
}

fn save_profile(path: &Path, profile: &Profile) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    println!("Profile saved to {}", path.display());
    Ok(())
}

fn parse_start(hhmm: &str) -> Result<NaiveTime, CliError> {
    NaiveTime::parse_from_str(hhmm, "%H:%M").map_err(|_| CliError::InvalidStart(hhmm.to_string()))
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

/// One-line rendering of an ingredient of either shape.
fn ingredient_label(ingredient: &Value) -> String {
    let Value::Object(record) = ingredient else {
        return match ingredient {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };

    let amount = SCALED_FIELDS
        .iter()
        .find_map(|k| record.get(*k).and_then(Value::as_f64))
        .map(format_quantity);
    let text = |k: &str| record.get(k).and_then(Value::as_str).map(str::to_string);

    let parts: Vec<String> = [amount, text("unit"), text("name")]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        ingredient.to_string()
    } else {
        parts.join(" ")
    }
}

fn scale_recipe(file: &Path, servings: u32, output: Option<&Path>) -> Result<(), CliError> {
    let txt = fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let recipe = Recipe::from_json(&txt)?;
    let scaled = recipe.scaled_to(servings)?;
    info!(
        title = %recipe.title,
        from = recipe.servings,
        to = servings,
        "recipe scaled"
    );

    let original = format!("Original ({} servings)", recipe.servings);
    let resized = format!("Scaled ({} servings)", scaled.servings);
    let mut table = new_table(&[original.as_str(), resized.as_str()]);
    for (before, after) in recipe.ingredients.iter().zip(&scaled.ingredients) {
        table.add_row(vec![
            Cell::new(ingredient_label(before)),
            Cell::new(ingredient_label(after)),
        ]);
    }

    println!("\n=== {} ===", recipe.title);
    println!("{}", table);

    let total = recipe.total_time_label();
    if !total.is_empty() {
        println!("Total time: {total}");
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&scaled)?;
        fs::write(path, json).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        println!("Scaled recipe written to {}", path.display());
    }
    Ok(())
}

fn show_quantities(lines: &[String], times: f64) {
    let mut table = new_table(&["Text", "Value", "Matched", "Canonical", "Scaled"]);
    for line in lines {
        let parsed = parse_quantity_string(line);
        let dash = || "-".to_string();
        table.add_row(vec![
            Cell::new(line),
            Cell::new(parsed.value.map_or_else(dash, |v| v.to_string())),
            Cell::new(parsed.matched.unwrap_or_else(dash)),
            Cell::new(parsed.value.map_or_else(dash, format_quantity)),
            Cell::new(scale_line(line, times)),
        ]);
    }
    println!("{}", table);
}

fn ready_time(start: NaiveTime, minutes: u32) -> NaiveTime {
    let dt = Local::now().date_naive().and_time(start);
    (dt + chrono::Duration::minutes(i64::from(minutes))).time()
}

fn show_times(phrases: &[String], start: Option<&str>) -> Result<(), CliError> {
    let start = match start {
        Some(hhmm) => parse_start(hhmm)?,
        None => Local::now().naive_local().time(),
    };

    let mut table = new_table(&["Phrase", "Minutes", "Formatted"]);
    for phrase in phrases {
        let minutes = parse_minutes(phrase);
        table.add_row(vec![
            Cell::new(phrase),
            Cell::new(minutes.map_or_else(|| "?".to_string(), |m| m.to_string())),
            Cell::new(format_minutes(minutes)),
        ]);
    }
    println!("{}", table);

    match total_minutes(phrases.iter().map(String::as_str)) {
        Some(total) => {
            let t = ready_time(start, total);
            println!(
                "Total: {} → ready at ~{:02}:{:02}",
                format_minutes(Some(total)),
                t.hour(),
                t.minute()
            );
        }
        None => println!("Total: unknown"),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut profile = load_profile(cli.profile.as_deref())?;

    match &cli.command {
        Command::Scale {
            file,
            servings,
            output,
        } => {
            let servings = servings
                .or(profile.servings)
                .ok_or(CliError::MissingServings)?;
            profile.servings = Some(servings);
            scale_recipe(file, servings, output.as_deref())?;
        }
        Command::Quantity { text, times } => show_quantities(text, *times),
        Command::Time { phrases, start } => {
            if start.is_some() {
                profile.start = start.clone();
            }
            show_times(phrases, profile.start.as_deref())?;
        }
    }

    if let Some(path) = &cli.save_profile {
        save_profile(path, &profile)?;
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/* ===========================
Unit tests
=========================== */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["recipe-cli", "scale", "pancakes.json", "--servings", "6"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Scale { servings: Some(6), .. }
        ));

        let cli = Cli::try_parse_from(["recipe-cli", "-v", "time", "1 hour", "20 min"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Time { ref phrases, .. } if phrases.len() == 2));

        assert!(Cli::try_parse_from(["recipe-cli", "quantity"]).is_err());
    }

    #[test]
    fn test_ingredient_label() {
        assert_eq!(ingredient_label(&json!("2 cups flour")), "2 cups flour");
        assert_eq!(
            ingredient_label(&json!({ "name": "milk", "amount": 1.5, "unit": "cups" })),
            "1 1/2 cups milk"
        );
        assert_eq!(
            ingredient_label(&json!({ "name": "eggs", "quantity": 3 })),
            "3 eggs"
        );
        assert_eq!(ingredient_label(&json!({ "note": 1 })), r#"{"note":1}"#);
        assert_eq!(ingredient_label(&json!(null)), "null");
    }

    #[test]
    fn test_parse_start() {
        let t = parse_start("07:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 30));
        assert!(matches!(parse_start("7h30"), Err(CliError::InvalidStart(_))));
    }

    #[test]
    fn test_ready_time_wraps_past_midnight() {
        let start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        let t = ready_time(start, 90);
        assert_eq!((t.hour(), t.minute()), (0, 30));
    }

    #[test]
    fn test_profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let profile = Profile {
            servings: Some(6),
            start: Some("18:00".to_string()),
        };
        save_profile(&path, &profile).unwrap();
        assert_eq!(load_profile(Some(&path)).unwrap(), profile);
        assert_eq!(load_profile(None).unwrap(), Profile::default());
    }

    #[test]
    fn test_bad_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_profile(Some(&path)),
            Err(CliError::Profile { .. })
        ));
    }

    #[test]
    fn test_scale_recipe_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("recipe.json");
        let output = dir.path().join("scaled.json");
        fs::write(
            &input,
            r#"{ "title": "Rice", "servings": 2, "ingredients": ["1 cup rice", "2 cups water"] }"#,
        )
        .unwrap();

        scale_recipe(&input, 3, Some(&output)).unwrap();

        let scaled = Recipe::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(scaled.servings, 3);
        assert_eq!(
            scaled.ingredients,
            vec![json!("1 1/2 cup rice"), json!("3 cups water")]
        );
    }

    #[test]
    fn test_missing_servings() {
        let cli = Cli::try_parse_from(["recipe-cli", "scale", "missing.json"]).unwrap();
        assert!(matches!(run(cli), Err(CliError::MissingServings)));
    }
}
