use anyhow::{Context, Result};
use euphony_recommend::{config, Config};
use toml_edit::{value, DocumentMut};

/// Keys that hold strings.
const STRING_KEYS: [&str; 3] = ["catalog_path", "spotify_client_id", "spotify_client_secret"];

/// Keys that hold non-negative integers.
const INTEGER_KEYS: [&str; 5] = [
    "tree_count",
    "leaf_size",
    "index_seed",
    "per_seed_k",
    "fetch_timeout_secs",
];

const METRICS: [&str; 2] = ["euclidean", "manhattan"];

fn valid_keys() -> String {
    STRING_KEYS
        .iter()
        .chain(INTEGER_KEYS.iter())
        .chain(std::iter::once(&"metric"))
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn mask(secret: Option<&str>) -> &'static str {
    if secret.is_some() {
        "<set>"
    } else {
        "<not set>"
    }
}

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  metric: {:?}", config.metric);
    println!("  tree_count: {}", config.tree_count);
    println!("  leaf_size: {}", config.leaf_size);
    println!("  index_seed: {}", config.index_seed);
    println!("  per_seed_k: {}", config.per_seed_k);
    println!(
        "  spotify_client_id: {}",
        config.spotify_client_id.as_deref().unwrap_or("<not set>")
    );
    println!(
        "  spotify_client_secret: {}",
        mask(config.spotify_client_secret.as_deref())
    );
    println!("  fetch_timeout_secs: {}", config.fetch_timeout_secs);

    println!("\nPriority: CLI args > ENV vars (EUPH_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'euphony config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    let values = serde_json::to_value(&config)?;
    match values.get(&key) {
        Some(serde_json::Value::Null) => println!("<not set>"),
        Some(serde_json::Value::String(s)) => println!("{}", s),
        Some(other) => println!("{}", other),
        None => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, valid_keys()),
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included)
/// as it was.
pub fn set_config(key: &str, new_value: &str) -> Result<()> {
    let config_path = config::config_file_path();

    // Ensure config file exists
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, new_value)?;
    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, new_value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Return `contents` with `key` set to `new_value`.
fn set_value(contents: &str, key: &str, new_value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    if STRING_KEYS.contains(&key) {
        doc[key] = value(new_value);
    } else if INTEGER_KEYS.contains(&key) {
        let number: i64 = new_value
            .trim()
            .parse()
            .ok()
            .filter(|n| *n >= 0)
            .with_context(|| format!("{} must be a non-negative integer", key))?;
        doc[key] = value(number);
    } else if key == "metric" {
        let metric = new_value.trim().to_lowercase();
        if !METRICS.contains(&metric.as_str()) {
            anyhow::bail!("metric must be one of: {}", METRICS.join(", "));
        }
        doc[key] = value(metric);
    } else {
        anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, valid_keys());
    }

    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure euphony.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
