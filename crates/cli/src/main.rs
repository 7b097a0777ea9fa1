use clap::{Parser, Subcommand};
use serde_json::Value;
use skillsbank::{config, dispatch, schema, Selection, SkillsBankClient};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skillsbank")]
#[command(about = "Skills Bank CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file (API URL and an empty API key).
    Init {
        /// Config file path (default: SKILLSBANK_CONFIG_PATH or ~/.skillsbank/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the credential descriptor and parameter schema as JSON.
    Describe,

    /// Run one operation for each input item and print one JSON record per item.
    Run {
        /// Config file path (default: SKILLSBANK_CONFIG_PATH or ~/.skillsbank/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Resource: skill or group
        #[arg(long, short, default_value = "skill")]
        resource: String,

        /// Operation. skill: execute (default), get, list, listMine, search. group: get, list (default), executeSkill.
        #[arg(long, short)]
        operation: Option<String>,

        /// JSON file with the items (an array of parameter objects, or one object); "-" reads stdin.
        /// Without it a single empty item is run.
        #[arg(long, short, value_name = "PATH")]
        items: Option<PathBuf>,

        /// Record failures as {"error": ...} and keep going (also settable in config).
        #[arg(long)]
        continue_on_fail: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("skillsbank {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Describe) => {
            if let Err(e) = run_describe() {
                log::error!("describe failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Run {
            config,
            resource,
            operation,
            items,
            continue_on_fail,
        }) => {
            if let Err(e) = run_items(config, &resource, operation.as_deref(), items, continue_on_fail).await {
                log::error!("run failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(config::default_config_path);
    let dir = skillsbank::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

fn run_describe() -> anyhow::Result<()> {
    let description = serde_json::to_string_pretty(&schema::node_description())?;
    println!("{}", description);
    Ok(())
}

async fn run_items(
    config_path: Option<PathBuf>,
    resource: &str,
    operation: Option<&str>,
    items_path: Option<PathBuf>,
    continue_on_fail: bool,
) -> anyhow::Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let selection = Selection::parse_or_default(resource, operation)?;
    let items = match items_path {
        Some(p) => read_items(&p)?,
        None => vec![Value::Object(Default::default())],
    };
    let continue_on_fail = continue_on_fail || config.continue_on_fail;
    let client = SkillsBankClient::new(&config::resolve_credentials(&config));

    log::info!("running {} for {} item(s)", selection, items.len());
    let records = dispatch::run_items(&client, selection, &items, continue_on_fail).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Items file: an array of parameter objects, or a single object for one item.
fn read_items(path: &Path) -> anyhow::Result<Vec<Value>> {
    use anyhow::Context;
    use std::io::Read;

    let text = if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("reading items from stdin")?;
        s
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading items from {}", path.display()))?
    };
    let value: Value = serde_json::from_str(&text).context("parsing items JSON")?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        other => anyhow::bail!("items must be a JSON array or object, got {}", other),
    }
}
