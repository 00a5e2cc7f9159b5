// CLI module - command-line argument parsing and config handlers
//
// Hero commands map onto the views:
// - list / show / open: list view (with search), detail view, route resolution
// - create / edit: form view
// - delete: list view delete with confirmation
// - serve: in-memory demo backend
// - config --show | --path | --reset | --edit

use crate::config::{Config, VERSION};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::process::Command;

use crate::views::Field;

/// Heroes - manage a superhero catalogue over REST
#[derive(Debug, Parser)]
#[command(name = "heroes")]
#[command(version = VERSION)]
#[command(about = "Browse, search, create, edit and delete heroes", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config and HEROES_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Optional hero field values; unset flags leave the field as it is
#[derive(Debug, Args, Default, Clone, PartialEq)]
pub struct HeroFields {
    #[arg(long)]
    pub superhero: Option<String>,

    #[arg(long)]
    pub publisher: Option<String>,

    #[arg(long)]
    pub alter_ego: Option<String>,

    #[arg(long)]
    pub first_appearance: Option<String>,

    #[arg(long)]
    pub img: Option<String>,

    /// Alternate image; pass an empty string to clear it
    #[arg(long)]
    pub alt_img: Option<String>,
}

impl HeroFields {
    /// Fields the user supplied, in form order
    pub fn values(&self) -> Vec<(Field, &str)> {
        [
            (Field::Superhero, &self.superhero),
            (Field::Publisher, &self.publisher),
            (Field::AlterEgo, &self.alter_ego),
            (Field::FirstAppearance, &self.first_appearance),
            (Field::Img, &self.img),
            (Field::AltImg, &self.alt_img),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List heroes, optionally filtered by a search term
    List {
        /// Case-insensitive match on superhero, alter ego or publisher
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show one hero
    Show { id: String },

    /// Resolve an app path (e.g. /heroes/detail/dc-batman) and render it
    Open { path: String },

    /// Create a hero
    Create {
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        fields: HeroFields,
    },

    /// Edit an existing hero (id cannot change)
    Edit {
        id: String,

        #[command(flatten)]
        fields: HeroFields,
    },

    /// Delete a hero after confirmation
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Run the in-memory demo backend
    Serve {
        /// Address to bind (overrides config and HEROES_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Start with no heroes instead of the sample roster
        #[arg(long)]
        empty: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompts
// ─────────────────────────────────────────────────────────────────────────────

/// Ask a y/N question on stderr; anything but "y"/"yes" is a no
pub fn ask(prompt: &str, input: &mut impl BufRead) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn ask_stdin(prompt: &str) -> bool {
    ask(prompt, &mut std::io::stdin().lock())
}

// ─────────────────────────────────────────────────────────────────────────────
// Config handlers
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_config(show: bool, path: bool, reset: bool, edit: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else if edit {
        handle_config_edit()
    } else {
        println!("Usage: heroes config [--show|--path|--reset|--edit]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists()
        && !ask_stdin(&format!(
            "Config file exists at {}. Overwrite?",
            path.display()
        ))
    {
        println!("Aborted.");
        return Ok(());
    }

    let path = Config::reset()?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch editor '{editor}' (set $EDITOR)"))?;

    if !status.success() {
        bail!("Editor exited with status: {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("heroes").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_with_search() {
        let cli = parse(&["list", "--search", "bat"]);
        assert!(matches!(cli.command, Commands::List { search: Some(ref s) } if s == "bat"));
    }

    #[test]
    fn test_global_api_url() {
        let cli = parse(&["show", "dc-batman", "--api-url", "http://elsewhere"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://elsewhere"));
        assert!(matches!(cli.command, Commands::Show { ref id } if id == "dc-batman"));
    }

    #[test]
    fn test_create_collects_fields() {
        let cli = parse(&[
            "create",
            "--id",
            "dc-robin",
            "--superhero",
            "Robin",
            "--alter-ego",
            "Dick Grayson",
        ]);
        let Commands::Create { id, fields } = cli.command else {
            panic!("expected create");
        };
        assert_eq!(id.as_deref(), Some("dc-robin"));
        assert_eq!(
            fields.values(),
            vec![(Field::Superhero, "Robin"), (Field::AlterEgo, "Dick Grayson")]
        );
    }

    #[test]
    fn test_edit_has_no_id_flag() {
        let result = Cli::try_parse_from(["heroes", "edit", "dc-batman", "--id", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_flags() {
        let cli = parse(&["serve", "--bind", "0.0.0.0:4000", "--empty"]);
        let Commands::Serve { bind, empty } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(bind.map(|b| b.port()), Some(4000));
        assert!(empty);
    }

    #[test]
    fn test_ask_accepts_only_yes() {
        assert!(ask("Delete?", &mut "y\n".as_bytes()));
        assert!(ask("Delete?", &mut "YES\n".as_bytes()));
        assert!(!ask("Delete?", &mut "\n".as_bytes()));
        assert!(!ask("Delete?", &mut "nope\n".as_bytes()));
        assert!(!ask("Delete?", &mut "".as_bytes()));
    }
}
