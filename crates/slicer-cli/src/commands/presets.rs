//! Preset management commands.

use super::common::{build_parameters, load_preset, parse_key_val};
use clap::{Args, Subcommand};
use slicer_config::{
    Preset, ensure_user_presets_dir, factory_presets, is_factory_preset, list_presets_in_dir,
    preset_name_from_path, user_presets_dir,
};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,

        /// Read user presets from this directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show a preset as TOML
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save a preset built from a base preset and overrides
    Save {
        /// Name for the new preset
        name: String,

        /// Preset to start from (defaults otherwise)
        #[arg(long)]
        from: Option<String>,

        /// Parameter overrides (e.g., "voices=4")
        #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
        overrides: Vec<(String, String)>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Save into this directory instead of the user presets directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite if the preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user, dir } => {
            list_presets(factory, user, &dir.unwrap_or_else(user_presets_dir));
            Ok(())
        }
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            from,
            overrides,
            description,
            dir,
            force,
        } => save_preset(
            &name,
            from.as_deref(),
            &overrides,
            description,
            dir,
            force,
        ),
        PresetsCommand::Paths => {
            println!("User presets: {}", user_presets_dir().display());
            println!("Session file: {}", slicer_config::default_session_path().display());
            Ok(())
        }
    }
}

fn list_presets(factory_only: bool, user_only: bool, user_dir: &Path) {
    if !user_only {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if !factory_only {
        println!("User Presets:");
        println!("=============");
        let user_presets = list_presets_in_dir(user_dir);
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: slicer presets save <name> --set voices=4\n");
        }
        for path in user_presets {
            let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
            match Preset::load(&path) {
                Ok(preset) => {
                    let desc = preset.description.as_deref().unwrap_or("");
                    println!("  {:20} - {}", name, desc);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable preset");
                    println!("  {:20} - (error loading)", name);
                }
            }
        }
    }
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    print!("{}", preset.to_toml()?);
    Ok(())
}

fn save_preset(
    name: &str,
    from: Option<&str>,
    overrides: &[(String, String)],
    description: Option<String>,
    dir: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    if is_factory_preset(name) {
        anyhow::bail!("'{}' is a factory preset name. Choose another name.", name);
    }
    if name.is_empty() || name.contains(['/', '\\']) {
        anyhow::bail!("invalid preset name '{}'", name);
    }

    let dir = match dir {
        Some(dir) => dir,
        None => ensure_user_presets_dir()?,
    };
    let preset_path = dir.join(format!("{}.toml", name));
    if preset_path.exists() && !force {
        anyhow::bail!("Preset '{}' already exists. Use --force to overwrite.", name);
    }

    let params = build_parameters(from, overrides)?;
    let mut preset = Preset::new(name).with_params(params);
    if let Some(desc) = description {
        preset = preset.with_description(desc);
    }
    preset.save(&preset_path)?;

    println!("Saved preset '{}' to {}", name, preset_path.display());
    Ok(())
}
