//! xpdeck binary - preflight tool for X-Plane Stream Deck preset trees.
//!
//! Validates keysets, lists extracted dataref bindings, and pre-renders
//! device-native key images.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use console::style;
use serde::Serialize;
use tracing::info;

use xpdeck::cli::{Cli, Commands, DatarefsArgs, RenderArgs};
use xpdeck::datarefs::collect_datarefs;
use xpdeck::deck::DeckSpec;
use xpdeck::error::{DeckError, Result, ResultExt};
use xpdeck::logging::init_logging;
use xpdeck::paths::expand_user;
use xpdeck::preset::{Preset, count_presets, load_all_presets, static_icon_path};
use xpdeck::render::Renderer;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.use_json(), u8::from(cli.verbose), cli.quiet);

    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Check(_)) => cmd_check(cli),
        Some(Commands::Datarefs(args)) => cmd_datarefs(cli, args),
        Some(Commands::Render(args)) => cmd_render(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "xpdeck", &mut io::stdout());
            Ok(())
        }
    }
}

fn output_error(cli: &Cli, error: &DeckError) {
    if cli.use_json() {
        let payload = serde_json::json!({
            "error": error.to_string(),
            "recoverable": error.is_user_recoverable(),
            "suggestion": error.suggestion(),
        });
        println!("{payload}");
    } else {
        eprintln!("{} {error}", style("error:").red().bold());
        if let Some(hint) = error.suggestion() {
            eprintln!("{} {hint}", style("hint:").yellow());
        }
    }
}

/// Resolve the deck geometry from the global CLI flags.
fn deck_spec(cli: &Cli) -> DeckSpec {
    let spec = DeckSpec::from_model(cli.model);
    cli.key_count.map_or(spec, |n| spec.with_key_count(n))
}

fn presets_dir(cli: &Cli) -> Result<PathBuf> {
    expand_user(&cli.presets_dir)
}

fn load_tree(cli: &Cli) -> Result<(PathBuf, BTreeMap<String, Preset>)> {
    let dir = presets_dir(cli)?;
    let spec = deck_spec(cli);
    let presets = load_all_presets(&dir, spec.key_count)?;
    Ok((dir, presets))
}

// === check ===

#[derive(Serialize)]
struct CheckReport {
    presets_dir: String,
    keyset_files: usize,
    keysets_loaded: usize,
    buttons: usize,
    dataref_buttons: usize,
    icons_referenced: usize,
    icons_missing: Vec<String>,
}

fn cmd_check(cli: &Cli) -> Result<()> {
    let (dir, presets) = load_tree(cli)?;

    let mut buttons = 0;
    let mut dataref_buttons = 0;
    let mut referenced: Vec<&Path> = Vec::new();
    for preset in presets.values() {
        for button in preset.buttons() {
            buttons += 1;
            if button.dataref.is_some() {
                dataref_buttons += 1;
            }
            for file_name in &button.file_names {
                if !referenced.contains(&file_name.as_path()) {
                    referenced.push(file_name);
                }
            }
        }
    }

    // The fallback icon is required by the image-set builder.
    let fallback = static_icon_path("none");
    let mut missing: Vec<String> = Vec::new();
    if !dir.join(&fallback).exists() {
        missing.push(fallback.display().to_string());
    }
    for file_name in &referenced {
        if !dir.join(file_name).exists() {
            missing.push(file_name.display().to_string());
        }
    }

    let report = CheckReport {
        presets_dir: dir.display().to_string(),
        keyset_files: count_presets(&dir)?,
        keysets_loaded: presets.len(),
        buttons,
        dataref_buttons,
        icons_referenced: referenced.len(),
        icons_missing: missing,
    };

    if cli.use_json() {
        println!("{}", serde_json::to_string_pretty(&report).map_err(json_err)?);
    } else {
        println!(
            "{} {} keysets, {} buttons ({} dataref-bound), {} icons referenced",
            style("loaded:").bold(),
            report.keysets_loaded,
            report.buttons,
            report.dataref_buttons,
            report.icons_referenced
        );
        for path in &report.icons_missing {
            println!("{} {path}", style("missing icon:").red());
        }
        if report.icons_missing.is_empty() {
            println!("{}", style("all icon files present").green());
        }
    }

    if report.icons_missing.is_empty() {
        Ok(())
    } else {
        Err(DeckError::Other(format!(
            "{} icon file(s) missing",
            report.icons_missing.len()
        )))
    }
}

// === datarefs ===

fn cmd_datarefs(cli: &Cli, args: &DatarefsArgs) -> Result<()> {
    let (_, presets) = load_tree(cli)?;
    let mut datarefs = collect_datarefs(&presets);

    if let Some(keyset) = &args.keyset {
        if !datarefs.contains_key(keyset) {
            return Err(DeckError::KeysetNotFound {
                path: keyset.clone(),
            });
        }
        datarefs.retain(|name, _| name == keyset);
    }

    if cli.use_json() {
        println!("{}", serde_json::to_string_pretty(&datarefs).map_err(json_err)?);
        return Ok(());
    }

    for (keyset, bindings) in &datarefs {
        println!("{}", style(keyset).bold());
        for binding in bindings {
            println!(
                "  [{:>2}] {} -> {} (x{}, {} states)",
                binding.index,
                binding.name,
                binding.dataref,
                binding.multiplier,
                binding.states.len()
            );
        }
        if bindings.is_empty() {
            println!("  (no dataref bindings)");
        }
    }
    Ok(())
}

// === render ===

#[derive(Serialize)]
struct RenderReport {
    out_dir: String,
    images: usize,
    format: &'static str,
}

fn cmd_render(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let (dir, presets) = load_tree(cli)?;
    let spec = deck_spec(cli);

    let mut renderer = Renderer::new(spec, &dir);
    if let Some(font) = &args.font {
        renderer = renderer.with_font(&expand_user(font)?)?;
    }

    let mut images = renderer.build_image_set_all(presets.values())?;

    // Labeled variants replace the plain renders of each button's icons.
    if args.label {
        for preset in presets.values() {
            for button in preset.buttons() {
                for file_name in &button.file_names {
                    let rendered = renderer.render_key(file_name, &button.name)?;
                    images.insert(file_name.clone(), rendered);
                }
            }
        }
    }

    let out_dir = expand_user(&args.out_dir)?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Creating output directory {}", out_dir.display()))?;

    let ext = spec.format.extension();
    for (file_name, bytes) in &images {
        let stem = file_name
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DeckError::Other(format!("Bad icon file name: {}", file_name.display())))?;
        std::fs::write(out_dir.join(format!("{stem}.{ext}")), bytes)
            .with_context(|| format!("Writing image for {}", file_name.display()))?;
    }

    info!(images = images.len(), out_dir = %out_dir.display(), "Wrote rendered key images");

    let report = RenderReport {
        out_dir: out_dir.display().to_string(),
        images: images.len(),
        format: ext,
    };
    if cli.use_json() {
        println!("{}", serde_json::to_string_pretty(&report).map_err(json_err)?);
    } else {
        println!(
            "{} {} images to {}",
            style("rendered:").bold(),
            report.images,
            report.out_dir
        );
    }
    Ok(())
}

// === version ===

#[derive(Serialize)]
struct VersionInfo {
    version: &'static str,
    git_sha: &'static str,
    build_timestamp: &'static str,
    rustc: &'static str,
}

fn cmd_version(cli: &Cli) -> Result<()> {
    let info = VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        build_timestamp: build_info::build_timestamp(),
        rustc: build_info::rustc_semver(),
    };

    if cli.use_json() {
        println!("{}", serde_json::to_string_pretty(&info).map_err(json_err)?);
    } else {
        println!("xpdeck {} ({})", info.version, info.git_sha);
        println!("built {} with rustc {}", info.build_timestamp, info.rustc);
    }
    Ok(())
}

// === quick start ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        let help = serde_json::json!({
            "tool": "xpdeck",
            "version": build_info::VERSION,
            "commands": {
                "check": "xpdeck check -d <PRESETS_DIR>",
                "datarefs": "xpdeck datarefs -d <PRESETS_DIR> --robot",
                "render": "xpdeck render <OUT_DIR> -d <PRESETS_DIR>",
            },
        });
        println!("{help}");
    } else {
        println!("xpdeck {} - X-Plane presets for Stream Deck keypads", build_info::VERSION);
        println!();
        println!("  {} validate a preset tree", style("xpdeck check -d <DIR>").bold());
        println!("  {} list dataref bindings", style("xpdeck datarefs -d <DIR>").bold());
        println!("  {} pre-render key images", style("xpdeck render <OUT> -d <DIR>").bold());
        println!();
        println!("Run 'xpdeck --help' for all options.");
    }
    Ok(())
}

fn json_err(e: serde_json::Error) -> DeckError {
    DeckError::Other(format!("JSON output: {e}"))
}
