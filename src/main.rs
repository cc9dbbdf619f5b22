use ansi_term::Colour::{self, Blue, Cyan, Green, Red, Yellow};
use clap::Parser;
use std::path::Path;
use std::process;

use cclspfix::cli::Cli;
use cclspfix::config::{Config, ConfigLoader};
use cclspfix::core::{LspPatcher, PatchOutcome};
use cclspfix::error::PatchError;
use cclspfix::ui::DiffReporter;
use cclspfix::utils::BackupManager;

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ConfigLoader::load_from_path(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: failed to load config {}: {}", path.display(), err);
                process::exit(1);
            }
        },
        None => ConfigLoader::load(),
    };

    let color = config.color && !cli.no_color;

    println!(
        "{}\n",
        paint(color, Blue, "CCLspFix - anchor-based LSP URI fix")
    );

    match run(&cli, &config, color) {
        Ok(PatchOutcome::Applied { count }) => {
            println!(
                "\n{} LSP fix applied successfully ({} patch(es))",
                paint(color, Green, "✓"),
                count
            );
            println!("You may need to restart Claude Code for changes to take effect.");
        }
        Ok(outcome) => {
            println!("\n{} {}", paint(color, Yellow, "ℹ"), outcome);
        }
        Err(err) => {
            eprintln!("\n{} Error: {}", paint(color, Red, "✗"), err);
            process::exit(1);
        }
    }
}

/// Backup, patch, save — with rollback on any fatal failure after the
/// backup exists.
fn run(cli: &Cli, config: &Config, color: bool) -> Result<PatchOutcome, PatchError> {
    let target = cli.file.as_path();
    if !target.exists() {
        return Err(PatchError::FileNotFound(target.to_path_buf()));
    }
    println!("Target: {}\n", target.display());

    stage(color, 1, "Creating backup...");
    let backup = if cli.dry_run {
        println!("  Skipped (dry run, nothing will be written)");
        None
    } else {
        let override_dir = cli.backup_dir.as_deref().or(config.backup_dir.as_deref());
        let manager = BackupManager::for_target(target, override_dir);
        let backup_path = manager.create(target)?;
        println!("  Backup created: {}", backup_path.display());
        Some((manager, backup_path))
    };

    let reporter = DiffReporter::new(config.diff_context, color);
    match patch_target(cli, target, &reporter, color) {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if let Some((manager, backup_path)) = &backup {
                eprintln!("{} Rolling back changes...", paint(color, Yellow, "⟳"));
                match manager.restore(backup_path, target) {
                    Ok(()) => eprintln!("{} Rollback successful", paint(color, Green, "✓")),
                    Err(restore_err) => {
                        eprintln!(
                            "{} Rollback failed: {}",
                            paint(color, Red, "✗"),
                            restore_err
                        );
                        eprintln!("  Manual restore needed from: {}", backup_path.display());
                    }
                }
            }
            Err(err)
        }
    }
}

/// Stages 2-5: read, locate, extract-and-patch, save.
fn patch_target(
    cli: &Cli,
    target: &Path,
    reporter: &DiffReporter,
    color: bool,
) -> Result<PatchOutcome, PatchError> {
    stage(color, 2, "Reading target file...");
    let mut patcher = LspPatcher::new(target)?;
    println!("  File loaded ({} bytes)", patcher.content().len());

    stage(color, 3, "Locating LSP function via return-statement anchor...");
    let function = patcher.locate()?;
    println!(
        "  Found function {}: range {} - {} ({} bytes)",
        function.name,
        function.start,
        function.end,
        function.end - function.start
    );

    stage(color, 4, "Extracting aliases and applying patches...");
    let aliases = patcher.aliases(&function);
    match aliases.url_converter.as_deref() {
        Some(alias) => println!("  pathToFileURL alias: {}", alias),
        None => println!("  pathToFileURL alias: NOT FOUND"),
    }
    match aliases.path_module.as_deref() {
        Some(alias) => println!("  path module alias: {}", alias),
        None => println!("  path module alias: NOT FOUND"),
    }
    let outcome = patcher.patch(&function, &aliases, reporter);
    println!("  {}", outcome);

    if cli.dry_run {
        stage(color, 5, "Dry run - leaving the target untouched");
    } else {
        stage(color, 5, "Saving changes...");
        patcher.save()?;
        println!("  Changes saved to {}", target.display());
    }

    Ok(outcome)
}

fn stage(color: bool, number: usize, message: &str) {
    let tag = format!("[{}/5]", number);
    println!("{} {}", paint(color, Cyan, &tag), message);
}

fn paint(color: bool, colour: Colour, text: &str) -> String {
    if color {
        colour.paint(text).to_string()
    } else {
        text.to_string()
    }
}
