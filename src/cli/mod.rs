use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::IsTerminal;
use std::path::PathBuf;
use crate::config::{ConfigFile, Preset, ScanConfig, ScanProfile};
use crate::decode::EncodingKind;
use crate::pipeline::Pipeline;
use crate::scanner;
use crate::ui::{report, Prompter};

#[derive(Parser, Debug, Clone)]
#[command(name = "xtb2csv")]
#[command(version, about = "Collect xtb log results from a folder tree into a CSV summary", long_about = None)]
pub struct Args {
    /// Folder that contains the extraction folder
    #[arg(short, long, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Extraction folder to scan, relative to --base
    #[arg(short, long, value_name = "NAME")]
    pub folder: Option<String>,

    /// Name of the CSV file to write (".csv" is added if missing)
    #[arg(short, long, value_name = "NAME")]
    pub output_name: Option<String>,

    /// Folder convention to apply
    #[arg(short, long, value_enum)]
    pub preset: Option<Preset>,

    /// Override how file encodings are detected
    #[arg(short, long, value_enum)]
    pub encoding: Option<EncodingKind>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never prompt; missing values are an error
    #[arg(long)]
    pub no_input: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (suppress output)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the built-in presets
    Presets,
}

/// Initialise `env_logger` from the verbosity flags; `RUST_LOG` wins if set.
pub fn init_logging(args: &Args) {
    let level = if args.quiet {
        "warn"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Presets) => {
            report::print_presets();
            Ok(())
        }
        None => extract(&args),
    }
}

fn extract(args: &Args) -> Result<()> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let config = resolve_config(args, &file)?;
    info!("Searching in {} ({} preset)", config.root.display(), config.profile.name);

    let summary = Pipeline::new(config).run()
        .context("Extraction failed")?;

    if !args.quiet {
        report::print_summary(&summary);
    }

    Ok(())
}

/// Merge flags, the config file and prompts into a `ScanConfig`. Flags win
/// over the file; prompts fill whatever is still missing.
pub fn resolve_config(args: &Args, file: &ConfigFile) -> Result<ScanConfig> {
    let prompter = Prompter::new(!args.no_input);

    let preset = args.preset.or(file.preset).unwrap_or_default();
    let mut profile: ScanProfile = preset.profile();
    file.apply(&mut profile)?;
    if let Some(encoding) = args.encoding {
        profile.encoding = encoding;
    }
    debug!("Using profile {:?}", profile.name);

    let base = match args.base.clone().or_else(|| file.base.clone()) {
        Some(base) => base,
        None => PathBuf::from(prompter.ask(
            "Enter the root folder before the extraction folder",
            "--base",
            None,
            false,
        )?),
    };

    let folder = match args.folder.clone().or_else(|| file.folder.clone()) {
        Some(folder) => folder,
        None => prompter.ask("Enter the extraction folder name", "--folder", None, true)?,
    };

    let root = if folder.is_empty() { base.clone() } else { base.join(&folder) };
    scanner::check_root(&root)?;

    let folder_name = if folder.is_empty() {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        folder.clone()
    };

    let output_name = match args.output_name.clone().or_else(|| file.output_name.clone()) {
        Some(name) => name,
        None => prompter.ask(
            "Enter the name you want to save the file as",
            "--output-name",
            Some(profile.default_output_name(&folder_name)),
            false,
        )?,
    };

    let output_path = profile.output_path(&base, &folder, &output_name);
    let show_progress = !args.no_progress && !args.quiet && std::io::stderr().is_terminal();

    Ok(ScanConfig::new(root, output_path, profile).with_progress(show_progress))
}
