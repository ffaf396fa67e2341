use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use derelict::{Difficulty, LevelConfig, LevelConfigFile, audit_level, generate_level};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Normal => Self::Normal,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Populate one station level and print what was placed")]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Level config JSON; the flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    level: Option<u8>,
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Write the effective config to this path before generating
    #[arg(long)]
    save_config: Option<PathBuf>,
    /// Print the whole populated level as JSON
    #[arg(long)]
    json: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    TermLogger::init(
        if args.verbose { LevelFilter::Debug } else { LevelFilter::Info },
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let config = effective_config(&args)?;
    log::debug!("effective config: {config:?}");
    if let Some(path) = &args.save_config {
        LevelConfigFile::new(config)
            .write_atomic(path)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    }

    let level = generate_level(args.seed, &config)
        .with_context(|| format!("Station layout for seed {} was rejected", args.seed))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&level)?);
        return Ok(());
    }

    let summary = &level.summary;
    println!(
        "Seed {} | level {} | {:?} | {}x{}",
        level.seed, config.level, config.difficulty, config.width, config.height
    );
    println!("Fingerprint: {:016x}", level.fingerprint());
    let locked: Vec<&str> = summary.locked_rooms.iter().map(|lock| lock.room.as_str()).collect();
    println!("Locked rooms: {}", locked.join(", "));
    println!(
        "Hazards: {}  Generators: {}  Batteries: {}",
        summary.hazards.len(),
        summary.generators.len(),
        summary.batteries
    );
    println!(
        "Puzzles: {}  Maintenance: {}  CCTV: {}  Furniture: {}",
        summary.puzzles, summary.maintenance_terminals, summary.cctv_terminals, summary.furniture
    );
    if !summary.pre_powered_rooms.is_empty() {
        println!("Pre-powered: {}", summary.pre_powered_rooms.join(", "));
    }

    println!();
    for hint in &level.hints {
        println!("- {hint}");
    }

    let failures = audit_level(&level);
    println!();
    if failures.is_empty() {
        println!("Audit: ok");
    } else {
        for failure in &failures {
            println!("Audit failure: {failure}");
        }
        bail!("{} audit failures", failures.len());
    }
    Ok(())
}

fn effective_config(args: &Args) -> Result<LevelConfig> {
    let mut config = match &args.config {
        Some(path) => {
            LevelConfigFile::load(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?
                .config
        }
        None => LevelConfig::default(),
    };
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty.into();
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.check().map_err(|message| anyhow!("Invalid level config: {message}"))?;
    Ok(config)
}
