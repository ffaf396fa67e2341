use anyhow::{Context, Result, bail};
use clap::Parser;
use derelict::{Difficulty, LevelConfig, audit_level, generate_level};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(author, version, about = "Populate and audit many levels, stop at the first failure")]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive run seeds to try
    #[arg(short, long, default_value_t = 200)]
    runs: u64,
    #[arg(long, default_value_t = 8)]
    max_level: u8,
    #[arg(long, default_value_t = 40)]
    width: usize,
    #[arg(long, default_value_t = 25)]
    height: usize,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    // The library logs one info line per level; keep the fuzz output to warnings.
    TermLogger::init(
        if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn },
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    println!(
        "Fuzzing {} seeds from {} over levels 1..={} on {}x{} stations...",
        args.runs, args.seed, args.max_level, args.width, args.height
    );

    let mut levels = 0usize;
    let mut pre_powered = 0usize;
    for run_seed in args.seed..args.seed.saturating_add(args.runs) {
        for level in 1..=args.max_level {
            for difficulty in Difficulty::ALL {
                let config =
                    LevelConfig { level, difficulty, width: args.width, height: args.height };
                let populated = generate_level(run_seed, &config).with_context(|| {
                    format!("seed {run_seed} level {level} {difficulty:?}: layout rejected")
                })?;

                let failures = audit_level(&populated);
                if !failures.is_empty() {
                    for failure in &failures {
                        eprintln!("seed {run_seed} level {level} {difficulty:?}: {failure}");
                    }
                    bail!("audit failed on seed {run_seed} level {level} {difficulty:?}");
                }

                let again = generate_level(run_seed, &config)?;
                if again.fingerprint() != populated.fingerprint() {
                    bail!("seed {run_seed} level {level} {difficulty:?} is not reproducible");
                }

                levels += 1;
                pre_powered += populated.summary.pre_powered_rooms.len();
            }
        }
    }

    println!("Fuzzing completed successfully: {levels} levels, {pre_powered} rooms pre-powered.");
    Ok(())
}
