//! # Encounter Forge Entry Point
//!
//! Loads a combatant catalog, derives a threat budget, composes an
//! encounter and prints it.

use clap::Parser;
use encounter_forge::generation::utils::{create_entropy_rng, create_rng};
use encounter_forge::{
    build_pool, estimate, load_party, CandidateFilter, Catalog, CombatantStats, Difficulty,
    EncounterComposer, EncounterRequest, ForgeConfig, ForgeError, ForgeResult, Generator,
};
use log::{info, warn};
use std::path::PathBuf;

/// Command line arguments for Encounter Forge.
#[derive(Parser, Debug)]
#[command(name = "encounter-forge")]
#[command(about = "Compose budget-balanced combat encounters from a combatant catalog")]
#[command(version)]
struct Args {
    /// Combatant catalog (JSON object of name -> stats)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Party file (JSON array of characters, in selection order)
    #[arg(short, long)]
    party: Option<PathBuf>,

    /// Explicit threat budget; overrides the party-derived target
    #[arg(short, long)]
    budget: Option<i64>,

    /// Difficulty preset applied to the party baseline
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Random seed for reproducible encounters
    #[arg(short, long)]
    seed: Option<u64>,

    /// Scoring and composer configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only use combatants found in this biome (repeatable)
    #[arg(long)]
    biome: Vec<String>,

    /// Only use combatants found at this site (repeatable)
    #[arg(long)]
    site: Vec<String>,

    /// Only use combatants from this faction (repeatable)
    #[arg(long)]
    faction: Vec<String>,

    /// Minimum combatant level
    #[arg(long)]
    min_level: Option<i32>,

    /// Maximum combatant level
    #[arg(long)]
    max_level: Option<i32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ForgeResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Encounter Forge v{}", encounter_forge::VERSION);

    run(&args)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> ForgeResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_target(false)
            .init();
    }

    Ok(())
}

/// Works out the target budget: an explicit budget wins, otherwise the
/// party baseline scaled by the difficulty preset.
fn target_budget(args: &Args, config: &ForgeConfig) -> ForgeResult<i64> {
    if let Some(budget) = args.budget {
        return Ok(budget);
    }

    let party_path = args.party.as_ref().ok_or_else(|| {
        ForgeError::InvalidInput("either --budget or --party is required".to_string())
    })?;
    let members: Vec<CombatantStats> = load_party(party_path)?
        .iter()
        .map(|member| member.to_stats())
        .collect();

    let baseline = estimate(
        &members,
        config.use_ap_multiplier,
        config.party_group_multiplier,
    );
    let budget = args.difficulty.target_budget(baseline);
    info!(
        "Party of {} has baseline CR {}; {} target is {}",
        members.len(),
        baseline,
        args.difficulty,
        budget
    );
    Ok(budget)
}

fn run(args: &Args) -> ForgeResult<()> {
    let config = match &args.config {
        Some(path) => ForgeConfig::load(path)?,
        None => ForgeConfig::default(),
    };

    let catalog = Catalog::load(&args.catalog)?;
    let filter = CandidateFilter {
        biomes: args.biome.iter().cloned().collect(),
        sites: args.site.iter().cloned().collect(),
        factions: args.faction.iter().cloned().collect(),
        min_level: args.min_level,
        max_level: args.max_level,
    };
    let candidates = catalog.filtered(&filter);
    info!(
        "{} of {} catalog entries pass the filter",
        candidates.len(),
        catalog.len()
    );

    let pool = build_pool(&candidates, &config.classifier(), config.use_ap_multiplier);
    let budget = target_budget(args, &config)?;

    let mut rng = match args.seed {
        Some(seed) => create_rng(seed),
        None => create_entropy_rng(),
    };
    let composer = EncounterComposer::new(config.composer.clone());
    let encounter = composer.generate(&EncounterRequest::new(&pool, budget), &mut rng)?;

    if encounter.is_empty() {
        warn!(
            "Could not generate an encounter for budget {} from {} candidates",
            encounter.effective_budget(),
            pool.len()
        );
    } else {
        info!(
            "Composed {} combatants in {} trial(s), {:.0}% of budget used",
            encounter.total_count(),
            encounter.trials(),
            encounter.utilization() * 100.0
        );
    }

    if args.json {
        let report = serde_json::json!({
            "target_budget": budget,
            "base_cost": encounter.base_cost(&pool),
            "encounter": encounter,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if encounter.is_empty() {
        println!(
            "Could not generate an encounter for budget {}.",
            encounter.effective_budget()
        );
        return Ok(());
    }

    println!(
        "Encounter (budget {}, remaining {}):",
        encounter.effective_budget(),
        encounter.budget_remaining()
    );
    for entry in encounter.entries() {
        let role = pool
            .iter()
            .find(|p| p.name == entry.name)
            .map(|p| p.role.to_string())
            .unwrap_or_default();
        println!("  {:>3}x {} ({})", entry.count, entry.name, role);
    }
    println!("Base CR total: {}", encounter.base_cost(&pool));

    Ok(())
}
