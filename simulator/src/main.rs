use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use generator::{Behavior, SyntheticGenerator};
use std::collections::BTreeMap;
use std::path::PathBuf;
use trackcore::math::FeatureMatrix;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;
use workflow::store;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Radar track behavior analysis and synthetic track generation")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter, e.g. `info` or `trackcore=debug`
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one JSON track and print its report
    Analyze {
        track: PathBuf,
        /// Write features and tags as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Analyze every JSON track in a directory
    Batch {
        input: PathBuf,
        #[arg(long, default_value = "results")]
        output: PathBuf,
    },
    /// Generate synthetic tracks
    Generate {
        /// Generate only this behavior instead of the weighted mix
        #[arg(long)]
        behavior: Option<Behavior>,
        /// Defaults to `num_targets` from the config
        #[arg(long)]
        count: Option<usize>,
        /// Defaults to `seed` from the config
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "synthetic")]
        output: PathBuf,
    },
    /// Generate the fixed validation scenarios
    Scenarios {
        #[arg(long, default_value = "scenarios")]
        output: PathBuf,
    },
    /// Check that generated tracks are tagged with their ground truth
    Validate {
        #[arg(long, default_value_t = 100)]
        seeds: u64,
        #[arg(long, default_value_t = 0.95)]
        min_rate: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let config = WorkflowConfig::load_or_default(args.config.as_ref())?;
    match &args.config {
        Some(path) => log::info!("workflow config loaded from {}", path.display()),
        None => log::info!("using default workflow config"),
    }

    match args.command {
        Command::Analyze { track, output } => {
            let runner = Runner::new(&config)?;
            let loaded = store::load_track(&track)?;
            let analysis = runner
                .analyze(&loaded)
                .with_context(|| format!("analyzing {}", track.display()))?;
            println!("{}", analysis.report);
            if let Some(path) = output {
                store::save_results(&path, std::slice::from_ref(&analysis))?;
                println!("Results written to {}", path.display());
            }
        }
        Command::Batch { input, output } => {
            let runner = Runner::new(&config)?;
            let files = store::track_files(&input)?;
            log::info!("analyzing {} track files from {}", files.len(), input.display());
            let outcome = runner.analyze_files(&files);
            for analysis in &outcome.results {
                let name = match analysis.target_id {
                    Some(id) => format!("target_{:04}", id),
                    None => "target_unknown".to_string(),
                };
                store::write_report(output.join("reports"), &name, &analysis.report)?;
            }
            store::save_results(output.join("results.json"), &outcome.results)?;
            if !outcome.results.is_empty() {
                let maps: Vec<_> = outcome.results.iter().map(|a| a.features.clone()).collect();
                let matrix = FeatureMatrix::from_maps(&maps).standardized();
                store::save_feature_matrix(output.join("feature_matrix.json"), &matrix)?;
            }
            for (index, reason) in &outcome.failures {
                log::warn!("skipped {}: {}", files[*index].display(), reason);
            }
            let metrics = runner.metrics();
            println!(
                "Batch -> processed {}, rejected {}, backend fallbacks {}",
                metrics.processed, metrics.rejected, metrics.fallbacks
            );
        }
        Command::Generate {
            behavior,
            count,
            seed,
            output,
        } => {
            let generator = SyntheticGenerator::new(config.generator.clone())?;
            let count = count.unwrap_or(config.generator.num_targets);
            let seed = seed.unwrap_or(config.generator.seed);
            let weights = match behavior {
                Some(behavior) => BTreeMap::from([(behavior, 1.0)]),
                None => config.generator.behavior_weights.clone(),
            };
            log::info!("generating {} tracks with seed {}", count, seed);
            let tracks = generator.dataset(count, &weights, seed)?;
            let written = store::save_tracks(&output, "synthetic_target", &tracks)?;
            println!("Generated {} tracks in {}", written.len(), output.display());
        }
        Command::Scenarios { output } => {
            let generator = SyntheticGenerator::new(config.generator.clone())?;
            let tracks = generator.scenarios()?;
            let written = store::save_tracks(&output, "scenario", &tracks)?;
            println!("Generated {} scenarios in {}", written.len(), output.display());
        }
        Command::Validate { seeds, min_rate } => {
            let runner = Runner::new(&config)?;
            let generator = SyntheticGenerator::new(config.generator.clone())?;
            let mut failing = Vec::new();
            for behavior in Behavior::ALL {
                let result = runner.round_trip(&generator, behavior, 0..seeds)?;
                println!(
                    "{:<18} {:>4}/{:<4} {:>6.1}%",
                    behavior.as_str(),
                    result.hits,
                    result.total,
                    100.0 * result.rate()
                );
                if result.rate() < min_rate {
                    log::warn!("{} round trip rate {:.3} below {:.3}", behavior, result.rate(), min_rate);
                    failing.push(behavior.as_str());
                }
            }
            if !failing.is_empty() {
                bail!("round trip below {:.0}% for: {}", 100.0 * min_rate, failing.join(", "));
            }
        }
    }

    Ok(())
}
