use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mouthy_bird::autopilot::{bot_ids, create_bot, describe_bots};
use mouthy_bird::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig};
use mouthy_bird::frames::FrameScript;
use mouthy_bird::runner::{replay_script, run_bot, write_script, RunLimits};
use mouthy_bird::settings::Settings;
use mouthy_bird::store::JsonScoreStore;
use mouthy_bird::util::{load_config, parse_seed, parse_seed_csv, seed_to_hex, write_json};
use mouthy_bird_core::scores::BestScoreStore;
use mouthy_bird_core::Difficulty;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mouthy-bird")]
#[command(about = "Headless driver for the gesture-controlled flapper engine")]
struct Cli {
    /// JSON file overriding parts of the built-in game config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Best-score file (defaults to MOUTHY_SCORES_PATH or data/scores.json)
    #[arg(long, global = true)]
    scores: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available synthetic faces
    ListBots,
    /// Print the effective difficulty table
    Presets {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play one run with a synthetic face
    Autoplay {
        #[arg(long, default_value = "healer")]
        bot: String,
        #[arg(long, value_enum, default_value_t = CliDifficulty::Normal)]
        difficulty: CliDifficulty,
        #[arg(long, default_value = "0x1")]
        seed: String,
        /// Session cap in seconds (defaults to MOUTHY_SESSION_SECS)
        #[arg(long)]
        seconds: Option<u32>,
        /// Simulated camera rate (defaults to MOUTHY_FPS)
        #[arg(long)]
        fps: Option<u32>,
        /// Write the per-frame script for later replay
        #[arg(long)]
        record: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_save_best: bool,
    },
    /// Replay a recorded frame script
    Replay {
        #[arg(long)]
        script: PathBuf,
        #[arg(long, value_enum, default_value_t = CliDifficulty::Normal)]
        difficulty: CliDifficulty,
        #[arg(long, default_value = "0x1")]
        seed: String,
    },
    /// Run every bot against a set of seeds
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, value_enum, default_value_t = CliDifficulty::Normal)]
        difficulty: CliDifficulty,
        #[arg(long)]
        seconds: Option<u32>,
        #[arg(long)]
        jobs: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show persisted best scores
    Best {
        #[arg(long, value_enum)]
        difficulty: Option<CliDifficulty>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliDifficulty {
    Easy,
    Normal,
    Hard,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Easy => Difficulty::Easy,
            CliDifficulty::Normal => Difficulty::Normal,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli {
        config,
        scores,
        command,
    } = Cli::parse();
    let settings = Settings::from_env();
    let scores_path = scores.unwrap_or_else(|| settings.scores_path.clone());
    let game = load_config(config.as_deref())?;

    match command {
        Commands::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:10} {description}");
            }
        }
        Commands::Presets { output } => {
            if let Some(path) = output {
                write_json(&path, &game.difficulties)?;
                println!("wrote={}", path.display());
            } else {
                let encoded = serde_json::to_string_pretty(&game.difficulties)?;
                println!("{encoded}");
            }
        }
        Commands::Autoplay {
            bot,
            difficulty,
            seed,
            seconds,
            fps,
            record,
            no_save_best,
        } => {
            if create_bot(&bot).is_none() {
                let available = bot_ids().join(", ");
                return Err(anyhow!("unknown bot '{bot}'. available: {available}"));
            }
            let seed = parse_seed(&seed)?;
            let limits = RunLimits {
                max_seconds: seconds.unwrap_or(settings.session_secs),
                fps: fps.unwrap_or(settings.fps),
            };
            let mut store = JsonScoreStore::new(&scores_path);
            let store: Option<&mut dyn BestScoreStore> = if no_save_best {
                None
            } else {
                Some(&mut store)
            };
            let artifact = run_bot(&bot, game, difficulty.into(), seed, limits, store)?;
            let metrics = &artifact.metrics;

            println!("bot={}", metrics.bot_id);
            println!("difficulty={}", metrics.difficulty);
            println!("seed={}", seed_to_hex(seed));
            println!("frames={}", metrics.frame_count);
            println!("seconds={:.2}", metrics.elapsed);
            println!("score={}", metrics.final_score);
            println!("lives={}", metrics.final_lives);
            println!("game_over={}", metrics.game_over);
            println!("lives_lost={}", metrics.lives_lost);
            println!("lives_gained={}", metrics.lives_gained);
            println!("blinks={}", metrics.blink_edges);
            println!("missing_frames={}", metrics.missing_frames);
            println!("rng={:#010x}", metrics.final_rng_state);
            if let Some(best) = artifact.best {
                println!("best={}", best.best);
                println!("new_best={}", best.is_new_best);
            }
            if let Some(path) = record {
                write_script(&path, &artifact.script)?;
                println!("script={}", path.display());
            }
        }
        Commands::Replay {
            script,
            difficulty,
            seed,
        } => {
            let seed = parse_seed(&seed)?;
            let frames = FrameScript::load(&script)?;
            let result = replay_script(game, difficulty.into(), seed, &frames)?;
            println!("script={}", script.display());
            println!("seed={}", seed_to_hex(seed));
            println!("frames={}", result.frame_count);
            println!("seconds={:.2}", result.elapsed);
            println!("score={}", result.final_score);
            println!("lives={}", result.final_lives);
            println!("phase={:?}", result.phase);
            println!("rng={:#010x}", result.final_rng_state);
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_count,
            difficulty,
            seconds,
            jobs,
            output,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            for bot in &bots {
                if create_bot(bot).is_none() {
                    return Err(anyhow!("unknown bot '{bot}'"));
                }
            }
            let seeds = match seeds {
                Some(raw) => parse_seed_csv(&raw)?,
                None => (1..=seed_count.max(1)).collect(),
            };
            let report = run_benchmark(&BenchmarkConfig {
                bots,
                seeds,
                difficulty: difficulty.into(),
                game,
                limits: RunLimits {
                    max_seconds: seconds.unwrap_or(settings.session_secs),
                    fps: settings.fps,
                },
                jobs,
            })?;

            println!("difficulty={}", report.difficulty);
            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("bots:");
            for (idx, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_score={:.1} max_score={} avg_seconds={:.1} lost={:.1} gained={:.1} survival={:.0}%",
                    idx + 1,
                    bot.bot_id,
                    bot.avg_score,
                    bot.max_score,
                    bot.avg_seconds,
                    bot.avg_lives_lost,
                    bot.avg_lives_gained,
                    bot.survival_rate * 100.0,
                );
            }
            if let Some(path) = output {
                write_json(&path, &report)
                    .with_context(|| format!("failed writing report {}", path.display()))?;
                println!("output={}", path.display());
            }
        }
        Commands::Best { difficulty } => {
            let store = JsonScoreStore::new(&scores_path);
            let wanted: Vec<Difficulty> = match difficulty {
                Some(value) => vec![value.into()],
                None => Difficulty::ALL.to_vec(),
            };
            println!("scores={}", store.path().display());
            for difficulty in wanted {
                let best = store.load_best(difficulty)?;
                println!("{}={best}", difficulty.as_str());
            }
        }
    }

    Ok(())
}
