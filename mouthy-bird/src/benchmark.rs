use crate::autopilot::bot_ids;
use crate::runner::{run_bot, RunLimits, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use mouthy_bird_core::{Difficulty, GameConfig};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub difficulty: Difficulty,
    pub game: GameConfig,
    pub limits: RunLimits,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub frame_count: u32,
    pub elapsed: f64,
    pub final_score: u32,
    pub final_lives: u32,
    pub game_over: bool,
    pub lives_lost: u32,
    pub lives_gained: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_seconds: f64,
    pub avg_lives_lost: f64,
    pub avg_lives_gained: f64,
    pub survival_rate: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub difficulty: Difficulty,
    pub max_seconds: u32,
    pub fps: u32,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(bot_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let bots: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            if bots.is_empty() {
                return Err(anyhow!("--bots resolved to empty list"));
            }
            Ok(bots)
        }
    }
}

pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<RunMetrics> {
        let artifact = run_bot(
            bot_id,
            config.game,
            config.difficulty,
            *seed,
            config.limits,
            None,
        )
        .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let mut grouped: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for run in &runs {
        grouped.entry(run.bot_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, bot_runs)| aggregate(bot_id, &bot_runs))
        .collect();
    rankings.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| b.avg_seconds.total_cmp(&a.avg_seconds))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });

    let mut run_records: Vec<RunRecord> = runs
        .iter()
        .map(|run| RunRecord {
            bot_id: run.bot_id.clone(),
            seed: run.seed,
            seed_hex: seed_to_hex(run.seed),
            frame_count: run.frame_count,
            elapsed: run.elapsed,
            final_score: run.final_score,
            final_lives: run.final_lives,
            game_over: run.game_over,
            lives_lost: run.lives_lost,
            lives_gained: run.lives_gained,
        })
        .collect();
    run_records.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| b.frame_count.cmp(&a.frame_count))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    tracing::info!(
        runs = run_records.len(),
        bots = config.bots.len(),
        "benchmark complete"
    );

    Ok(BenchmarkReport {
        difficulty: config.difficulty,
        max_seconds: config.limits.max_seconds,
        fps: config.limits.fps,
        jobs: config.jobs,
        bots: config.bots.clone(),
        seeds: config.seeds.clone(),
        run_count: run_records.len(),
        bot_rankings: rankings,
        runs: run_records,
    })
}

fn aggregate(bot_id: &str, runs: &[&RunMetrics]) -> BotAggregate {
    let count = runs.len().max(1) as f64;
    let sum_score: u64 = runs.iter().map(|r| u64::from(r.final_score)).sum();
    let sum_seconds: f64 = runs.iter().map(|r| r.elapsed).sum();
    let sum_lost: u64 = runs.iter().map(|r| u64::from(r.lives_lost)).sum();
    let sum_gained: u64 = runs.iter().map(|r| u64::from(r.lives_gained)).sum();
    let survived = runs.iter().filter(|r| !r.game_over).count();

    BotAggregate {
        bot_id: bot_id.to_string(),
        runs: runs.len(),
        avg_score: sum_score as f64 / count,
        max_score: runs.iter().map(|r| r.final_score).max().unwrap_or_default(),
        avg_seconds: sum_seconds / count,
        avg_lives_lost: sum_lost as f64 / count,
        avg_lives_gained: sum_gained as f64 / count,
        survival_rate: survived as f64 / count,
    }
}
