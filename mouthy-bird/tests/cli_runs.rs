use anyhow::Result;
use mouthy_bird::benchmark::{run_benchmark, BenchmarkConfig};
use mouthy_bird::frames::FrameScript;
use mouthy_bird::runner::{replay_script, run_bot, write_script, RunLimits};
use mouthy_bird::store::JsonScoreStore;
use mouthy_bird_core::scores::BestScoreStore;
use mouthy_bird_core::{Difficulty, GameConfig};

const LIMITS: RunLimits = RunLimits {
    max_seconds: 30,
    fps: 30,
};

#[test]
fn autoplay_is_deterministic_per_seed() -> Result<()> {
    let config = GameConfig::default();
    let a = run_bot("pilot", config, Difficulty::Normal, 0xC0FFEE, LIMITS, None)?;
    let b = run_bot("pilot", config, Difficulty::Normal, 0xC0FFEE, LIMITS, None)?;
    assert_eq!(a.metrics.final_score, b.metrics.final_score);
    assert_eq!(a.metrics.frame_count, b.metrics.frame_count);
    assert_eq!(a.metrics.final_rng_state, b.metrics.final_rng_state);
    assert_eq!(a.script, b.script);
    Ok(())
}

#[test]
fn recorded_script_replays_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("runs").join("pilot.json");
    let config = GameConfig::default();
    let artifact = run_bot("healer", config, Difficulty::Easy, 42, LIMITS, None)?;
    write_script(&path, &artifact.script)?;

    let loaded = FrameScript::load(&path)?;
    assert_eq!(loaded.frames.len(), artifact.script.frames.len());
    let result = replay_script(config, Difficulty::Easy, 42, &loaded)?;
    assert_eq!(result.final_score, artifact.metrics.final_score);
    assert_eq!(result.final_lives, artifact.metrics.final_lives);
    assert_eq!(result.frame_count, artifact.metrics.frame_count);
    assert_eq!(result.final_rng_state, artifact.metrics.final_rng_state);
    Ok(())
}

#[test]
fn replay_is_bound_to_its_seed() -> Result<()> {
    let config = GameConfig::default();
    let artifact = run_bot("idle", config, Difficulty::Normal, 3, LIMITS, None)?;
    let same = replay_script(config, Difficulty::Normal, 3, &artifact.script)?;
    let other = replay_script(config, Difficulty::Normal, 4, &artifact.script)?;
    assert_eq!(same.final_rng_state, artifact.metrics.final_rng_state);
    assert_ne!(other.final_rng_state, same.final_rng_state);
    Ok(())
}

#[test]
fn finished_run_writes_best_score_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("data").join("scores.json");
    let mut store = JsonScoreStore::new(&path);

    let artifact = run_bot(
        "idle",
        GameConfig::default(),
        Difficulty::Hard,
        9,
        LIMITS,
        Some(&mut store),
    )?;
    assert!(artifact.metrics.game_over);
    let best = artifact.best.expect("over runs record a best");
    assert_eq!(best.previous_best, 0);

    let reopened = JsonScoreStore::new(&path);
    assert_eq!(reopened.load_best(Difficulty::Hard)?, best.best);
    assert_eq!(reopened.load_best(Difficulty::Easy)?, 0);
    Ok(())
}

#[test]
fn benchmark_covers_every_bot_and_seed() -> Result<()> {
    let report = run_benchmark(&BenchmarkConfig {
        bots: vec!["idle".to_string(), "pilot".to_string()],
        seeds: vec![1, 2, 3],
        difficulty: Difficulty::Normal,
        game: GameConfig::default(),
        limits: RunLimits {
            max_seconds: 10,
            fps: 30,
        },
        jobs: Some(2),
    })?;
    assert_eq!(report.run_count, 6);
    assert_eq!(report.bot_rankings.len(), 2);
    assert!(report.bot_rankings.iter().all(|bot| bot.runs == 3));

    let bad = run_benchmark(&BenchmarkConfig {
        bots: vec!["idle".to_string()],
        seeds: vec![1],
        difficulty: Difficulty::Normal,
        game: GameConfig::default(),
        limits: LIMITS,
        jobs: Some(0),
    });
    assert!(bad.is_err());
    Ok(())
}
