use anyhow::{anyhow, Context, Result};
use mouthy_bird_core::GameConfig;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let mut seeds = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        seeds.push(parse_seed(token)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// Built-in presets, or a (possibly partial) JSON override. Validated either
/// way so a bad file fails before any run starts.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        None => GameConfig::default(),
        Some(path) => {
            let data = fs::read(path)
                .with_context(|| format!("failed reading config {}", path.display()))?;
            serde_json::from_slice(&data)
                .with_context(|| format!("failed parsing config {}", path.display()))?
        }
    };
    config
        .validate()
        .map_err(|err| anyhow!("invalid game config: {err}"))?;
    Ok(config)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
