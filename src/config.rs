/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::session::SessionRules;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub versus: VersusConfig,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Frame tick interval for the simulation loop.
    pub tick_rate_ms: u64,
    pub gun_duration_ms: u64,
    pub zap_delay_ms: u64,
    pub time_limit_secs: u32,
    /// Dev override: gun without ownership, never consumed.
    pub unlimited_gun: bool,
}

impl TimingConfig {
    pub fn session_rules(&self) -> SessionRules {
        SessionRules {
            gun_duration_ms: self.gun_duration_ms,
            zap_delay_ms: self.zap_delay_ms,
            time_limit_secs: self.time_limit_secs,
            unlimited_gun: self.unlimited_gun,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VersusConfig {
    /// Run an AI rival session next to the player's.
    pub opponent: bool,
    /// easy | medium | hard | hell
    pub difficulty: String,
    /// none | extra_life | gun — the player's reward modifier.
    pub reward: String,
    pub start_level: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    versus: TomlVersus,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_gun_duration")]
    gun_duration_ms: u64,
    #[serde(default = "default_zap_delay")]
    zap_delay_ms: u64,
    #[serde(default = "default_time_limit")]
    time_limit_secs: u32,
    #[serde(default)]
    unlimited_gun: bool,
}

#[derive(Deserialize, Debug)]
struct TomlVersus {
    #[serde(default = "default_opponent")]
    opponent: bool,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default = "default_reward")]
    reward: String,
    #[serde(default = "default_start_level")]
    start_level: u32,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }          // ~60 fps
fn default_gun_duration() -> u64 { 10_000 }
fn default_zap_delay() -> u64 { 150 }
fn default_time_limit() -> u32 { 60 }

fn default_opponent() -> bool { true }
fn default_difficulty() -> String { "medium".into() }
fn default_reward() -> String { "none".into() }
fn default_start_level() -> u32 { 1 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            gun_duration_ms: default_gun_duration(),
            zap_delay_ms: default_zap_delay(),
            time_limit_secs: default_time_limit(),
            unlimited_gun: false,
        }
    }
}

impl Default for TomlVersus {
    fn default() -> Self {
        TomlVersus {
            opponent: default_opponent(),
            difficulty: default_difficulty(),
            reward: default_reward(),
            start_level: default_start_level(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        AppConfig {
            timing: TimingConfig {
                tick_rate_ms: toml_cfg.timing.tick_rate_ms.max(1),
                gun_duration_ms: toml_cfg.timing.gun_duration_ms,
                zap_delay_ms: toml_cfg.timing.zap_delay_ms,
                time_limit_secs: toml_cfg.timing.time_limit_secs.max(1),
                unlimited_gun: toml_cfg.timing.unlimited_gun,
            },
            versus: VersusConfig {
                opponent: toml_cfg.versus.opponent,
                difficulty: toml_cfg.versus.difficulty,
                reward: toml_cfg.versus.reward,
                start_level: toml_cfg.versus.start_level.max(1),
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
