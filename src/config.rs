//! # Streaming Configuration
//!
//! Tuning parameters for the streaming pipeline, loaded from JSON. Every field
//! has a default, so a config file only needs to name what it changes:
//!
//! ```json
//! { "render_distance": 4, "seed": 1337 }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional config file for the binary.
pub const CONFIG_ENV_VAR: &str = "VOXEL_STREAMING_CONFIG";

/// Long-lived loops run by each pool. Pools smaller than this leave loops unscheduled.
pub const DATA_POOL_TASKS: usize = 2;
pub const MESH_POOL_TASKS: usize = 3;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamingConfig {
    /// Half-width, in chunks, of the square generated and meshed around the observer.
    pub render_distance: i32,
    /// Chunks farther than this from the observer are evicted.
    pub retention_distance: i32,
    pub data_workers: usize,
    pub mesh_workers: usize,
    /// Terrain seed.
    pub seed: u32,
    pub data_poll_interval_ms: u64,
    pub mesh_refill_interval_ms: u64,
    pub mesh_poll_interval_ms: u64,
    pub eviction_interval_ms: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            render_distance: 6,
            retention_distance: 8,
            data_workers: 3,
            mesh_workers: 3,
            seed: 0,
            data_poll_interval_ms: 400,
            mesh_refill_interval_ms: 100,
            mesh_poll_interval_ms: 50,
            eviction_interval_ms: 500,
        }
    }
}

impl StreamingConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: StreamingConfig =
            serde_json::from_str(json).context("Failed to parse streaming config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read streaming config {}", path.display()))?;
        let config = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid streaming config {}", path.display()))?;
        log::info!("Loaded streaming config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `VOXEL_STREAMING_CONFIG`, or the defaults if it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => {
                log::info!("{} not set, using default streaming config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.render_distance >= 0, "render_distance must not be negative");
        ensure!(
            self.retention_distance >= self.render_distance,
            "retention_distance ({}) must be at least render_distance ({})",
            self.retention_distance,
            self.render_distance
        );
        ensure!(
            self.data_workers >= DATA_POOL_TASKS,
            "data_workers must be at least {}",
            DATA_POOL_TASKS
        );
        ensure!(
            self.mesh_workers >= MESH_POOL_TASKS,
            "mesh_workers must be at least {}",
            MESH_POOL_TASKS
        );
        ensure!(
            self.data_poll_interval_ms > 0
                && self.mesh_refill_interval_ms > 0
                && self.mesh_poll_interval_ms > 0
                && self.eviction_interval_ms > 0,
            "poll intervals must be non-zero"
        );
        Ok(())
    }

    pub fn data_poll_interval(&self) -> Duration {
        Duration::from_millis(self.data_poll_interval_ms)
    }

    pub fn mesh_refill_interval(&self) -> Duration {
        Duration::from_millis(self.mesh_refill_interval_ms)
    }

    pub fn mesh_poll_interval(&self) -> Duration {
        Duration::from_millis(self.mesh_poll_interval_ms)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_millis(self.eviction_interval_ms)
    }
}
