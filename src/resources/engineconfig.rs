//! Engine configuration resource.
//!
//! Manages motion, animation and protocol settings loaded from an INI
//! configuration file. Provides defaults for safe startup and methods to
//! load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [motion]
//! lead_in_ticks = 15
//! walking_window = 750
//!
//! [animation]
//! frame_delay = 80
//! deferred_loading = false
//! table = ./animations.json
//!
//! [speed]
//! walk = 400
//! run = 200
//! mount_walk = 200
//! mount_run = 100
//!
//! [protocol]
//! client_version = 7.0.0.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::clientversion::ClientVersion;

/// Default safe values for startup
const DEFAULT_LEAD_IN_TICKS: u64 = 15;
const DEFAULT_WALKING_WINDOW: u64 = 750;
const DEFAULT_FRAME_DELAY: u64 = 80;
const DEFAULT_DEFERRED_LOADING: bool = false;
const DEFAULT_WALK_TICKS: u64 = 400;
const DEFAULT_RUN_TICKS: u64 = 200;
const DEFAULT_MOUNT_WALK_TICKS: u64 = 200;
const DEFAULT_MOUNT_RUN_TICKS: u64 = 100;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Engine configuration resource.
///
/// Timing values are in world ticks (milliseconds).
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Subtracted from the per-tile duration so a step counts as arrived
    /// slightly early, hiding network and render latency.
    pub lead_in_ticks: u64,
    /// A mobile counts as walking for this long after its last step started.
    pub walking_window: u64,
    /// Delay between animation frames, also the unit of interpolation frames.
    pub frame_delay: u64,
    /// Complete animation loads one tick after they are requested.
    pub deferred_loading: bool,
    /// Optional JSON animation table.
    pub animation_table: Option<PathBuf>,
    /// Ticks per tile on foot, walking.
    pub walk_ticks: u64,
    /// Ticks per tile on foot, running.
    pub run_ticks: u64,
    /// Ticks per tile mounted, walking.
    pub mount_walk_ticks: u64,
    /// Ticks per tile mounted, running.
    pub mount_run_ticks: u64,
    /// Protocol version of the connected server.
    pub client_version: ClientVersion,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            lead_in_ticks: DEFAULT_LEAD_IN_TICKS,
            walking_window: DEFAULT_WALKING_WINDOW,
            frame_delay: DEFAULT_FRAME_DELAY,
            deferred_loading: DEFAULT_DEFERRED_LOADING,
            animation_table: None,
            walk_ticks: DEFAULT_WALK_TICKS,
            run_ticks: DEFAULT_RUN_TICKS,
            mount_walk_ticks: DEFAULT_MOUNT_WALK_TICKS,
            mount_run_ticks: DEFAULT_MOUNT_RUN_TICKS,
            client_version: ClientVersion::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config)
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config)
    }

    fn apply_ini(&mut self, config: &Ini) -> Result<(), String> {
        // the only fallible key is parsed before anything is written
        let client_version = match config.get("protocol", "client_version") {
            Some(version) => Some(version.parse::<ClientVersion>()?),
            None => None,
        };

        // [motion] section
        if let Some(v) = config.getuint("motion", "lead_in_ticks").ok().flatten() {
            self.lead_in_ticks = v;
        }
        if let Some(v) = config.getuint("motion", "walking_window").ok().flatten() {
            self.walking_window = v;
        }

        // [animation] section
        if let Some(v) = config.getuint("animation", "frame_delay").ok().flatten() {
            // zero would make every tick a frame change and divide by zero
            self.frame_delay = v.max(1);
        }
        if let Some(v) = config.getbool("animation", "deferred_loading").ok().flatten() {
            self.deferred_loading = v;
        }
        if let Some(table) = config.get("animation", "table") {
            self.animation_table = Some(PathBuf::from(table));
        }

        // [speed] section
        if let Some(v) = config.getuint("speed", "walk").ok().flatten() {
            self.walk_ticks = v;
        }
        if let Some(v) = config.getuint("speed", "run").ok().flatten() {
            self.run_ticks = v;
        }
        if let Some(v) = config.getuint("speed", "mount_walk").ok().flatten() {
            self.mount_walk_ticks = v;
        }
        if let Some(v) = config.getuint("speed", "mount_run").ok().flatten() {
            self.mount_run_ticks = v;
        }

        // [protocol] section
        if let Some(version) = client_version {
            self.client_version = version;
        }

        info!(
            "Loaded config: lead_in={}, walking_window={}, frame_delay={}, deferred={}, \
             speed={}/{}/{}/{}, client={}",
            self.lead_in_ticks,
            self.walking_window,
            self.frame_delay,
            self.deferred_loading,
            self.walk_ticks,
            self.run_ticks,
            self.mount_walk_ticks,
            self.mount_run_ticks,
            self.client_version
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [motion] section
        config.set("motion", "lead_in_ticks", Some(self.lead_in_ticks.to_string()));
        config.set("motion", "walking_window", Some(self.walking_window.to_string()));

        // [animation] section
        config.set("animation", "frame_delay", Some(self.frame_delay.to_string()));
        config.set(
            "animation",
            "deferred_loading",
            Some(self.deferred_loading.to_string()),
        );
        if let Some(table) = &self.animation_table {
            config.set("animation", "table", Some(table.display().to_string()));
        }

        // [speed] section
        config.set("speed", "walk", Some(self.walk_ticks.to_string()));
        config.set("speed", "run", Some(self.run_ticks.to_string()));
        config.set("speed", "mount_walk", Some(self.mount_walk_ticks.to_string()));
        config.set("speed", "mount_run", Some(self.mount_run_ticks.to_string()));

        // [protocol] section
        config.set(
            "protocol",
            "client_version",
            Some(self.client_version.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.lead_in_ticks, 15);
        assert_eq!(config.frame_delay, 80);
        assert_eq!(config.walking_window, 750);
        assert_eq!(config.client_version, ClientVersion::CV_7000);
    }

    #[test]
    fn test_load_from_str_overrides_present_keys_only() {
        let mut config = EngineConfig::new();
        config
            .load_from_str(
                "[speed]\nrun = 150\n\n[protocol]\nclient_version = 6.0.14.2\n\n\
                 [animation]\ndeferred_loading = true\n",
            )
            .unwrap();
        assert_eq!(config.run_ticks, 150);
        assert_eq!(config.walk_ticks, 400);
        assert!(config.deferred_loading);
        assert!(!config.client_version.has_stygian_abyss());
    }

    #[test]
    fn test_bad_version_is_an_error() {
        let mut config = EngineConfig::new();
        let result = config.load_from_str("[protocol]\nclient_version = banana\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_version_leaves_config_untouched() {
        let mut config = EngineConfig::new();
        let result = config.load_from_str(
            "[speed]\nwalk = 999\n\n[animation]\nframe_delay = 5\n\n\
             [protocol]\nclient_version = garbage\n",
        );
        assert!(result.is_err());
        assert_eq!(config, EngineConfig::new());
        assert_eq!(config.walk_ticks, 400);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = EngineConfig::with_path("./definitely/not/here.ini");
        assert!(config.load_from_file().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "mobile_motion_config_{}.ini",
            std::process::id()
        ));
        let mut config = EngineConfig::with_path(&path);
        config.mount_run_ticks = 90;
        config.client_version = ClientVersion::new(7, 0, 45, 0);
        config.save_to_file().unwrap();

        let mut reloaded = EngineConfig::with_path(&path);
        reloaded.load_from_file().unwrap();
        assert_eq!(reloaded.mount_run_ticks, 90);
        assert_eq!(reloaded.client_version, ClientVersion::new(7, 0, 45, 0));
        let _ = std::fs::remove_file(&path);
    }
}
