//! Game tuning and preferences
//!
//! Persisted separately from the high score as a JSON record.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;
use crate::sim::EntityOptions;

/// Storage key of the settings record
pub const SETTINGS_KEY: &str = "cube_catch_settings";

/// Tunables for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Countdown length in seconds (non-positive ends the round on the first tick)
    pub time_limit_secs: i32,
    /// Milliseconds between enemy spawns
    pub spawn_interval_ms: f64,

    // === Speeds ===
    /// Player base speed before aspect-ratio scaling
    pub player_speed: f32,
    /// Enemy speed per frame (negative falls down)
    pub enemy_speed: f32,
    /// Relative enemy speed change applied on each touch start (1.0 disables)
    pub enemy_speed_ramp: f32,

    // === View ===
    /// Half-height of the visible play-field in world units
    pub camera_scale: f32,

    // === Input ===
    /// Screen pixels per normalized touch step
    pub touch_normalize_factor: f32,

    // === Entities ===
    pub player: EntityOptions,
    pub enemy: EntityOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,

            player_speed: DEFAULT_PLAYER_SPEED,
            enemy_speed: DEFAULT_ENEMY_SPEED,
            enemy_speed_ramp: DEFAULT_ENEMY_SPEED_RAMP,

            camera_scale: DEFAULT_CAMERA_SCALE,

            touch_normalize_factor: TOUCH_NORMALIZE_FACTOR,

            player: EntityOptions::default(),
            enemy: EntityOptions::default(),
        }
    }
}

impl Settings {
    /// Player options with the configured speed filled in
    pub fn player_options(&self) -> EntityOptions {
        EntityOptions {
            speed: Some(self.player.speed.unwrap_or(self.player_speed)),
            ..self.player.clone()
        }
    }

    /// Enemy options with the configured speed filled in
    pub fn enemy_options(&self) -> EntityOptions {
        EntityOptions {
            speed: Some(self.enemy.speed.unwrap_or(self.enemy_speed)),
            ..self.enemy.clone()
        }
    }

    /// Replace values that would collapse the play-field or the timers
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.camera_scale.is_finite() && self.camera_scale > 0.0) {
            log::warn!("Invalid camera_scale {}, using default", self.camera_scale);
            self.camera_scale = defaults.camera_scale;
        }
        if !(self.spawn_interval_ms.is_finite() && self.spawn_interval_ms > 0.0) {
            log::warn!("Invalid spawn_interval_ms {}, using default", self.spawn_interval_ms);
            self.spawn_interval_ms = defaults.spawn_interval_ms;
        }
        if !(self.touch_normalize_factor.is_finite() && self.touch_normalize_factor > 0.0) {
            log::warn!(
                "Invalid touch_normalize_factor {}, using default",
                self.touch_normalize_factor
            );
            self.touch_normalize_factor = defaults.touch_normalize_factor;
        }
        self
    }

    /// Load settings from storage, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(SETTINGS_KEY) {
            match serde_json::from_str::<Self>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(SETTINGS_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {}", e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.time_limit_secs, 60);
        assert_eq!(settings.spawn_interval_ms, 1000.0);
        assert_eq!(settings.camera_scale, 10.0);
        assert_eq!(settings.touch_normalize_factor, 40.0);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store).time_limit_secs, 60);
        let store = MemoryStore::with_entry(SETTINGS_KEY, "{not json");
        assert_eq!(Settings::load(&store).time_limit_secs, 60);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let store = MemoryStore::with_entry(SETTINGS_KEY, r#"{"time_limit_secs": 30}"#);
        let settings = Settings::load(&store);
        assert_eq!(settings.time_limit_secs, 30);
        assert_eq!(settings.enemy_speed, -0.05);
    }

    #[test]
    fn test_degenerate_values_replaced() {
        let store = MemoryStore::with_entry(
            SETTINGS_KEY,
            r#"{"camera_scale": 0.0, "spawn_interval_ms": -5.0, "touch_normalize_factor": -1.0, "time_limit_secs": 20}"#,
        );
        let settings = Settings::load(&store);
        assert_eq!(settings.camera_scale, 10.0);
        assert_eq!(settings.spawn_interval_ms, 1000.0);
        assert_eq!(settings.touch_normalize_factor, 40.0);
        assert_eq!(settings.time_limit_secs, 20);

        let settings = Settings {
            camera_scale: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.camera_scale, 10.0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            spawn_interval_ms: 250.0,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store).spawn_interval_ms, 250.0);
    }

    #[test]
    fn test_load_then_save_repairs_stored_record() {
        let mut store = MemoryStore::with_entry(SETTINGS_KEY, r#"{"camera_scale":-3.0}"#);
        let settings = Settings::load(&store);
        settings.save(&mut store);

        let stored: Settings =
            serde_json::from_str(&store.get(SETTINGS_KEY).unwrap()).unwrap();
        assert_eq!(stored.camera_scale, Settings::default().camera_scale);
    }

    #[test]
    fn test_entity_options_take_configured_speed() {
        let mut settings = Settings {
            enemy_speed: -0.2,
            ..Default::default()
        };
        assert_eq!(settings.enemy_options().speed, Some(-0.2));
        settings.player.speed = Some(3.0);
        assert_eq!(settings.player_options().speed, Some(3.0));
    }
}
