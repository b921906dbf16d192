//! Game settings and preferences
//!
//! Persisted separately from the high score, in the same envelope format.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, PersistenceError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Loop background music during a run
    pub music_enabled: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_enabled: true,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "settings";
    /// Envelope version
    pub const SCHEMA_VERSION: u32 = 1;

    /// Effective effect volume
    pub fn sfx_level(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Effective music volume (0 when music is off)
    pub fn music_level(&self) -> f32 {
        if self.music_enabled {
            self.master_volume * self.music_volume
        } else {
            0.0
        }
    }

    /// Pull every volume back into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = unit(self.master_volume);
        self.sfx_volume = unit(self.sfx_volume);
        self.music_volume = unit(self.music_volume);
        self
    }

    /// Load settings, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match persistence::decode::<Settings>(&raw, Self::SCHEMA_VERSION) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(err) => log::warn!("Ignoring stored settings: {}", err),
            },
            Ok(None) => {}
            Err(err) => log::warn!("Settings unavailable: {}", err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), PersistenceError> {
        let raw = persistence::encode(Self::SCHEMA_VERSION, self)?;
        store.set(Self::STORAGE_KEY, &raw)?;
        log::info!("Settings saved");
        Ok(())
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_levels() {
        let mut s = Settings::default();
        assert!((s.sfx_level() - 0.8).abs() < 1e-6);
        assert!((s.music_level() - 0.4).abs() < 1e-6);
        s.music_enabled = false;
        assert_eq!(s.music_level(), 0.0);
    }

    #[test]
    fn test_load_clamps_and_fills_missing_fields() {
        let mut store = MemoryStore::new();
        store
            .set(
                Settings::STORAGE_KEY,
                r#"{"version":1,"data":{"master_volume":3.0,"music_enabled":false}}"#,
            )
            .unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.master_volume, 1.0);
        assert!(!s.music_enabled);
        assert_eq!(s.sfx_volume, Settings::default().sfx_volume);
    }

    #[test]
    fn test_save_roundtrip_and_bad_data() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.music_volume = 0.25;
        s.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), s);

        store.set(Settings::STORAGE_KEY, "garbage").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
