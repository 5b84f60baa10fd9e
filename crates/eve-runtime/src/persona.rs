//! Persona preference and hero rotation
//!
//! The last persona the visitor picked is stored as a single string
//! ("eva" or "eve"). Without a stored choice the page opens on Eva and the
//! hero section rotates between personas until the visitor interacts.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use eve_core::Channel;
use eve_time::{TimerIssuer, TimerKind, TimerToken};

use crate::{RuntimeError, RuntimeResult};

/// Key/value preference storage
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> RuntimeResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> RuntimeResult<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.lock().insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> RuntimeResult<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> RuntimeResult<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a small JSON object on disk. The whole file is
/// rewritten on every save.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFilePreferenceStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RuntimeResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| RuntimeError::PreferenceCorrupt(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(RuntimeError::PreferenceIo {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self, key: &str) -> RuntimeResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> RuntimeResult<()> {
        let _guard = self.lock.lock();
        let mut values = self.read_all().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable preferences");
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());

        let text = serde_json::to_string_pretty(&values).map_err(|e| RuntimeError::PreferenceCorrupt(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|source| RuntimeError::PreferenceIo {
            path: self.path.clone(),
            source,
        })
    }
}

/// Persona shown in the hero section and whether the visitor has chosen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonaState {
    pub hero: Channel,
    pub user_has_interacted: bool,
    pub rotation: Option<TimerToken>,
    timers: TimerIssuer,
}

impl PersonaState {
    pub fn new(hero: Channel, user_has_interacted: bool) -> Self {
        PersonaState {
            hero,
            user_has_interacted,
            rotation: None,
            timers: TimerIssuer::new(),
        }
    }

    /// Restore from the store. A missing, unreadable or unknown value falls
    /// back to Eva with rotation enabled.
    pub fn restore(store: &dyn PreferenceStore, key: &str) -> Self {
        let stored = match store.load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "persona preference unavailable");
                None
            }
        };

        match stored.as_deref().map(Channel::from_persona_key) {
            Some(Ok(channel)) => {
                tracing::info!(%channel, "persona restored");
                PersonaState::new(channel, true)
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring stored persona");
                PersonaState::new(Channel::Primary, false)
            }
            None => PersonaState::new(Channel::Primary, false),
        }
    }

    /// Whether hero rotation should run
    pub fn rotates(&self) -> bool {
        !self.user_has_interacted
    }

    /// Issue a new rotation token, replacing the previous one.
    /// Returns (new, replaced).
    pub fn arm_rotation(&mut self) -> (TimerToken, Option<TimerToken>) {
        let token = self.timers.issue(TimerKind::AutoRotate);
        (token, self.rotation.replace(token))
    }

    /// Visitor chose a persona; rotation stops for good.
    /// Returns the rotation token to cancel, if any.
    pub fn choose(&mut self, channel: Channel) -> Option<TimerToken> {
        self.hero = channel;
        self.user_has_interacted = true;
        self.rotation.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "eve_persona";

    #[test]
    fn test_restore_saved_persona() {
        let store = MemoryPreferenceStore::with_value(KEY, "eve");
        let persona = PersonaState::restore(&store, KEY);

        assert_eq!(persona.hero, Channel::Secondary);
        assert!(!persona.rotates());
    }

    #[test]
    fn test_restore_without_preference_rotates() {
        let persona = PersonaState::restore(&MemoryPreferenceStore::new(), KEY);
        assert_eq!(persona.hero, Channel::Primary);
        assert!(persona.rotates());
    }

    #[test]
    fn test_restore_unknown_value_falls_back() {
        let store = MemoryPreferenceStore::with_value(KEY, "adam");
        let persona = PersonaState::restore(&store, KEY);
        assert_eq!(persona.hero, Channel::Primary);
        assert!(persona.rotates());
    }

    #[test]
    fn test_choose_stops_rotation() {
        let mut persona = PersonaState::new(Channel::Primary, false);
        let (first, replaced) = persona.arm_rotation();
        assert!(replaced.is_none());
        let (second, replaced) = persona.arm_rotation();
        assert_eq!(replaced, Some(first));

        assert_eq!(persona.choose(Channel::Secondary), Some(second));
        assert!(!persona.rotates());
        assert_eq!(persona.choose(Channel::Primary), None);
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!("eve-prefs-{}.json", std::process::id()));
        std::fs::remove_file(&path).ok();
        let store = JsonFilePreferenceStore::new(&path);

        assert_eq!(store.load(KEY).unwrap(), None);
        store.save(KEY, "eva").unwrap();
        store.save("theme", "dark").unwrap();

        let reopened = JsonFilePreferenceStore::new(&path);
        assert_eq!(reopened.load(KEY).unwrap().as_deref(), Some("eva"));
        assert_eq!(reopened.load("theme").unwrap().as_deref(), Some("dark"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_json_file_store_corrupt() {
        let path = std::env::temp_dir().join(format!("eve-prefs-corrupt-{}.json", std::process::id()));
        std::fs::write(&path, "[1, 2").unwrap();
        let store = JsonFilePreferenceStore::new(&path);

        assert!(matches!(store.load(KEY), Err(RuntimeError::PreferenceCorrupt(_))));
        // Saving replaces the unreadable file
        store.save(KEY, "eve").unwrap();
        assert_eq!(store.load(KEY).unwrap().as_deref(), Some("eve"));

        std::fs::remove_file(&path).ok();
    }
}
