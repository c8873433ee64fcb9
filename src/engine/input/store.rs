// Binding persistence: the stored form of the binding table and its backends

use super::action::Action;
use super::binding::{Binding, BindingTable};
use super::InputError;
use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One action's control as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredControl {
    pub action: String,
    pub initial_value: f32,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// The whole binding table in stored form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredBindings {
    #[serde(default, rename = "control")]
    pub controls: Vec<StoredControl>,
}

impl StoredBindings {
    /// Snapshot a binding table, in action id order
    pub fn from_table(table: &BindingTable) -> Self {
        let controls = table
            .actions()
            .into_iter()
            .filter_map(|action| {
                table.control(action).map(|control| StoredControl {
                    action: action.name().to_string(),
                    initial_value: control.initial_value(),
                    bindings: control.bindings().to_vec(),
                })
            })
            .collect();
        Self { controls }
    }

    /// Rebuild a binding table. Unknown action names are skipped.
    pub fn into_table(self) -> BindingTable {
        let mut table = BindingTable::new();
        for stored in self.controls {
            let Ok(action) = Action::from_str(&stored.action) else {
                warn!("Skipping bindings for unknown action '{}'", stored.action);
                continue;
            };
            table.ensure_control(action, stored.initial_value);
            for binding in stored.bindings {
                table.attach(action, binding);
            }
        }
        table
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| InputError::StoreFormat(e.to_string()).into())
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| InputError::StoreFormat(e.to_string()).into())
    }
}

/// Loads and saves raw binding tables keyed by a path
pub trait BindingStore {
    /// `Ok(None)` when nothing is stored under the path
    fn load(&mut self, path: &Path) -> Result<Option<StoredBindings>>;

    fn save(&mut self, path: &Path, bindings: &StoredBindings) -> Result<()>;
}

/// Load through a store, treating any failure as an empty store
pub fn load_or_empty(store: &mut dyn BindingStore, path: &Path) -> BindingTable {
    match store.load(path) {
        Ok(Some(stored)) => {
            info!("Loaded {} stored controls from {}", stored.controls.len(), path.display());
            stored.into_table()
        }
        Ok(None) => {
            info!("No stored bindings at {}", path.display());
            BindingTable::new()
        }
        Err(e) => {
            warn!("Ignoring unreadable bindings at {}: {:#}", path.display(), e);
            BindingTable::new()
        }
    }
}

/// TOML file on disk
#[derive(Debug, Default, Clone)]
pub struct TomlBindingStore;

impl TomlBindingStore {
    pub fn new() -> Self {
        Self
    }
}

impl BindingStore for TomlBindingStore {
    fn load(&mut self, path: &Path) -> Result<Option<StoredBindings>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| InputError::StoreIo(format!("Failed to read {}: {}", path.display(), e)))?;
        StoredBindings::from_toml(&text).map(Some)
    }

    fn save(&mut self, path: &Path, bindings: &StoredBindings) -> Result<()> {
        let text = bindings.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)
            .map_err(|e| InputError::StoreIo(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// In-process store holding serialised TOML per path
#[derive(Debug, Default, Clone)]
pub struct MemoryBindingStore {
    blobs: HashMap<PathBuf, String>,
}

impl MemoryBindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text under a path, bypassing serialisation
    pub fn insert_raw(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.blobs.insert(path.into(), text.into());
    }

    pub fn raw(&self, path: &Path) -> Option<&str> {
        self.blobs.get(path).map(String::as_str)
    }
}

impl BindingStore for MemoryBindingStore {
    fn load(&mut self, path: &Path) -> Result<Option<StoredBindings>> {
        match self.blobs.get(path) {
            Some(text) => StoredBindings::from_toml(text).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, path: &Path, bindings: &StoredBindings) -> Result<()> {
        let text = bindings.to_toml()?;
        self.blobs.insert(path.to_path_buf(), text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::AXIS_REST;
    use crate::engine::input::binding::Direction;
    use crate::engine::input::device::{ControllerAxis, MouseWheelClick, PhysicalCode};
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    fn sample_table() -> BindingTable {
        let mut table = BindingTable::new();
        table.bind(Action::MoveForward, Binding::increase(PhysicalCode::Key(KeyCode::KeyW)));
        table.bind(Action::Use, Binding::increase(PhysicalCode::MouseButton(MouseButton::Left)));
        table.bind(
            Action::Use,
            Binding::increase(PhysicalCode::ControllerAxis(ControllerAxis::TriggerRight)),
        );
        table.bind(Action::ZoomIn, Binding::increase(PhysicalCode::MouseWheel(MouseWheelClick::Up)));
        table.attach(Action::LookLeftRight, Binding::increase(PhysicalCode::Key(KeyCode::Numpad6)));
        table.attach(Action::LookLeftRight, Binding::decrease(PhysicalCode::Key(KeyCode::Numpad4)));
        table
    }

    #[test]
    fn test_table_survives_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bindings.toml");
        let mut store = TomlBindingStore::new();

        store.save(&path, &StoredBindings::from_table(&sample_table())).unwrap();
        let table = load_or_empty(&mut store, &path);

        assert_eq!(
            table.lookup(0, PhysicalCode::Key(KeyCode::KeyW)),
            Some((Action::MoveForward, Direction::Increase))
        );
        assert_eq!(
            table.lookup(0, PhysicalCode::Key(KeyCode::Numpad4)),
            Some((Action::LookLeftRight, Direction::Decrease))
        );
        assert_eq!(table.bindings(Action::Use).len(), 2);
        assert_eq!(table.control(Action::Use).unwrap().initial_value(), AXIS_REST);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlBindingStore::new();
        let loaded = store.load(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_malformed_store_is_empty() {
        let mut store = MemoryBindingStore::new();
        store.insert_raw("bindings.toml", "this is [not toml");

        assert!(store.load(Path::new("bindings.toml")).is_err());
        let table = load_or_empty(&mut store, Path::new("bindings.toml"));
        assert!(table.actions().is_empty());
    }

    #[test]
    fn test_unknown_actions_are_skipped() {
        let text = r#"
[[control]]
action = "Teleport"
initial_value = 0.0

[[control]]
action = "Jump"
initial_value = 0.0

[[control.bindings]]
device_id = 0
direction = "Increase"
code = { Key = "KeyE" }
"#;
        let mut store = MemoryBindingStore::new();
        store.insert_raw("b.toml", text);

        let table = load_or_empty(&mut store, Path::new("b.toml"));

        assert_eq!(table.actions(), vec![Action::Jump]);
        assert!(table.is_physical_code_bound(PhysicalCode::Key(KeyCode::KeyE)));
    }

    #[test]
    fn test_memory_store_keeps_text() {
        let mut store = MemoryBindingStore::new();
        let path = Path::new("user.toml");
        store.save(path, &StoredBindings::from_table(&sample_table())).unwrap();

        let raw = store.raw(path).unwrap();
        assert!(raw.contains("MoveForward"));
        assert!(raw.contains("KeyW"));
    }

    #[test]
    fn test_error_mentions_format() {
        let err = StoredBindings::from_toml("[[control]]\naction = 3").unwrap_err();
        assert!(err.to_string().starts_with("Invalid binding store"));
    }
}
