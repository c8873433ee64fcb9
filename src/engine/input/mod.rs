// Input binding system
//
// Maps keyboard, mouse and controller input onto per-action channels, turns
// channel changes into discrete gameplay actions and supports interactive
// rebinding.
//
// ## Architecture
//
// - `device`: Normalises raw platform input into device events
// - `binding`: Binding table, one control per action
// - `defaults`: Hardcoded default bindings and seeding
// - `channel`: Channel engine routing events to controls
// - `detection`: Rebind mode state machine
// - `dispatcher`: Debounce and contextual remapping into gameplay actions
// - `labels`: Display names for bound inputs
// - `store`: Binding persistence
// - `config`: Engine configuration
// - `buffer`: Event queue drained once per frame
// - `manager`: Bindings manager coordinating everything
//
// ## Usage Example
//
// ```rust
// use engine::input::{Action, BindingsConfig, BindingsManager, TomlBindingStore};
//
// let mut bindings = BindingsManager::new(
//     BindingsConfig::default(),
//     Box::new(TomlBindingStore::new()),
//     Box::new(my_gameplay_hooks),
//     Box::new(my_capture_listener),
// );
//
// // In your event loop, feed window events
// bindings.process_window_event(&window_event);
//
// // Once per frame, deliver queued events
// bindings.update(dt);
//
// // Rebind "jump" to whatever key comes next
// bindings.enable_detection_mode(Action::Jump, true);
// ```

pub mod action;
pub mod binding;
pub mod buffer;
pub mod channel;
pub mod config;
pub mod defaults;
pub mod detection;
pub mod device;
pub mod dispatcher;
pub mod labels;
pub mod manager;
pub mod store;

// Re-export commonly used types
pub use action::Action;
pub use binding::{Binding, BindingTable, Direction};
pub use config::BindingsConfig;
pub use detection::{CaptureListener, CaptureResult, LogCaptureListener};
pub use device::{ControllerAxis, ControllerButton, DeviceEvent, DeviceKind, MouseWheelClick, PhysicalCode};
pub use dispatcher::GameplayHooks;
pub use manager::BindingsManager;
pub use store::{BindingStore, MemoryBindingStore, StoredBindings, TomlBindingStore};

/// Input binding errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Binding store I/O failed: {0}")]
    StoreIo(String),

    #[error("Invalid binding store: {0}")]
    StoreFormat(String),

    #[error("Invalid input configuration: {0}")]
    Config(String),
}
