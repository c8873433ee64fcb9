// Bindings manager - Main coordination system for all input bindings

use super::action::{self, Action, PLAYER_CHANNELS};
use super::binding::Direction;
use super::buffer::EventQueue;
use super::channel::ChannelEngine;
use super::config::BindingsConfig;
use super::defaults::{seed_controller_defaults, seed_key_defaults};
use super::detection::{BindingDetector, CaptureListener, CaptureResult, DetectionOutcome};
use super::device::{
    ControllerAxis, ControllerButton, DeviceEvent, DeviceFamily, DeviceId, DeviceKind, DeviceNormalizer,
    PhysicalCode, CONTROLLER_DEVICE,
};
use super::dispatcher::{ActionDispatcher, GameplayHooks};
use super::labels::{self, NONE_LABEL};
use super::store::{load_or_empty, BindingStore, StoredBindings};
use anyhow::Result;
use log::{debug, info, warn};
use winit::event::{DeviceEvent as WinitDeviceEvent, MouseButton, WindowEvent};
use winit::keyboard::KeyCode;

/// Owns the binding table, channels, detection and dispatch.
///
/// Intake functions only queue events; `update` delivers them. Nothing
/// observable happens outside `update` except through explicit operations
/// such as `reset_to_defaults`.
pub struct BindingsManager {
    config: BindingsConfig,
    store: Box<dyn BindingStore>,
    normalizer: DeviceNormalizer,
    queue: EventQueue,
    engine: ChannelEngine,
    detector: BindingDetector,
    dispatcher: ActionDispatcher,
    capture: Box<dyn CaptureListener>,

    /// Seconds of `update` time since creation
    clock: f64,
}

impl BindingsManager {
    /// Load stored bindings and seed defaults for anything unbound
    pub fn new(
        config: BindingsConfig,
        mut store: Box<dyn BindingStore>,
        hooks: Box<dyn GameplayHooks>,
        capture: Box<dyn CaptureListener>,
    ) -> Self {
        let mut table = load_or_empty(store.as_mut(), &config.bindings_file);
        seed_key_defaults(&mut table, false);
        seed_controller_defaults(&mut table, false);

        info!("Bindings manager ready ({})", config.bindings_file.display());

        Self {
            normalizer: DeviceNormalizer::new(config.controller_deadzone),
            queue: EventQueue::new(config.event_queue_capacity),
            engine: ChannelEngine::new(table),
            detector: BindingDetector::new(config.detection_axis_threshold, config.reserve_meta_keys),
            dispatcher: ActionDispatcher::new(hooks),
            capture,
            store,
            config,
            clock: 0.0,
        }
    }

    /// Configuration the manager was built with
    pub fn config(&self) -> &BindingsConfig {
        &self.config
    }

    // Event intake

    /// Queue a key press
    pub fn key_pressed(&mut self, code: KeyCode) {
        self.queue.push(self.normalizer.key(code, true));
    }

    /// Queue a key release
    pub fn key_released(&mut self, code: KeyCode) {
        self.queue.push(self.normalizer.key(code, false));
    }

    /// Queue a mouse button press
    pub fn mouse_button_pressed(&mut self, button: MouseButton) {
        self.queue.push(self.normalizer.mouse_button(button, true));
    }

    /// Queue a mouse button release
    pub fn mouse_button_released(&mut self, button: MouseButton) {
        self.queue.push(self.normalizer.mouse_button(button, false));
    }

    /// Queue relative mouse motion
    pub fn mouse_moved(&mut self, dx: f64, dy: f64) {
        self.queue.push(self.normalizer.mouse_moved(dx, dy));
    }

    /// Queue one click per non-zero wheel direction
    pub fn mouse_wheel_moved(&mut self, dx: f64, dy: f64) {
        self.queue.extend(self.normalizer.mouse_wheel(dx, dy));
    }

    /// Queue a controller connection
    pub fn controller_added(&mut self, device_id: DeviceId) {
        self.queue.push(self.normalizer.controller_connected(device_id));
    }

    /// Queue a controller disconnection
    pub fn controller_removed(&mut self, device_id: DeviceId) {
        self.queue.push(self.normalizer.controller_disconnected(device_id));
    }

    /// Queue a controller button press
    pub fn controller_button_pressed(&mut self, device_id: DeviceId, button: ControllerButton) {
        self.queue.push(self.normalizer.controller_button(device_id, button, true));
    }

    /// Queue a controller button release
    pub fn controller_button_released(&mut self, device_id: DeviceId, button: ControllerButton) {
        self.queue.push(self.normalizer.controller_button(device_id, button, false));
    }

    /// Queue controller axis motion; sticks in [-1, 1], triggers in [0, 1]
    pub fn controller_axis_moved(&mut self, device_id: DeviceId, axis: ControllerAxis, value: f32) {
        self.queue.push(self.normalizer.controller_axis(device_id, axis, value));
    }

    /// Queue the input carried by a winit window event
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        self.queue.extend(self.normalizer.window_event(event));
    }

    /// Queue raw mouse motion from a winit device event
    pub fn process_device_event(&mut self, event: &WinitDeviceEvent) {
        if let Some(event) = self.normalizer.device_event(event) {
            self.queue.push(event);
        }
    }

    /// Queue the input carried by a gilrs gamepad event
    #[cfg(feature = "gilrs")]
    pub fn process_gilrs_event(&mut self, event: &gilrs::Event) {
        if let Some(event) = self.normalizer.gilrs_event(event) {
            self.queue.push(event);
        }
    }

    /// Deliver queued events. Call once per frame.
    pub fn update(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        self.engine.end_pulses(&mut self.dispatcher);

        for event in self.queue.drain() {
            self.route(&event);
        }
    }

    fn route(&mut self, event: &DeviceEvent) {
        if self.detector.is_armed() && event.is_capture_gesture() {
            match self.detector.handle(event, self.engine.table_mut()) {
                DetectionOutcome::Ignored => {
                    debug!("Event swallowed by detection: {:?}", event.input);
                }
                DetectionOutcome::Cancelled { action } => {
                    self.capture.capture_ended(action, CaptureResult::Cancelled);
                }
                DetectionOutcome::Bound { action, binding } => {
                    // The code may have been taken from another action
                    self.engine.refresh_all(&mut self.dispatcher);
                    self.capture.capture_ended(action, CaptureResult::Bound(binding));
                }
            }
            return;
        }

        self.engine.process(event, &mut self.dispatcher);
    }

    // Detection

    /// Arm rebind mode for an action, keyboard/mouse or controller family.
    /// Replaces any session already armed.
    pub fn enable_detection_mode(&mut self, action: Action, keyboard: bool) {
        let family = if keyboard {
            DeviceFamily::KeyboardMouse
        } else {
            DeviceFamily::Controller
        };
        self.detector.arm(action, family, self.clock);
    }

    /// Whether a rebind session is armed
    pub fn is_detecting(&self) -> bool {
        self.detector.is_armed()
    }

    // Queries

    /// Current channel value in [0, 1]
    pub fn get_value(&self, action: Action) -> f32 {
        self.engine.value(action)
    }

    /// True only when the value is exactly 1
    pub fn is_active(&self, action: Action) -> bool {
        self.engine.is_active(action)
    }

    /// Whether the most recent routed input came from a controller
    pub fn joystick_last_used(&self) -> bool {
        self.engine.joystick_last_used()
    }

    /// Localisation key naming the action
    pub fn action_description(&self, action: Action) -> String {
        action.description()
    }

    /// Key, mouse button or wheel bound to the action, or `#{sNone}`
    pub fn describe_key_binding(&self, action: Action) -> String {
        let table = self.engine.table();
        let find = |kind| table.query(action, kind, Direction::Increase).map(|b| b.code);

        match find(DeviceKind::Key)
            .or_else(|| find(DeviceKind::MouseButton))
            .or_else(|| find(DeviceKind::MouseWheel))
        {
            Some(PhysicalCode::Key(code)) => labels::key_label(code),
            Some(PhysicalCode::MouseButton(button)) => labels::mouse_button_label(button),
            Some(PhysicalCode::MouseWheel(click)) => labels::mouse_wheel_label(click).to_string(),
            _ => NONE_LABEL.to_string(),
        }
    }

    /// Controller axis or button bound to the action, or `#{sNone}`
    pub fn describe_controller_binding(&self, action: Action) -> String {
        let table = self.engine.table();
        let find = |kind| table.query(action, kind, Direction::Increase).map(|b| b.code);

        match find(DeviceKind::ControllerAxis).or_else(|| find(DeviceKind::ControllerButton)) {
            Some(PhysicalCode::ControllerAxis(axis)) => labels::controller_axis_label(axis).to_string(),
            Some(PhysicalCode::ControllerButton(button)) => {
                labels::controller_button_label(button).to_string()
            }
            _ => NONE_LABEL.to_string(),
        }
    }

    /// The increase-direction key bound to the action, if any
    pub fn key_binding(&self, action: Action) -> Option<KeyCode> {
        match self
            .engine
            .table()
            .query(action, DeviceKind::Key, Direction::Increase)
            .map(|b| b.code)
        {
            Some(PhysicalCode::Key(code)) => Some(code),
            _ => None,
        }
    }

    /// Whether the action sits on a mouse button, or on controller A/B when
    /// `joystick` is set
    pub fn is_left_or_right_button(&self, action: Action, joystick: bool) -> bool {
        let table = self.engine.table();
        if table
            .query(action, DeviceKind::MouseButton, Direction::Increase)
            .is_some()
        {
            return true;
        }
        joystick
            && matches!(
                table
                    .query(action, DeviceKind::ControllerButton, Direction::Increase)
                    .filter(|b| b.device_id == CONTROLLER_DEVICE)
                    .map(|b| b.code),
                Some(PhysicalCode::ControllerButton(ControllerButton::A | ControllerButton::B))
            )
    }

    /// Keyboard/mouse remapping menu order
    pub fn key_sorting(&self) -> Vec<Action> {
        action::key_sorting()
    }

    /// Controller remapping menu order
    pub fn controller_sorting(&self) -> Vec<Action> {
        action::controller_sorting()
    }

    // Operations

    /// Freeze or unfreeze player-driven channels (cutscenes, menus)
    pub fn set_player_controls_enabled(&mut self, enabled: bool) {
        for action in PLAYER_CHANNELS {
            self.engine.set_enabled(action, enabled);
        }
        debug!("Player controls enabled: {}", enabled);
    }

    /// Suppress gameplay actions while an item is being dragged
    pub fn set_drag_drop(&mut self, active: bool) {
        self.dispatcher.set_drag_drop(active);
    }

    /// Seed keyboard and mouse defaults; `force` overrides user bindings
    pub fn load_key_defaults(&mut self, force: bool) {
        seed_key_defaults(self.engine.table_mut(), force);
        self.engine.refresh_all(&mut self.dispatcher);
    }

    /// Seed controller defaults; `force` overrides user bindings
    pub fn load_controller_defaults(&mut self, force: bool) {
        seed_controller_defaults(self.engine.table_mut(), force);
        self.engine.refresh_all(&mut self.dispatcher);
    }

    /// Restore every hardcoded default, overriding user bindings
    pub fn reset_to_defaults(&mut self) {
        info!("Resetting all bindings to defaults");
        self.load_key_defaults(true);
        self.load_controller_defaults(true);
    }

    /// Write the binding table through the store
    pub fn save(&mut self) -> Result<()> {
        let stored = StoredBindings::from_table(self.engine.table());
        self.store.save(&self.config.bindings_file, &stored)?;
        info!("Saved bindings to {}", self.config.bindings_file.display());
        Ok(())
    }
}

impl Drop for BindingsManager {
    fn drop(&mut self) {
        if self.config.save_on_drop {
            if let Err(e) = self.save() {
                warn!("Could not save bindings on shutdown: {:#}", e);
            }
        }
    }
}
