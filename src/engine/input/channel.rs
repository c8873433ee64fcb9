// Channel engine: routes device events to controls and reports channel changes

use super::action::Action;
use super::binding::{BindingTable, Direction};
use super::device::{DeviceEvent, DeviceFamily, DeviceId, DeviceInput, DeviceKind, CONTROLLER_DEVICE};
use crate::core::math::axis_to_unit;
use log::{debug, info, warn};
use strum::EnumCount;

/// Externally visible value of one action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub value: f32,
    pub enabled: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            value: 0.0,
            enabled: true,
        }
    }
}

/// Read-only view of every channel, handed to listeners with each change
#[derive(Debug, Clone, Copy)]
pub struct ChannelView<'a> {
    channels: &'a [Channel],
    joystick_last_used: bool,
}

impl<'a> ChannelView<'a> {
    /// Value of the action's channel
    pub fn value(&self, action: Action) -> f32 {
        self.channels[action.index()].value
    }

    pub fn is_active(&self, action: Action) -> bool {
        self.value(action) == 1.0
    }

    /// Whether the most recent routed input came from the controller
    pub fn joystick_last_used(&self) -> bool {
        self.joystick_last_used
    }
}

/// Receives channel value changes
pub trait ChannelListener {
    fn channel_changed(&mut self, action: Action, current: f32, previous: f32, channels: &ChannelView<'_>);
}

/// Owns the binding table and the channels.
///
/// Each channel mirrors its action's control; a listener is told about every
/// change of an enabled channel.
#[derive(Debug)]
pub struct ChannelEngine {
    table: BindingTable,
    channels: Vec<Channel>,

    /// Actions set by a wheel click this frame
    pulses: Vec<Action>,

    /// Physical controller currently tracked
    active_controller: Option<DeviceId>,

    joystick_last_used: bool,
}

impl ChannelEngine {
    /// Take ownership of the table; channels start mirroring it silently
    pub fn new(table: BindingTable) -> Self {
        let mut engine = Self {
            table,
            channels: vec![Channel::default(); Action::COUNT],
            pulses: Vec::new(),
            active_controller: None,
            joystick_last_used: false,
        };
        engine.sync_channels();
        engine
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    /// Mutable table access; call `refresh_all` after changing it
    pub fn table_mut(&mut self) -> &mut BindingTable {
        &mut self.table
    }

    pub fn value(&self, action: Action) -> f32 {
        self.channels[action.index()].value
    }

    /// True only when the value is exactly 1
    pub fn is_active(&self, action: Action) -> bool {
        self.value(action) == 1.0
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        self.channels[action.index()].enabled
    }

    /// Enable or disable a channel. Disabled channels keep mirroring their
    /// control but notify nobody.
    pub fn set_enabled(&mut self, action: Action, enabled: bool) {
        self.channels[action.index()].enabled = enabled;
    }

    pub fn joystick_last_used(&self) -> bool {
        self.joystick_last_used
    }

    /// Physical controller currently tracked, if any
    pub fn active_controller(&self) -> Option<DeviceId> {
        self.active_controller
    }

    pub fn view(&self) -> ChannelView<'_> {
        ChannelView {
            channels: &self.channels,
            joystick_last_used: self.joystick_last_used,
        }
    }

    /// Copy every control value into its channel without notifying anyone
    pub fn sync_channels(&mut self) {
        for (action, control) in self.table.controls_mut() {
            self.channels[action.index()].value = control.value();
        }
    }

    /// Bring every channel up to date, notifying changes
    pub fn refresh_all(&mut self, listener: &mut dyn ChannelListener) {
        for action in Action::all() {
            self.refresh(action, listener);
        }
    }

    /// Return controls driven by last frame's wheel clicks to their held or
    /// resting value
    pub fn end_pulses(&mut self, listener: &mut dyn ChannelListener) {
        let pulses = std::mem::take(&mut self.pulses);
        for action in pulses {
            if let Some(control) = self.table.control_mut(action) {
                control.settle();
            }
            self.refresh(action, listener);
        }
    }

    /// Route one normalised event to the control that owns it
    pub fn process(&mut self, event: &DeviceEvent, listener: &mut dyn ChannelListener) {
        match event.input {
            DeviceInput::ControllerConnected => {
                if self.active_controller.is_none() {
                    info!("Tracking controller {}", event.device_id);
                    self.active_controller = Some(event.device_id);
                } else {
                    debug!("Controller {} connected but another is tracked", event.device_id);
                }
                return;
            }
            DeviceInput::ControllerDisconnected => {
                if self.active_controller == Some(event.device_id) {
                    info!("Tracked controller {} disconnected", event.device_id);
                    self.active_controller = None;
                    self.release_controller(listener);
                }
                return;
            }
            _ => {}
        }

        let device_id = if event.is_controller() {
            if !self.adopt_controller(event.device_id) {
                warn!("Ignoring input from untracked controller {}", event.device_id);
                return;
            }
            CONTROLLER_DEVICE
        } else {
            event.device_id
        };
        self.joystick_last_used = event.is_controller();

        let Some(code) = event.code() else {
            return;
        };
        let Some((action, direction)) = self.table.lookup(device_id, code) else {
            return;
        };
        debug!("{:?} -> {:?} ({:?})", code, action, direction);

        let Some(control) = self.table.control_mut(action) else {
            return;
        };
        match event.input {
            DeviceInput::Key { pressed, .. }
            | DeviceInput::MouseButton { pressed, .. }
            | DeviceInput::ControllerButton { pressed, .. } => {
                if pressed {
                    control.press(code, direction);
                } else {
                    control.release(code);
                }
            }
            DeviceInput::MouseWheel { .. } => {
                control.set_value(match direction {
                    Direction::Increase => 1.0,
                    Direction::Decrease => 0.0,
                });
                if !self.pulses.contains(&action) {
                    self.pulses.push(action);
                }
            }
            DeviceInput::ControllerAxis { value, .. } => {
                let unit = axis_to_unit(value);
                control.set_value(match direction {
                    Direction::Increase => unit,
                    Direction::Decrease => 1.0 - unit,
                });
            }
            _ => {}
        }

        self.refresh(action, listener);
    }

    /// Mirror one control into its channel; notify if it changed and the
    /// channel is enabled. Returns whether the value changed.
    pub fn refresh(&mut self, action: Action, listener: &mut dyn ChannelListener) -> bool {
        let Some(value) = self.table.control(action).map(|c| c.value()) else {
            return false;
        };
        let channel = &mut self.channels[action.index()];
        let previous = channel.value;
        if previous == value {
            return false;
        }
        channel.value = value;

        if channel.enabled {
            listener.channel_changed(action, value, previous, &self.view());
        } else {
            debug!("{:?} changed while disabled", action);
        }
        true
    }

    /// First controller to connect or send input becomes the tracked one
    fn adopt_controller(&mut self, device_id: DeviceId) -> bool {
        match self.active_controller {
            Some(active) => active == device_id,
            None => {
                info!("Tracking controller {}", device_id);
                self.active_controller = Some(device_id);
                true
            }
        }
    }

    /// Release every held controller input and return axis-bound controls
    /// to rest
    fn release_controller(&mut self, listener: &mut dyn ChannelListener) {
        let mut touched = Vec::new();
        for (action, control) in self.table.controls_mut() {
            let held = control.release_family(DeviceFamily::Controller);
            let on_axis = control
                .bindings()
                .iter()
                .any(|b| b.kind() == DeviceKind::ControllerAxis);
            if held || on_axis {
                control.settle();
                touched.push(*action);
            }
        }
        touched.sort();
        for action in touched {
            self.refresh(action, listener);
        }
    }
}
