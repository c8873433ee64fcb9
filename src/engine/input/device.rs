// Device normalisation: raw platform input into canonical device events

use crate::core::math::apply_deadzone;
use serde::{Deserialize, Serialize};
use winit::event::{DeviceEvent as WinitDeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Identifies the device an event came from
pub type DeviceId = u32;

/// Keyboard and mouse share one device id
pub const KEYBOARD_MOUSE_DEVICE: DeviceId = 0;

/// Alias for whichever controller is currently tracked, so bindings survive
/// switching between physical controllers.
pub const CONTROLLER_DEVICE: DeviceId = 1;

/// Pixels of smooth scrolling treated as one wheel click (about one line)
const PIXELS_PER_WHEEL_CLICK: f64 = 30.0;

/// Kind of physical input a binding targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Key,
    MouseButton,
    MouseWheel,
    ControllerAxis,
    ControllerButton,
}

impl DeviceKind {
    /// Kinds cleared together when a keyboard/mouse binding is replaced
    pub const KEYBOARD_MOUSE: [DeviceKind; 3] =
        [DeviceKind::Key, DeviceKind::MouseButton, DeviceKind::MouseWheel];

    /// Kinds cleared together when a controller binding is replaced
    pub const CONTROLLER: [DeviceKind; 2] =
        [DeviceKind::ControllerAxis, DeviceKind::ControllerButton];

    pub fn family(self) -> DeviceFamily {
        match self {
            DeviceKind::Key | DeviceKind::MouseButton | DeviceKind::MouseWheel => {
                DeviceFamily::KeyboardMouse
            }
            DeviceKind::ControllerAxis | DeviceKind::ControllerButton => DeviceFamily::Controller,
        }
    }
}

/// Keyboard/mouse versus controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    KeyboardMouse,
    Controller,
}

impl DeviceFamily {
    pub fn kinds(self) -> &'static [DeviceKind] {
        match self {
            DeviceFamily::KeyboardMouse => &DeviceKind::KEYBOARD_MOUSE,
            DeviceFamily::Controller => &DeviceKind::CONTROLLER,
        }
    }

    /// Device id bindings of this family are stored under
    pub fn device_id(self) -> DeviceId {
        match self {
            DeviceFamily::KeyboardMouse => KEYBOARD_MOUSE_DEVICE,
            DeviceFamily::Controller => CONTROLLER_DEVICE,
        }
    }
}

/// One discrete wheel step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseWheelClick {
    Up,
    Down,
    Left,
    Right,
}

/// Standard controller buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerButton {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

/// Standard controller axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

impl ControllerAxis {
    /// Triggers report [0, 1]; sticks report [-1, 1]
    pub fn is_trigger(self) -> bool {
        matches!(self, ControllerAxis::TriggerLeft | ControllerAxis::TriggerRight)
    }
}

/// A physical input that can be bound, tagged with its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalCode {
    Key(KeyCode),
    MouseButton(MouseButton),
    MouseWheel(MouseWheelClick),
    ControllerAxis(ControllerAxis),
    ControllerButton(ControllerButton),
}

impl PhysicalCode {
    pub fn kind(&self) -> DeviceKind {
        match self {
            PhysicalCode::Key(_) => DeviceKind::Key,
            PhysicalCode::MouseButton(_) => DeviceKind::MouseButton,
            PhysicalCode::MouseWheel(_) => DeviceKind::MouseWheel,
            PhysicalCode::ControllerAxis(_) => DeviceKind::ControllerAxis,
            PhysicalCode::ControllerButton(_) => DeviceKind::ControllerButton,
        }
    }

    pub fn family(&self) -> DeviceFamily {
        self.kind().family()
    }
}

/// What happened on the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceInput {
    Key { code: KeyCode, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    MouseWheel { click: MouseWheelClick },
    MouseMoved { dx: f64, dy: f64 },
    ControllerConnected,
    ControllerDisconnected,
    /// `value` is normalised: [-1, 1] for sticks, [0, 1] for triggers
    ControllerAxis { axis: ControllerAxis, value: f32 },
    ControllerButton { button: ControllerButton, pressed: bool },
}

/// Canonical input event: device id plus the normalised input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceEvent {
    pub device_id: DeviceId,
    pub input: DeviceInput,
}

impl DeviceEvent {
    pub fn new(device_id: DeviceId, input: DeviceInput) -> Self {
        Self { device_id, input }
    }

    /// Bindable kind of this event, if any
    pub fn kind(&self) -> Option<DeviceKind> {
        self.code().map(|code| code.kind())
    }

    /// Physical code carried by this event, if it is bindable
    pub fn code(&self) -> Option<PhysicalCode> {
        match self.input {
            DeviceInput::Key { code, .. } => Some(PhysicalCode::Key(code)),
            DeviceInput::MouseButton { button, .. } => Some(PhysicalCode::MouseButton(button)),
            DeviceInput::MouseWheel { click } => Some(PhysicalCode::MouseWheel(click)),
            DeviceInput::ControllerAxis { axis, .. } => Some(PhysicalCode::ControllerAxis(axis)),
            DeviceInput::ControllerButton { button, .. } => {
                Some(PhysicalCode::ControllerButton(button))
            }
            DeviceInput::MouseMoved { .. }
            | DeviceInput::ControllerConnected
            | DeviceInput::ControllerDisconnected => None,
        }
    }

    /// Signed or unsigned magnitude: 0/1 for digital input, 1 for a wheel
    /// click, the normalised value for an axis, 0 for everything else.
    pub fn magnitude(&self) -> f32 {
        match self.input {
            DeviceInput::Key { pressed, .. }
            | DeviceInput::MouseButton { pressed, .. }
            | DeviceInput::ControllerButton { pressed, .. } => {
                if pressed {
                    1.0
                } else {
                    0.0
                }
            }
            DeviceInput::MouseWheel { .. } => 1.0,
            DeviceInput::ControllerAxis { value, .. } => value,
            _ => 0.0,
        }
    }

    /// Press-type events: the ones a binding capture can consume
    pub fn is_capture_gesture(&self) -> bool {
        match self.input {
            DeviceInput::Key { pressed, .. }
            | DeviceInput::MouseButton { pressed, .. }
            | DeviceInput::ControllerButton { pressed, .. } => pressed,
            DeviceInput::MouseWheel { .. } | DeviceInput::ControllerAxis { .. } => true,
            _ => false,
        }
    }

    pub fn is_controller(&self) -> bool {
        matches!(
            self.input,
            DeviceInput::ControllerAxis { .. }
                | DeviceInput::ControllerButton { .. }
                | DeviceInput::ControllerConnected
                | DeviceInput::ControllerDisconnected
        )
    }
}

/// Converts raw platform input into canonical [`DeviceEvent`]s
#[derive(Debug, Clone)]
pub struct DeviceNormalizer {
    controller_deadzone: f32,

    /// Trackpad scroll not yet worth a full click
    pixel_scroll: (f64, f64),
}

impl DeviceNormalizer {
    /// Create a normaliser with the given controller stick deadzone
    pub fn new(controller_deadzone: f32) -> Self {
        Self {
            controller_deadzone,
            pixel_scroll: (0.0, 0.0),
        }
    }

    /// Keyboard key press or release
    pub fn key(&self, code: KeyCode, pressed: bool) -> DeviceEvent {
        DeviceEvent::new(KEYBOARD_MOUSE_DEVICE, DeviceInput::Key { code, pressed })
    }

    /// Mouse button press or release
    pub fn mouse_button(&self, button: MouseButton, pressed: bool) -> DeviceEvent {
        DeviceEvent::new(
            KEYBOARD_MOUSE_DEVICE,
            DeviceInput::MouseButton { button, pressed },
        )
    }

    /// Relative mouse motion
    pub fn mouse_moved(&self, dx: f64, dy: f64) -> DeviceEvent {
        DeviceEvent::new(KEYBOARD_MOUSE_DEVICE, DeviceInput::MouseMoved { dx, dy })
    }

    /// Split a wheel delta into discrete clicks.
    /// Positive y scrolls up, positive x scrolls right.
    pub fn mouse_wheel(&self, dx: f64, dy: f64) -> Vec<DeviceEvent> {
        let mut events = Vec::with_capacity(2);
        if dy > 0.0 {
            events.push(MouseWheelClick::Up);
        } else if dy < 0.0 {
            events.push(MouseWheelClick::Down);
        }
        if dx > 0.0 {
            events.push(MouseWheelClick::Right);
        } else if dx < 0.0 {
            events.push(MouseWheelClick::Left);
        }
        events
            .into_iter()
            .map(|click| DeviceEvent::new(KEYBOARD_MOUSE_DEVICE, DeviceInput::MouseWheel { click }))
            .collect()
    }

    /// Controller plugged in
    pub fn controller_connected(&self, device_id: DeviceId) -> DeviceEvent {
        DeviceEvent::new(device_id, DeviceInput::ControllerConnected)
    }

    /// Controller unplugged
    pub fn controller_disconnected(&self, device_id: DeviceId) -> DeviceEvent {
        DeviceEvent::new(device_id, DeviceInput::ControllerDisconnected)
    }

    /// Controller button press or release
    pub fn controller_button(
        &self,
        device_id: DeviceId,
        button: ControllerButton,
        pressed: bool,
    ) -> DeviceEvent {
        DeviceEvent::new(device_id, DeviceInput::ControllerButton { button, pressed })
    }

    /// Clamp to the axis range and apply the deadzone
    pub fn controller_axis(&self, device_id: DeviceId, axis: ControllerAxis, value: f32) -> DeviceEvent {
        let mut value = apply_deadzone(value, self.controller_deadzone);
        if axis.is_trigger() {
            value = value.max(0.0);
        }
        DeviceEvent::new(device_id, DeviceInput::ControllerAxis { axis, value })
    }

    /// Translate a winit window event. Key repeats are dropped.
    pub fn window_event(&mut self, event: &WindowEvent) -> Vec<DeviceEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return Vec::new();
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => {
                        vec![self.key(code, event.state == ElementState::Pressed)]
                    }
                    PhysicalKey::Unidentified(_) => Vec::new(),
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                vec![self.mouse_button(*button, *state == ElementState::Pressed)]
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(x, y) => self.mouse_wheel(*x as f64, *y as f64),
                MouseScrollDelta::PixelDelta(pos) => self.pixel_wheel(pos.x, pos.y),
            },
            _ => Vec::new(),
        }
    }

    /// Accumulate smooth scrolling, emitting one click per line of travel.
    /// The remainder carries over to the next event.
    pub fn pixel_wheel(&mut self, dx: f64, dy: f64) -> Vec<DeviceEvent> {
        let (x, y) = (self.pixel_scroll.0 + dx, self.pixel_scroll.1 + dy);
        let clicks_x = (x / PIXELS_PER_WHEEL_CLICK).trunc();
        let clicks_y = (y / PIXELS_PER_WHEEL_CLICK).trunc();
        self.pixel_scroll = (
            x - clicks_x * PIXELS_PER_WHEEL_CLICK,
            y - clicks_y * PIXELS_PER_WHEEL_CLICK,
        );

        let mut events = Vec::new();
        for _ in 0..clicks_y.abs() as usize {
            events.extend(self.mouse_wheel(0.0, clicks_y.signum()));
        }
        for _ in 0..clicks_x.abs() as usize {
            events.extend(self.mouse_wheel(clicks_x.signum(), 0.0));
        }
        events
    }

    /// Translate a raw winit device event (mouse motion only)
    pub fn device_event(&self, event: &WinitDeviceEvent) -> Option<DeviceEvent> {
        match event {
            WinitDeviceEvent::MouseMotion { delta } => Some(self.mouse_moved(delta.0, delta.1)),
            _ => None,
        }
    }
}

impl Default for DeviceNormalizer {
    fn default() -> Self {
        Self::new(0.05)
    }
}

/// Map a gilrs button onto the standard layout. Triggers report through
/// [`controller_axis_from_gilrs_button`] instead.
#[cfg(feature = "gilrs")]
pub fn controller_button_from_gilrs(button: gilrs::Button) -> Option<ControllerButton> {
    use gilrs::Button;

    match button {
        Button::South => Some(ControllerButton::A),
        Button::East => Some(ControllerButton::B),
        Button::West => Some(ControllerButton::X),
        Button::North => Some(ControllerButton::Y),
        Button::Select => Some(ControllerButton::Back),
        Button::Mode => Some(ControllerButton::Guide),
        Button::Start => Some(ControllerButton::Start),
        Button::LeftThumb => Some(ControllerButton::LeftStick),
        Button::RightThumb => Some(ControllerButton::RightStick),
        Button::LeftTrigger => Some(ControllerButton::LeftShoulder),
        Button::RightTrigger => Some(ControllerButton::RightShoulder),
        Button::DPadUp => Some(ControllerButton::DPadUp),
        Button::DPadDown => Some(ControllerButton::DPadDown),
        Button::DPadLeft => Some(ControllerButton::DPadLeft),
        Button::DPadRight => Some(ControllerButton::DPadRight),
        _ => None,
    }
}

/// Analog triggers, which gilrs reports as buttons with a value
#[cfg(feature = "gilrs")]
pub fn controller_axis_from_gilrs_button(button: gilrs::Button) -> Option<ControllerAxis> {
    match button {
        gilrs::Button::LeftTrigger2 => Some(ControllerAxis::TriggerLeft),
        gilrs::Button::RightTrigger2 => Some(ControllerAxis::TriggerRight),
        _ => None,
    }
}

/// Map a gilrs axis, with whether its sign must flip. gilrs reports stick Y
/// as positive up; bindings expect positive down.
#[cfg(feature = "gilrs")]
pub fn controller_axis_from_gilrs(axis: gilrs::Axis) -> Option<(ControllerAxis, bool)> {
    use gilrs::Axis;

    match axis {
        Axis::LeftStickX => Some((ControllerAxis::LeftX, false)),
        Axis::LeftStickY => Some((ControllerAxis::LeftY, true)),
        Axis::RightStickX => Some((ControllerAxis::RightX, false)),
        Axis::RightStickY => Some((ControllerAxis::RightY, true)),
        Axis::LeftZ => Some((ControllerAxis::TriggerLeft, false)),
        Axis::RightZ => Some((ControllerAxis::TriggerRight, false)),
        _ => None,
    }
}

#[cfg(feature = "gilrs")]
impl DeviceNormalizer {
    /// Translate a gilrs gamepad event. Repeats and unmapped inputs give `None`.
    pub fn gilrs_event(&self, event: &gilrs::Event) -> Option<DeviceEvent> {
        use gilrs::EventType;

        let device_id = usize::from(event.id) as DeviceId;
        match event.event {
            EventType::Connected => Some(self.controller_connected(device_id)),
            EventType::Disconnected => Some(self.controller_disconnected(device_id)),
            EventType::ButtonPressed(button, _) => controller_button_from_gilrs(button)
                .map(|button| self.controller_button(device_id, button, true)),
            EventType::ButtonReleased(button, _) => controller_button_from_gilrs(button)
                .map(|button| self.controller_button(device_id, button, false)),
            EventType::ButtonChanged(button, value, _) => controller_axis_from_gilrs_button(button)
                .map(|axis| self.controller_axis(device_id, axis, value)),
            EventType::AxisChanged(axis, value, _) => {
                controller_axis_from_gilrs(axis).map(|(axis, flip)| {
                    let value = if flip { -value } else { value };
                    self.controller_axis(device_id, axis, value)
                })
            }
            _ => None,
        }
    }
}
