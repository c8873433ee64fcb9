// Display names for physical inputs shown in the remapping menu

use super::device::{ControllerAxis, ControllerButton, MouseWheelClick};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Label for an unassigned binding
pub const NONE_LABEL: &str = "#{sNone}";

/// Escape `#` for the tag-aware label renderer
pub fn escape_tags(text: &str) -> String {
    text.replace('#', "##")
}

/// 1-based mouse button number: 1 = left, 2 = middle, 3 = right
pub fn mouse_button_number(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
        MouseButton::Back => 4,
        MouseButton::Forward => 5,
        MouseButton::Other(n) => n,
    }
}

pub fn mouse_button_label(button: MouseButton) -> String {
    format!("#{{sMouse}} {}", mouse_button_number(button))
}

pub fn mouse_wheel_label(click: MouseWheelClick) -> &'static str {
    match click {
        MouseWheelClick::Up => "Mouse Wheel Up",
        MouseWheelClick::Down => "Mouse Wheel Down",
        MouseWheelClick::Left => "Mouse Wheel Left",
        MouseWheelClick::Right => "Mouse Wheel Right",
    }
}

pub fn controller_button_label(button: ControllerButton) -> &'static str {
    match button {
        ControllerButton::A => "A Button",
        ControllerButton::B => "B Button",
        ControllerButton::X => "X Button",
        ControllerButton::Y => "Y Button",
        ControllerButton::Back => "Back Button",
        ControllerButton::Guide => "Guide Button",
        ControllerButton::Start => "Start Button",
        ControllerButton::LeftStick => "Left Stick",
        ControllerButton::RightStick => "Right Stick",
        ControllerButton::LeftShoulder => "Left Shoulder",
        ControllerButton::RightShoulder => "Right Shoulder",
        ControllerButton::DPadUp => "D-pad Up",
        ControllerButton::DPadDown => "D-pad Down",
        ControllerButton::DPadLeft => "D-pad Left",
        ControllerButton::DPadRight => "D-pad Right",
    }
}

pub fn controller_axis_label(axis: ControllerAxis) -> &'static str {
    match axis {
        ControllerAxis::LeftX => "Left Stick X",
        ControllerAxis::LeftY => "Left Stick Y",
        ControllerAxis::RightX => "Right Stick X",
        ControllerAxis::RightY => "Right Stick Y",
        ControllerAxis::TriggerLeft => "Left Trigger",
        ControllerAxis::TriggerRight => "Right Trigger",
    }
}

/// Human-readable key name, before tag escaping
pub fn key_name(code: KeyCode) -> String {
    let fixed = match code {
        KeyCode::Space => "Space",
        KeyCode::Enter => "Return",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Escape => "Escape",
        KeyCode::CapsLock => "CapsLock",
        KeyCode::ShiftLeft => "Left Shift",
        KeyCode::ShiftRight => "Right Shift",
        KeyCode::ControlLeft => "Left Ctrl",
        KeyCode::ControlRight => "Right Ctrl",
        KeyCode::AltLeft => "Left Alt",
        KeyCode::AltRight => "Right Alt",
        KeyCode::SuperLeft => "Left Super",
        KeyCode::SuperRight => "Right Super",
        KeyCode::Minus => "-",
        KeyCode::Equal => "=",
        KeyCode::BracketLeft => "[",
        KeyCode::BracketRight => "]",
        KeyCode::Backquote => "`",
        KeyCode::Backslash => "\\",
        KeyCode::Semicolon => ";",
        KeyCode::Quote => "'",
        KeyCode::Comma => ",",
        KeyCode::Period => ".",
        KeyCode::Slash => "/",
        KeyCode::ArrowUp => "Up",
        KeyCode::ArrowDown => "Down",
        KeyCode::ArrowLeft => "Left",
        KeyCode::ArrowRight => "Right",
        KeyCode::Insert => "Insert",
        KeyCode::Delete => "Delete",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::NumpadAdd => "Keypad +",
        KeyCode::NumpadSubtract => "Keypad -",
        KeyCode::NumpadMultiply => "Keypad *",
        KeyCode::NumpadDivide => "Keypad /",
        KeyCode::NumpadDecimal => "Keypad .",
        KeyCode::NumpadEnter => "Keypad Enter",
        KeyCode::NumpadHash => "Keypad #",
        _ => "",
    };
    if !fixed.is_empty() {
        return fixed.to_string();
    }

    // KeyW -> W, Digit1 -> 1, Numpad4 -> Keypad 4, F5 -> F5
    let debug = format!("{:?}", code);
    if let Some(letter) = debug.strip_prefix("Key") {
        letter.to_string()
    } else if let Some(digit) = debug.strip_prefix("Digit") {
        digit.to_string()
    } else if let Some(pad) = debug.strip_prefix("Numpad") {
        format!("Keypad {}", pad)
    } else {
        debug
    }
}

/// Key name ready for display
pub fn key_label(code: KeyCode) -> String {
    escape_tags(&key_name(code))
}
