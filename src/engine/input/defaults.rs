// Hardcoded default bindings and the seeding passes that install them

use super::action::Action;
use super::binding::{Binding, BindingTable};
use super::device::{ControllerAxis, ControllerButton, DeviceFamily, DeviceKind, MouseWheelClick, PhysicalCode};
use crate::core::math::AXIS_REST;
use log::{debug, info};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Default keyboard binding per action.
/// Physical key positions, so the layout is the same on any keyboard format.
pub const DEFAULT_KEYS: &[(Action, KeyCode)] = &[
    (Action::Activate, KeyCode::Space),
    (Action::MoveBackward, KeyCode::KeyS),
    (Action::MoveForward, KeyCode::KeyW),
    (Action::MoveLeft, KeyCode::KeyA),
    (Action::MoveRight, KeyCode::KeyD),
    (Action::ToggleWeapon, KeyCode::KeyF),
    (Action::ToggleSpell, KeyCode::KeyR),
    (Action::CycleSpellLeft, KeyCode::Minus),
    (Action::CycleSpellRight, KeyCode::Equal),
    (Action::CycleWeaponLeft, KeyCode::BracketLeft),
    (Action::CycleWeaponRight, KeyCode::BracketRight),
    (Action::QuickKeysMenu, KeyCode::F1),
    (Action::Console, KeyCode::Backquote),
    (Action::Run, KeyCode::ShiftLeft),
    (Action::Sneak, KeyCode::ControlLeft),
    (Action::AutoMove, KeyCode::KeyQ),
    (Action::Jump, KeyCode::KeyE),
    (Action::Journal, KeyCode::KeyJ),
    (Action::Rest, KeyCode::KeyT),
    (Action::GameMenu, KeyCode::Escape),
    (Action::TogglePOV, KeyCode::Tab),
    (Action::QuickKey1, KeyCode::Digit1),
    (Action::QuickKey2, KeyCode::Digit2),
    (Action::QuickKey3, KeyCode::Digit3),
    (Action::QuickKey4, KeyCode::Digit4),
    (Action::QuickKey5, KeyCode::Digit5),
    (Action::QuickKey6, KeyCode::Digit6),
    (Action::QuickKey7, KeyCode::Digit7),
    (Action::QuickKey8, KeyCode::Digit8),
    (Action::QuickKey9, KeyCode::Digit9),
    (Action::QuickKey10, KeyCode::Digit0),
    (Action::Screenshot, KeyCode::F12),
    (Action::ToggleHUD, KeyCode::F11),
    (Action::ToggleDebug, KeyCode::F10),
    (Action::AlwaysRun, KeyCode::CapsLock),
    (Action::QuickSave, KeyCode::F5),
    (Action::QuickLoad, KeyCode::F9),
];

pub const DEFAULT_MOUSE_BUTTONS: &[(Action, MouseButton)] = &[
    (Action::Inventory, MouseButton::Right),
    (Action::Use, MouseButton::Left),
];

pub const DEFAULT_MOUSE_WHEEL: &[(Action, MouseWheelClick)] = &[
    (Action::ZoomIn, MouseWheelClick::Up),
    (Action::ZoomOut, MouseWheelClick::Down),
];

/// Keypad pairs for the look axes: (action, increase key, decrease key)
pub const LOOK_KEYPAD_PAIRS: &[(Action, KeyCode, KeyCode)] = &[
    (Action::LookLeftRight, KeyCode::Numpad6, KeyCode::Numpad4),
    (Action::LookUpDown, KeyCode::Numpad2, KeyCode::Numpad8),
];

pub const DEFAULT_CONTROLLER_BUTTONS: &[(Action, ControllerButton)] = &[
    (Action::Activate, ControllerButton::A),
    (Action::ToggleWeapon, ControllerButton::X),
    (Action::ToggleSpell, ControllerButton::Y),
    (Action::Sneak, ControllerButton::LeftStick),
    (Action::Journal, ControllerButton::LeftShoulder),
    (Action::Rest, ControllerButton::RightShoulder),
    (Action::TogglePOV, ControllerButton::RightStick),
    (Action::Inventory, ControllerButton::B),
    (Action::GameMenu, ControllerButton::Start),
    (Action::QuickSave, ControllerButton::Guide),
    (Action::MoveForward, ControllerButton::DPadUp),
    (Action::MoveLeft, ControllerButton::DPadLeft),
    (Action::MoveBackward, ControllerButton::DPadDown),
    (Action::MoveRight, ControllerButton::DPadRight),
];

pub const DEFAULT_CONTROLLER_AXES: &[(Action, ControllerAxis)] = &[
    (Action::MoveForwardBackward, ControllerAxis::LeftY),
    (Action::MoveLeftRight, ControllerAxis::LeftX),
    (Action::LookUpDown, ControllerAxis::RightY),
    (Action::LookLeftRight, ControllerAxis::RightX),
    (Action::Use, ControllerAxis::TriggerRight),
    (Action::Jump, ControllerAxis::TriggerLeft),
];

fn lookup<T: Copy>(table: &[(Action, T)], action: Action) -> Option<T> {
    table.iter().find(|(a, _)| *a == action).map(|(_, v)| *v)
}

/// A default is usable when forcing or when nobody else claims its code
fn available(table: &BindingTable, code: PhysicalCode, force: bool) -> bool {
    force || !table.is_physical_code_bound(code)
}

/// Install keyboard/mouse defaults.
///
/// An action is seeded when its control did not exist yet, when forcing, or
/// when it holds no increase-direction key, mouse button or wheel binding.
/// Candidates are tried key first, then mouse button, then wheel; the first
/// one not claimed elsewhere wins. Returns the number of actions seeded.
pub fn seed_key_defaults(table: &mut BindingTable, force: bool) -> usize {
    let mut seeded = 0;

    for action in Action::all() {
        let existed = table.has_control(action);
        if !existed {
            table.ensure_control(action, 0.0);
        }

        if existed && !force && table.has_increase_binding(action, &DeviceKind::KEYBOARD_MOUSE) {
            continue;
        }

        table.clear_family(action, DeviceFamily::KeyboardMouse);

        let key = lookup(DEFAULT_KEYS, action).map(PhysicalCode::Key);
        let mouse = lookup(DEFAULT_MOUSE_BUTTONS, action).map(PhysicalCode::MouseButton);
        let wheel = lookup(DEFAULT_MOUSE_WHEEL, action).map(PhysicalCode::MouseWheel);

        let candidate = [key, mouse, wheel]
            .into_iter()
            .flatten()
            .find(|code| available(table, *code, force));
        if let Some(code) = candidate {
            debug!("Default {:?} -> {:?}", action, code);
            table.bind(action, Binding::increase(code));
        }

        if action.is_look_axis() {
            let pair = LOOK_KEYPAD_PAIRS.iter().find(|(a, _, _)| *a == action);
            if let Some((_, increase, decrease)) = pair {
                let increase = PhysicalCode::Key(*increase);
                let decrease = PhysicalCode::Key(*decrease);
                if !table.is_physical_code_bound(increase) && !table.is_physical_code_bound(decrease) {
                    table.attach(action, Binding::increase(increase));
                    table.attach(action, Binding::decrease(decrease));
                }
            }
        }

        seeded += 1;
    }

    info!("Seeded keyboard/mouse defaults for {} actions (force: {})", seeded, force);
    seeded
}

/// Install controller defaults: buttons first, then axes.
///
/// Axis-mapped actions rest at 0.5, everything else at 0.
pub fn seed_controller_defaults(table: &mut BindingTable, force: bool) -> usize {
    let mut seeded = 0;

    for action in Action::all() {
        let button = lookup(DEFAULT_CONTROLLER_BUTTONS, action).map(PhysicalCode::ControllerButton);
        let axis = lookup(DEFAULT_CONTROLLER_AXES, action).map(PhysicalCode::ControllerAxis);

        let existed = table.has_control(action);
        if !existed {
            let initial = if axis.is_some() { AXIS_REST } else { 0.0 };
            table.ensure_control(action, initial);
        }

        if existed && !force && table.has_increase_binding(action, &DeviceKind::CONTROLLER) {
            continue;
        }

        table.clear_family(action, DeviceFamily::Controller);

        if let Some(code) = button.filter(|code| available(table, *code, force)) {
            table.bind(action, Binding::increase(code));
        } else if let Some(code) = axis.filter(|code| available(table, *code, force)) {
            table.bind(action, Binding::increase(code));
            if let Some(control) = table.control_mut(action) {
                control.set_value(AXIS_REST);
            }
        }

        seeded += 1;
    }

    info!("Seeded controller defaults for {} actions (force: {})", seeded, force);
    seeded
}
