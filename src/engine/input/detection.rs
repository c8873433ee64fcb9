// Rebind mode: capture the next qualifying input and bind it to an action

use super::action::Action;
use super::binding::{Binding, BindingTable};
use super::device::{DeviceEvent, DeviceFamily, PhysicalCode};
use crate::core::math::AXIS_REST;
use log::{debug, info};
use winit::keyboard::KeyCode;

/// Keys that can never be bound: function keys with fixed engine meaning
pub const RESERVED_KEYS: [KeyCode; 3] = [KeyCode::F3, KeyCode::F4, KeyCode::F10];

/// OS meta keys, reserved on platforms where the desktop owns them
pub const META_KEYS: [KeyCode; 2] = [KeyCode::SuperLeft, KeyCode::SuperRight];

/// An armed capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSession {
    pub action: Action,
    pub family: DeviceFamily,
    /// Engine clock at arming time, in seconds
    pub started_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DetectionState {
    #[default]
    Idle,
    Armed(DetectionSession),
}

/// What a routed event did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionOutcome {
    /// Not eligible; the session stays armed
    Ignored,
    /// Escape pressed; no binding changed
    Cancelled { action: Action },
    /// A new binding was installed
    Bound { action: Action, binding: Binding },
}

/// How a capture ended, as reported to the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureResult {
    Bound(Binding),
    Cancelled,
}

/// Notified once whenever a capture ends, so a "press a key" prompt can close
pub trait CaptureListener {
    fn capture_ended(&mut self, action: Action, result: CaptureResult);
}

/// Capture listener that only logs
#[derive(Debug, Default)]
pub struct LogCaptureListener;

impl CaptureListener for LogCaptureListener {
    fn capture_ended(&mut self, action: Action, result: CaptureResult) {
        info!("Capture for {:?} ended: {:?}", action, result);
    }
}

/// Detection state machine: `Idle` -> `Armed` -> `Idle`, no timeout
#[derive(Debug, Clone)]
pub struct BindingDetector {
    state: DetectionState,
    axis_threshold: f32,
    reserve_meta_keys: bool,
}

impl BindingDetector {
    /// Idle detector with the given trigger threshold and meta key policy
    pub fn new(axis_threshold: f32, reserve_meta_keys: bool) -> Self {
        Self {
            state: DetectionState::Idle,
            axis_threshold,
            reserve_meta_keys,
        }
    }

    pub fn state(&self) -> DetectionState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DetectionState::Armed(_))
    }

    /// The armed session, if any
    pub fn session(&self) -> Option<DetectionSession> {
        match self.state {
            DetectionState::Armed(session) => Some(session),
            DetectionState::Idle => None,
        }
    }

    /// Arm for an action. An existing session is replaced.
    pub fn arm(&mut self, action: Action, family: DeviceFamily, now: f64) {
        if let DetectionState::Armed(previous) = self.state {
            info!(
                "Detection for {:?} replaced by {:?} ({:?})",
                previous.action, action, family
            );
        } else {
            info!("Detection armed for {:?} ({:?})", action, family);
        }
        self.state = DetectionState::Armed(DetectionSession {
            action,
            family,
            started_at: now,
        });
    }

    pub fn is_reserved(&self, code: KeyCode) -> bool {
        RESERVED_KEYS.contains(&code) || (self.reserve_meta_keys && META_KEYS.contains(&code))
    }

    /// Offer an event to the armed session.
    ///
    /// Escape cancels for either family. Reserved keys, events of the other
    /// family, non-trigger axes and small trigger motion are ignored. A
    /// qualifying event clears the family's bindings on the target, installs
    /// the new binding and disarms.
    pub fn handle(&mut self, event: &DeviceEvent, table: &mut BindingTable) -> DetectionOutcome {
        let Some(session) = self.session() else {
            return DetectionOutcome::Ignored;
        };
        let Some(code) = event.code() else {
            return DetectionOutcome::Ignored;
        };
        if !event.is_capture_gesture() {
            return DetectionOutcome::Ignored;
        }

        if let PhysicalCode::Key(key) = code {
            if key == KeyCode::Escape {
                info!("Detection for {:?} cancelled", session.action);
                self.state = DetectionState::Idle;
                return DetectionOutcome::Cancelled {
                    action: session.action,
                };
            }
            if self.is_reserved(key) {
                debug!("Reserved key {:?} ignored during detection", key);
                return DetectionOutcome::Ignored;
            }
        }

        if code.family() != session.family {
            return DetectionOutcome::Ignored;
        }

        if let PhysicalCode::ControllerAxis(axis) = code {
            if !axis.is_trigger() || event.magnitude().abs() < self.axis_threshold {
                return DetectionOutcome::Ignored;
            }
        }

        let action = session.action;
        let binding = Binding::increase(code);
        table.clear_family(action, session.family);
        table.bind(action, binding);
        if let PhysicalCode::ControllerAxis(_) = code {
            if let Some(control) = table.control_mut(action) {
                control.set_value(AXIS_REST);
            }
        }

        info!("Bound {:?} to {:?}", code, action);
        self.state = DetectionState::Idle;
        DetectionOutcome::Bound { action, binding }
    }
}

impl Default for BindingDetector {
    fn default() -> Self {
        Self::new(0.5, !cfg!(target_os = "macos"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::binding::Direction;
    use crate::engine::input::device::{ControllerAxis, ControllerButton, DeviceKind, DeviceNormalizer, MouseWheelClick};
    use winit::event::MouseButton;

    fn table_with_w() -> BindingTable {
        let mut table = BindingTable::new();
        table.bind(Action::MoveForward, Binding::increase(PhysicalCode::Key(KeyCode::KeyW)));
        table
    }

    #[test]
    fn test_escape_cancels_without_changes() {
        let input = DeviceNormalizer::default();
        let mut table = table_with_w();
        let mut detector = BindingDetector::default();
        detector.arm(Action::MoveForward, DeviceFamily::KeyboardMouse, 0.0);

        let outcome = detector.handle(&input.key(KeyCode::Escape, true), &mut table);

        assert_eq!(outcome, DetectionOutcome::Cancelled { action: Action::MoveForward });
        assert!(!detector.is_armed());
        assert_eq!(
            table.bindings(Action::MoveForward),
            vec![Binding::increase(PhysicalCode::Key(KeyCode::KeyW))]
        );
    }

    #[test]
    fn test_escape_cancels_controller_detection() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        let mut detector = BindingDetector::default();
        detector.arm(Action::Use, DeviceFamily::Controller, 0.0);

        let outcome = detector.handle(&input.key(KeyCode::Escape, true), &mut table);
        assert_eq!(outcome, DetectionOutcome::Cancelled { action: Action::Use });
    }

    #[test]
    fn test_reserved_key_keeps_session_armed() {
        let input = DeviceNormalizer::default();
        let mut table = table_with_w();
        let mut detector = BindingDetector::default();
        detector.arm(Action::MoveForward, DeviceFamily::KeyboardMouse, 0.0);

        for key in RESERVED_KEYS {
            let outcome = detector.handle(&input.key(key, true), &mut table);
            assert_eq!(outcome, DetectionOutcome::Ignored);
        }
        assert!(detector.is_armed());
        assert!(!table.is_physical_code_bound(PhysicalCode::Key(KeyCode::F10)));
    }

    #[test]
    fn test_meta_keys_reservation_is_configurable() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();

        let mut strict = BindingDetector::new(0.5, true);
        strict.arm(Action::Jump, DeviceFamily::KeyboardMouse, 0.0);
        assert_eq!(
            strict.handle(&input.key(KeyCode::SuperLeft, true), &mut table),
            DetectionOutcome::Ignored
        );

        let mut relaxed = BindingDetector::new(0.5, false);
        relaxed.arm(Action::Jump, DeviceFamily::KeyboardMouse, 0.0);
        assert!(matches!(
            relaxed.handle(&input.key(KeyCode::SuperLeft, true), &mut table),
            DetectionOutcome::Bound { .. }
        ));
    }

    #[test]
    fn test_key_capture_replaces_binding() {
        let input = DeviceNormalizer::default();
        let mut table = table_with_w();
        let mut detector = BindingDetector::default();
        detector.arm(Action::MoveForward, DeviceFamily::KeyboardMouse, 1.5);
        assert_eq!(detector.session().map(|s| s.started_at), Some(1.5));

        let outcome = detector.handle(&input.key(KeyCode::KeyI, true), &mut table);

        let binding = Binding::increase(PhysicalCode::Key(KeyCode::KeyI));
        assert_eq!(outcome, DetectionOutcome::Bound { action: Action::MoveForward, binding });
        assert_eq!(table.bindings(Action::MoveForward), vec![binding]);
        assert!(!table.is_physical_code_bound(PhysicalCode::Key(KeyCode::KeyW)));
        assert_eq!(detector.state(), DetectionState::Idle);
    }

    #[test]
    fn test_mouse_capture_clears_key_binding() {
        let input = DeviceNormalizer::default();
        let mut table = table_with_w();
        let mut detector = BindingDetector::default();
        detector.arm(Action::MoveForward, DeviceFamily::KeyboardMouse, 0.0);

        detector.handle(&input.mouse_button(MouseButton::Middle, true), &mut table);

        assert!(table
            .query(Action::MoveForward, DeviceKind::Key, Direction::Increase)
            .is_none());
        assert!(table
            .query(Action::MoveForward, DeviceKind::MouseButton, Direction::Increase)
            .is_some());
    }

    #[test]
    fn test_wheel_capture() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        let mut detector = BindingDetector::default();
        detector.arm(Action::TogglePOV, DeviceFamily::KeyboardMouse, 0.0);

        let events = input.mouse_wheel(0.0, -1.0);
        let outcome = detector.handle(&events[0], &mut table);

        assert_eq!(
            outcome,
            DetectionOutcome::Bound {
                action: Action::TogglePOV,
                binding: Binding::increase(PhysicalCode::MouseWheel(MouseWheelClick::Down)),
            }
        );
    }

    #[test]
    fn test_motion_and_releases_are_ignored() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        let mut detector = BindingDetector::default();
        detector.arm(Action::Jump, DeviceFamily::KeyboardMouse, 0.0);

        assert_eq!(detector.handle(&input.mouse_moved(5.0, 0.0), &mut table), DetectionOutcome::Ignored);
        assert_eq!(detector.handle(&input.key(KeyCode::KeyK, false), &mut table), DetectionOutcome::Ignored);
        assert!(detector.is_armed());
    }

    #[test]
    fn test_other_family_is_ignored() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        let mut detector = BindingDetector::default();
        detector.arm(Action::Activate, DeviceFamily::Controller, 0.0);

        assert_eq!(detector.handle(&input.key(KeyCode::KeyK, true), &mut table), DetectionOutcome::Ignored);
        assert!(detector.is_armed());
    }

    #[test]
    fn test_only_triggers_bind_as_axes() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        let mut detector = BindingDetector::default();
        detector.arm(Action::Use, DeviceFamily::Controller, 0.0);

        let stick = input.controller_axis(1, ControllerAxis::LeftX, 1.0);
        assert_eq!(detector.handle(&stick, &mut table), DetectionOutcome::Ignored);

        let light = input.controller_axis(1, ControllerAxis::TriggerRight, 0.2);
        assert_eq!(detector.handle(&light, &mut table), DetectionOutcome::Ignored);

        let full = input.controller_axis(1, ControllerAxis::TriggerRight, 0.9);
        assert!(matches!(detector.handle(&full, &mut table), DetectionOutcome::Bound { .. }));

        let control = table.control(Action::Use).unwrap();
        assert_eq!(control.value(), AXIS_REST);
        assert_eq!(control.initial_value(), AXIS_REST);
    }

    #[test]
    fn test_controller_button_capture_clears_axis() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        table.bind(
            Action::Jump,
            Binding::increase(PhysicalCode::ControllerAxis(ControllerAxis::TriggerLeft)),
        );
        let mut detector = BindingDetector::default();
        detector.arm(Action::Jump, DeviceFamily::Controller, 0.0);

        detector.handle(&input.controller_button(1, ControllerButton::Y, true), &mut table);

        assert_eq!(
            table.bindings(Action::Jump),
            vec![Binding::increase(PhysicalCode::ControllerButton(ControllerButton::Y))]
        );
        assert_eq!(table.control(Action::Jump).unwrap().initial_value(), 0.0);
    }

    #[test]
    fn test_rearming_replaces_session() {
        let mut detector = BindingDetector::default();
        detector.arm(Action::Jump, DeviceFamily::KeyboardMouse, 0.0);
        detector.arm(Action::Use, DeviceFamily::Controller, 2.0);

        let session = detector.session().unwrap();
        assert_eq!(session.action, Action::Use);
        assert_eq!(session.family, DeviceFamily::Controller);
    }
}
