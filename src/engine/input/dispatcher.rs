// Action dispatcher: turns channel changes into discrete gameplay actions

use super::action::Action;
use super::channel::{ChannelListener, ChannelView};
use log::debug;

/// A channel rising above this from at or below it is a press
const PRESS_THRESHOLD: f32 = 0.6;

/// A channel dropping below this from at or above it is a release
const RELEASE_THRESHOLD: f32 = 0.8;

/// Gameplay collaborators the dispatcher talks to
pub trait GameplayHooks {
    /// Run an action once
    fn execute_action(&mut self, action: Action);

    /// Called on every channel change
    fn reset_idle_time(&mut self);

    /// Whether player controls are currently switched on
    fn player_controls_enabled(&self) -> bool {
        true
    }

    /// Whether the player has a weapon or spell drawn
    fn stance_drawn(&self) -> bool {
        false
    }

    fn set_attempt_jump(&mut self, _attempt: bool) {}

    fn set_attacking_or_spell(&mut self, _attacking: bool) {}
}

/// Normalise a channel change to a digital transition.
///
/// Pure 0/1 changes pass through. Analog changes count only when they cross
/// the hysteresis band: up through 0.6 is a press, down through 0.8 is a
/// release. Anything else returns `None`.
pub fn debounce(current: f32, previous: f32) -> Option<(f32, f32)> {
    let digital = |v: f32| v == 0.0 || v == 1.0;
    if digital(current) && digital(previous) {
        Some((current, previous))
    } else if previous >= RELEASE_THRESHOLD && current < RELEASE_THRESHOLD {
        Some((0.0, 1.0))
    } else if previous <= PRESS_THRESHOLD && current > PRESS_THRESHOLD {
        Some((1.0, 0.0))
    } else {
        None
    }
}

/// Listens to every channel and forwards qualifying transitions to gameplay
pub struct ActionDispatcher {
    hooks: Box<dyn GameplayHooks>,
    drag_drop: bool,
}

impl ActionDispatcher {
    /// Dispatch into the given gameplay hooks
    pub fn new(hooks: Box<dyn GameplayHooks>) -> Self {
        Self {
            hooks,
            drag_drop: false,
        }
    }

    /// While set, only menu actions reach gameplay
    pub fn set_drag_drop(&mut self, active: bool) {
        self.drag_drop = active;
    }

    pub fn drag_drop(&self) -> bool {
        self.drag_drop
    }

    pub fn hooks(&self) -> &dyn GameplayHooks {
        self.hooks.as_ref()
    }

    /// Redirect use/jump while a weapon or spell toggle is held on a controller
    fn remap(&mut self, action: Action, current: f32, previous: f32, channels: &ChannelView<'_>) -> Action {
        let cycling = channels.joystick_last_used() && current == 1.0;
        match action {
            Action::Use => {
                if cycling && channels.is_active(Action::ToggleWeapon) {
                    Action::CycleWeaponRight
                } else if cycling && channels.is_active(Action::ToggleSpell) {
                    Action::CycleSpellRight
                } else {
                    let drawn = self.hooks.stance_drawn();
                    self.hooks.set_attacking_or_spell(current != 0.0 && drawn);
                    action
                }
            }
            Action::Jump => {
                if cycling && channels.is_active(Action::ToggleWeapon) {
                    Action::CycleWeaponLeft
                } else if cycling && channels.is_active(Action::ToggleSpell) {
                    Action::CycleSpellLeft
                } else {
                    self.hooks.set_attempt_jump(current == 1.0 && previous == 0.0);
                    action
                }
            }
            _ => action,
        }
    }
}

impl ChannelListener for ActionDispatcher {
    fn channel_changed(&mut self, action: Action, current: f32, previous: f32, channels: &ChannelView<'_>) {
        self.hooks.reset_idle_time();

        if self.drag_drop && !action.survives_drag_drop() {
            debug!("{:?} suppressed during drag-and-drop", action);
            return;
        }

        let Some((current, previous)) = debounce(current, previous) else {
            return;
        };

        let action = if self.hooks.player_controls_enabled() {
            self.remap(action, current, previous, channels)
        } else {
            action
        };

        if current == 1.0 {
            self.hooks.execute_action(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::binding::{Binding, BindingTable};
    use crate::engine::input::channel::ChannelEngine;
    use crate::engine::input::device::{ControllerAxis, ControllerButton, DeviceNormalizer, PhysicalCode};
    use crate::engine::input::tests::{HookLog, RecordingHooks};
    use winit::keyboard::KeyCode;

    fn dispatcher() -> (ActionDispatcher, HookLog) {
        let hooks = RecordingHooks::default();
        let log = hooks.log();
        (ActionDispatcher::new(Box::new(hooks)), log)
    }

    /// Feed a sequence of channel values through the dispatcher
    fn feed(dispatcher: &mut ActionDispatcher, action: Action, values: &[f32]) {
        let engine = ChannelEngine::new(BindingTable::new());
        for pair in values.windows(2) {
            dispatcher.channel_changed(action, pair[1], pair[0], &engine.view());
        }
    }

    #[test]
    fn test_debounce_digital_passthrough() {
        assert_eq!(debounce(1.0, 0.0), Some((1.0, 0.0)));
        assert_eq!(debounce(0.0, 1.0), Some((0.0, 1.0)));
    }

    #[test]
    fn test_debounce_hysteresis() {
        assert_eq!(debounce(0.65, 0.5), Some((1.0, 0.0)));
        assert_eq!(debounce(0.9, 0.65), None);
        assert_eq!(debounce(0.65, 0.9), Some((0.0, 1.0)));
        assert_eq!(debounce(0.5, 0.65), None);
        assert_eq!(debounce(0.7, 0.75), None);
    }

    #[test]
    fn test_analog_sweep_dispatches_one_press() {
        let (mut dispatcher, log) = dispatcher();
        feed(&mut dispatcher, Action::Activate, &[0.5, 0.65, 0.9, 0.65, 0.5]);

        assert_eq!(log.executed(), vec![Action::Activate]);
        assert_eq!(log.idle_resets(), 4);
    }

    #[test]
    fn test_digital_sequence_dispatches_once() {
        let (mut dispatcher, log) = dispatcher();
        feed(&mut dispatcher, Action::Inventory, &[0.0, 1.0, 0.0]);

        assert_eq!(log.executed(), vec![Action::Inventory]);
    }

    #[test]
    fn test_drag_drop_suppression() {
        let (mut dispatcher, log) = dispatcher();
        dispatcher.set_drag_drop(true);

        feed(&mut dispatcher, Action::Activate, &[0.0, 1.0]);
        feed(&mut dispatcher, Action::GameMenu, &[0.0, 1.0]);

        assert_eq!(log.executed(), vec![Action::GameMenu]);
        // Idle timer still resets for suppressed actions
        assert_eq!(log.idle_resets(), 2);
    }

    #[test]
    fn test_jump_attempt_on_rising_edge() {
        let (mut dispatcher, log) = dispatcher();
        feed(&mut dispatcher, Action::Jump, &[0.0, 1.0, 0.0]);

        assert_eq!(log.jump_attempts(), vec![true, false]);
        assert_eq!(log.executed(), vec![Action::Jump]);
    }

    #[test]
    fn test_use_reports_attacking_when_drawn() {
        let hooks = RecordingHooks::default();
        let log = hooks.log();
        log.set_stance_drawn(true);
        let mut dispatcher = ActionDispatcher::new(Box::new(hooks));

        feed(&mut dispatcher, Action::Use, &[0.0, 1.0, 0.0]);

        assert_eq!(log.attacking(), vec![true, false]);
    }

    #[test]
    fn test_player_controls_disabled_skips_remap() {
        let hooks = RecordingHooks::default();
        let log = hooks.log();
        log.set_player_controls(false);
        let mut dispatcher = ActionDispatcher::new(Box::new(hooks));

        feed(&mut dispatcher, Action::Jump, &[0.0, 1.0]);

        assert!(log.jump_attempts().is_empty());
        assert_eq!(log.executed(), vec![Action::Jump]);
    }

    #[test]
    fn test_controller_use_cycles_weapon_while_toggle_held() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        table.bind(
            Action::ToggleWeapon,
            Binding::increase(PhysicalCode::ControllerButton(ControllerButton::X)),
        );
        table.bind(
            Action::Use,
            Binding::increase(PhysicalCode::ControllerAxis(ControllerAxis::TriggerRight)),
        );
        let mut engine = ChannelEngine::new(table);
        let (mut dispatcher, log) = dispatcher();

        engine.process(&input.controller_button(1, ControllerButton::X, true), &mut dispatcher);
        engine.process(&input.controller_axis(1, ControllerAxis::TriggerRight, 1.0), &mut dispatcher);

        assert_eq!(log.executed(), vec![Action::ToggleWeapon, Action::CycleWeaponRight]);
    }

    #[test]
    fn test_keyboard_use_is_not_redirected() {
        let input = DeviceNormalizer::default();
        let mut table = BindingTable::new();
        table.bind(Action::ToggleSpell, Binding::increase(PhysicalCode::Key(KeyCode::KeyR)));
        table.bind(Action::Jump, Binding::increase(PhysicalCode::Key(KeyCode::KeyE)));
        let mut engine = ChannelEngine::new(table);
        let (mut dispatcher, log) = dispatcher();

        engine.process(&input.key(KeyCode::KeyR, true), &mut dispatcher);
        engine.process(&input.key(KeyCode::KeyE, true), &mut dispatcher);

        assert_eq!(log.executed(), vec![Action::ToggleSpell, Action::Jump]);
    }
}
