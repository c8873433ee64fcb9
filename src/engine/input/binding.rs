// Binding table: which physical inputs drive which action's control

use super::action::Action;
use super::device::{DeviceFamily, DeviceId, DeviceKind, PhysicalCode};
use crate::core::math::AXIS_REST;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which way a binding pushes its control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Increase,
    Decrease,
}

/// A physical input assigned to one control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub device_id: DeviceId,
    pub code: PhysicalCode,
    pub direction: Direction,
}

impl Binding {
    /// Binding on the code family's canonical device id
    pub fn new(code: PhysicalCode, direction: Direction) -> Self {
        Self {
            device_id: code.family().device_id(),
            code,
            direction,
        }
    }

    /// Increase-direction binding on the family's canonical device id
    pub fn increase(code: PhysicalCode) -> Self {
        Self::new(code, Direction::Increase)
    }

    /// Decrease-direction counterpart of `increase`
    pub fn decrease(code: PhysicalCode) -> Self {
        Self::new(code, Direction::Decrease)
    }

    /// Device kind of the bound code
    pub fn kind(&self) -> DeviceKind {
        self.code.kind()
    }

    /// Claim key used by the reverse lookup
    pub fn key(&self) -> ClaimKey {
        (self.device_id, self.code)
    }

    /// Resting value a control takes when this binding is installed
    pub fn resting_value(&self) -> f32 {
        match self.kind() {
            DeviceKind::ControllerAxis => AXIS_REST,
            _ => 0.0,
        }
    }
}

/// A physical code on a specific device; each may be claimed by one control
pub type ClaimKey = (DeviceId, PhysicalCode);

/// Binding holder attached to exactly one action's channel.
///
/// Tracks the live value derived from device state. Digital inputs are kept
/// as a stack of held codes; the most recent one decides the value.
#[derive(Debug, Clone)]
pub struct Control {
    initial_value: f32,
    value: f32,
    bindings: Vec<Binding>,
    held: Vec<(PhysicalCode, Direction)>,
}

impl Control {
    /// Create an unbound control resting at `initial_value`
    pub fn new(initial_value: f32) -> Self {
        Self {
            initial_value,
            value: initial_value,
            bindings: Vec::new(),
            held: Vec::new(),
        }
    }

    /// Current value in [0, 1]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value the control returns to when nothing is held
    pub fn initial_value(&self) -> f32 {
        self.initial_value
    }

    /// Bindings in installation order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Set the resting value. The live value is left alone.
    pub fn set_initial_value(&mut self, value: f32) {
        self.initial_value = value;
    }

    /// Overwrite the live value (axis input, detection reset)
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    /// Register a digital press. Returns false for a repeat of a held input.
    pub(crate) fn press(&mut self, code: PhysicalCode, direction: Direction) -> bool {
        if self.held.iter().any(|(held, _)| *held == code) {
            return false;
        }
        self.held.push((code, direction));
        self.value = direction_value(direction);
        true
    }

    /// Register a digital release; falls back to the next held input or rest
    pub(crate) fn release(&mut self, code: PhysicalCode) {
        let before = self.held.len();
        self.held.retain(|(held, _)| *held != code);
        if self.held.len() != before {
            self.settle();
        }
    }

    /// Drop every held input of a family (device unplugged)
    pub(crate) fn release_family(&mut self, family: DeviceFamily) -> bool {
        let before = self.held.len();
        self.held.retain(|(held, _)| held.family() != family);
        self.held.len() != before
    }

    /// Return to the value dictated by held inputs, or rest
    pub(crate) fn settle(&mut self) {
        self.value = match self.held.last() {
            Some((_, direction)) => direction_value(*direction),
            None => self.initial_value,
        };
    }

    fn remove_where(&mut self, pred: impl Fn(&Binding) -> bool) -> Vec<Binding> {
        let (removed, kept): (Vec<Binding>, Vec<Binding>) =
            self.bindings.iter().copied().partition(|b| pred(b));
        self.bindings = kept;
        for binding in &removed {
            self.held.retain(|(held, _)| *held != binding.code);
        }
        removed
    }
}

fn direction_value(direction: Direction) -> f32 {
    match direction {
        Direction::Increase => 1.0,
        Direction::Decrease => 0.0,
    }
}

/// Table of controls and their bindings for every action.
///
/// Within a device kind each physical code is claimed by at most one
/// control; binding a claimed code releases the old claim first.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    /// Controls, created lazily and never removed
    controls: HashMap<Action, Control>,

    /// Reverse lookup: claimed code -> owning action and direction
    claims: HashMap<ClaimKey, (Action, Direction)>,
}

impl BindingTable {
    /// Create an empty binding table
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the action owns a control yet
    pub fn has_control(&self, action: Action) -> bool {
        self.controls.contains_key(&action)
    }

    /// The action's control, if created
    pub fn control(&self, action: Action) -> Option<&Control> {
        self.controls.get(&action)
    }

    /// Mutable access to the action's control
    pub fn control_mut(&mut self, action: Action) -> Option<&mut Control> {
        self.controls.get_mut(&action)
    }

    /// Get the action's control, creating it with the given resting value
    pub fn ensure_control(&mut self, action: Action, initial_value: f32) -> &mut Control {
        self.controls
            .entry(action)
            .or_insert_with(|| Control::new(initial_value))
    }

    /// Bind a physical input to an action.
    ///
    /// Any other claim on the same code is released first, then the binding
    /// is installed and the control's resting value reset for its kind.
    pub fn bind(&mut self, action: Action, binding: Binding) {
        self.attach(action, binding);
        if let Some(control) = self.controls.get_mut(&action) {
            control.set_initial_value(binding.resting_value());
        }
    }

    /// Install a binding without touching the resting value
    pub fn attach(&mut self, action: Action, binding: Binding) {
        self.release_claim(binding.key());
        let control = self.ensure_control(action, binding.resting_value());
        control.bindings.push(binding);
        self.claims.insert(binding.key(), (action, binding.direction));
    }

    /// Release whoever holds this code. Returns the previous owner.
    pub fn release_claim(&mut self, key: ClaimKey) -> Option<Action> {
        let (owner, _) = self.claims.remove(&key)?;
        if let Some(control) = self.controls.get_mut(&owner) {
            control.remove_where(|b| b.key() == key);
            control.settle();
        }
        Some(owner)
    }

    /// Remove every binding of one kind from the action, all directions
    pub fn clear_all_bindings_of_kind(&mut self, action: Action, kind: DeviceKind) {
        let removed = match self.controls.get_mut(&action) {
            Some(control) => {
                let removed = control.remove_where(|b| b.kind() == kind);
                if !removed.is_empty() {
                    // A held code just lost its binding; its release will never route here
                    control.settle();
                }
                removed
            }
            None => return,
        };
        for binding in removed {
            self.claims.remove(&binding.key());
        }
    }

    /// Clear every kind belonging to a device family
    pub fn clear_family(&mut self, action: Action, family: DeviceFamily) {
        for kind in family.kinds() {
            self.clear_all_bindings_of_kind(action, *kind);
        }
    }

    /// The action's binding of a kind and direction, if assigned
    pub fn query(&self, action: Action, kind: DeviceKind, direction: Direction) -> Option<Binding> {
        self.controls.get(&action).and_then(|control| {
            control
                .bindings
                .iter()
                .find(|b| b.kind() == kind && b.direction == direction)
                .copied()
        })
    }

    /// Whether the code is claimed by any control (on its family's device id)
    pub fn is_physical_code_bound(&self, code: PhysicalCode) -> bool {
        self.claims
            .contains_key(&(code.family().device_id(), code))
    }

    /// Owner of a code on a device, for event routing
    pub fn lookup(&self, device_id: DeviceId, code: PhysicalCode) -> Option<(Action, Direction)> {
        self.claims.get(&(device_id, code)).copied()
    }

    /// Whether the action has an increase binding of any of the kinds
    pub fn has_increase_binding(&self, action: Action, kinds: &[DeviceKind]) -> bool {
        kinds
            .iter()
            .any(|kind| self.query(action, *kind, Direction::Increase).is_some())
    }

    /// All bindings currently held by the action
    pub fn bindings(&self, action: Action) -> Vec<Binding> {
        self.controls
            .get(&action)
            .map(|control| control.bindings.clone())
            .unwrap_or_default()
    }

    /// Actions owning at least one control, in id order
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.controls.keys().copied().collect();
        actions.sort();
        actions
    }

    /// Iterate over every control
    pub fn controls_mut(&mut self) -> impl Iterator<Item = (&Action, &mut Control)> {
        self.controls.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::{ControllerAxis, ControllerButton, MouseWheelClick};
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    fn key(code: KeyCode) -> PhysicalCode {
        PhysicalCode::Key(code)
    }

    #[test]
    fn test_bind_creates_control() {
        let mut table = BindingTable::new();
        assert!(!table.has_control(Action::Jump));

        table.bind(Action::Jump, Binding::increase(key(KeyCode::KeyE)));

        assert!(table.has_control(Action::Jump));
        assert_eq!(
            table.query(Action::Jump, DeviceKind::Key, Direction::Increase),
            Some(Binding::increase(key(KeyCode::KeyE)))
        );
        assert!(table.is_physical_code_bound(key(KeyCode::KeyE)));
    }

    #[test]
    fn test_bind_releases_previous_owner() {
        let mut table = BindingTable::new();
        table.bind(Action::MoveForward, Binding::increase(key(KeyCode::KeyW)));
        table.bind(Action::Jump, Binding::increase(key(KeyCode::KeyW)));

        assert_eq!(
            table.lookup(0, key(KeyCode::KeyW)),
            Some((Action::Jump, Direction::Increase))
        );
        assert!(table.bindings(Action::MoveForward).is_empty());
        // Control stays alive after losing its binding
        assert!(table.has_control(Action::MoveForward));
    }

    #[test]
    fn test_uniqueness_across_kinds() {
        let mut table = BindingTable::new();
        let codes = [
            key(KeyCode::KeyQ),
            PhysicalCode::MouseButton(MouseButton::Left),
            PhysicalCode::MouseWheel(MouseWheelClick::Up),
        ];
        for code in codes {
            table.bind(Action::Use, Binding::increase(code));
            table.bind(Action::Activate, Binding::increase(code));
            let owners: Vec<Action> = table
                .actions()
                .into_iter()
                .filter(|a| table.bindings(*a).iter().any(|b| b.code == code))
                .collect();
            assert_eq!(owners, vec![Action::Activate]);
        }
    }

    #[test]
    fn test_clear_all_bindings_of_kind() {
        let mut table = BindingTable::new();
        table.bind(Action::LookLeftRight, Binding::increase(key(KeyCode::Numpad6)));
        table.attach(Action::LookLeftRight, Binding::decrease(key(KeyCode::Numpad4)));
        table.bind(
            Action::LookLeftRight,
            Binding::increase(PhysicalCode::ControllerAxis(ControllerAxis::RightX)),
        );

        table.clear_all_bindings_of_kind(Action::LookLeftRight, DeviceKind::Key);

        assert!(table
            .query(Action::LookLeftRight, DeviceKind::Key, Direction::Increase)
            .is_none());
        assert!(table
            .query(Action::LookLeftRight, DeviceKind::Key, Direction::Decrease)
            .is_none());
        assert!(!table.is_physical_code_bound(key(KeyCode::Numpad4)));
        assert!(table
            .query(Action::LookLeftRight, DeviceKind::ControllerAxis, Direction::Increase)
            .is_some());
    }

    #[test]
    fn test_clear_family_leaves_other_family() {
        let mut table = BindingTable::new();
        table.bind(Action::Activate, Binding::increase(key(KeyCode::Space)));
        table.bind(
            Action::Activate,
            Binding::increase(PhysicalCode::ControllerButton(ControllerButton::A)),
        );

        table.clear_family(Action::Activate, DeviceFamily::Controller);

        assert_eq!(table.bindings(Action::Activate).len(), 1);
        assert!(!table.is_physical_code_bound(PhysicalCode::ControllerButton(ControllerButton::A)));
    }

    #[test]
    fn test_bind_resets_resting_value() {
        let mut table = BindingTable::new();
        table.bind(
            Action::Use,
            Binding::increase(PhysicalCode::ControllerAxis(ControllerAxis::TriggerRight)),
        );
        assert_eq!(table.control(Action::Use).unwrap().initial_value(), AXIS_REST);

        table.bind(Action::Use, Binding::increase(PhysicalCode::MouseButton(MouseButton::Left)));
        assert_eq!(table.control(Action::Use).unwrap().initial_value(), 0.0);
    }

    #[test]
    fn test_attach_keeps_resting_value() {
        let mut table = BindingTable::new();
        table.ensure_control(Action::LookUpDown, AXIS_REST);
        table.attach(Action::LookUpDown, Binding::increase(key(KeyCode::Numpad2)));
        assert_eq!(table.control(Action::LookUpDown).unwrap().initial_value(), AXIS_REST);
    }

    #[test]
    fn test_control_held_stack() {
        let mut control = Control::new(0.5);
        assert!(control.press(key(KeyCode::Numpad6), Direction::Increase));
        assert_eq!(control.value(), 1.0);
        assert!(!control.press(key(KeyCode::Numpad6), Direction::Increase));

        control.press(key(KeyCode::Numpad4), Direction::Decrease);
        assert_eq!(control.value(), 0.0);

        control.release(key(KeyCode::Numpad4));
        assert_eq!(control.value(), 1.0);

        control.release(key(KeyCode::Numpad6));
        assert_eq!(control.value(), 0.5);
    }

    #[test]
    fn test_releasing_claim_resets_held_value() {
        let mut table = BindingTable::new();
        table.bind(Action::Run, Binding::increase(key(KeyCode::ShiftLeft)));
        table
            .control_mut(Action::Run)
            .unwrap()
            .press(key(KeyCode::ShiftLeft), Direction::Increase);

        table.bind(Action::Sneak, Binding::increase(key(KeyCode::ShiftLeft)));

        assert_eq!(table.control(Action::Run).unwrap().value(), 0.0);
    }

    #[test]
    fn test_clearing_held_binding_settles_control() {
        let mut table = BindingTable::new();
        table.bind(Action::MoveForward, Binding::increase(key(KeyCode::KeyW)));
        table
            .control_mut(Action::MoveForward)
            .unwrap()
            .press(key(KeyCode::KeyW), Direction::Increase);
        assert_eq!(table.control(Action::MoveForward).unwrap().value(), 1.0);

        table.clear_family(Action::MoveForward, DeviceFamily::KeyboardMouse);

        let control = table.control(Action::MoveForward).unwrap();
        assert_eq!(control.value(), control.initial_value());

        // A later release of the old key has nothing to undo
        table
            .control_mut(Action::MoveForward)
            .unwrap()
            .release(key(KeyCode::KeyW));
        assert_eq!(table.control(Action::MoveForward).unwrap().value(), 0.0);
    }
}
