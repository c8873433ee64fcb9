// Game action definitions, labels and remapping-menu orderings

use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr, IntoEnumIterator};

/// Represents all logical in-game actions.
///
/// The discriminant is the action's stable id. Do not reorder variants: the
/// id and the name are both used to key persisted bindings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
)]
#[repr(u16)]
pub enum Action {
    // Menus and system
    GameMenu,
    Screenshot,
    Inventory,
    Console,

    // Movement
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBackward,

    // Interaction
    Activate,
    Use,
    Jump,
    AutoMove,
    Rest,
    Journal,
    Run,
    CycleSpellLeft,
    CycleSpellRight,
    CycleWeaponLeft,
    CycleWeaponRight,
    AlwaysRun,
    Sneak,
    QuickSave,
    QuickLoad,
    ToggleWeapon,
    ToggleSpell,
    TogglePOV,

    // Quick keys
    QuickKey1,
    QuickKey2,
    QuickKey3,
    QuickKey4,
    QuickKey5,
    QuickKey6,
    QuickKey7,
    QuickKey8,
    QuickKey9,
    QuickKey10,
    QuickKeysMenu,

    // Display
    ToggleHUD,
    ToggleDebug,

    // Analog axes
    LookUpDown,
    LookLeftRight,
    MoveForwardBackward,
    MoveLeftRight,

    // Camera zoom (mouse wheel)
    ZoomIn,
    ZoomOut,
}

/// Channels frozen while player control is disabled (cutscenes, menus)
pub const PLAYER_CHANNELS: [Action; 17] = [
    Action::AutoMove,
    Action::AlwaysRun,
    Action::ToggleWeapon,
    Action::ToggleSpell,
    Action::Rest,
    Action::QuickKey1,
    Action::QuickKey2,
    Action::QuickKey3,
    Action::QuickKey4,
    Action::QuickKey5,
    Action::QuickKey6,
    Action::QuickKey7,
    Action::QuickKey8,
    Action::QuickKey9,
    Action::QuickKey10,
    Action::Use,
    Action::Journal,
];

/// Actions still dispatched while a drag-and-drop is in progress
pub const DRAG_DROP_EXEMPT: [Action; 2] = [Action::GameMenu, Action::Inventory];

impl Action {
    /// Stable numeric id of this action
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Index into per-action tables (0..Action::COUNT)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up an action by its numeric id
    pub fn from_id(id: u16) -> Option<Self> {
        Self::iter().nth(id as usize)
    }

    /// Stable name used in persisted bindings
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// All actions in id order
    pub fn all() -> impl Iterator<Item = Action> {
        Self::iter()
    }

    /// The two analog look axes hold a keypad increase/decrease pair
    /// in addition to their controller axis.
    pub fn is_look_axis(self) -> bool {
        matches!(self, Action::LookUpDown | Action::LookLeftRight)
    }

    /// Exempt from drag-and-drop suppression
    pub fn survives_drag_drop(self) -> bool {
        DRAG_DROP_EXEMPT.contains(&self)
    }

    /// Label for the remapping menu.
    ///
    /// Returns a localisation tag such as `#{sUse}`, plain text for the few
    /// actions without a localised label, or an empty string when the action
    /// is not user-configurable.
    pub fn description(self) -> String {
        match self {
            Action::Screenshot => return "Screenshot".to_string(),
            Action::ZoomIn => return "Zoom In".to_string(),
            Action::ZoomOut => return "Zoom Out".to_string(),
            Action::ToggleHUD => return "Toggle HUD".to_string(),
            _ => {}
        }

        match self.label_key() {
            Some(key) => format!("#{{{}}}", key),
            None => String::new(),
        }
    }

    fn label_key(self) -> Option<&'static str> {
        let key = match self {
            Action::Use => "sUse",
            Action::Activate => "sActivate",
            Action::MoveBackward => "sBack",
            Action::MoveForward => "sForward",
            Action::MoveLeft => "sLeft",
            Action::MoveRight => "sRight",
            Action::ToggleWeapon => "sReady_Weapon",
            Action::ToggleSpell => "sReady_Magic",
            Action::CycleSpellLeft => "sPrevSpell",
            Action::CycleSpellRight => "sNextSpell",
            Action::CycleWeaponLeft => "sPrevWeapon",
            Action::CycleWeaponRight => "sNextWeapon",
            Action::Console => "sConsoleTitle",
            Action::Run => "sRun",
            Action::Sneak => "sCrouch_Sneak",
            Action::AutoMove => "sAuto_Run",
            Action::Jump => "sJump",
            Action::Journal => "sJournal",
            Action::Rest => "sRestKey",
            Action::Inventory => "sInventory",
            Action::TogglePOV => "sTogglePOVCmd",
            Action::QuickKeysMenu => "sQuickMenu",
            Action::QuickKey1 => "sQuick1Cmd",
            Action::QuickKey2 => "sQuick2Cmd",
            Action::QuickKey3 => "sQuick3Cmd",
            Action::QuickKey4 => "sQuick4Cmd",
            Action::QuickKey5 => "sQuick5Cmd",
            Action::QuickKey6 => "sQuick6Cmd",
            Action::QuickKey7 => "sQuick7Cmd",
            Action::QuickKey8 => "sQuick8Cmd",
            Action::QuickKey9 => "sQuick9Cmd",
            Action::QuickKey10 => "sQuick10Cmd",
            Action::AlwaysRun => "sAlways_Run",
            Action::QuickSave => "sQuickSaveCmd",
            Action::QuickLoad => "sQuickLoadCmd",
            _ => return None,
        };
        Some(key)
    }
}

/// Order of the keyboard/mouse remapping menu
pub fn key_sorting() -> Vec<Action> {
    use Action::*;
    vec![
        MoveForward,
        MoveBackward,
        MoveLeft,
        MoveRight,
        TogglePOV,
        ZoomIn,
        ZoomOut,
        Run,
        AlwaysRun,
        Sneak,
        Activate,
        Use,
        ToggleWeapon,
        ToggleSpell,
        CycleSpellLeft,
        CycleSpellRight,
        CycleWeaponLeft,
        CycleWeaponRight,
        AutoMove,
        Jump,
        Inventory,
        Journal,
        Rest,
        Console,
        QuickSave,
        QuickLoad,
        ToggleHUD,
        Screenshot,
        QuickKeysMenu,
        QuickKey1,
        QuickKey2,
        QuickKey3,
        QuickKey4,
        QuickKey5,
        QuickKey6,
        QuickKey7,
        QuickKey8,
        QuickKey9,
        QuickKey10,
    ]
}

/// Order of the controller remapping menu
pub fn controller_sorting() -> Vec<Action> {
    use Action::*;
    vec![
        TogglePOV,
        ZoomIn,
        ZoomOut,
        Sneak,
        Activate,
        Use,
        ToggleWeapon,
        ToggleSpell,
        AutoMove,
        Jump,
        Inventory,
        Journal,
        Rest,
        QuickSave,
        QuickLoad,
        ToggleHUD,
        Screenshot,
        QuickKeysMenu,
        QuickKey1,
        QuickKey2,
        QuickKey3,
        QuickKey4,
        QuickKey5,
        QuickKey6,
        QuickKey7,
        QuickKey8,
        QuickKey9,
        QuickKey10,
        CycleSpellLeft,
        CycleSpellRight,
        CycleWeaponLeft,
        CycleWeaponRight,
    ]
}
