//! Setting up and responding to user defined key bindings
use std::collections::HashMap;

// Keysym values for the keys used in the default bindings, as defined by
// X11/keysymdef.h.
pub(crate) const XK_TAB: u32 = 0xff09;
pub(crate) const XK_RETURN: u32 = 0xff0d;
pub(crate) const XK_SPACE: u32 = 0x0020;
pub(crate) const XK_H: u32 = 0x0068;
pub(crate) const XK_L: u32 = 0x006c;
pub(crate) const XK_Q: u32 = 0x0071;

/// The actions that can be bound to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Rotate the master to the back of the stack and focus the new master.
    CycleFocus,
    /// Move the focused client to the master position.
    PromoteFocused,
    /// Shrink the master region of the main and stack layout.
    ShrinkMain,
    /// Grow the master region of the main and stack layout.
    ExpandMain,
    /// Flip between the grid and main and stack layouts.
    ToggleLayout,
    /// Ask the focused client to close itself.
    CloseFocused,
    /// Forcibly kill the focused client's X connection.
    ForceKillFocused,
    /// Launch a terminal emulator.
    SpawnTerminal,
}

/// Known modifier keys for bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    /// Control
    Ctrl,
    /// Alt
    Alt,
    /// Shift
    Shift,
    /// Meta / super / windows
    Meta,
}

impl From<ModifierKey> for u16 {
    fn from(m: ModifierKey) -> u16 {
        match m {
            ModifierKey::Shift => 1 << 0,
            ModifierKey::Ctrl => 1 << 2,
            ModifierKey::Alt => 1 << 3,
            ModifierKey::Meta => 1 << 6,
        }
    }
}

/// A key press as reported by the X server: held modifier mask + keycode.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyCode {
    /// The held modifier mask
    pub mask: u16,
    /// The key code that was pressed
    pub code: u8,
}

impl KeyCode {
    /// Create a new KeyCode from an existing one, removing the given
    /// modifier mask.
    pub fn ignoring_modifier(&self, mask: u16) -> KeyCode {
        KeyCode {
            mask: self.mask & !mask,
            code: self.code,
        }
    }
}

/// A binding from a (modifier mask, keysym) pair to a [KeyAction].
///
/// Bindings are expressed in terms of keysyms so they are independent of
/// the user's keyboard mapping; the backend resolves each one to a concrete
/// [KeyCode] when grabbing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// The modifier mask that must be held
    pub modifiers: u16,
    /// The target keysym
    pub keysym: u32,
    /// The action to run when the binding fires
    pub action: KeyAction,
}

/// Key bindings after resolution against the server's keyboard mapping.
pub type KeyBindings = HashMap<KeyCode, KeyAction>;

/// The built in key binding table, parameterised by the main modifier key.
pub fn default_bindings(modifier: ModifierKey) -> Vec<KeyBinding> {
    let m = u16::from(modifier);
    let ms = m | u16::from(ModifierKey::Shift);
    let mcs = ms | u16::from(ModifierKey::Ctrl);

    let bind = |modifiers, keysym, action| KeyBinding {
        modifiers,
        keysym,
        action,
    };

    vec![
        bind(m, XK_TAB, KeyAction::CycleFocus),
        bind(m, XK_RETURN, KeyAction::PromoteFocused),
        bind(m, XK_H, KeyAction::ShrinkMain),
        bind(m, XK_L, KeyAction::ExpandMain),
        bind(m, XK_SPACE, KeyAction::ToggleLayout),
        bind(ms, XK_Q, KeyAction::CloseFocused),
        bind(mcs, XK_Q, KeyAction::ForceKillFocused),
        bind(ms, XK_RETURN, KeyAction::SpawnTerminal),
    ]
}
