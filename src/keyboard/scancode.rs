//! Scan-set-1 decoding and modifier tracking.
//!
//! A scancode byte carries the key identity in the low seven bits and the
//! press/release state in bit 7. Modifier keys arrive as ordinary
//! press/release events with no context, so the held-modifier set has to
//! be tracked statefully across scancodes.

/// Scan-set-1 key identities the driver cares about.
pub mod keys {
    pub const ESC: u8 = 0x01;
    pub const KEY_1: u8 = 0x02;
    pub const KEY_2: u8 = 0x03;
    pub const KEY_3: u8 = 0x04;
    pub const KEY_4: u8 = 0x05;
    pub const KEY_5: u8 = 0x06;
    pub const KEY_6: u8 = 0x07;
    pub const KEY_7: u8 = 0x08;
    pub const KEY_8: u8 = 0x09;
    pub const KEY_9: u8 = 0x0A;
    pub const KEY_0: u8 = 0x0B;
    pub const BACKSPACE: u8 = 0x0E;
    pub const TAB: u8 = 0x0F;
    pub const Q: u8 = 0x10;
    pub const W: u8 = 0x11;
    pub const E: u8 = 0x12;
    pub const R: u8 = 0x13;
    pub const T: u8 = 0x14;
    pub const Y: u8 = 0x15;
    pub const U: u8 = 0x16;
    pub const I: u8 = 0x17;
    pub const O: u8 = 0x18;
    pub const P: u8 = 0x19;
    pub const LEFT_CTRL: u8 = 0x1D;
    pub const A: u8 = 0x1E;
    pub const S: u8 = 0x1F;
    pub const D: u8 = 0x20;
    pub const F: u8 = 0x21;
    pub const G: u8 = 0x22;
    pub const H: u8 = 0x23;
    pub const J: u8 = 0x24;
    pub const K: u8 = 0x25;
    pub const L: u8 = 0x26;
    pub const SEMICOLON: u8 = 0x27;
    pub const APOSTROPHE: u8 = 0x28;
    pub const LEFT_SHIFT: u8 = 0x2A;
    pub const Z: u8 = 0x2C;
    pub const X: u8 = 0x2D;
    pub const C: u8 = 0x2E;
    pub const V: u8 = 0x2F;
    pub const B: u8 = 0x30;
    pub const N: u8 = 0x31;
    pub const M: u8 = 0x32;
    pub const COMMA: u8 = 0x33;
    pub const DOT: u8 = 0x34;
    pub const SLASH: u8 = 0x35;
    pub const RIGHT_SHIFT: u8 = 0x36;
    pub const LEFT_ALT: u8 = 0x38;
    pub const SPACE: u8 = 0x39;
    pub const CAPS_LOCK: u8 = 0x3A;
    pub const UP: u8 = 0x48;
    pub const LEFT: u8 = 0x4B;
    pub const RIGHT: u8 = 0x4D;
    pub const DOWN: u8 = 0x50;
    pub const DELETE: u8 = 0x53;
    pub const LEFT_META: u8 = 0x5B;
}

/// Bit 7 of a raw scancode: set on key release.
pub const RELEASE_BIT: u8 = 0x80;

/// Split a raw scancode into (key identity, released).
pub fn decode(raw: u8) -> (u8, bool) {
    (raw & 0x7F, raw & RELEASE_BIT != 0)
}

/// The set of currently held modifiers.
///
/// Shift and the two custom layer modifiers select a keymap layer;
/// Control folds letters to control codes; Alt only participates in the
/// Ctrl+Alt+Del check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers(1 << 0);
    pub const SYMBOL: Modifiers = Modifiers(1 << 1);
    pub const CURSOR: Modifiers = Modifiers(1 << 2);
    pub const CONTROL: Modifiers = Modifiers(1 << 3);
    pub const ALT: Modifiers = Modifiers(1 << 4);

    pub const fn empty() -> Modifiers {
        Modifiers(0)
    }

    pub const fn contains(self, flag: Modifiers) -> bool {
        self.0 & flag.0 != 0
    }

    /// Track one key event. Returns true when the key is one of the five
    /// modifier keys and has been consumed: the flag is set on press and
    /// cleared on release, and no character must be produced for it.
    pub fn update(&mut self, key: u8, released: bool) -> bool {
        match Modifiers::flag_for(key) {
            Some(flag) => {
                if released {
                    self.0 &= !flag.0;
                } else {
                    self.0 |= flag.0;
                }
                true
            }
            None => false,
        }
    }

    fn flag_for(key: u8) -> Option<Modifiers> {
        match key {
            keys::LEFT_SHIFT | keys::RIGHT_SHIFT => Some(Modifiers::SHIFT),
            keys::APOSTROPHE => Some(Modifiers::SYMBOL),
            keys::SLASH => Some(Modifiers::CURSOR),
            keys::LEFT_CTRL => Some(Modifiers::CONTROL),
            keys::LEFT_ALT => Some(Modifiers::ALT),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn decode_splits_identity_and_release() {
        assert_eq!(decode(keys::A), (keys::A, false));
        assert_eq!(decode(keys::A | RELEASE_BIT), (keys::A, true));
        assert_eq!(decode(0xFF), (0x7F, true));
    }

    #[test_case]
    fn both_shift_keys_map_to_the_same_flag() {
        let mut modifiers = Modifiers::empty();
        assert!(modifiers.update(keys::LEFT_SHIFT, false));
        assert!(modifiers.contains(Modifiers::SHIFT));
        assert!(modifiers.update(keys::LEFT_SHIFT, true));
        assert!(!modifiers.contains(Modifiers::SHIFT));

        assert!(modifiers.update(keys::RIGHT_SHIFT, false));
        assert!(modifiers.contains(Modifiers::SHIFT));
    }

    #[test_case]
    fn repeated_press_is_idempotent() {
        let mut modifiers = Modifiers::empty();
        modifiers.update(keys::LEFT_CTRL, false);
        let after_first = modifiers;
        modifiers.update(keys::LEFT_CTRL, false);
        assert_eq!(modifiers, after_first);

        modifiers.update(keys::LEFT_CTRL, true);
        let after_release = modifiers;
        modifiers.update(keys::LEFT_CTRL, true);
        assert_eq!(modifiers, after_release);
        assert_eq!(modifiers, Modifiers::empty());
    }

    #[test_case]
    fn non_modifier_keys_are_not_consumed() {
        let mut modifiers = Modifiers::empty();
        assert!(!modifiers.update(keys::A, false));
        assert_eq!(modifiers, Modifiers::empty());
    }

    #[test_case]
    fn layer_keys_set_their_own_flags() {
        let mut modifiers = Modifiers::empty();
        modifiers.update(keys::APOSTROPHE, false);
        modifiers.update(keys::SLASH, false);
        assert!(modifiers.contains(Modifiers::SYMBOL));
        assert!(modifiers.contains(Modifiers::CURSOR));
        assert!(!modifiers.contains(Modifiers::SHIFT));
    }
}
