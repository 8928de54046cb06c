//! The layered keymap.
//!
//! Each key identity has up to four output characters: base, shifted,
//! symbol layer and cursor layer. A zero slot means "undefined, fall
//! through to base". Layer precedence is fixed: cursor beats symbol
//! beats shift beats base. After layer selection, a held Control folds
//! letters to their 1..26 control codes; non-letters pass through
//! unchanged.
//!
//! The layout itself is not QWERTY: the table places an ergonomic
//! letter arrangement on the QWERTY physical positions (the physical A
//! key produces 'o', and so on), with punctuation on the symbol layer
//! and navigation codes on the cursor layer.

use super::scancode::{keys, Modifiers};

// Control codes produced by the base layer.
const ESC: u8 = 0x1B;
const BKSP: u8 = 0x08;
const TAB: u8 = 0x09;

// Navigation codes produced by the cursor layer and the arrow keys.
const PAGE_UP: u8 = 0x21;
const PAGE_DOWN: u8 = 0x22;
const HOME: u8 = 0x23;
const END: u8 = 0x24;
const LEFT: u8 = 0x25;
const UP: u8 = 0x26;
const RIGHT: u8 = 0x27;
const DOWN: u8 = 0x28;
const DELETE: u8 = 0x2E;

#[derive(Clone, Copy)]
struct Entry {
    base: u8,
    shifted: u8,
    symbol: u8,
    cursor: u8,
}

const EMPTY: Entry = Entry {
    base: 0,
    shifted: 0,
    symbol: 0,
    cursor: 0,
};

const fn plain(base: u8) -> Entry {
    Entry {
        base,
        shifted: 0,
        symbol: 0,
        cursor: 0,
    }
}

const fn layered(base: u8, shifted: u8, symbol: u8, cursor: u8) -> Entry {
    Entry {
        base,
        shifted,
        symbol,
        cursor,
    }
}

static KEYMAP: [Entry; 128] = build_keymap();

const fn build_keymap() -> [Entry; 128] {
    let mut map = [EMPTY; 128];

    map[keys::ESC as usize] = plain(ESC);
    map[keys::KEY_1 as usize] = plain(b'1');
    map[keys::KEY_2 as usize] = plain(b'2');
    map[keys::KEY_3 as usize] = plain(b'3');
    map[keys::KEY_4 as usize] = plain(b'4');
    map[keys::KEY_5 as usize] = plain(b'5');
    map[keys::KEY_6 as usize] = plain(b'6');
    map[keys::KEY_7 as usize] = plain(b'7');
    map[keys::KEY_8 as usize] = plain(b'8');
    map[keys::KEY_9 as usize] = plain(b'9');
    map[keys::KEY_0 as usize] = plain(b'0');
    map[keys::BACKSPACE as usize] = plain(BKSP);
    map[keys::TAB as usize] = plain(ESC);

    map[keys::Q as usize] = layered(b'q', b'Q', b'"', PAGE_UP);
    map[keys::W as usize] = layered(b'f', b'F', b'_', BKSP);
    map[keys::E as usize] = layered(b'u', b'U', b'[', UP);
    map[keys::R as usize] = layered(b'y', b'Y', b']', DELETE);
    map[keys::T as usize] = layered(b'z', b'Z', b'^', PAGE_DOWN);
    map[keys::Y as usize] = layered(b'x', b'X', b'!', 0);
    map[keys::U as usize] = layered(b'k', b'K', b'<', b'1');
    map[keys::I as usize] = layered(b'c', b'C', b'>', b'2');
    map[keys::O as usize] = layered(b'w', b'W', b'=', b'3');
    map[keys::P as usize] = layered(b'b', b'B', b'&', 0);

    map[keys::CAPS_LOCK as usize] = plain(TAB);
    map[keys::LEFT_META as usize] = plain(TAB);

    map[keys::A as usize] = layered(b'o', b'O', b'/', HOME);
    map[keys::S as usize] = layered(b'h', b'H', b'-', LEFT);
    map[keys::D as usize] = layered(b'e', b'E', b'{', DOWN);
    map[keys::F as usize] = layered(b'a', b'A', b'}', RIGHT);
    map[keys::G as usize] = layered(b'i', b'I', b'*', END);
    map[keys::H as usize] = layered(b'd', b'D', b'?', 0);
    map[keys::J as usize] = layered(b'r', b'R', b'(', b'4');
    map[keys::K as usize] = layered(b't', b'T', b')', b'5');
    map[keys::L as usize] = layered(b'n', b'N', b'\'', b'6');
    map[keys::SEMICOLON as usize] = layered(b's', b'S', b':', 0);

    map[keys::Z as usize] = layered(b',', b',', b'#', 0);
    map[keys::X as usize] = layered(b'm', b'M', b'$', 0);
    map[keys::C as usize] = layered(b'.', b'.', b'|', 0);
    map[keys::V as usize] = layered(b'j', b'J', b'~', 0);
    map[keys::B as usize] = layered(b';', b';', b'`', 0);
    map[keys::N as usize] = layered(b'g', b'G', b'+', b'0');
    map[keys::M as usize] = layered(b'l', b'L', b'%', b'7');
    map[keys::COMMA as usize] = layered(b'p', b'P', b'\\', b'8');
    map[keys::DOT as usize] = layered(b'v', b'V', b'@', b'9');

    map[keys::SPACE as usize] = plain(b' ');
    map[keys::UP as usize] = plain(UP);
    map[keys::LEFT as usize] = plain(LEFT);
    map[keys::RIGHT as usize] = plain(RIGHT);
    map[keys::DOWN as usize] = plain(DOWN);

    map
}

/// Select the output character for a key under the given modifiers.
/// Returns 0 when the key produces nothing.
pub fn translate(key: u8, modifiers: Modifiers) -> u8 {
    let entry = KEYMAP[(key & 0x7F) as usize];
    let mut ch = entry.base;

    if modifiers.contains(Modifiers::SHIFT) && entry.shifted != 0 {
        ch = entry.shifted;
    }
    if modifiers.contains(Modifiers::SYMBOL) && entry.symbol != 0 {
        ch = entry.symbol;
    }
    if modifiers.contains(Modifiers::CURSOR) && entry.cursor != 0 {
        ch = entry.cursor;
    }
    if modifiers.contains(Modifiers::CONTROL) {
        if ch.is_ascii_lowercase() {
            ch = ch - b'a' + 1;
        } else if ch.is_ascii_uppercase() {
            ch = ch - b'A' + 1;
        }
    }

    ch
}

// ----------------------------------------------------------------------------------------
// Tests
