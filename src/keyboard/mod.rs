//! PS/2 keyboard driver.
//!
//! Data flows one way: the IRQ1 handler drains a scancode from the
//! controller, runs it through decode and translate, and republishes the
//! single pending-keystroke cell. `read_key` halts the CPU until the cell
//! is nonempty, then consumes it. The cell holds at most one keystroke;
//! a newer keypress overwrites an unconsumed older one.

pub mod controller;
pub mod keymap;
pub mod scancode;

use core::sync::atomic::{AtomicU16, Ordering};

use lazy_static::lazy_static;
use spin::Mutex;
use x86_64::instructions::interrupts;

use self::controller::{Command, Controller, PortIo};
use self::scancode::{keys, Modifiers};

/// One resolved keypress: originating scancode in the high byte,
/// translated character in the low byte. The all-zero pattern is
/// reserved for "empty" and never reaches a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke(u16);

impl Keystroke {
    fn new(scancode: u8, character: u8) -> Keystroke {
        Keystroke((scancode as u16) << 8 | character as u16)
    }

    pub fn scancode(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn character(self) -> u8 {
        self.0 as u8
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

/// Single-slot handoff between interrupt context and `read_key`.
/// Written wholly by the interrupt side, swapped out wholly by the
/// reader, so one atomic cell is all the synchronization needed.
static PENDING: AtomicU16 = AtomicU16::new(0);

struct Driver {
    controller: Controller<PortIo>,
    modifiers: Modifiers,
}

lazy_static! {
    static ref DRIVER: Mutex<Driver> = Mutex::new(Driver {
        controller: Controller::new(PortIo),
        modifiers: Modifiers::empty(),
    });
}

/// Flush stale controller output and enable keyboard scanning. Must run
/// before IRQ1 is unmasked.
pub fn init() {
    interrupts::without_interrupts(|| {
        let mut driver = DRIVER.lock();
        // Whatever byte is sitting in the output buffer from boot is stale.
        let _ = driver.controller.read_data();
        match driver.controller.execute(Command::ENABLE_KEYBOARD, &mut []) {
            Ok(()) => log::info!("keyboard: scanning enabled"),
            Err(err) => {
                // Non-fatal: the interrupt handler re-issues the enable
                // on every keystroke.
                log::warn!("keyboard: enable command failed: {:?}", err);
            }
        }
    });
}

/// Interrupt-context half of the driver, called from the IRQ1 handler
/// with interrupts disabled. Never blocks: all controller waits are
/// bounded, and a timeout abandons the command.
pub(crate) fn handle_interrupt() {
    let mut driver = DRIVER.lock();

    // Status is read and discarded before the scancode, as the BIOS does.
    let _ = driver.controller.status();
    let raw = driver.controller.read_data();

    if let Some(keystroke) = process(&mut driver.modifiers, raw) {
        publish(keystroke);
    }

    // Best effort; on timeout the next interrupt retries.
    let _ = driver.controller.execute(Command::ENABLE_KEYBOARD, &mut []);
}

/// Feed one raw scancode through the decode/translate pipeline exactly
/// as the interrupt handler does, without touching the controller.
/// Useful for injecting input when no hardware is attached.
pub fn handle_scancode(raw: u8) {
    interrupts::without_interrupts(|| {
        let mut driver = DRIVER.lock();
        if let Some(keystroke) = process(&mut driver.modifiers, raw) {
            publish(keystroke);
        }
    });
}

fn publish(keystroke: Keystroke) {
    // Last key wins: an unconsumed older keystroke is overwritten.
    PENDING.store(keystroke.as_u16(), Ordering::SeqCst);
}

fn process(modifiers: &mut Modifiers, raw: u8) -> Option<Keystroke> {
    let (key, released) = scancode::decode(raw);

    if modifiers.update(key, released) {
        // A bare modifier press or release produces no character.
        return None;
    }
    if released {
        return None;
    }

    if modifiers.contains(Modifiers::CONTROL)
        && modifiers.contains(Modifiers::ALT)
        && key == keys::DELETE
    {
        log::warn!("keyboard: ctrl+alt+del pressed, reboot not wired up");
        return None;
    }

    let character = keymap::translate(key, *modifiers);
    if character == 0 {
        return None;
    }

    Some(Keystroke::new(key, character))
}

/// Take the pending keystroke if one is waiting.
pub fn try_read_key() -> Option<Keystroke> {
    match PENDING.swap(0, Ordering::SeqCst) {
        0 => None,
        value => Some(Keystroke(value)),
    }
}

/// Block until a key is pressed and return it. This is the only blocking
/// point in the driver; it idles the CPU between interrupts and blocks
/// for as long as no key arrives.
pub fn read_key() -> Keystroke {
    loop {
        interrupts::disable();
        if let Some(keystroke) = try_read_key() {
            interrupts::enable();
            return keystroke;
        }
        // Enable and halt as one pair: a keypress landing between the
        // check above and the hlt still wakes the CPU.
        interrupts::enable_and_hlt();
    }
}

// ----------------------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn keystroke_packs_scancode_high_character_low() {
        let keystroke = Keystroke::new(keys::A, b'o');
        assert_eq!(keystroke.as_u16(), 0x1E6F);
        assert_eq!(keystroke.scancode(), keys::A);
        assert_eq!(keystroke.character(), b'o');
    }

    #[test_case]
    fn modifier_press_is_consumed_and_applies_to_next_key() {
        let mut modifiers = Modifiers::empty();
        assert_eq!(process(&mut modifiers, keys::LEFT_SHIFT), None);
        let keystroke = process(&mut modifiers, keys::A).unwrap();
        assert_eq!(keystroke.character(), b'O');
        assert_eq!(process(&mut modifiers, keys::LEFT_SHIFT | scancode::RELEASE_BIT), None);
        let keystroke = process(&mut modifiers, keys::A).unwrap();
        assert_eq!(keystroke.character(), b'o');
    }

    #[test_case]
    fn releases_produce_nothing() {
        let mut modifiers = Modifiers::empty();
        assert_eq!(process(&mut modifiers, keys::A | scancode::RELEASE_BIT), None);
    }

    #[test_case]
    fn undefined_keys_produce_nothing() {
        let mut modifiers = Modifiers::empty();
        assert_eq!(process(&mut modifiers, 0x57), None);
    }

    #[test_case]
    fn ctrl_alt_del_is_intercepted() {
        let mut modifiers = Modifiers::empty();
        process(&mut modifiers, keys::LEFT_CTRL);
        process(&mut modifiers, keys::LEFT_ALT);
        assert_eq!(process(&mut modifiers, keys::DELETE), None);
        // Delete alone is not mapped either way, but ctrl+alt must not
        // leak a folded character once a mapping exists.
        process(&mut modifiers, keys::LEFT_ALT | scancode::RELEASE_BIT);
        process(&mut modifiers, keys::LEFT_CTRL | scancode::RELEASE_BIT);
    }

    #[test_case]
    fn pending_cell_is_overwritten_by_newer_keystroke() {
        publish(Keystroke::new(keys::A, b'o'));
        publish(Keystroke::new(keys::S, b'h'));
        let keystroke = try_read_key().unwrap();
        assert_eq!(keystroke.scancode(), keys::S);
        assert_eq!(keystroke.character(), b'h');
        assert_eq!(try_read_key(), None);
    }
}
