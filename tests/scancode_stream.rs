#![no_std]
#![no_main]
#![feature(custom_test_frameworks)]
#![test_runner(clavis::test_runner)]
#![reexport_test_harness_main = "test_main"]

use core::panic::PanicInfo;

use bootloader::{entry_point, BootInfo};
use clavis::keyboard::{self, scancode::keys, scancode::RELEASE_BIT};

entry_point!(main);

fn main(_boot_info: &'static BootInfo) -> ! {
    // Scancodes are injected directly; no IDT or controller setup needed.
    test_main();
    clavis::hlt_loop();
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    clavis::test_panic_handler(info)
}

#[test_case]
fn plain_keypress_publishes_base_character() {
    keyboard::handle_scancode(keys::A);
    let keystroke = keyboard::try_read_key().expect("keystroke pending");
    assert_eq!(keystroke.scancode(), keys::A);
    assert_eq!(keystroke.character(), b'o');
    assert_eq!(keystroke.as_u16(), (keys::A as u16) << 8 | b'o' as u16);

    // consuming empties the cell, and the release publishes nothing
    assert!(keyboard::try_read_key().is_none());
    keyboard::handle_scancode(keys::A | RELEASE_BIT);
    assert!(keyboard::try_read_key().is_none());
}

#[test_case]
fn shift_then_key_publishes_shifted_character() {
    keyboard::handle_scancode(keys::LEFT_SHIFT);
    assert!(keyboard::try_read_key().is_none());

    keyboard::handle_scancode(keys::A);
    let keystroke = keyboard::try_read_key().expect("keystroke pending");
    assert_eq!(keystroke.character(), b'O');

    keyboard::handle_scancode(keys::A | RELEASE_BIT);
    keyboard::handle_scancode(keys::LEFT_SHIFT | RELEASE_BIT);

    // shift released: back to the base layer
    keyboard::handle_scancode(keys::A);
    assert_eq!(keyboard::try_read_key().unwrap().character(), b'o');
    keyboard::handle_scancode(keys::A | RELEASE_BIT);
}

#[test_case]
fn control_folds_the_base_letter() {
    keyboard::handle_scancode(keys::LEFT_CTRL);
    keyboard::handle_scancode(keys::A); // base 'o'
    let keystroke = keyboard::try_read_key().expect("keystroke pending");
    assert_eq!(keystroke.character(), 0x0F);

    keyboard::handle_scancode(keys::A | RELEASE_BIT);
    keyboard::handle_scancode(keys::LEFT_CTRL | RELEASE_BIT);
}

#[test_case]
fn cursor_layer_wins_over_shift() {
    keyboard::handle_scancode(keys::LEFT_SHIFT);
    keyboard::handle_scancode(keys::SLASH); // cursor layer modifier
    keyboard::handle_scancode(keys::A);
    let keystroke = keyboard::try_read_key().expect("keystroke pending");
    assert_eq!(keystroke.character(), 0x23); // HOME

    keyboard::handle_scancode(keys::A | RELEASE_BIT);
    keyboard::handle_scancode(keys::SLASH | RELEASE_BIT);
    keyboard::handle_scancode(keys::LEFT_SHIFT | RELEASE_BIT);
}

#[test_case]
fn newer_keypress_overwrites_unconsumed_one() {
    keyboard::handle_scancode(keys::A); // 'o', never consumed
    keyboard::handle_scancode(keys::A | RELEASE_BIT);
    keyboard::handle_scancode(keys::S); // 'h' replaces it

    let keystroke = keyboard::try_read_key().expect("keystroke pending");
    assert_eq!(keystroke.scancode(), keys::S);
    assert_eq!(keystroke.character(), b'h');
    assert!(keyboard::try_read_key().is_none());

    keyboard::handle_scancode(keys::S | RELEASE_BIT);
}

#[test_case]
fn undefined_key_publishes_nothing() {
    keyboard::handle_scancode(0x57); // F11: not in the keymap
    assert!(keyboard::try_read_key().is_none());
    keyboard::handle_scancode(0x57 | RELEASE_BIT);
}
