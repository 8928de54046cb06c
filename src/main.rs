#![no_std]
#![no_main]
#![feature(custom_test_frameworks)]
#![test_runner(clavis::test_runner)]
#![reexport_test_harness_main = "test_main"]

use core::panic::PanicInfo;

use bootloader::{entry_point, BootInfo};
use clavis::{keyboard, print, println};

entry_point!(kernel_main);

fn kernel_main(_boot_info: &'static BootInfo) -> ! {
    clavis::init();

    #[cfg(test)]
    test_main();

    println!("clavis - type away");
    log::info!("boot complete, echoing keystrokes");

    loop {
        let keystroke = keyboard::read_key();
        match keystroke.character() {
            ch @ 0x20..=0x7E => print!("{}", ch as char),
            0x08 => print!("\x08"),
            ch => log::debug!(
                "non-printable {:#04x} from scancode {:#04x}",
                ch,
                keystroke.scancode()
            ),
        }
    }
}

/// This function is called on panic.
#[cfg(not(test))]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    println!("{}", info);
    clavis::hlt_loop();
}

#[cfg(test)]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    clavis::test_panic_handler(info)
}
