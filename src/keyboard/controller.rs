//! i8042 controller protocol: command/response sequencing over the two
//! fixed I/O ports, with bounded busy-waits so interrupt context never
//! stalls on a dead controller.

use core::hint;

use x86_64::instructions::port::Port;

pub const DATA_PORT: u16 = 0x60;
pub const STATUS_PORT: u16 = 0x64;

/// Status register: output buffer full (byte waiting for us).
const STATUS_OUTPUT_FULL: u8 = 1 << 0;
/// Status register: input buffer full (controller still busy with the
/// last byte we sent).
const STATUS_INPUT_FULL: u8 = 1 << 1;

/// Iteration ceiling for the status polls. Reaching it fails the wait
/// with `Timeout` instead of spinning forever.
const WAIT_CEILING: u32 = 10_000;

/// Byte-level access to the controller ports. Every call is an observable
/// hardware side effect; implementations must not cache, reorder or elide.
pub trait Bus {
    fn read(&mut self, port: u16) -> u8;
    fn write(&mut self, port: u16, value: u8);
}

/// The real port transport, backed by `in`/`out` instructions.
pub struct PortIo;

impl Bus for PortIo {
    fn read(&mut self, port: u16) -> u8 {
        let mut port = Port::<u8>::new(port);
        unsafe { port.read() }
    }

    fn write(&mut self, port: u16, value: u8) {
        let mut port = Port::<u8>::new(port);
        unsafe { port.write(value) }
    }
}

/// A controller command descriptor: opcode in the low byte, number of
/// response bytes in bits 8..12, number of parameter bytes to send in
/// bits 12..16. Same packing the i8042 drivers in SeaBIOS and Linux use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command(u16);

impl Command {
    pub const READ_CONFIG: Command = Command(0x0120);
    pub const WRITE_CONFIG: Command = Command(0x1060);
    pub const SELF_TEST: Command = Command(0x01AA);
    pub const DISABLE_KEYBOARD: Command = Command(0x00AD);
    pub const ENABLE_KEYBOARD: Command = Command(0x00AE);

    const fn opcode(self) -> u8 {
        self.0 as u8
    }

    const fn send_count(self) -> usize {
        (self.0 >> 12 & 0xF) as usize
    }

    const fn receive_count(self) -> usize {
        (self.0 >> 8 & 0xF) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// A status poll hit its iteration ceiling. The in-flight command is
    /// abandoned; the controller recovers on the next keystroke.
    Timeout,
}

pub struct Controller<B: Bus> {
    bus: B,
}

impl<B: Bus> Controller<B> {
    pub const fn new(bus: B) -> Controller<B> {
        Controller { bus }
    }

    pub fn status(&mut self) -> u8 {
        self.bus.read(STATUS_PORT)
    }

    /// Read the data port without waiting. Only valid when the output
    /// buffer is known to be full, e.g. inside the keyboard interrupt.
    pub fn read_data(&mut self) -> u8 {
        self.bus.read(DATA_PORT)
    }

    fn wait_for_input_ready(&mut self) -> Result<(), ControllerError> {
        for _ in 0..WAIT_CEILING {
            if self.status() & STATUS_INPUT_FULL == 0 {
                return Ok(());
            }
            hint::spin_loop();
        }
        Err(ControllerError::Timeout)
    }

    fn wait_for_output_ready(&mut self) -> Result<(), ControllerError> {
        for _ in 0..WAIT_CEILING {
            if self.status() & STATUS_OUTPUT_FULL != 0 {
                return Ok(());
            }
            hint::spin_loop();
        }
        Err(ControllerError::Timeout)
    }

    /// Run one controller command to completion. `params` carries the
    /// bytes to send and receives the response bytes, per the counts in
    /// the descriptor. A timeout at any step fails the command as a
    /// whole and clears `params`, so partially received bytes cannot be
    /// mistaken for a response.
    pub fn execute(&mut self, command: Command, params: &mut [u8]) -> Result<(), ControllerError> {
        let result = self.execute_inner(command, params);
        if result.is_err() {
            params.fill(0);
        }
        result
    }

    fn execute_inner(
        &mut self,
        command: Command,
        params: &mut [u8],
    ) -> Result<(), ControllerError> {
        self.wait_for_input_ready()?;
        self.bus.write(STATUS_PORT, command.opcode());

        for i in 0..command.send_count() {
            self.wait_for_input_ready()?;
            self.bus.write(DATA_PORT, params[i]);
        }

        for i in 0..command.receive_count() {
            self.wait_for_output_ready()?;
            params[i] = self.bus.read(DATA_PORT);
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------------------
// Tests
