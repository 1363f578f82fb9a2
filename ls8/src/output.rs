//! # LS8 output
//! `PRN` is the only way a program talks to the outside world. Where the
//! printed values end up is up to the implementor of [`Ls8Output`]: a terminal,
//! a serial port, or a buffer inspected by tests.

pub trait Ls8Output {
    /// Receives a register value printed by `PRN`.
    fn print(&mut self, value: u8);
}

/// Discards everything.
impl Ls8Output for () {
    fn print(&mut self, _value: u8) {}
}

impl<O: Ls8Output + ?Sized> Ls8Output for &mut O {
    fn print(&mut self, value: u8) {
        (**self).print(value)
    }
}
