//! # Execution traces
//! A snapshot of the machine around its program counter, handy to follow a
//! program step by step.

use core::fmt::Display;

use crate::{
    memory::Ls8Memory,
    registers::{Ls8Registers, REGISTER_COUNT},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ls8Trace {
    pub program_counter: u16,
    /// The bytes at the program counter and the two following it. Bytes past
    /// the end of memory read as zero.
    pub bytes: [u8; 3],
    pub registers: [u8; REGISTER_COUNT],
}
impl Ls8Trace {
    pub fn capture(memory: &Ls8Memory, registers: &Ls8Registers, program_counter: u16) -> Self {
        let mut bytes = [0; 3];
        for (offset, byte) in (0..).zip(bytes.iter_mut()) {
            *byte = memory.fetch(program_counter + offset).unwrap_or(0);
        }
        Self {
            program_counter,
            bytes,
            registers: *registers.as_array(),
        }
    }
}
impl Display for Ls8Trace {
    /// Renders as `TRACE: PC | OP A B | R0 R1 R2 R3 R4 R5 R6 R7`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [instruction, a, b] = self.bytes;
        write!(
            f,
            "TRACE: {:02X} | {instruction:02X} {a:02X} {b:02X} |",
            self.program_counter
        )?;
        for register in self.registers {
            write!(f, " {register:02X}")?
        }
        Ok(())
    }
}
