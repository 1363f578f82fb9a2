//! # LS8 faults
//! Every error the machine can run into is fatal: it halts the machine and is
//! handed back to the caller, the way a real CPU would trap.

use thiserror::Error;

use crate::opcode::Opcode;

/// An index or address that fell outside of what the machine can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum AddressingFault {
    /// Operand bytes index registers directly, so anything above `R7` traps.
    #[error("register index {0} is out of range (R0-R7)")]
    Register(u8),
    /// The program counter, or one of the operand bytes it points at, ran past
    /// the end of memory.
    #[error("address 0x{0:03x} is past the end of memory")]
    ProgramCounter(u16),
    #[error("stack overflow: stack pointer cannot go below 0x00")]
    StackOverflow,
    #[error("stack underflow: stack pointer cannot go above 0xff")]
    StackUnderflow,
    #[error("program of {len} bytes does not fit in 256 bytes of memory")]
    ProgramTooLarge { len: usize },
}

/// A fatal condition that stopped the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Ls8Fault {
    #[error("illegal instruction 0x{opcode:02x} at 0x{pc:02x}")]
    IllegalInstruction { opcode: u8, pc: u16 },
    #[error("addressing fault: {0}")]
    Addressing(#[from] AddressingFault),
    /// Raised when an opcode that is not an arithmetic one reaches the ALU.
    #[error("unsupported ALU operation {0}")]
    UnsupportedAluOperation(Opcode),
    #[error("the machine is halted")]
    Halted,
}
