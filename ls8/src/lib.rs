//! # LS8: a tiny 8-bit register machine
//! An implementation of the LS8 computer: 256 bytes of memory, eight general
//! purpose registers (the last one doubling as the stack pointer), a flag
//! register written by `CMP` and a handful of instructions.
//!
//! The crate does not rely on `std`. Output produced by `PRN` goes through
//! the [`Ls8Output`] trait so the machine can be embedded anywhere, and every
//! failure is reported as an [`Ls8Fault`] instead of a panic.
//!
//! ```rust
//! # use ls8::{Ls8Machine, Opcode};
//! let mut machine = Ls8Machine::new(());
//! machine
//!     .load(&[0b10000010, 0, 8, 0b00000001]) // LDI R0,8; HLT
//!     .unwrap();
//! machine.run().unwrap();
//! assert_eq!(machine.register(0), Ok(8));
//! assert!(machine.is_halted());
//! ```

#![cfg_attr(not(test), no_std)]

pub mod alu;
pub mod fault;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod output;
pub mod registers;
pub mod trace;

pub use alu::AluOp;
pub use fault::{AddressingFault, Ls8Fault};
pub use machine::{Ls8Machine, Ls8Steps};
pub use memory::Ls8Memory;
pub use opcode::Opcode;
pub use output::Ls8Output;
pub use registers::{Flags, Ls8Registers};
pub use trace::Ls8Trace;
