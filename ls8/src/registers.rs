//! # LS8 registers
//! Eight general purpose byte registers, `R0` to `R7`, and the flag register.
//!
//! `R7` is reserved as the stack pointer. The stack lives in memory and grows
//! downwards from `0xf4`, just below the top of memory.

use core::{
    fmt::{Debug, Display},
    ops::Index,
};

use crate::fault::AddressingFault;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// Index of the stack pointer register.
pub const SP: u8 = 7;
/// Initial value of the stack pointer.
pub const STACK_START: u8 = 0xf4;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Ls8Registers {
    data: [u8; REGISTER_COUNT],
}
impl Default for Ls8Registers {
    /// Returns zeroed registers with the stack pointer at its starting point.
    /// Same as [`Ls8Registers::new`].
    fn default() -> Self {
        Self::new()
    }
}
impl Ls8Registers {
    /// # Example
    /// ```rust
    /// # use ls8::Ls8Registers;
    /// let registers = Ls8Registers::new();
    /// assert_eq!(registers.stack_pointer(), 0xf4);
    /// assert!(registers.iter().take(7).all(|&r| r == 0));
    /// ```
    pub const fn new() -> Self {
        Self {
            data: [0, 0, 0, 0, 0, 0, 0, STACK_START],
        }
    }

    /// Returns the value of a register.
    ///
    /// Operands are used as register indices as-is, so anything above `7`
    /// is an [`AddressingFault::Register`].
    /// # Example
    /// ```rust
    /// # use ls8::{Ls8Registers, AddressingFault};
    /// let registers = Ls8Registers::new();
    /// assert_eq!(registers.get(7), Ok(0xf4));
    /// assert_eq!(registers.get(8), Err(AddressingFault::Register(8)));
    /// ```
    pub fn get(&self, index: u8) -> Result<u8, AddressingFault> {
        self.data
            .get(index as usize)
            .copied()
            .ok_or(AddressingFault::Register(index))
    }

    /// Returns a mutable reference to a register.
    pub fn get_mut(&mut self, index: u8) -> Result<&mut u8, AddressingFault> {
        self.data
            .get_mut(index as usize)
            .ok_or(AddressingFault::Register(index))
    }

    pub fn set(&mut self, index: u8, value: u8) -> Result<(), AddressingFault> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn stack_pointer(&self) -> u8 {
        self.data[SP as usize]
    }
    pub fn set_stack_pointer(&mut self, value: u8) {
        self.data[SP as usize] = value
    }

    /// Iterates over the registers from `R0` to `R7`.
    pub fn iter(&self) -> core::slice::Iter<'_, u8> {
        self.data.iter()
    }

    pub fn as_array(&self) -> &[u8; REGISTER_COUNT] {
        &self.data
    }
}
impl Index<u8> for Ls8Registers {
    type Output = u8;

    /// Panics on an out of range register, use [`Ls8Registers::get`] when the
    /// index comes from a program.
    fn index(&self, index: u8) -> &Self::Output {
        &self.data[index as usize]
    }
}
impl PartialEq<[u8; REGISTER_COUNT]> for Ls8Registers {
    fn eq(&self, other: &[u8; REGISTER_COUNT]) -> bool {
        &self.data == other
    }
}
impl Display for Ls8Registers {
    /// Prints every register as two hexadecimal digits.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, r) in self.data.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?
            }
            write!(f, "{r:02X}")?
        }
        Ok(())
    }
}

/// The flag register, holding the outcome of the last `CMP`.
///
/// Only the three low bits are meaningful, and after a comparison exactly one
/// of them is set.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Flags(u8);
impl Flags {
    pub const EQUAL: u8 = 0b001;
    pub const GREATER: u8 = 0b010;
    pub const LESS: u8 = 0b100;

    pub const fn new() -> Self {
        Self(0)
    }

    /// Flags resulting from the unsigned comparison of `a` against `b`.
    /// # Example
    /// ```rust
    /// # use ls8::Flags;
    /// assert!(Flags::from_comparison(3, 3).is_equal());
    /// assert!(Flags::from_comparison(1, 3).is_less());
    /// assert!(Flags::from_comparison(3, 1).is_greater());
    /// ```
    pub fn from_comparison(a: u8, b: u8) -> Self {
        Self(match a.cmp(&b) {
            core::cmp::Ordering::Equal => Self::EQUAL,
            core::cmp::Ordering::Greater => Self::GREATER,
            core::cmp::Ordering::Less => Self::LESS,
        })
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
    pub const fn is_equal(self) -> bool {
        self.0 & Self::EQUAL != 0
    }
    pub const fn is_greater(self) -> bool {
        self.0 & Self::GREATER != 0
    }
    pub const fn is_less(self) -> bool {
        self.0 & Self::LESS != 0
    }
}
impl Debug for Flags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Flags({:#05b})", self.0)
    }
}
