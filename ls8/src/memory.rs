//! # LS8 memory
//! 256 bytes of RAM holding both the program and the stack. Since addresses
//! are bytes, every address is valid; the only way to fall out of memory is to
//! compute an address past `0xff`, which the machine checks for itself.

use core::ops::{Index, IndexMut};

use crate::fault::AddressingFault;

/// Number of bytes of memory.
pub const MEMORY_SIZE: usize = 0x100;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Ls8Memory {
    data: [u8; MEMORY_SIZE],
}
impl Default for Ls8Memory {
    /// Returns zeroed memory.
    fn default() -> Self {
        Self::new()
    }
}
impl Ls8Memory {
    pub const fn new() -> Self {
        Self {
            data: [0; MEMORY_SIZE],
        }
    }

    /// Reads the byte stored at the given address.
    pub fn read(&self, address: u8) -> u8 {
        self.data[address as usize]
    }

    /// Writes a byte at the given address.
    pub fn write(&mut self, address: u8, value: u8) {
        self.data[address as usize] = value
    }

    /// Reads the byte at a wide address, failing when it is past the end of
    /// memory.
    pub fn fetch(&self, address: u16) -> Result<u8, AddressingFault> {
        self.data
            .get(address as usize)
            .copied()
            .ok_or(AddressingFault::ProgramCounter(address))
    }

    /// Copies a program at the start of memory.
    ///
    /// Programs larger than memory are refused without touching its contents.
    /// # Example
    /// ```rust
    /// # use ls8::Ls8Memory;
    /// let mut memory = Ls8Memory::new();
    /// memory.load(&[0x82, 0x00, 0x08]).unwrap();
    /// assert_eq!(memory[1], 0x00);
    /// assert_eq!(memory[2], 0x08);
    /// assert!(memory.load(&[0; 257]).is_err());
    /// ```
    pub fn load(&mut self, program: &[u8]) -> Result<(), AddressingFault> {
        let destination = self
            .data
            .get_mut(..program.len())
            .ok_or(AddressingFault::ProgramTooLarge { len: program.len() })?;
        destination.copy_from_slice(program);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
impl Index<u8> for Ls8Memory {
    type Output = u8;

    fn index(&self, address: u8) -> &Self::Output {
        &self.data[address as usize]
    }
}
impl IndexMut<u8> for Ls8Memory {
    fn index_mut(&mut self, address: u8) -> &mut Self::Output {
        &mut self.data[address as usize]
    }
}
impl PartialEq<[u8; MEMORY_SIZE]> for Ls8Memory {
    fn eq(&self, other: &[u8; MEMORY_SIZE]) -> bool {
        &self.data == other
    }
}
