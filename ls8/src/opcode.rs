//! # LS8 opcodes
//! Instructions are a single opcode byte, followed by zero, one or two operand
//! bytes. The opcode byte itself is laid out as `AABCDDDD`:
//!
//! | Bits | Meaning |
//! | ---- | ------- |
//! | `AA` | number of operand bytes following the opcode |
//! | `B`  | set for operations handled by the ALU |
//! | `C`  | set for operations that write the program counter themselves |
//! | `DDDD` | instruction identifier |
//!
//! Decoding maps the byte onto the closed [`Opcode`] enum once, everything
//! afterwards matches on the enum.

use core::fmt::Display;

/// Every instruction understood by the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    Hlt = 0b0000_0001,
    Ldi = 0b1000_0010,
    Prn = 0b0100_0111,
    Mul = 0b1010_0010,
    Add = 0b1010_0000,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,
    Call = 0b0101_0000,
    Ret = 0b0001_0001,
    Cmp = 0b1010_0111,
    Jmp = 0b0101_0100,
    Jeq = 0b0101_0101,
    Jne = 0b0101_0110,
}
impl Opcode {
    /// All opcodes, in table order.
    pub const ALL: [Opcode; 13] = [
        Opcode::Hlt,
        Opcode::Ldi,
        Opcode::Prn,
        Opcode::Mul,
        Opcode::Add,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Cmp,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Jne,
    ];

    /// Maps a raw byte onto an opcode, returning `None` for bytes that do not
    /// encode a known instruction.
    /// # Example
    /// ```rust
    /// # use ls8::Opcode;
    /// assert_eq!(Opcode::decode(0b1000_0010), Some(Opcode::Ldi));
    /// assert_eq!(Opcode::decode(0xff), None);
    /// ```
    pub const fn decode(byte: u8) -> Option<Self> {
        Some(match byte {
            0b0000_0001 => Opcode::Hlt,
            0b1000_0010 => Opcode::Ldi,
            0b0100_0111 => Opcode::Prn,
            0b1010_0010 => Opcode::Mul,
            0b1010_0000 => Opcode::Add,
            0b0100_0101 => Opcode::Push,
            0b0100_0110 => Opcode::Pop,
            0b0101_0000 => Opcode::Call,
            0b0001_0001 => Opcode::Ret,
            0b1010_0111 => Opcode::Cmp,
            0b0101_0100 => Opcode::Jmp,
            0b0101_0101 => Opcode::Jeq,
            0b0101_0110 => Opcode::Jne,
            _ => return None,
        })
    }

    /// Looks up an opcode from its mnemonic, ignoring case.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|opcode| opcode.mnemonic().eq_ignore_ascii_case(mnemonic))
    }

    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_count(self) -> u8 {
        self.byte() >> 6
    }

    /// Total size of the instruction in memory, opcode included.
    /// # Example
    /// ```rust
    /// # use ls8::Opcode;
    /// assert_eq!(Opcode::Hlt.width(), 1);
    /// assert_eq!(Opcode::Prn.width(), 2);
    /// assert_eq!(Opcode::Ldi.width(), 3);
    /// ```
    pub const fn width(self) -> u8 {
        self.operand_count() + 1
    }

    pub const fn is_alu(self) -> bool {
        self.byte() & 0b0010_0000 != 0
    }

    /// Whether the instruction may set the program counter itself, in which
    /// case the machine does not advance it past the instruction.
    pub const fn sets_pc(self) -> bool {
        self.byte() & 0b0001_0000 != 0
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Mul => "MUL",
            Opcode::Add => "ADD",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Cmp => "CMP",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
        }
    }
}
impl Display for Opcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.byte()
    }
}
