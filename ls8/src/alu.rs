//! # Arithmetic logic unit
//! Arithmetic on register operands. Results wrap around at 8 bits.

use crate::{fault::Ls8Fault, opcode::Opcode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Mul,
}
impl AluOp {
    /// Computes the result of the operation, truncated to 8 bits.
    /// # Example
    /// ```rust
    /// # use ls8::AluOp;
    /// assert_eq!(AluOp::Add.apply(200, 100), 44);
    /// assert_eq!(AluOp::Mul.apply(16, 17), 16);
    /// ```
    pub const fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Mul => a.wrapping_mul(b),
        }
    }
}
impl TryFrom<Opcode> for AluOp {
    type Error = Ls8Fault;

    fn try_from(opcode: Opcode) -> Result<Self, Self::Error> {
        match opcode {
            Opcode::Add => Ok(AluOp::Add),
            Opcode::Mul => Ok(AluOp::Mul),
            _ => Err(Ls8Fault::UnsupportedAluOperation(opcode)),
        }
    }
}
