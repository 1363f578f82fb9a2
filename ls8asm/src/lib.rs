//! # LS8asm
//! A streaming loader for LS8 program text.
//!
//! Meant as a companion to [LS8](), does not require [`std`] or anything fancy:
//! just grab a stream of bytes and try to turn it into a program that fits in
//! the 256 bytes of LS8 memory!
//!
//! ## Program text
//! Programs are read line by line. Everything following a `#` is a comment,
//! and lines left empty are skipped. Every other line is one of:
//! - a binary literal of up to 8 digits, standing for one byte of the program:
//!   ```text
//!   10000010 # LDI R0,8
//!   00000000
//!   00001000
//!   ```
//! - a label definition, `NAME:`, naming the address of the next byte.
//! - an instruction, written as its mnemonic followed by its operands:
//!   ```text
//!   LDI R0, 8
//!   PRN R0
//!   HLT
//!   ```
//!   Registers are written `R0` to `R7`. Immediate values can be written in
//!   decimal, in hexadecimal with `0x`, in binary with `0b`, or as a label name.
//!
//! Labels may be used before being defined: references are patched once the
//! whole program has been read.

#![cfg_attr(not(test), no_std)]

use either::*;
use heapless::{String, Vec};
use thiserror::Error;

#[cfg(test)]
mod test;

/// Number of bytes of LS8 memory, and thus the largest possible program.
pub const MEMORY_SIZE: usize = 0x100;
const LINE_CAPACITY: usize = 0x80;
const LABEL_LENGTH: usize = 0x20;
const MAX_LABELS: usize = 0x40;
const MAX_REFERENCES: usize = 0x80;

/// A program ready to be copied in LS8 memory.
pub type Ls8Program = Vec<u8, MEMORY_SIZE>;
type Label = String<LABEL_LENGTH>;

type Ls8AsmResult<T> = Result<T, Ls8AsmErrorKind>;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Error)]
pub enum Ls8AsmErrorKind {
    #[error("invalid binary literal")]
    InvalidBinaryLiteral,
    #[error("unknown operation")]
    UnknownOperation,
    #[error("invalid operand")]
    InvalidOperand,
    #[error("expected {expected} operand(s), found {found}")]
    WrongOperandCount { expected: usize, found: usize },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("line is longer than {max} bytes", max = LINE_CAPACITY)]
    LineTooLong,
    #[error("label is longer than {max} bytes", max = LABEL_LENGTH)]
    LabelTooLong,
    #[error("label is already defined")]
    DuplicateLabel,
    #[error("label is never defined")]
    UndefinedLabel,
    /// Either too many labels are defined, or too many are referenced.
    #[error("too many labels")]
    TooManyLabels,
    #[error("program does not fit in {max} bytes", max = MEMORY_SIZE)]
    ProgramTooLarge,
}

/// An error, along with the (1-based) line it was found on.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct Ls8AsmError {
    pub line: usize,
    pub kind: Ls8AsmErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OperandKind {
    Register,
    Immediate,
}
use OperandKind::*;

/// Every LS8 instruction: mnemonic, opcode and expected operands.
const OPERATIONS: [(&str, u8, &[OperandKind]); 13] = [
    ("HLT", 0b0000_0001, &[]),
    ("LDI", 0b1000_0010, &[Register, Immediate]),
    ("PRN", 0b0100_0111, &[Register]),
    ("MUL", 0b1010_0010, &[Register, Register]),
    ("ADD", 0b1010_0000, &[Register, Register]),
    ("PUSH", 0b0100_0101, &[Register]),
    ("POP", 0b0100_0110, &[Register]),
    ("CALL", 0b0101_0000, &[Register]),
    ("RET", 0b0001_0001, &[]),
    ("CMP", 0b1010_0111, &[Register, Register]),
    ("JMP", 0b0101_0100, &[Register]),
    ("JEQ", 0b0101_0101, &[Register]),
    ("JNE", 0b0101_0110, &[Register]),
];

/// Keeps track of all information regarding the current loading process.
#[derive(Clone, Debug)]
pub struct Ls8Assembler {
    // Current line of the source, starting at 1
    line: usize,
    // Set once a `#` is met, until the end of the line
    in_comment: bool,
    line_buffer: Vec<u8, LINE_CAPACITY>,

    program: Ls8Program,

    labels: Vec<(Label, usize), MAX_LABELS>,
    // Label uses waiting for the label to be defined: name, address to patch
    // and line of the use.
    references: Vec<(Label, usize, usize), MAX_REFERENCES>,
}
impl Default for Ls8Assembler {
    fn default() -> Self {
        Self {
            line: 1,
            in_comment: false,
            line_buffer: Vec::new(),
            program: Vec::new(),
            labels: Vec::new(),
            references: Vec::new(),
        }
    }
}
impl Ls8Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn error(&self, kind: Ls8AsmErrorKind) -> Ls8AsmError {
        Ls8AsmError {
            line: self.line,
            kind,
        }
    }

    /// Writes a byte to the program.
    fn write_byte(&mut self, byte: u8) -> Ls8AsmResult<()> {
        self.program
            .push(byte)
            .map_err(|_| Ls8AsmErrorKind::ProgramTooLarge)
    }

    /// Parses a binary literal of 1 to 8 digits.
    fn parse_binary_literal(token: &str) -> Ls8AsmResult<u8> {
        let binary = token.bytes().all(|b| b == b'0' || b == b'1');
        if token.is_empty() || token.len() > 8 || !binary {
            return Err(Ls8AsmErrorKind::InvalidBinaryLiteral);
        }
        u8::from_str_radix(token, 2).map_err(|_| Ls8AsmErrorKind::InvalidBinaryLiteral)
    }

    /// Parses a register operand, `R0` to `R7`.
    fn parse_register(token: &str) -> Ls8AsmResult<u8> {
        let index = token
            .strip_prefix(['R', 'r'])
            .ok_or(Ls8AsmErrorKind::InvalidOperand)?;
        match index.as_bytes() {
            &[digit @ b'0'..=b'7'] => Ok(digit - b'0'),
            _ => Err(Ls8AsmErrorKind::InvalidOperand),
        }
    }

    /// Parses an immediate operand. Numbers are returned right away, label
    /// names are returned as is to be resolved later.
    fn parse_immediate(token: &str) -> Ls8AsmResult<Either<u8, Label>> {
        let first = token.chars().next().ok_or(Ls8AsmErrorKind::InvalidOperand)?;
        if first.is_ascii_digit() {
            let (digits, radix) = if let Some(hex) = token.strip_prefix("0x") {
                (hex, 16)
            } else if let Some(binary) = token.strip_prefix("0b") {
                (binary, 2)
            } else {
                (token, 10)
            };
            u8::from_str_radix(digits, radix)
                .map(Either::Left)
                .map_err(|_| Ls8AsmErrorKind::InvalidOperand)
        } else {
            Self::parse_label(token).map(Either::Right)
        }
    }

    /// Parses a label name: a letter or underscore, then letters, digits or
    /// underscores.
    fn parse_label(token: &str) -> Ls8AsmResult<Label> {
        let mut chars = token.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(Ls8AsmErrorKind::InvalidOperand);
        }
        Label::try_from(token).map_err(|_| Ls8AsmErrorKind::LabelTooLong)
    }

    /// Records a label at the current address.
    fn define_label(&mut self, name: &str) -> Ls8AsmResult<()> {
        let label = Self::parse_label(name)?;
        if self.labels.iter().any(|(defined, _)| *defined == label) {
            return Err(Ls8AsmErrorKind::DuplicateLabel);
        }
        let address = self.program.len();
        log::debug!("label {label} at {address:#04x}");
        self.labels
            .push((label, address))
            .map_err(|_| Ls8AsmErrorKind::TooManyLabels)
    }

    /// Parses an instruction line into its opcode and operand bytes.
    fn write_instruction(&mut self, text: &str) -> Ls8AsmResult<u8> {
        let (mnemonic, rest) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        let &(_, opcode, kinds) = OPERATIONS
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(mnemonic))
            .ok_or(Ls8AsmErrorKind::UnknownOperation)?;

        let operands = rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());
        let found = operands.clone().count();
        if found != kinds.len() {
            return Err(Ls8AsmErrorKind::WrongOperandCount {
                expected: kinds.len(),
                found,
            });
        }

        self.write_byte(opcode)?;
        for (kind, token) in kinds.iter().zip(operands) {
            match kind {
                Register => {
                    let register = Self::parse_register(token)?;
                    self.write_byte(register)?
                }
                Immediate => match Self::parse_immediate(token)? {
                    Either::Left(byte) => self.write_byte(byte)?,
                    Either::Right(label) => {
                        let address = self.program.len();
                        self.references
                            .push((label, address, self.line))
                            .map_err(|_| Ls8AsmErrorKind::TooManyLabels)?;
                        // Patched when resolving
                        self.write_byte(0)?
                    }
                },
            }
        }

        Ok(opcode)
    }

    /// Parses a single line, comments already stripped.
    fn parse_line(&mut self, line: &[u8]) -> Ls8AsmResult<()> {
        let text = core::str::from_utf8(line)
            .map_err(|_| Ls8AsmErrorKind::InvalidUtf8)?
            .trim();
        let Some(first) = text.chars().next() else {
            return Ok(());
        };

        if first.is_ascii_digit() {
            let byte = Self::parse_binary_literal(text)?;
            self.write_byte(byte)
        } else if first.is_ascii_alphabetic() || first == '_' {
            if let Some(label) = text.strip_suffix(':') {
                self.define_label(label.trim_end())
            } else {
                self.write_instruction(text).map(|_| ())
            }
        } else {
            Err(Ls8AsmErrorKind::InvalidBinaryLiteral)
        }
    }

    /// Ends the current line, parsing its contents.
    fn end_line(&mut self) -> Result<(), Ls8AsmError> {
        let line = core::mem::take(&mut self.line_buffer);
        let result = self.parse_line(&line);
        self.in_comment = false;
        result.map_err(|kind| self.error(kind))
    }

    /// Patches every label reference with the address of the label.
    fn resolve(&mut self) -> Result<(), Ls8AsmError> {
        for (label, address, line) in core::mem::take(&mut self.references) {
            let error = |kind| Ls8AsmError { line, kind };
            let &(_, target) = self
                .labels
                .iter()
                .find(|(defined, _)| *defined == label)
                .ok_or(error(Ls8AsmErrorKind::UndefinedLabel))?;
            let target = u8::try_from(target).map_err(|_| error(Ls8AsmErrorKind::InvalidOperand))?;
            log::debug!("patched {label} ({target:#04x}) at {address:#04x}");
            self.program[address] = target;
        }
        Ok(())
    }

    /// Consumes the assembler to return either a program ready to be loaded, or
    /// an error if anything goes wrong.
    pub fn parse<I: Iterator<Item = u8>>(mut self, source: I) -> Result<Ls8Program, Ls8AsmError> {
        for b in source {
            match b {
                b'\n' => {
                    self.end_line()?;
                    self.line += 1;
                }
                b'#' => self.in_comment = true,
                _ if self.in_comment => {}
                _ => self
                    .line_buffer
                    .push(b)
                    .map_err(|_| self.error(Ls8AsmErrorKind::LineTooLong))?,
            }
        }
        self.end_line()?;
        self.resolve()?;
        Ok(self.program)
    }

    /// Helper method to parse full strings.
    pub fn parse_string(self, source: &str) -> Result<Ls8Program, Ls8AsmError> {
        self.parse(source.bytes())
    }
}
