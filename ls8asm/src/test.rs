use crate::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assemble(source: &str) -> Result<Ls8Program, Ls8AsmError> {
    init_logger();
    Ls8Assembler::new().parse_string(source)
}

#[test]
fn test_parse_binary_literal() {
    assert_eq!(Ls8Assembler::parse_binary_literal("10000010"), Ok(0x82));
    assert_eq!(Ls8Assembler::parse_binary_literal("1"), Ok(0x01));
    assert_eq!(
        Ls8Assembler::parse_binary_literal("100000100"),
        Err(Ls8AsmErrorKind::InvalidBinaryLiteral)
    );
    assert_eq!(
        Ls8Assembler::parse_binary_literal("1000001x"),
        Err(Ls8AsmErrorKind::InvalidBinaryLiteral)
    );
    assert_eq!(
        Ls8Assembler::parse_binary_literal("10000012"),
        Err(Ls8AsmErrorKind::InvalidBinaryLiteral)
    );
}

#[test]
fn test_parse_register() {
    assert_eq!(Ls8Assembler::parse_register("R0"), Ok(0));
    assert_eq!(Ls8Assembler::parse_register("r7"), Ok(7));
    assert_eq!(
        Ls8Assembler::parse_register("R8"),
        Err(Ls8AsmErrorKind::InvalidOperand)
    );
    assert_eq!(
        Ls8Assembler::parse_register("R10"),
        Err(Ls8AsmErrorKind::InvalidOperand)
    );
    assert_eq!(
        Ls8Assembler::parse_register("8"),
        Err(Ls8AsmErrorKind::InvalidOperand)
    );
}

#[test]
fn test_parse_immediate() {
    assert_eq!(Ls8Assembler::parse_immediate("72"), Ok(Either::Left(72)));
    assert_eq!(Ls8Assembler::parse_immediate("0xf4"), Ok(Either::Left(0xf4)));
    assert_eq!(Ls8Assembler::parse_immediate("0b101"), Ok(Either::Left(5)));
    assert_eq!(
        Ls8Assembler::parse_immediate("loop"),
        Ok(Either::Right(Label::try_from("loop").unwrap()))
    );
    assert_eq!(
        Ls8Assembler::parse_immediate("256"),
        Err(Ls8AsmErrorKind::InvalidOperand)
    );
    assert_eq!(
        Ls8Assembler::parse_immediate("lo-op"),
        Err(Ls8AsmErrorKind::InvalidOperand)
    );
}

#[test]
fn test_parse_print8() {
    let source = "\
# print8.ls8: prints the number 8

10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";
    assert_eq!(
        assemble(source).unwrap(),
        [0b10000010, 0, 8, 0b01000111, 0, 0b00000001]
    );
}

#[test]
fn test_parse_without_trailing_newline() {
    assert_eq!(assemble("00000001").unwrap(), [0x01]);
    assert_eq!(assemble("\r\n  00000001  \r\n").unwrap(), [0x01]);
}

#[test]
fn test_parse_long_comment() {
    let comment = "#".repeat(LINE_CAPACITY * 2);
    assert_eq!(
        assemble(&format!("00000001 {comment}\n")).unwrap(),
        [0x01]
    );
}

#[test]
fn test_parse_invalid_number() {
    assert_eq!(
        assemble("10000010\n00000000\n0000100x\n"),
        Err(Ls8AsmError {
            line: 3,
            kind: Ls8AsmErrorKind::InvalidBinaryLiteral
        })
    );
    assert_eq!(
        assemble("# comment\n\n-1\n"),
        Err(Ls8AsmError {
            line: 3,
            kind: Ls8AsmErrorKind::InvalidBinaryLiteral
        })
    );
}

#[test]
fn test_parse_mnemonics() {
    let source = "
LDI R0,8
ldi R1, 9
MUL R0 R1
PRN R0 # prints 72
HLT
";
    assert_eq!(
        assemble(source).unwrap(),
        [
            0b10000010, 0, 8, 0b10000010, 1, 9, 0b10100010, 0, 1, 0b01000111, 0, 0b00000001
        ]
    );
}

#[test]
fn test_parse_every_operation() {
    for (mnemonic, opcode, kinds) in OPERATIONS {
        let operands = match kinds.len() {
            0 => "",
            1 => " R1",
            _ if kinds[1] == Immediate => " R1, 2",
            _ => " R1, R2",
        };
        let program = assemble(&format!("{mnemonic}{operands}")).unwrap();
        assert_eq!(program[0], opcode);
        assert_eq!(program.len(), kinds.len() + 1);
        // Operand count is encoded in the two high bits of the opcode
        assert_eq!((opcode >> 6) as usize, kinds.len());
    }
}

#[test]
fn test_parse_unknown_operation() {
    assert_eq!(
        assemble("HLT\nNOP\n"),
        Err(Ls8AsmError {
            line: 2,
            kind: Ls8AsmErrorKind::UnknownOperation
        })
    );
}

#[test]
fn test_parse_wrong_operand_count() {
    assert_eq!(
        assemble("LDI R0"),
        Err(Ls8AsmError {
            line: 1,
            kind: Ls8AsmErrorKind::WrongOperandCount {
                expected: 2,
                found: 1
            }
        })
    );
    assert_eq!(
        assemble("HLT R0").unwrap_err().kind,
        Ls8AsmErrorKind::WrongOperandCount {
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn test_parse_labels() {
    let source = "
        LDI R1, end
    start:
        JMP R1
    end:
        HLT
";
    assert_eq!(
        assemble(source).unwrap(),
        [0b10000010, 1, 5, 0b01010100, 1, 0b00000001]
    );
}

#[test]
fn test_parse_undefined_label() {
    assert_eq!(
        assemble("HLT\nLDI R0, nowhere\n"),
        Err(Ls8AsmError {
            line: 2,
            kind: Ls8AsmErrorKind::UndefinedLabel
        })
    );
}

#[test]
fn test_parse_duplicate_label() {
    assert_eq!(
        assemble("here:\nHLT\nhere:\n"),
        Err(Ls8AsmError {
            line: 3,
            kind: Ls8AsmErrorKind::DuplicateLabel
        })
    );
}

#[test]
fn test_parse_label_too_long() {
    let name = "a".repeat(LABEL_LENGTH + 1);
    assert_eq!(
        assemble(&format!("{name}:")).unwrap_err().kind,
        Ls8AsmErrorKind::LabelTooLong
    );
}

#[test]
fn test_parse_line_too_long() {
    let line = "0".repeat(LINE_CAPACITY + 1);
    assert_eq!(
        assemble(&line).unwrap_err().kind,
        Ls8AsmErrorKind::LineTooLong
    );
}

#[test]
fn test_parse_program_too_large() {
    assert_eq!(assemble(&"00000000\n".repeat(MEMORY_SIZE)).unwrap().len(), MEMORY_SIZE);
    assert_eq!(
        assemble(&"00000000\n".repeat(MEMORY_SIZE + 1)),
        Err(Ls8AsmError {
            line: MEMORY_SIZE + 1,
            kind: Ls8AsmErrorKind::ProgramTooLarge
        })
    );
}

#[test]
fn test_error_display() {
    let error = assemble("LDI R9, 1").unwrap_err();
    assert_eq!(error.to_string(), "line 1: invalid operand");
}
