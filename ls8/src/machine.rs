//! # LS8 machine
//! Represents a fully functional LS8 computer.
//!
//! The machine runs a fetch-decode-execute loop over its memory until it
//! reaches a `HLT` instruction or faults. Execution can be driven one
//! instruction at a time with [`Ls8Machine::step`], all at once with
//! [`Ls8Machine::run`], or through the [`Ls8Steps`] iterator, which makes it
//! easy to observe what was executed:
//! ```rust
//! # use ls8::machine::*;
//! let mut machine = Ls8Machine::new(());
//! machine.load(&[0b0000_0001]).unwrap();
//! for executed_instruction in machine.steps() {
//!     println!("{}", executed_instruction.unwrap());
//! }
//! ```
//!
//! Machines are parametrized by a type implementing [`Ls8Output`] ([`O`]),
//! which receives every value printed by `PRN`.

use core::iter::FusedIterator;

use crate::{
    alu::AluOp,
    fault::{AddressingFault, Ls8Fault},
    memory::Ls8Memory,
    opcode::Opcode,
    output::Ls8Output,
    registers::{Flags, Ls8Registers},
    trace::Ls8Trace,
};

/// The LS8 machine, able to execute LS8 programs.
#[derive(Clone, Debug)]
pub struct Ls8Machine<O> {
    memory: Ls8Memory,
    registers: Ls8Registers,
    program_counter: u16,
    flags: Flags,
    halted: bool,

    output: O,
}
impl<O: Ls8Output> Ls8Machine<O> {
    /// Returns a machine with zeroed memory and registers, ready to run from
    /// address `0x00`.
    pub fn new(output: O) -> Self {
        Self {
            memory: Ls8Memory::new(),
            registers: Ls8Registers::new(),
            program_counter: 0,
            flags: Flags::new(),
            halted: false,
            output,
        }
    }

    /// Copies a program at the start of memory.
    pub fn load(&mut self, program: &[u8]) -> Result<(), Ls8Fault> {
        self.memory.load(program)?;
        log::debug!("loaded {} bytes", program.len());
        Ok(())
    }

    pub fn registers(&self) -> &Ls8Registers {
        &self.registers
    }
    pub fn register(&self, index: u8) -> Result<u8, AddressingFault> {
        self.registers.get(index)
    }
    pub fn memory(&self) -> &Ls8Memory {
        &self.memory
    }
    pub fn read_memory(&self, address: u8) -> u8 {
        self.memory.read(address)
    }
    pub fn write_memory(&mut self, address: u8, value: u8) {
        self.memory.write(address, value)
    }
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }
    pub fn flags(&self) -> Flags {
        self.flags
    }
    pub fn is_halted(&self) -> bool {
        self.halted
    }
    pub fn output(&self) -> &O {
        &self.output
    }
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
    pub fn into_output(self) -> O {
        self.output
    }

    /// Snapshot of the machine state around the program counter.
    pub fn trace(&self) -> Ls8Trace {
        Ls8Trace::capture(&self.memory, &self.registers, self.program_counter)
    }

    /// Returns an [`Ls8Steps`] iterator executing instructions until the
    /// machine halts.
    pub fn steps(&mut self) -> Ls8Steps<'_, O> {
        Ls8Steps { machine: self }
    }

    /// Runs the machine until it halts.
    ///
    /// Returns straight away if the machine already halted, and returns the
    /// fault that stopped it otherwise.
    pub fn run(&mut self) -> Result<(), Ls8Fault> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }

    /// Executes the instruction at the program counter, returning it.
    ///
    /// Any fault halts the machine and leaves the program counter on the
    /// faulting instruction. Stepping a halted machine is refused with
    /// [`Ls8Fault::Halted`].
    pub fn step(&mut self) -> Result<Opcode, Ls8Fault> {
        if self.halted {
            return Err(Ls8Fault::Halted);
        }
        let program_counter = self.program_counter;
        match self.execute(program_counter) {
            Ok((opcode, next_program_counter)) => {
                self.program_counter = next_program_counter;
                if self.halted {
                    log::debug!("halted at {program_counter:#04x}");
                }
                Ok(opcode)
            }
            Err(fault) => {
                self.halted = true;
                log::debug!("faulted at {program_counter:#04x}: {fault}");
                Err(fault)
            }
        }
    }

    /// Executes the instruction at the given address.
    ///
    /// Returns the executed opcode along with the next value of the program
    /// counter. State is only modified once every operand has been checked.
    fn execute(&mut self, program_counter: u16) -> Result<(Opcode, u16), Ls8Fault> {
        let instruction = self.memory.fetch(program_counter)?;
        let opcode = Opcode::decode(instruction).ok_or(Ls8Fault::IllegalInstruction {
            opcode: instruction,
            pc: program_counter,
        })?;
        let [operand_a, operand_b] = self.operands(program_counter, opcode)?;
        let following = program_counter + opcode.width() as u16;

        log::trace!("{program_counter:#04x}: {opcode} {operand_a:#04x} {operand_b:#04x}");

        let next = if opcode.sets_pc() {
            self.jump(opcode, program_counter, operand_a, following)?
        } else if opcode.is_alu() {
            self.alu(opcode, operand_a, operand_b)?;
            following
        } else {
            self.operate(opcode, program_counter, operand_a, operand_b)?;
            following
        };

        Ok((opcode, next))
    }

    /// Executes an instruction leaving the program counter alone.
    fn operate(
        &mut self,
        opcode: Opcode,
        program_counter: u16,
        register: u8,
        immediate: u8,
    ) -> Result<(), Ls8Fault> {
        match opcode {
            Opcode::Hlt => self.halted = true,
            Opcode::Ldi => self.registers.set(register, immediate)?,
            Opcode::Prn => {
                let value = self.registers.get(register)?;
                self.output.print(value)
            }
            Opcode::Push => self.push_register(register)?,
            Opcode::Pop => self.pop_register(register)?,
            _ => {
                return Err(Ls8Fault::IllegalInstruction {
                    opcode: opcode.byte(),
                    pc: program_counter,
                })
            }
        }
        Ok(())
    }

    /// Executes an instruction setting the program counter, returning its new
    /// value.
    fn jump(
        &mut self,
        opcode: Opcode,
        program_counter: u16,
        register: u8,
        following: u16,
    ) -> Result<u16, Ls8Fault> {
        Ok(match opcode {
            Opcode::Call => {
                let target = self.registers.get(register)?;
                let return_address = u8::try_from(following)
                    .map_err(|_| AddressingFault::ProgramCounter(following))?;
                self.push(return_address)?;
                target as u16
            }
            Opcode::Ret => self.pop()? as u16,
            Opcode::Jmp => self.registers.get(register)? as u16,
            Opcode::Jeq => self.jump_if(self.flags.is_equal(), register, following)?,
            Opcode::Jne => self.jump_if(!self.flags.is_equal(), register, following)?,
            _ => {
                return Err(Ls8Fault::IllegalInstruction {
                    opcode: opcode.byte(),
                    pc: program_counter,
                })
            }
        })
    }

    /// Reads the operand bytes the opcode consumes. Operands it does not use
    /// are left as zero and never read, so short instructions may sit at the
    /// very end of memory.
    fn operands(&self, program_counter: u16, opcode: Opcode) -> Result<[u8; 2], AddressingFault> {
        let mut operands = [0; 2];
        let consumed = operands.iter_mut().take(opcode.operand_count() as usize);
        for (offset, operand) in (1..).zip(consumed) {
            *operand = self.memory.fetch(program_counter + offset)?;
        }
        Ok(operands)
    }

    /// Runs an ALU instruction. Arithmetic results are stored in the first
    /// register, comparisons only update the flags.
    fn alu(&mut self, opcode: Opcode, register_a: u8, register_b: u8) -> Result<(), Ls8Fault> {
        let b = self.registers.get(register_b)?;
        if opcode == Opcode::Cmp {
            self.flags = Flags::from_comparison(self.registers.get(register_a)?, b);
            return Ok(());
        }
        let operation = AluOp::try_from(opcode)?;
        let a = self.registers.get_mut(register_a)?;
        *a = operation.apply(*a, b);
        Ok(())
    }

    /// Jumps to the address held in the register if the condition holds,
    /// falls through otherwise.
    fn jump_if(&self, condition: bool, register: u8, following: u16) -> Result<u16, Ls8Fault> {
        let target = self.registers.get(register)?;
        Ok(if condition { target as u16 } else { following })
    }

    /// Moves the stack pointer down, returning its new value.
    fn grow_stack(&mut self) -> Result<u8, AddressingFault> {
        let stack_pointer = self
            .registers
            .stack_pointer()
            .checked_sub(1)
            .ok_or(AddressingFault::StackOverflow)?;
        self.registers.set_stack_pointer(stack_pointer);
        Ok(stack_pointer)
    }

    /// Pushes a byte on the stack, moving the stack pointer down.
    fn push(&mut self, value: u8) -> Result<(), AddressingFault> {
        let stack_pointer = self.grow_stack()?;
        self.memory.write(stack_pointer, value);
        Ok(())
    }

    /// Pushes the value of a register. The register is read once the stack
    /// pointer has moved, so `PUSH R7` stores the decremented pointer.
    fn push_register(&mut self, register: u8) -> Result<(), AddressingFault> {
        self.registers.get(register)?;
        let stack_pointer = self.grow_stack()?;
        let value = self.registers.get(register)?;
        self.memory.write(stack_pointer, value);
        Ok(())
    }

    /// Pops a byte from the stack, moving the stack pointer up.
    fn pop(&mut self) -> Result<u8, AddressingFault> {
        let stack_pointer = self.registers.stack_pointer();
        let next = stack_pointer
            .checked_add(1)
            .ok_or(AddressingFault::StackUnderflow)?;
        let value = self.memory.read(stack_pointer);
        self.registers.set_stack_pointer(next);
        Ok(value)
    }

    /// Pops into a register. The stack pointer is incremented after the
    /// register is written, so `POP R7` leaves it one past the popped byte.
    fn pop_register(&mut self, register: u8) -> Result<(), AddressingFault> {
        let stack_pointer = self.registers.stack_pointer();
        if stack_pointer == u8::MAX {
            return Err(AddressingFault::StackUnderflow);
        }
        let mut registers = self.registers;
        registers.set(register, self.memory.read(stack_pointer))?;
        let next = registers
            .stack_pointer()
            .checked_add(1)
            .ok_or(AddressingFault::StackUnderflow)?;
        registers.set_stack_pointer(next);
        self.registers = registers;
        Ok(())
    }
}

/// Executes instructions in sequence until the machine halts, yielding every
/// executed opcode.
///
/// A fault is yielded once, after which the machine is halted and the
/// iterator is exhausted.
pub struct Ls8Steps<'a, O> {
    machine: &'a mut Ls8Machine<O>,
}
impl<O> Ls8Steps<'_, O> {
    /// The machine being driven, e.g. to trace it between steps.
    pub fn machine(&self) -> &Ls8Machine<O> {
        &*self.machine
    }
}
impl<O: Ls8Output> Iterator for Ls8Steps<'_, O> {
    type Item = Result<Opcode, Ls8Fault>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.machine.halted {
            None
        } else {
            Some(self.machine.step())
        }
    }
}
impl<O: Ls8Output> FusedIterator for Ls8Steps<'_, O> {}
