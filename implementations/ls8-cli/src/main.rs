use std::{
    fs::File,
    io::{stdout, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{error::ErrorKind, Parser};
use env_logger::Env;
use ls8::{Ls8Fault, Ls8Machine, Ls8Output};
use ls8asm::{Ls8Assembler, Ls8Program};

/// Runs an LS8 program.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// Logs the machine state before every instruction.
    #[arg(short = 'v', long)]
    trace: bool,
    /// Program to run, as `.ls8` text.
    program: PathBuf,
}

/// Prints values to the standard output, one per line.
///
/// The program keeps running when printing fails; the first error is kept
/// so that `ls8` can exit unsuccessfully once the machine halts.
#[derive(Default)]
struct StdoutOutput {
    error: Option<std::io::Error>,
}
impl Ls8Output for StdoutOutput {
    fn print(&mut self, value: u8) {
        let mut stdout = stdout().lock();
        if let Err(e) = writeln!(stdout, "{value}").and_then(|_| stdout.flush()) {
            log::warn!("could not print {value}: {e}");
            self.error.get_or_insert(e);
        }
    }
}

enum LoadError {
    Unreadable(std::io::Error),
    Malformed(ls8asm::Ls8AsmError),
    Rejected(Ls8Fault),
}

/// Ways `ls8` can fail, each with its own exit status.
enum Failure {
    Usage,
    Load(LoadError),
    Output(std::io::Error),
    Fault(Ls8Fault),
}
impl Failure {
    fn status(&self) -> u8 {
        match self {
            Failure::Load(LoadError::Unreadable(_)) => 2,
            Failure::Fault(_) => 3,
            Failure::Usage | Failure::Load(_) | Failure::Output(_) => 1,
        }
    }
}

fn read_program(path: &Path) -> Result<Ls8Program, LoadError> {
    let mut source = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut source))
        .map_err(LoadError::Unreadable)?;
    Ls8Assembler::new()
        .parse(source.into_iter())
        .map_err(LoadError::Malformed)
}

/// Runs the machine to completion, tracing it along the way if asked to.
fn run(machine: &mut Ls8Machine<StdoutOutput>, trace: bool) -> Result<(), Ls8Fault> {
    let mut steps = machine.steps();
    loop {
        if trace && !steps.machine().is_halted() {
            log::info!("{}", steps.machine().trace());
        }
        match steps.next() {
            Some(executed) => {
                let opcode = executed?;
                log::trace!("executed {opcode}")
            }
            None => return Ok(()),
        }
    }
}

/// Loads and runs the program, reporting what went wrong if anything.
fn execute(args: &Arguments) -> Result<(), Failure> {
    let program = read_program(&args.program).map_err(|e| {
        match &e {
            LoadError::Unreadable(e) => eprintln!("could not open {}: {e}", args.program.display()),
            LoadError::Malformed(e) => eprintln!("{}: {e}", args.program.display()),
            LoadError::Rejected(fault) => eprintln!("{}: {fault}", args.program.display()),
        }
        Failure::Load(e)
    })?;
    log::debug!("{} is {} bytes long", args.program.display(), program.len());

    let mut machine = Ls8Machine::new(StdoutOutput::default());
    machine.load(&program).map_err(|fault| {
        eprintln!("{}: {fault}", args.program.display());
        Failure::Load(LoadError::Rejected(fault))
    })?;

    if let Err(fault) = run(&mut machine, args.trace) {
        let pc = machine.program_counter();
        let opcode = u8::try_from(pc).map(|address| machine.read_memory(address));
        match opcode {
            Ok(opcode) => log::error!("{fault} (pc {pc:#04x}, opcode {opcode:#04x})"),
            Err(_) => log::error!("{fault} (pc {pc:#05x})"),
        }
        return Err(Failure::Fault(fault));
    }

    match machine.into_output().error {
        Some(e) => {
            eprintln!("could not print to the standard output: {e}");
            Err(Failure::Output(e))
        }
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(Failure::Usage.status());
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(if args.trace {
        "info"
    } else {
        "warn"
    }))
    .init();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => ExitCode::from(failure.status()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_program() {
        assert!(matches!(
            read_program(Path::new("does/not/exist.ls8")),
            Err(LoadError::Unreadable(_))
        ));
    }

    #[test]
    fn test_demo_programs_load() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        for demo in ["print8", "mult", "stack", "call", "loop"] {
            let path = demos.join(demo).with_extension("ls8");
            assert!(read_program(&path).is_ok(), "{}", path.display());
        }
    }

    #[test]
    fn test_run_halts() {
        let mut machine = Ls8Machine::new(StdoutOutput::default());
        machine.load(&[0b0000_0001]).unwrap();
        assert_eq!(run(&mut machine, true), Ok(()));
        assert!(machine.is_halted());
    }

    #[test]
    fn test_run_reports_faults() {
        let mut machine = Ls8Machine::new(StdoutOutput::default());
        machine.load(&[0xff]).unwrap();
        assert_eq!(
            run(&mut machine, false),
            Err(Ls8Fault::IllegalInstruction { opcode: 0xff, pc: 0 })
        );
    }

    #[test]
    fn test_exit_statuses() {
        let arguments = |program: &Path| Arguments {
            trace: false,
            program: program.to_path_buf(),
        };
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");

        assert!(execute(&arguments(&demos.join("print8.ls8"))).is_ok());
        assert_eq!(Failure::Usage.status(), 1);
        match execute(&arguments(Path::new("does/not/exist.ls8"))) {
            Err(failure @ Failure::Load(LoadError::Unreadable(_))) => assert_eq!(failure.status(), 2),
            _ => panic!("missing program should be unreadable"),
        }

        let malformed = std::env::temp_dir().join("ls8-cli-malformed.ls8");
        std::fs::write(&malformed, "NOP\n").unwrap();
        let result = execute(&arguments(&malformed));
        let _ = std::fs::remove_file(&malformed);
        match result {
            Err(failure @ Failure::Load(LoadError::Malformed(_))) => assert_eq!(failure.status(), 1),
            _ => panic!("unknown operation should be malformed"),
        }

        let faulting = std::env::temp_dir().join("ls8-cli-faulting.ls8");
        std::fs::write(&faulting, "11111111\n").unwrap();
        let result = execute(&arguments(&faulting));
        let _ = std::fs::remove_file(&faulting);
        match result {
            Err(failure @ Failure::Fault(_)) => assert_eq!(failure.status(), 3),
            _ => panic!("illegal instruction should fault"),
        }

        let output = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(Failure::Output(output).status(), 1);
        assert_eq!(
            Failure::Load(LoadError::Rejected(Ls8Fault::Halted)).status(),
            1
        );
    }
}
