//! Library half of the `vex` CLI: assembles MIPS32 source text and drives
//! a fresh `Memory`/`Cpu` pair to completion.
//!
//! Split out of `main` so the run loop is exercised by ordinary unit
//! tests rather than only through a process boundary, the same way
//! `vasm::assemble` is tested apart from its own CLI wrapper.

use std::fmt;
use std::io;

use log::warn;

use mips32::{Cpu, ExceptionMask, Memory, StepEvent};
use vasm::{AssembleError, Config};

/// Everything that can go wrong running a source file end to end.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Assemble(AssembleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{}", err),
            Error::Assemble(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AssembleError> for Error {
    fn from(err: AssembleError) -> Error {
        Error::Assemble(err)
    }
}

/// Why a run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `step` raised this nonzero exception mask.
    Exception(ExceptionMask),
    /// The processor halted (`syscall`).
    Halted,
    /// The step budget passed to `run` was exhausted without a halt or
    /// exception; mirrors the `PC_LIMIT` bit a driver is expected to OR
    /// into its own reporting rather than expect `step` to raise.
    StepLimitReached,
}

/// Final architectural state of a completed run.
pub struct RunOutcome {
    pub pc: u32,
    pub cycle: u64,
    pub registers: Vec<u32>,
    pub reason: StopReason,
}

/// Assembles `source` against `config`, loads the resulting image into a
/// fresh `Memory`, and steps a fresh `Cpu` for at most `max_steps`
/// instructions, stopping early on a halt or a nonzero exception mask.
///
/// Every exception a step raises is logged at `warn!`; a clean run logs
/// nothing from this function.
pub fn run(source: &str, config: Config, max_steps: u64) -> Result<RunOutcome, Error> {
    let image = vasm::assemble(source, config)?;
    for warning in &image.warnings {
        warn!("{}", warning);
    }

    let mut memory = Memory::new();
    memory.load_image(image.text_start, &image.text_words, image.data_start, &image.data_bytes);

    let mut cpu = Cpu::new();
    let mut reason = StopReason::StepLimitReached;

    for _ in 0..max_steps {
        let mask = cpu.step_with(
            &mut memory,
            Some(&mut |event: &StepEvent| match event {
                StepEvent::Exception(mask) => warn!("step raised exception mask {:#x}", mask),
                StepEvent::Halted => warn!("processor halted"),
            }),
        );
        if mask != 0 {
            reason = StopReason::Exception(mask);
            break;
        }
        if cpu.halted() {
            reason = StopReason::Halted;
            break;
        }
    }

    Ok(RunOutcome { pc: cpu.pc(), cycle: cpu.cycle(), registers: cpu.registers().as_slice().to_vec(), reason })
}

/// Prints a run's final state the way the CLI reports it: `pc`, `cycle`,
/// why the run stopped, then the full register file.
pub fn print_outcome(outcome: &RunOutcome) {
    println!("pc:    {:#010x}", outcome.pc);
    println!("cycle: {}", outcome.cycle);
    match outcome.reason {
        StopReason::Exception(mask) => println!("stopped: exception mask {:#x}", mask),
        StopReason::Halted => println!("stopped: halted (syscall)"),
        StopReason::StepLimitReached => println!("stopped: step limit reached"),
    }
    println!("registers:");
    for (index, value) in outcome.registers.iter().enumerate() {
        println!("  ${:<2} = {:#010x}", index, value);
    }
}

#[cfg(test)]
mod test;
