#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;

use flexstr::SharedStr;
use miette::Diagnostic;
use thiserror::Error;

use crate::assembler::Operator;
use crate::memory::MemoryKind;
use crate::{MemoryAddress, SourceLine};

/// All types of errors that the assembler core can report to the user.
///
/// Every error aborts the assembly run; none of them are recoverable.
#[derive(Error, Debug, Diagnostic)]
#[allow(clippy::module_name_repetitions, missing_docs)]
pub enum AssemblyError {
	//#region Allocation errors: detected while pass 1 reserves memory
	#[error("Line {line}: end of {memory} exceeded ({capacity} {})", .memory.unit())]
	#[diagnostic(
		code(jpu16asm::memory_overflow),
		severity(Error),
		help("Select a larger {memory} capacity or reduce the amount of assembled {}", .memory.unit())
	)]
	MemoryOverflow { memory: MemoryKind, capacity: usize, line: SourceLine },

	#[error("Line {line}: {memory} address 0x{address:04X} is already in use")]
	#[diagnostic(
		code(jpu16asm::collision),
		severity(Error),
		help("Every memory address can only receive one value; check for overlapping placements")
	)]
	Collision { memory: MemoryKind, address: MemoryAddress, line: SourceLine },
	//#endregion

	//#region Resolution errors: detected while pass 2 replays deferred actions
	#[error("Line {line}: undefined symbol: {name}")]
	#[diagnostic(
		code(jpu16asm::undefined_symbol),
		severity(Error),
		help("Any symbol used in an expression must be defined somewhere. Did you misspell the symbol's name?")
	)]
	UndefinedSymbol { name: SharedStr, line: SourceLine },

	#[error("Line {line}: `{operator}` by zero")]
	#[diagnostic(code(jpu16asm::division_by_zero), severity(Error))]
	DivisionByZero { operator: Operator, line: SourceLine },

	#[error("Line {line}: {base} ** {exponent} does not fit into a 32-bit value")]
	#[diagnostic(code(jpu16asm::exponent_overflow), severity(Error))]
	ExponentOverflow { base: i32, exponent: i32, line: SourceLine },

	#[error("Line {line}: evaluation stack underflow")]
	#[diagnostic(
		code(jpu16asm::internal::stack_underflow),
		severity(Error),
		help(
			"The deferred actions for this line pop more values than they push. This is a bug in the assembler \
			 front end, not in your source code."
		)
	)]
	StackUnderflow { line: SourceLine },
	//#endregion

	//#region Configuration and output errors
	#[error("Invalid {memory} capacity: {requested} {}", .memory.unit())]
	#[diagnostic(
		code(jpu16asm::invalid_capacity),
		severity(Error),
		help("Valid capacities are {}", .legal.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))
	)]
	InvalidCapacity { memory: MemoryKind, requested: usize, legal: Vec<usize> },

	#[error("Could not write output file \"{}\"", .path.display())]
	#[diagnostic(code(jpu16asm::output_file), severity(Error))]
	OutputFile {
		#[source]
		os_error: std::io::Error,
		path:     PathBuf,
	},
	//#endregion
}

impl AssemblyError {
	/// Whether this error is caused by an inconsistent action sequence from the front end rather than by the user's
	/// source code.
	#[must_use]
	pub const fn is_internal(&self) -> bool {
		matches!(self, Self::StackUnderflow { .. })
	}

	/// The source line this error was raised for, if it relates to a line at all.
	#[must_use]
	pub const fn line(&self) -> Option<SourceLine> {
		match self {
			Self::MemoryOverflow { line, .. }
			| Self::Collision { line, .. }
			| Self::UndefinedSymbol { line, .. }
			| Self::DivisionByZero { line, .. }
			| Self::ExponentOverflow { line, .. }
			| Self::StackUnderflow { line } => Some(*line),
			Self::InvalidCapacity { .. } | Self::OutputFile { .. } => None,
		}
	}
}

impl From<Box<Self>> for AssemblyError {
	fn from(boxed: Box<Self>) -> Self {
		*boxed
	}
}
