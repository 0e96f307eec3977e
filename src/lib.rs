//! jpu16asm core library.
//!
//! This crate contains the resolution engine of the JPU16 two-pass assembler: the memory image allocator for the
//! program and data address spaces, the symbol table, the deferred action queue recorded during pass 1 and the driver
//! that replays that queue on an evaluation stack during pass 2. A front end feeds an [`AssemblySession`] while it
//! scans the source; once it is done, [`AssemblySession::resolve`] produces the final [`AssembledImages`] that the
//! [`output`] emitters turn into VHDL, MEM and BMM files.
//!
//! ```
//! use jpu16asm::{AssemblySession, BinaryOperator, MemoryOptions};
//!
//! let mut session = AssemblySession::new(MemoryOptions::default());
//! // `jump target` with `target` defined further down: reserve the word with an empty literal field...
//! let jump = session.reserve_program_value(0x0034_0000, 1).unwrap();
//! session.enqueue_symbol("target", 1);
//! session.enqueue_store_program(jump, 1);
//! // ...and patch it once the label is known.
//! session.define_symbol("target", 0x0123, 7);
//! // `data: dw 10 + 3`
//! session.enqueue_literal(10, 8);
//! session.enqueue_literal(3, 8);
//! session.enqueue_operator(BinaryOperator::Add, false, 8);
//! session.enqueue_store_data(4, 8);
//!
//! let images = session.resolve().unwrap();
//! assert_eq!(images.program().cell(jump).value(), 0x0034_0123);
//! assert_eq!(images.data().cell(4).value(), 13);
//! ```
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod assembler;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
mod error;
pub mod memory;
pub mod output;

pub use assembler::{AssembledImages, AssemblySession, BinaryOperator, MemoryUsage, Operator, UnaryOperator};
pub use config::{Capacity, DataCapacity, MemoryOptions, ProgramCapacity};
pub use error::AssemblyError;
pub use memory::{Cell, MemoryImage, MemoryKind};

/// Line number within the assembly source, as reported by the front end.
pub type SourceLine = usize;

/// Address of a cell in either of the two memory images.
///
/// Both backing arrays have exactly 65536 cells, so every value of this type addresses a valid cell.
pub type MemoryAddress = u16;

#[cfg(test)]
mod test;
