//! MEM output: memory contents as hex text for `data2mem`.

use std::io::{self, Write};

use crate::assembler::AssembledImages;
use crate::memory::Cell;

const PROGRAM_WORDS_PER_LINE: usize = 8;
const DATA_WORDS_PER_LINE: usize = 16;
/// Byte address of the data memory in the processor's address map.
pub const DATA_BASE_ADDRESS: usize = 0x1_0000;

/// Writes both memories as `data2mem` hex lines, program memory first. Every line starts with the byte address of its
/// first word; free cells are written as zero.
///
/// # Errors
/// Any I/O error of the sink.
pub fn write_mem(images: &AssembledImages, out: &mut impl Write) -> io::Result<()> {
	write_lines(out, images.program().cells(), PROGRAM_WORDS_PER_LINE, |index| index * 4, 8)?;
	write_lines(out, images.data().cells(), DATA_WORDS_PER_LINE, |index| DATA_BASE_ADDRESS + index * 2, 4)
}

fn write_lines(
	out: &mut impl Write,
	cells: &[Cell],
	words_per_line: usize,
	byte_address: impl Fn(usize) -> usize,
	digits: usize,
) -> io::Result<()> {
	for (line, words) in cells.chunks(words_per_line).enumerate() {
		write!(out, "@{:05X}", byte_address(line * words_per_line))?;
		for word in words {
			write!(out, " {:0digits$X}", word.value())?;
		}
		writeln!(out)?;
	}
	Ok(())
}
