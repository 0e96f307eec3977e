//! Output file generation.
//!
//! All emitters read the frozen [`AssembledImages`] and write to any [`Write`] sink.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::assembler::AssembledImages;
use crate::config::Capacity;
use crate::error::AssemblyError;

pub mod bmm;
pub mod mem;
pub mod ramb16;
pub mod vhdl;


/// The supported output file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
	/// Behavioral VHDL arrays.
	Vhdl,
	/// VHDL instantiating RAMB16 block RAMs.
	VhdlRamb16,
	/// `data2mem` memory contents.
	Mem,
	/// `data2mem` block RAM memory map.
	Bmm,
}

impl OutputFormat {
	/// Writes the images in this format.
	///
	/// # Errors
	/// Any I/O error of the sink.
	pub fn write(self, images: &AssembledImages, out: &mut impl Write) -> io::Result<()> {
		match self {
			Self::Vhdl => vhdl::write_vhdl(images, out),
			Self::VhdlRamb16 => ramb16::write_vhdl_ramb16(images, out),
			Self::Mem => mem::write_mem(images, out),
			Self::Bmm => bmm::write_bmm(images, out),
		}
	}

	/// Creates (or truncates) a file and writes the images into it in this format.
	///
	/// # Errors
	/// [`AssemblyError::OutputFile`] if the file cannot be created or written.
	pub fn write_to_file(self, images: &AssembledImages, path: &Path) -> Result<(), Box<AssemblyError>> {
		let to_error = |os_error| AssemblyError::OutputFile { os_error, path: path.to_owned() };
		let mut out = BufWriter::new(File::create(path).map_err(to_error)?);
		self.write(images, &mut out).and_then(|()| out.flush()).map_err(to_error)?;
		info!("{self} output written to {}", path.display());
		Ok(())
	}
}

impl Display for OutputFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::Vhdl => "VHDL",
			Self::VhdlRamb16 => "VHDL (RAMB16)",
			Self::Mem => "MEM",
			Self::Bmm => "BMM",
		})
	}
}

/// Writes the `JPU16_MEM_SIZE_DEFS` package both VHDL flavors start with.
fn write_size_package(images: &AssembledImages, out: &mut impl Write) -> io::Result<()> {
	let options = images.options();
	writeln!(out, "{}", "-".repeat(46))?;
	writeln!(out, "-- Package with the memory size definitions --")?;
	writeln!(out, "{}", "-".repeat(46))?;
	writeln!(out, "package JPU16_MEM_SIZE_DEFS is")?;
	writeln!(out, "   constant nBits_DirProg: integer := {};", options.program.address_bits())?;
	writeln!(out, "   constant nBits_DirDatos: integer := {};", options.data.address_bits())?;
	writeln!(out, "end JPU16_MEM_SIZE_DEFS;")
}
