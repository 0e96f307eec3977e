//! Command-line interface shared by assembler front ends.
//!
//! A front end parses its arguments with [`AssemblerCli`], calls [`AssemblerCli::init_logging`] and
//! [`install_report_hook`], creates an [`AssemblySession`] from [`AssemblerCli::memory_options`], runs pass 1 over
//! [`AssemblerCli::input`] and hands the session to [`finish`].

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{LevelFilter, info, warn};
use time::macros::format_description;

use crate::assembler::{AssemblySession, MemoryUsage};
use crate::config::{Capacity, DataCapacity, MemoryOptions, ProgramCapacity};
use crate::error::AssemblyError;
use crate::output::OutputFormat;

#[cfg(test)]
mod test;

/// JPU16 assembler.
#[derive(Clone, Debug, Parser)]
#[command(name = "jpu16asm", author, version, about, long_about = None)]
pub struct AssemblerCli {
	/// Assembly file to assemble.
	pub input:        PathBuf,
	/// Generic VHDL output file.
	#[arg(long, short = 'v', value_name = "FILE")]
	pub vhdl:         Option<PathBuf>,
	/// VHDL output file using RAMB16 block RAM primitives.
	#[arg(long = "vhdl-ramb16", short = 'R', value_name = "FILE")]
	pub vhdl_ramb16:  Option<PathBuf>,
	/// MEM output file for data2mem.
	#[arg(long, short = 'm', value_name = "FILE")]
	pub mem:          Option<PathBuf>,
	/// BMM memory map output file for data2mem.
	#[arg(long, short = 'b', value_name = "FILE")]
	pub bmm:          Option<PathBuf>,
	/// Program memory size in instructions: 512, 1024, 2048, 4096, 8192 or 16384.
	#[arg(
		long = "program-size",
		short = 'p',
		value_name = "SIZE",
		default_value = "512",
		value_parser = parse_capacity::<ProgramCapacity>
	)]
	pub program_size: ProgramCapacity,
	/// Data memory size in words: 1024, 2048, 4096, 8192, 16384 or 32768.
	#[arg(
		long = "ram-size",
		short = 'r',
		value_name = "SIZE",
		default_value = "1024",
		value_parser = parse_capacity::<DataCapacity>
	)]
	pub ram_size:     DataCapacity,
	/// Verbosity level to use.
	#[arg(long, action = clap::ArgAction::Count)]
	pub verbose:      u8,
}

fn parse_capacity<C: Capacity>(value: &str) -> Result<C, String> {
	let count = value.parse::<usize>().map_err(|error| error.to_string())?;
	C::from_count(count).map_err(|error| {
		let help = miette::Diagnostic::help(&*error).map(|help| help.to_string()).unwrap_or_default();
		format!("{error}. {help}")
	})
}

impl AssemblerCli {
	/// Memory capacities selected on the command line.
	#[must_use]
	pub const fn memory_options(&self) -> MemoryOptions {
		MemoryOptions { program: self.program_size, data: self.ram_size }
	}

	/// Every output file requested on the command line, with its format.
	#[must_use]
	pub fn requested_outputs(&self) -> Vec<(OutputFormat, &Path)> {
		[
			(OutputFormat::Vhdl, &self.vhdl),
			(OutputFormat::VhdlRamb16, &self.vhdl_ramb16),
			(OutputFormat::Mem, &self.mem),
			(OutputFormat::Bmm, &self.bmm),
		]
		.into_iter()
		.filter_map(|(format, path)| path.as_deref().map(|path| (format, path)))
		.collect()
	}

	/// Log level selected by the number of `--verbose` flags.
	#[must_use]
	pub const fn log_level(&self) -> LevelFilter {
		match self.verbose {
			0 => LevelFilter::Warn,
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			3 .. => LevelFilter::Trace,
		}
	}

	/// Installs the global logger at the selected verbosity.
	///
	/// # Errors
	/// If a logger is already installed.
	pub fn init_logging(&self) -> miette::Result<()> {
		simple_logger::SimpleLogger::new()
			.with_level(self.log_level())
			.with_local_timestamps()
			.with_timestamp_format(format_description!(version = 2, "[hour]:[minute]:[second]"))
			.init()
			.map_err(|error| miette::miette!("could not initialize logging: {error}"))
	}
}

/// Installs the diagnostic report handler used for all errors of the command line.
///
/// # Errors
/// If a handler is already installed.
pub fn install_report_hook() -> miette::Result<()> {
	miette::set_hook(Box::new(|_| {
		Box::new(miette::MietteHandlerOpts::new().unicode(true).context_lines(3).tab_width(4).with_cause_chain().build())
	}))?;
	Ok(())
}

/// Runs pass 2 on a session whose pass 1 is complete and writes every output file requested on the command line.
///
/// # Errors
/// The first assembly or output error.
pub fn finish(session: AssemblySession, arguments: &AssemblerCli) -> miette::Result<MemoryUsage> {
	let images = session.resolve().map_err(AssemblyError::from)?;
	let usage = images.used_counts();

	let outputs = arguments.requested_outputs();
	if outputs.is_empty() {
		warn!("No output files requested, {} was only checked", arguments.input.display());
	}
	for (format, path) in outputs {
		format.write_to_file(&images, path).map_err(AssemblyError::from)?;
	}
	info!("Operation completed successfully");
	Ok(usage)
}
