//! Command-line interface tests.

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;
use log::LevelFilter;
use rstest::rstest;

use super::{AssemblerCli, finish};
use crate::assembler::{AssemblySession, MemoryUsage};
use crate::output::OutputFormat;
use crate::{DataCapacity, ProgramCapacity};

#[test]
fn defaults() {
	let arguments = AssemblerCli::try_parse_from(["jpu16asm", "program.asm"]).unwrap();
	assert_eq!(arguments.input, Path::new("program.asm"));
	assert_eq!(arguments.program_size, ProgramCapacity::Instructions512);
	assert_eq!(arguments.ram_size, DataCapacity::Words1024);
	assert_eq!(arguments.verbose, 0);
	assert_eq!(arguments.log_level(), LevelFilter::Warn);
	assert!(arguments.requested_outputs().is_empty());
}

#[test]
fn all_outputs() {
	let arguments = AssemblerCli::try_parse_from([
		"jpu16asm", "program.asm", "-v", "a.vhd", "-R", "b.vhd", "--mem", "c.mem", "-b", "d.bmm", "-p", "4096", "--ram-size",
		"32768",
	])
	.unwrap();
	assert_eq!(arguments.requested_outputs(), vec![
		(OutputFormat::Vhdl, Path::new("a.vhd")),
		(OutputFormat::VhdlRamb16, Path::new("b.vhd")),
		(OutputFormat::Mem, Path::new("c.mem")),
		(OutputFormat::Bmm, Path::new("d.bmm")),
	]);
	let options = arguments.memory_options();
	assert_eq!(options.program, ProgramCapacity::Instructions4096);
	assert_eq!(options.data, DataCapacity::Words32768);
}

#[rstest]
#[case(&["-p", "500"])]
#[case(&["-p", "32768"])]
#[case(&["-r", "512"])]
#[case(&["--ram-size", "lots"])]
fn invalid_capacity(#[case] flags: &[&str]) {
	let arguments = ["jpu16asm", "program.asm"].iter().chain(flags);
	let error = AssemblerCli::try_parse_from(arguments).unwrap_err();
	assert_eq!(error.kind(), clap::error::ErrorKind::ValueValidation);
}

#[rstest]
#[case(0, LevelFilter::Warn)]
#[case(1, LevelFilter::Info)]
#[case(2, LevelFilter::Debug)]
#[case(3, LevelFilter::Trace)]
#[case(7, LevelFilter::Trace)]
fn verbosity(#[case] count: usize, #[case] level: LevelFilter) {
	let mut arguments = vec!["jpu16asm".to_owned(), "program.asm".to_owned()];
	arguments.extend(std::iter::repeat_n("--verbose".to_owned(), count));
	assert_eq!(AssemblerCli::try_parse_from(arguments).unwrap().log_level(), level);
}

#[test]
fn logging_initializes_once() {
	let arguments = AssemblerCli::try_parse_from(["jpu16asm", "program.asm", "--verbose"]).unwrap();
	arguments.init_logging().unwrap();
	assert!(arguments.init_logging().is_err());
}

#[test]
fn finish_writes_requested_outputs() {
	let directory = std::env::temp_dir().join(format!("jpu16asm-cli-{}", std::process::id()));
	std::fs::create_dir_all(&directory).unwrap();
	let mem = directory.join("out.mem");
	let bmm = directory.join("out.bmm");
	let arguments = AssemblerCli::try_parse_from::<_, OsString>([
		"jpu16asm".into(),
		"program.asm".into(),
		"-m".into(),
		mem.clone().into_os_string(),
		"-b".into(),
		bmm.clone().into_os_string(),
	])
	.unwrap();

	let mut session = AssemblySession::new(arguments.memory_options());
	session.reserve_program_value(0x0010_0000, 1).unwrap();
	session.enqueue_symbol("value", 1);
	session.enqueue_store_program(0, 1);
	session.define_symbol("value", 0x0BCD, 2);
	let usage = finish(session, &arguments).unwrap();
	assert_eq!(usage, MemoryUsage { program: 1, data: 0 });

	let mem_contents = std::fs::read_to_string(&mem).unwrap();
	assert!(mem_contents.starts_with("@00000 00100BCD 00000000"));
	assert!(std::fs::read_to_string(&bmm).unwrap().starts_with("ADDRESS_MAP JPU16 PPC405 0\n"));
	assert!(!directory.join("out.vhd").exists());
	std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn finish_reports_assembly_errors() {
	let arguments = AssemblerCli::try_parse_from(["jpu16asm", "program.asm"]).unwrap();
	let mut session = AssemblySession::new(arguments.memory_options());
	session.enqueue_symbol("missing", 4);
	let report = finish(session, &arguments).unwrap_err();
	assert_eq!(report.to_string(), "Line 4: undefined symbol: missing");
	assert_eq!(report.code().map(|code| code.to_string()).as_deref(), Some("jpu16asm::undefined_symbol"));
}
