//! Symbol table.

use flexstr::SharedStr;
use log::{debug, trace};

use crate::SourceLine;
use crate::error::AssemblyError;

/// A named value defined during pass 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
	/// Name as written in the source.
	pub name:  SharedStr,
	/// Resolved value.
	pub value: i32,
	/// Line the symbol was defined on.
	pub line:  SourceLine,
}

/// Append-only sequence of symbols. Names are not unique; the first definition of a name wins every lookup.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
	symbols: Vec<Symbol>,
}

impl SymbolTable {
	/// Creates an empty table.
	#[must_use]
	pub const fn new() -> Self {
		Self { symbols: Vec::new() }
	}

	/// Appends a symbol. Earlier symbols of the same name keep shadowing it.
	pub fn insert(&mut self, name: impl Into<SharedStr>, value: i32, line: SourceLine) {
		let name = name.into();
		if self.get(name.as_str()).is_some() {
			debug!("symbol {name} redefined on line {line}, the first definition stays in effect");
		}
		trace!("symbol {name} = {value:#x} (line {line})");
		self.symbols.push(Symbol { name, value, line });
	}

	/// The first symbol inserted under this name.
	#[must_use]
	pub fn find(&self, name: &str) -> Option<&Symbol> {
		self.symbols.iter().find(|symbol| symbol.name.as_str() == name)
	}

	/// Value of the first symbol inserted under this name.
	#[must_use]
	pub fn get(&self, name: &str) -> Option<i32> {
		self.find(name).map(|symbol| symbol.value)
	}

	/// Value of the first symbol inserted under this name.
	///
	/// # Errors
	/// [`AssemblyError::UndefinedSymbol`] if no symbol has this name. The error carries the line of the reference.
	pub fn lookup(&self, name: &SharedStr, line: SourceLine) -> Result<i32, Box<AssemblyError>> {
		self.get(name.as_str()).ok_or_else(|| AssemblyError::UndefinedSymbol { name: name.clone(), line }.into())
	}

	/// Drops every symbol.
	pub fn release_all(&mut self) {
		debug!("releasing {} symbols", self.symbols.len());
		self.symbols = Vec::new();
	}

	/// Number of symbols, counting every redefinition.
	#[must_use]
	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	/// Whether the table holds no symbols.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}
}
