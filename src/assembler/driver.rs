//! Pass 2: replaying the deferred action queue.

use log::{debug, trace};

use super::AssemblySession;
use super::action::{DeferredAction, Operator};
use super::stack::EvaluationStack;
use crate::error::AssemblyError;

/// Whether the driver still has actions to replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	/// Actions remain in the queue.
	Running,
	/// The queue is drained and the symbol table has been released.
	Done,
}

/// Drains a session's action queue against one evaluation stack.
#[derive(Debug)]
pub struct ResolutionDriver<'session> {
	session: &'session mut AssemblySession,
	stack:   EvaluationStack,
	state:   DriverState,
}

impl<'session> ResolutionDriver<'session> {
	/// Starts pass 2 on a session with a fresh evaluation stack.
	#[must_use]
	pub const fn new(session: &'session mut AssemblySession) -> Self {
		Self { session, stack: EvaluationStack::new(), state: DriverState::Running }
	}

	/// Replays the oldest pending action. When no action is left, releases the symbol table and transitions to
	/// [`DriverState::Done`]; stepping a finished driver does nothing.
	///
	/// # Errors
	/// Any error raised by the action. The action is consumed either way.
	pub fn step(&mut self) -> Result<DriverState, Box<AssemblyError>> {
		if self.state == DriverState::Done {
			return Ok(DriverState::Done);
		}
		match self.session.actions.dequeue() {
			Some(action) => self.execute(action)?,
			None => self.finish(),
		}
		Ok(self.state)
	}

	/// Steps until the queue is drained.
	///
	/// # Errors
	/// The first error raised by any action; the remaining actions are not replayed.
	pub fn run(&mut self) -> Result<(), Box<AssemblyError>> {
		while self.step()? == DriverState::Running {}
		Ok(())
	}

	/// Current state.
	#[must_use]
	pub const fn state(&self) -> DriverState {
		self.state
	}

	/// The evaluation stack, e.g. to inspect leftover values.
	#[must_use]
	pub const fn stack(&self) -> &EvaluationStack {
		&self.stack
	}

	fn execute(&mut self, action: DeferredAction) -> Result<(), Box<AssemblyError>> {
		trace!("replaying {action}");
		match action {
			DeferredAction::PushLiteral { value, .. } => self.stack.push(value),
			DeferredAction::PushSymbol { name, line } => {
				let value = self.session.symbols.lookup(&name, line)?;
				self.stack.push(value);
			},
			DeferredAction::ApplyOperator { operator: Operator::Unary(operator), line, .. } => {
				let value = self.stack.pop(line)?;
				self.stack.push(operator.execute(value));
			},
			DeferredAction::ApplyOperator { operator: Operator::Binary(operator), swap_operands, line } => {
				let (lhs, rhs) = if swap_operands {
					let lhs = self.stack.pop(line)?;
					(lhs, self.stack.pop(line)?)
				} else {
					let rhs = self.stack.pop(line)?;
					(self.stack.pop(line)?, rhs)
				};
				self.stack.push(operator.execute(lhs, rhs, line)?);
			},
			DeferredAction::StoreToData { address, line } => {
				let value = self.stack.pop(line)?;
				self.session.data.store_at(address, value);
			},
			DeferredAction::StoreToProgram { address, line } => {
				let value = self.stack.pop(line)?;
				self.session.program.store_at(address, value);
			},
		}
		Ok(())
	}

	fn finish(&mut self) {
		if !self.stack.is_empty() {
			debug!("{} values left on the evaluation stack after pass 2: {:?}", self.stack.len(), self.stack.values());
		}
		self.session.symbols.release_all();
		self.state = DriverState::Done;
	}
}
