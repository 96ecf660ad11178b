//! Line-oriented front end: meta-commands, statement preparation and
//! execution against a [`Table`](crate::table::Table).

mod execute;
mod meta;
mod statement;

pub use execute::{execute, ExecuteResult};
pub use meta::MetaCommand;
pub use statement::{PrepareError, Statement};

/// A single line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Meta(MetaCommand),
    Statement(Statement),
}

impl Command {
    /// Classifies a trimmed input line and prepares it.
    pub fn parse(input: &str) -> Result<Command, PrepareError> {
        if let Some(meta) = MetaCommand::parse(input) {
            return Ok(Command::Meta(meta));
        }
        Statement::prepare(input).map(Command::Statement)
    }
}
