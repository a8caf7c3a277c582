//! Relations command implementation.

use crate::error::Result;
use crate::output::Formatter;

/// Execute the relations command.
pub fn execute_relations(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_relations()?);
    Ok(())
}
