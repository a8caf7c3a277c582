//! Reduce command implementation.

use super::read_links;
use crate::cli::ReduceArgs;
use crate::error::Result;
use crate::output::Formatter;
use caevo_domain::{RelationMode, TLink};

/// Execute the reduce command.
pub fn execute_reduce(args: ReduceArgs, formatter: &Formatter) -> Result<()> {
    let links = reduce_links(read_links(&args.input)?, args.mode);
    println!("{}", formatter.format_links(&links)?);
    Ok(())
}

/// Collapse every link to `mode`.
pub fn reduce_links(mut links: Vec<TLink>, mode: RelationMode) -> Vec<TLink> {
    for link in &mut links {
        link.reduce(mode);
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use caevo_domain::Relation;

    #[test]
    fn test_tempeval_reduction() {
        let links = reduce_links(
            vec![
                TLink::new("e1", "e2", Relation::IBefore),
                TLink::new("e2", "e3", Relation::Simultaneous),
            ],
            RelationMode::Tempeval,
        );
        assert_eq!(links[0].relation, Relation::Before);
        assert_eq!(links[1].relation, Relation::Overlap);
    }

    #[test]
    fn test_full_mode_is_identity() {
        let original = vec![TLink::new("e1", "e2", Relation::Begins)];
        assert_eq!(reduce_links(original.clone(), RelationMode::Full), original);
    }
}
