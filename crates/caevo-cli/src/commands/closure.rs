//! Closure command implementation.

use super::read_links;
use crate::cli::ClosureArgs;
use crate::error::Result;
use crate::output::Formatter;
use caevo_closure::{ClosureConfig, ClosureEngine, ClosureReport, CompositionTable};
use caevo_domain::TLink;
use caevo_store::LinkGraph;
use std::fs;

/// Execute the closure command.
pub fn execute_closure(args: ClosureArgs, formatter: &Formatter) -> Result<()> {
    let links = read_links(&args.input)?;
    let engine = build_engine(&args)?;
    let (graph, report) = close_links(&engine, links);

    let output: Vec<TLink> = if args.all {
        graph.iter().cloned().chain(report.links.iter().cloned()).collect()
    } else {
        report.links.clone()
    };
    println!("{}", formatter.format_links(&output)?);

    if report.capped {
        eprintln!(
            "{}",
            formatter.warning(&format!("Stopped after {} passes without reaching a fixed point", report.passes))
        );
    }
    if !report.is_consistent() {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} conflicting inference(s)", report.conflicts.len()))
        );
        eprintln!("{}", formatter.format_conflicts(&report.conflicts)?);
    }

    Ok(())
}

/// Engine for the rule file and strictness the arguments ask for.
pub fn build_engine(args: &ClosureArgs) -> Result<ClosureEngine> {
    let config = if args.strict {
        ClosureConfig::strict()
    } else {
        ClosureConfig::default()
    };
    let table = match &args.rules {
        Some(path) => CompositionTable::from_rules(&fs::read_to_string(path)?)?,
        None => CompositionTable::derived(),
    };
    Ok(ClosureEngine::with_table(table, config)?)
}

/// Load `links` into a graph and close it.
///
/// Links that duplicate or contradict an earlier one are dropped before
/// closure runs.
pub fn close_links(engine: &ClosureEngine, links: Vec<TLink>) -> (LinkGraph, ClosureReport) {
    let mut graph = LinkGraph::new();
    for link in links {
        let outcome = graph.insert(link);
        if !outcome.is_added() {
            tracing::debug!(?outcome, "Input link not stored");
        }
    }
    let report = engine.expand(&graph);
    tracing::info!(
        input = graph.len(),
        inferred = report.links.len(),
        conflicts = report.conflicts.len(),
        "Closure finished"
    );
    (graph, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caevo_domain::Relation;
    use std::io::Write;
    use std::path::PathBuf;

    fn args(rules: Option<PathBuf>, strict: bool) -> ClosureArgs {
        ClosureArgs {
            input: PathBuf::from("unused.json"),
            rules,
            strict,
            all: false,
        }
    }

    #[test]
    fn test_close_chain() {
        let engine = build_engine(&args(None, false)).unwrap();
        let (graph, report) = close_links(
            &engine,
            vec![
                TLink::new("e1", "e2", Relation::Before),
                TLink::new("e2", "e3", Relation::Before),
                TLink::new("e2", "e1", Relation::After),
            ],
        );
        assert_eq!(graph.len(), 2);
        assert_eq!(report.links.len(), 1);
        assert!(report.links[0].compare_to_tlink(&TLink::new("e1", "e3", Relation::Before)));
    }

    #[test]
    fn test_rule_file_engine() {
        let mut rules = tempfile::NamedTempFile::new().unwrap();
        writeln!(rules, "// only one rule\nBEFORE BEFORE BEFORE").unwrap();
        let engine = build_engine(&args(Some(rules.path().to_path_buf()), true)).unwrap();
        assert_eq!(engine.table().rule_count(), 1);
        assert!(!engine.config().tolerate_subsumed);

        let (_, report) = close_links(
            &engine,
            vec![
                TLink::new("e1", "e2", Relation::Includes),
                TLink::new("e2", "e3", Relation::Includes),
            ],
        );
        assert!(report.links.is_empty());
    }

    #[test]
    fn test_bad_rule_file() {
        let mut rules = tempfile::NamedTempFile::new().unwrap();
        writeln!(rules, "BEFORE BEFORE").unwrap();
        let result = build_engine(&args(Some(rules.path().to_path_buf()), false));
        assert!(matches!(result, Err(crate::CliError::Closure(_))));
    }
}
