//! Integration tests for caevo-closure

use caevo_closure::{ClosureConfig, ClosureEngine, CompositionTable};
use caevo_domain::{Relation, TLink};
use caevo_store::LinkGraph;
use proptest::prelude::*;

fn link(a: &str, b: &str, r: Relation) -> TLink {
    TLink::new(a, b, r)
}

#[test]
fn test_closure_fixture() {
    let graph = LinkGraph::from_links(vec![
        link("e1", "e2", Relation::Before),
        link("e3", "e7", Relation::Simultaneous),
        link("e2", "e3", Relation::Includes),
        link("e3", "e4", Relation::After),
        link("e5", "e3", Relation::IsIncluded),
        link("e10", "e11", Relation::Simultaneous),
        link("e12", "e11", Relation::Simultaneous),
    ]);

    let expected = vec![
        link("e1", "e3", Relation::Before),
        link("e1", "e5", Relation::Before),
        link("e1", "e7", Relation::Before),
        link("e4", "e5", Relation::Before),
        link("e4", "e7", Relation::Before),
        link("e2", "e5", Relation::Includes),
        link("e2", "e7", Relation::Includes),
        link("e7", "e5", Relation::Includes),
        link("e10", "e12", Relation::Simultaneous),
    ];

    let report = ClosureEngine::default().expand(&graph);
    assert!(report.is_consistent());
    assert!(!report.capped);
    assert_eq!(report.links.len(), expected.len());
    for want in &expected {
        assert!(
            report.links.iter().any(|got| got.compare_to_tlink(want)),
            "missing {want}"
        );
    }
    assert!(report.links.iter().all(|l| l.closed));
}

#[test]
fn test_rule_file_matches_derived_table() {
    let derived = CompositionTable::derived();
    let mut text = String::from("// chain form\nB-A A-C\n");
    for (r1, r2, r3) in derived.rules() {
        text.push_str(&format!("{r1} {r2} {r3}\n"));
    }

    let loaded = CompositionTable::from_rules(&text).unwrap();
    assert_eq!(loaded, derived);

    let engine = ClosureEngine::with_table(loaded, ClosureConfig::default()).unwrap();
    let graph = LinkGraph::from_links(vec![
        link("t1", "t2", Relation::Before),
        link("t2", "e1", Relation::Includes),
    ]);
    let closed = engine.compute_closure(&graph);
    assert_eq!(closed.len(), 1);
    assert!(closed[0].compare_to_tlink(&link("t1", "e1", Relation::Before)));
}

#[test]
fn test_config_toml_roundtrip() {
    let config = ClosureConfig::strict();
    let text = toml::to_string(&config).unwrap();
    let parsed: ClosureConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);

    let partial: ClosureConfig = toml::from_str("pass_factor = 2").unwrap();
    assert!(partial.tolerate_subsumed);
}

fn definite_relation() -> impl Strategy<Value = Relation> {
    prop::sample::select(vec![
        Relation::Before,
        Relation::After,
        Relation::IBefore,
        Relation::Includes,
        Relation::IsIncluded,
        Relation::Begins,
        Relation::EndedBy,
        Relation::Simultaneous,
        Relation::Overlap,
        Relation::Vague,
    ])
}

fn small_graph() -> impl Strategy<Value = LinkGraph> {
    prop::collection::vec((0u8..6, 0u8..6, definite_relation()), 0..12).prop_map(|edges| {
        LinkGraph::from_links(
            edges
                .into_iter()
                .map(|(a, b, r)| TLink::new(format!("e{a}"), format!("e{b}"), r)),
        )
    })
}

proptest! {
    /// Property: closing an already closed graph adds nothing
    #[test]
    fn test_closure_idempotent(graph in small_graph()) {
        let engine = ClosureEngine::default();
        let report = engine.expand(&graph);
        prop_assume!(!report.capped);

        let mut closed = graph.clone();
        closed.extend(report.links.clone());
        prop_assert_eq!(closed.len(), graph.len() + report.links.len());
        prop_assert!(engine.compute_closure(&closed).is_empty());
    }

    /// Property: inferred links never touch a pair the graph already held
    #[test]
    fn test_closure_never_overwrites(graph in small_graph()) {
        let report = ClosureEngine::default().expand(&graph);
        for inferred in &report.links {
            prop_assert!(graph.lookup(&inferred.id1, &inferred.id2).is_none());
            prop_assert!(inferred.id1 != inferred.id2);
        }
    }
}
