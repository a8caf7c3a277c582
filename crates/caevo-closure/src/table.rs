//! Composition table for closure
//!
//! The table is keyed in chain form: `compose(R1, R2)` is the relation
//! `a → c` given `a → b : R1` and `b → c : R2`.

use crate::algebra::BaseComposition;
use crate::error::ClosureError;
use caevo_domain::Relation;
use std::fmt;

/// Partial map `Relation × Relation → Relation`
#[derive(Clone, PartialEq, Eq)]
pub struct CompositionTable {
    cells: [[Option<Relation>; Relation::COUNT]; Relation::COUNT],
}

impl fmt::Debug for CompositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionTable")
            .field("rules", &self.rule_count())
            .finish()
    }
}

impl Default for CompositionTable {
    fn default() -> Self {
        Self::derived()
    }
}

/// Which pair of endpoints the two premises share, as written in rule files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleCase {
    /// `A→B : R1`, `A→C : R2`
    SharedFirst,
    /// `A→B : R1`, `C→A : R2`
    FirstThenSecond,
    /// `B→A : R1`, `A→C : R2`
    Chain,
    /// `B→A : R1`, `C→A : R2`
    SharedSecond,
}

impl RuleCase {
    fn from_header(line: &str) -> Option<Self> {
        if line.contains("A-B A-C") {
            Some(RuleCase::SharedFirst)
        } else if line.contains("A-B C-A") {
            Some(RuleCase::FirstThenSecond)
        } else if line.contains("B-A A-C") {
            Some(RuleCase::Chain)
        } else if line.contains("B-A C-A") {
            Some(RuleCase::SharedSecond)
        } else {
            None
        }
    }

    /// Rewrite a rule's premises as a `B → A → C` chain
    fn to_chain(self, r1: Relation, r2: Relation) -> (Relation, Relation) {
        match self {
            RuleCase::SharedFirst => (r1.invert(), r2),
            RuleCase::FirstThenSecond => (r1.invert(), r2.invert()),
            RuleCase::Chain => (r1, r2),
            RuleCase::SharedSecond => (r1, r2.invert()),
        }
    }
}

impl CompositionTable {
    /// An empty table that infers nothing
    pub fn empty() -> Self {
        Self {
            cells: [[None; Relation::COUNT]; Relation::COUNT],
        }
    }

    /// Table derived from interval algebra
    ///
    /// # Examples
    ///
    /// ```
    /// use caevo_closure::CompositionTable;
    /// use caevo_domain::Relation;
    ///
    /// let table = CompositionTable::derived();
    /// assert_eq!(table.compose(Relation::Before, Relation::Before), Some(Relation::Before));
    /// assert_eq!(table.compose(Relation::Before, Relation::After), None);
    /// ```
    pub fn derived() -> Self {
        let base = BaseComposition::derive();
        let mut table = Self::empty();
        for r1 in Relation::ALL {
            for r2 in Relation::ALL {
                table.cells[r1.index()][r2.index()] = base.compose(r1, r2);
            }
        }
        table
    }

    /// Load a table from the four-case rule file format
    ///
    /// Section headers contain one of `A-B A-C`, `A-B C-A`, `B-A A-C` or
    /// `B-A C-A`. Any other line containing `/` is a comment. Rule lines hold
    /// three relation names: the two premises and the conclusion `B → C`.
    /// Rules before the first header belong to the `A-B A-C` case.
    pub fn from_rules(text: &str) -> Result<Self, ClosureError> {
        let mut table = Self::empty();
        let mut case = RuleCase::SharedFirst;
        let mut loaded = 0usize;

        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if let Some(header) = RuleCase::from_header(line) {
                case = header;
                continue;
            }
            if line.is_empty() || line.contains('/') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 3 {
                return Err(ClosureError::MalformedRule {
                    line: number + 1,
                    text: raw.to_string(),
                });
            }
            let parse = |s: &str| {
                Relation::normalize(s).map_err(|source| ClosureError::UnknownRelation {
                    line: number + 1,
                    source,
                })
            };
            let (r1, r2, r3) = (parse(parts[0])?, parse(parts[1])?, parse(parts[2])?);

            let (x, y) = case.to_chain(r1, r2);
            table.insert(x, y, r3);
            loaded += 1;
        }

        if loaded == 0 {
            tracing::warn!("Closure rule text contained no rules");
        } else {
            tracing::debug!(rules = loaded, distinct = table.rule_count(), "Loaded closure rules");
        }
        Ok(table)
    }

    /// Set `compose(r1, r2) = r3`, keeping the table closed under inversion
    pub fn insert(&mut self, r1: Relation, r2: Relation, r3: Relation) {
        self.cells[r1.index()][r2.index()] = Some(r3);
        self.cells[r2.invert().index()][r1.invert().index()] = Some(r3.invert());
    }

    /// The composed relation, or `None` when nothing definite follows
    pub fn compose(&self, r1: Relation, r2: Relation) -> Option<Relation> {
        self.cells[r1.index()][r2.index()]
    }

    /// Number of defined cells
    pub fn rule_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Every defined cell as `(r1, r2, r3)`
    pub fn rules(&self) -> impl Iterator<Item = (Relation, Relation, Relation)> + '_ {
        Relation::ALL.into_iter().flat_map(move |r1| {
            Relation::ALL
                .into_iter()
                .filter_map(move |r2| self.compose(r1, r2).map(|r3| (r1, r2, r3)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Relation::{
        After, Before, BeforeOrOverlap, Begins, IBefore, Includes, IsIncluded, OverlapOrAfter,
        Simultaneous, Unknown, Vague,
    };

    #[test]
    fn test_derived_core_cells() {
        let t = CompositionTable::derived();
        assert_eq!(t.compose(Before, Includes), Some(Before));
        assert_eq!(t.compose(Includes, Before), None);
        assert_eq!(t.compose(Before, Simultaneous), Some(Before));
        assert_eq!(t.compose(Simultaneous, Simultaneous), Some(Simultaneous));
        assert_eq!(t.compose(Includes, Includes), Some(Includes));
        assert_eq!(t.compose(IsIncluded, Before), Some(Before));
        assert_eq!(t.compose(Before, IsIncluded), None);
        assert_eq!(t.compose(IBefore, IBefore), Some(Before));
        assert_eq!(t.compose(Begins, Begins), Some(Begins));
        assert_eq!(t.compose(Vague, Before), None);
        assert_eq!(t.compose(Before, Unknown), None);
    }

    #[test]
    fn test_derived_never_outputs_disjunctions() {
        let t = CompositionTable::derived();
        for (_, _, r3) in t.rules() {
            assert_ne!(r3, BeforeOrOverlap);
            assert_ne!(r3, OverlapOrAfter);
            assert!(!r3.is_uninformative());
        }
    }

    #[test]
    fn test_derived_respects_inversion() {
        let t = CompositionTable::derived();
        for r1 in Relation::ALL {
            for r2 in Relation::ALL {
                assert_eq!(
                    t.compose(r1, r2).map(|r| r.invert()),
                    t.compose(r2.invert(), r1.invert()),
                    "{r1} {r2}"
                );
            }
        }
    }

    #[test]
    fn test_from_rules_cases() {
        let text = "\
// closure rules
A-B A-C
AFTER BEFORE BEFORE
// second case
B-A A-C
INCLUDES INCLUDES INCLUDES
";
        let t = CompositionTable::from_rules(text).unwrap();
        // A→B AFTER means B→A BEFORE, so B→A→C is BEFORE then BEFORE.
        assert_eq!(t.compose(Before, Before), Some(Before));
        assert_eq!(t.compose(After, After), Some(After));
        assert_eq!(t.compose(Includes, Includes), Some(Includes));
        assert_eq!(t.compose(Before, After), None);
    }

    #[test]
    fn test_from_rules_shared_second() {
        let t = CompositionTable::from_rules("B-A C-A\nBEFORE AFTER BEFORE\n").unwrap();
        // B→A BEFORE, C→A AFTER gives B→C BEFORE.
        assert_eq!(t.compose(Before, Before), Some(Before));
    }

    #[test]
    fn test_from_rules_errors() {
        let err = CompositionTable::from_rules("BEFORE BEFORE\n").unwrap_err();
        assert!(matches!(err, ClosureError::MalformedRule { line: 1, .. }));

        let err = CompositionTable::from_rules("A-B A-C\nBEFORE SOON BEFORE\n").unwrap_err();
        assert!(matches!(err, ClosureError::UnknownRelation { line: 2, .. }));
    }

    #[test]
    fn test_empty_rules() {
        let t = CompositionTable::from_rules("// nothing here\n").unwrap();
        assert_eq!(t.rule_count(), 0);
    }
}
