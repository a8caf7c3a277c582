//! Interval algebra underlying the composition table
//!
//! Every definite relation denotes a set of Allen base relations between two
//! intervals. Base composition is derived by enumerating small intervals, so
//! no hand-written 13x13 table is needed.

use caevo_domain::Relation;

/// One of the thirteen Allen base relations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Base {
    Precedes,
    Meets,
    Overlaps,
    Starts,
    During,
    Finishes,
    Equals,
    FinishedBy,
    Contains,
    StartedBy,
    OverlappedBy,
    MetBy,
    PrecededBy,
}

impl Base {
    pub(crate) const ALL: [Base; 13] = [
        Base::Precedes,
        Base::Meets,
        Base::Overlaps,
        Base::Starts,
        Base::During,
        Base::Finishes,
        Base::Equals,
        Base::FinishedBy,
        Base::Contains,
        Base::StartedBy,
        Base::OverlappedBy,
        Base::MetBy,
        Base::PrecededBy,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Base relation holding between intervals `[a0, a1)` and `[b0, b1)`
    fn between(a: (u8, u8), b: (u8, u8)) -> Base {
        let ((a0, a1), (b0, b1)) = (a, b);
        if a1 < b0 {
            Base::Precedes
        } else if b1 < a0 {
            Base::PrecededBy
        } else if a1 == b0 {
            Base::Meets
        } else if b1 == a0 {
            Base::MetBy
        } else if a0 == b0 && a1 == b1 {
            Base::Equals
        } else if a0 == b0 {
            if a1 < b1 {
                Base::Starts
            } else {
                Base::StartedBy
            }
        } else if a1 == b1 {
            if a0 > b0 {
                Base::Finishes
            } else {
                Base::FinishedBy
            }
        } else if a0 < b0 && a1 < b1 {
            Base::Overlaps
        } else if a0 > b0 && a1 > b1 {
            Base::OverlappedBy
        } else if a0 > b0 {
            Base::During
        } else {
            Base::Contains
        }
    }
}

/// Set of base relations, one bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct BaseSet(u16);

impl BaseSet {
    pub(crate) fn of(bases: &[Base]) -> Self {
        Self(bases.iter().fold(0, |acc, b| acc | b.bit()))
    }

    pub(crate) fn contains(self, base: Base) -> bool {
        self.0 & base.bit() != 0
    }

    pub(crate) fn union(self, other: BaseSet) -> Self {
        Self(self.0 | other.0)
    }

    pub(crate) fn is_subset(self, other: BaseSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub(crate) fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub(crate) fn iter(self) -> impl Iterator<Item = Base> {
        Base::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

const OVERLAPPING: [Base; 9] = [
    Base::Overlaps,
    Base::OverlappedBy,
    Base::Starts,
    Base::StartedBy,
    Base::During,
    Base::Contains,
    Base::Finishes,
    Base::FinishedBy,
    Base::Equals,
];

/// Base relations a vocabulary relation stands for
///
/// VAGUE, NONE and UNKNOWN denote nothing and never take part in inference.
pub(crate) fn denotation(relation: Relation) -> Option<BaseSet> {
    let overlap = BaseSet::of(&OVERLAPPING);
    let set = match relation {
        Relation::Before => BaseSet::of(&[Base::Precedes, Base::Meets]),
        Relation::After => BaseSet::of(&[Base::PrecededBy, Base::MetBy]),
        Relation::IBefore => BaseSet::of(&[Base::Meets]),
        Relation::IAfter => BaseSet::of(&[Base::MetBy]),
        Relation::Includes => BaseSet::of(&[Base::Contains, Base::StartedBy, Base::FinishedBy]),
        Relation::IsIncluded => BaseSet::of(&[Base::During, Base::Starts, Base::Finishes]),
        Relation::Begins => BaseSet::of(&[Base::Starts]),
        Relation::BegunBy => BaseSet::of(&[Base::StartedBy]),
        Relation::Ends => BaseSet::of(&[Base::Finishes]),
        Relation::EndedBy => BaseSet::of(&[Base::FinishedBy]),
        Relation::Simultaneous => BaseSet::of(&[Base::Equals]),
        Relation::Overlap => overlap,
        Relation::BeforeOrOverlap => overlap.union(BaseSet::of(&[Base::Precedes, Base::Meets])),
        Relation::OverlapOrAfter => overlap.union(BaseSet::of(&[Base::PrecededBy, Base::MetBy])),
        Relation::Vague | Relation::None | Relation::Unknown => return None,
    };
    Some(set)
}

/// Relations that composition may produce
///
/// The disjunctive BEFORE_OR_OVERLAP and OVERLAP_OR_AFTER are inputs only.
const OUTPUTS: [Relation; 12] = [
    Relation::IBefore,
    Relation::IAfter,
    Relation::Begins,
    Relation::BegunBy,
    Relation::Ends,
    Relation::EndedBy,
    Relation::Simultaneous,
    Relation::Before,
    Relation::After,
    Relation::Includes,
    Relation::IsIncluded,
    Relation::Overlap,
];

/// The most specific output relation whose denotation covers `set`
pub(crate) fn tightest_cover(set: BaseSet) -> Option<Relation> {
    OUTPUTS
        .iter()
        .filter_map(|&r| denotation(r).map(|d| (r, d)))
        .filter(|(_, d)| set.is_subset(*d))
        .min_by_key(|(_, d)| d.len())
        .map(|(r, _)| r)
}

/// Composition of base relations, derived by enumeration
pub(crate) struct BaseComposition {
    table: [[BaseSet; 13]; 13],
}

impl BaseComposition {
    /// Enumerate every triple of intervals with endpoints in 0..7
    pub(crate) fn derive() -> Self {
        let intervals: Vec<(u8, u8)> = (0..7u8)
            .flat_map(|s| ((s + 1)..7u8).map(move |e| (s, e)))
            .collect();

        let mut table = [[BaseSet::default(); 13]; 13];
        for &a in &intervals {
            for &b in &intervals {
                let ab = Base::between(a, b);
                for &c in &intervals {
                    let bc = Base::between(b, c);
                    let ac = Base::between(a, c);
                    let cell = &mut table[ab as usize][bc as usize];
                    *cell = cell.union(BaseSet::of(&[ac]));
                }
            }
        }
        Self { table }
    }

    fn get(&self, x: Base, y: Base) -> BaseSet {
        self.table[x as usize][y as usize]
    }

    /// Compose two vocabulary relations
    pub(crate) fn compose(&self, r1: Relation, r2: Relation) -> Option<Relation> {
        let (d1, d2) = (denotation(r1)?, denotation(r2)?);
        let mut result = BaseSet::default();
        for x in d1.iter() {
            for y in d2.iter() {
                result = result.union(self.get(x, y));
            }
        }
        tightest_cover(result)
    }
}

/// True when one relation's meaning contains the other's
pub(crate) fn subsumes_either(r1: Relation, r2: Relation) -> bool {
    match (denotation(r1), denotation(r2)) {
        (Some(d1), Some(d2)) => d1.is_subset(d2) || d2.is_subset(d1),
        _ => false,
    }
}
