use std::collections::HashMap;

use crate::domain::Domain;
use crate::math::{bit_key, Point3};

/// Stable 1-based ids for distinct coordinates.
///
/// Ids are handed out in first-encountered order. Two points share an id
/// exactly when their coordinates are bit-identical, checked against every
/// earlier point through a hash lookup.
#[derive(Debug, Clone, Default)]
pub struct PointIndex {
    ids: Vec<usize>,
    unique: Vec<Point3>,
    lookup: HashMap<[u64; 3], usize>,
}

impl PointIndex {
    #[must_use]
    pub fn build(points: &[Point3]) -> Self {
        let mut index = Self {
            ids: Vec::with_capacity(points.len()),
            ..Self::default()
        };
        for p in points {
            let next = index.unique.len() + 1;
            let id = *index.lookup.entry(bit_key(p)).or_insert(next);
            if id == next {
                index.unique.push(*p);
            }
            index.ids.push(id);
        }
        index
    }

    /// Id of every raw point, parallel to the input.
    #[must_use]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Id of raw point `raw`.
    #[must_use]
    pub fn id(&self, raw: usize) -> usize {
        self.ids[raw]
    }

    /// Distinct points; the point with id `n` is at index `n - 1`.
    #[must_use]
    pub fn unique(&self) -> &[Point3] {
        &self.unique
    }

    /// Looks up the id assigned to a coordinate.
    #[must_use]
    pub fn lookup(&self, p: &Point3) -> Option<usize> {
        self.lookup.get(&bit_key(p)).copied()
    }

    /// Number of distinct points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.unique.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unique.is_empty()
    }
}

/// Line ids derived from point ids.
///
/// A line id is shared by every line joining the same two points, in either
/// direction, so a boundary shared by two shapes carries one id. Zero-length
/// lines each receive their own id and are flagged degenerate.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Line id per line position.
    ids: Vec<usize>,
    /// Point ids per line position, in traversal order.
    ends: Vec<(usize, usize)>,
    /// Whether each position traverses its line in the declared direction.
    forward: Vec<bool>,
    /// Declared endpoints per line id (index `id - 1`).
    declared: Vec<(usize, usize)>,
}

impl LineIndex {
    #[must_use]
    pub fn build(domain: &Domain, points: &PointIndex) -> Self {
        let endpoints = domain.line_endpoints();
        let mut index = Self {
            ids: Vec::with_capacity(endpoints.len()),
            ends: Vec::with_capacity(endpoints.len()),
            forward: Vec::with_capacity(endpoints.len()),
            declared: Vec::new(),
        };
        let mut by_pair: HashMap<(usize, usize), usize> = HashMap::new();

        for (a, b) in endpoints {
            let (a, b) = (points.id(a), points.id(b));
            let next = index.declared.len() + 1;
            let id = if a == b {
                next
            } else {
                *by_pair.entry((a.min(b), a.max(b))).or_insert(next)
            };
            if id == next {
                index.declared.push((a, b));
            }
            index.ids.push(id);
            index.ends.push((a, b));
            index.forward.push(index.declared[id - 1] == (a, b));
        }
        index
    }

    /// Line id per position.
    #[must_use]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    #[must_use]
    pub fn id(&self, pos: usize) -> usize {
        self.ids[pos]
    }

    /// Point ids `(start, end)` at `pos` in traversal order.
    #[must_use]
    pub fn ends(&self, pos: usize) -> (usize, usize) {
        self.ends[pos]
    }

    /// Line id at `pos`, negated when traversed against its declaration.
    #[must_use]
    pub fn signed_id(&self, pos: usize) -> i64 {
        let id = tag(self.ids[pos]);
        if self.forward[pos] {
            id
        } else {
            -id
        }
    }

    #[must_use]
    pub fn is_degenerate(&self, pos: usize) -> bool {
        let (a, b) = self.ends[pos];
        a == b
    }

    /// Endpoints as first declared for line `id`.
    #[must_use]
    pub fn declared(&self, id: usize) -> (usize, usize) {
        self.declared[id - 1]
    }

    /// Number of distinct line ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.declared.len()
    }

    /// Number of line positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Converts an index-derived id into a script tag.
///
/// Ids are bounded by the length of an in-memory `Vec` plus a small
/// offset, and `Vec` lengths never exceed `isize::MAX`, which fits in an
/// `i64` on every supported target. The saturating fallback is therefore
/// unreachable for ids produced by this crate.
pub(crate) fn tag(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
