pub mod dedup;
pub mod group;
pub mod intersect;
pub mod merge;
pub mod remap;

pub use dedup::{LineIndex, PointIndex};
pub use group::{group_by_id, IdGroup};
pub use intersect::shared_breakpoints;
pub use merge::{align_shared, merge_breakpoints};
pub use remap::{map_between, ranges};

use std::ops::Range;

use crate::config::CurveStyle;
use crate::domain::Domain;
use crate::error::DomainError;

/// Every index mapping derived from a [`Domain`].
///
/// Built once per invocation and read-only afterwards. Granularities run
/// from line positions through segments and loops to shapes; each coarser
/// level is stored as a boundary array over the next finer one.
#[derive(Debug, Clone)]
pub struct Topology {
    points: PointIndex,
    lines: LineIndex,
    intersections: Vec<usize>,
    /// Segment boundaries over line positions.
    segments: Vec<usize>,
    /// Loop boundaries over segments.
    loop_segments: Vec<usize>,
    /// Boundary-run boundaries over segments.
    run_segments: Vec<usize>,
    /// Shape boundaries over loops.
    shape_loops: Vec<usize>,
}

impl Topology {
    /// Runs deduplication, intersection mapping, segment merging and index
    /// remapping for `domain`.
    ///
    /// With [`CurveStyle::Lines`] every line is its own segment; otherwise
    /// lines are merged between breakpoints, and the cuts of both sides of
    /// every shared boundary are aligned.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a breakpoint stream is malformed.
    pub fn build(domain: &Domain, style: CurveStyle) -> Result<Self, DomainError> {
        let points = PointIndex::build(domain.points());
        let lines = LineIndex::build(domain, &points);
        let line_count = domain.line_count();
        tracing::debug!(
            raw = domain.points().len(),
            unique = points.len(),
            lines = lines.count(),
            "points deduplicated"
        );

        let intersections = shared_breakpoints(lines.ids(), domain.shapes());
        let segments = if style.merges_segments() {
            let merged = merge_breakpoints(
                domain.boundary_runs(),
                domain.loops(),
                &intersections,
                line_count,
            )?;
            align_shared(&merged, &lines)
        } else {
            (0..=line_count).collect()
        };

        let loop_segments = map_between(&segments, domain.loops());
        let run_segments = map_between(&segments, domain.boundary_runs());
        let shape_loops = map_between(domain.loops(), domain.shapes());

        Ok(Self {
            points,
            lines,
            intersections,
            segments,
            loop_segments,
            run_segments,
            shape_loops,
        })
    }

    #[must_use]
    pub fn points(&self) -> &PointIndex {
        &self.points
    }

    #[must_use]
    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Shared-boundary breakpoints over line positions.
    #[must_use]
    pub fn intersections(&self) -> &[usize] {
        &self.intersections
    }

    /// Segment boundaries over line positions.
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.segments
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Line positions of segment `s`.
    #[must_use]
    pub fn segment_lines(&self, s: usize) -> Range<usize> {
        self.segments[s]..self.segments[s + 1]
    }

    /// Segment indices of loop `k`.
    #[must_use]
    pub fn loop_segments(&self, k: usize) -> Range<usize> {
        self.loop_segments[k]..self.loop_segments[k + 1]
    }

    /// Segment indices of boundary run `r`.
    #[must_use]
    pub fn run_segments(&self, r: usize) -> Range<usize> {
        self.run_segments[r]..self.run_segments[r + 1]
    }

    /// Loop indices of shape `s`.
    #[must_use]
    pub fn shape_loops(&self, s: usize) -> Range<usize> {
        self.shape_loops[s]..self.shape_loops[s + 1]
    }

    /// Point ids visited by segment `s`, skipping zero-length lines.
    ///
    /// Returns an empty list when every line of the segment is degenerate.
    #[must_use]
    pub fn segment_points(&self, s: usize) -> Vec<usize> {
        let mut path = Vec::new();
        for pos in self.segment_lines(s) {
            if self.lines.is_degenerate(pos) {
                continue;
            }
            let (a, b) = self.lines.ends(pos);
            if path.last() != Some(&a) {
                path.push(a);
            }
            path.push(b);
        }
        path
    }

    /// Start and end point ids of segment `s`, if it has any length.
    #[must_use]
    pub fn segment_endpoints(&self, s: usize) -> Option<(usize, usize)> {
        let path = self.segment_points(s);
        Some((*path.first()?, *path.last()?))
    }
}
