mod builder;
mod file;

pub use builder::DomainBuilder;
pub use file::DomainFile;

use std::ops::Range;
use std::path::Path;

use crate::error::DomainError;
use crate::math::{bit_key, Point3};

/// Closed polygonal boundaries with their boundary and region tags.
///
/// All index arrays are boundary arrays over the global line sequence:
/// strictly increasing, starting at 0 and ending at the line count. Line
/// `i` of loop `k` runs from raw point `i + k` to raw point `i + k + 1`,
/// because every loop lists its closing vertex twice.
#[derive(Debug, Clone)]
pub struct Domain {
    points: Vec<Point3>,
    loops: Vec<usize>,
    shapes: Vec<usize>,
    region_ids: Vec<i64>,
    boundary_runs: Vec<usize>,
    boundary_ids: Vec<Option<i64>>,
}

impl Domain {
    /// Creates a domain after checking that every array agrees with the
    /// others.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a boundary array is malformed, a
    /// per-entity array has the wrong length, shape boundaries do not
    /// coincide with loop boundaries, or a loop does not close.
    pub fn new(
        points: Vec<Point3>,
        loops: Vec<usize>,
        shapes: Vec<usize>,
        region_ids: Vec<i64>,
        boundary_runs: Vec<usize>,
        boundary_ids: Vec<Option<i64>>,
    ) -> Result<Self, DomainError> {
        let line_count = match loops.last() {
            Some(&n) if n > 0 => n,
            _ => return Err(DomainError::Empty),
        };
        check_boundaries("loop", &loops, line_count)?;
        check_boundaries("shape", &shapes, line_count)?;
        check_boundaries("boundary run", &boundary_runs, line_count)?;

        if let Some(&stray) = shapes.iter().find(|&&s| loops.binary_search(&s).is_err()) {
            return Err(DomainError::InvalidBoundaries {
                name: "shape",
                reason: format!("shape boundary {stray} splits a loop"),
            });
        }

        check_len("region ids", shapes.len() - 1, region_ids.len())?;
        check_len("boundary ids", boundary_runs.len() - 1, boundary_ids.len())?;
        check_len("points", line_count + loops.len() - 1, points.len())?;

        let domain = Self {
            points,
            loops,
            shapes,
            region_ids,
            boundary_runs,
            boundary_ids,
        };
        for k in 0..domain.loop_count() {
            let range = domain.loop_point_range(k);
            if bit_key(&domain.points[range.start]) != bit_key(&domain.points[range.end - 1]) {
                return Err(DomainError::LoopNotClosed { index: k });
            }
        }
        Ok(domain)
    }

    /// Loads a domain from a JSON document on disk.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Read` if the file cannot be read, or any error
    /// from [`Domain::from_json`].
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let text = std::fs::read_to_string(path).map_err(|source| DomainError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses a domain from a JSON document (see [`DomainFile`]).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Parse` for malformed JSON and the validation
    /// errors of [`Domain::new`] for inconsistent arrays.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let file: DomainFile = serde_json::from_str(text)?;
        file.into_domain()
    }

    /// Raw points, closing vertex repeated per loop.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn loops(&self) -> &[usize] {
        &self.loops
    }

    #[must_use]
    pub fn shapes(&self) -> &[usize] {
        &self.shapes
    }

    #[must_use]
    pub fn region_ids(&self) -> &[i64] {
        &self.region_ids
    }

    #[must_use]
    pub fn boundary_runs(&self) -> &[usize] {
        &self.boundary_runs
    }

    #[must_use]
    pub fn boundary_ids(&self) -> &[Option<i64>] {
        &self.boundary_ids
    }

    /// Boundary ids with missing entries replaced by `default_id`.
    #[must_use]
    pub fn resolved_boundary_ids(&self, default_id: i64) -> Vec<i64> {
        self.boundary_ids
            .iter()
            .map(|id| id.unwrap_or(default_id))
            .collect()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.loops[self.loops.len() - 1]
    }

    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.loops.len() - 1
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len() - 1
    }

    /// Range of raw point indices of loop `k`, closing vertex included.
    #[must_use]
    pub fn loop_point_range(&self, k: usize) -> Range<usize> {
        self.loops[k] + k..self.loops[k + 1] + k + 1
    }

    /// Raw point indices `(start, end)` of every line, in line order.
    #[must_use]
    pub fn line_endpoints(&self) -> Vec<(usize, usize)> {
        let mut ends = Vec::with_capacity(self.line_count());
        for (k, w) in self.loops.windows(2).enumerate() {
            ends.extend((w[0]..w[1]).map(|i| (i + k, i + k + 1)));
        }
        ends
    }
}

fn check_boundaries(
    name: &'static str,
    bounds: &[usize],
    line_count: usize,
) -> Result<(), DomainError> {
    let invalid = |reason: String| DomainError::InvalidBoundaries { name, reason };
    match (bounds.first(), bounds.last()) {
        (Some(0), Some(&last)) if last == line_count => {}
        (Some(&first), Some(&last)) => {
            return Err(invalid(format!(
                "must run from 0 to {line_count}, found {first}..{last}"
            )))
        }
        _ => return Err(invalid("empty".to_owned())),
    }
    if let Some(w) = bounds.windows(2).find(|w| w[0] >= w[1]) {
        return Err(invalid(format!("not strictly increasing at {} -> {}", w[0], w[1])));
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), DomainError> {
    if expected == found {
        Ok(())
    } else {
        Err(DomainError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square_points() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn accepts_consistent_square() {
        let d = Domain::new(
            square_points(),
            vec![0, 4],
            vec![0, 4],
            vec![1],
            vec![0, 4],
            vec![Some(1)],
        )
        .unwrap();
        assert_eq!(d.line_count(), 4);
        assert_eq!(d.loop_count(), 1);
        assert_eq!(d.line_endpoints(), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn rejects_point_count_mismatch() {
        let mut points = square_points();
        points.pop();
        let err = Domain::new(points, vec![0, 4], vec![0, 4], vec![1], vec![0, 4], vec![Some(1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::LengthMismatch { what: "points", .. }));
    }

    #[test]
    fn rejects_boundary_id_mismatch() {
        let err = Domain::new(
            square_points(),
            vec![0, 4],
            vec![0, 4],
            vec![1],
            vec![0, 2, 4],
            vec![Some(1)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::LengthMismatch { what: "boundary ids", .. }));
    }

    #[test]
    fn rejects_unterminated_boundaries() {
        let err = Domain::new(
            square_points(),
            vec![0, 4],
            vec![0, 3],
            vec![1],
            vec![0, 4],
            vec![Some(1)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidBoundaries { name: "shape", .. }));

        let err = Domain::new(
            square_points(),
            vec![0, 4],
            vec![0, 4],
            vec![1],
            vec![0, 2, 2, 4],
            vec![Some(1), Some(2), Some(3)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidBoundaries { name: "boundary run", .. }));
    }

    #[test]
    fn rejects_open_loop() {
        let mut points = square_points();
        points[4] = Point3::new(0.0, 0.5, 0.0);
        let err = Domain::new(points, vec![0, 4], vec![0, 4], vec![1], vec![0, 4], vec![Some(1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::LoopNotClosed { index: 0 }));
    }

    #[test]
    fn missing_ids_take_the_default() {
        let d = Domain::new(
            square_points(),
            vec![0, 4],
            vec![0, 4],
            vec![1],
            vec![0, 2, 4],
            vec![Some(3), None],
        )
        .unwrap();
        assert_eq!(d.resolved_boundary_ids(9), vec![3, 9]);
    }
}
