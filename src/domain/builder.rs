use super::Domain;
use crate::error::DomainError;
use crate::math::Point3;

/// Assembles a [`Domain`] shape by shape from rings of vertices.
///
/// Each ring is given without its closing vertex, with one boundary id per
/// edge; consecutive edges of a ring sharing an id form one boundary run.
///
/// ```
/// use geoscript::domain::DomainBuilder;
/// use geoscript::math::Point3;
///
/// let square = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let domain = DomainBuilder::new()
///     .shape(1)
///     .ring(&square, &[Some(1); 4])
///     .build()
///     .unwrap();
/// assert_eq!(domain.line_count(), 4);
/// ```
#[derive(Debug, Default)]
pub struct DomainBuilder {
    points: Vec<Point3>,
    loops: Vec<usize>,
    shapes: Vec<usize>,
    region_ids: Vec<i64>,
    boundary_runs: Vec<usize>,
    boundary_ids: Vec<Option<i64>>,
    lines: usize,
    error: Option<DomainError>,
}

impl DomainBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loops: vec![0],
            shapes: vec![0],
            boundary_runs: vec![0],
            ..Self::default()
        }
    }

    /// Starts a new shape tagged with `region_id`.
    #[must_use]
    pub fn shape(mut self, region_id: i64) -> Self {
        if !self.region_ids.is_empty() {
            self.shapes.push(self.lines);
        }
        self.region_ids.push(region_id);
        self
    }

    /// Appends a loop to the current shape. The first loop of a shape is its
    /// outer boundary, later ones are holes.
    #[must_use]
    pub fn ring(mut self, vertices: &[Point3], ids: &[Option<i64>]) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.region_ids.is_empty() {
            self.error = Some(DomainError::LoopWithoutShape);
            return self;
        }
        if ids.len() != vertices.len() {
            self.error = Some(DomainError::LengthMismatch {
                what: "ring boundary ids",
                expected: vertices.len(),
                found: ids.len(),
            });
            return self;
        }
        let Some(&first) = vertices.first() else {
            return self;
        };

        self.points.extend_from_slice(vertices);
        self.points.push(first);

        for (i, id) in ids.iter().enumerate() {
            if i > 0 && ids[i - 1] != *id {
                self.boundary_runs.push(self.lines + i);
                self.boundary_ids.push(ids[i - 1]);
            }
        }
        self.lines += vertices.len();
        self.boundary_runs.push(self.lines);
        self.boundary_ids.push(ids[ids.len() - 1]);
        self.loops.push(self.lines);
        self
    }

    /// Validates and returns the domain.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while adding rings, or any
    /// validation error from [`Domain::new`].
    pub fn build(mut self) -> Result<Domain, DomainError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.region_ids.is_empty() {
            self.shapes.push(self.lines);
        }
        Domain::new(
            self.points,
            self.loops,
            self.shapes,
            self.region_ids,
            self.boundary_runs,
            self.boundary_ids,
        )
    }
}
