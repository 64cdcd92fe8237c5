use serde::{Deserialize, Serialize};

use super::Domain;
use crate::error::DomainError;
use crate::math::Point3;

/// On-disk form of a [`Domain`], as produced by the boundary-definition
/// step.
///
/// ```json
/// {
///   "points": [[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]],
///   "loops": [0, 4],
///   "shapes": [0, 4],
///   "region_ids": [1],
///   "boundary_runs": [0, 4],
///   "boundary_ids": [1]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainFile {
    pub points: Vec<Vec<f64>>,
    pub loops: Vec<usize>,
    pub shapes: Vec<usize>,
    pub region_ids: Vec<i64>,
    pub boundary_runs: Vec<usize>,
    #[serde(default)]
    pub boundary_ids: Vec<Option<i64>>,
}

impl DomainFile {
    /// Converts the document into a validated domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PointArity` for points without 2 or 3
    /// components and the validation errors of [`Domain::new`].
    pub fn into_domain(self) -> Result<Domain, DomainError> {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(index, coords)| match coords.as_slice() {
                &[x, y] => Ok(Point3::new(x, y, 0.0)),
                &[x, y, z] => Ok(Point3::new(x, y, z)),
                other => Err(DomainError::PointArity {
                    index,
                    found: other.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Domain::new(
            points,
            self.loops,
            self.shapes,
            self.region_ids,
            self.boundary_runs,
            self.boundary_ids,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::domain::Domain;
    use crate::error::DomainError;

    #[test]
    fn parses_planar_square() {
        let d = Domain::from_json(
            r#"{
                "points": [[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]],
                "loops": [0, 4],
                "shapes": [0, 4],
                "region_ids": [1],
                "boundary_runs": [0, 4],
                "boundary_ids": [null]
            }"#,
        )
        .unwrap();
        assert_eq!(d.line_count(), 4);
        assert_eq!(d.boundary_ids(), &[None]);
        assert!(d.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn rejects_bad_arity() {
        let err = Domain::from_json(
            r#"{
                "points": [[0], [1, 0], [1, 1], [0, 1], [0, 0]],
                "loops": [0, 4],
                "shapes": [0, 4],
                "region_ids": [1],
                "boundary_runs": [0, 4],
                "boundary_ids": [1]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::PointArity { index: 0, found: 1 }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Domain::from_json("{ not json"),
            Err(DomainError::Parse(_))
        ));
    }
}
