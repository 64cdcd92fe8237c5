use std::fmt::Write as _;

use super::{list, PhysicalGroup, ScriptWriter};
use crate::error::EmitError;
use crate::topology::dedup::tag;
use crate::topology::group_by_id;

impl ScriptWriter<'_> {
    /// Gathers the curves of every boundary run into one `Physical Line`
    /// per boundary id.
    pub(super) fn write_physical_lines(&mut self) -> Result<(), EmitError> {
        let ids = self
            .domain
            .resolved_boundary_ids(self.config.default_boundary_id());

        for group in group_by_id(&ids) {
            let mut members: Vec<i64> = Vec::new();
            for &r in &group.indices {
                for s in self.topo.run_segments(r) {
                    if let Some(curve) = self.report.segment_curves[s] {
                        let curve = curve.abs();
                        if !members.contains(&curve) {
                            members.push(curve);
                        }
                    }
                }
            }

            if members.is_empty() {
                tracing::warn!(id = group.id, "boundary id has no curves, group skipped");
            } else {
                writeln!(self.out, "Physical Line({}) = {{{}}};", group.id, list(&members))?;
            }
            self.report.physical_lines.push(PhysicalGroup {
                id: group.id,
                members,
            });
        }
        Ok(())
    }

    /// Writes one `Plane Surface` per shape; the first loop is the outer
    /// boundary and the rest are holes.
    pub(super) fn write_surfaces(&mut self) -> Result<(), EmitError> {
        for s in 0..self.domain.shape_count() {
            let slot = tag(s + 1);
            let loops = self.topo.shape_loops(s);
            let outer = self.report.loops[loops.start];
            let members: Vec<i64> = loops.filter_map(|k| self.report.loops[k]).collect();

            if outer.is_none() {
                tracing::warn!(shape = s, "outer loop is empty, surface skipped");
                self.report.repeat_surfaces.push(slot);
                self.report.surfaces.push(None);
                continue;
            }

            writeln!(self.out, "Plane Surface({slot}) = {{{}}};", list(&members))?;
            self.report.surfaces.push(Some(slot));
        }
        Ok(())
    }

    /// Gathers the surfaces of every shape into one `Physical Surface` per
    /// region id.
    pub(super) fn write_physical_surfaces(&mut self) -> Result<(), EmitError> {
        for group in group_by_id(self.domain.region_ids()) {
            let members: Vec<i64> = group
                .indices
                .iter()
                .filter_map(|&s| self.report.surfaces[s])
                .collect();

            if members.is_empty() {
                tracing::warn!(id = group.id, "region id has no surfaces, group skipped");
            } else {
                writeln!(
                    self.out,
                    "Physical Surface({}) = {{{}}};",
                    group.id,
                    list(&members)
                )?;
            }
            self.report.physical_surfaces.push(PhysicalGroup {
                id: group.id,
                members,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::{ConfigBuilder, CurveStyle};
    use crate::domain::DomainBuilder;
    use crate::emit::{GeoWriter, PhysicalGroup};
    use crate::math::Point3;

    fn square(x: f64, size: f64) -> Vec<Point3> {
        vec![
            Point3::new(x, 0.0, 0.0),
            Point3::new(x + size, 0.0, 0.0),
            Point3::new(x + size, size, 0.0),
            Point3::new(x, size, 0.0),
        ]
    }

    #[test]
    fn holes_follow_the_outer_loop() {
        let hole = vec![
            Point3::new(0.25, 0.25, 0.0),
            Point3::new(0.25, 0.75, 0.0),
            Point3::new(0.75, 0.75, 0.0),
            Point3::new(0.75, 0.25, 0.0),
        ];
        let domain = DomainBuilder::new()
            .shape(4)
            .ring(&square(0.0, 1.0), &[Some(1); 4])
            .ring(&hole, &[Some(2); 4])
            .build()
            .unwrap();
        let config = ConfigBuilder::new().curve_style(CurveStyle::Lines).build();
        let script = GeoWriter::new(&config).execute(&domain).unwrap();

        assert!(script.text.contains("Line Loop(9) = {1, 2, 3, 4};"));
        assert!(script.text.contains("Line Loop(10) = {5, 6, 7, 8};"));
        assert!(script.text.contains("Plane Surface(1) = {9, 10};"));
        assert!(script.text.contains("Physical Surface(4) = {1};"));
        assert!(script.text.contains("Physical Line(2) = {5, 6, 7, 8};"));
    }

    #[test]
    fn shared_boundary_ids_merge_runs() {
        let domain = DomainBuilder::new()
            .shape(1)
            .ring(&square(0.0, 1.0), &[Some(7), Some(3), Some(7), Some(7)])
            .shape(1)
            .ring(&square(5.0, 1.0), &[Some(3); 4])
            .build()
            .unwrap();
        let config = ConfigBuilder::new().curve_style(CurveStyle::Lines).build();
        let script = GeoWriter::new(&config).execute(&domain).unwrap();

        assert_eq!(
            script.report.physical_lines,
            vec![
                PhysicalGroup { id: 7, members: vec![1, 3, 4] },
                PhysicalGroup { id: 3, members: vec![2, 5, 6, 7, 8] },
            ]
        );
        assert!(script.text.contains("Physical Surface(1) = {1, 2};"));
    }

    #[test]
    fn unset_ids_take_the_default() {
        let domain = DomainBuilder::new()
            .shape(1)
            .ring(&square(0.0, 1.0), &[None; 4])
            .build()
            .unwrap();
        let config = ConfigBuilder::new()
            .curve_style(CurveStyle::Lines)
            .default_boundary_id(9)
            .build();
        let script = GeoWriter::new(&config).execute(&domain).unwrap();
        assert!(script.text.contains("Physical Line(9) = {1, 2, 3, 4};"));
    }
}
