use std::collections::HashMap;
use std::fmt::Write as _;

use super::{list, ScriptWriter};
use crate::config::CurveStyle;
use crate::error::EmitError;
use crate::topology::dedup::tag;

/// Curves already declared, keyed by the sorted line ids they cover.
///
/// Lets a segment that retraces another shape's boundary reuse that curve
/// with a sign instead of declaring a second primitive over the same lines.
#[derive(Default)]
struct Declared {
    by_lines: HashMap<Vec<usize>, (i64, Vec<i64>)>,
}

impl Declared {
    /// Returns the signed tag of a matching curve. `path` is the segment's
    /// direction-sensitive signature and `reversed` the same signature read
    /// backwards.
    fn find(&self, lines: &[usize], path: &[i64], reversed: &[i64]) -> Option<i64> {
        let (tag, declared) = self.by_lines.get(lines)?;
        if declared.as_slice() == path {
            Some(*tag)
        } else if declared.as_slice() == reversed {
            Some(-tag)
        } else {
            None
        }
    }

    fn insert(&mut self, lines: Vec<usize>, tag: i64, path: Vec<i64>) {
        self.by_lines.entry(lines).or_insert((tag, path));
    }
}

impl ScriptWriter<'_> {
    /// Writes line, spline and compound primitives and records the
    /// top-level curve of every segment.
    pub(super) fn write_curves(&mut self) -> Result<(), EmitError> {
        let style = self.config.curve_style();
        self.write_lines(!style.uses_splines())?;

        let curves = match style {
            CurveStyle::Lines => self.plain_line_curves(),
            CurveStyle::CompoundLines => self.write_compound_lines()?,
            CurveStyle::Splines => self.write_splines()?,
            CurveStyle::CompoundSplines => {
                let splines = self.write_splines()?;
                self.write_spline_compounds(&splines)?
            }
        };
        self.report.segment_curves = curves;
        Ok(())
    }

    /// Accounts for every line id and, when `declare` is set, writes one
    /// `Line` per distinct non-degenerate id.
    fn write_lines(&mut self, declare: bool) -> Result<(), EmitError> {
        let lines = self.topo.lines();
        let mut seen = vec![false; lines.count() + 1];
        for pos in 0..lines.len() {
            let id = lines.id(pos);
            if lines.is_degenerate(pos) {
                self.report.repeat_lines.push(id);
                continue;
            }
            if seen[id] {
                continue;
            }
            seen[id] = true;
            self.report.emitted_lines.push(id);
            if declare {
                let (a, b) = lines.declared(id);
                let (a, b) = (self.point_tag(a), self.point_tag(b));
                writeln!(self.out, "Line({id}) = {{{a}, {b}}};")?;
            }
        }
        if !self.report.repeat_lines.is_empty() {
            tracing::debug!(lines = ?self.report.repeat_lines, "zero-length lines skipped");
        }
        if declare {
            self.next_tag = lines.count() + 1;
        }
        Ok(())
    }

    /// Without merging every segment is a single line.
    fn plain_line_curves(&mut self) -> Vec<Option<i64>> {
        let lines = self.topo.lines();
        (0..lines.len())
            .map(|pos| {
                if lines.is_degenerate(pos) {
                    self.report.repeat_curves.push(tag(lines.id(pos)));
                    None
                } else {
                    Some(lines.signed_id(pos))
                }
            })
            .collect()
    }

    fn write_compound_lines(&mut self) -> Result<Vec<Option<i64>>, EmitError> {
        let lines = self.topo.lines();
        let base = self.next_tag;
        let mut declared = Declared::default();
        let mut curves = Vec::with_capacity(self.topo.segment_count());

        for s in 0..self.topo.segment_count() {
            let slot = tag(base + s);
            let members: Vec<i64> = self
                .topo
                .segment_lines(s)
                .filter(|&pos| !lines.is_degenerate(pos))
                .map(|pos| lines.signed_id(pos))
                .collect();
            if members.is_empty() {
                self.report.repeat_curves.push(slot);
                curves.push(None);
                continue;
            }

            let key = line_key(&members);
            let reversed: Vec<i64> = members.iter().rev().map(|m| -m).collect();
            if let Some(existing) = declared.find(&key, &members, &reversed) {
                curves.push(Some(existing));
                continue;
            }

            let unsigned: Vec<i64> = members.iter().map(|m| m.abs()).collect();
            writeln!(self.out, "Compound Line({slot}) = {{{}}};", list(&unsigned))?;
            declared.insert(key, slot, members);
            curves.push(Some(slot));
        }

        self.next_tag = base + self.topo.segment_count();
        Ok(curves)
    }

    fn write_splines(&mut self) -> Result<Vec<Option<i64>>, EmitError> {
        let lines = self.topo.lines();
        let base = self.next_tag;
        let mut declared = Declared::default();
        let mut curves = Vec::with_capacity(self.topo.segment_count());

        for s in 0..self.topo.segment_count() {
            let slot = tag(base + s);
            let path: Vec<i64> = self
                .topo
                .segment_points(s)
                .into_iter()
                .map(|p| tag(self.point_tag(p)))
                .collect();
            if path.len() < 2 {
                self.report.repeat_curves.push(slot);
                curves.push(None);
                continue;
            }

            let members: Vec<i64> = self
                .topo
                .segment_lines(s)
                .filter(|&pos| !lines.is_degenerate(pos))
                .map(|pos| tag(lines.id(pos)))
                .collect();
            let key = line_key(&members);
            let reversed: Vec<i64> = path.iter().rev().copied().collect();
            if let Some(existing) = declared.find(&key, &path, &reversed) {
                curves.push(Some(existing));
                continue;
            }

            writeln!(self.out, "BSpline({slot}) = {{{}}};", list(&path))?;
            declared.insert(key, slot, path);
            curves.push(Some(slot));
        }

        self.next_tag = base + self.topo.segment_count();
        Ok(curves)
    }

    /// Wraps each declared spline in its own compound line. Segments that
    /// reuse a spline reuse its compound with the same sign.
    fn write_spline_compounds(
        &mut self,
        splines: &[Option<i64>],
    ) -> Result<Vec<Option<i64>>, EmitError> {
        let spline_base = tag(self.next_tag - splines.len());
        let base = tag(self.next_tag);
        let mut curves = Vec::with_capacity(splines.len());

        for (s, spline) in splines.iter().enumerate() {
            let slot = base + tag(s);
            match *spline {
                None => {
                    self.report.repeat_curves.push(slot);
                    curves.push(None);
                }
                Some(spline) if spline == spline_base + tag(s) => {
                    writeln!(self.out, "Compound Line({slot}) = {{{spline}}};")?;
                    curves.push(Some(slot));
                }
                Some(spline) => {
                    let compound = base + (spline.abs() - spline_base);
                    curves.push(Some(compound * spline.signum()));
                }
            }
        }

        self.next_tag += splines.len();
        Ok(curves)
    }

    /// Writes one `Line Loop` per domain loop from its segments' curves.
    pub(super) fn write_loops(&mut self) -> Result<(), EmitError> {
        for k in 0..self.domain.loop_count() {
            let slot = tag(self.next_tag);
            self.next_tag += 1;

            let members: Vec<i64> = self
                .topo
                .loop_segments(k)
                .filter_map(|s| self.report.segment_curves[s])
                .collect();
            if members.is_empty() {
                tracing::warn!(loop_index = k, "loop has no curves with length");
                self.report.repeat_loops.push(slot);
                self.report.loops.push(None);
                continue;
            }

            writeln!(self.out, "Line Loop({slot}) = {{{}}};", list(&members))?;
            self.report.loops.push(Some(slot));
        }
        Ok(())
    }
}

/// Sorted, unsigned line ids identifying the lines a curve covers.
fn line_key(members: &[i64]) -> Vec<usize> {
    let mut key: Vec<usize> = members
        .iter()
        .map(|m| usize::try_from(m.unsigned_abs()).unwrap_or(usize::MAX))
        .collect();
    key.sort_unstable();
    key
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::{ConfigBuilder, CurveStyle};
    use crate::domain::{Domain, DomainBuilder};
    use crate::emit::GeoWriter;
    use crate::math::Point3;

    fn square(x: f64) -> Vec<Point3> {
        vec![
            Point3::new(x, 0.0, 0.0),
            Point3::new(x + 1.0, 0.0, 0.0),
            Point3::new(x + 1.0, 1.0, 0.0),
            Point3::new(x, 1.0, 0.0),
        ]
    }

    fn two_squares() -> Domain {
        DomainBuilder::new()
            .shape(1)
            .ring(&square(0.0), &[Some(1); 4])
            .shape(2)
            .ring(&square(1.0), &[Some(2); 4])
            .build()
            .unwrap()
    }

    fn render(style: CurveStyle, domain: &Domain) -> crate::emit::Script {
        let config = ConfigBuilder::new().curve_style(style).build();
        GeoWriter::new(&config).execute(domain).unwrap()
    }

    #[test]
    fn shared_line_is_declared_once_and_reversed() {
        let script = render(CurveStyle::Lines, &two_squares());
        assert_eq!(script.text.matches("\nLine(2) = {2, 3};").count(), 1);
        assert!(script.text.contains("Line Loop(8) = {1, 2, 3, 4};"));
        assert!(script.text.contains("Line Loop(9) = {5, 6, 7, -2};"));
    }

    #[test]
    fn compound_lines_wrap_segments() {
        let script = render(CurveStyle::CompoundLines, &two_squares());
        // Lines 1..=7, compound slots 8..=12 for five segments, loops after.
        assert!(script.text.contains("Compound Line(8) = {1};"));
        assert!(script.text.contains("Compound Line(9) = {2};"));
        assert!(script.text.contains("Compound Line(10) = {3, 4};"));
        assert!(script.text.contains("Compound Line(11) = {5, 6, 7};"));
        assert!(!script.text.contains("Compound Line(12)"));
        assert_eq!(
            script.report.segment_curves,
            vec![Some(8), Some(9), Some(10), Some(11), Some(-9)]
        );
        assert!(script.text.contains("Line Loop(13) = {8, 9, 10};"));
        assert!(script.text.contains("Line Loop(14) = {11, -9};"));
    }

    #[test]
    fn splines_follow_segment_points() {
        let script = render(CurveStyle::Splines, &two_squares());
        assert!(!script.text.contains("\nLine("));
        assert!(script.text.contains("BSpline(1) = {1, 2};"));
        assert!(script.text.contains("BSpline(3) = {3, 4, 1};"));
        assert!(script.text.contains("BSpline(4) = {2, 5, 6, 3};"));
        assert!(!script.text.contains("BSpline(5)"));
        assert!(script.text.contains("Line Loop(6) = {1, 2, 3};"));
        assert!(script.text.contains("Line Loop(7) = {4, -2};"));
    }

    #[test]
    fn spline_compounds_mirror_splines() {
        let script = render(CurveStyle::CompoundSplines, &two_squares());
        assert!(script.text.contains("Compound Line(6) = {1};"));
        assert!(script.text.contains("Compound Line(9) = {4};"));
        assert!(!script.text.contains("Compound Line(10)"));
        assert_eq!(
            script.report.segment_curves,
            vec![Some(6), Some(7), Some(8), Some(9), Some(-7)]
        );
        assert!(script.text.contains("Line Loop(11) = {6, 7, 8};"));
        assert!(script.text.contains("Line Loop(12) = {9, -7};"));
    }

    /// The right square's ring starts at the midpoint of the shared edge.
    fn split_shared_edge() -> Domain {
        DomainBuilder::new()
            .shape(1)
            .ring(
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(1.0, 0.5, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
                &[Some(1); 5],
            )
            .shape(2)
            .ring(
                &[
                    Point3::new(1.0, 0.5, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(2.0, 0.0, 0.0),
                    Point3::new(2.0, 1.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                ],
                &[Some(2); 5],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn partner_starting_mid_edge_reuses_compounds() {
        let script = render(CurveStyle::CompoundLines, &split_shared_edge());
        assert_eq!(
            script.report.segment_curves,
            vec![Some(9), Some(10), Some(11), Some(12), Some(-10), Some(14), Some(-11)]
        );
        assert_eq!(script.text.matches("Compound Line(").count(), 5);
        assert!(script.text.contains("Compound Line(10) = {2};"));
        assert!(!script.text.contains("Compound Line(13)"));
    }

    #[test]
    fn partner_starting_mid_edge_reuses_splines() {
        let script = render(CurveStyle::Splines, &split_shared_edge());
        assert_eq!(
            script.report.segment_curves,
            vec![Some(1), Some(2), Some(3), Some(4), Some(-2), Some(6), Some(-3)]
        );
        assert!(script.text.contains("BSpline(2) = {2, 3};"));
        assert!(script.text.contains("BSpline(3) = {3, 4};"));
        assert!(!script.text.contains("BSpline(5)"));
        assert!(!script.text.contains("BSpline(7)"));
        assert!(script.text.contains("Line Loop(8) = {1, 2, 3, 4};"));
        assert!(script.text.contains("Line Loop(9) = {-2, 6, -3};"));
    }
}
