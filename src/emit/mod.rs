mod curves;
mod groups;
mod report;

pub use report::{PhysicalGroup, ScriptReport};

use std::fmt::{Display, Write as _};
use std::path::Path;

use crate::config::{CoordinateMode, MeshConfig};
use crate::domain::Domain;
use crate::error::{EmitError, Result};
use crate::math::{stereographic, EARTH_RADIUS};
use crate::topology::Topology;

/// A generated geometry script together with its bookkeeping.
#[derive(Debug, Clone)]
pub struct Script {
    pub text: String,
    pub report: ScriptReport,
}

/// Compiles a [`Domain`] into a Gmsh geometry script.
///
/// Sections are written in one forward pass: points, curves, line loops,
/// physical lines, plane surfaces, physical surfaces, then the mesh option
/// directive and the optional background field.
pub struct GeoWriter<'a> {
    config: &'a MeshConfig,
}

impl<'a> GeoWriter<'a> {
    /// Creates a new `GeoWriter` for the given configuration.
    #[must_use]
    pub fn new(config: &'a MeshConfig) -> Self {
        Self { config }
    }

    /// Builds the topology of `domain` and renders the script.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain's breakpoint arrays are inconsistent.
    pub fn execute(&self, domain: &Domain) -> Result<Script> {
        let topo = Topology::build(domain, self.config.curve_style())?;
        let mut writer = ScriptWriter::new(domain, &topo, self.config);
        writer.write_points()?;
        writer.write_curves()?;
        writer.write_loops()?;
        writer.write_physical_lines()?;
        writer.write_surfaces()?;
        writer.write_physical_surfaces()?;
        writer.write_trailer()?;
        Ok(writer.finish())
    }

    /// Renders the script and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn write_to_path(&self, domain: &Domain, path: &Path) -> Result<ScriptReport> {
        let script = self.execute(domain)?;
        std::fs::write(path, &script.text).map_err(|source| EmitError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "geo file written");
        Ok(script.report)
    }
}

/// Rendering state shared by the section writers.
struct ScriptWriter<'a> {
    domain: &'a Domain,
    topo: &'a Topology,
    config: &'a MeshConfig,
    out: String,
    /// Added to every point id; the stereographic pole points take 1 and 2.
    point_offset: usize,
    /// Next free tag in the shared curve and loop numbering.
    next_tag: usize,
    report: ScriptReport,
}

impl<'a> ScriptWriter<'a> {
    fn new(domain: &'a Domain, topo: &'a Topology, config: &'a MeshConfig) -> Self {
        Self {
            domain,
            topo,
            config,
            out: String::new(),
            point_offset: 0,
            next_tag: 1,
            report: ScriptReport::default(),
        }
    }

    fn point_tag(&self, id: usize) -> usize {
        id + self.point_offset
    }

    fn write_points(&mut self) -> std::result::Result<(), EmitError> {
        let mode = self.config.coordinate_mode();
        if mode == CoordinateMode::Stereographic {
            writeln!(self.out, "Point(1) = {{0, 0, 0}};")?;
            writeln!(self.out, "Point(2) = {{0, 0, {EARTH_RADIUS:e}}};")?;
            writeln!(self.out, "PolarSphere(1) = {{1, 2}};")?;
            writeln!(self.out)?;
            self.point_offset = 2;
        }

        for (i, p) in self.topo.points().unique().iter().enumerate() {
            let tag = self.point_tag(i + 1);
            if mode == CoordinateMode::Stereographic {
                let q = stereographic::project(p);
                writeln!(self.out, "Point({tag}) = {{{}, {}, 0}};", q.x, q.y)?;
            } else {
                writeln!(self.out, "Point({tag}) = {{{}, {}, {}}};", p.x, p.y, p.z)?;
            }
        }
        self.report.point_count = self.topo.points().len();
        Ok(())
    }

    fn write_trailer(&mut self) -> std::result::Result<(), EmitError> {
        writeln!(self.out)?;
        writeln!(self.out, "Mesh.RemeshAlgorithm=1;")?;

        if let Some(expr) = self.config.field_expression() {
            writeln!(self.out)?;
            writeln!(self.out, "// Uniform background field")?;
            writeln!(self.out, "Field[1] = MathEval;")?;
            writeln!(self.out, "Field[1].F = \"{expr}\";")?;
            writeln!(self.out, "Background Field = 1;")?;
            writeln!(self.out, "Mesh.CharacteristicLengthExtendFromBoundary = 0;")?;
        }
        Ok(())
    }

    fn finish(self) -> Script {
        Script {
            text: self.out,
            report: self.report,
        }
    }
}

/// Formats items as a comma-separated list.
fn list<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
