mod command;

pub use command::{Command, ConfigBuilder};

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// Coordinate space the domain points are given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    /// Planar coordinates written as-is (`F`).
    #[default]
    Flat,
    /// Longitude/latitude meshed flat and projected to the sphere
    /// afterwards (`L`). Points are written unchanged.
    LonLat,
    /// Longitude/latitude projected into Gmsh's polar stereographic plane
    /// (`S`).
    Stereographic,
}

impl FromStr for CoordinateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Self::Flat),
            "L" => Ok(Self::LonLat),
            "S" => Ok(Self::Stereographic),
            other => Err(ConfigError::UnknownCoordinateMode(other.to_owned())),
        }
    }
}

/// Primitive used for boundary curves and whether runs are wrapped in
/// compound lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveStyle {
    /// One `Line` per boundary edge (`LN`).
    Lines,
    /// `Line` primitives grouped into `Compound Line`s (`LY`).
    CompoundLines,
    /// One `BSpline` per merged segment (`BN`).
    #[default]
    Splines,
    /// `BSpline`s each wrapped in a `Compound Line` (`BY`).
    CompoundSplines,
}

impl CurveStyle {
    /// Returns `true` if segments are written as `BSpline`s.
    #[must_use]
    pub fn uses_splines(self) -> bool {
        matches!(self, Self::Splines | Self::CompoundSplines)
    }

    /// Returns `true` if curves are wrapped in `Compound Line`s.
    #[must_use]
    pub fn uses_compounds(self) -> bool {
        matches!(self, Self::CompoundLines | Self::CompoundSplines)
    }

    /// Returns `true` if consecutive lines are merged into segments.
    #[must_use]
    pub fn merges_segments(self) -> bool {
        self != Self::Lines
    }
}

impl FromStr for CurveStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LN" => Ok(Self::Lines),
            "LY" => Ok(Self::CompoundLines),
            "BN" => Ok(Self::Splines),
            "BY" => Ok(Self::CompoundSplines),
            other => Err(ConfigError::UnknownCurveStyle(other.to_owned())),
        }
    }
}

/// Immutable configuration for one compiler invocation.
///
/// Built once by [`ConfigBuilder`] (usually from command tokens via
/// [`MeshConfig::from_args`]) and passed by reference through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MeshConfig {
    pub(crate) coordinate_mode: CoordinateMode,
    pub(crate) curve_style: CurveStyle,
    pub(crate) default_boundary_id: i64,
    pub(crate) field_expression: Option<String>,
    pub(crate) geo_path: Option<PathBuf>,
    pub(crate) domain_path: Option<PathBuf>,
    pub(crate) run_mesher: bool,
    pub(crate) show_help: bool,
}

impl MeshConfig {
    /// Parses command tokens into a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown commands, missing arguments or
    /// unrecognised mode tokens.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = ConfigBuilder::new();
        for command in Command::parse_all(args)? {
            builder = builder.apply(command);
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn coordinate_mode(&self) -> CoordinateMode {
        self.coordinate_mode
    }

    #[must_use]
    pub fn curve_style(&self) -> CurveStyle {
        self.curve_style
    }

    /// Boundary id assigned to boundary runs that carry none.
    #[must_use]
    pub fn default_boundary_id(&self) -> i64 {
        self.default_boundary_id
    }

    /// Expression for the uniform-mesh background field, if requested.
    #[must_use]
    pub fn field_expression(&self) -> Option<&str> {
        self.field_expression.as_deref()
    }

    #[must_use]
    pub fn domain_path(&self) -> Option<&Path> {
        self.domain_path.as_deref()
    }

    #[must_use]
    pub fn run_mesher(&self) -> bool {
        self.run_mesher
    }

    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Returns the output script path: the configured one, or
    /// `<domain stem>_idBoundary.geo` next to the domain file.
    #[must_use]
    pub fn geo_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.geo_path {
            return Some(path.clone());
        }
        let domain = self.domain_path.as_ref()?;
        let stem = domain.file_stem()?.to_string_lossy();
        Some(domain.with_file_name(format!("{stem}_idBoundary.geo")))
    }
}
