use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::MeshError;

/// Name of the log file written next to the geometry script.
pub const LOG_FILE: &str = "output.log";

/// Files produced by a mesher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshOutput {
    /// Where the mesher writes the 2D mesh.
    pub mesh_path: PathBuf,
    /// Combined stdout and stderr of the run.
    pub log_path: PathBuf,
}

/// Runs the external mesh generator on a geometry script.
#[derive(Debug, Clone)]
pub struct MeshRunner {
    program: String,
}

impl Default for MeshRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRunner {
    /// Creates a runner invoking `gmsh` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("gmsh")
    }

    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `<program> -2 <geo_path>` and captures its output into
    /// `output.log` beside the script.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`] if the program cannot be started, the log
    /// cannot be written, or the program exits unsuccessfully.
    pub fn execute(&self, geo_path: &Path) -> Result<MeshOutput, MeshError> {
        let log_path = geo_path.with_file_name(LOG_FILE);
        let log_error = |source| MeshError::Log {
            path: log_path.clone(),
            source,
        };

        // Both streams go through handles sharing one file offset.
        let log = File::create(&log_path).map_err(log_error)?;
        let stderr = log.try_clone().map_err(log_error)?;

        tracing::info!(program = %self.program, geo = %geo_path.display(), "running mesher");
        let mut child = Command::new(&self.program)
            .arg("-2")
            .arg(geo_path)
            .stdout(Stdio::piped())
            .stderr(stderr)
            .spawn()
            .map_err(|source| MeshError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(stdout) = child.stdout.take() {
            let mut writer = BufWriter::new(log);
            for line in BufReader::new(stdout).lines() {
                let line = line.map_err(log_error)?;
                tracing::debug!(target: "geoscript::mesher", "{line}");
                writeln!(writer, "{line}").map_err(log_error)?;
            }
            writer.flush().map_err(log_error)?;
        }

        let status = child.wait().map_err(|source| MeshError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(MeshError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        Ok(MeshOutput {
            mesh_path: geo_path.with_extension("msh"),
            log_path,
        })
    }
}
