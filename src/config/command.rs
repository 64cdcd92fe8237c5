use std::path::PathBuf;

use super::{CoordinateMode, CurveStyle, MeshConfig};
use crate::error::ConfigError;

/// One parsed command-line directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `-h`, `--help`
    Help,
    /// `--defid <id>`
    DefaultId(i64),
    /// `-g`, `--geo <path>`
    GeoPath(PathBuf),
    /// `--mesh`
    Mesh,
    /// `-c`, `--coord <F|L|S>`
    Coordinates(CoordinateMode),
    /// `-l`, `--line <LN|LY|BN|BY>`
    LineStyle(CurveStyle),
    /// `--mval <expr>`
    MathEval(String),
    /// Positional `*.json` domain document.
    Domain(PathBuf),
}

impl Command {
    /// Parses a whole token stream into commands.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCommand` for unrecognised tokens and
    /// `ConfigError::MissingArgument` when a command's argument is absent.
    pub fn parse_all<I, S>(tokens: I) -> Result<Vec<Self>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::<String>::into);
        let mut commands = Vec::new();

        while let Some(token) = tokens.next() {
            let command = match token.as_str() {
                "-h" | "--help" => Self::Help,
                "--defid" => {
                    let value = next_value(&mut tokens, "--defid")?;
                    let id = value.parse().map_err(|_| ConfigError::InvalidValue {
                        command: "--defid",
                        value,
                    })?;
                    Self::DefaultId(id)
                }
                "-g" | "--geo" => Self::GeoPath(next_value(&mut tokens, "--geo")?.into()),
                "--mesh" => Self::Mesh,
                "-c" | "--coord" => Self::Coordinates(next_value(&mut tokens, "--coord")?.parse()?),
                "-l" | "--line" => Self::LineStyle(next_value(&mut tokens, "--line")?.parse()?),
                "--mval" => Self::MathEval(next_value(&mut tokens, "--mval")?),
                path if is_domain_file(path) => Self::Domain(PathBuf::from(path)),
                _ => return Err(ConfigError::UnknownCommand(token.clone())),
            };
            commands.push(command);
        }

        Ok(commands)
    }
}

fn next_value(
    tokens: &mut impl Iterator<Item = String>,
    command: &'static str,
) -> Result<String, ConfigError> {
    tokens
        .next()
        .ok_or(ConfigError::MissingArgument { command })
}

fn is_domain_file(token: &str) -> bool {
    !token.starts_with('-')
        && std::path::Path::new(token)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Accumulates [`Command`]s into a [`MeshConfig`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: MeshConfig,
}

impl ConfigBuilder {
    /// Creates a builder holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one command.
    #[must_use]
    pub fn apply(self, command: Command) -> Self {
        match command {
            Command::Help => self.help(),
            Command::DefaultId(id) => self.default_boundary_id(id),
            Command::GeoPath(path) => self.geo_path(path),
            Command::Mesh => self.run_mesher(),
            Command::Coordinates(mode) => self.coordinate_mode(mode),
            Command::LineStyle(style) => self.curve_style(style),
            Command::MathEval(expr) => self.field_expression(expr),
            Command::Domain(path) => self.domain_path(path),
        }
    }

    #[must_use]
    pub fn help(mut self) -> Self {
        self.config.show_help = true;
        self
    }

    #[must_use]
    pub fn default_boundary_id(mut self, id: i64) -> Self {
        self.config.default_boundary_id = id;
        self
    }

    #[must_use]
    pub fn geo_path(mut self, path: PathBuf) -> Self {
        self.config.geo_path = Some(path);
        self
    }

    #[must_use]
    pub fn run_mesher(mut self) -> Self {
        self.config.run_mesher = true;
        self
    }

    #[must_use]
    pub fn coordinate_mode(mut self, mode: CoordinateMode) -> Self {
        self.config.coordinate_mode = mode;
        self
    }

    #[must_use]
    pub fn curve_style(mut self, style: CurveStyle) -> Self {
        self.config.curve_style = style;
        self
    }

    #[must_use]
    pub fn field_expression(mut self, expr: String) -> Self {
        self.config.field_expression = Some(expr);
        self
    }

    #[must_use]
    pub fn domain_path(mut self, path: PathBuf) -> Self {
        self.config.domain_path = Some(path);
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> MeshConfig {
        self.config
    }
}
