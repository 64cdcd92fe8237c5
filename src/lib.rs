pub mod config;
pub mod domain;
pub mod emit;
pub mod error;
pub mod math;
pub mod mesher;
pub mod topology;

pub use config::MeshConfig;
pub use domain::Domain;
pub use emit::{GeoWriter, Script, ScriptReport};
pub use error::{GeoscriptError, Result};
