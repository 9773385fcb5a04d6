//! Configuration loader
//!
//! Resolves where extra identity YAML files live and the default working
//! dimension, then loads the identity library.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::axes::DEFAULT_AXIS_NAMES;
use crate::identities::IdentityLibrary;

pub const IDENTITY_DIR_ENV: &str = "DIMEXPAND_IDENTITY_DIR";
pub const DEFAULT_DIMENSION_ENV: &str = "DIMEXPAND_DEFAULT_DIMENSION";

const RELATIVE_IDENTITY_DIR: &str = "config/identities";

/// Library location and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Extra identity directory; `None` means built-ins only
    pub identity_dir: Option<PathBuf>,
    pub default_dimension: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            identity_dir: None,
            default_dimension: 2,
        }
    }
}

impl LibraryConfig {
    /// Read configuration from the environment
    ///
    /// Identity directory resolution order:
    /// 1. DIMEXPAND_IDENTITY_DIR environment variable (explicit override)
    /// 2. Relative "config/identities" (works when running from the crate root)
    /// 3. CARGO_MANIFEST_DIR/config/identities (set by cargo during test/run)
    /// 4. None, built-ins only
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var(IDENTITY_DIR_ENV).ok(),
            std::env::var(DEFAULT_DIMENSION_ENV).ok(),
        )
    }

    fn from_values(identity_dir: Option<String>, default_dimension: Option<String>) -> Result<Self> {
        let identity_dir = match identity_dir {
            Some(dir) => Some(PathBuf::from(dir)),
            None => Self::find_identity_dir(),
        };

        let default_dimension = match default_dimension {
            Some(raw) => {
                let dim: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} is not a number: {:?}", DEFAULT_DIMENSION_ENV, raw))?;
                if dim == 0 || dim > DEFAULT_AXIS_NAMES.len() {
                    bail!(
                        "{} must be in 1..={} (got {})",
                        DEFAULT_DIMENSION_ENV,
                        DEFAULT_AXIS_NAMES.len(),
                        dim
                    );
                }
                dim
            }
            None => Self::default().default_dimension,
        };

        debug!(
            "Library config: identity_dir={:?}, default_dimension={}",
            identity_dir, default_dimension
        );

        Ok(Self {
            identity_dir,
            default_dimension,
        })
    }

    fn find_identity_dir() -> Option<PathBuf> {
        if Path::new(RELATIVE_IDENTITY_DIR).is_dir() {
            return Some(PathBuf::from(RELATIVE_IDENTITY_DIR));
        }

        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let path = Path::new(&manifest_dir).join(RELATIVE_IDENTITY_DIR);
            if path.is_dir() {
                return Some(path);
            }
        }

        None
    }

    /// Built-in identities plus any found in `identity_dir`
    pub fn load_library(&self) -> Result<IdentityLibrary> {
        match &self.identity_dir {
            Some(dir) => {
                info!("Loading identities from {}", dir.display());
                IdentityLibrary::load_from_dir(dir)
            }
            None => Ok(IdentityLibrary::with_builtins()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values() {
        let config =
            LibraryConfig::from_values(Some("/tmp/ids".into()), Some(" 3 ".into())).unwrap();
        assert_eq!(config.identity_dir, Some(PathBuf::from("/tmp/ids")));
        assert_eq!(config.default_dimension, 3);
    }

    #[test]
    fn test_bad_default_dimension() {
        assert!(LibraryConfig::from_values(None, Some("three".into())).is_err());
        assert!(LibraryConfig::from_values(None, Some("0".into())).is_err());
        assert!(LibraryConfig::from_values(None, Some("11".into())).is_err());
    }

    #[test]
    fn test_load_library_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("extra.yaml"),
            "Cylinder:\n  expr: Dim[0]^2 + Dim[1]^2 = r^2\n  params: { r: 1 }\n  min_dim: 3\n",
        )
        .unwrap();

        let config = LibraryConfig {
            identity_dir: Some(dir.path().to_path_buf()),
            default_dimension: 2,
        };
        let library = config.load_library().unwrap();
        assert!(library.get("Cylinder").is_some());
        assert!(library.get("Circle/Sphere").is_some());

        let builtins = LibraryConfig::default().load_library().unwrap();
        assert_eq!(builtins.len(), IdentityLibrary::with_builtins().len());
    }
}
