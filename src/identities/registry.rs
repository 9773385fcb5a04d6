//! Identity library
//!
//! Built-in presets plus optional presets loaded from YAML files.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::definition::IdentityDefinition;

/// Ordered library of notation presets
#[derive(Debug, Clone)]
pub struct IdentityLibrary {
    /// Entries in registration order
    entries: Vec<IdentityDefinition>,

    /// Name → index into `entries`
    by_name: HashMap<String, usize>,
}

impl Default for IdentityLibrary {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl IdentityLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a library holding the built-in presets
    pub fn with_builtins() -> Self {
        let mut library = Self::new();
        library.register_builtins();
        library
    }

    /// Built-ins plus every YAML file under `dir` (recursive)
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut library = Self::with_builtins();
        library.extend_from_dir(dir)?;
        Ok(library)
    }

    /// Add every YAML file under `dir`; returns the number of identities added
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn extend_from_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            warn!("Identity directory does not exist: {:?}", dir);
            return Ok(0);
        }

        let count = self.load_dir_recursive(dir)?;

        info!("Loaded {} identities from {:?}", count, dir);

        Ok(count)
    }

    fn load_dir_recursive(&mut self, dir: &Path) -> Result<usize> {
        let mut entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read {:?}", dir))?
            .collect::<std::io::Result<Vec<_>>>()?;
        // Later files override earlier ones; keep that deterministic
        entries.sort_by_key(|e| e.path());

        let mut total = 0;
        for entry in entries {
            let path = entry.path();

            if path.is_dir() {
                total += self.load_dir_recursive(&path)?;
            } else if path
                .extension()
                .map(|e| e == "yaml" || e == "yml")
                .unwrap_or(false)
            {
                match self.load_file(&path) {
                    Ok(count) => {
                        debug!("Loaded {} identities from {:?}", count, path);
                        total += count;
                    }
                    Err(e) => warn!("Failed to load identities from {:?}: {:#}", path, e),
                }
            }
        }

        Ok(total)
    }

    /// Load one YAML file (a map of name → definition)
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        let defs: HashMap<String, IdentityDefinition> = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;

        // HashMap order is arbitrary; register by name for a stable listing
        let mut defs: Vec<_> = defs.into_iter().collect();
        defs.sort_by(|a, b| a.0.cmp(&b.0));

        let count = defs.len();
        for (name, mut def) in defs {
            def.name = name;
            self.register(def);
        }

        Ok(count)
    }

    /// Register an identity, replacing any entry with the same name
    pub fn register(&mut self, def: IdentityDefinition) {
        match self.by_name.get(&def.name) {
            Some(&index) => {
                warn!("Identity {:?} redefined; replacing previous entry", def.name);
                self.entries[index] = def;
            }
            None => {
                self.by_name.insert(def.name.clone(), self.entries.len());
                self.entries.push(def);
            }
        }
    }

    /// Get an identity by name
    pub fn get(&self, name: &str) -> Option<&IdentityDefinition> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdentityDefinition> {
        self.entries.iter()
    }

    /// Identities usable in `dimension`
    pub fn supporting(&self, dimension: usize) -> impl Iterator<Item = &IdentityDefinition> {
        self.entries.iter().filter(move |d| d.supports(dimension))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn register_builtins(&mut self) {
        // 2D & 3D shapes
        self.register(
            IdentityDefinition::new("Circle/Sphere", "sum(Dim^2) = r^2")
                .with_param("r", 5.0)
                .with_description("Circle (2D) or Sphere (3D)"),
        );
        self.register(
            IdentityDefinition::new("Diamond/Octahedron", "sum(|Dim|) = r")
                .with_param("r", 1.0)
                .with_description("Diamond (2D) or Octahedron (3D)"),
        );
        self.register(
            IdentityDefinition::new("Square/Cube", "max(|Dim|) = r")
                .with_param("r", 1.0)
                .with_description("Square (2D) or Cube (3D)"),
        );

        // Ellipsoids
        self.register(
            IdentityDefinition::new("Ellipse/Ellipsoid", "sum(Dim^2/a^2) = 1")
                .with_param("a", 2.0)
                .with_description("Ellipse (2D) or Ellipsoid (3D) - uniform scaling"),
        );
        self.register(
            IdentityDefinition::new(
                "Scaled Ellipsoid",
                "Dim[0]^2/a^2 + Dim[1]^2/b^2 + Dim[2]^2/c^2 = 1",
            )
            .with_param("a", 3.0)
            .with_param("b", 2.0)
            .with_param("c", 1.0)
            .with_description("Ellipsoid with different axis scales (3D only)")
            .with_min_dim(3),
        );

        // Superquadrics
        self.register(
            IdentityDefinition::new("Superellipse/Superquadric", "sum(|Dim|^p) = r^p")
                .with_param("r", 1.0)
                .with_param("p", 2.5)
                .with_description("Rounded square (p>2) or pinched diamond (p<2)"),
        );

        // Hyperboloids
        self.register(
            IdentityDefinition::new(
                "Hyperbola/Hyperboloid (1-sheet)",
                "Dim[0]^2 + Dim[1]^2 - Dim[2]^2 = 1",
            )
            .with_description("Hyperboloid of one sheet (3D)")
            .with_min_dim(3),
        );
        self.register(
            IdentityDefinition::new(
                "Hyperboloid (2-sheet)",
                "Dim[0]^2 + Dim[1]^2 - Dim[2]^2 = -1",
            )
            .with_description("Hyperboloid of two sheets (3D)")
            .with_min_dim(3),
        );

        // Planes & hyperplanes
        self.register(
            IdentityDefinition::new("Line/Plane/Hyperplane", "sum(Dim) = 0")
                .with_description("Line (2D), Plane (3D), or Hyperplane (nD)"),
        );

        self.register(
            IdentityDefinition::new(
                "Torus",
                "(sqrt(Dim[0]^2 + Dim[1]^2) - R)^2 + Dim[2]^2 = r^2",
            )
            .with_param("R", 3.0)
            .with_param("r", 1.0)
            .with_description("Torus (3D) - donut shape")
            .with_min_dim(3),
        );

        self.register(
            IdentityDefinition::new("Hyperbolic Paraboloid", "Dim[0]^2 - Dim[1]^2 = Dim[2]")
                .with_description("Saddle surface (3D)")
                .with_min_dim(3),
        );

        // Norm-based
        self.register(
            IdentityDefinition::new("Norm Ball", "sum(Dim^2)^0.5 = r")
                .with_param("r", 5.0)
                .with_description("Same as sphere, using explicit norm"),
        );

        self.register(
            IdentityDefinition::new("Astroid", "sum(|Dim|^(2/3)) = 1")
                .with_description("Star-like shape"),
        );
    }
}
