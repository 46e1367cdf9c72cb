use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::document::{DocumentFormat, parse_document};
use crate::AssetError;

/// Baseline configuration for one custom asset type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTypeDescriptor {
    pub key: String,
    pub resource_path: String,
    pub scale: f32,
    pub mass: f32,
    pub restitution: f32,
    pub ui_scale: Option<f32>,
    pub display_layer: Option<i32>,
}

/// Entry as written in a type document. `path` is optional here so that a
/// malformed entry can be reported and skipped instead of failing the load.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    key: Option<String>,
    #[serde(alias = "resource_path")]
    path: Option<String>,
    #[serde(default = "default_scale")]
    scale: f32,
    #[serde(default = "default_mass")]
    mass: f32,
    #[serde(default)]
    restitution: f32,
    ui_scale: Option<f32>,
    display_layer: Option<i32>,
}

fn default_scale() -> f32 {
    1.0
}

fn default_mass() -> f32 {
    1.0
}

/// Named asset types mapped to load paths and physical baselines.
///
/// Loaded once from a declarative document and frozen afterwards. Names map
/// to canonical keys; descriptors are stored by key.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    names: BTreeMap<String, String>,
    descriptors: BTreeMap<String, AssetTypeDescriptor>,
    loaded: bool,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of accepted descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Load a document mapping type names to descriptors.
    ///
    /// Returns how many descriptors were accepted. A second call on a loaded
    /// registry is a no-op returning 0.
    pub fn load_str(&mut self, source: &str, format: DocumentFormat) -> Result<usize, AssetError> {
        if self.loaded {
            tracing::debug!("type registry already loaded, ignoring");
            return Ok(0);
        }
        let entries: BTreeMap<String, serde_json::Value> = parse_document(source, format)?;
        Ok(self.load_entries(entries))
    }

    /// Load from a JSON or YAML file.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize, AssetError> {
        if self.loaded {
            tracing::debug!("type registry already loaded, ignoring");
            return Ok(0);
        }
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text, format)
    }

    fn load_entries(&mut self, entries: BTreeMap<String, serde_json::Value>) -> usize {
        for (name, value) in entries {
            let raw: RawDescriptor = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(%name, error = %e, "skipping malformed asset type");
                    continue;
                }
            };
            let Some(resource_path) = raw.path.filter(|p| !p.trim().is_empty()) else {
                tracing::warn!(%name, "skipping asset type without a resource path");
                continue;
            };
            let key = raw.key.unwrap_or_else(|| name.clone());
            self.names.insert(name, key.clone());
            self.descriptors.insert(
                key.clone(),
                AssetTypeDescriptor {
                    key,
                    resource_path,
                    scale: raw.scale,
                    mass: raw.mass,
                    restitution: raw.restitution,
                    ui_scale: raw.ui_scale,
                    display_layer: raw.display_layer,
                },
            );
        }
        self.loaded = true;
        tracing::info!(types = self.descriptors.len(), "asset type registry loaded");
        self.descriptors.len()
    }

    /// Canonical key for a type name.
    ///
    /// A key passes through unchanged. Unknown identifiers also come back
    /// unchanged, with a diagnostic.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if let Some(key) = self.names.get(name) {
            return key;
        }
        if !self.descriptors.contains_key(name) {
            tracing::debug!(%name, "unknown asset type identifier");
        }
        name
    }

    /// Whether a name or key refers to a loaded descriptor.
    pub fn recognizes(&self, name: &str) -> bool {
        self.descriptors.contains_key(self.resolve(name))
    }

    pub fn descriptor(&self, key: &str) -> Option<&AssetTypeDescriptor> {
        self.descriptors.get(key)
    }

    /// Resolve a name or key and return its descriptor.
    pub fn lookup(&self, name: &str) -> Option<&AssetTypeDescriptor> {
        self.descriptor(self.resolve(name))
    }

    /// Reverse lookup: the type name registered for a key.
    pub fn name_for_key(&self, key: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, k)| k.as_str() == key)
            .map(|(name, _)| name.as_str())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AssetTypeDescriptor> {
        self.descriptors.values()
    }
}
