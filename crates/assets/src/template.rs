//! Template models: loaded once per type key, cloned per spawn.
//!
//! The file-format decoder proper is an external concern; templates arrive
//! here as a node-tree document carrying names, transforms, mesh bounds and
//! skin bone lists.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use stagehand_common::Transform;
use stagehand_scene::{
    Aabb, Geometry, Material, Mesh, MeshRole, NodeId, NodeKind, SceneGraph, Skin,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::document::{DocumentFormat, parse_document};
use crate::AssetError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeshDocument {
    pub min: Vec3,
    pub max: Vec3,
    /// Bounding-sphere radius; defaults to the box's enclosing sphere.
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub color: Option<Vec3>,
    /// Names of bone nodes for a skinned mesh.
    #[serde(default)]
    pub skin: Vec<String>,
}

/// One node of a template document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub mesh: Option<TemplateMeshDocument>,
    #[serde(default)]
    pub children: Vec<TemplateDocument>,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// A loaded template: a detached graph the model factory clones from.
#[derive(Debug, Clone)]
pub struct TemplateModel {
    pub key: String,
    pub graph: SceneGraph,
    pub root: NodeId,
    pub skinned: bool,
    pub collision_meshes: usize,
}

impl TemplateModel {
    /// Build a template graph from a document, classifying every mesh by
    /// name as display or collision.
    pub fn from_document(key: &str, doc: &TemplateDocument) -> Result<Self, AssetError> {
        let mut graph = SceneGraph::new();
        let mut by_name: HashMap<String, NodeId> = HashMap::new();
        let mut pending_skins: Vec<(NodeId, Vec<String>)> = Vec::new();
        let mut collision_meshes = 0;

        let root = build_node(
            &mut graph,
            doc,
            None,
            &mut by_name,
            &mut pending_skins,
            &mut collision_meshes,
        );

        let skinned = !pending_skins.is_empty();
        for (mesh_node, bone_names) in pending_skins {
            let mut bones = Vec::with_capacity(bone_names.len());
            for bone in &bone_names {
                let Some(id) = by_name.get(bone) else {
                    return Err(AssetError::TemplateParse(format!(
                        "{key}: skin references unknown bone '{bone}'"
                    )));
                };
                bones.push(*id);
            }
            if let Some(mesh) = graph.get_mut(mesh_node).and_then(|n| n.mesh_mut()) {
                mesh.skin = Some(Skin { bones });
            }
        }

        tracing::debug!(%key, nodes = graph.len(), collision_meshes, skinned, "template built");
        Ok(Self {
            key: key.to_string(),
            graph,
            root,
            skinned,
            collision_meshes,
        })
    }
}

fn build_node(
    graph: &mut SceneGraph,
    doc: &TemplateDocument,
    parent: Option<NodeId>,
    by_name: &mut HashMap<String, NodeId>,
    pending_skins: &mut Vec<(NodeId, Vec<String>)>,
    collision_meshes: &mut usize,
) -> NodeId {
    let kind = match &doc.mesh {
        Some(m) => {
            let geometry = Geometry::from_bounds(Aabb::new(m.min, m.max), m.radius);
            let material = Material::colored(
                format!("{}_material", doc.name),
                m.color.unwrap_or(Vec3::splat(0.8)),
            );
            let mut mesh = Mesh::new(geometry, material);
            mesh.role = MeshRole::classify(&doc.name);
            if mesh.role.is_collision() {
                *collision_meshes += 1;
            }
            NodeKind::Mesh(mesh)
        }
        None => NodeKind::Group,
    };
    let id = graph.create(doc.name.clone(), kind);
    if let Some(node) = graph.get_mut(id) {
        node.transform = Transform {
            position: doc.position,
            rotation: doc.rotation,
            scale: doc.scale,
        };
    }
    if let Some(p) = parent {
        graph.add_child(p, id);
    }
    by_name.entry(doc.name.clone()).or_insert(id);
    if let Some(m) = &doc.mesh {
        if !m.skin.is_empty() {
            pending_skins.push((id, m.skin.clone()));
        }
    }
    for child in &doc.children {
        build_node(graph, child, Some(id), by_name, pending_skins, collision_meshes);
    }
    id
}

/// Source of template documents.
pub trait TemplateLoader {
    fn load(&self, resource_path: &str) -> Result<TemplateDocument, AssetError>;
}

/// Reads template documents (JSON or YAML) relative to a base directory.
#[derive(Debug, Clone)]
pub struct JsonTemplateLoader {
    base_dir: PathBuf,
}

impl JsonTemplateLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl TemplateLoader for JsonTemplateLoader {
    fn load(&self, resource_path: &str) -> Result<TemplateDocument, AssetError> {
        let path = self.base_dir.join(resource_path);
        if !path.exists() {
            return Err(AssetError::TemplateNotFound(path.display().to_string()));
        }
        let format = DocumentFormat::from_path(&path)?;
        let text = std::fs::read_to_string(&path)?;
        parse_document(&text, format)
            .map_err(|e| AssetError::TemplateParse(format!("{}: {e}", path.display())))
    }
}

/// Templates held in memory, keyed by resource path.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateLoader {
    documents: HashMap<String, TemplateDocument>,
}

impl MemoryTemplateLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource_path: impl Into<String>, doc: TemplateDocument) {
        self.documents.insert(resource_path.into(), doc);
    }

    pub fn with(mut self, resource_path: impl Into<String>, doc: TemplateDocument) -> Self {
        self.insert(resource_path, doc);
        self
    }
}

impl TemplateLoader for MemoryTemplateLoader {
    fn load(&self, resource_path: &str) -> Result<TemplateDocument, AssetError> {
        self.documents
            .get(resource_path)
            .cloned()
            .ok_or_else(|| AssetError::TemplateNotFound(resource_path.to_string()))
    }
}

/// Cache of built templates, one per type key.
pub struct ModelLibrary {
    loader: Box<dyn TemplateLoader>,
    cache: HashMap<String, Arc<TemplateModel>>,
}

impl ModelLibrary {
    pub fn new(loader: Box<dyn TemplateLoader>) -> Self {
        Self {
            loader,
            cache: HashMap::new(),
        }
    }

    /// Return the cached template for `key`, loading it from
    /// `resource_path` on first use. Failures are not cached, so a later
    /// call retries.
    pub fn get_or_load(
        &mut self,
        key: &str,
        resource_path: &str,
    ) -> Result<Arc<TemplateModel>, AssetError> {
        if let Some(model) = self.cache.get(key) {
            return Ok(Arc::clone(model));
        }
        let doc = self.loader.load(resource_path)?;
        let model = Arc::new(TemplateModel::from_document(key, &doc)?);
        tracing::info!(%key, %resource_path, "template loaded");
        self.cache.insert(key.to_string(), Arc::clone(&model));
        Ok(model)
    }

    pub fn cached(&self, key: &str) -> Option<Arc<TemplateModel>> {
        self.cache.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
