use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use stagehand_common::{InstanceId, Transform};
use std::collections::{BTreeMap, HashMap};

use crate::{Geometry, Light, Material};

/// Handle to a node in a `SceneGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Collider shape chosen for a collision sub-mesh.
///
/// Decided once when a template is loaded, from the sub-mesh name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeHint {
    Ball,
    Capsule,
    Cuboid,
}

impl ShapeHint {
    /// Names containing "sphere" or "ball" are balls, "capsule" capsules,
    /// everything else a box.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("sphere") || lower.contains("ball") {
            Self::Ball
        } else if lower.contains("capsule") {
            Self::Capsule
        } else {
            Self::Cuboid
        }
    }
}

/// Whether a mesh is drawn or only feeds collider derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshRole {
    Display,
    Collision(ShapeHint),
}

impl MeshRole {
    const COLLISION_PREFIXES: [&'static str; 3] = ["col_", "collider_", "collision_"];

    /// Classify a sub-mesh by its name prefix.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if Self::COLLISION_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
        {
            Self::Collision(ShapeHint::from_name(&lower))
        } else {
            Self::Display
        }
    }

    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision(_))
    }
}

/// Bones driving a skinned mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skin {
    pub bones: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub role: MeshRole,
    pub skin: Option<Skin>,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            role: MeshRole::Display,
            skin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeKind {
    #[default]
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// Runtime bookkeeping written onto nodes by the core.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeTags {
    /// Set on an instance's visual node when it is registered.
    pub instance_id: Option<InstanceId>,
    /// Set on every node cloned from a template: the instance's root node.
    pub root_model: Option<NodeId>,
    /// True while the direct-manipulation controller drives the node's body.
    pub manual_motion: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    /// Transform relative to the parent.
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    pub tags: NodeTags,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            transform: Transform::default(),
            visible: true,
            kind,
            tags: NodeTags::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(l) => Some(l),
            _ => None,
        }
    }
}

/// Arena of scene nodes with a single root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: BTreeMap::new(),
            root: NodeId(0),
            next_id: 0,
        };
        graph.root = graph.create("scene", NodeKind::Group);
        graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached node.
    pub fn create(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(name.into(), kind));
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    /// Reparent `child` under `parent`. Returns false if either is missing or
    /// the move would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return false;
        }
        if self.is_ancestor_of(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Add a node directly under the scene root.
    pub fn attach(&mut self, child: NodeId) -> bool {
        self.add_child(self.root, child)
    }

    /// Remove a node from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
    }

    /// Detach and drop a node with all its descendants. Returns how many
    /// nodes were dropped.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        self.detach(id);
        let doomed = self.descendants(id);
        for n in &doomed {
            self.nodes.remove(n);
        }
        doomed.len()
    }

    /// Whether a node is reachable from the scene root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// Parents of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let this = current?;
            current = self.nodes.get(&this).and_then(|n| n.parent);
            Some(this)
        })
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// The node and all of its descendants, depth-first, node first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.nodes.get(&n) else {
                continue;
            };
            out.push(n);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// Local-to-world matrix, composed through every ancestor.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        let mut m = node.transform.to_matrix();
        for a in self.ancestors(id) {
            if let Some(parent) = self.nodes.get(&a) {
                m = parent.transform.to_matrix() * m;
            }
        }
        Some(m)
    }

    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        self.world_matrix(id).map(Transform::from_matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// Deep-copy a subtree from `source` into this graph, detached.
    ///
    /// Skin bone lists, light targets and root-model back-references that
    /// point inside the copied subtree are remapped to the copies, so a
    /// skinned clone animates its own skeleton.
    pub fn clone_subtree_from(&mut self, source: &SceneGraph, src_root: NodeId) -> Option<NodeId> {
        if !source.contains(src_root) {
            return None;
        }
        let order = source.descendants(src_root);
        let mut remap: HashMap<NodeId, NodeId> = HashMap::with_capacity(order.len());

        for src in &order {
            let Some(node) = source.get(*src) else {
                continue;
            };
            let id = self.create(node.name.clone(), node.kind.clone());
            if let Some(copy) = self.nodes.get_mut(&id) {
                copy.transform = node.transform;
                copy.visible = node.visible;
                copy.tags = node.tags.clone();
            }
            remap.insert(*src, id);
        }

        for src in &order {
            let (Some(node), Some(&copy)) = (source.get(*src), remap.get(src)) else {
                continue;
            };
            if *src != src_root {
                if let Some(&parent) = node.parent.as_ref().and_then(|p| remap.get(p)) {
                    self.add_child(parent, copy);
                }
            }
            let Some(copy_node) = self.nodes.get_mut(&copy) else {
                continue;
            };
            if let Some(root_model) = copy_node.tags.root_model {
                copy_node.tags.root_model = remap.get(&root_model).copied();
            }
            match &mut copy_node.kind {
                NodeKind::Mesh(Mesh {
                    skin: Some(skin), ..
                }) => {
                    for bone in &mut skin.bones {
                        if let Some(mapped) = remap.get(bone) {
                            *bone = *mapped;
                        }
                    }
                }
                NodeKind::Light(light) => {
                    if let Some(target) = light.target {
                        light.target = remap.get(&target).copied().or(Some(target));
                    }
                }
                _ => {}
            }
        }

        let root = remap.get(&src_root).copied();
        tracing::trace!(nodes = order.len(), ?root, "cloned subtree");
        root
    }
}
