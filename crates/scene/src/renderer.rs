use crate::{NodeId, NodeKind, SceneGraph};

/// Renderer-agnostic interface over the scene graph.
///
/// A renderer reads the graph and produces output. It never mutates the
/// graph; transforms are owned by the registry's synchronization step.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &SceneGraph) -> Self::Output;
}

/// Produces an indented, human-readable dump of the attached scene.
///
/// Used by the CLI and in tests in place of a GPU backend.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include hidden nodes (collision sub-meshes, disabled helpers).
    pub show_hidden: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_node(&self, scene: &SceneGraph, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = scene.get(id) else {
            return;
        };
        if !node.visible && !self.show_hidden {
            return;
        }
        let kind = match &node.kind {
            NodeKind::Group => "group",
            NodeKind::Mesh(m) if m.role.is_collision() => "collision",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Light(_) => "light",
        };
        let p = node.transform.position;
        out.push_str(&format!(
            "{:indent$}{} [{kind}] pos=({:.2}, {:.2}, {:.2})",
            "",
            node.name,
            p.x,
            p.y,
            p.z,
            indent = depth * 2
        ));
        if let Some(id) = &node.tags.instance_id {
            out.push_str(&format!(" id={id}"));
        }
        out.push('\n');
        for child in node.children() {
            self.write_node(scene, *child, depth + 1, out);
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Scene ({} nodes) ===\n", scene.len()));
        self.write_node(scene, scene.root(), 0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Material, Mesh, MeshRole, ShapeHint};

    #[test]
    fn empty_scene_prints_root() {
        let scene = SceneGraph::new();
        let out = DebugTextRenderer::new().render(&scene);
        assert!(out.contains("1 nodes"));
        assert!(out.contains("scene [group]"));
    }

    #[test]
    fn hidden_nodes_are_skipped_by_default() {
        let mut scene = SceneGraph::new();
        let mut m = Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Material::default());
        m.role = MeshRole::Collision(ShapeHint::Cuboid);
        let col = scene.create("col_box", NodeKind::Mesh(m));
        scene.get_mut(col).unwrap().visible = false;
        scene.attach(col);

        let out = DebugTextRenderer::new().render(&scene);
        assert!(!out.contains("col_box"));

        let out = DebugTextRenderer { show_hidden: true }.render(&scene);
        assert!(out.contains("col_box [collision]"));
    }
}
