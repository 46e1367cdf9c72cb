use stagehand_scene::{NodeId, SceneGraph};
use std::collections::VecDeque;

/// Finished visual nodes waiting to be attached to the scene.
///
/// `drain` attaches at most `budget` nodes per call, spreading a large batch
/// spawn over several frames.
#[derive(Debug, Clone)]
pub struct InsertQueue {
    pending: VecDeque<NodeId>,
    budget: usize,
}

impl Default for InsertQueue {
    fn default() -> Self {
        Self::new(8)
    }
}

impl InsertQueue {
    pub fn new(budget: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            budget: budget.max(1),
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn set_budget(&mut self, budget: usize) {
        self.budget = budget.max(1);
    }

    pub fn push(&mut self, node: NodeId) {
        self.pending.push_back(node);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.pending.contains(&node)
    }

    /// Attach up to `budget` queued nodes to the scene root. Nodes removed
    /// while queued are dropped without counting. Returns how many were
    /// attached.
    pub fn drain(&mut self, scene: &mut SceneGraph) -> usize {
        let mut attached = 0;
        while attached < self.budget {
            let Some(node) = self.pending.pop_front() else {
                break;
            };
            if scene.contains(node) && scene.attach(node) {
                attached += 1;
            }
        }
        if attached > 0 {
            tracing::debug!(attached, remaining = self.pending.len(), "scene insertions");
        }
        attached
    }

    /// Attach everything queued, ignoring the budget.
    pub fn flush(&mut self, scene: &mut SceneGraph) -> usize {
        let mut attached = 0;
        while let Some(node) = self.pending.pop_front() {
            if scene.contains(node) && scene.attach(node) {
                attached += 1;
            }
        }
        attached
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
