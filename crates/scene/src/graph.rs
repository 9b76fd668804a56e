use foundation::bounds::Aabb3;
use foundation::handles::Handle;
use foundation::math::{Mat4, Vec3};

use crate::components::{Mesh, Transform};
use crate::entity::NodeId;

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub mesh: Option<Mesh>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, transform: Transform) -> Self {
        Self {
            name,
            transform,
            visible: true,
            mesh: None,
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
}

/// Hierarchical set of named nodes.
///
/// Nodes are never removed individually; the whole graph is dropped at
/// teardown. Ordering contract: `find_by_name` and `descendants` visit nodes
/// in creation order / child order, so results are deterministic.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        (id.index() as usize) < self.nodes.len()
    }

    /// Adds a parentless node.
    pub fn add_node(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        let id = NodeId(Handle::new(self.nodes.len() as u32, 0));
        self.nodes.push(Node::new(name.into(), transform));
        id
    }

    /// Adds a node under `parent`. An unknown parent yields a root node.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> NodeId {
        let id = self.add_node(name, transform);
        self.set_parent(id, Some(parent));
        id
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        mesh: Mesh,
    ) -> NodeId {
        let id = self.add_child(parent, name, transform);
        self.nodes[id.index() as usize].mesh = Some(mesh);
        id
    }

    /// Re-parents `child`. Returns `false` (and changes nothing) when either
    /// node is unknown or the move would create a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if !self.contains(child) {
            return false;
        }
        if let Some(p) = parent {
            if !self.contains(p) || p == child || self.is_ancestor(child, p) {
                return false;
            }
        }

        if let Some(old) = self.nodes[child.index() as usize].parent.take() {
            self.nodes[old.index() as usize]
                .children
                .retain(|c| *c != child);
        }
        if let Some(p) = parent {
            self.nodes[p.index() as usize].children.push(child);
        }
        self.nodes[child.index() as usize].parent = parent;
        true
    }

    /// True if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.parent(p);
        }
        false
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index() as usize)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn transform(&self, id: NodeId) -> Option<Transform> {
        self.node(id).map(|n| n.transform)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|n| &mut n.transform)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        if let Some(n) = self.node_mut(id) {
            n.transform = transform;
        }
    }

    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        self.node(id).and_then(|n| n.mesh.as_ref())
    }

    /// First node whose name equals `name` exactly.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|idx| NodeId(Handle::new(idx as u32, 0)))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|idx| NodeId(Handle::new(idx as u32, 0)))
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.ids().filter(|id| self.parent(*id).is_none()).collect()
    }

    /// `id` followed by all of its descendants, depth-first pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Mutable access to every mesh under `id` (inclusive).
    pub fn for_each_mesh_mut(&mut self, id: NodeId, mut f: impl FnMut(NodeId, &mut Mesh)) {
        for n in self.descendants(id) {
            if let Some(mesh) = self.nodes[n.index() as usize].mesh.as_mut() {
                f(n, mesh);
            }
        }
    }

    pub fn local_matrix(&self, id: NodeId) -> Mat4 {
        self.transform(id)
            .map(|t| t.matrix())
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Matrix taking `id`'s local space into `ancestor`'s local space.
    ///
    /// With `None`, or when `ancestor` is not above `id`, this is the world
    /// matrix.
    pub fn matrix_relative_to(&self, id: NodeId, ancestor: Option<NodeId>) -> Mat4 {
        let mut m = self.local_matrix(id);
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            if Some(p) == ancestor {
                break;
            }
            m = self.local_matrix(p).mul(&m);
            cursor = self.parent(p);
        }
        m
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        self.matrix_relative_to(id, None)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.contains(id)
            .then(|| self.world_matrix(id).transform_point(Vec3::ZERO))
    }

    /// Union of mesh bounds under `id` (inclusive), expressed in
    /// `relative_to`'s local space (world space with `None`).
    pub fn subtree_bounds(&self, id: NodeId, relative_to: Option<NodeId>) -> Aabb3 {
        let mut out = Aabb3::empty();
        for n in self.descendants(id) {
            let Some(mesh) = self.mesh(n) else {
                continue;
            };
            let m = self.matrix_relative_to(n, relative_to);
            out = out.union(&mesh.local_bounds().transformed(&m));
        }
        out
    }

    /// True if `id` and all of its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            match self.node(n) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }
}
