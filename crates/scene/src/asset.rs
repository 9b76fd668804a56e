use crate::animation::AnimationClip;
use crate::entity::NodeId;
use crate::graph::SceneGraph;

/// A parsed asset handed over by the loading collaborator.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub graph: SceneGraph,
    pub root: NodeId,
    pub clips: Vec<AnimationClip>,
}

impl LoadedAsset {
    pub fn new(
        graph: SceneGraph,
        root: NodeId,
        clips: Vec<AnimationClip>,
    ) -> Result<Self, AssetError> {
        if graph.is_empty() || !graph.contains(root) {
            return Err(AssetError::EmptyScene);
        }
        Ok(Self { graph, root, clips })
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    Fetch { source: String, reason: String },
    Parse { source: String, reason: String },
    EmptyScene,
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Fetch { source, reason } => {
                write!(f, "failed to fetch asset {source}: {reason}")
            }
            AssetError::Parse { source, reason } => {
                write!(f, "failed to parse asset {source}: {reason}")
            }
            AssetError::EmptyScene => write!(f, "asset contains no usable scene root"),
        }
    }
}

impl std::error::Error for AssetError {}

#[cfg(test)]
mod tests {
    use super::{AssetError, LoadedAsset};
    use crate::components::Transform;
    use crate::entity::NodeId;
    use crate::graph::SceneGraph;
    use foundation::handles::Handle;

    #[test]
    fn rejects_empty_graph() {
        let err = LoadedAsset::new(SceneGraph::new(), NodeId(Handle::new(0, 0)), vec![])
            .unwrap_err();
        assert_eq!(err, AssetError::EmptyScene);
    }

    #[test]
    fn rejects_dangling_root() {
        let mut g = SceneGraph::new();
        g.add_node("only", Transform::identity());
        let err = LoadedAsset::new(g, NodeId(Handle::new(5, 0)), vec![]).unwrap_err();
        assert_eq!(err, AssetError::EmptyScene);
    }

    #[test]
    fn display_names_the_source() {
        let err = AssetError::Fetch {
            source: "models/actuator.glb".into(),
            reason: "404".into(),
        };
        assert_eq!(err.to_string(), "failed to fetch asset models/actuator.glb: 404");
    }
}
