use crate::model::{EdgeId, NodeId};

/// A refused edit. The model is left untouched whenever one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Cannot create an edge from a node to itself.")]
    RejectedSelfLoop,
    #[error("Node {0} no longer exists.")]
    StaleNode(NodeId),
    #[error("Edge {0} no longer exists.")]
    StaleEdge(EdgeId),
    #[error("No items selected.")]
    EmptySelection,
    #[error("Label must not be empty.")]
    InvalidLabel,
}
