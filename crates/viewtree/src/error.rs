use crate::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node {0} does not exist (stale id or removed subtree).")]
    NodeNotFound(NodeId),
    #[error("Node {0} already has an owner; deep-copy it to reuse the subtree.")]
    AlreadyAttached(NodeId),
    #[error("Node {0} is the tree root and cannot become a child.")]
    CannotAttachRoot(NodeId),
    #[error("Attaching {child} to {parent} would create a cycle.")]
    CycleDetected { parent: NodeId, child: NodeId },
}
