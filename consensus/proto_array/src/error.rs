#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The block named as a parent has not itself been added yet.
    ParentUnknown(types::Hash256),
    /// `on_block` was called twice for the same root.
    BlockAlreadyKnown(types::Hash256),
    /// No node is indexed under this root.
    NodeUnknown(types::Hash256),
    /// `find_head` was asked to start from a root with no node.
    JustifiedNodeUnknown(types::Hash256),
    /// Every node was pruned out from under the requested ancestor walk.
    AncestorUnknown(types::Hash256),
}
