//! Parent/child hierarchies built from flat collections.
//!
//! Categories and tasks are stored flat, each record pointing at its parent.
//! [`build_hierarchy`] turns such a collection into a sorted forest for
//! indented rendering; the traversal helpers flatten it back into display
//! rows and answer "which records may become my parent" questions used to
//! keep parent chains acyclic on write.

mod builder;
mod traversal;

pub use builder::{build_hierarchy, cmp_names, HierarchyError, HierarchyItem, HierarchyNode};
pub use traversal::{
    descendant_keys, flatten_all, flatten_visible, parent_candidates, would_create_cycle,
};
