//! Filesystem Driver Trait
//!
//! This module defines the operation vtable every filesystem driver must
//! provide. The dispatcher holds drivers as `Arc<dyn FsDriver>`, so one
//! dispatcher can serve multiple driver instances and types. Methods take
//! `&self`; a driver is expected to carry its own interior locking (one
//! lock per filesystem instance is the minimum for concurrent callers).

use super::error::FsResult;
use super::node::{FsDescriptor, Ino, NodeProps, VNode};

/// Operation vtable implemented by filesystem drivers.
///
/// All lookups return the node by value; callers own their copy
/// independently of the driver's internal tables.
pub trait FsDriver: Send + Sync {
    /// Stamp the descriptor this driver was registered under.
    ///
    /// Called once by the registry at registration time. Drivers ignore
    /// any later call so the descriptor of a live filesystem never changes.
    fn set_descriptor(&self, descriptor: FsDescriptor);

    /// Create a new node named `name` inside `directory`.
    fn create_node(&self, directory: Ino, name: &str, flags: NodeProps) -> FsResult<VNode>;

    /// Delete a node. Reserved: no driver reclaims slots yet.
    fn delete_node(&self, node: Ino) -> FsResult<()>;

    /// Fetch a node directly by inode number.
    fn get_by_inode(&self, node: Ino) -> FsResult<VNode>;

    /// Look up a child of `directory` by exact name.
    fn get_by_name(&self, directory: Ino, name: &str) -> FsResult<VNode>;

    /// Fetch the `index`-th entry of `directory` in insertion order.
    fn get_by_index(&self, directory: Ino, index: usize) -> FsResult<VNode>;

    /// Fetch the root node (inode 0).
    fn get_root_node(&self) -> FsResult<VNode>;

    /// Read `buf.len()` bytes starting at `offset` from a file node.
    ///
    /// Whole-call semantics: either the full range is transferred or the
    /// call fails and `buf` is left untouched.
    fn read_node(&self, node: Ino, offset: u64, buf: &mut [u8]) -> FsResult<usize>;

    /// Write `buf` at `offset` into a file node, allocating zero-filled
    /// blocks for any hole the range touches.
    fn write_node(&self, node: Ino, offset: u64, buf: &[u8]) -> FsResult<usize>;
}
