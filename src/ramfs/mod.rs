//! RAM Filesystem Driver
//!
//! An in-memory filesystem driver built from three pieces: the inode slot
//! table, the chained directory index and the chained block index. The
//! driver carries one lock per filesystem instance; requests are handled
//! synchronously and run to completion.

pub mod block_index;
pub mod dir_index;
pub mod node_table;

pub use block_index::BlockIndex;
pub use dir_index::{DirIndex, DirSlot};
pub use node_table::{NodePayload, NodeSlot, NodeTable};

use spin::Mutex;

use crate::config::DEFAULT_MAX_INODES;
use crate::vfs::driver::FsDriver;
use crate::vfs::error::FsResult;
use crate::vfs::node::{FsDescriptor, Ino, NodeProps, VNode};

/// In-memory filesystem instance.
///
/// All operations go through one lock around the node table; index-chain
/// traversal and mutation are not atomic on their own, so the lock is the
/// minimum required to expose the engine to concurrent callers.
pub struct RamFs {
    table: Mutex<NodeTable>,
}

impl RamFs {
    /// Create a filesystem with capacity for `max_inodes` nodes.
    pub fn new(max_inodes: usize) -> Self {
        Self {
            table: Mutex::new(NodeTable::new(max_inodes)),
        }
    }

    /// Create a filesystem with the default inode capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_MAX_INODES)
    }

    /// Descriptor this filesystem was registered under (0 before
    /// registration).
    pub fn descriptor(&self) -> FsDescriptor {
        self.table.lock().descriptor()
    }

    /// Log the children of `directory` at debug level; returns the entry
    /// count.
    pub fn list_directory(&self, directory: Ino) -> FsResult<usize> {
        self.table.lock().list_directory(directory)
    }
}

impl FsDriver for RamFs {
    fn set_descriptor(&self, descriptor: FsDescriptor) {
        self.table.lock().set_descriptor(descriptor);
    }

    fn create_node(&self, directory: Ino, name: &str, flags: NodeProps) -> FsResult<VNode> {
        self.table.lock().create(directory, name, flags)
    }

    fn delete_node(&self, node: Ino) -> FsResult<()> {
        self.table.lock().delete(node)
    }

    fn get_by_inode(&self, node: Ino) -> FsResult<VNode> {
        self.table.lock().get_by_inode(node)
    }

    fn get_by_name(&self, directory: Ino, name: &str) -> FsResult<VNode> {
        self.table.lock().get_by_name(directory, name)
    }

    fn get_by_index(&self, directory: Ino, index: usize) -> FsResult<VNode> {
        self.table.lock().get_by_index(directory, index)
    }

    fn get_root_node(&self) -> FsResult<VNode> {
        Ok(self.table.lock().get_root())
    }

    fn read_node(&self, node: Ino, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        self.table.lock().read(node, offset, buf)
    }

    fn write_node(&self, node: Ino, offset: u64, buf: &[u8]) -> FsResult<usize> {
        self.table.lock().write(node, offset, buf)
    }
}
