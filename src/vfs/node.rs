//! Node Descriptors and Property Flags
//!
//! This module defines the metadata record every lookup returns, together
//! with the property bitmask that classifies a node. Lookups always hand
//! out copies: a `VNode` returned to a caller is independent of any later
//! mutation of the driver's internal tables.

use alloc::string::String;

/// Handle identifying one registered driver instance to the dispatcher.
/// Descriptors are dense integers assigned monotonically starting at 1;
/// 0 means "not yet registered".
pub type FsDescriptor = u64;

/// Inode number: a dense integer identifying one node within one
/// filesystem's node table. Inode 0 is always the traversal root.
pub type Ino = u64;

bitflags::bitflags! {
    /// Node property bitmask
    ///
    /// The bits are informative rather than strictly exclusive; a node's
    /// kind is fixed at creation. `MOUNT_POINT` and `SYMLINK` are reserved
    /// for VFS-level redirection and are not yet acted upon by path
    /// resolution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeProps: u32 {
        const FILE        = 1 << 0;
        const DIRECTORY   = 1 << 1;
        const CHAR_DEVICE = 1 << 2;
        const BLOCK_DEVICE = 1 << 3;
        const PIPE        = 1 << 4;
        const SYMLINK     = 1 << 5;
        const MOUNT_POINT = 1 << 6;
    }
}

/// Metadata record for one filesystem entry.
///
/// This is the value copied into every lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VNode {
    /// Node name, bounded to [`crate::config::MAX_NAME_LEN`] bytes.
    pub name: String,
    /// Descriptor of the filesystem that owns this node.
    pub fs: FsDescriptor,
    /// Inode number, unique within the owning filesystem.
    pub ino: Ino,
    /// Property bitmask.
    pub props: NodeProps,
    /// Inode number of the parent directory.
    pub parent: Ino,
}

impl VNode {
    /// Check if this node is a directory.
    pub fn is_directory(&self) -> bool {
        self.props.contains(NodeProps::DIRECTORY)
    }

    /// Check if this node is a regular file.
    pub fn is_file(&self) -> bool {
        self.props.contains(NodeProps::FILE)
    }
}

/// Directory entry descriptor returned by path-level directory reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// Entry name.
    pub name: String,
    /// Property bitmask of the entry.
    pub props: NodeProps,
}
