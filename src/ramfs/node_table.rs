//! Inode Slot Table
//!
//! Fixed-capacity arena of inode slots; owns all node identity and
//! metadata. An occupied slot holds one node plus exclusive ownership of
//! its payload: a directory index for directories, a block index for
//! files, nothing for device and pipe nodes. The payload kind is chosen
//! once at creation and never reinterpreted.
//!
//! Slot 0 is seeded as the root directory at construction, is never freed,
//! and is the traversal root of the filesystem. Allocation is a linear
//! scan from slot 1 for the first free slot; slot reclamation is not
//! implemented, so delete reports `NotSupported` instead of pretending to
//! free anything.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::MAX_NAME_LEN;
use crate::vfs::error::{FsError, FsResult};
use crate::vfs::node::{FsDescriptor, Ino, NodeProps, VNode};

use super::block_index::BlockIndex;
use super::dir_index::DirIndex;

/// Storage owned by an occupied slot, selected by the node's kind.
pub enum NodePayload {
    /// Directory nodes own a chained child index.
    Directory(DirIndex),
    /// File nodes own a chained block index.
    File(BlockIndex),
    /// Device, pipe and symlink nodes own no storage here.
    None,
}

/// An occupied slot: the node record plus its storage.
pub struct NodeEntry {
    pub node: VNode,
    pub payload: NodePayload,
}

/// One slot of the inode table.
pub enum NodeSlot {
    Free,
    Occupied(NodeEntry),
}

/// Fixed-capacity inode slot table.
pub struct NodeTable {
    descriptor: FsDescriptor,
    slots: Vec<NodeSlot>,
}

impl NodeTable {
    /// Create a table of `max_inodes` slots with the root directory
    /// seeded in slot 0.
    pub fn new(max_inodes: usize) -> Self {
        let mut slots: Vec<NodeSlot> = (0..max_inodes.max(1)).map(|_| NodeSlot::Free).collect();

        slots[0] = NodeSlot::Occupied(NodeEntry {
            node: VNode {
                name: String::new(),
                fs: 0,
                ino: 0,
                props: NodeProps::DIRECTORY,
                parent: 0,
            },
            payload: NodePayload::Directory(DirIndex::new()),
        });

        Self {
            descriptor: 0,
            slots,
        }
    }

    /// Stamp the descriptor this filesystem was registered under.
    ///
    /// Only the first call takes effect; the root node's owning
    /// descriptor is updated along with the table's.
    pub fn set_descriptor(&mut self, descriptor: FsDescriptor) {
        if self.descriptor != 0 {
            return;
        }
        self.descriptor = descriptor;

        if let NodeSlot::Occupied(root) = &mut self.slots[0] {
            root.node.fs = descriptor;
        }
    }

    /// Descriptor stamped on this table (0 before registration).
    pub fn descriptor(&self) -> FsDescriptor {
        self.descriptor
    }

    /// Create a node named `name` inside `directory`.
    ///
    /// The name is truncated to [`MAX_NAME_LEN`] bytes. The directory bit
    /// takes precedence over the file bit when choosing the payload; nodes
    /// that are neither own no storage. Returns a copy of the new node.
    pub fn create(&mut self, directory: Ino, name: &str, flags: NodeProps) -> FsResult<VNode> {
        if flags.is_empty() {
            return Err(FsError::InvalidArgument);
        }
        // Fails early if the parent is missing or not a directory.
        self.dir_index(directory)?;

        let slot_idx = self
            .slots
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, slot)| matches!(slot, NodeSlot::Free))
            .map(|(i, _)| i)
            .ok_or(FsError::NoSpace)?;

        let payload = if flags.contains(NodeProps::DIRECTORY) {
            NodePayload::Directory(DirIndex::new())
        } else if flags.contains(NodeProps::FILE) {
            NodePayload::File(BlockIndex::new())
        } else {
            NodePayload::None
        };

        let node = VNode {
            name: bounded_name(name),
            fs: self.descriptor,
            ino: slot_idx as Ino,
            props: flags,
            parent: directory,
        };

        self.slots[slot_idx] = NodeSlot::Occupied(NodeEntry {
            node: node.clone(),
            payload,
        });

        // Link the new slot into the parent's child index. The parent was
        // validated above, so this cannot fail.
        self.dir_index_mut(directory)?.insert(slot_idx as Ino);

        Ok(node)
    }

    /// Delete a node. Slot reclamation is not implemented: the node stays
    /// linked and the slot stays occupied.
    pub fn delete(&self, node: Ino) -> FsResult<()> {
        self.entry(node)?;
        Err(FsError::NotSupported)
    }

    /// Fetch a node directly by inode number; no search.
    pub fn get_by_inode(&self, node: Ino) -> FsResult<VNode> {
        Ok(self.entry(node)?.node.clone())
    }

    /// Look up a child of `directory` by exact name; first match wins
    /// (this layer does not enforce name uniqueness).
    pub fn get_by_name(&self, directory: Ino, name: &str) -> FsResult<VNode> {
        let index = self.dir_index(directory)?;

        for child in index.children() {
            if let Ok(entry) = self.entry(child) {
                if entry.node.name == name {
                    return Ok(entry.node.clone());
                }
            }
        }

        Err(FsError::NotPresent)
    }

    /// Fetch the `index`-th entry of `directory` in insertion order.
    ///
    /// Directories carrying the mountpoint or symlink property are
    /// refused: those bits are reserved for VFS-level redirection and are
    /// not resolved here.
    pub fn get_by_index(&self, directory: Ino, index: usize) -> FsResult<VNode> {
        let dir = self.entry(directory)?;
        if dir
            .node
            .props
            .intersects(NodeProps::MOUNT_POINT | NodeProps::SYMLINK)
        {
            return Err(FsError::NotSupported);
        }

        let child = match &dir.payload {
            NodePayload::Directory(dir_index) => {
                dir_index.get(index).ok_or(FsError::NotPresent)?
            }
            _ => return Err(FsError::NotADirectory),
        };

        Ok(self.entry(child)?.node.clone())
    }

    /// Fetch the root node. Slot 0 is always occupied.
    pub fn get_root(&self) -> VNode {
        match &self.slots[0] {
            NodeSlot::Occupied(entry) => entry.node.clone(),
            NodeSlot::Free => unreachable!("slot 0 is seeded at construction and never freed"),
        }
    }

    /// Read `buf.len()` bytes at `offset` from a file node.
    pub fn read(&self, node: Ino, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        match &self.entry(node)?.payload {
            NodePayload::File(blocks) => blocks.read_at(offset, buf),
            _ => Err(FsError::NotAFile),
        }
    }

    /// Write `buf` at `offset` into a file node.
    pub fn write(&mut self, node: Ino, offset: u64, buf: &[u8]) -> FsResult<usize> {
        match &mut self.entry_mut(node)?.payload {
            NodePayload::File(blocks) => blocks.write_at(offset, buf),
            _ => Err(FsError::NotAFile),
        }
    }

    /// Log the children of `directory` at debug level and return how many
    /// there are.
    pub fn list_directory(&self, directory: Ino) -> FsResult<usize> {
        let index = self.dir_index(directory)?;

        let mut count = 0;
        for child in index.children() {
            if let Ok(entry) = self.entry(child) {
                log::debug!("  {:<24} inode {}", entry.node.name, entry.node.ino);
                count += 1;
            }
        }

        Ok(count)
    }

    fn entry(&self, node: Ino) -> FsResult<&NodeEntry> {
        match self.slots.get(node as usize) {
            Some(NodeSlot::Occupied(entry)) => Ok(entry),
            Some(NodeSlot::Free) => Err(FsError::NotPresent),
            None => Err(FsError::InvalidArgument),
        }
    }

    fn entry_mut(&mut self, node: Ino) -> FsResult<&mut NodeEntry> {
        match self.slots.get_mut(node as usize) {
            Some(NodeSlot::Occupied(entry)) => Ok(entry),
            Some(NodeSlot::Free) => Err(FsError::NotPresent),
            None => Err(FsError::InvalidArgument),
        }
    }

    fn dir_index(&self, directory: Ino) -> FsResult<&DirIndex> {
        match &self.entry(directory)?.payload {
            NodePayload::Directory(index) => Ok(index),
            _ => Err(FsError::NotADirectory),
        }
    }

    fn dir_index_mut(&mut self, directory: Ino) -> FsResult<&mut DirIndex> {
        match &mut self.entry_mut(directory)?.payload {
            NodePayload::Directory(index) => Ok(index),
            _ => Err(FsError::NotADirectory),
        }
    }
}

/// Truncate a name to the bounded length at a character boundary.
fn bounded_name(name: &str) -> String {
    if name.len() <= MAX_NAME_LEN {
        return String::from(name);
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    String::from(&name[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_seeded_as_directory() {
        let table = NodeTable::new(16);
        let root = table.get_root();
        assert_eq!(root.ino, 0);
        assert!(root.is_directory());
        assert_eq!(root.parent, 0);
    }

    #[test]
    fn create_allocates_dense_inodes_from_one() {
        let mut table = NodeTable::new(16);
        let a = table.create(0, "a", NodeProps::FILE).unwrap();
        let b = table.create(0, "b", NodeProps::DIRECTORY).unwrap();
        assert_eq!(a.ino, 1);
        assert_eq!(b.ino, 2);
        assert_eq!(a.parent, 0);
        assert_eq!(table.get_by_inode(1).unwrap(), a);
    }

    #[test]
    fn create_validates_parent_and_flags() {
        let mut table = NodeTable::new(4);
        assert_eq!(
            table.create(99, "x", NodeProps::FILE),
            Err(FsError::InvalidArgument)
        );
        assert_eq!(
            table.create(0, "x", NodeProps::empty()),
            Err(FsError::InvalidArgument)
        );
        assert_eq!(
            table.create(1, "x", NodeProps::FILE),
            Err(FsError::NotPresent)
        );
        let file = table.create(0, "f", NodeProps::FILE).unwrap();
        assert_eq!(
            table.create(file.ino, "x", NodeProps::FILE),
            Err(FsError::NotADirectory)
        );
    }

    #[test]
    fn table_fills_up_to_capacity() {
        let mut table = NodeTable::new(3);
        table.create(0, "a", NodeProps::FILE).unwrap();
        table.create(0, "b", NodeProps::FILE).unwrap();
        assert_eq!(table.create(0, "c", NodeProps::FILE), Err(FsError::NoSpace));
    }

    #[test]
    fn directory_bit_takes_precedence_over_file_bit() {
        let mut table = NodeTable::new(8);
        let both = table
            .create(0, "d", NodeProps::DIRECTORY | NodeProps::FILE)
            .unwrap();
        // The payload is a directory index: creating a child works and
        // writing data does not.
        table.create(both.ino, "child", NodeProps::FILE).unwrap();
        assert_eq!(table.write(both.ino, 0, b"x"), Err(FsError::NotAFile));
    }

    #[test]
    fn long_names_are_truncated_to_bound() {
        let mut table = NodeTable::new(8);
        let long = "n".repeat(MAX_NAME_LEN + 40);
        let node = table.create(0, &long, NodeProps::FILE).unwrap();
        assert_eq!(node.name.len(), MAX_NAME_LEN);
        assert_eq!(table.get_by_name(0, &node.name).unwrap().ino, node.ino);
    }

    #[test]
    fn delete_is_reported_unsupported_and_frees_nothing() {
        let mut table = NodeTable::new(8);
        let node = table.create(0, "doomed", NodeProps::FILE).unwrap();
        assert_eq!(table.delete(node.ino), Err(FsError::NotSupported));
        assert_eq!(table.get_by_inode(node.ino).unwrap().name, "doomed");
        assert_eq!(table.delete(0), Err(FsError::NotSupported));
        assert_eq!(table.delete(99), Err(FsError::InvalidArgument));
    }

    #[test]
    fn get_by_index_refuses_redirection_properties() {
        let mut table = NodeTable::new(8);
        let dir = table
            .create(0, "m", NodeProps::DIRECTORY | NodeProps::MOUNT_POINT)
            .unwrap();
        assert_eq!(table.get_by_index(dir.ino, 0), Err(FsError::NotSupported));
    }

    #[test]
    fn set_descriptor_stamps_once() {
        let mut table = NodeTable::new(8);
        table.set_descriptor(7);
        table.set_descriptor(9);
        assert_eq!(table.descriptor(), 7);
        assert_eq!(table.get_root().fs, 7);
        let node = table.create(0, "f", NodeProps::FILE).unwrap();
        assert_eq!(node.fs, 7);
    }
}
