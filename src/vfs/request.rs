//! Request Envelopes
//!
//! Every operation travels in a tagged envelope: a magic number for
//! protocol sanity, an operation discriminant, operation-specific input
//! fields, and a result field the dispatcher writes back (0 = success,
//! negative = error code, byte count for read/write).
//!
//! The same shape exists at two layers: the inode-level layer addressed by
//! inode numbers ([`FsOpRequest`]) and the path-level layer addressed by
//! textual paths ([`FileOpRequest`]). The path layer resolves its target
//! and re-issues the corresponding inode-level request.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::config::FS_REQUEST_MAGIC;

use super::node::{DirNode, Ino, NodeProps, VNode};

/// Open file handle used by the path-level protocol.
pub type Fd = i64;

/// Open directory handle used by the path-level protocol.
pub type DirHandle = i64;

/// Open-mode capability bits used by the path-level protocol.
pub type OpenMode = u32;

/// Inode-level operation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    Create {
        directory: Ino,
        name: String,
        flags: NodeProps,
    },
    Delete {
        node: Ino,
    },
    GetByInode {
        node: Ino,
    },
    GetByName {
        directory: Ino,
        name: String,
    },
    GetByIndex {
        directory: Ino,
        index: usize,
    },
    GetRoot,
    Read {
        node: Ino,
        offset: u64,
        /// Sized to the requested byte count; filled in place on success.
        buffer: Vec<u8>,
    },
    Write {
        node: Ino,
        offset: u64,
        buffer: Vec<u8>,
    },
}

impl FsOp {
    pub const OP_CREATE: u16 = 1;
    pub const OP_DELETE: u16 = 2;
    pub const OP_GETBYNODE: u16 = 3;
    pub const OP_GETBYNAME: u16 = 4;
    pub const OP_GETBYINDEX: u16 = 5;
    pub const OP_GETROOT: u16 = 6;
    pub const OP_READ: u16 = 7;
    pub const OP_WRITE: u16 = 8;

    /// Wire discriminant of this operation.
    pub const fn opcode(&self) -> u16 {
        match self {
            Self::Create { .. } => Self::OP_CREATE,
            Self::Delete { .. } => Self::OP_DELETE,
            Self::GetByInode { .. } => Self::OP_GETBYNODE,
            Self::GetByName { .. } => Self::OP_GETBYNAME,
            Self::GetByIndex { .. } => Self::OP_GETBYINDEX,
            Self::GetRoot => Self::OP_GETROOT,
            Self::Read { .. } => Self::OP_READ,
            Self::Write { .. } => Self::OP_WRITE,
        }
    }
}

/// Inode-level request envelope.
#[derive(Debug, Clone)]
pub struct FsOpRequest {
    /// Protocol sanity check; requests carry
    /// [`FS_REQUEST_MAGIC`](crate::config::FS_REQUEST_MAGIC), completed
    /// envelopes [`FS_RESPONSE_MAGIC`](crate::config::FS_RESPONSE_MAGIC).
    pub magic: u32,
    /// Written back by the dispatcher: 0 on success, a negative error
    /// code, or the byte count for read/write.
    pub result: i64,
    /// Node copy written back by lookups.
    pub result_node: Option<VNode>,
    /// Operation payload.
    pub op: FsOp,
}

impl FsOpRequest {
    /// Build a request envelope around an operation payload.
    pub fn new(op: FsOp) -> Self {
        Self {
            magic: FS_REQUEST_MAGIC,
            result: 0,
            result_node: None,
            op,
        }
    }

    pub fn create(directory: Ino, name: &str, flags: NodeProps) -> Self {
        Self::new(FsOp::Create {
            directory,
            name: String::from(name),
            flags,
        })
    }

    pub fn get_by_name(directory: Ino, name: &str) -> Self {
        Self::new(FsOp::GetByName {
            directory,
            name: String::from(name),
        })
    }

    pub fn get_root() -> Self {
        Self::new(FsOp::GetRoot)
    }

    /// Read request for `size` bytes at `offset`.
    pub fn read(node: Ino, offset: u64, size: usize) -> Self {
        Self::new(FsOp::Read {
            node,
            offset,
            buffer: vec![0; size],
        })
    }

    pub fn write(node: Ino, offset: u64, buffer: Vec<u8>) -> Self {
        Self::new(FsOp::Write {
            node,
            offset,
            buffer,
        })
    }

    /// Borrow the read buffer of a completed read request.
    pub fn read_buffer(&self) -> Option<&[u8]> {
        match &self.op {
            FsOp::Read { buffer, .. } => Some(buffer),
            _ => None,
        }
    }
}

/// Path-level operation payload.
///
/// Only `Create` is wired to a handler today; the remaining discriminants
/// are part of the declared protocol and are rejected with a bad-request
/// result until their handlers exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOp {
    Create {
        /// Parent directory path of the new node.
        path: String,
        name: String,
        props: NodeProps,
    },
    Delete {
        path: String,
    },
    Rename {
        from: String,
        to: String,
    },
    Chmod {
        path: String,
        props: NodeProps,
    },
    Open {
        path: String,
        mode: OpenMode,
    },
    Close {
        fd: Fd,
        mode: OpenMode,
    },
    Read {
        fd: Fd,
        offset: u64,
        buffer: Vec<u8>,
    },
    Write {
        fd: Fd,
        offset: u64,
        buffer: Vec<u8>,
    },
    OpenDir {
        path: String,
    },
    CloseDir {
        dir: DirHandle,
    },
    ReadDir {
        dir: DirHandle,
        offset: usize,
    },
}

impl FileOp {
    pub const OP_CREATE: u16 = 1;
    pub const OP_DELETE: u16 = 2;
    pub const OP_RENAME: u16 = 3;
    pub const OP_CHMOD: u16 = 4;
    pub const OP_OPEN: u16 = 5;
    pub const OP_CLOSE: u16 = 6;
    pub const OP_READ: u16 = 7;
    pub const OP_WRITE: u16 = 8;
    pub const OP_OPENDIR: u16 = 9;
    pub const OP_CLOSEDIR: u16 = 10;
    pub const OP_READDIR: u16 = 11;

    /// Wire discriminant of this operation.
    pub const fn opcode(&self) -> u16 {
        match self {
            Self::Create { .. } => Self::OP_CREATE,
            Self::Delete { .. } => Self::OP_DELETE,
            Self::Rename { .. } => Self::OP_RENAME,
            Self::Chmod { .. } => Self::OP_CHMOD,
            Self::Open { .. } => Self::OP_OPEN,
            Self::Close { .. } => Self::OP_CLOSE,
            Self::Read { .. } => Self::OP_READ,
            Self::Write { .. } => Self::OP_WRITE,
            Self::OpenDir { .. } => Self::OP_OPENDIR,
            Self::CloseDir { .. } => Self::OP_CLOSEDIR,
            Self::ReadDir { .. } => Self::OP_READDIR,
        }
    }
}

/// Path-level request envelope.
#[derive(Debug, Clone)]
pub struct FileOpRequest {
    /// Protocol sanity check, as on [`FsOpRequest`].
    pub magic: u32,
    /// Written back by the dispatcher.
    pub result: i64,
    /// Entry descriptor written back by `ReadDir` once that handler is
    /// wired; always `None` today.
    pub result_dir: Option<DirNode>,
    /// Operation payload.
    pub op: FileOp,
}

impl FileOpRequest {
    /// Build a request envelope around an operation payload.
    pub fn new(op: FileOp) -> Self {
        Self {
            magic: FS_REQUEST_MAGIC,
            result: 0,
            result_dir: None,
            op,
        }
    }

    pub fn create(path: &str, name: &str, props: NodeProps) -> Self {
        Self::new(FileOp::Create {
            path: String::from(path),
            name: String::from(name),
            props,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_opcodes_match_wire_protocol() {
        assert_eq!(FsOpRequest::create(0, "a", NodeProps::FILE).op.opcode(), 1);
        assert_eq!(FsOp::Delete { node: 1 }.opcode(), 2);
        assert_eq!(FsOp::GetByInode { node: 1 }.opcode(), 3);
        assert_eq!(FsOpRequest::get_by_name(0, "a").op.opcode(), 4);
        assert_eq!(
            FsOp::GetByIndex {
                directory: 0,
                index: 0
            }
            .opcode(),
            5
        );
        assert_eq!(FsOpRequest::get_root().op.opcode(), 6);
        assert_eq!(FsOpRequest::read(1, 0, 4).op.opcode(), 7);
        assert_eq!(FsOpRequest::write(1, 0, vec![0]).op.opcode(), 8);
    }

    #[test]
    fn file_opcodes_match_wire_protocol() {
        assert_eq!(FileOpRequest::create("/", "a", NodeProps::FILE).op.opcode(), 1);
        assert_eq!(
            FileOp::ReadDir { dir: 0, offset: 0 }.opcode(),
            11
        );
    }

    #[test]
    fn new_request_carries_request_magic_and_zero_result() {
        let req = FsOpRequest::get_root();
        assert_eq!(req.magic, FS_REQUEST_MAGIC);
        assert_eq!(req.result, 0);
        assert!(req.result_node.is_none());
    }

    #[test]
    fn read_request_buffer_is_sized_to_request() {
        let req = FsOpRequest::read(3, 10, 128);
        assert_eq!(req.read_buffer().unwrap().len(), 128);
    }
}
