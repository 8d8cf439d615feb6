//! Virtual File System (VFS) Layer
//!
//! This module provides a unified interface over pluggable filesystem
//! drivers. Callers build a typed request envelope and hand it to a [`Vfs`]
//! context together with a filesystem descriptor; the dispatcher finds the
//! registered driver, arbitrates ownership, invokes the matching vtable
//! entry and marshals the result back into the envelope.

pub mod dispatch;
pub mod driver;
pub mod error;
pub mod node;
pub mod registry;
pub mod request;

// Re-export commonly used items
pub use dispatch::Vfs;
pub use driver::FsDriver;
pub use error::{FsError, FsResult};
pub use node::{DirNode, FsDescriptor, Ino, NodeProps, VNode};
pub use registry::{DriverHost, DriverRegistry, RegisteredFs};
pub use request::{DirHandle, Fd, FileOp, FileOpRequest, FsOp, FsOpRequest, OpenMode};
