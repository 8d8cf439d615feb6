//! Operation Dispatch and Path Resolution
//!
//! This module implements the [`Vfs`] context: it validates request
//! envelopes, resolves the target driver through the registry, arbitrates
//! ownership between local and remote drivers, invokes the matching vtable
//! entry and marshals the result back into the envelope.
//!
//! All state is carried by the context object rather than globals, so
//! multiple independent VFS instances can coexist (one per test, for
//! example).

use core::sync::atomic::{AtomicU64, Ordering};

use alloc::sync::Arc;
use spin::RwLock;

use crate::config::{FS_REQUEST_MAGIC, FS_RESPONSE_MAGIC, MAX_PATH_LEN};

use super::driver::FsDriver;
use super::error::{FsError, FsResult};
use super::node::{FsDescriptor, VNode};
use super::registry::{DriverHost, DriverRegistry};
use super::request::{FileOp, FileOpRequest, FsOp, FsOpRequest};

/// VFS dispatch context.
///
/// Owns the driver registry and the root-filesystem selection used by
/// path resolution.
pub struct Vfs {
    registry: RwLock<DriverRegistry>,
    root_fs: AtomicU64,
}

impl Vfs {
    /// Create an empty dispatch context.
    pub const fn new() -> Self {
        Self {
            registry: RwLock::new(DriverRegistry::new()),
            root_fs: AtomicU64::new(0),
        }
    }

    /// Register a driver instance owned by `vendor`/`product`.
    ///
    /// `(0, 0)` marks a locally hosted driver; anything else is treated as
    /// remote and rejected at dispatch time until a transport exists.
    pub fn register_filesystem(
        &self,
        vendor: u32,
        product: u32,
        driver: Arc<dyn FsDriver>,
    ) -> FsDescriptor {
        self.registry.write().register(vendor, product, driver)
    }

    /// Remove a registration. Unknown descriptors are reported and ignored.
    pub fn unregister_filesystem(&self, descriptor: FsDescriptor) {
        self.registry.write().unregister(descriptor);
    }

    /// Record which filesystem descriptor path resolution starts from.
    /// The value is stored as-is; no validation happens here.
    pub fn set_root_fs(&self, descriptor: FsDescriptor) {
        self.root_fs.store(descriptor, Ordering::Release);
    }

    /// Descriptor path resolution currently starts from.
    pub fn root_fs(&self) -> FsDescriptor {
        self.root_fs.load(Ordering::Acquire)
    }

    /// Dispatch an inode-level request to the driver registered under
    /// `descriptor`.
    ///
    /// The return value is also written into `request.result`; lookup
    /// results land in `request.result_node` as by-value copies. On return
    /// the envelope carries the response magic.
    pub fn dispatch_fs_op(&self, descriptor: FsDescriptor, request: &mut FsOpRequest) -> i64 {
        if request.magic != FS_REQUEST_MAGIC {
            request.result = FsError::BadRequest.code();
            request.magic = FS_RESPONSE_MAGIC;
            return request.result;
        }

        // Clone the record out so the driver runs without the registry
        // lock held; dispatch re-enters through path resolution.
        let record = {
            let registry = self.registry.read();
            registry.find(descriptor).cloned()
        };

        let record = match record {
            Some(record) => record,
            None => {
                request.result = FsError::NoDriver.code();
                request.magic = FS_RESPONSE_MAGIC;
                return request.result;
            }
        };

        // Ownership guard: only locally hosted drivers can be invoked.
        // A remote record is a typed unsupported branch, not a crash.
        if let DriverHost::Remote { vendor, product } = record.host {
            log::debug!(
                "filesystem {} is owned by remote module {:#x}:{:#x}, no transport",
                descriptor,
                vendor,
                product
            );
            request.result = FsError::NotSupported.code();
            request.magic = FS_RESPONSE_MAGIC;
            return request.result;
        }

        let driver = &record.driver;
        let result = match &mut request.op {
            FsOp::Create {
                directory,
                name,
                flags,
            } => match driver.create_node(*directory, name, *flags) {
                Ok(node) => {
                    request.result_node = Some(node);
                    0
                }
                Err(e) => e.code(),
            },
            FsOp::GetByName { directory, name } => match driver.get_by_name(*directory, name) {
                Ok(node) => {
                    request.result_node = Some(node);
                    0
                }
                Err(e) => e.code(),
            },
            FsOp::GetRoot => match driver.get_root_node() {
                Ok(node) => {
                    request.result_node = Some(node);
                    0
                }
                Err(e) => e.code(),
            },
            FsOp::Read {
                node,
                offset,
                buffer,
            } => {
                let requested = buffer.len();
                match driver.read_node(*node, *offset, buffer.as_mut_slice()) {
                    // A short transfer violates the whole-call contract.
                    Ok(n) if n == requested => n as i64,
                    Ok(_) => FsError::Fault.code(),
                    Err(e) => e.code(),
                }
            }
            FsOp::Write {
                node,
                offset,
                buffer,
            } => {
                let requested = buffer.len();
                match driver.write_node(*node, *offset, buffer.as_slice()) {
                    Ok(n) if n == requested => n as i64,
                    Ok(_) => FsError::Fault.code(),
                    Err(e) => e.code(),
                }
            }
            // Reserved discriminants: the driver vtable implements these,
            // but this layer does not route them yet.
            FsOp::Delete { .. } | FsOp::GetByInode { .. } | FsOp::GetByIndex { .. } => {
                FsError::BadRequest.code()
            }
        };

        request.result = result;
        request.magic = FS_RESPONSE_MAGIC;
        result
    }

    /// Dispatch a path-level request.
    ///
    /// Only `Create` is wired to a handler: it resolves the parent
    /// directory and re-issues an inode-level create against the resolved
    /// filesystem. Every other discriminant is rejected with a bad-request
    /// result.
    pub fn dispatch_file_op(&self, request: &mut FileOpRequest) -> i64 {
        if request.magic != FS_REQUEST_MAGIC {
            request.result = FsError::BadRequest.code();
            request.magic = FS_RESPONSE_MAGIC;
            return request.result;
        }

        let result = match &request.op {
            FileOp::Create { path, name, props } => match self.resolve_path(path) {
                Ok(base_dir) => {
                    let mut fs_request = FsOpRequest::create(base_dir.ino, name, *props);
                    self.dispatch_fs_op(base_dir.fs, &mut fs_request)
                }
                Err(e) => e.code(),
            },
            _ => FsError::BadRequest.code(),
        };

        request.result = result;
        request.magic = FS_RESPONSE_MAGIC;
        result
    }

    /// Resolve a slash-delimited path to a node, starting from the root
    /// filesystem configured with [`Vfs::set_root_fs`].
    ///
    /// Empty paths (and paths that are all separators) resolve to the root
    /// node itself. Each component is looked up against the filesystem
    /// that owns the current node; mountpoint and symlink bits are not
    /// consulted, so traversal never crosses filesystems.
    pub fn resolve_path(&self, path: &str) -> FsResult<VNode> {
        if path.len() > MAX_PATH_LEN {
            return Err(FsError::NameTooLong);
        }

        let mut current = self.fs_request_node(self.root_fs(), FsOpRequest::get_root())?;

        for component in path.split('/').filter(|c| !c.is_empty()) {
            let request = FsOpRequest::get_by_name(current.ino, component);
            current = self
                .fs_request_node(current.fs, request)
                .map_err(|_| FsError::NotPresent)?;
        }

        Ok(current)
    }

    /// Issue an inode-level request and extract the node it returns.
    fn fs_request_node(&self, fs: FsDescriptor, mut request: FsOpRequest) -> FsResult<VNode> {
        let code = self.dispatch_fs_op(fs, &mut request);
        if code < 0 {
            return Err(FsError::from_code(code).unwrap_or(FsError::Fault));
        }
        request.result_node.ok_or(FsError::Fault)
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}
