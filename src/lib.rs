//! ramvfs — in-memory virtual filesystem core
//!
//! This crate provides the storage and dispatch core of an in-memory
//! filesystem subsystem: a VFS layer that routes inode-level operations to
//! pluggable filesystem drivers, and a RAM-backed driver that implements
//! those operations over a fixed-capacity inode table with chained bucket
//! indices for directory entries and file data.
//!
//! The two halves are:
//! - [`vfs`] — driver registration, request envelopes, operation dispatch
//!   with local/remote ownership arbitration, and slash-delimited path
//!   resolution. All state lives in an explicit [`vfs::Vfs`] context so
//!   independent instances can coexist (no globals).
//! - [`ramfs`] — the concrete in-memory driver: inode slot arena, chained
//!   directory index, chained block index with lazy zero-filled blocks.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod ramfs;
pub mod vfs;

pub use ramfs::RamFs;
pub use vfs::{
    DriverHost, FileOp, FileOpRequest, FsDescriptor, FsDriver, FsError, FsOp, FsOpRequest,
    FsResult, Ino, NodeProps, VNode, Vfs,
};
