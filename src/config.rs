//! Configuration constants for the filesystem core

/// Maximum length of a node name in bytes.
/// `create` truncates longer names to this bound.
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length of a path in bytes.
/// Path resolution rejects anything longer.
pub const MAX_PATH_LEN: usize = 4096;

/// Entries per directory index bucket.
pub const DIR_BUCKET_ENTRIES: usize = 256;

/// Data blocks per block index bucket.
pub const BLOCK_BUCKET_ENTRIES: usize = 256;

/// Size of one data block in bytes.
pub const BLOCK_SIZE: usize = 4096;

/// Bytes addressed by one full block bucket.
pub const BLOCK_BUCKET_SPAN: usize = BLOCK_BUCKET_ENTRIES * BLOCK_SIZE;

/// Default inode table capacity for [`crate::RamFs::with_default_capacity`].
pub const DEFAULT_MAX_INODES: usize = 2048;

/// Magic number stamped on every inbound request envelope.
pub const FS_REQUEST_MAGIC: u32 = 0x0469_0738;

/// Magic number stamped on every completed request envelope.
pub const FS_RESPONSE_MAGIC: u32 = 0x0750_2513;
