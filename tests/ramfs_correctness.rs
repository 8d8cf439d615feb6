//! RAM Filesystem Correctness Tests
//!
//! Exercises the driver vtable directly: node creation and lookup,
//! insertion-order enumeration, offset-addressed reads and writes across
//! bucket boundaries, and the root-node invariants.

use ramvfs::config::{BLOCK_BUCKET_SPAN, BLOCK_SIZE};
use ramvfs::vfs::FsError;
use ramvfs::{FsDriver, NodeProps, RamFs};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

#[test]
fn create_then_get_by_name_round_trips() {
    init_logging();
    let fs = RamFs::new(64);

    let created = fs.create_node(0, "etc", NodeProps::DIRECTORY).unwrap();
    let found = fs.get_by_name(0, "etc").unwrap();

    assert_eq!(found, created);
    assert_eq!(found.ino, created.ino);
    assert_eq!(found.name, "etc");
    assert!(found.props.contains(NodeProps::DIRECTORY));
}

#[test]
fn lookup_of_missing_name_is_not_present() {
    init_logging();
    let fs = RamFs::new(64);
    assert_eq!(fs.get_by_name(0, "nope"), Err(FsError::NotPresent));
}

#[test]
fn write_read_round_trip_spanning_multiple_buckets() {
    init_logging();
    let fs = RamFs::new(16);
    let file = fs.create_node(0, "big", NodeProps::FILE).unwrap();

    // More than one full block-bucket span, so the chain must grow and
    // the copy must walk bucket and block boundaries.
    let data = pattern(BLOCK_BUCKET_SPAN + 3 * BLOCK_SIZE + 123);
    assert_eq!(fs.write_node(file.ino, 0, &data).unwrap(), data.len());

    let mut out = vec![0u8; data.len()];
    assert_eq!(fs.read_node(file.ino, 0, &mut out).unwrap(), data.len());
    assert_eq!(out, data);

    // Unaligned interior range.
    let mut mid = vec![0u8; BLOCK_SIZE * 2];
    let off = BLOCK_SIZE as u64 / 2 + 7;
    assert_eq!(fs.read_node(file.ino, off, &mut mid).unwrap(), mid.len());
    assert_eq!(mid, data[off as usize..off as usize + mid.len()]);
}

#[test]
fn write_at_offset_then_read_back() {
    init_logging();
    let fs = RamFs::new(16);
    let file = fs.create_node(0, "sparse", NodeProps::FILE).unwrap();

    let off = BLOCK_BUCKET_SPAN as u64 * 2 + 999;
    fs.write_node(file.ino, off, b"deep").unwrap();

    let mut out = [0u8; 4];
    fs.read_node(file.ino, off, &mut out).unwrap();
    assert_eq!(&out, b"deep");
}

#[test]
fn read_of_never_written_range_fails() {
    init_logging();
    let fs = RamFs::new(16);
    let file = fs.create_node(0, "empty", NodeProps::FILE).unwrap();

    let mut out = [0u8; 1];
    assert_eq!(
        fs.read_node(file.ino, 0, &mut out),
        Err(FsError::NotPresent)
    );

    // A write into a hole succeeds; reading an untouched earlier block
    // still fails.
    fs.write_node(file.ino, BLOCK_SIZE as u64 * 4, b"x").unwrap();
    assert_eq!(
        fs.read_node(file.ino, 0, &mut out),
        Err(FsError::NotPresent)
    );
}

#[test]
fn ranges_near_u64_max_fail_without_panicking() {
    init_logging();
    let fs = RamFs::new(16);
    let file = fs.create_node(0, "f", NodeProps::FILE).unwrap();
    fs.write_node(file.ino, 0, b"hello").unwrap();

    // The end offset wraps u64; the request must fail like any other
    // out-of-extent read, not abort.
    let mut out = [0u8; 2];
    assert_eq!(
        fs.read_node(file.ino, u64::MAX, &mut out),
        Err(FsError::NotPresent)
    );
    assert_eq!(
        fs.write_node(file.ino, u64::MAX, b"xy"),
        Err(FsError::InvalidArgument)
    );
}

#[test]
fn read_write_require_a_file_node() {
    init_logging();
    let fs = RamFs::new(16);
    let dir = fs.create_node(0, "d", NodeProps::DIRECTORY).unwrap();

    let mut out = [0u8; 1];
    assert_eq!(fs.read_node(dir.ino, 0, &mut out), Err(FsError::NotAFile));
    assert_eq!(fs.write_node(dir.ino, 0, b"x"), Err(FsError::NotAFile));
    assert_eq!(fs.read_node(999, 0, &mut out), Err(FsError::InvalidArgument));
}

#[test]
fn get_by_index_enumerates_in_insertion_order() {
    init_logging();
    // Enough children to push the directory index into a second bucket.
    let children = 300usize;
    let fs = RamFs::new(children + 8);

    let mut created = Vec::new();
    for i in 0..children {
        let name = format!("child{i:03}");
        created.push(fs.create_node(0, &name, NodeProps::FILE).unwrap());
    }

    for (i, node) in created.iter().enumerate() {
        let by_index = fs.get_by_index(0, i).unwrap();
        let by_name = fs.get_by_name(0, &node.name).unwrap();
        assert_eq!(by_index, *node);
        assert_eq!(by_name, *node);
    }

    assert_eq!(fs.get_by_index(0, children), Err(FsError::NotPresent));
}

#[test]
fn root_node_exists_without_any_create() {
    init_logging();
    let fs = RamFs::new(8);

    let root = fs.get_root_node().unwrap();
    assert_eq!(root.ino, 0);
    assert!(root.is_directory());

    // Root can never be removed.
    assert_eq!(fs.delete_node(0), Err(FsError::NotSupported));
    assert_eq!(fs.get_root_node().unwrap().ino, 0);
}

#[test]
fn delete_is_unsupported_and_reclaims_nothing() {
    init_logging();
    let fs = RamFs::new(8);
    let node = fs.create_node(0, "keep", NodeProps::FILE).unwrap();

    assert_eq!(fs.delete_node(node.ino), Err(FsError::NotSupported));
    assert_eq!(fs.get_by_name(0, "keep").unwrap().ino, node.ino);
    assert_eq!(fs.get_by_inode(node.ino).unwrap().name, "keep");
}

#[test]
fn list_directory_counts_children() {
    init_logging();
    let fs = RamFs::new(16);
    assert_eq!(fs.list_directory(0).unwrap(), 0);
    fs.create_node(0, "a", NodeProps::FILE).unwrap();
    fs.create_node(0, "b", NodeProps::DIRECTORY).unwrap();
    assert_eq!(fs.list_directory(0).unwrap(), 2);
    assert_eq!(fs.list_directory(99), Err(FsError::InvalidArgument));
}

#[test]
fn nested_directories_scope_names() {
    init_logging();
    let fs = RamFs::new(32);
    let etc = fs.create_node(0, "etc", NodeProps::DIRECTORY).unwrap();
    let usr = fs.create_node(0, "usr", NodeProps::DIRECTORY).unwrap();

    fs.create_node(etc.ino, "conf", NodeProps::FILE).unwrap();

    assert!(fs.get_by_name(etc.ino, "conf").is_ok());
    assert_eq!(fs.get_by_name(usr.ino, "conf"), Err(FsError::NotPresent));
    assert_eq!(fs.get_by_name(0, "conf"), Err(FsError::NotPresent));
}
