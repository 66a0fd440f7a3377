//! Tests for WAL segments
//!
//! These tests verify:
//! - File naming and id parsing
//! - Size tracking across writes and reopen
//! - Fullness checks
//! - Reading a segment back to end of file

use emberkv::wal::{parse_segment_id, segment_file_name, segment_path, Segment};
use tempfile::TempDir;

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_segment_file_name_is_zero_padded() {
    assert_eq!(segment_file_name(1), "000000001.seg");
    assert_eq!(segment_file_name(42), "000000042.seg");
    assert_eq!(segment_file_name(123456789), "123456789.seg");
}

#[test]
fn test_lexicographic_order_matches_numeric() {
    let mut names: Vec<String> = [10u64, 2, 1, 100, 9].iter().map(|id| segment_file_name(*id)).collect();
    names.sort();
    let ids: Vec<u64> = names.iter().map(|n| parse_segment_id(n).unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 9, 10, 100]);
}

#[test]
fn test_parse_segment_id() {
    assert_eq!(parse_segment_id("000000001.seg"), Some(1));
    assert_eq!(parse_segment_id("7.seg"), Some(7));
    assert_eq!(parse_segment_id(".seg"), None);
    assert_eq!(parse_segment_id("000000001.log"), None);
    assert_eq!(parse_segment_id("abc.seg"), None);
    assert_eq!(parse_segment_id("-1.seg"), None);
    assert_eq!(parse_segment_id("000000001.seg.tmp"), None);
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_open_creates_file() {
    let temp = TempDir::new().unwrap();

    let segment = Segment::open(temp.path(), 3, 1024).unwrap();

    assert_eq!(segment.id(), 3);
    assert_eq!(segment.size(), 0);
    assert_eq!(segment.path(), segment_path(temp.path(), 3));
    assert!(temp.path().join("000000003.seg").exists());
}

#[test]
fn test_write_tracks_size() {
    let temp = TempDir::new().unwrap();
    let mut segment = Segment::open(temp.path(), 1, 1024).unwrap();

    segment.write(b"hello").unwrap();
    segment.write(b" world").unwrap();
    segment.sync().unwrap();

    assert_eq!(segment.size(), 11);
    let on_disk = std::fs::metadata(segment.path()).unwrap().len();
    assert_eq!(on_disk, 11);
}

#[test]
fn test_failed_write_keeps_size_and_file_in_step() {
    let temp = TempDir::new().unwrap();
    {
        let mut segment = Segment::open(temp.path(), 1, 1024).unwrap();
        segment.write(b"record").unwrap();
        segment.sync().unwrap();
    }

    // Read-only handle: every append fails
    let mut segment = Segment::reopen(temp.path(), 1, 1024).unwrap();
    assert!(segment.write(b"more").is_err());

    assert_eq!(segment.size(), 6);
    let on_disk = std::fs::metadata(segment.path()).unwrap().len();
    assert_eq!(on_disk, segment.size());
}

#[test]
fn test_reopen_picks_up_existing_size() {
    let temp = TempDir::new().unwrap();
    {
        let mut segment = Segment::open(temp.path(), 1, 1024).unwrap();
        segment.write(&[7u8; 100]).unwrap();
        segment.sync().unwrap();
    }

    let segment = Segment::open(temp.path(), 1, 1024).unwrap();
    assert_eq!(segment.size(), 100);
}

#[test]
fn test_is_full() {
    let temp = TempDir::new().unwrap();
    let mut segment = Segment::open(temp.path(), 1, 100).unwrap();

    assert!(!segment.is_full(100));
    assert!(segment.is_full(101));

    segment.write(&[0u8; 60]).unwrap();

    assert!(!segment.is_full(40));
    assert!(segment.is_full(41));
}

#[test]
fn test_read_returns_all_bytes() {
    let temp = TempDir::new().unwrap();
    // Larger than one read chunk
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

    {
        let mut segment = Segment::open(temp.path(), 1, u64::MAX).unwrap();
        segment.write(&data).unwrap();
        segment.sync().unwrap();
    }

    let mut segment = Segment::reopen(temp.path(), 1, u64::MAX).unwrap();
    let read = segment.read().unwrap();
    assert_eq!(&read[..], &data[..]);
}

#[test]
fn test_read_empty_segment() {
    let temp = TempDir::new().unwrap();
    let mut segment = Segment::open(temp.path(), 1, 1024).unwrap();

    let read = segment.read().unwrap();
    assert!(read.is_empty());
}

#[test]
fn test_reopen_missing_segment_fails() {
    let temp = TempDir::new().unwrap();
    assert!(Segment::reopen(temp.path(), 5, 1024).is_err());
}
