use std::io::SeekFrom;

use plainhttp::prelude::*;

#[test]
fn test_memory_read_advances_position() {
    let mut stream = MemoryStream::new("hello world");

    assert_eq!(stream.read(5).expect("readable"), b"hello");
    assert_eq!(stream.tell(), 5);
    assert!(!stream.eof());

    assert_eq!(stream.read(100).expect("readable"), b" world");
    assert!(stream.eof());
    assert_eq!(stream.read(10).expect("readable"), b"");
}

#[test]
fn test_memory_contents_returns_remainder() {
    let mut stream = MemoryStream::new("abcdef");
    stream.seek(SeekFrom::Start(2)).expect("seekable");

    assert_eq!(stream.contents().expect("readable"), b"cdef");
    assert!(stream.eof());
}

#[test]
fn test_memory_seek_is_clamped() {
    let mut stream = MemoryStream::new("abcdef");

    stream.seek(SeekFrom::Start(1000)).expect("seekable");
    assert_eq!(stream.tell(), 6);

    stream.seek(SeekFrom::End(-2)).expect("seekable");
    assert_eq!(stream.tell(), 4);

    stream.seek(SeekFrom::Current(-100)).expect("seekable");
    assert_eq!(stream.tell(), 0);
}

#[test]
fn test_memory_default_mode_is_read_only() {
    let mut stream = MemoryStream::new("abc");

    assert!(stream.is_readable());
    assert!(!stream.is_writable());
    assert!(matches!(stream.write(b"x"), Err(Error::Stream(_))));
}

#[test]
fn test_memory_write_appends() {
    let mut stream = MemoryStream::with_mode(Vec::new(), StreamMode::Append);

    assert_eq!(stream.write(b"hello").expect("writable"), 5);
    assert_eq!(stream.write(b" world").expect("writable"), 6);
    assert_eq!(stream.size(), Some(11));

    // write-only mode cannot be read back
    assert!(!stream.is_readable());
    assert!(matches!(stream.read(5), Err(Error::Stream(_))));
    assert_eq!(stream.text(), "not readable stream");
}

#[test]
fn test_close_is_idempotent_and_blocks_everything() {
    let mut stream = MemoryStream::new("abc");

    stream.close();
    stream.close();

    assert!(!stream.is_readable());
    assert!(!stream.is_writable());
    assert!(!stream.is_seekable());
    assert!(matches!(stream.read(1), Err(Error::Stream(_))));
    assert!(matches!(stream.write(b"x"), Err(Error::Stream(_))));
    assert!(matches!(stream.seek(SeekFrom::Start(0)), Err(Error::Stream(_))));
}

#[test]
fn test_memory_text_snapshot_keeps_position() {
    let mut stream = MemoryStream::new("abcdef");
    stream.seek(SeekFrom::Start(3)).expect("seekable");

    assert_eq!(stream.text(), "abcdef");
    assert_eq!(stream.tell(), 3);
}

#[test]
fn test_memory_metadata() {
    let mut stream = MemoryStream::new("abcdef");
    stream.seek(SeekFrom::Start(2)).expect("seekable");

    let meta = stream.metadata();
    assert!(!meta.blocked);
    assert!(!meta.eof);
    assert_eq!(meta.mode, "r");
    assert_eq!(meta.stream_type, "simple/memory");
    assert_eq!(meta.unread_bytes, 4);
}

#[test]
fn test_file_scratch_is_deleted_on_close() {
    let mut stream = FileStream::scratch(StreamMode::Write).expect("scratch file");
    let path = stream.path().to_path_buf();

    stream.write(b"scratch data").expect("writable");
    assert!(path.exists());

    stream.close();
    assert!(!path.exists());

    // second close is a no-op
    stream.close();
    assert!(matches!(stream.read(1), Err(Error::Stream(_))));
}

#[test]
fn test_file_read_only_survives_close() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("plainhttp-test-{}.txt", std::process::id()));
    std::fs::write(&path, b"persisted content").expect("fixture file");

    let mut stream = FileStream::open(&path, StreamMode::Read).expect("open");
    assert_eq!(stream.read(9).expect("readable"), b"persisted");
    assert_eq!(stream.contents().expect("readable"), b" content");
    assert!(stream.eof());

    stream.close();
    assert!(path.exists(), "read-only stream must not delete its file");

    std::fs::remove_file(&path).expect("cleanup");
}

#[test]
fn test_file_seek_and_size() {
    let mut stream = FileStream::scratch(StreamMode::Write).expect("scratch file");
    stream.write(b"0123456789").expect("writable");

    assert_eq!(stream.size(), Some(10));
    stream.seek(SeekFrom::Start(400)).expect("seekable");
    assert_eq!(stream.tell(), 10, "seek clamps to size");

    stream.seek(SeekFrom::End(-4)).expect("seekable");
    assert_eq!(stream.tell(), 6);

    stream.close();
}

#[test]
fn test_file_exclusive_refuses_existing() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("plainhttp-excl-{}.txt", std::process::id()));
    std::fs::write(&path, b"already here").expect("fixture file");

    assert!(FileStream::open(&path, StreamMode::Exclusive).is_err());

    std::fs::remove_file(&path).expect("cleanup");
}
