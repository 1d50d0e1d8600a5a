//! Concurrent access tests for write_atomic and PathLocks

use fleet_fs::{NormalizedPath, PathLocks, io};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

#[test]
fn concurrent_writes_never_interleave() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("concurrent.txt");
    let path = Arc::new(NormalizedPath::new(&file_path));

    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..10 {
                    io::write_text(&path, &format!("thread{thread_id}:write{i}\n")).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread should not panic");
    }

    let content = std::fs::read_to_string(&file_path).unwrap();
    assert_eq!(content.matches("thread").count(), 1, "got {content:?}");
    assert!(content.ends_with('\n'));
}

#[test]
fn path_locks_serialize_read_modify_write() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("counter.txt");
    std::fs::write(&file_path, "0").unwrap();

    let path = NormalizedPath::new(&file_path);
    let locks = PathLocks::new();

    thread::scope(|scope| {
        for _ in 0..8 {
            let path = &path;
            let locks = &locks;
            scope.spawn(move || {
                for _ in 0..25 {
                    locks.lock(path).run(|| {
                        let current: u32 = io::read_text(path).unwrap().trim().parse().unwrap();
                        io::write_text(path, &(current + 1).to_string()).unwrap();
                    });
                }
            });
        }
    });

    assert_eq!(io::read_text(&path).unwrap(), "200");
    assert_eq!(locks.len(), 1);
}

#[test]
fn relative_and_absolute_spellings_share_a_lock() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let direct = NormalizedPath::new(dir.path().join("pyproject.toml"));
    let roundabout = NormalizedPath::new(dir.path().join("sub").join("..").join("pyproject.toml"));

    let locks = PathLocks::new();
    locks.lock(&direct).run(|| ());
    locks.lock(&roundabout).run(|| ());

    assert_eq!(locks.len(), 1);
}
