use tailspool::{FinalizeOutcome, HandleError, Options, State, TempFileHandle, TempName};
use tempfile::tempdir;

#[test]
fn test_appended_bytes_read_back_after_sync() {
    let dir = tempdir().unwrap();
    let handle = TempFileHandle::open(dir.path().join("movie.mp4")).unwrap();

    handle.append(b"ftyp").unwrap();
    handle.append(b"moov").unwrap();
    handle.append(b"mdat").unwrap();
    handle.synchronize().unwrap();

    assert_eq!(handle.size(), 12);
    assert_eq!(handle.read_data(0, 12).unwrap(), b"ftypmoovmdat");
    assert_eq!(handle.read_data(4, 4).unwrap(), b"moov");
}

#[test]
fn test_read_past_end_is_empty_not_error() {
    let dir = tempdir().unwrap();
    let handle = TempFileHandle::open(dir.path().join("movie.mp4")).unwrap();

    assert!(handle.read_data(0, 1024).unwrap().is_empty());

    handle.append(b"abc").unwrap();
    assert!(handle.read_data(3, 1).unwrap().is_empty());
    assert!(handle.read_data(1 << 40, 1).unwrap().is_empty());
}

#[test]
fn test_finalize_promotes_and_removes_temp() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");
    let handle = TempFileHandle::open(&dest).unwrap();
    let temp_path = handle.temp_path().to_path_buf();

    handle.append(b"complete body").unwrap();
    handle.synchronize().unwrap();
    let outcome = handle.finalize().unwrap();

    assert_eq!(outcome, FinalizeOutcome::Promoted(dest.clone()));
    assert_eq!(handle.state(), State::Finalized);
    assert!(!temp_path.exists());
    assert_eq!(std::fs::read(&dest).unwrap(), b"complete body");
}

#[test]
fn test_finalize_with_malformed_suffix_discards() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");
    let handle =
        TempFileHandle::open_named(&dest, TempName::from_raw("abc"), Options::new()).unwrap();
    let temp_path = handle.temp_path().to_path_buf();
    assert_eq!(temp_path, dir.path().join("movie.mp4.abc"));

    handle.append(b"should never land").unwrap();
    let outcome = handle.finalize().unwrap();

    assert_eq!(outcome, FinalizeOutcome::Discarded);
    assert_eq!(handle.state(), State::Deleted);
    assert!(!temp_path.exists());
    assert!(!dest.exists());
}

#[test]
fn test_finalize_with_malformed_suffix_keeps_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");
    std::fs::write(&dest, b"keep me").unwrap();

    let handle =
        TempFileHandle::open_named(&dest, TempName::from_raw("tmp"), Options::new()).unwrap();
    handle.append(b"junk").unwrap();

    assert_eq!(handle.finalize().unwrap(), FinalizeOutcome::Discarded);
    assert_eq!(std::fs::read(&dest).unwrap(), b"keep me");
}

#[test]
fn test_finalize_overwrites_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");
    std::fs::write(&dest, b"an older and considerably longer download").unwrap();

    let handle = TempFileHandle::open(&dest).unwrap();
    handle.append(b"new").unwrap();
    handle.finalize().unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"new");
}

#[test]
fn test_last_finalize_wins() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");

    let first = TempFileHandle::open(&dest).unwrap();
    let second = TempFileHandle::open(&dest).unwrap();
    assert_ne!(first.temp_path(), second.temp_path());

    first.append(b"first").unwrap();
    second.append(b"second").unwrap();
    first.finalize().unwrap();
    second.finalize().unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"second");
}

#[test]
fn test_failed_promote_leaves_temp_for_delete() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");
    std::fs::create_dir(&dest).unwrap();
    std::fs::write(dest.join("occupant"), b"x").unwrap();

    let handle = TempFileHandle::open(&dest).unwrap();
    let temp_path = handle.temp_path().to_path_buf();
    handle.append(b"never promoted").unwrap();

    assert!(matches!(handle.finalize(), Err(HandleError::Fs(_))));
    assert_eq!(handle.state(), State::Closed);
    assert!(temp_path.exists());
    assert!(dest.join("occupant").exists());

    handle.delete_file().unwrap();
    assert_eq!(handle.state(), State::Deleted);
    assert!(!temp_path.exists());
}

#[test]
fn test_close_twice_then_io_fails_cleanly() {
    let dir = tempdir().unwrap();
    let handle = TempFileHandle::open(dir.path().join("movie.mp4")).unwrap();
    handle.append(b"abc").unwrap();

    handle.close();
    handle.close();

    assert!(matches!(
        handle.append(b"more"),
        Err(HandleError::InvalidState { .. })
    ));
    assert!(matches!(
        handle.read_data(0, 3),
        Err(HandleError::InvalidState { .. })
    ));
    assert!(matches!(
        handle.finalize(),
        Err(HandleError::InvalidState { .. })
    ));
    assert_eq!(std::fs::read(handle.temp_path()).unwrap(), b"abc");
}

#[test]
fn test_delete_then_size_reports_absent() {
    let dir = tempdir().unwrap();
    let handle = TempFileHandle::open(dir.path().join("movie.mp4")).unwrap();
    handle.append(b"partial").unwrap();
    assert_eq!(handle.size(), 7);

    handle.delete_file().unwrap();

    assert_eq!(handle.state(), State::Deleted);
    assert_eq!(handle.size(), 0);
    assert!(handle.attributes().is_none());
    handle.close();
}

#[test]
fn test_delete_tolerates_externally_removed_file() {
    let dir = tempdir().unwrap();
    let handle = TempFileHandle::open(dir.path().join("movie.mp4")).unwrap();
    std::fs::remove_file(handle.temp_path()).unwrap();

    handle.delete_file().unwrap();
    assert_eq!(handle.state(), State::Deleted);
}

#[test]
fn test_drop_after_finalize_is_quiet() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");
    {
        let handle = TempFileHandle::open(&dest).unwrap();
        handle.append(b"x").unwrap();
        handle.finalize().unwrap();
        handle.close();
    }
    assert_eq!(std::fs::read(&dest).unwrap(), b"x");
}

#[test]
fn test_attributes_track_growth() {
    let dir = tempdir().unwrap();
    let handle = TempFileHandle::open(dir.path().join("movie.mp4")).unwrap();

    let before = handle.attributes().unwrap();
    handle.append(&[0u8; 4096]).unwrap();
    let after = handle.attributes().unwrap();

    assert_eq!(before.len, 0);
    assert_eq!(after.len, 4096);
    assert!(!after.readonly);
}

#[test]
fn test_sweep_removes_abandoned_handles() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("movie.mp4");

    let abandoned = {
        let handle = TempFileHandle::open(&dest).unwrap();
        handle.append(b"crashed mid-transfer").unwrap();
        handle.temp_path().to_path_buf()
    };
    assert!(abandoned.exists());

    let removed = tailspool::sweep_orphans(&dest).unwrap();
    assert_eq!(removed, vec![abandoned.clone()]);
    assert!(!abandoned.exists());
}
