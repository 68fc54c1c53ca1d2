//! Directory-to-zip orchestration.

use crate::ArchiveError;
use crate::Result;
use crate::creation::config::ArchiveConfig;
use crate::creation::filters;
use crate::creation::report::BuildReport;
use crate::creation::session::ArchiveSession;
use crate::creation::session::BuildState;
use crate::creation::walker::EntryKind;
use crate::creation::walker::TreeWalker;
use crate::creation::walker::WalkEntry;
use crate::progress::NoopProgress;
use crate::progress::ProgressCallback;
use crate::progress::ProgressTracker;
use crate::progress::SkipReason;
use log::debug;
use log::info;
use log::warn;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Builds zip archives from directory trees.
///
/// Each call to [`build`](Self::build) walks the source root, skips
/// non-regular, empty and excluded files, streams every remaining file into
/// its own entry and writes the central directory. Any error aborts the whole
/// build; a half-written destination may be left on disk and must not be
/// used.
///
/// # Examples
///
/// ```no_run
/// use dirzip_core::ArchiveBuilder;
/// use dirzip_core::ArchiveConfig;
///
/// let mut builder = ArchiveBuilder::new(ArchiveConfig::default().exclude(".log"));
/// let report = builder.build("site/", "site.zip")?;
/// println!("archived {} files", report.files_added);
/// # Ok::<(), dirzip_core::ArchiveError>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    config: ArchiveConfig,
    state: BuildState,
}

impl ArchiveBuilder {
    /// Creates a builder with the given configuration.
    #[must_use]
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            config,
            state: BuildState::Idle,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Returns the state of the most recent build.
    #[must_use]
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Builds `dest` from the contents of `source_root`.
    ///
    /// The destination is created, or truncated if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - `source_root` is missing or not a directory
    /// - The destination cannot be created
    /// - A file cannot be opened or read, or exceeds the size limit
    /// - An archived file's path below `source_root` is not valid UTF-8
    ///   ([`ArchiveError::NonUtf8Path`]); such names are never written raw
    /// - Writing or finalizing the archive fails
    pub fn build<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        source_root: P,
        dest: Q,
    ) -> Result<BuildReport> {
        self.build_with_progress(source_root, dest, &mut NoopProgress)
    }

    /// Like [`build`](Self::build), reporting progress to `progress`.
    pub fn build_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        source_root: P,
        dest: Q,
        progress: &mut dyn ProgressCallback,
    ) -> Result<BuildReport> {
        let source_root = source_root.as_ref();
        self.state = BuildState::Building;
        let result = self.build_file(source_root, dest.as_ref(), progress);
        self.settle(source_root, result)
    }

    /// Builds an archive into an arbitrary seekable writer.
    ///
    /// Returns the writer positioned at the end of the archive.
    pub fn build_to_writer<P: AsRef<Path>, W: Write + Seek>(
        &mut self,
        source_root: P,
        writer: W,
        progress: &mut dyn ProgressCallback,
    ) -> Result<(W, BuildReport)> {
        let source_root = source_root.as_ref();
        self.state = BuildState::Building;
        let result = self
            .config
            .validate()
            .and_then(|()| check_source_root(source_root))
            .and_then(|()| self.build_into(source_root, writer, None, progress));
        self.settle(source_root, result)
    }

    fn settle<T>(&mut self, source_root: &Path, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.state = BuildState::Finalized,
            Err(e) => {
                self.state = BuildState::Failed;
                warn!("archive build from {} failed: {e}", source_root.display());
            }
        }
        result
    }

    fn build_file(
        &self,
        source_root: &Path,
        dest: &Path,
        progress: &mut dyn ProgressCallback,
    ) -> Result<BuildReport> {
        self.config.validate()?;
        check_source_root(source_root)?;

        let file = File::create(dest).map_err(|e| ArchiveError::CreateDestination {
            path: dest.to_path_buf(),
            source: e,
        })?;
        // The destination may live inside the tree being archived.
        let dest_canonical = fs::canonicalize(dest).ok();

        let (writer, report) = self.build_into(
            source_root,
            BufWriter::new(file),
            dest_canonical.as_deref(),
            progress,
        )?;
        writer
            .into_inner()
            .map_err(|e| ArchiveError::Finalize(e.error().to_string()))?;

        info!(
            "wrote {} ({} entries, {} bytes)",
            dest.display(),
            report.files_added,
            report.archive_size
        );
        Ok(report)
    }

    fn build_into<W: Write + Seek>(
        &self,
        source_root: &Path,
        writer: W,
        dest: Option<&Path>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<(W, BuildReport)> {
        let start = Instant::now();
        let mut session = ArchiveSession::new(writer, &self.config);
        let mut tracker = ProgressTracker::new(progress);
        let mut report = BuildReport::new();

        let walker = TreeWalker::new(source_root, self.config.follow_symlinks);
        for entry in walker.walk() {
            let entry = entry?;
            self.visit(source_root, &entry, dest, &mut session, &mut tracker, &mut report)?;
        }

        let mut writer = session.finish()?;
        report.archive_size = writer
            .stream_position()
            .map_err(|e| ArchiveError::Finalize(e.to_string()))?;
        report.duration = start.elapsed();
        tracker.on_complete();

        Ok((writer, report))
    }

    fn visit<W: Write + Seek>(
        &self,
        source_root: &Path,
        entry: &WalkEntry,
        dest: Option<&Path>,
        session: &mut ArchiveSession<W>,
        tracker: &mut ProgressTracker<'_>,
        report: &mut BuildReport,
    ) -> Result<()> {
        match entry.kind {
            EntryKind::Directory => {
                report.directories_visited += 1;
                return Ok(());
            }
            EntryKind::Symlink | EntryKind::Other => {
                report.entries_skipped_other += 1;
                report.add_warning(format!(
                    "skipped non-regular file: {}",
                    entry.path.display()
                ));
                skip(tracker, entry, SkipReason::NotRegularFile);
                return Ok(());
            }
            EntryKind::File => {}
        }

        if dest.is_some_and(|dest| is_destination(&entry.path, dest)) {
            report.files_skipped_destination += 1;
            skip(tracker, entry, SkipReason::Destination);
            return Ok(());
        }

        if entry.is_empty() {
            report.files_skipped_empty += 1;
            skip(tracker, entry, SkipReason::Empty);
            return Ok(());
        }

        if filters::is_excluded(&filters::base_name(&entry.path), &self.config.exclusions) {
            report.files_excluded += 1;
            skip(tracker, entry, SkipReason::Excluded);
            return Ok(());
        }

        let entry_name = filters::archive_entry_name(&entry.path, source_root)?;
        let entry_path = Path::new(&entry_name);

        tracker.on_entry_start(entry_path);
        let copied = session.add_file(&entry_name, &entry.path, tracker.callback())?;
        tracker.on_entry_complete(entry_path);

        report.files_added += 1;
        report.bytes_written += copied;
        report.entries.push(entry_name);
        Ok(())
    }
}

/// Verifies that `source_root` exists and is a directory.
pub(crate) fn check_source_root(source_root: &Path) -> Result<()> {
    match fs::metadata(source_root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ArchiveError::NotADirectory {
            path: source_root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArchiveError::SourceNotFound {
            path: source_root.to_path_buf(),
        }),
        Err(e) => Err(ArchiveError::Walk {
            path: source_root.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn skip(tracker: &mut ProgressTracker<'_>, entry: &WalkEntry, reason: SkipReason) {
    debug!("skipping {} ({reason})", entry.path.display());
    tracker.on_skip(&entry.relative_path, reason);
}

fn is_destination(path: &Path, dest: &Path) -> bool {
    path.file_name() == dest.file_name() && fs::canonicalize(path).is_ok_and(|p| p == dest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::creation::config::EntryMethod;
    use crate::test_utils::read_zip_entries;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_build_spec_scenario() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "alpha").unwrap();
        fs::write(src.path().join("b.conf"), "secret").unwrap();
        fs::create_dir(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/c.txt"), "charlie").unwrap();

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out.zip");
        let mut builder = ArchiveBuilder::new(ArchiveConfig::default().with_exclusions([".conf"]));

        let report = builder.build(src.path(), &dest).unwrap();

        assert_eq!(builder.state(), BuildState::Finalized);
        assert_eq!(report.files_added, 2);
        assert_eq!(report.files_excluded, 1);
        assert_eq!(report.directories_visited, 2);
        assert_eq!(report.entries, vec!["a.txt", "sub/c.txt"]);

        let entries = read_zip_entries(&dest);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["a.txt"], b"alpha");
        assert_eq!(entries["sub/c.txt"], b"charlie");
    }

    #[test]
    fn test_build_skips_empty_files() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("empty.txt"), "").unwrap();

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out.zip");
        let report = ArchiveBuilder::default().build(src.path(), &dest).unwrap();

        assert_eq!(report.files_added, 0);
        assert_eq!(report.files_skipped_empty, 1);
        assert!(read_zip_entries(&dest).is_empty());
    }

    #[test]
    fn test_build_directories_only() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("a/b/c")).unwrap();
        fs::create_dir_all(src.path().join("d")).unwrap();

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out.zip");
        let mut builder = ArchiveBuilder::default();
        let report = builder.build(src.path(), &dest).unwrap();

        assert_eq!(builder.state(), BuildState::Finalized);
        assert_eq!(report.files_added, 0);
        assert_eq!(report.directories_visited, 5);
        assert!(report.archive_size > 0, "empty archive still has an end record");
        assert!(read_zip_entries(&dest).is_empty());
    }

    #[test]
    fn test_build_missing_source() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("missing");
        let dest = out.path().join("out.zip");
        let mut builder = ArchiveBuilder::default();

        let result = builder.build(&missing, &dest);

        assert!(matches!(
            result.unwrap_err(),
            ArchiveError::SourceNotFound { .. }
        ));
        assert_eq!(builder.state(), BuildState::Failed);
        assert!(!dest.exists(), "destination is not created before source checks");
    }

    #[test]
    fn test_build_source_is_file() {
        let out = TempDir::new().unwrap();
        let file = out.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = ArchiveBuilder::default().build(&file, out.path().join("out.zip"));
        assert!(matches!(
            result.unwrap_err(),
            ArchiveError::NotADirectory { .. }
        ));
    }

    #[test]
    fn test_build_invalid_config() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let mut builder = ArchiveBuilder::new(ArchiveConfig::default().exclude(""));

        let result = builder.build(src.path(), out.path().join("out.zip"));
        assert!(matches!(
            result.unwrap_err(),
            ArchiveError::EmptyExclusionFragment { .. }
        ));
        assert_eq!(builder.state(), BuildState::Failed);
    }

    #[test]
    fn test_build_size_limit_aborts() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("small.txt"), "ok").unwrap();
        fs::write(src.path().join("zbig.bin"), vec![9u8; 10_000]).unwrap();

        let out = TempDir::new().unwrap();
        let config = ArchiveConfig::default()
            .with_chunk_size(1024)
            .with_max_file_size(4096);
        let mut builder = ArchiveBuilder::new(config);

        let err = builder.build(src.path(), out.path().join("out.zip")).unwrap_err();

        match err {
            ArchiveError::FileTooLarge { path, limit } => {
                assert!(path.ends_with("zbig.bin"));
                assert_eq!(limit, 4096);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
        assert_eq!(builder.state(), BuildState::Failed);
    }

    #[test]
    fn test_build_skips_destination_inside_source() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "alpha").unwrap();
        let dest = src.path().join("self.bundle");

        let config = ArchiveConfig::default().with_exclusions(Vec::<String>::new());
        let report = ArchiveBuilder::new(config).build(src.path(), &dest).unwrap();

        assert_eq!(report.entries, vec!["a.txt"]);
        assert_eq!(report.files_skipped_destination, 1);
        assert_eq!(report.files_skipped_empty, 0);
        assert_eq!(report.files_skipped(), 1);
        let entries = read_zip_entries(&dest);
        assert!(!entries.contains_key("self.bundle"));
    }

    #[test]
    fn test_build_to_writer_in_memory() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("one.txt"), "1").unwrap();
        fs::write(src.path().join("two.txt"), "22").unwrap();

        let mut builder = ArchiveBuilder::default();
        let (cursor, report) = builder
            .build_to_writer(src.path(), Cursor::new(Vec::new()), &mut NoopProgress)
            .unwrap();

        let bytes = cursor.into_inner();
        assert_eq!(report.archive_size, bytes.len() as u64);
        assert_eq!(report.bytes_written, 3);

        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_build_deflated() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("repeat.txt"), "z".repeat(50_000)).unwrap();

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out.zip");
        let config = ArchiveConfig::default().with_method(EntryMethod::Deflated { level: 9 });
        let report = ArchiveBuilder::new(config).build(src.path(), &dest).unwrap();

        assert!(report.archive_size < report.bytes_written);
        assert!(report.compression_ratio() > 1.0);
        assert_eq!(read_zip_entries(&dest)["repeat.txt"].len(), 50_000);
    }

    #[test]
    fn test_build_reports_progress_and_skips() {
        #[derive(Default)]
        struct Recorder {
            started: Vec<String>,
            skipped: Vec<(String, SkipReason)>,
            bytes: u64,
            completed: usize,
        }

        impl ProgressCallback for Recorder {
            fn on_entry_start(&mut self, path: &Path, _current: usize) {
                self.started.push(path.display().to_string());
            }
            fn on_bytes_written(&mut self, bytes: u64) {
                self.bytes += bytes;
            }
            fn on_entry_complete(&mut self, _path: &Path) {}
            fn on_skip(&mut self, path: &Path, reason: SkipReason) {
                self.skipped.push((path.display().to_string(), reason));
            }
            fn on_complete(&mut self) {
                self.completed += 1;
            }
        }

        let src = TempDir::new().unwrap();
        fs::write(src.path().join("keep.txt"), "12345").unwrap();
        fs::write(src.path().join("empty.txt"), "").unwrap();
        fs::write(src.path().join(".DS_Store"), "junk").unwrap();

        let out = TempDir::new().unwrap();
        let mut recorder = Recorder::default();
        ArchiveBuilder::default()
            .build_with_progress(src.path(), out.path().join("out.zip"), &mut recorder)
            .unwrap();

        assert_eq!(recorder.started, vec!["keep.txt"]);
        assert_eq!(recorder.bytes, 5);
        assert_eq!(recorder.completed, 1);
        assert_eq!(
            recorder.skipped,
            vec![
                (".DS_Store".to_string(), SkipReason::Excluded),
                ("empty.txt".to_string(), SkipReason::Empty),
            ]
        );
    }

    #[test]
    fn test_builder_reusable_after_failure() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "alpha").unwrap();
        let out = TempDir::new().unwrap();
        let mut builder = ArchiveBuilder::default();

        assert!(builder.build(out.path().join("nope"), out.path().join("x.zip")).is_err());
        assert_eq!(builder.state(), BuildState::Failed);

        builder.build(src.path(), out.path().join("y.zip")).unwrap();
        assert_eq!(builder.state(), BuildState::Finalized);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_build_fails_on_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "alpha").unwrap();
        fs::write(src.path().join(OsStr::from_bytes(b"bad\xff.txt")), "x").unwrap();
        let out = TempDir::new().unwrap();

        let mut builder = ArchiveBuilder::default();
        let err = builder
            .build(src.path(), out.path().join("out.zip"))
            .unwrap_err();

        assert!(matches!(err, ArchiveError::NonUtf8Path { .. }));
        assert_eq!(builder.state(), BuildState::Failed);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_skips_symlinks_by_default() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink(src.path().join("target.txt"), src.path().join("link.txt"))
            .unwrap();

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out.zip");
        let report = ArchiveBuilder::default().build(src.path(), &dest).unwrap();

        assert_eq!(report.entries, vec!["target.txt"]);
        assert_eq!(report.entries_skipped_other, 1);
        assert!(report.has_warnings());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_follows_symlinks_when_configured() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink(src.path().join("target.txt"), src.path().join("link.txt"))
            .unwrap();

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out.zip");
        let config = ArchiveConfig::default().with_follow_symlinks(true);
        let report = ArchiveBuilder::new(config).build(src.path(), &dest).unwrap();

        assert_eq!(report.entries, vec!["link.txt", "target.txt"]);
        assert_eq!(read_zip_entries(&dest)["link.txt"], b"content");
    }
}
