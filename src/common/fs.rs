//! Common file system operations with unified error handling

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

/// Options for recursive directory copies
#[derive(Default, Clone)]
pub struct CopyOptions {
    /// Top-level entry names to skip
    pub exclude: Vec<String>,
    /// Abort the copy once this instant passes
    pub deadline: Option<Instant>,
}

impl CopyOptions {
    pub fn exclude_git() -> Self {
        Self {
            exclude: vec![".git".to_string()],
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Copy a directory tree.
///
/// Symlinks are followed one level: a symlinked directory's contents are
/// copied, but symlinks inside that subtree are skipped, so cycles cannot
/// recurse. Returns `ErrorKind::TimedOut` when the deadline passes mid-copy.
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2, options: &CopyOptions) -> io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    copy_dir_inner(src.as_ref(), dst.as_ref(), options, true)
}

fn copy_dir_inner(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    follow_symlinks: bool,
) -> io::Result<()> {
    if !dst.exists() {
        fs::create_dir_all(dst)?;
    }

    for entry in fs::read_dir(src)? {
        if options.expired() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "copy deadline exceeded",
            ));
        }

        let entry = entry?;
        let entry_path = entry.path();
        let file_name = entry.file_name();

        if options
            .exclude
            .iter()
            .any(|excluded| file_name.to_str() == Some(excluded.as_str()))
        {
            continue;
        }

        let file_type = entry.file_type()?;
        let dst_path = dst.join(&file_name);

        if file_type.is_symlink() {
            if !follow_symlinks {
                continue;
            }
            let target = fs::metadata(&entry_path)?;
            if target.is_dir() {
                copy_dir_inner(&entry_path, &dst_path, options, false)?;
            } else {
                fs::copy(&entry_path, &dst_path)?;
            }
        } else if file_type.is_dir() {
            copy_dir_inner(&entry_path, &dst_path, options, follow_symlinks)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Write a file atomically: write a sibling temp file, then rename it over
/// the target. Readers never observe a truncated file. Parent directories
/// are created as needed.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let tmp_path = parent.join(format!("{file_name}.tmp"));

    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp_path);
    })
}
