//! Filesystem helpers for Giftwise artefacts and request files.
//!
//! Every helper resolves its target through an ambient `cap-std` directory
//! handle and works on `camino` UTF-8 paths, so callers never juggle
//! `OsStr` conversions.
#![forbid(unsafe_code)]

use std::io::{self, Read};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a file for reading.
///
/// # Errors
/// Returns the I/O error raised while opening `path`.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 text file, such as a JSON request.
///
/// # Errors
/// Returns the I/O error raised while opening or reading `path`, including
/// `InvalidData` when the contents are not UTF-8.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create the parent directory of `path` when it is missing.
///
/// # Errors
/// Returns the I/O error raised while opening the base directory or creating
/// the missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Report whether `path` is a regular file.
///
/// # Errors
/// Returns the I/O error raised while opening the parent directory or
/// reading metadata. A missing file surfaces as `NotFound`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Split `parent` into an ambient base directory and the path below it.
///
/// Absolute paths are rooted at `/` (or the drive prefix on Windows);
/// relative paths are rooted at the current directory.
///
/// # Errors
/// Fails when the base directory cannot be opened or the path is not UTF-8
/// after its prefix is stripped.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    Ok((dir, relative))
}
