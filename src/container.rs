//! Directory tree containers.
//!
//! A container serializes a directory tree into one byte blob: a `u32` entry
//! count, then per entry a `u32` path length, that many UTF-8 bytes of
//! `/`-separated relative path, a `u64` content size and the content bytes.
//! All integers are big-endian. The codec never looks inside this structure;
//! compress the blob as a whole and unpack after decompressing.
use std::convert::TryFrom;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Pack every regular file below `dir` into a container blob.
///
/// Entries are sorted by relative path so the output is reproducible across
/// filesystems. Empty directories are not represented.
pub fn pack_dir(dir: &Path) -> io::Result<Vec<u8>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a directory: {}", dir.display()),
        ));
    }

    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort();

    let mut out = Vec::new();
    let count = u32::try_from(files.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many files"))?;
    out.extend_from_slice(&count.to_be_bytes());

    for rel in files {
        let name = rel
            .to_str()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non-UTF-8 file name: {}", rel.display()),
                )
            })?
            .replace(std::path::MAIN_SEPARATOR, "/");

        let contents = fs::read(dir.join(&rel))?;

        let name_len = u32::try_from(name.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path too long"))?;
        out.extend_from_slice(&name_len.to_be_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&(contents.len() as u64).to_be_bytes());
        out.extend_from_slice(&contents);
    }

    Ok(out)
}

/// Unpack a container blob into `target`, creating directories as needed.
///
/// Fails without writing the offending entry when the blob is truncated,
/// a path is not UTF-8, or a path would escape `target`.
pub fn unpack(data: &[u8], target: &Path) -> io::Result<()> {
    fs::create_dir_all(target)?;

    let mut inp = data;
    let count = read_u32(&mut inp)?;

    for _ in 0..count {
        let name_len = read_u32(&mut inp)? as usize;
        let name_bytes = take(&mut inp, name_len)?;
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-UTF-8 path in container"))?;
        let rel = checked_relative(name)?;

        let size = read_u64(&mut inp)?;
        let size = usize::try_from(size)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "entry too large"))?;
        let contents = take(&mut inp, size)?;

        let out_path = target.join(&rel);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, contents)?;
    }

    Ok(())
}

fn collect_files(base: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let kind = entry.file_type()?;
        if kind.is_dir() {
            collect_files(base, &path, files)?;
        } else if kind.is_file() {
            // Strip the base; read_dir always yields paths below it.
            let rel = path
                .strip_prefix(base)
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
            files.push(rel.to_path_buf());
        }
    }
    Ok(())
}

/// Reject path components that would write outside the target directory.
fn checked_relative(name: &str) -> io::Result<PathBuf> {
    let rel = PathBuf::from(name.replace('/', std::path::MAIN_SEPARATOR.to_string().as_str()));
    let plain = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain || rel.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("container path escapes the target directory: {}", name),
        ));
    }
    Ok(rel)
}

fn take<'a>(inp: &mut &'a [u8], n: usize) -> io::Result<&'a [u8]> {
    if inp.len() < n {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "container ends mid-entry",
        ));
    }
    let (head, tail) = inp.split_at(n);
    *inp = tail;
    Ok(head)
}

fn read_u32(inp: &mut &[u8]) -> io::Result<u32> {
    let bytes = take(inp, 4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    Ok(u32::from_be_bytes(buf))
}

fn read_u64(inp: &mut &[u8]) -> io::Result<u64> {
    let bytes = take(inp, 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}
