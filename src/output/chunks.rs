//! Raw chunk persistence.
//!
//! A saved session is a directory holding `strings.bin` and one
//! `frame-NNNNNN.bin` per frame chunk, exactly as received.

use super::ensure_dir;
use crate::parser::session::CapturedSession;
use crate::utils::config::{CHUNK_FILE_EXTENSION, FRAME_CHUNK_PREFIX, STRINGS_CHUNK_FILE};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

fn frame_file_name(index: usize) -> String {
    format!("{}{:06}.{}", FRAME_CHUNK_PREFIX, index, CHUNK_FILE_EXTENSION)
}

/// Frame index encoded in a chunk file name, if it is one
fn frame_index(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(FRAME_CHUNK_PREFIX)?
        .strip_suffix(CHUNK_FILE_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

/// Write every chunk of a session into `dir`
///
/// **Public** - used by `capture --save-chunks`
///
/// # Errors
/// * `OutputError::InvalidPath` - `dir` exists and is not a directory
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_session_dir(dir: impl AsRef<Path>, session: &CapturedSession) -> Result<(), OutputError> {
    let dir = dir.as_ref();

    if dir.exists() && !dir.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }
    ensure_dir(dir)?;

    fs::write(dir.join(STRINGS_CHUNK_FILE), &session.strings_chunk)?;
    for (index, chunk) in session.frame_chunks.iter().enumerate() {
        fs::write(dir.join(frame_file_name(index)), chunk)?;
    }

    info!(
        "Saved {} frame chunks to: {}",
        session.frame_chunks.len(),
        dir.display()
    );

    Ok(())
}

/// Read a session written by `write_session_dir`
///
/// Frame chunks come back ordered by their index; unrelated files are ignored.
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error (including a missing `strings.bin`)
pub fn read_session_dir(dir: impl AsRef<Path>) -> Result<CapturedSession, OutputError> {
    let dir = dir.as_ref();

    debug!("Reading chunks from: {}", dir.display());

    let strings_chunk = fs::read(dir.join(STRINGS_CHUNK_FILE))?;

    let mut frame_files: Vec<(usize, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        if let Some(index) = file_name.to_str().and_then(frame_index) {
            frame_files.push((index, entry.path()));
        }
    }
    frame_files.sort_by_key(|(index, _)| *index);

    let frame_chunks = frame_files
        .iter()
        .map(|(_, path)| fs::read(path))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Loaded {} frame chunks", frame_chunks.len());

    Ok(CapturedSession {
        frame_chunks,
        strings_chunk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_names() {
        assert_eq!(frame_file_name(7), "frame-000007.bin");
        assert_eq!(frame_index("frame-000007.bin"), Some(7));
        assert_eq!(frame_index("frame-1234567.bin"), Some(1_234_567));
        assert_eq!(frame_index("strings.bin"), None);
        assert_eq!(frame_index("frame-000007.txt"), None);
    }

    #[test]
    fn test_session_dir_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("session");
        let session = CapturedSession {
            frame_chunks: (0..12u8).map(|i| vec![b'P', b'R', b'O', b'F', i]).collect(),
            strings_chunk: b"STRS\0\0\0\0".to_vec(),
        };

        write_session_dir(&dir, &session).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(read_session_dir(&dir).unwrap(), session);
    }

    #[test]
    fn test_missing_strings_chunk() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_session_dir(temp_dir.path()),
            Err(OutputError::WriteFailed(_))
        ));
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let result = write_session_dir(temp_file.path(), &CapturedSession::default());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }
}
