//! ROM path resolution: loads raw ROM bytes from a `.nes` file or from the
//! first `.nes` entry of a ZIP archive.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RomLoadError {
    #[error("ROM path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid ZIP: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("no .nes file inside {}", .0.display())]
    NoRomInArchive(PathBuf),
}

/// Read a ROM image.
///
/// Resolution order:
/// 1. If `path` ends with `.zip` → the first `.nes` entry in archive order.
/// 2. Otherwise → the file's bytes as-is (validation is the core's job).
pub fn load_rom(path: &Path) -> Result<Vec<u8>, RomLoadError> {
    if !path.is_file() {
        return Err(RomLoadError::NotFound(path.to_path_buf()));
    }

    let data = if has_extension(path, "zip") {
        load_from_zip(path)?
    } else {
        std::fs::read(path)?
    };
    tracing::debug!(path = %path.display(), bytes = data.len(), "ROM loaded");
    Ok(data)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Extract the first `.nes` file from a ZIP archive.
fn load_from_zip(path: &Path) -> Result<Vec<u8>, RomLoadError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut archive = zip::ZipArchive::new(reader)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // Skip directories
        if entry.is_dir() || !has_extension(Path::new(entry.name()), "nes") {
            continue;
        }

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        return Ok(data);
    }

    Err(RomLoadError::NoRomInArchive(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let zip_path = dir.join(name);
        let file = File::create(&zip_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (fname, data) in files {
            zip.start_file(*fname, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        zip_path
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_plain_file() {
        let dir = fresh_dir("nes_harness_rompath_plain");
        let rom = dir.join("game.nes");
        std::fs::write(&rom, [0x4E, 0x45, 0x53, 0x1A]).unwrap();

        assert_eq!(load_rom(&rom).unwrap(), vec![0x4E, 0x45, 0x53, 0x1A]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn loads_first_nes_entry_from_zip() {
        let dir = fresh_dir("nes_harness_rompath_zip");
        let zip_path = create_test_zip(
            &dir,
            "game.ZIP",
            &[
                ("readme.txt", b"hello"),
                ("roms/Game.NES", &[0xAA; 16]),
                ("other.nes", &[0xBB; 16]),
            ],
        );

        assert_eq!(load_rom(&zip_path).unwrap(), vec![0xAA; 16]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn zip_without_rom_is_an_error() {
        let dir = fresh_dir("nes_harness_rompath_empty_zip");
        let zip_path = create_test_zip(&dir, "notes.zip", &[("notes.txt", b"nothing")]);

        assert!(matches!(
            load_rom(&zip_path),
            Err(RomLoadError::NoRomInArchive(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_zip_is_an_error() {
        let dir = fresh_dir("nes_harness_rompath_bad_zip");
        let zip_path = dir.join("broken.zip");
        std::fs::write(&zip_path, b"PK not really").unwrap();

        assert!(matches!(load_rom(&zip_path), Err(RomLoadError::Zip(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_path_is_not_found() {
        let path = std::env::temp_dir().join("nes_harness_rompath_missing.nes");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load_rom(&path), Err(RomLoadError::NotFound(_))));
    }
}
