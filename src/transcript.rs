use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Expands inputs into transcript files.
///
/// Files are taken as given. A directory contributes the `.txt` files directly
/// inside it, sorted by name.
pub fn resolve_transcript_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)
                .with_context(|| format!("Failed to list directory {:?}", input))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_txt(path))
                .collect();
            found.sort();

            if found.is_empty() {
                anyhow::bail!("No .txt files found in {:?}", input);
            }
            info!(action = "resolve", component = "transcript_dir", dir = ?input, file_count = found.len(), "Found transcripts in directory");
            paths.extend(found);
        } else if input.exists() {
            if !is_txt(input) {
                warn!(action = "resolve", component = "transcript_file", file_path = ?input, "Input does not have a .txt extension");
            }
            paths.push(input.clone());
        } else {
            anyhow::bail!("Transcript not found at {:?}", input);
        }
    }

    Ok(paths)
}

fn is_txt(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Reads every transcript and joins them with a blank line.
pub fn read_transcripts(paths: &[PathBuf]) -> Result<String> {
    let start_time = Instant::now();
    info!(action = "start", component = "transcript_read", file_count = paths.len(), "Reading transcripts");

    let contents = paths
        .iter()
        .map(|path| {
            let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
            let text = String::from_utf8(bytes)
                .with_context(|| format!("{:?} is not valid UTF-8", path))?;
            // exports written on Windows start with a BOM
            Ok(text.trim_start_matches('\u{feff}').to_string())
        })
        .collect::<Result<Vec<String>>>()?;

    let combined = contents.join("\n\n");
    info!(
        action = "complete",
        component = "transcript_read",
        bytes = combined.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Transcripts read"
    );
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_yields_sorted_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.TXT"), "a").unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();

        let paths = resolve_transcript_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_transcript_paths(&[dir.path().to_path_buf()]).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = resolve_transcript_paths(&[PathBuf::from("/no/such/chat.txt")]).unwrap_err();
        assert!(err.to_string().contains("Transcript not found"));
    }

    #[test]
    fn joins_files_with_blank_line_and_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("1.txt");
        let second = dir.path().join("2.txt");
        fs::write(&first, "\u{feff}one").unwrap();
        fs::write(&second, "two").unwrap();

        assert_eq!(read_transcripts(&[first, second]).unwrap(), "one\n\ntwo");
    }
}
