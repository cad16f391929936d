//! File system helpers at the edges of the pipeline.

use crate::error::{Error, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Regular files directly inside `dir`, sorted by path.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Writes one item per line.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref()).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Writes lower-triangle scores, row `r` holding `r` comma-terminated values.
/// The first document has no row.
pub fn write_lower_triangle(path: &Path, scores: &[f64]) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut rest = scores;
    let mut row = 1;
    while !rest.is_empty() {
        let (current, tail) = rest.split_at(row.min(rest.len()));
        for value in current {
            write!(writer, "{},", value).map_err(|e| Error::io(path, e))?;
        }
        writeln!(writer).map_err(|e| Error::io(path, e))?;
        rest = tail;
        row += 1;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::adjacency::parse_scores;

    #[test]
    fn test_list_files_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_lower_triangle_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        write_lower_triangle(&path, &[0.1, 0.2, 0.3]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0.1,\n0.2,0.3,\n");
        assert_eq!(parse_scores(&text).unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_missing_directory() {
        let result = list_files(Path::new("/nonexistent/corpus"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
