//! JSON Lines files.
//!
//! Each line is one serialized document. Writes replace the whole file via a
//! sibling temp file and rename, so readers see either the old or new contents.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::StorageError;

pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn temp_path(&self) -> Result<PathBuf, StorageError> {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidPath(self.path.display().to_string()))?;
        Ok(self.path.with_file_name(format!(".{}.tmp", name)))
    }

    /// Replace the file with `entities`.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path()?;
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            for entity in entities {
                serde_json::to_writer(&mut writer, entity)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote {} entities to {:?}", entities.len(), self.path);
        Ok(entities.len())
    }
}

pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read every document; a missing file reads as empty.
    ///
    /// Unparseable lines are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e),
            }
        }

        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: u32,
        label: String,
    }

    fn rows(n: u32) -> Vec<Row> {
        (0..n)
            .map(|id| Row {
                id,
                label: format!("row-{}", id),
            })
            .collect()
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");

        let written = JsonlWriter::new(path.clone()).write_all(&rows(3)).unwrap();
        assert_eq!(written, 3);

        let read: Vec<Row> = JsonlReader::new(path).read_all().unwrap();
        assert_eq!(read, rows(3));
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        let writer = JsonlWriter::new(path.clone());

        writer.write_all(&rows(5)).unwrap();
        writer.write_all(&rows(2)).unwrap();

        let read: Vec<Row> = JsonlReader::new(path).read_all().unwrap();
        assert_eq!(read.len(), 2);
        // No temp file left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let reader: JsonlReader<Row> = JsonlReader::new(dir.path().join("absent.jsonl"));
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        fs::write(
            &path,
            "{\"id\":1,\"label\":\"a\"}\nnot json\n\n{\"id\":2,\"label\":\"b\"}\n",
        )
        .unwrap();

        let read: Vec<Row> = JsonlReader::new(path).read_all().unwrap();
        assert_eq!(read.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("rows.jsonl");

        JsonlWriter::new(path.clone()).write_all(&rows(1)).unwrap();
        assert!(path.exists());
    }
}
