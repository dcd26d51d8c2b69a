use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

/// Ensures the database directory exists, creating it (and parents) when missing.
///
/// # Example
/// ```no_run
/// use utils::ensure_database_dir;
///
/// let dir = ensure_database_dir("database").unwrap();
/// println!("Database ready at: {:?}", dir);
/// ```
pub fn ensure_database_dir<P: AsRef<Path>>(database_dir: P) -> Result<PathBuf> {
    let dir = database_dir.as_ref();
    if !dir.is_dir() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create database directory at {:?}", dir))?;
        tracing::info!("Created database directory at {:?}", dir);
    }
    Ok(dir.to_path_buf())
}

/// Path of the JSON-lines file backing a collection: `<dir>/<collection>.jsonl`.
pub fn collection_path<P: AsRef<Path>>(database_dir: P, collection: &str) -> PathBuf {
    database_dir.as_ref().join(format!("{}.jsonl", collection))
}

/// Appends one document as a single line. The file is created on first use.
pub(crate) fn append_document(path: &Path, document: &Map<String, Value>) -> std::io::Result<()> {
    let mut line = serde_json::to_string(document)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()
}

/// Reads every document of a collection file.
///
/// A missing file is an empty collection. Lines that are blank are ignored; a line that
/// is not a JSON object is an error.
pub fn read_collection<P: AsRef<Path>>(path: P) -> Result<Vec<Map<String, Value>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).with_context(|| format!("Cannot open collection at {:?}", path))?;
    let mut documents = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Cannot read {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("Line {} of {:?} is not valid JSON", idx + 1, path))?;
        match value {
            Value::Object(map) => documents.push(map),
            _ => anyhow::bail!("Line {} of {:?} is not a JSON object", idx + 1, path),
        }
    }

    Ok(documents)
}
