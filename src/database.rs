//! Durable storage for the link set
//!
//! The whole link set is persisted as one document, `{"links": [...]}`.
//! Two engines are available: a plain JSON file and an embedded redb
//! database that stores the same document under a single key.

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::model::Link;

/// Table holding the serialized link set
///
/// Key: `DOCUMENT_KEY`
/// Value: JSON document `{"links":[...]}`
pub const TABLE_LINK_SET: TableDefinition<&str, &str> = TableDefinition::new("link_set_v1");

/// The single key under which the link set document lives
pub const DOCUMENT_KEY: &str = "links";

/// Load/save contract for the persisted link set
///
/// Implementations must make `save` all-or-nothing: after an error the
/// previously saved document is still the one `load` returns.
pub trait Persistence: Send + Sync {
    fn load(&self) -> Result<Vec<Link>>;

    fn save(&self, links: &[Link]) -> Result<()>;

    /// Short engine name for log lines
    fn name(&self) -> &'static str;
}

#[derive(Deserialize)]
struct LinkDocument {
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Serialize)]
struct LinkDocumentRef<'a> {
    links: &'a [Link],
}

fn decode(raw: &str) -> Result<Vec<Link>> {
    Ok(serde_json::from_str::<LinkDocument>(raw)?.links)
}

fn encode(links: &[Link]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&LinkDocumentRef { links })?)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Link set kept in a pretty-printed JSON file
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Opens `path`, writing an empty document if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        ensure_parent_dir(&store.path)?;

        if !store.path.exists() {
            info!(path = %store.path.display(), "creating empty link set");
            store.save(&[])?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Vec<Link>> {
        let raw = fs::read_to_string(&self.path)?;
        decode(&raw)
    }

    fn save(&self, links: &[Link]) -> Result<()> {
        // Write beside the target and rename over it so readers never see a torn file
        let temp = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            writer.write_all(encode(links)?.as_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Initializes the embedded database and creates the link set table
///
/// # Example
///
/// ```no_run
/// # use quicklink::database::init_db;
/// let db = init_db("links.redb").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: impl AsRef<Path>) -> std::result::Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINK_SET)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// Link set kept as a single document inside a redb database
pub struct RedbFile {
    db: Database,
}

impl RedbFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        ensure_parent_dir(path.as_ref())?;
        Ok(Self {
            db: init_db(path)?,
        })
    }

    fn read_document(&self) -> std::result::Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINK_SET)?;
        let document = table.get(DOCUMENT_KEY)?.map(|guard| guard.value().to_string());
        Ok(document)
    }

    fn write_document(&self, document: &str) -> std::result::Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_LINK_SET)?;
            table.insert(DOCUMENT_KEY, document)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl Persistence for RedbFile {
    fn load(&self) -> Result<Vec<Link>> {
        match self.read_document()? {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, links: &[Link]) -> Result<()> {
        let document = encode(links)?;
        self.write_document(&document)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redb"
    }
}

/// Opens the engine selected by `config`
pub fn open_backend(config: &Config) -> Result<Box<dyn Persistence>> {
    let backend: Box<dyn Persistence> = match config.backend {
        Backend::Json => Box::new(JsonFile::open(&config.data_file)?),
        Backend::Redb => Box::new(RedbFile::open(&config.data_file)?),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn sample_links() -> Vec<Link> {
        let now = Utc::now();
        vec![
            Link {
                code: "abc123".to_string(),
                target: "https://example.com".to_string(),
                created_at: now,
                clicks: 0,
                last_clicked: None,
            },
            Link {
                code: "XyZ98765".to_string(),
                target: "http://other.example/path?q=1".to_string(),
                created_at: now,
                clicks: 42,
                last_clicked: Some(now),
            },
        ]
    }

    #[test]
    fn json_file_starts_empty_and_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("links.json");

        let store = JsonFile::open(&path).unwrap();

        assert!(path.exists());
        assert!(store.load().unwrap().is_empty());
        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "links": [] }));
    }

    #[test]
    fn json_file_round_trips_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.json");
        let store = JsonFile::open(&path).unwrap();

        let links = sample_links();
        store.save(&links).unwrap();

        assert_eq!(JsonFile::open(&path).unwrap().load().unwrap(), links);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn json_file_reads_documents_written_by_hand() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.json");
        fs::write(
            &path,
            r#"{"links":[{"code":"abc123","target":"https://example.com","created_at":"2024-05-01T10:00:00.000Z","clicks":3,"last_clicked":null}]}"#,
        )
        .unwrap();

        let links = JsonFile::open(&path).unwrap().load().unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].code, "abc123");
        assert_eq!(links[0].clicks, 3);
        assert_eq!(links[0].last_clicked, None);
    }

    #[test]
    fn corrupt_json_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFile::open(&path).unwrap().load().unwrap_err();
        assert!(matches!(err, crate::error::LinkError::Persistence(_)));
    }

    #[test]
    fn redb_file_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.redb");
        let links = sample_links();

        {
            let store = RedbFile::open(&path).unwrap();
            assert!(store.load().unwrap().is_empty());
            store.save(&links).unwrap();
        }

        assert_eq!(RedbFile::open(&path).unwrap().load().unwrap(), links);
    }
}
