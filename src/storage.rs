use crate::model::Dataset;
use anyhow::Context;
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Store {
    /// Charge l'état complet depuis un support.
    fn load(&self) -> anyhow::Result<Dataset>;
    /// Sauvegarde de manière atomique.
    fn save(&self, dataset: &Dataset) -> anyhow::Result<()>;
}

/// Exécute `f` sur une copie de travail et ne sauvegarde que si `f` réussit :
/// une erreur laisse l'état persisté intact.
pub fn transaction<S, T, E, F>(store: &S, f: F) -> Result<T, E>
where
    S: Store + ?Sized,
    E: From<anyhow::Error>,
    F: FnOnce(&mut Dataset) -> Result<T, E>,
{
    let mut working = store.load()?;
    let out = f(&mut working)?;
    store.save(&working)?;
    Ok(out)
}

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonStore {
    fn load(&self) -> anyhow::Result<Dataset> {
        if !self.path.exists() {
            return Ok(Dataset::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let dataset: Dataset = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(dataset)
    }

    fn save(&self, dataset: &Dataset) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(dataset)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Stockage en mémoire (tests, intégrations embarquées).
#[derive(Debug, Default)]
pub struct MemoryStore {
    dataset: Mutex<Dataset>,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Mutex::new(dataset),
        }
    }

    pub fn snapshot(&self) -> Dataset {
        self.dataset.lock().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> anyhow::Result<Dataset> {
        Ok(self.dataset.lock().clone())
    }

    fn save(&self, dataset: &Dataset) -> anyhow::Result<()> {
        *self.dataset.lock() = dataset.clone();
        Ok(())
    }
}
