use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::{FamilyConfig, IncomeRecord, Wish};
use crate::storage::paths::{app_data_dir, ensure_dir};

use super::{Result, StorageBackend};

const RECORDS_FILE: &str = "income_records.json";
const WISHES_FILE: &str = "wishes.json";
const GOAL_FILE: &str = "yearly_goal.json";
const FAMILY_FILE: &str = "family_config.json";
const TMP_SUFFIX: &str = "tmp";

/// File-per-key JSON backend under the app data directory.
///
/// Each key writes through a temp file followed by a rename, so a failed
/// write never clobbers the previous contents.
#[derive(Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn load_key<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.key_path(file);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save_key<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.key_path(file);
        let json = serde_json::to_string_pretty(value)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key = file, "persisted storage key");
        Ok(())
    }
}

impl StorageBackend for JsonStore {
    fn load_records(&self) -> Result<Option<Vec<IncomeRecord>>> {
        self.load_key(RECORDS_FILE)
    }

    fn save_records(&self, records: &[IncomeRecord]) -> Result<()> {
        self.save_key(RECORDS_FILE, &records)
    }

    fn load_wishes(&self) -> Result<Option<Vec<Wish>>> {
        self.load_key(WISHES_FILE)
    }

    fn save_wishes(&self, wishes: &[Wish]) -> Result<()> {
        self.save_key(WISHES_FILE, &wishes)
    }

    fn load_goal(&self) -> Result<Option<f64>> {
        self.load_key(GOAL_FILE)
    }

    fn save_goal(&self, goal: f64) -> Result<()> {
        self.save_key(GOAL_FILE, &goal)
    }

    fn load_family(&self) -> Result<Option<FamilyConfig>> {
        self.load_key(FAMILY_FILE)
    }

    fn save_family(&self, family: &FamilyConfig) -> Result<()> {
        self.save_key(FAMILY_FILE, family)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
