use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_CHECKPOINT_FILE;
use crate::error::{Error, Result};
use crate::search::{SearchRequest, StructureTarget};

const MAGIC_HEADER: &[u8; 4] = b"TSCK";
const VERSION: u32 = 1;

/// Where an interrupted search should pick up again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCheckpoint {
    pub next_seed: u64,
    pub end_seed: u64,
    pub worker_count: usize,
    pub targets: Vec<StructureTarget>,
}

impl SearchCheckpoint {
    pub fn from_request(request: &SearchRequest, next_seed: u64) -> Self {
        SearchCheckpoint {
            next_seed,
            end_seed: request.end_seed,
            worker_count: request.worker_count,
            targets: request.targets.clone(),
        }
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(self.targets.clone())
            .with_workers(self.worker_count)
            .with_start_seed(self.next_seed)
            .with_end_seed(self.end_seed)
    }
}

/// Per-user data directory location, when the platform provides one
pub fn default_checkpoint_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "templeseed")
        .map(|dirs| dirs.data_dir().join(DEFAULT_CHECKPOINT_FILE))
}

pub fn save_checkpoint<P: AsRef<Path>>(path: P, checkpoint: &SearchCheckpoint) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(MAGIC_HEADER)?;
    writer.write_all(&VERSION.to_le_bytes())?;

    let data = bincode::serialize(checkpoint)?;
    writer.write_all(&(data.len() as u64).to_le_bytes())?;
    writer.write_all(&data)?;
    writer.flush()?;

    tracing::debug!("Checkpoint saved at seed {} to {}", checkpoint.next_seed, path.display());
    Ok(())
}

pub fn load_checkpoint<P: AsRef<Path>>(path: P) -> Result<SearchCheckpoint> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC_HEADER {
        return Err(Error::Checkpoint("not a checkpoint file".to_string()));
    }

    let mut version_bytes = [0u8; 4];
    reader.read_exact(&mut version_bytes)?;
    let version = u32::from_le_bytes(version_bytes);
    if version != VERSION {
        return Err(Error::Checkpoint(format!("unsupported version {}", version)));
    }

    let mut size_bytes = [0u8; 8];
    reader.read_exact(&mut size_bytes)?;
    let size = u64::from_le_bytes(size_bytes) as usize;

    let mut data = vec![0u8; size];
    reader.read_exact(&mut data)?;

    Ok(bincode::deserialize(&data)?)
}
