use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Front-end assets served for any path no route matches
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base directory; relative `upload_dir` and `metadata_file` resolve against it
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_metadata_file")]
    pub metadata_file: PathBuf,

    /// URL prefix under which uploaded images are served
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// Largest accepted request body in bytes (default: 10 MB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_metadata_file() -> PathBuf {
    PathBuf::from("metadata.json")
}
fn default_public_prefix() -> String {
    "/uploads".to_string()
}
fn default_max_upload_bytes() -> usize {
    10_000_000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            upload_dir: default_upload_dir(),
            metadata_file: default_metadata_file(),
            public_prefix: default_public_prefix(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl StorageConfig {
    /// Storage rooted at `data_dir` with every other setting at its default.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Directory holding uploaded images.
    pub fn upload_path(&self) -> PathBuf {
        self.data_dir.join(&self.upload_dir)
    }

    /// Location of the durable metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }
}
