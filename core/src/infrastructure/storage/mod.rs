// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage Infrastructure Module
//!
//! Selects the concrete `DavFileSystem` the engine serves from:
//! - `MemFs` for the default in-memory tree
//! - `LocalFs` rooted at `--dir` for a persistent tree
//!
//! With `--no-save` the chosen store is wrapped exactly once in [`NoSaveFs`].

pub mod nosave;

pub use nosave::{NoSaveFile, NoSaveFs};

use crate::domain::config::{ConfigError, StoreConfig, StoreKind};
use dav_server::fs::DavFileSystem;
use dav_server::localfs::LocalFs;
use dav_server::memfs::MemFs;
use tracing::info;

/// Factory function to create the WebDAV filesystem from configuration
///
/// Creates the backing directory (and its parents) for [`StoreKind::Directory`];
/// failure to do so is fatal at startup.
pub fn create_filesystem(config: &StoreConfig) -> Result<Box<dyn DavFileSystem>, ConfigError> {
    let store: Box<dyn DavFileSystem> = match &config.kind {
        StoreKind::Memory => {
            info!("Serving files from memory");
            MemFs::new()
        }
        StoreKind::Directory(path) => {
            std::fs::create_dir_all(path).map_err(|source| ConfigError::CreateDirectory {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Serving files from directory");
            LocalFs::new(path, false, false, false)
        }
    };

    if config.no_save {
        info!("File contents will not be saved; writes are replaced with zeros");
        let wrapped: Box<dyn DavFileSystem> = NoSaveFs::new(store);
        return Ok(wrapped);
    }

    Ok(store)
}
