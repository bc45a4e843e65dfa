//! Board persistence on top of a key-value store.
//!
//! A board is stored as four independent slices. Each slice loads on its own;
//! an absent or unreadable slice falls back to its default without touching
//! the others.

use crate::board::{Board, CardSize, Column, Label, LayoutError, validate_columns};
use crate::seed::{self, SeedConfig};
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::views::{self, SavedView};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Prefix of every stored key.
pub const STORAGE_PREFIX: &str = "laneboard_board_";

/// One independently persisted part of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slice {
    Columns,
    Labels,
    Views,
    CardSize,
}

impl Slice {
    pub const ALL: [Slice; 4] = [Slice::Columns, Slice::Labels, Slice::Views, Slice::CardSize];

    /// Name used as the key suffix.
    pub fn key_name(&self) -> &'static str {
        match self {
            Slice::Columns => "columns",
            Slice::Labels => "labels",
            Slice::Views => "views",
            Slice::CardSize => "cardSize",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

/// Storage key of a slice: prefix, project, underscore, slice name.
pub fn storage_key(project: &str, slice: Slice) -> String {
    format!("{}{}_{}", STORAGE_PREFIX, project, slice.key_name())
}

/// Serialize one slice of a board.
///
/// Only custom views are written; card size is its plain token.
pub fn encode_slice(board: &Board, slice: Slice) -> StorageResult<String> {
    let encoded = match slice {
        Slice::Columns => serde_json::to_string(board.columns()),
        Slice::Labels => serde_json::to_string(board.labels()),
        Slice::Views => serde_json::to_string(&views::custom_views(board.views())),
        Slice::CardSize => return Ok(board.card_size.as_str().to_string()),
    };
    encoded.map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Why a slice could not be loaded.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("Slice {0} is not stored")]
    Missing(Slice),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to parse slice {slice}: {message}")]
    Parse { slice: Slice, message: String },
    #[error("Stored columns are invalid: {0}")]
    Invalid(#[from] LayoutError),
}

/// A loaded board plus the slices that fell back to defaults.
#[derive(Debug, Clone)]
pub struct LoadedBoard {
    pub board: Board,
    pub defaulted: Vec<Slice>,
}

/// Reads and writes boards through a [`KeyValueStore`].
pub struct BoardPersistence<S: KeyValueStore> {
    storage: Arc<S>,
    seed: SeedConfig,
}

impl<S: KeyValueStore> BoardPersistence<S> {
    /// Create a persistence layer with the default seed settings.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_seed(storage, SeedConfig::default())
    }

    pub fn with_seed(storage: Arc<S>, seed: SeedConfig) -> Self {
        Self { storage, seed }
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn seed_config(&self) -> &SeedConfig {
        &self.seed
    }

    /// Load a project's board, slice by slice.
    pub fn load(&self, project: &str) -> LoadedBoard {
        let mut defaulted = Vec::new();

        let columns = self.load_columns(project).unwrap_or_else(|e| {
            self.note_fallback(project, Slice::Columns, &e, &mut defaulted);
            seed::default_columns(&self.seed)
        });
        let labels = self.load_labels(project).unwrap_or_else(|e| {
            self.note_fallback(project, Slice::Labels, &e, &mut defaulted);
            seed::default_labels()
        });
        let views = self.load_views(project).unwrap_or_else(|e| {
            self.note_fallback(project, Slice::Views, &e, &mut defaulted);
            views::system_views()
        });
        let card_size = self.load_card_size(project).unwrap_or_else(|e| {
            self.note_fallback(project, Slice::CardSize, &e, &mut defaulted);
            CardSize::default()
        });

        let board = Board::from_parts(project, columns, labels, views, card_size);
        log::info!(
            "Loaded board {} ({} columns, {} tasks, {} defaulted slices)",
            project,
            board.columns().len(),
            board.task_count(),
            defaulted.len()
        );
        LoadedBoard { board, defaulted }
    }

    fn note_fallback(&self, project: &str, slice: Slice, error: &SliceError, defaulted: &mut Vec<Slice>) {
        match error {
            SliceError::Missing(_) => log::debug!("No stored {} for {}, using defaults", slice, project),
            other => log::warn!("Using default {} for {}: {}", slice, project, other),
        }
        defaulted.push(slice);
    }

    fn read_slice(&self, project: &str, slice: Slice) -> Result<String, SliceError> {
        self.storage
            .get(&storage_key(project, slice))?
            .ok_or(SliceError::Missing(slice))
    }

    fn parse_slice<T: serde::de::DeserializeOwned>(&self, project: &str, slice: Slice) -> Result<T, SliceError> {
        let raw = self.read_slice(project, slice)?;
        serde_json::from_str(&raw).map_err(|e| SliceError::Parse {
            slice,
            message: e.to_string(),
        })
    }

    /// Load the stored columns. A layout that breaks the board's structure
    /// counts as unreadable.
    pub fn load_columns(&self, project: &str) -> Result<Vec<Column>, SliceError> {
        let columns: Vec<Column> = self.parse_slice(project, Slice::Columns)?;
        validate_columns(&columns)?;
        Ok(columns)
    }

    pub fn load_labels(&self, project: &str) -> Result<Vec<Label>, SliceError> {
        self.parse_slice(project, Slice::Labels)
    }

    /// Load the stored custom views, merged behind the system views.
    pub fn load_views(&self, project: &str) -> Result<Vec<SavedView>, SliceError> {
        let stored: Vec<SavedView> = self.parse_slice(project, Slice::Views)?;
        Ok(views::merge_views(stored))
    }

    /// Card size is a plain token; a JSON-quoted token is accepted too.
    pub fn load_card_size(&self, project: &str) -> Result<CardSize, SliceError> {
        let raw = self.read_slice(project, Slice::CardSize)?;
        raw.trim()
            .trim_matches('"')
            .parse()
            .map_err(|message| SliceError::Parse {
                slice: Slice::CardSize,
                message,
            })
    }

    /// Write one slice of a board.
    pub fn write_slice(&self, board: &Board, slice: Slice) -> StorageResult<()> {
        let value = encode_slice(board, slice)?;
        self.storage.set(&storage_key(&board.project, slice), &value)
    }

    /// Write one slice, logging instead of returning failures.
    pub fn persist(&self, board: &Board, slice: Slice) {
        match self.write_slice(board, slice) {
            Ok(()) => log::debug!("Saved {} for {}", slice, board.project),
            Err(e) => log::warn!("Failed to save {} for {}: {}", slice, board.project, e),
        }
    }

    /// Write every slice of a board.
    pub fn save_all(&self, board: &Board) -> StorageResult<()> {
        for slice in Slice::ALL {
            self.write_slice(board, slice)?;
        }
        log::info!("Saved board {}", board.project);
        Ok(())
    }

    /// Remove every stored slice of a project.
    pub fn clear(&self, project: &str) -> StorageResult<()> {
        for slice in Slice::ALL {
            self.storage.remove(&storage_key(project, slice))?;
        }
        Ok(())
    }

    /// Projects with at least one stored slice, sorted by name.
    pub fn projects(&self) -> StorageResult<Vec<String>> {
        let projects: BTreeSet<String> = self
            .storage
            .keys()?
            .iter()
            .filter_map(|key| key.strip_prefix(STORAGE_PREFIX))
            .filter_map(|rest| {
                Slice::ALL.iter().find_map(|slice| {
                    rest.strip_suffix(slice.key_name())
                        .and_then(|p| p.strip_suffix('_'))
                        .filter(|p| !p.is_empty())
                })
            })
            .map(str::to_string)
            .collect();
        Ok(projects.into_iter().collect())
    }
}

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::LocalStorage>> {
    Ok(Arc::new(crate::storage::LocalStorage::new()?))
}

/// Convenience type alias for platform-specific storage.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = crate::storage::LocalStorage;
