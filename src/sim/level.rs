//! Level layouts
//!
//! A level is a block of text rows: `#` obstacle, `@` loot, anything else
//! empty. Sources hand back rows; turning them into cells is the grid's job.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::LevelError;

/// Text rows of one level, top to bottom
pub type LevelRows = Vec<String>;

/// Supplies level layouts by 1-based level number
pub trait LevelSource {
    fn load(&self, level: u32) -> Result<LevelRows, LevelError>;
}

/// Split level text into rows, dropping trailing whitespace and trailing blank lines
pub fn parse_level(text: &str) -> LevelRows {
    let mut rows: LevelRows = text.lines().map(|l| l.trim_end().to_string()).collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    rows
}

/// Reads `level{n}.txt` files from a directory
#[derive(Debug, Clone)]
pub struct LevelDir {
    root: PathBuf,
}

impl LevelDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, level: u32) -> PathBuf {
        self.root.join(format!("level{level}.txt"))
    }
}

impl LevelSource for LevelDir {
    fn load(&self, level: u32) -> Result<LevelRows, LevelError> {
        let path = self.path_for(level);
        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LevelError::NotFound {
                level,
                path: Some(path.clone()),
            },
            _ => LevelError::Unreadable {
                level,
                path: path.clone(),
                message: e.to_string(),
            },
        })?;
        let rows = parse_level(&text);
        if rows.is_empty() {
            return Err(LevelError::Empty { level });
        }
        log::debug!("Read level {} from {} ({} rows)", level, path.display(), rows.len());
        Ok(rows)
    }
}

/// In-memory layouts; index 0 is level 1
#[derive(Debug, Clone, Default)]
pub struct StaticLevels {
    levels: Vec<LevelRows>,
}

impl StaticLevels {
    pub fn new(levels: Vec<LevelRows>) -> Self {
        Self { levels }
    }

    /// Build from level texts
    pub fn from_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| parse_level(t)).collect())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelSource for StaticLevels {
    fn load(&self, level: u32) -> Result<LevelRows, LevelError> {
        let rows = level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .ok_or(LevelError::NotFound { level, path: None })?;
        if rows.is_empty() {
            return Err(LevelError::Empty { level });
        }
        Ok(rows.clone())
    }
}
