// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of orchestration operations

use crate::MaterializedState;
use cv_core::Operation;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt WAL entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        source: serde_json::Error,
    },
}

/// Append-only log; one JSON entry per line
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create a WAL at the given path, creating parent directories
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        // Drop a torn final line so the next entry starts on a clean line
        let mut content = Vec::new();
        File::open(path)?.read_to_end(&mut content)?;
        if content.last().is_some_and(|b| *b != b'\n') {
            let keep = content
                .iter()
                .rposition(|b| *b == b'\n')
                .map(|pos| pos + 1)
                .unwrap_or(0);
            file.set_len(keep as u64)?;
        }

        let sequence = Self::read_entries(path)?
            .last()
            .map(|entry| entry.seq)
            .unwrap_or(0);

        Ok(Self { file, sequence })
    }

    /// Open the WAL and rebuild the state it describes
    pub fn load(path: &Path) -> Result<(Self, MaterializedState), WalError> {
        let wal = Self::open(path)?;
        let ops = Self::replay(path)?;
        Ok((wal, MaterializedState::from_operations(&ops)))
    }

    /// Append an operation and sync it to disk
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        let entry = WalEntry {
            seq: self.sequence + 1,
            op: op.clone(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_data()?;
        self.sequence = entry.seq;
        Ok(self.sequence)
    }

    /// Sequence number of the last appended entry
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replay all operations from the log
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        Ok(Self::read_entries(path)?
            .into_iter()
            .map(|entry| entry.op)
            .collect())
    }

    /// Parse every entry. A torn final line (crash mid-append) is dropped;
    /// a malformed line anywhere else is corruption.
    fn read_entries(path: &Path) -> Result<Vec<WalEntry>, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<String> = BufReader::new(file)
            .lines()
            .collect::<Result<_, _>>()?;
        let last = lines.len();

        let mut entries = Vec::with_capacity(last);
        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(_) if index + 1 == last => break,
                Err(source) => {
                    return Err(WalError::Corrupt {
                        line: index + 1,
                        source,
                    })
                }
            }
        }
        Ok(entries)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct WalEntry {
    seq: u64,
    op: Operation,
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
