//! SQLite connection wrapper (lightweight for CLI usage) and the batched
//! transaction used by the importers.

use crate::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }
}

/// Explicit transaction committed every `batch_size` recorded rows.
///
/// Rows committed by an earlier batch survive a later failure; only the
/// open tail is rolled back (on `rollback()` or on drop).
pub struct BatchTx<'c> {
    conn: &'c Connection,
    batch_size: usize,
    pending: usize,
    commits: usize,
    open: bool,
}

impl<'c> BatchTx<'c> {
    pub fn begin(conn: &'c Connection, batch_size: usize) -> AppResult<Self> {
        conn.execute_batch("BEGIN IMMEDIATE;")?;
        Ok(Self {
            conn,
            batch_size: batch_size.max(1),
            pending: 0,
            commits: 0,
            open: true,
        })
    }

    pub fn conn(&self) -> &'c Connection {
        self.conn
    }

    /// Count one processed record; commits and reopens when the batch is full.
    pub fn record(&mut self) -> AppResult<()> {
        self.pending += 1;
        if self.pending >= self.batch_size {
            self.conn.execute_batch("COMMIT; BEGIN IMMEDIATE;")?;
            self.commits += 1;
            self.pending = 0;
        }
        Ok(())
    }

    /// Final commit. Returns how many commits the run performed.
    pub fn commit(mut self) -> AppResult<usize> {
        self.conn.execute_batch("COMMIT;")?;
        self.open = false;
        Ok(self.commits + 1)
    }

    pub fn rollback(mut self) -> AppResult<()> {
        self.open = false;
        self.conn.execute_batch("ROLLBACK;")?;
        Ok(())
    }
}

impl Drop for BatchTx<'_> {
    fn drop(&mut self) {
        if self.open {
            let _ = self.conn.execute_batch("ROLLBACK;");
        }
    }
}
