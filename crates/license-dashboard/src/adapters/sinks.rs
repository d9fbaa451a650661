//! Render sinks.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::ports::RenderSink;
use crate::render::Slot;

/// Keeps the latest markup per slot in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    slots: Mutex<HashMap<Slot, String>>,
    history: Mutex<Vec<Slot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest markup written to `slot`.
    pub fn get(&self, slot: Slot) -> Option<String> {
        self.slots.lock().get(&slot).cloned()
    }

    /// Slots in write order, repeats included.
    pub fn history(&self) -> Vec<Slot> {
        self.history.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.history.lock().len()
    }
}

impl RenderSink for MemorySink {
    fn write(&self, slot: Slot, markup: &str) -> io::Result<()> {
        self.slots.lock().insert(slot, markup.to_string());
        self.history.lock().push(slot);
        Ok(())
    }
}

/// Writes each slot to `<dir>/<slot>.html`, replacing the previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.html", slot.name()))
    }
}

impl RenderSink for FileSink {
    fn write(&self, slot: Slot, markup: &str) -> io::Result<()> {
        // Write then rename so readers never see a half-written file.
        let target = self.path_for(slot);
        let tmp = target.with_extension("html.tmp");
        fs::write(&tmp, markup)?;
        fs::rename(&tmp, &target)
    }
}

/// Prints `<!-- slot -->` followed by the markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl RenderSink for StdoutSink {
    fn write(&self, slot: Slot, markup: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "<!-- {} -->", slot)?;
        writeln!(out, "{}", markup)
    }
}
