//! Open/closed bookkeeping for dropdown overlays
//!
//! Widgets receive a [`DropdownHandle`] when they are created and pass it back
//! to open or close their overlay. Only one dropdown is open at a time.

/// Opaque reference to a dropdown created in a [`DropdownRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropdownHandle(usize);

#[derive(Debug, Clone)]
struct DropdownEntry {
    label: String,
    open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DropdownRegistry {
    entries: Vec<DropdownEntry>,
}

impl DropdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, closed dropdown. The label is only used for logging.
    pub fn create(&mut self, label: impl Into<String>) -> DropdownHandle {
        self.entries.push(DropdownEntry {
            label: label.into(),
            open: false,
        });
        DropdownHandle(self.entries.len() - 1)
    }

    pub fn open(&mut self, handle: DropdownHandle) {
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            entry.open = idx == handle.0;
        }
        log::debug!("Opened dropdown {}", self.label(handle));
    }

    pub fn close(&mut self, handle: DropdownHandle) {
        if let Some(entry) = self.entries.get_mut(handle.0) {
            if entry.open {
                entry.open = false;
                log::debug!("Closed dropdown {}", entry.label);
            }
        }
    }

    pub fn close_all(&mut self) {
        for entry in &mut self.entries {
            entry.open = false;
        }
    }

    pub fn is_open(&self, handle: DropdownHandle) -> bool {
        self.entries.get(handle.0).is_some_and(|e| e.open)
    }

    /// The currently open dropdown, if any
    pub fn open_handle(&self) -> Option<DropdownHandle> {
        self.entries.iter().position(|e| e.open).map(DropdownHandle)
    }

    pub fn label(&self, handle: DropdownHandle) -> &str {
        self.entries
            .get(handle.0)
            .map(|e| e.label.as_str())
            .unwrap_or("<unknown>")
    }
}
