//! Process-wide rasterizer state
//!
//! A single swash [`ScaleContext`] is shared by every face. It is created on
//! the first font load and lives until the process exits; there is no
//! teardown. Initialization goes through a [`OnceLock`], so concurrent first
//! loads race safely, but rasterization itself is serialized by the mutex and
//! fonts are still meant to be driven from one thread.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use swash::scale::ScaleContext;

static LIBRARY: OnceLock<Library> = OnceLock::new();

/// Shared rasterizer handle
pub struct Library {
    scale_context: Mutex<ScaleContext>,
}

impl Library {
    /// Get the library, initializing it on first use.
    pub fn get() -> &'static Library {
        LIBRARY.get_or_init(|| {
            tracing::debug!("Initializing glyph rasterizer");
            Library {
                scale_context: Mutex::new(ScaleContext::new()),
            }
        })
    }

    /// Whether any font load has initialized the library yet
    pub fn is_initialized() -> bool {
        LIBRARY.get().is_some()
    }

    pub(crate) fn scale_context(&self) -> MutexGuard<'_, ScaleContext> {
        // Scaling state holds only caches, so a panic mid-render leaves it usable
        self.scale_context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
