//! Undoable, serializable editing of an in-memory 3D scene graph.

pub mod command;
pub mod core;
pub mod editor;
pub mod error;
pub mod history;
pub mod scene;
pub mod serialization;
pub mod settings;
pub mod stream;

pub use glam as math;

use tracing_subscriber::EnvFilter;

pub use crate::command::{AddObjectCommand, Command, CommandData, CommandKind, RemoveObjectCommand};
pub use crate::editor::{Editor, EditorEvent};
pub use crate::error::{Error, Result};
pub use crate::history::{History, HistoryData};

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
/// Calling it again is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
