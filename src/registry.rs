#![doc = r#"
Mapping file extensions to container decoders.

Rather than a process-wide table, the registry is a plain value: the
application's composition root builds one, registers the decoders it
wants, and hands it to whatever does the loading. Independent loads
share nothing, so files may be decoded concurrently from separate
registries (or one behind a shared reference) without synchronization.
"#]

use std::{
    collections::HashMap,
    ffi::OsStr,
    path::Path,
};

use crate::{FileError, LoadError, file::MidiFile};

/// A decoder for one container format.
pub type DecodeFn = fn(&[u8]) -> Result<MidiFile, FileError>;

/// An owned table of file-extension-to-decoder mappings.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the standard MIDI file decoder registered under
    /// `.mid` and `.midi`.
    pub fn with_standard_formats() -> Self {
        let mut registry = Self::new();
        registry.register("mid", MidiFile::parse);
        registry.register("midi", MidiFile::parse);
        registry
    }

    /// Register a decoder for an extension (without the leading dot).
    ///
    /// Extensions are matched case-insensitively; registering the same
    /// extension twice replaces the earlier decoder.
    pub fn register(&mut self, extension: &str, decode: DecodeFn) {
        self.decoders.insert(extension.to_ascii_lowercase(), decode);
    }

    /// True if the path's extension has a registered decoder.
    pub fn supports(&self, path: impl AsRef<Path>) -> bool {
        self.decoder_for(path.as_ref()).is_some()
    }

    /// Load and decode the file at `path`.
    ///
    /// The extension is checked before any I/O happens: a path with no
    /// registered decoder fails with [`LoadError::UnsupportedFormat`]
    /// without touching the filesystem.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<MidiFile, LoadError> {
        let path = path.as_ref();
        let decode = self.decoder_for(path).ok_or_else(|| {
            LoadError::UnsupportedFormat(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;
        let bytes = std::fs::read(path)?;
        Ok(decode(&bytes)?)
    }

    fn decoder_for(&self, path: &Path) -> Option<DecodeFn> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)?
            .to_ascii_lowercase();
        self.decoders.get(&extension).copied()
    }
}
