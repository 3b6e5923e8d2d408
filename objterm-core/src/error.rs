//! Error types for mesh and texture loading

use std::path::PathBuf;

use thiserror::Error;

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Which attribute list an OBJ index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Position,
    TexCoord,
    Normal,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IndexKind::Position => "vertex",
            IndexKind::TexCoord => "texture coordinate",
            IndexKind::Normal => "normal",
        })
    }
}

/// Errors that can occur while loading a mesh or texture
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {kind} index {index} out of range (have {len})")]
    IndexOutOfRange {
        line: usize,
        kind: IndexKind,
        index: i64,
        len: usize,
    },

    #[error("mesh has {vertices} vertices and {triangles} triangles")]
    EmptyMesh { vertices: usize, triangles: usize },

    #[error("cannot decode texture {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
