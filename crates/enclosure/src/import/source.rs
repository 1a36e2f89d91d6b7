//! Mesh sources for component import

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{EnclosureError, Result};
use crate::geometry::ImportedMesh;

/// Resolves an asset path to a triangulated solid.
pub trait MeshSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<ImportedMesh>;
}

/// Reads binary or ASCII STL files below a root directory.
#[derive(Debug, Clone)]
pub struct StlDirectory {
    root: PathBuf,
}

impl StlDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MeshSource for StlDirectory {
    fn load(&self, path: &Path) -> Result<ImportedMesh> {
        let full = self.root.join(path);
        let file = File::open(&full).map_err(|e| EnclosureError::import(&full, e.to_string()))?;
        let mut reader = BufReader::new(file);
        read_stl(&full, &mut reader)
    }
}

/// Parse an STL stream; degenerate triangles are dropped.
pub fn read_stl<R: Read + Seek>(path: &Path, reader: &mut R) -> Result<ImportedMesh> {
    let stl = stl_io::read_stl(reader).map_err(|e| EnclosureError::import(path, e.to_string()))?;

    tracing::debug!(
        "STL {} contains {} vertices, {} triangles",
        path.display(),
        stl.vertices.len(),
        stl.faces.len()
    );

    let positions: Vec<[f32; 3]> = stl.vertices.iter().map(|v| v.0).collect();
    let triangles: Vec<[u32; 3]> = stl
        .faces
        .iter()
        .map(|face| {
            [
                face.vertices[0] as u32,
                face.vertices[1] as u32,
                face.vertices[2] as u32,
            ]
        })
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    let mesh = ImportedMesh {
        positions,
        triangles,
    };
    if mesh.is_empty() {
        return Err(EnclosureError::import(path, "file contains no triangles"));
    }
    Ok(mesh)
}

/// In-memory sources keyed by asset path, used by tests and the headless harness.
#[derive(Debug, Clone, Default)]
pub struct MemoryMeshSource {
    meshes: HashMap<PathBuf, ImportedMesh>,
    stl_bytes: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryMeshSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, mesh: ImportedMesh) {
        self.meshes.insert(path.into(), mesh);
    }

    /// Register raw STL bytes, parsed on load.
    pub fn insert_stl(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.stl_bytes.insert(path.into(), bytes);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, mesh: ImportedMesh) -> Self {
        self.insert(path, mesh);
        self
    }
}

impl MeshSource for MemoryMeshSource {
    fn load(&self, path: &Path) -> Result<ImportedMesh> {
        if let Some(mesh) = self.meshes.get(path) {
            return Ok(mesh.clone());
        }
        if let Some(bytes) = self.stl_bytes.get(path) {
            return read_stl(path, &mut Cursor::new(bytes.as_slice()));
        }
        Err(EnclosureError::import(path, "asset not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TETRA: &str = "solid tetra
facet normal 0 0 -1
 outer loop
  vertex 0 0 0
  vertex 0 1 0
  vertex 1 0 0
 endloop
endfacet
facet normal 0 -1 0
 outer loop
  vertex 0 0 0
  vertex 1 0 0
  vertex 0 0 1
 endloop
endfacet
facet normal -1 0 0
 outer loop
  vertex 0 0 0
  vertex 0 0 1
  vertex 0 1 0
 endloop
endfacet
facet normal 1 1 1
 outer loop
  vertex 1 0 0
  vertex 0 1 0
  vertex 0 0 1
 endloop
endfacet
endsolid tetra
";

    #[test]
    fn test_read_ascii_stl() {
        let mesh = read_stl(Path::new("tetra.stl"), &mut Cursor::new(ASCII_TETRA.as_bytes())).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.positions.len(), 4);
    }

    #[test]
    fn test_garbage_is_import_error() {
        let err = read_stl(Path::new("bad.stl"), &mut Cursor::new(b"not an stl".as_slice())).unwrap_err();
        assert!(matches!(err, EnclosureError::Import { .. }));
    }

    #[test]
    fn test_memory_source_missing_asset() {
        let source = MemoryMeshSource::new();
        let err = source.load(Path::new("Arduino_Uno/arduino.stl")).unwrap_err();
        assert!(err.to_string().contains("asset not found"));
    }

    #[test]
    fn test_memory_source_parses_stl_bytes() {
        let mut source = MemoryMeshSource::new();
        source.insert_stl("tetra.stl", ASCII_TETRA.as_bytes().to_vec());
        let mesh = source.load(Path::new("tetra.stl")).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_directory_missing_file() {
        let source = StlDirectory::new(std::env::temp_dir().join("no-such-enclosure-assets"));
        assert!(matches!(
            source.load(Path::new("x.stl")),
            Err(EnclosureError::Import { .. })
        ));
    }
}
