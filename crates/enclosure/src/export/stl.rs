//! STL encoding of composed solids

use std::io::Write;

use shared::StlFormat;

use crate::build::{Solid, Triangle};
use crate::error::Result;

/// Binary STL header size in bytes
pub const BINARY_HEADER_LEN: usize = 80;
/// Bytes per triangle record in binary STL
pub const BINARY_TRIANGLE_LEN: usize = 50;

/// Encode a solid in the requested STL flavour.
pub fn encode_solid(solid: &Solid, format: StlFormat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        StlFormat::Binary => write_binary(&mut out, solid.triangles())?,
        StlFormat::Ascii => write_ascii(&mut out, solid.label(), solid.triangles())?,
    }
    tracing::debug!(
        "Encoded '{}' as {:?} STL: {} triangles, {} bytes",
        solid.label(),
        format,
        solid.triangle_count(),
        out.len()
    );
    Ok(out)
}

pub fn write_binary<W: Write>(writer: &mut W, triangles: &[Triangle]) -> Result<()> {
    let records: Vec<stl_io::Triangle> = triangles
        .iter()
        .map(|t| stl_io::Triangle {
            normal: stl_io::Normal::new(t.normal),
            vertices: t.vertices.map(stl_io::Vertex::new),
        })
        .collect();
    stl_io::write_stl(writer, records.iter())?;
    Ok(())
}

pub fn write_ascii<W: Write>(writer: &mut W, name: &str, triangles: &[Triangle]) -> Result<()> {
    writeln!(writer, "solid {name}")?;
    for t in triangles {
        let [nx, ny, nz] = t.normal;
        writeln!(writer, "  facet normal {nx:e} {ny:e} {nz:e}")?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in t.vertices {
            writeln!(writer, "      vertex {x:e} {y:e} {z:e}")?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}
