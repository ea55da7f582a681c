/// BYU-style mesh source parser
///
/// Layout: a `<vertex_count> <triangle_count>` header, then one `x y z` line
/// per vertex (optionally followed by `nx ny nz`), then one `i j k` line per
/// triangle with 1-based indices.
use nom::{character::complete::space1, combinator::opt, sequence::preceded, IResult};

use crate::error::LoadError;
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::parse::{
    ensure_finite, parse_index_pair, parse_index_triple, parse_line, parse_vector3, SourceLines,
};

type VertexFields = ((f32, f32, f32), Option<(f32, f32, f32)>);

fn parse_vertex_fields(input: &str) -> IResult<&str, VertexFields> {
    let (input, position) = parse_vector3(input)?;
    let (input, normal) = opt(preceded(space1, parse_vector3))(input)?;
    Ok((input, (position, normal)))
}

/// Parse a mesh, converting triangle indices to zero-based
pub fn parse_byu(input: &str) -> Result<Mesh, LoadError> {
    let mut lines = SourceLines::new(input);

    let (line_no, header) = lines.next_line("`<vertex_count> <triangle_count>` header")?;
    let (vertex_count, triangle_count) =
        parse_line(line_no, header, "`<vertex_count> <triangle_count>`", parse_index_pair)?;
    let vertex_count = vertex_count as usize;
    let triangle_count = triangle_count as usize;
    // counts are untrusted; every entry needs at least one line of input
    let max_entries = lines.remaining_lines();

    let mut vertices = Vec::with_capacity(vertex_count.min(max_entries));
    for i in 0..vertex_count {
        let (line_no, line) = lines.next_line(&format!("vertex {} of {}", i + 1, vertex_count))?;
        let ((x, y, z), normal) = parse_line(line_no, line, "`x y z`", parse_vertex_fields)?;
        ensure_finite(line_no, &[x, y, z])?;

        let mut vertex = Vertex::new(x, y, z);
        if let Some((nx, ny, nz)) = normal {
            ensure_finite(line_no, &[nx, ny, nz])?;
            vertex = vertex.with_normal(nx, ny, nz);
        }
        vertices.push(vertex);
    }

    let mut triangles = Vec::with_capacity(triangle_count.min(max_entries));
    for i in 0..triangle_count {
        let (line_no, line) =
            lines.next_line(&format!("triangle {} of {}", i + 1, triangle_count))?;
        let (a, b, c) = parse_line(line_no, line, "`i j k`", parse_index_triple)?;

        let mut indices = [0usize; 3];
        for (slot, index) in indices.iter_mut().zip([a, b, c]) {
            if index == 0 {
                return Err(LoadError::IndexOutOfRange {
                    triangle: i + 1,
                    index: 0,
                    vertex_count,
                });
            }
            *slot = (index - 1) as usize;
        }
        triangles.push(Triangle { indices });
    }

    Mesh::new(vertices, triangles)
}
