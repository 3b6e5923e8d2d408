/// Wavefront OBJ parser
use std::fs;
use std::path::Path;

use log::{info, trace};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::many1,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{IndexKind, LoadError, LoadResult};
use crate::geometry::{Mesh, TexCoord, Triangle};
use crate::mtl;
use crate::transform::{Vec3, VectorExt};

/// Attribute lists and triangles read from an OBJ source, before validation
#[derive(Debug, Clone, Default)]
pub struct ObjDocument {
    pub positions: Vec<Vec3>,
    pub tex_coords: Vec<TexCoord>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
    /// Last `mtllib` statement, if any
    pub material_lib: Option<String>,
}

impl ObjDocument {
    /// Convert into a mesh, rejecting sources without geometry
    pub fn into_mesh(self) -> LoadResult<Mesh> {
        if self.positions.is_empty() || self.triangles.is_empty() {
            return Err(LoadError::EmptyMesh {
                vertices: self.positions.len(),
                triangles: self.triangles.len(),
            });
        }
        Ok(Mesh {
            positions: self.positions,
            normals: self.normals,
            tex_coords: self.tex_coords,
            triangles: self.triangles,
            ..Mesh::default()
        })
    }
}

/// One `f` corner as written: 1-based or negative relative indices
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    vertex: i64,
    tex_coord: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedCorner {
    vertex: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

/// Load an OBJ file, its material library and diffuse texture.
///
/// A missing or undecodable texture leaves the mesh untextured.
pub fn load_obj(path: impl AsRef<Path>) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_obj(&source)?;
    let material_lib = document.material_lib.clone();
    let mut mesh = document.into_mesh()?;
    mesh.texture = mtl::find_diffuse_texture(path, material_lib.as_deref());

    info!(
        "loaded {}: {} vertices, {} uvs, {} normals, {} triangles",
        path.display(),
        mesh.positions.len(),
        mesh.tex_coords.len(),
        mesh.normals.len(),
        mesh.triangles.len()
    );
    if mesh.is_textured() {
        info!(
            "texture {}x{}",
            mesh.texture.width(),
            mesh.texture.height()
        );
    }

    Ok(mesh)
}

/// Parse OBJ text. Faces with more than three corners are fan-triangulated.
pub fn parse_obj(source: &str) -> LoadResult<ObjDocument> {
    let mut doc = ObjDocument::default();

    for (number, line) in source.lines().enumerate() {
        let line_no = number + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (rest, kw) = keyword(line).map_err(|_| malformed(line_no, line))?;
        match kw {
            "v" => {
                let (_, p) = vector3(rest).map_err(|_| malformed(line_no, kw))?;
                doc.positions.push(p);
            }
            "vt" => {
                let (_, t) = tex_coord(rest).map_err(|_| malformed(line_no, kw))?;
                doc.tex_coords.push(t);
            }
            "vn" => {
                let (_, n) = vector3(rest).map_err(|_| malformed(line_no, kw))?;
                doc.normals.push(n.normalized_or_zero());
            }
            "mtllib" => {
                if let Some(name) = rest.split_whitespace().next() {
                    doc.material_lib = Some(name.to_string());
                }
            }
            "f" => {
                let (_, corners) = face(rest).map_err(|_| malformed(line_no, kw))?;
                let resolved = corners
                    .iter()
                    .map(|c| resolve_corner(c, &doc, line_no))
                    .collect::<LoadResult<Vec<_>>>()?;
                push_fan(&mut doc.triangles, &resolved);
            }
            other => trace!("line {}: skipping `{}` statement", line_no, other),
        }
    }

    Ok(doc)
}

fn malformed(line: usize, what: &str) -> LoadError {
    LoadError::Parse {
        line,
        message: format!("malformed `{}` statement", what),
    }
}

/// Triangulate a polygon as a fan around its first corner
fn push_fan(triangles: &mut Vec<Triangle>, corners: &[ResolvedCorner]) {
    let Some(first) = corners.first() else {
        return;
    };
    for pair in corners[1..].windows(2) {
        let [a, b, c] = [first, &pair[0], &pair[1]];
        triangles.push(Triangle {
            vertices: [a.vertex, b.vertex, c.vertex],
            normals: [a.normal, b.normal, c.normal],
            tex_coords: [a.tex_coord, b.tex_coord, c.tex_coord],
        });
    }
}

fn resolve_corner(corner: &Corner, doc: &ObjDocument, line: usize) -> LoadResult<ResolvedCorner> {
    let vertex = resolve_index(corner.vertex, doc.positions.len(), IndexKind::Position, line)?;
    let tex_coord = corner
        .tex_coord
        .map(|i| resolve_index(i, doc.tex_coords.len(), IndexKind::TexCoord, line))
        .transpose()?;
    let normal = corner
        .normal
        .map(|i| resolve_index(i, doc.normals.len(), IndexKind::Normal, line))
        .transpose()?;
    Ok(ResolvedCorner {
        vertex,
        tex_coord,
        normal,
    })
}

/// 1-based indices count from the start, negative ones from the end.
fn resolve_index(index: i64, len: usize, kind: IndexKind, line: usize) -> LoadResult<usize> {
    let resolved = match index {
        i if i > 0 => Some(i as usize - 1),
        i if i < 0 => len.checked_sub(i.unsigned_abs() as usize),
        _ => None,
    };
    resolved
        .filter(|&i| i < len)
        .ok_or_else(|| LoadError::IndexOutOfRange {
            line,
            kind,
            index,
            len,
        })
}

/// Leading statement keyword
pub(crate) fn keyword(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    preceded(space1, double)(input)
}

/// Three numbers; anything after them (such as a `w` weight) is ignored
fn vector3(input: &str) -> IResult<&str, Vec3> {
    map(tuple((number, number, number)), |(x, y, z)| Vec3::new(x, y, z))(input)
}

/// `u [v [w]]`; a missing `v` reads as 0
fn tex_coord(input: &str) -> IResult<&str, TexCoord> {
    map(tuple((number, opt(number))), |(u, v)| {
        TexCoord::new(u, v.unwrap_or(0.0))
    })(input)
}

/// `v`, `v/t`, `v//n` or `v/t/n`
fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, vertex) = preceded(space1, integer)(input)?;
    let (input, slots) = opt(preceded(
        char('/'),
        tuple((opt(integer), opt(preceded(char('/'), integer)))),
    ))(input)?;
    let (tex_coord, normal) = slots.unwrap_or((None, None));
    Ok((
        input,
        Corner {
            vertex,
            tex_coord,
            normal,
        },
    ))
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    all_consuming(terminated(many1(corner), space0))(input)
}
