//! Wavefront OBJ loading.
//!
//! Supports `v` (with optional trailing `r g b` vertex colors), `vt` and `f`
//! records. Faces with more than three corners are fan-triangulated.
//! Normals and every other record type are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::point2d::Point2D;
use crate::point3d::Point3D;
use crate::point4d::Point4D;
use crate::vertex::Vertex;

#[derive(Debug)]
struct Face {
    v_indices: Vec<usize>,
    vt_indices: Vec<Option<usize>>,
}

pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let file = File::open(path.as_ref())?;
    let mesh = parse_mesh(BufReader::new(file))?;
    info!(
        "loaded {} ({} vertices, {} triangles)",
        path.as_ref().display(),
        mesh.vertices().len(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Builds a mesh whose vertex pool is indexed by both OBJ position and
/// texture-coordinate numbers: pool entry `i` carries position `i` and uv `i`
/// (whichever exist). Triangle position and color indices refer to `v`
/// records, texture indices to `vt` records. OBJ `v` runs bottom-up, so it is
/// flipped to the top-left texture origin.
pub fn parse_mesh<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut positions: Vec<Point3D> = Vec::new();
    let mut colors: Vec<Point3D> = Vec::new();
    let mut texcoords: Vec<Point2D> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue
        }

        match tokens[0] {
            "v" => {
                let values = parse_floats(&tokens[1..], line_no)?;
                match values.len() {
                    3 | 4 => colors.push(Point3D::new(1.0, 1.0, 1.0)),
                    6 => colors.push(Point3D::new(values[3], values[4], values[5])),
                    n => return Err(obj_error(line_no, format!("expected 3, 4 or 6 values for v, found {n}"))),
                }
                positions.push(Point3D::new(values[0], values[1], values[2]));
            }
            "vt" => {
                let values = parse_floats(&tokens[1..], line_no)?;
                if values.len() < 2 {
                    return Err(obj_error(line_no, "expected at least 2 values for vt".to_string()));
                }
                texcoords.push(Point2D::new(values[0], 1.0 - values[1]));
            }
            "f" => {
                if tokens.len() < 4 {
                    return Err(obj_error(line_no, "face needs at least 3 vertices".to_string()));
                }
                let mut face = Face { v_indices: Vec::new(), vt_indices: Vec::new() };
                for part in &tokens[1..] {
                    let (v_index, vt_index) =
                        parse_face_vertex(part, positions.len(), texcoords.len(), line_no)?;
                    face.v_indices.push(v_index);
                    face.vt_indices.push(vt_index);
                }
                faces.push(face);
            }
            _ => {}
        }
    }

    let pool_size = positions.len().max(texcoords.len());
    let vertices: Vec<Vertex> = (0..pool_size)
        .map(|i| Vertex {
            position: positions.get(i).map_or(Point4D::default(), |p| Point4D::point(p.x, p.y, p.z)),
            color: colors.get(i).copied().unwrap_or_default(),
            texcrd: texcoords.get(i).copied().unwrap_or_default(),
        })
        .collect();

    let (tvi, tti) = fan_triangulate_faces(&faces);
    Mesh::new(vertices, tvi.clone(), tvi, tti)
}

fn parse_floats(tokens: &[&str], line_no: usize) -> Result<Vec<f32>> {
    tokens
        .iter()
        .map(|t| t.parse::<f32>().map_err(|e| obj_error(line_no, format!("invalid number {t:?}: {e}"))))
        .collect()
}

/// Resolves a 1-based (or negative, relative) OBJ index against `count`
/// records read so far.
fn resolve_index(raw: &str, count: usize, line_no: usize) -> Result<usize> {
    let index: i64 = raw
        .parse()
        .map_err(|e| obj_error(line_no, format!("invalid index {raw:?}: {e}")))?;
    let resolved = if index < 0 { count as i64 + index } else { index - 1 };
    if resolved < 0 || resolved >= count as i64 {
        return Err(obj_error(line_no, format!("index {index} out of range ({count} records)")));
    }
    Ok(resolved as usize)
}

fn parse_face_vertex(s: &str, v_count: usize, vt_count: usize, line_no: usize) -> Result<(usize, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();
    let v = resolve_index(parts[0], v_count, line_no)?;
    let vt = match parts.get(1) {
        Some(&"") | None => None,
        Some(s) => Some(resolve_index(s, vt_count, line_no)?),
    };
    Ok((v, vt))
}

/// Fan-triangulates every face around its first corner. Corners without a
/// texture index fall back to the position index.
fn fan_triangulate_faces(faces: &[Face]) -> (Vec<[usize; 3]>, Vec<[usize; 3]>) {
    let mut tvi: Vec<[usize; 3]> = Vec::new();
    let mut tti: Vec<[usize; 3]> = Vec::new();

    for face in faces {
        let v_indices = &face.v_indices;
        let vt = |k: usize| face.vt_indices[k].unwrap_or(v_indices[k]);

        for i in 1..v_indices.len() - 1 {
            tvi.push([v_indices[0], v_indices[i], v_indices[i + 1]]);
            tti.push([vt(0), vt(i), vt(i + 1)]);
        }
    }

    (tvi, tti)
}

fn obj_error(line: usize, message: String) -> Error {
    Error::Obj { line, message }
}
