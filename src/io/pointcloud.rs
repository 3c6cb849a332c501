// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Point cloud reading.
//!
//! Custom parsers for the two supported formats, with no external format
//! dependencies:
//!
//! - **PLY**: `ascii 1.0` and `binary_little_endian 1.0`. Scalar vertex
//!   properties are supported; `x`/`y`/`z` are required, `red`/`green`/`blue`
//!   and `nx`/`ny`/`nz` are recognized when present.
//! - **PCD**: v0.7-style headers with `ascii` and `binary` data sections.
//!   `x`/`y`/`z` are extracted by field name, packed `rgb` color and
//!   `normal_x`/`normal_y`/`normal_z` are recognized. `binary_compressed`
//!   payloads are not supported.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use nalgebra::{Point3, Vector3};

use crate::core::{FrameError, Result};
use crate::naming::extension_from_path;

/// A point cloud with optional per-point color and normal attributes.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    /// Point coordinates
    pub points: Vec<Point3<f32>>,
    /// Per-point RGB color, same length as `points` when present
    pub colors: Option<Vec<[u8; 3]>>,
    /// Per-point normals, same length as `points` when present
    pub normals: Option<Vec<Vector3<f32>>>,
}

impl PointCloud {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the cloud has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when per-point colors are present.
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// True when per-point normals are present.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }
}

/// Read a point cloud, dispatching by file extension (`ply` or `pcd`).
pub fn read_pointcloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    let ext = extension_from_path(path)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "ply" => read_ply(path),
        "pcd" => read_pcd(path),
        _ => Err(FrameError::unsupported_extension(ext)),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| FrameError::read(path.display().to_string(), e.to_string()))
}

// ---------------------------------------------------------------------------
// PLY
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    fn parse(s: &str) -> Option<ScalarType> {
        match s {
            "char" | "int8" => Some(ScalarType::I8),
            "uchar" | "uint8" => Some(ScalarType::U8),
            "short" | "int16" => Some(ScalarType::I16),
            "ushort" | "uint16" => Some(ScalarType::U16),
            "int" | "int32" => Some(ScalarType::I32),
            "uint" | "uint32" => Some(ScalarType::U32),
            "float" | "float32" => Some(ScalarType::F32),
            "double" | "float64" => Some(ScalarType::F64),
            _ => None,
        }
    }

    fn size(self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }

    fn read_le(self, cursor: &mut Cursor<&[u8]>) -> std::io::Result<f64> {
        Ok(match self {
            ScalarType::I8 => cursor.read_i8()? as f64,
            ScalarType::U8 => cursor.read_u8()? as f64,
            ScalarType::I16 => cursor.read_i16::<LittleEndian>()? as f64,
            ScalarType::U16 => cursor.read_u16::<LittleEndian>()? as f64,
            ScalarType::I32 => cursor.read_i32::<LittleEndian>()? as f64,
            ScalarType::U32 => cursor.read_u32::<LittleEndian>()? as f64,
            ScalarType::F32 => cursor.read_f32::<LittleEndian>()? as f64,
            ScalarType::F64 => cursor.read_f64::<LittleEndian>()?,
        })
    }
}

#[derive(Debug, Clone)]
struct PlyProperty {
    name: String,
    kind: ScalarType,
    is_list: bool,
}

#[derive(Debug, Clone)]
struct PlyElement {
    name: String,
    count: usize,
    properties: Vec<PlyProperty>,
}

impl PlyElement {
    /// Row size in bytes; `None` when the element has list properties.
    fn row_size(&self) -> Option<usize> {
        if self.properties.iter().any(|p| p.is_list) {
            return None;
        }
        Some(self.properties.iter().map(|p| p.kind.size()).sum())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

fn ply_err(message: impl Into<String>) -> FrameError {
    FrameError::decode("PLY", message)
}

/// Read a PLY point cloud file.
pub fn read_ply<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let bytes = read_bytes(path.as_ref())?;
    parse_ply(&bytes)
}

fn parse_ply(bytes: &[u8]) -> Result<PointCloud> {
    let (format, elements, body_offset) = parse_ply_header(bytes)?;
    let body = &bytes[body_offset..];

    let vertex_index = elements
        .iter()
        .position(|e| e.name == "vertex")
        .ok_or_else(|| ply_err("no vertex element in header"))?;
    let vertex = &elements[vertex_index];
    if vertex.properties.iter().any(|p| p.is_list) {
        return Err(ply_err("list properties in vertex element are not supported"));
    }

    let rows = match format {
        PlyFormat::Ascii => {
            let text = std::str::from_utf8(body)
                .map_err(|_| ply_err("ascii body is not valid UTF-8"))?;
            let mut lines = text.lines().filter(|l| !l.trim().is_empty());
            // Elements are stored in declaration order; skip those before vertex.
            for element in &elements[..vertex_index] {
                for _ in 0..element.count {
                    lines
                        .next()
                        .ok_or_else(|| ply_err(format!("truncated element '{}'", element.name)))?;
                }
            }
            parse_ply_ascii_rows(vertex, &mut lines)?
        }
        PlyFormat::BinaryLittleEndian => {
            let mut offset = 0usize;
            for element in &elements[..vertex_index] {
                let row_size = element.row_size().ok_or_else(|| {
                    ply_err(format!(
                        "cannot skip element '{}' with list properties in binary body",
                        element.name
                    ))
                })?;
                offset += row_size * element.count;
            }
            parse_ply_binary_rows(vertex, body, offset)?
        }
    };

    assemble_cloud(&vertex.properties, rows, "PLY")
}

/// Parse the header, returning the format, declared elements, and the byte
/// offset of the first body byte.
fn parse_ply_header(bytes: &[u8]) -> Result<(PlyFormat, Vec<PlyElement>, usize)> {
    let mut format: Option<PlyFormat> = None;
    let mut elements: Vec<PlyElement> = Vec::new();
    let mut offset = 0usize;
    let mut first = true;

    loop {
        let line_end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| ply_err("header is missing end_header"))?;
        let raw = &bytes[offset..offset + line_end];
        offset += line_end + 1;

        let line = std::str::from_utf8(raw)
            .map_err(|_| ply_err("header is not valid UTF-8"))?
            .trim_end_matches('\r')
            .trim();

        if first {
            if line != "ply" {
                return Err(ply_err("missing 'ply' magic line"));
            }
            first = false;
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("end_header") => break,
            Some("comment") | Some("obj_info") | None => {}
            Some("format") => {
                format = Some(match tokens.next() {
                    Some("ascii") => PlyFormat::Ascii,
                    Some("binary_little_endian") => PlyFormat::BinaryLittleEndian,
                    Some(other) => {
                        return Err(ply_err(format!("unsupported format '{other}'")));
                    }
                    None => return Err(ply_err("format line is missing a format name")),
                });
            }
            Some("element") => {
                let name = tokens
                    .next()
                    .ok_or_else(|| ply_err("element line is missing a name"))?;
                let count: usize = tokens
                    .next()
                    .and_then(|c| c.parse().ok())
                    .ok_or_else(|| ply_err(format!("element '{name}' has an invalid count")))?;
                elements.push(PlyElement {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| ply_err("property declared before any element"))?;
                let type_token = tokens
                    .next()
                    .ok_or_else(|| ply_err("property line is missing a type"))?;
                if type_token == "list" {
                    // list <count-type> <item-type> <name>
                    let item_type = tokens
                        .nth(1)
                        .and_then(ScalarType::parse)
                        .ok_or_else(|| ply_err("list property has an invalid item type"))?;
                    let name = tokens
                        .next()
                        .ok_or_else(|| ply_err("list property is missing a name"))?;
                    element.properties.push(PlyProperty {
                        name: name.to_string(),
                        kind: item_type,
                        is_list: true,
                    });
                } else {
                    let kind = ScalarType::parse(type_token)
                        .ok_or_else(|| ply_err(format!("unknown property type '{type_token}'")))?;
                    let name = tokens
                        .next()
                        .ok_or_else(|| ply_err("property line is missing a name"))?;
                    element.properties.push(PlyProperty {
                        name: name.to_string(),
                        kind,
                        is_list: false,
                    });
                }
            }
            Some(other) => {
                return Err(ply_err(format!("unknown header keyword '{other}'")));
            }
        }
    }

    let format = format.ok_or_else(|| ply_err("header has no format line"))?;
    Ok((format, elements, offset))
}

fn parse_ply_ascii_rows<'a, I>(vertex: &PlyElement, lines: &mut I) -> Result<Vec<Vec<f64>>>
where
    I: Iterator<Item = &'a str>,
{
    let mut rows = Vec::with_capacity(vertex.count);
    for row_idx in 0..vertex.count {
        let line = lines
            .next()
            .ok_or_else(|| ply_err(format!("vertex element truncated at row {row_idx}")))?;
        let mut row = Vec::with_capacity(vertex.properties.len());
        let mut tokens = line.split_whitespace();
        for property in &vertex.properties {
            let token = tokens.next().ok_or_else(|| {
                ply_err(format!(
                    "row {row_idx} is missing property '{}'",
                    property.name
                ))
            })?;
            let value: f64 = token.parse().map_err(|_| {
                ply_err(format!(
                    "row {row_idx} property '{}' is not numeric: '{token}'",
                    property.name
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

fn parse_ply_binary_rows(
    vertex: &PlyElement,
    body: &[u8],
    offset: usize,
) -> Result<Vec<Vec<f64>>> {
    // List properties were rejected earlier, so row_size is always present.
    let row_size = vertex
        .row_size()
        .ok_or_else(|| ply_err("vertex element has list properties"))?;
    let needed = offset + row_size * vertex.count;
    if body.len() < needed {
        return Err(ply_err(format!(
            "binary body too short: need {needed} bytes, have {}",
            body.len()
        )));
    }

    let mut cursor = Cursor::new(&body[offset..]);
    let mut rows = Vec::with_capacity(vertex.count);
    for _ in 0..vertex.count {
        let mut row = Vec::with_capacity(vertex.properties.len());
        for property in &vertex.properties {
            let value = property
                .kind
                .read_le(&mut cursor)
                .map_err(|e| ply_err(format!("binary read failed: {e}")))?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Build a `PointCloud` from per-row property values.
///
/// `x`/`y`/`z` are required. `red`/`green`/`blue` and `nx`/`ny`/`nz` are
/// attached when the full attribute group is present.
fn assemble_cloud(
    properties: &[PlyProperty],
    rows: Vec<Vec<f64>>,
    format: &str,
) -> Result<PointCloud> {
    let index: HashMap<&str, usize> = properties
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();

    let coord = |name: &str| -> Result<usize> {
        index
            .get(name)
            .copied()
            .ok_or_else(|| FrameError::decode(format, format!("vertex element is missing '{name}'")))
    };
    let (ix, iy, iz) = (coord("x")?, coord("y")?, coord("z")?);

    let color_idx = match (index.get("red"), index.get("green"), index.get("blue")) {
        (Some(&r), Some(&g), Some(&b)) => Some((r, g, b)),
        _ => None,
    };
    let normal_idx = match (index.get("nx"), index.get("ny"), index.get("nz")) {
        (Some(&x), Some(&y), Some(&z)) => Some((x, y, z)),
        _ => None,
    };

    let mut cloud = PointCloud {
        points: Vec::with_capacity(rows.len()),
        colors: color_idx.map(|_| Vec::with_capacity(rows.len())),
        normals: normal_idx.map(|_| Vec::with_capacity(rows.len())),
    };

    for row in &rows {
        cloud
            .points
            .push(Point3::new(row[ix] as f32, row[iy] as f32, row[iz] as f32));
        if let (Some((r, g, b)), Some(colors)) = (color_idx, cloud.colors.as_mut()) {
            colors.push([row[r] as u8, row[g] as u8, row[b] as u8]);
        }
        if let (Some((x, y, z)), Some(normals)) = (normal_idx, cloud.normals.as_mut()) {
            normals.push(Vector3::new(row[x] as f32, row[y] as f32, row[z] as f32));
        }
    }

    Ok(cloud)
}

// ---------------------------------------------------------------------------
// PCD
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct PcdField {
    name: String,
    size: usize,
    type_char: char,
    count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PcdData {
    Ascii,
    Binary,
}

fn pcd_err(message: impl Into<String>) -> FrameError {
    FrameError::decode("PCD", message)
}

/// Read a PCD point cloud file.
pub fn read_pcd<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let bytes = read_bytes(path.as_ref())?;
    parse_pcd(&bytes)
}

fn parse_pcd(bytes: &[u8]) -> Result<PointCloud> {
    let mut fields: Vec<PcdField> = Vec::new();
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut points: Option<usize> = None;
    let mut data: Option<PcdData> = None;

    let mut offset = 0usize;
    while data.is_none() {
        let line_end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| pcd_err("header is missing a DATA line"))?;
        let raw = &bytes[offset..offset + line_end];
        offset += line_end + 1;

        let line = std::str::from_utf8(raw)
            .map_err(|_| pcd_err("header is not valid UTF-8"))?
            .trim_end_matches('\r')
            .trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let key = tokens.next().unwrap_or("").to_ascii_uppercase();
        let rest: Vec<&str> = tokens.collect();
        match key.as_str() {
            "VERSION" | "VIEWPOINT" => {}
            "FIELDS" => {
                fields = rest
                    .iter()
                    .map(|name| PcdField {
                        name: name.to_ascii_lowercase(),
                        size: 4,
                        type_char: 'F',
                        count: 1,
                    })
                    .collect();
            }
            "SIZE" => {
                set_field_attr(&mut fields, &rest, "SIZE", |f, v| {
                    f.size = v.parse().map_err(|_| ())?;
                    Ok(())
                })?;
            }
            "TYPE" => {
                set_field_attr(&mut fields, &rest, "TYPE", |f, v| {
                    f.type_char = v.chars().next().ok_or(())?.to_ascii_uppercase();
                    Ok(())
                })?;
            }
            "COUNT" => {
                set_field_attr(&mut fields, &rest, "COUNT", |f, v| {
                    f.count = v.parse().map_err(|_| ())?;
                    Ok(())
                })?;
            }
            "WIDTH" => width = rest.first().and_then(|v| v.parse().ok()),
            "HEIGHT" => height = rest.first().and_then(|v| v.parse().ok()),
            "POINTS" => points = rest.first().and_then(|v| v.parse().ok()),
            "DATA" => {
                data = Some(match rest.first().copied() {
                    Some("ascii") => PcdData::Ascii,
                    Some("binary") => PcdData::Binary,
                    Some("binary_compressed") => {
                        return Err(pcd_err("binary_compressed data is not supported"));
                    }
                    other => {
                        return Err(pcd_err(format!("unknown data kind {other:?}")));
                    }
                });
            }
            other => {
                return Err(pcd_err(format!("unknown header keyword '{other}'")));
            }
        }
    }

    if fields.is_empty() {
        return Err(pcd_err("header has no FIELDS line"));
    }
    let point_count = points
        .or_else(|| Some(width? * height?))
        .ok_or_else(|| pcd_err("header has neither POINTS nor WIDTH/HEIGHT"))?;

    let body = &bytes[offset..];
    let rows = match data.unwrap_or(PcdData::Ascii) {
        PcdData::Ascii => parse_pcd_ascii(&fields, body, point_count)?,
        PcdData::Binary => parse_pcd_binary(&fields, body, point_count)?,
    };

    assemble_pcd_cloud(&fields, rows)
}

fn set_field_attr(
    fields: &mut [PcdField],
    values: &[&str],
    key: &str,
    mut apply: impl FnMut(&mut PcdField, &str) -> std::result::Result<(), ()>,
) -> Result<()> {
    if fields.is_empty() {
        return Err(pcd_err(format!("{key} line appears before FIELDS")));
    }
    if values.len() != fields.len() {
        return Err(pcd_err(format!(
            "{key} has {} entries but there are {} fields",
            values.len(),
            fields.len()
        )));
    }
    for (field, value) in fields.iter_mut().zip(values) {
        apply(field, value)
            .map_err(|_| pcd_err(format!("invalid {key} entry '{value}'")))?;
    }
    Ok(())
}

/// Per-row values for the first component of every field, as raw `f64`
/// with packed integer fields kept bit-exact.
fn parse_pcd_ascii(fields: &[PcdField], body: &[u8], count: usize) -> Result<Vec<Vec<f64>>> {
    let text =
        std::str::from_utf8(body).map_err(|_| pcd_err("ascii body is not valid UTF-8"))?;
    let mut rows = Vec::with_capacity(count);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    for row_idx in 0..count {
        let line = lines
            .next()
            .ok_or_else(|| pcd_err(format!("body truncated at row {row_idx}")))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let expected: usize = fields.iter().map(|f| f.count).sum();
        if tokens.len() != expected {
            return Err(pcd_err(format!(
                "row {row_idx} has {} tokens, expected {expected}",
                tokens.len()
            )));
        }
        let mut row = Vec::with_capacity(fields.len());
        let mut cursor = 0usize;
        for field in fields {
            let token = tokens[cursor];
            cursor += field.count;
            let value = parse_pcd_token(field, token)
                .ok_or_else(|| pcd_err(format!("row {row_idx}: invalid value '{token}'")))?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

fn parse_pcd_token(field: &PcdField, token: &str) -> Option<f64> {
    match field.type_char {
        // Packed color fields may be printed as the reinterpreted float
        'U' | 'I' => token
            .parse::<i64>()
            .map(|v| v as f64)
            .ok()
            .or_else(|| token.parse::<f64>().ok()),
        _ => token.parse::<f64>().ok(),
    }
}

fn parse_pcd_binary(fields: &[PcdField], body: &[u8], count: usize) -> Result<Vec<Vec<f64>>> {
    let stride: usize = fields.iter().map(|f| f.size * f.count).sum();
    let needed = stride * count;
    if body.len() < needed {
        return Err(pcd_err(format!(
            "binary body too short: need {needed} bytes, have {}",
            body.len()
        )));
    }

    let mut rows = Vec::with_capacity(count);
    for row_idx in 0..count {
        let row_start = row_idx * stride;
        let mut cursor = Cursor::new(&body[row_start..row_start + stride]);
        let mut row = Vec::with_capacity(fields.len());
        for field in fields {
            let value = read_pcd_scalar(field, &mut cursor)
                .map_err(|e| pcd_err(format!("binary read failed: {e}")))?;
            // Skip the remaining components of multi-count fields
            let skip = (field.count - 1) * field.size;
            cursor.set_position(cursor.position() + skip as u64);
            row.push(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

fn read_pcd_scalar(field: &PcdField, cursor: &mut Cursor<&[u8]>) -> std::io::Result<f64> {
    Ok(match (field.type_char, field.size) {
        ('F', 4) => cursor.read_f32::<LittleEndian>()? as f64,
        ('F', 8) => cursor.read_f64::<LittleEndian>()?,
        ('U', 1) => cursor.read_u8()? as f64,
        ('U', 2) => cursor.read_u16::<LittleEndian>()? as f64,
        ('U', 4) => cursor.read_u32::<LittleEndian>()? as f64,
        ('I', 1) => cursor.read_i8()? as f64,
        ('I', 2) => cursor.read_i16::<LittleEndian>()? as f64,
        ('I', 4) => cursor.read_i32::<LittleEndian>()? as f64,
        _ => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported field type {}{}", field.type_char, field.size),
            ));
        }
    })
}

fn assemble_pcd_cloud(fields: &[PcdField], rows: Vec<Vec<f64>>) -> Result<PointCloud> {
    let index: HashMap<&str, usize> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name.as_str(), i))
        .collect();

    let coord = |name: &str| -> Result<usize> {
        index
            .get(name)
            .copied()
            .ok_or_else(|| pcd_err(format!("FIELDS is missing '{name}'")))
    };
    let (ix, iy, iz) = (coord("x")?, coord("y")?, coord("z")?);

    let rgb_idx = index.get("rgb").copied();
    let normal_idx = match (
        index.get("normal_x"),
        index.get("normal_y"),
        index.get("normal_z"),
    ) {
        (Some(&x), Some(&y), Some(&z)) => Some((x, y, z)),
        _ => None,
    };

    let mut cloud = PointCloud {
        points: Vec::with_capacity(rows.len()),
        colors: rgb_idx.map(|_| Vec::with_capacity(rows.len())),
        normals: normal_idx.map(|_| Vec::with_capacity(rows.len())),
    };

    for row in &rows {
        cloud
            .points
            .push(Point3::new(row[ix] as f32, row[iy] as f32, row[iz] as f32));
        if let (Some(i), Some(colors)) = (rgb_idx, cloud.colors.as_mut()) {
            colors.push(unpack_rgb(&fields[i], row[i]));
        }
        if let (Some((x, y, z)), Some(normals)) = (normal_idx, cloud.normals.as_mut()) {
            normals.push(Vector3::new(row[x] as f32, row[y] as f32, row[z] as f32));
        }
    }

    Ok(cloud)
}

/// Unpack a PCL `rgb` field into color bytes.
///
/// PCL packs `r << 16 | g << 8 | b` into a u32 and stores it through a
/// float's bit pattern; ascii files print either the integer or the
/// reinterpreted float.
fn unpack_rgb(field: &PcdField, value: f64) -> [u8; 3] {
    let packed = if field.type_char == 'F' {
        (value as f32).to_bits()
    } else {
        value as u32
    };
    [
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    ]
}
