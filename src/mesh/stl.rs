//! STL decoding (binary and ASCII variants).

use glam::Vec3;

use crate::mesh::model::TriangleMesh;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StlError {
    #[error("binary STL shorter than its 84-byte header")]
    TooShort,
    #[error("binary STL declares {declared} triangles but holds only {available}")]
    Truncated { declared: usize, available: usize },
    #[error("ASCII STL is not valid UTF-8")]
    InvalidUtf8,
    #[error("line {line}: invalid vertex coordinate `{token}`")]
    BadCoordinate { line: usize, token: String },
    #[error("line {line}: vertex needs three coordinates")]
    MissingCoordinate { line: usize },
    #[error("ASCII STL ends with {0} dangling vertices")]
    DanglingVertices(usize),
}

pub fn parse_stl(data: &[u8]) -> Result<TriangleMesh, StlError> {
    let triangles = if is_ascii_stl(data) {
        parse_ascii(data)?
    } else {
        parse_binary(data)?
    };
    Ok(TriangleMesh::from_triangles(&triangles))
}

/// A buffer whose size matches the binary layout exactly is binary even when
/// its header starts with `solid`. Anything else that opens with `solid` is
/// read as text.
fn is_ascii_stl(data: &[u8]) -> bool {
    if data.len() >= HEADER_LEN + 4 {
        let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
        if count
            .checked_mul(RECORD_LEN)
            .and_then(|n| n.checked_add(HEADER_LEN + 4))
            == Some(data.len())
        {
            return false;
        }
    }

    (0..5).any(|off| data.get(off..off + 5) == Some(b"solid".as_slice()))
}

fn parse_binary(data: &[u8]) -> Result<Vec<[Vec3; 3]>, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort);
    }

    let declared = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[HEADER_LEN + 4..];
    let available = body.len() / RECORD_LEN;
    if available < declared {
        return Err(StlError::Truncated {
            declared,
            available,
        });
    }

    let triangles = body
        .chunks_exact(RECORD_LEN)
        .take(declared)
        .map(|record| {
            // 12 bytes of stored normal are skipped; normals are rebuilt from winding.
            let v = |i: usize| {
                let base = 12 + i * 12;
                Vec3::new(
                    read_f32(record, base),
                    read_f32(record, base + 4),
                    read_f32(record, base + 8),
                )
            };
            [v(0), v(1), v(2)]
        })
        .collect();

    Ok(triangles)
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn parse_ascii(data: &[u8]) -> Result<Vec<[Vec3; 3]>, StlError> {
    let text = std::str::from_utf8(data).map_err(|_| StlError::InvalidUtf8)?;
    let mut triangles = Vec::new();
    let mut corners: Vec<Vec3> = Vec::with_capacity(3);

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }

        let mut coord = [0.0_f32; 3];
        for c in &mut coord {
            let token = tokens
                .next()
                .ok_or(StlError::MissingCoordinate { line: line_no })?;
            *c = token.parse().map_err(|_| StlError::BadCoordinate {
                line: line_no,
                token: token.to_string(),
            })?;
        }
        corners.push(Vec3::from_array(coord));

        if corners.len() == 3 {
            triangles.push([corners[0], corners[1], corners[2]]);
            corners.clear();
        }
    }

    if !corners.is_empty() {
        return Err(StlError::DanglingVertices(corners.len()));
    }

    Ok(triangles)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn binary_stl(header: &str, triangles: &[[Vec3; 3]]) -> Vec<u8> {
        let mut out = Vec::with_capacity(84 + triangles.len() * RECORD_LEN);
        let mut head = [0u8; HEADER_LEN];
        let n = header.len().min(HEADER_LEN);
        head[..n].copy_from_slice(&header.as_bytes()[..n]);
        out.extend_from_slice(&head);
        out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            out.extend_from_slice(&[0u8; 12]);
            for v in tri {
                for c in v.to_array() {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
            out.extend_from_slice(&0u16.to_le_bytes());
        }
        out
    }

    const ASCII_TRIANGLE: &str = "solid part
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid part
";

    #[test]
    fn binary_roundtrip_keeps_vertices() {
        let tri = [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)];
        let mesh = parse_stl(&binary_stl("part", &[tri])).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex(1), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(mesh.vertex(2), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn binary_with_solid_header_is_still_binary() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let bytes = binary_stl("solid exported by cad", &[tri, tri]);
        assert!(!is_ascii_stl(&bytes));
        assert_eq!(parse_stl(&bytes).unwrap().triangle_count(), 2);
    }

    #[test]
    fn ascii_is_detected_and_parsed() {
        assert!(is_ascii_stl(ASCII_TRIANGLE.as_bytes()));
        let mesh = parse_stl(ASCII_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex(1), Vec3::X);
    }

    #[test]
    fn solid_keyword_is_only_searched_in_the_first_five_offsets() {
        assert!(is_ascii_stl(b"    solid part\nendsolid part\n"));
        assert!(!is_ascii_stl(b"     solid part\nendsolid part\n"));
        assert_eq!(parse_stl(b"     solid part\n"), Err(StlError::TooShort));
    }

    #[test]
    fn truncated_binary_is_rejected() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let mut bytes = binary_stl("part", &[tri, tri]);
        bytes.truncate(bytes.len() - 10);
        assert_eq!(
            parse_stl(&bytes),
            Err(StlError::Truncated {
                declared: 2,
                available: 1
            })
        );
        assert_eq!(parse_stl(b"tiny"), Err(StlError::TooShort));
    }

    #[test]
    fn ascii_errors_carry_line_numbers() {
        let bad = ASCII_TRIANGLE.replace("vertex 1 0 0", "vertex 1 zero 0");
        assert_eq!(
            parse_stl(bad.as_bytes()),
            Err(StlError::BadCoordinate {
                line: 5,
                token: "zero".into()
            })
        );

        let short = ASCII_TRIANGLE.replace("      vertex 0 1 0\n", "");
        assert_eq!(parse_stl(short.as_bytes()), Err(StlError::DanglingVertices(2)));
    }
}
