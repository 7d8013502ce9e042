//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;

/// Two triangles covering an axis-aligned rectangle
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let half = size * 0.5;
    let min = center - half;
    let max = center + half;

    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Append a rectangle to a vertex list, skipping fully transparent ones
pub fn push_rect(vertices: &mut Vec<Vertex>, center: Vec2, size: Vec2, color: [f32; 4]) {
    if color[3] <= 0.0 {
        return;
    }
    vertices.extend_from_slice(&rect(center, size, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds() {
        let verts = rect(Vec2::new(2.0, 12.0), Vec2::new(2.0, 1.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 3.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 11.5);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 12.5);
    }

    #[test]
    fn test_transparent_rect_skipped() {
        let mut verts = Vec::new();
        push_rect(&mut verts, Vec2::ZERO, Vec2::ONE, [0.0, 0.0, 0.0, 0.0]);
        assert!(verts.is_empty());
        push_rect(&mut verts, Vec2::ZERO, Vec2::ONE, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(verts.len(), 6);
    }
}
