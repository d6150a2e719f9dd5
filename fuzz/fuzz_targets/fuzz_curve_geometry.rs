#![no_main]

use glam::Vec2;
use libfuzzer_sys::fuzz_target;
use trigger_graph_editor::{ConnectionSide, CurveGeometry};

const SIDES: [ConnectionSide; 4] = [
    ConnectionSide::Top,
    ConnectionSide::Right,
    ConnectionSide::Bottom,
    ConnectionSide::Left,
];

fn read_f32(data: &[u8], offset: usize) -> f32 {
    let mut bytes = [0u8; 4];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = data.get(offset + i).copied().unwrap_or(0);
    }
    let value = f32::from_le_bytes(bytes);
    if value.is_finite() {
        value.clamp(-1.0e5, 1.0e5)
    } else {
        0.0
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 34 {
        return;
    }
    let point = |i: usize| Vec2::new(read_f32(data, i * 8), read_f32(data, i * 8 + 4));
    let side = |i: usize| SIDES[(data[32 + i] % 4) as usize];

    let a = CurveGeometry::from_endpoints(point(0), side(0), point(1), side(1));
    let b = CurveGeometry::from_endpoints(point(2), side(1), point(3), side(0));

    let _ = a.intersects(&b);
    let _ = a.move_center_point(point(2)).center_point();
    let _ = a.shift_curve(point(3)).svg_path_data();
    let _ = a.compensated_normal();
});
