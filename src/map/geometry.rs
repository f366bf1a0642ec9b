use crate::braille::BrailleCanvas;
use crate::map::projection::Viewport;
use glam::DVec2;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a closed lon/lat ring, skipping segments that cannot be on screen
pub fn draw_ring(canvas: &mut BrailleCanvas, ring: &[DVec2], viewport: &Viewport) {
    if ring.len() < 2 {
        return;
    }

    let mut prev = {
        let last = ring[ring.len() - 1];
        viewport.project(last.x, last.y)
    };

    for p in ring {
        let (px, py) = viewport.project(p.x, p.y);
        if viewport.line_might_be_visible(prev, (px, py)) {
            draw_line(canvas, prev.0, prev.1, px, py);
        }
        prev = (px, py);
    }
}
