use crate::geo::Bounds;
use std::f64::consts::PI;

/// Map center used when there is no geometry to frame (lat -9.19, lon -75.0152)
pub const PERU_CENTER: (f64, f64) = (-75.0152, -9.19);

const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 400.0;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world across the canvas width)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Web Mercator y in [0, 1], growing southwards
#[inline(always)]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-85.0, 85.0) * PI / 180.0;
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

#[inline(always)]
fn mercator_lat(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Default framing over Peru, used before bounds are known
    pub fn peru(width: usize, height: usize) -> Self {
        Self::new(PERU_CENTER.0, PERU_CENTER.1, 24.0, width, height)
    }

    /// Center on `bounds` and pick the largest zoom that keeps them in view
    /// with a small margin
    pub fn fit_bounds(bounds: Bounds, width: usize, height: usize) -> Self {
        let x0 = (bounds.min.x + 180.0) / 360.0;
        let x1 = (bounds.max.x + 180.0) / 360.0;
        let y_top = mercator_y(bounds.max.y);
        let y_bottom = mercator_y(bounds.min.y);

        let center_lon = (bounds.min.x + bounds.max.x) / 2.0;
        let center_lat = mercator_lat((y_top + y_bottom) / 2.0);

        let dx = x1 - x0;
        let dy = y_bottom - y_top;
        if width == 0 || height == 0 || dx <= 0.0 || dy <= 0.0 {
            return Self::new(center_lon, center_lat, Self::peru(width, height).zoom, width, height);
        }

        // Screen scale is zoom * width pixels per world width
        let fit_x = 1.0 / dx;
        let fit_y = height as f64 / (width as f64 * dy);
        let zoom = (0.9 * fit_x.min(fit_y)).clamp(MIN_ZOOM, MAX_ZOOM);

        Self::new(center_lon, center_lat, zoom, width, height)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        if self.width == 0 {
            return;
        }
        let scale = 1.0 / (self.zoom * self.width as f64);
        self.center_lon += dx as f64 * scale * 360.0;
        let y = mercator_y(self.center_lat) + dy as f64 * scale;
        self.center_lat = mercator_lat(y);

        // Wrap longitude
        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
    }

    /// Zoom in by a factor
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    /// Zoom out by a factor
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor keeping the point under (px, py) fixed on screen
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width as f64;

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        (x * 360.0 - 180.0, mercator_lat(y))
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon + 180.0) / 360.0;
        let y = mercator_y(lat);

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let scale = self.zoom * self.width as f64;

        let px = ((x - center_x) * scale + self.width as f64 / 2.0).floor() as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0).floor() as i32;

        (px, py)
    }

    /// Check if a projected point is visible in the viewport
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= 0 && px < self.width as i32 && py >= 0 && py < self.height as i32
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0
            && min_x < self.width as i32
            && max_y >= 0
            && min_y < self.height as i32
    }
}
