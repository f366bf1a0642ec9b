use crate::braille::BrailleCanvas;
use crate::choropleth::{Rgb, StyleResult};
use crate::data::{Boundaries, Department};
use crate::map::geometry::draw_ring;
use crate::map::projection::Viewport;
use crate::map::spatial::FeatureGrid;
use glam::DVec2;
use rayon::prelude::*;

/// Grid cell size in degrees; departments span a few degrees each
const GRID_CELL_DEG: f64 = 0.5;

/// Display settings for map layers
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_outlines: bool,
    pub show_labels: bool,
    pub show_legend: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_outlines: true,
            show_labels: false,
            show_legend: true,
        }
    }
}

/// Output of one render pass, sized in terminal cells
pub struct MapLayers {
    /// Composited fill per cell (row-major), `None` outside every department
    pub fills: Vec<Option<Rgb>>,
    pub outlines: BrailleCanvas,
    /// (column, row, text)
    pub labels: Vec<(u16, u16, String)>,
    pub width: usize,
    pub height: usize,
}

impl MapLayers {
    pub fn fill(&self, col: usize, row: usize) -> Option<Rgb> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.fills[row * self.width + col]
    }
}

/// Choropleth renderer over a fixed set of department polygons
pub struct ChoroplethRenderer {
    grid: FeatureGrid,
    pub settings: DisplaySettings,
}

impl ChoroplethRenderer {
    pub fn new(boundaries: &Boundaries) -> Self {
        Self {
            grid: FeatureGrid::build(
                boundaries.departments.iter().map(|d| d.bounds),
                GRID_CELL_DEG,
            ),
            settings: DisplaySettings::default(),
        }
    }

    /// Index of the first department (file order) containing the point
    pub fn department_at(&self, departments: &[Department], lon: f64, lat: f64) -> Option<usize> {
        let p = DVec2::new(lon, lat);
        self.grid
            .query_point(p)
            .iter()
            .copied()
            .find(|&idx| departments.get(idx).is_some_and(|d| d.contains(p)))
    }

    /// Render fills, outlines and labels into a `width` x `height` cell grid.
    ///
    /// `styles[i]` styles `boundaries.departments[i]`. Fills are composited
    /// over `base` using each style's opacity.
    pub fn render(
        &self,
        boundaries: &Boundaries,
        styles: &[StyleResult],
        width: usize,
        height: usize,
        viewport: &Viewport,
        base: Rgb,
    ) -> MapLayers {
        let departments = &boundaries.departments;
        let mut fills = vec![None; width * height];

        if width > 0 {
            // Each terminal cell samples the braille pixel at its center
            fills
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(row, out)| {
                    let py = row as i32 * 4 + 2;
                    for (col, cell) in out.iter_mut().enumerate() {
                        let (lon, lat) = viewport.unproject(col as i32 * 2 + 1, py);
                        *cell = self
                            .department_at(departments, lon, lat)
                            .and_then(|idx| styles.get(idx))
                            .map(|style| style.composited_fill(base));
                    }
                });
        }

        let mut outlines = BrailleCanvas::new(width, height);
        if self.settings.show_outlines {
            for (dept, style) in departments.iter().zip(styles) {
                if style.border_weight == 0 {
                    continue;
                }
                outlines.set_pen(style.border_color);
                for poly in &dept.polygons {
                    for ring in poly.rings() {
                        draw_ring(&mut outlines, ring, viewport);
                    }
                }
            }
        }

        let mut labels = Vec::new();
        if self.settings.show_labels {
            for dept in departments {
                let name = dept.name.trim();
                if name.is_empty() {
                    continue;
                }
                let (px, py) = viewport.project(dept.anchor.x, dept.anchor.y);
                if !viewport.is_visible(px, py) {
                    continue;
                }
                let half = (name.chars().count() / 2) as i32;
                let col = (px / 2 - half).max(0) as u16;
                let row = (py / 4) as u16;
                labels.push((col, row, name.to_string()));
            }
        }

        MapLayers {
            fills,
            outlines,
            labels,
            width,
            height,
        }
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    pub fn toggle_outlines(&mut self) {
        self.settings.show_outlines = !self.settings.show_outlines;
    }

    pub fn toggle_legend(&mut self) {
        self.settings.show_legend = !self.settings.show_legend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_boundaries;

    #[test]
    fn test_department_at() {
        let b = sample_boundaries();
        let r = ChoroplethRenderer::new(&b);
        assert_eq!(r.department_at(&b.departments, -76.5, -11.5), Some(0));
        assert_eq!(r.department_at(&b.departments, -75.5, -11.5), Some(1));
        assert_eq!(r.department_at(&b.departments, -79.7, -4.7), Some(1));
        assert_eq!(r.department_at(&b.departments, -70.0, -15.0), None);
    }

    #[test]
    fn test_render_fills_use_styles() {
        let b = sample_boundaries();
        let r = ChoroplethRenderer::new(&b);
        let red = StyleResult::matched(Rgb::hex(0xff0000));
        let styles = [red, StyleResult::UNMATCHED, StyleResult::UNMATCHED];

        let (w, h) = (40, 20);
        let bounds = b.departments[0].bounds.unwrap();
        let vp = Viewport::fit_bounds(bounds, w * 2, h * 4);
        let layers = r.render(&b, &styles, w, h, &vp, Rgb::BLACK);

        assert_eq!(layers.fills.len(), w * h);
        let center = layers.fill(w / 2, h / 2);
        assert_eq!(center, Some(red.composited_fill(Rgb::BLACK)));
        // Corners sit in the margin fit_bounds leaves around the polygon
        assert_eq!(layers.fill(0, 0), None);
        assert!(layers.labels.is_empty());
    }

    #[test]
    fn test_labels_when_enabled() {
        let b = sample_boundaries();
        let mut r = ChoroplethRenderer::new(&b);
        r.toggle_labels();
        let styles = vec![StyleResult::UNMATCHED; b.len()];
        let vp = Viewport::fit_bounds(b.bounds().unwrap(), 160, 160);
        let layers = r.render(&b, &styles, 80, 40, &vp, Rgb::BLACK);
        let names: Vec<&str> = layers.labels.iter().map(|(_, _, n)| n.as_str()).collect();
        assert_eq!(names, vec!["LIMA", "Piura"]);
    }

    #[test]
    fn test_zero_sized_render() {
        let b = sample_boundaries();
        let r = ChoroplethRenderer::new(&b);
        let styles = vec![StyleResult::UNMATCHED; b.len()];
        let layers = r.render(&b, &styles, 0, 0, &Viewport::peru(0, 0), Rgb::BLACK);
        assert!(layers.fills.is_empty());
    }
}
