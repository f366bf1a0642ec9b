use crate::choropleth::{StyleResult, Year};
use crate::context::MapContext;
use crate::map::{ChoroplethRenderer, Viewport};

/// Department under the mouse cursor
#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    pub name: String,
    pub cases: Option<u64>,
}

/// Application state
pub struct App {
    pub context: MapContext,
    pub viewport: Viewport,
    pub renderer: ChoroplethRenderer,
    pub year: Year,
    /// Style per boundary feature for `year`
    pub styles: Vec<StyleResult>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the tooltip
    pub mouse_pos: Option<(u16, u16)>,
    /// Screen rect of the map's inner area, updated every frame by the UI
    pub map_origin: (u16, u16),
    /// Screen row and column spans of the year tabs, updated by the UI
    pub year_tabs: Vec<(u16, u16, u16, Year)>,
}

impl App {
    pub fn new(context: MapContext, year: Year, width: usize, height: usize) -> Self {
        let renderer = ChoroplethRenderer::new(&context.boundaries);
        let (pixel_width, pixel_height) = Self::pixel_size(width, height);
        let viewport = Self::initial_viewport(&context, pixel_width, pixel_height);
        let styles = context.style_assignment(year);

        Self {
            context,
            viewport,
            renderer,
            year,
            styles,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            map_origin: (1, 4),
            year_tabs: Vec::new(),
        }
    }

    /// Braille pixel size of the map area for a terminal of the given size.
    /// Braille gives 2x4 resolution per character; the chrome takes
    /// 2 columns of border and 6 rows (title, note, tabs, borders, status).
    fn pixel_size(width: usize, height: usize) -> (usize, usize) {
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(6);
        (inner_width * 2, inner_height * 4)
    }

    fn initial_viewport(context: &MapContext, width: usize, height: usize) -> Viewport {
        match context.boundaries.bounds() {
            Some(bounds) => Viewport::fit_bounds(bounds, width, height),
            None => Viewport::peru(width, height),
        }
    }

    /// Select a year and regenerate the style assignment
    pub fn set_year(&mut self, year: Year) {
        if year == self.year {
            return;
        }
        self.year = year;
        self.styles = self.context.style_assignment(year);
        let matched = self.styles.iter().filter(|s| !s.is_unmatched()).count();
        log::debug!("Year {year}: {matched}/{} departments with data", self.styles.len());
    }

    pub fn next_year(&mut self) {
        self.set_year(self.year.next());
    }

    pub fn prev_year(&mut self) {
        self.set_year(self.year.prev());
    }

    /// Pick the n-th supported year (0-based); out-of-range is ignored
    pub fn select_year_index(&mut self, idx: usize) {
        if let Some(&year) = Year::SUPPORTED.get(idx) {
            self.set_year(year);
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = Self::pixel_size(width, height);
        self.viewport.width = pixel_width;
        self.viewport.height = pixel_height;
    }

    /// Reframe the whole country
    pub fn reset_view(&mut self) {
        self.viewport =
            Self::initial_viewport(&self.context, self.viewport.width, self.viewport.height);
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Convert a terminal position to braille pixel coords inside the map
    fn to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let (ox, oy) = self.map_origin;
        if col < ox || row < oy {
            return None;
        }
        let px = (col - ox) as i32 * 2 + 1;
        let py = (row - oy) as i32 * 4 + 2;
        (self.viewport.is_visible(px, py)).then_some((px, py))
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        match self.to_pixel(col, row) {
            Some((px, py)) => self.viewport.zoom_in_at(px, py),
            None => self.viewport.zoom_in(),
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        match self.to_pixel(col, row) {
            Some((px, py)) => self.viewport.zoom_out_at(px, py),
            None => self.viewport.zoom_out(),
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Left click: select a year tab if one was hit, otherwise start a drag
    pub fn click(&mut self, col: u16, row: u16) {
        let hit = self
            .year_tabs
            .iter()
            .find(|(r, start, end, _)| *r == row && (*start..*end).contains(&col))
            .map(|(_, _, _, year)| *year);
        match hit {
            Some(year) => self.set_year(year),
            None => self.last_mouse = Some((col, row)),
        }
    }

    /// Handle mouse drag
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Department under the mouse, with its count for the selected year
    pub fn hover(&self) -> Option<Hover> {
        let (col, row) = self.mouse_pos?;
        let (px, py) = self.to_pixel(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        let departments = &self.context.boundaries.departments;
        let idx = self.renderer.department_at(departments, lon, lat)?;
        let dept = &departments[idx];
        Some(Hover {
            name: dept.name.clone(),
            cases: self.context.case_count(&dept.key, self.year),
        })
    }
}
