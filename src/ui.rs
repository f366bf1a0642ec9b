use crate::app::{App, Hover};
use crate::choropleth::{Rgb, Year, LEGEND, LEGEND_TITLE};
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

pub const TITLE: &str =
    "Mapa de Densidad Poblacional de los casos de dengue en Perú (2019 - 2024)";
pub const DATA_NOTE: &str =
    "Importante: El año 2024 cuenta con datos registrados hasta la semana epidemiológica 10.";
const YEAR_PROMPT: &str = "Seleccione el año: ";

/// Background the translucent fills are composited over
pub const MAP_BASE: Rgb = Rgb::hex(0xF2EFE9);

#[inline(always)]
fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Note about 2024
            Constraint::Length(1), // Year selector
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(DATA_NOTE, Style::default().fg(Color::Yellow))),
        chunks[1],
    );
    render_year_selector(frame, app, chunks[2]);
    render_map(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

fn render_year_selector(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![Span::styled(YEAR_PROMPT, Style::default().fg(Color::DarkGray))];
    let mut x = area.x + YEAR_PROMPT.chars().count() as u16;
    app.year_tabs.clear();

    for (idx, year) in Year::SUPPORTED.iter().enumerate() {
        let label = format!(" {}:{} ", idx + 1, year);
        let width = label.chars().count() as u16;
        let style = if *year == app.year {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        app.year_tabs.push((area.y, x, x + width, *year));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Casos de dengue {} ", app.year),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.map_origin = (inner.x, inner.y);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.renderer.render(
        &app.context.boundaries,
        &app.styles,
        inner.width as usize,
        inner.height as usize,
        &viewport,
        MAP_BASE,
    );
    frame.render_widget(MapWidget { layers }, inner);

    if app.renderer.settings.show_legend {
        frame.render_widget(LegendWidget, legend_area(inner));
    }

    if let (Some(hover), Some((col, row))) = (app.hover(), app.mouse_pos) {
        render_tooltip(frame, &hover, col, row, inner);
    }
}

/// Custom widget that paints fills, braille outlines and labels
struct MapWidget {
    layers: MapLayers,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = color(MAP_BASE);
        for row in 0..area.height.min(self.layers.height as u16) {
            for col in 0..area.width.min(self.layers.width as u16) {
                let cell = &mut buf[(area.x + col, area.y + row)];
                let bg = self
                    .layers
                    .fill(col as usize, row as usize)
                    .map_or(base, color);
                cell.set_char(' ').set_bg(bg);

                if let Some((ch, ink)) = self.layers.outlines.cell(col as usize, row as usize) {
                    cell.set_char(ch).set_fg(color(ink));
                }
            }
        }

        let label_style = Style::default()
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let max_len = (area.width - *lx) as usize;
            for (i, ch) in text.chars().take(max_len).enumerate() {
                buf[(area.x + *lx + i as u16, area.y + *ly)]
                    .set_char(ch)
                    .set_style(label_style);
            }
        }
    }
}

/// Legend box anchored near the bottom-left corner of the map
fn legend_area(map: Rect) -> Rect {
    let label_width = LEGEND.iter().map(|e| e.label.len()).max().unwrap_or(0) as u16;
    let width = (label_width + 6).min(map.width);
    let height = (LEGEND.len() as u16 + 2).min(map.height);
    let x = map.x + 2.min(map.width - width);
    let y = map.y + map.height.saturating_sub(height + 1);
    Rect::new(x, y, width, height)
}

struct LegendWidget;

impl Widget for LegendWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let paper = Style::default().fg(Color::Black).bg(Color::White);
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(paper.fg(Color::Gray))
            .style(paper)
            .title(Span::styled(LEGEND_TITLE, paper.add_modifier(Modifier::BOLD)));

        let lines: Vec<Line> = LEGEND
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled("██", Style::default().fg(color(entry.color)).bg(Color::White)),
                    Span::styled(format!(" {}", entry.label), paper),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).style(paper).render(area, buf);
    }
}

fn render_tooltip(frame: &mut Frame, hover: &Hover, col: u16, row: u16, map: Rect) {
    let cases = match hover.cases {
        Some(n) => format!("{n} casos"),
        None => "sin datos".to_string(),
    };
    let text = format!(" Departamentos: {} | {} ", hover.name.trim(), cases);
    let width = (text.chars().count() as u16).min(map.width);
    if width == 0 || map.height == 0 {
        return;
    }

    let x = (col + 2).min(map.x + map.width - width).max(map.x);
    let y = (row + 1).min(map.y + map.height - 1).max(map.y);
    let area = Rect::new(x, y, width, 1);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.renderer.settings;
    let toggle = |on: bool, on_label: &'static str, off_label: &'static str| {
        Span::styled(
            if on { on_label } else { off_label },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let status = Line::from(vec![
        Span::styled(" Año: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.year.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        toggle(settings.show_outlines, "[B]ordes ", "[b]ordes "),
        toggle(settings.show_labels, "[L]abels ", "[L]abels "),
        toggle(settings.show_legend, "[G]leyenda ", "[g]leyenda "),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | tab/1-6:año hjkl:pan +/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_area_fits_inside_map() {
        let map = Rect::new(1, 4, 80, 30);
        let legend = legend_area(map);
        assert_eq!(legend.height, 9);
        assert!(legend.x >= map.x && legend.right() <= map.right());
        assert!(legend.y >= map.y && legend.bottom() <= map.bottom());
    }

    #[test]
    fn test_legend_area_on_tiny_map() {
        let map = Rect::new(0, 0, 5, 3);
        let legend = legend_area(map);
        assert!(legend.right() <= map.right());
        assert!(legend.bottom() <= map.bottom());
    }

    #[test]
    fn test_legend_widget_lists_every_range() {
        let area = Rect::new(0, 0, 20, 9);
        let mut buf = Buffer::empty(area);
        LegendWidget.render(area, &mut buf);
        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains(LEGEND_TITLE));
        for entry in LEGEND {
            assert!(text.contains(entry.label), "missing {}", entry.label);
        }
    }
}
