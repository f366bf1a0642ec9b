//! Non-interactive outputs: a standalone Leaflet page and JSON-lines style
//! dumps.

use crate::choropleth::{StyleResult, Year, LEGEND, LEGEND_TITLE};
use crate::context::MapContext;
use crate::map::PERU_CENTER;
use crate::ui::{DATA_NOTE, TITLE};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

const LEAFLET_VERSION: &str = "1.9.4";
const INITIAL_ZOOM: u8 = 5;

/// Serialize to JSON that is safe inside a `<script>` element
fn script_json<T: Serialize + ?Sized>(value: &T) -> io::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Legend overlay markup: fixed box, one swatch per range
pub fn legend_html() -> String {
    let mut html = String::from(
        "<div id=\"legend\" style=\"position: fixed; bottom: 50px; left: 50px; width: 220px; \
         height: 200px; border:2px solid grey; z-index:9999; font-size:14px; \
         background-color: white; opacity: 0.8;\">\n",
    );
    html.push_str(&format!("  <b>{LEGEND_TITLE}</b><br>\n"));
    for entry in LEGEND {
        html.push_str(&format!(
            "  <i style=\"background: {}; width: 16px; height: 18px; display: inline-block;\"></i> {}<br>\n",
            entry.color,
            escape_html(entry.label)
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Write a self-contained HTML choropleth with a year selector.
///
/// Styles for every supported year are precomputed, so switching years in
/// the browser only restyles the layer.
pub fn export_html<W: Write>(ctx: &MapContext, initial: Year, mut out: W) -> io::Result<()> {
    let styles: BTreeMap<String, Vec<StyleResult>> = Year::SUPPORTED
        .iter()
        .map(|&year| (year.to_string(), ctx.style_assignment(year)))
        .collect();
    let boundaries = script_json(&ctx.boundaries.collection)?;
    let styles = script_json(&styles)?;

    let options: String = Year::SUPPORTED
        .iter()
        .map(|year| {
            let selected = if *year == initial { " selected" } else { "" };
            format!("<option value=\"{year}\"{selected}>{year}</option>")
        })
        .collect();

    let (lon, lat) = PERU_CENTER;

    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
<style>
  body {{ margin: 0; font-family: sans-serif; }}
  header {{ padding: 8px 16px; }}
  #map {{ height: calc(100vh - 140px); }}
</style>
</head>
<body>
<header>
  <h1>{title}</h1>
  <h3>{note}</h3>
  <label for="year">Seleccione el año:</label>
  <select id="year">{options}</select>
</header>
<div id="map"></div>
{legend}<script>
const boundaries = {boundaries};
const styles = {styles};
const index = new Map(boundaries.features.map((f, i) => [f, i]));
let year = document.getElementById("year").value;

function escapeHtml(s) {{
  const el = document.createElement("span");
  el.textContent = s;
  return el.innerHTML;
}}

function styleFor(feature) {{
  return styles[year][index.get(feature)];
}}

const map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);

const layer = L.geoJSON(boundaries, {{
  style: styleFor,
  onEachFeature: (feature, l) => {{
    const name = (feature.properties && feature.properties.{name_prop}) || "";
    l.bindTooltip("<b>Departamentos:</b> " + escapeHtml(name));
  }}
}}).addTo(map);

document.getElementById("year").addEventListener("change", (e) => {{
  year = e.target.value;
  layer.setStyle(styleFor);
}});
</script>
</body>
</html>
"#,
        title = escape_html(TITLE),
        note = escape_html(DATA_NOTE),
        leaflet = LEAFLET_VERSION,
        options = options,
        legend = legend_html(),
        boundaries = boundaries,
        styles = styles,
        lat = lat,
        lon = lon,
        zoom = INITIAL_ZOOM,
        name_prop = crate::data::NAME_PROPERTY,
    )?;

    log::info!(
        "Exported {} features for {} years",
        ctx.boundaries.len(),
        Year::SUPPORTED.len()
    );
    Ok(())
}

#[derive(Serialize)]
struct StyleLine<'a> {
    department: &'a str,
    cases: Option<u64>,
    style: StyleResult,
}

/// Write one JSON object per boundary feature with its style for `year`
pub fn write_style_lines<W: Write>(ctx: &MapContext, year: Year, mut out: W) -> io::Result<()> {
    let styles = ctx.style_assignment(year);
    for (dept, style) in ctx.boundaries.departments.iter().zip(styles) {
        let line = StyleLine {
            department: &dept.name,
            cases: ctx.case_count(&dept.key, year),
            style,
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_boundaries, CaseTable};

    fn context() -> MapContext {
        let csv = "Departamentos,2019,2020,2021,2022,2023,2024\n\
                   LIMA,2000,40,0,0,0,0\n";
        MapContext::new(CaseTable::from_reader(csv.as_bytes()).unwrap(), sample_boundaries())
    }

    #[test]
    fn test_legend_html_has_seven_swatches() {
        let html = legend_html();
        assert_eq!(html.matches("<i style=").count(), 7);
        assert!(html.contains("&gt; 1500"));
        assert!(html.contains("&lt;= 50"));
        assert!(html.contains("#fff176"));
    }

    #[test]
    fn test_export_html_contents() {
        let mut buf = Vec::new();
        export_html(&context(), Year::new(2022).unwrap(), &mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();

        for year in Year::SUPPORTED {
            assert!(html.contains(&format!("<option value=\"{year}\"")));
        }
        assert!(html.contains("<option value=\"2022\" selected>"));
        assert!(html.contains("\"fillColor\":\"#ff0000\""));
        assert!(html.contains("\"NOMBDEP\":\"LIMA\""));
        assert!(html.contains("setView([-9.19, -75.0152], 5)"));
        assert!(html.contains("{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
        assert_eq!(html.matches("<i style=").count(), 7);
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let s = script_json("</script>").unwrap();
        assert!(!s.contains("</"));
    }

    #[test]
    fn test_style_lines() {
        let mut buf = Vec::new();
        write_style_lines(&context(), Year::first(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["department"], "LIMA");
        assert_eq!(lines[0]["cases"], 2000);
        assert_eq!(lines[0]["style"]["fillColor"], "#ff0000");
        assert!(lines[1]["cases"].is_null());
        assert_eq!(lines[1]["style"]["fillColor"], "#ffffff");
    }

    #[test]
    fn test_style_lines_are_reproducible() {
        let ctx = context();
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_style_lines(&ctx, Year::first(), &mut a).unwrap();
        write_style_lines(&ctx, Year::first(), &mut b).unwrap();
        assert_eq!(a, b);
    }
}
