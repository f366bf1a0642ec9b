use super::style::Rgb;

/// One legend swatch
#[derive(Clone, Copy, Debug)]
pub struct LegendEntry {
    pub color: Rgb,
    pub label: &'static str,
}

pub const LEGEND_TITLE: &str = "Leyenda";

/// Fixed legend shown over every map.
///
/// Independent of the data. The `50 - 100` swatch has no tier of its own in
/// the ramp; counts in that range render with the `<= 50` color.
pub const LEGEND: [LegendEntry; 7] = [
    LegendEntry { color: Rgb::hex(0xFF0000), label: "> 1500" },
    LegendEntry { color: Rgb::hex(0xFF5900), label: "1000 - 1500" },
    LegendEntry { color: Rgb::hex(0xFF8F00), label: "500 - 1000" },
    LegendEntry { color: Rgb::hex(0xFFB600), label: "300 - 500" },
    LegendEntry { color: Rgb::hex(0xFFE400), label: "100 - 300" },
    LegendEntry { color: Rgb::hex(0xFFF176), label: "50 - 100" },
    LegendEntry { color: Rgb::hex(0xFFF9C1), label: "<= 50" },
];
