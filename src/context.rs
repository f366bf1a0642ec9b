use crate::choropleth::{self, StyleResult, ThresholdTable, Year, DENSITY_TIERS};
use crate::data::{Boundaries, CaseTable};
use crate::error::LoadError;
use std::path::Path;

/// Everything loaded at startup, read-only for the whole session
pub struct MapContext {
    pub cases: CaseTable,
    pub boundaries: Boundaries,
    pub thresholds: ThresholdTable,
}

impl MapContext {
    pub fn new(cases: CaseTable, boundaries: Boundaries) -> Self {
        Self {
            cases,
            boundaries,
            thresholds: DENSITY_TIERS,
        }
    }

    /// Read both input files; any failure aborts startup
    pub fn load(cases_path: &Path, boundaries_path: &Path) -> Result<Self, LoadError> {
        let cases = CaseTable::load(cases_path)?;
        let boundaries = Boundaries::load(boundaries_path)?;

        let ctx = Self::new(cases, boundaries);
        for year in Year::SUPPORTED {
            let unmatched: Vec<&str> = ctx
                .boundaries
                .departments
                .iter()
                .filter(|d| ctx.case_count(&d.key, year).is_none())
                .map(|d| d.name.as_str())
                .collect();
            if !unmatched.is_empty() {
                log::debug!("{year}: no case data for {unmatched:?}");
            }
        }
        Ok(ctx)
    }

    pub fn classify(&self, department: &str, year: Year) -> StyleResult {
        choropleth::classify(&self.cases, &self.thresholds, department, year)
    }

    pub fn case_count(&self, department: &str, year: Year) -> Option<u64> {
        self.cases.lookup(department, year)
    }

    /// One style per boundary feature, in file order
    pub fn style_assignment(&self, year: Year) -> Vec<StyleResult> {
        self.boundaries
            .departments
            .iter()
            .map(|d| {
                if d.key.is_empty() {
                    StyleResult::UNMATCHED
                } else {
                    self.classify(&d.key, year)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choropleth::Rgb;
    use crate::data::sample_boundaries;

    fn context() -> MapContext {
        let csv = "Departamentos,2019,2020,2021,2022,2023,2024\n\
                   LIMA,2000,40,,0,0,0\n\
                   piura,150,1200,0,0,0,0\n";
        MapContext::new(CaseTable::from_reader(csv.as_bytes()).unwrap(), sample_boundaries())
    }

    #[test]
    fn test_assignment_matches_features() {
        let ctx = context();
        let styles = ctx.style_assignment(Year::first());
        assert_eq!(styles.len(), 3);
        assert_eq!(styles[0].fill_color, Rgb::hex(0xFF0000));
        assert_eq!(styles[1].fill_color, Rgb::hex(0xFFE400));
        assert!(styles[2].is_unmatched());
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let ctx = context();
        for year in Year::SUPPORTED {
            let a = serde_json::to_string(&ctx.style_assignment(year)).unwrap();
            let b = serde_json::to_string(&ctx.style_assignment(year)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_every_year_renders_without_data() {
        let ctx = MapContext::new(CaseTable::default(), sample_boundaries());
        for year in Year::SUPPORTED {
            let styles = ctx.style_assignment(year);
            assert_eq!(styles.len(), ctx.boundaries.len());
            assert!(styles.iter().all(StyleResult::is_unmatched));
        }
    }

    #[test]
    fn test_absent_year_value_is_unmatched() {
        let ctx = context();
        let styles = ctx.style_assignment(Year::new(2021).unwrap());
        assert!(styles[0].is_unmatched());
        assert_eq!(styles[1].fill_color, ctx.thresholds.floor());
    }
}
