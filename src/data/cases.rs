use crate::choropleth::{normalize, Year};
use crate::error::LoadError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header of the department-name column
pub const DEPARTMENT_COLUMN: &str = "Departamentos";

/// One dataset row: a department and its count per supported year
#[derive(Clone, Debug)]
pub struct CaseRecord {
    /// Normalized department name
    pub department: String,
    /// Indexed like [`Year::SUPPORTED`]; `None` where the cell was empty
    pub counts: [Option<u64>; Year::COUNT],
}

impl CaseRecord {
    pub fn count(&self, year: Year) -> Option<u64> {
        self.counts[year.index()]
    }
}

/// Case counts keyed by normalized department name
#[derive(Clone, Debug, Default)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
    index: HashMap<String, usize>,
}

impl CaseTable {
    /// Load the dataset from a CSV file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        let table = Self::from_reader(file)?;
        log::info!(
            "Loaded {} department rows from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV with a `Departamentos` column and one column per supported year
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let department_col = column(DEPARTMENT_COLUMN)?;
        let mut year_cols = [0usize; Year::COUNT];
        for (slot, year) in year_cols.iter_mut().zip(Year::SUPPORTED) {
            *slot = column(&year.to_string())?;
        }

        let mut table = CaseTable::default();
        for (row_no, result) in rdr.records().enumerate() {
            let row = result?;
            let department = normalize(row.get(department_col).unwrap_or_default());
            if department.is_empty() {
                log::warn!("Skipping CSV line {} with an empty department name", row_no + 2);
                continue;
            }

            let mut counts = [None; Year::COUNT];
            for ((count, &col), year) in counts.iter_mut().zip(&year_cols).zip(Year::SUPPORTED) {
                let raw = row.get(col).unwrap_or_default();
                *count = parse_count(raw).ok_or_else(|| LoadError::InvalidCount {
                    department: department.clone(),
                    year: year.get(),
                    value: raw.to_string(),
                })?;
            }

            table.push(CaseRecord { department, counts });
        }

        for record in table.records.iter().take(5) {
            log::debug!("{:<16} {:?}", record.department, record.counts);
        }

        Ok(table)
    }

    /// Append a record; the first record for a department wins lookups
    fn push(&mut self, record: CaseRecord) {
        let idx = self.records.len();
        if self.index.contains_key(&record.department) {
            log::warn!(
                "Duplicate department {:?}; keeping the first row",
                record.department
            );
        } else {
            self.index.insert(record.department.clone(), idx);
        }
        self.records.push(record);
    }

    /// Case count for `department` in `year`.
    ///
    /// The name is normalized before matching. `None` when the department has
    /// no row or its cell for that year is empty.
    pub fn lookup(&self, department: &str, year: Year) -> Option<u64> {
        self.index
            .get(&normalize(department))
            .and_then(|&idx| self.records[idx].count(year))
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Empty cells are `Some(None)`; unparseable cells are `None`
fn parse_count(raw: &str) -> Option<Option<u64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Some(Some(n));
    }
    // Spreadsheet exports sometimes write whole counts as `123.0`
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| Some(f as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Departamentos,2019,2020,2021,2022,2023,2024";

    fn parse(body: &str) -> Result<CaseTable, LoadError> {
        CaseTable::from_reader(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn test_lookup_normalizes_both_sides() {
        let table = parse("  madre de dios ,1,2,3,4,5,6\n").unwrap();
        let y2024 = Year::new(2024).unwrap();
        assert_eq!(table.lookup("Madre de Dios", y2024), Some(6));
        assert_eq!(table.lookup("MADRE DE DIOS  ", Year::first()), Some(1));
        assert_eq!(table.lookup("MADRE", Year::first()), None);
    }

    #[test]
    fn test_duplicate_first_wins() {
        let table = parse("LIMA,10,0,0,0,0,0\nlima,99,0,0,0,0,0\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("LIMA", Year::first()), Some(10));
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let table = parse("TUMBES,5,,7,8,9,10\n").unwrap();
        assert_eq!(table.lookup("TUMBES", Year::new(2020).unwrap()), None);
        assert_eq!(table.lookup("TUMBES", Year::new(2021).unwrap()), Some(7));
    }

    #[test]
    fn test_short_row_is_missing() {
        let table = parse("TUMBES,5,6\n").unwrap();
        assert_eq!(table.lookup("TUMBES", Year::new(2020).unwrap()), Some(6));
        assert_eq!(table.lookup("TUMBES", Year::new(2024).unwrap()), None);
    }

    #[test]
    fn test_whole_float_accepted() {
        let table = parse("ICA,12.0,0,0,0,0,0\n").unwrap();
        assert_eq!(table.lookup("ICA", Year::first()), Some(12));
    }

    #[test]
    fn test_invalid_count_rejected() {
        let err = parse("ICA,12.5,0,0,0,0,0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidCount { ref department, year: 2019, .. } if department == "ICA"
        ));
        assert!(parse("ICA,-3,0,0,0,0,0\n").is_err());
        assert!(parse("ICA,n/a,0,0,0,0,0\n").is_err());
    }

    #[test]
    fn test_missing_columns() {
        let err = CaseTable::from_reader("Region,2019\nLIMA,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == DEPARTMENT_COLUMN));

        let err = CaseTable::from_reader("Departamentos,2019,2020\nLIMA,1,2\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "2021"));
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let csv = "2024,Codigo,2023,2022,Departamentos,2021,2020,2019\n6,X,5,4,PIURA,3,2,1\n";
        let table = CaseTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.lookup("piura", Year::first()), Some(1));
        assert_eq!(table.lookup("piura", Year::new(2024).unwrap()), Some(6));
    }

    #[test]
    fn test_blank_department_skipped() {
        let table = parse(" ,1,1,1,1,1,1\nLORETO,2,2,2,2,2,2\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("", Year::first()), None);
    }
}
