use crate::choropleth::normalize;
use crate::error::LoadError;
use crate::geo::{Bounds, Polygon};
use geojson::{FeatureCollection, GeoJson, Geometry, Value};
use glam::DVec2;
use std::fs;
use std::path::Path;

/// Feature property carrying the department name
pub const NAME_PROPERTY: &str = "NOMBDEP";

/// One region of the boundary file
#[derive(Clone, Debug)]
pub struct Department {
    /// `NOMBDEP` exactly as written in the file
    pub name: String,
    /// Normalized join key
    pub key: String,
    pub polygons: Vec<Polygon>,
    pub bounds: Option<Bounds>,
    /// Where the name label goes
    pub anchor: DVec2,
}

impl Department {
    fn new(name: String, polygons: Vec<Polygon>) -> Self {
        let bounds = polygons
            .iter()
            .filter_map(|p| Bounds::of(&p.exterior))
            .reduce(Bounds::union);
        let anchor = polygons
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .map_or_else(|| bounds.map_or(DVec2::ZERO, |b| b.center()), Polygon::centroid);

        Self {
            key: normalize(&name),
            name,
            polygons,
            bounds,
            anchor,
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        self.bounds.is_some_and(|b| b.contains(p)) && self.polygons.iter().any(|poly| poly.contains(p))
    }
}

/// Parsed boundary file.
///
/// `departments[i]` was built from `collection.features[i]`.
#[derive(Clone, Debug)]
pub struct Boundaries {
    pub collection: FeatureCollection,
    pub departments: Vec<Department>,
}

impl Boundaries {
    /// Load a GeoJSON FeatureCollection from disk
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
        let boundaries = Self::from_slice(&mut bytes)?;
        log::info!(
            "Loaded {} boundary features from {}",
            boundaries.departments.len(),
            path.display()
        );
        Ok(boundaries)
    }

    /// Parse GeoJSON bytes. simd-json parses in place, hence `&mut`.
    pub fn from_slice(bytes: &mut [u8]) -> Result<Self, LoadError> {
        let value: serde_json::Value = simd_json::serde::from_slice(bytes)?;
        let GeoJson::FeatureCollection(collection) = GeoJson::from_json_value(value)? else {
            return Err(LoadError::NotFeatureCollection);
        };

        let departments = collection
            .features
            .iter()
            .enumerate()
            .map(|(idx, feature)| {
                let name = match feature.property(NAME_PROPERTY).and_then(|v| v.as_str()) {
                    Some(name) => name.to_string(),
                    None => {
                        log::warn!("Feature {idx} has no string {NAME_PROPERTY}; it will render as unmatched");
                        String::new()
                    }
                };
                let mut polygons = Vec::new();
                if let Some(geometry) = &feature.geometry {
                    collect_polygons(geometry, &mut polygons);
                }
                Department::new(name, polygons)
            })
            .collect();

        Ok(Self {
            collection,
            departments,
        })
    }

    /// Bounds over every department; `None` when no geometry was loaded
    pub fn bounds(&self) -> Option<Bounds> {
        self.departments
            .iter()
            .filter_map(|d| d.bounds)
            .reduce(Bounds::union)
    }

    pub fn len(&self) -> usize {
        self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}

/// Gather polygonal parts; lines and points carry no area
fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon>) {
    match &geometry.value {
        Value::Polygon(rings) => out.extend(Polygon::from_rings(rings)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| Polygon::from_rings(rings)));
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two unit-ish squares side by side plus one feature without a name
    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "properties": {"NOMBDEP": "LIMA"},
         "geometry": {"type": "Polygon", "coordinates": [[[-77,-12],[-76,-12],[-76,-11],[-77,-11],[-77,-12]]]}},
        {"type": "Feature", "properties": {"NOMBDEP": " Piura "},
         "geometry": {"type": "MultiPolygon", "coordinates": [
            [[[-76,-12],[-75,-12],[-75,-11],[-76,-11],[-76,-12]]],
            [[[-80,-5],[-79.5,-5],[-79.5,-4.5],[-80,-4.5],[-80,-5]]]
         ]}},
        {"type": "Feature", "properties": {"OTHER": 1},
         "geometry": {"type": "Point", "coordinates": [-70, -15]}}
      ]
    }"#;

    pub(crate) fn sample() -> Boundaries {
        let mut bytes = SAMPLE.as_bytes().to_vec();
        Boundaries::from_slice(&mut bytes).unwrap()
    }

    #[test]
    fn test_departments_follow_feature_order() {
        let b = sample();
        assert_eq!(b.len(), 3);
        assert_eq!(b.collection.features.len(), 3);
        assert_eq!(b.departments[0].key, "LIMA");
        assert_eq!(b.departments[1].name, " Piura ");
        assert_eq!(b.departments[1].key, "PIURA");
        assert_eq!(b.departments[1].polygons.len(), 2);
    }

    #[test]
    fn test_missing_name_is_kept_empty() {
        let b = sample();
        let nameless = &b.departments[2];
        assert!(nameless.name.is_empty());
        assert!(nameless.polygons.is_empty());
        assert!(nameless.bounds.is_none());
    }

    #[test]
    fn test_contains_and_bounds() {
        let b = sample();
        assert!(b.departments[0].contains(DVec2::new(-76.5, -11.5)));
        assert!(!b.departments[0].contains(DVec2::new(-75.5, -11.5)));
        assert!(b.departments[1].contains(DVec2::new(-79.7, -4.7)));

        let bounds = b.bounds().unwrap();
        assert_eq!(bounds.min, DVec2::new(-80.0, -12.0));
        assert_eq!(bounds.max, DVec2::new(-75.0, -4.5));
    }

    #[test]
    fn test_anchor_in_largest_part() {
        let b = sample();
        let anchor = b.departments[1].anchor;
        assert!((anchor.x + 75.5).abs() < 1e-9);
        assert!((anchor.y + 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_collection() {
        let mut bytes = br#"{"type": "Point", "coordinates": [0, 0]}"#.to_vec();
        assert!(matches!(
            Boundaries::from_slice(&mut bytes),
            Err(LoadError::NotFeatureCollection)
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let mut bytes = b"{\"type\": ".to_vec();
        assert!(matches!(Boundaries::from_slice(&mut bytes), Err(LoadError::Json(_))));
    }
}
