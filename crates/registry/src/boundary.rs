// County/district boundaries decoded from the registry's TopoJSON export.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::RegistryError;

/// Object keys tried, in order, inside the topology.
pub const BOUNDARY_OBJECT_KEYS: [&str; 2] = ["liberia-district-boundary", "liberia"];

pub type Point = (f64, f64);
pub type Ring = Vec<Point>;

/// Which feature properties name the county and the district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySchema {
    pub county_property: String,
    pub district_property: String,
}

impl Default for BoundarySchema {
    fn default() -> Self {
        Self {
            county_property: "county".to_string(),
            district_property: "district".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionalityBand {
    Low,
    Medium,
    High,
}

impl FunctionalityBand {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn from_score(score: u8) -> Self {
        if score < 40 {
            Self::Low
        } else if score < 70 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn legend(self) -> &'static str {
        match self {
            Self::Low => "0-40%",
            Self::Medium => "40-70%",
            Self::High => "70-100%",
        }
    }

    /// Fill colour as RGB, darkest for the lowest band.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Low => (0x0d, 0x4f, 0x2d),
            Self::Medium => (0x2d, 0x86, 0x59),
            Self::High => (0x5c, 0xb8, 0x5c),
        }
    }
}

/// 32-bit `h = h * 31 + unit` over the UTF-16 code units of `name`.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Synthetic functionality percentage in 25..=85, stable for a given name.
pub fn functionality_score(name: &str) -> u8 {
    let spread = i64::from(name_hash(name)).abs() % 61;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let spread = spread as u8;
    25 + spread
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub county: String,
    pub district: String,
    pub functionality: u8,
    pub rings: Vec<Ring>,
}

impl BoundaryFeature {
    pub const fn band(&self) -> FunctionalityBand {
        FunctionalityBand::from_score(self.functionality)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundaries {
    pub features: Vec<BoundaryFeature>,
    /// Sorted, de-duplicated county names.
    pub counties: Vec<String>,
}

impl Boundaries {
    fn from_features(features: Vec<BoundaryFeature>) -> Self {
        let mut counties: Vec<String> = features.iter().map(|f| f.county.clone()).collect();
        counties.sort();
        counties.dedup();
        Self { features, counties }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self
            .features
            .iter()
            .flat_map(|feature| feature.rings.iter().flatten());
        let first = *points.next()?;
        let bounds = points.fold(
            Bounds {
                min: first,
                max: first,
            },
            |acc, &(x, y)| Bounds {
                min: (acc.min.0.min(x), acc.min.1.min(y)),
                max: (acc.max.0.max(x), acc.max.1.max(y)),
            },
        );
        Some(bounds)
    }

    pub fn in_county<'a>(&'a self, county: &'a str) -> impl Iterator<Item = &'a BoundaryFeature> {
        self.features
            .iter()
            .filter(move |feature| feature.county.eq_ignore_ascii_case(county))
    }
}

#[derive(Debug, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct Topology {
    objects: Map<String, Value>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    transform: Option<Transform>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Map<String, Value>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Map<String, Value>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<GeoFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<GeoGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

fn to_point(position: &[f64]) -> Option<Point> {
    match position {
        [x, y, ..] => Some((*x, *y)),
        _ => None,
    }
}

/// Undo quantization and delta encoding for every arc up front.
fn decode_arcs(topology: &Topology) -> Vec<Ring> {
    topology
        .arcs
        .iter()
        .map(|arc| match &topology.transform {
            Some(transform) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter_map(|position| to_point(position))
                    .map(|(dx, dy)| {
                        x += dx;
                        y += dy;
                        (
                            x.mul_add(transform.scale[0], transform.translate[0]),
                            y.mul_add(transform.scale[1], transform.translate[1]),
                        )
                    })
                    .collect()
            }
            None => arc.iter().filter_map(|position| to_point(position)).collect(),
        })
        .collect()
}

/// Stitch arc references into one ring; `!i` means arc `i` reversed.
fn stitch_ring(arcs: &[Ring], references: &[i64]) -> Result<Ring, RegistryError> {
    let mut ring: Ring = Vec::new();
    for &reference in references {
        let (index, reversed) = if reference < 0 {
            (!reference, true)
        } else {
            (reference, false)
        };
        let arc = usize::try_from(index)
            .ok()
            .and_then(|index| arcs.get(index))
            .ok_or(RegistryError::InvalidArc(reference))?;

        let mut points = arc.clone();
        if reversed {
            points.reverse();
        }
        // Consecutive arcs share their joining point.
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    Ok(ring)
}

fn property_text(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn build_feature(
    properties: &Map<String, Value>,
    rings: Vec<Ring>,
    schema: &BoundarySchema,
) -> Option<BoundaryFeature> {
    let Some(county) = property_text(properties, &schema.county_property) else {
        warn!(
            property = %schema.county_property,
            "boundary feature has no county property, skipping"
        );
        return None;
    };
    let district =
        property_text(properties, &schema.district_property).unwrap_or_else(|| county.clone());
    let functionality = functionality_score(&district);

    Some(BoundaryFeature {
        county,
        district,
        functionality,
        rings,
    })
}

fn collect_topo(
    geometry: TopoGeometry,
    arcs: &[Ring],
    schema: &BoundarySchema,
    out: &mut Vec<BoundaryFeature>,
) -> Result<(), RegistryError> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for geometry in geometries {
                collect_topo(geometry, arcs, schema, out)?;
            }
        }
        TopoGeometry::Polygon {
            arcs: polygon,
            properties,
        } => {
            let rings = polygon
                .iter()
                .map(|ring| stitch_ring(arcs, ring))
                .collect::<Result<Vec<_>, _>>()?;
            out.extend(build_feature(&properties, rings, schema));
        }
        TopoGeometry::MultiPolygon {
            arcs: polygons,
            properties,
        } => {
            let rings = polygons
                .iter()
                .flatten()
                .map(|ring| stitch_ring(arcs, ring))
                .collect::<Result<Vec<_>, _>>()?;
            out.extend(build_feature(&properties, rings, schema));
        }
        TopoGeometry::Unsupported => debug!("skipping non-polygon boundary geometry"),
    }
    Ok(())
}

fn rings_from_positions(rings: &[Vec<Vec<f64>>]) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| ring.iter().filter_map(|p| to_point(p)).collect())
        .collect()
}

fn parse_topology(document: Value, schema: &BoundarySchema) -> Result<Boundaries, RegistryError> {
    let mut topology: Topology = serde_json::from_value(document)?;
    let Some(key) = BOUNDARY_OBJECT_KEYS
        .iter()
        .find(|key| topology.objects.contains_key(**key))
    else {
        return Err(RegistryError::MissingBoundaryObject {
            available: topology.objects.keys().cloned().collect(),
        });
    };

    let object = topology.objects.remove(*key).unwrap_or(Value::Null);
    let geometry: TopoGeometry = serde_json::from_value(object)?;
    let arcs = decode_arcs(&topology);

    let mut features = Vec::new();
    collect_topo(geometry, &arcs, schema, &mut features)?;
    Ok(Boundaries::from_features(features))
}

fn parse_feature_collection(
    document: Value,
    schema: &BoundarySchema,
) -> Result<Boundaries, RegistryError> {
    let collection: FeatureCollection = serde_json::from_value(document)?;
    let features = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let rings = match feature.geometry? {
                GeoGeometry::Polygon { coordinates } => rings_from_positions(&coordinates),
                GeoGeometry::MultiPolygon { coordinates } => coordinates
                    .iter()
                    .flat_map(|polygon| rings_from_positions(polygon))
                    .collect(),
                GeoGeometry::Unsupported => return None,
            };
            build_feature(&feature.properties.unwrap_or_default(), rings, schema)
        })
        .collect();
    Ok(Boundaries::from_features(features))
}

/// Parse a TopoJSON topology or a GeoJSON feature collection.
pub fn parse_boundaries(body: &str, schema: &BoundarySchema) -> Result<Boundaries, RegistryError> {
    let document: Value = serde_json::from_str(body)?;
    match document.get("type").and_then(Value::as_str) {
        Some("Topology") => parse_topology(document, schema),
        Some("FeatureCollection") => parse_feature_collection(document, schema),
        other => Err(RegistryError::UnsupportedDocument(
            other.unwrap_or("(missing)").to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.5], "translate": [-11.0, 4.0] },
        "arcs": [
            [[0, 0], [2, 0], [0, 2]],
            [[2, 2], [-2, 0], [0, -2]]
        ],
        "objects": {
            "liberia-district-boundary": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]],
                      "properties": { "county": "Montserrado", "district": "Greater Monrovia" } },
                    { "type": "Polygon", "arcs": [[-2, -1]],
                      "properties": { "county": "Bong" } },
                    { "type": "Polygon", "arcs": [[0]],
                      "properties": { "name": "No county here" } },
                    { "type": "LineString", "arcs": [0] }
                ]
            }
        }
    }"#;

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("Bong"), 2_076_390);
        assert_eq!(name_hash("Montserrado"), -229_396_654);
    }

    #[test]
    fn functionality_score_is_deterministic_and_in_range() {
        assert_eq!(functionality_score("Montserrado"), 79);
        assert_eq!(functionality_score("Greater Monrovia"), 44);
        assert_eq!(functionality_score("Bong"), 36);
        for name in ["Lofa", "Nimba", "Grand Bassa", "Sinoe", "River Gee"] {
            let score = functionality_score(name);
            assert!((25..=85).contains(&score), "{name} scored {score}");
            assert_eq!(score, functionality_score(name));
        }
    }

    #[test]
    fn bands_split_at_forty_and_seventy() {
        assert_eq!(FunctionalityBand::from_score(39), FunctionalityBand::Low);
        assert_eq!(FunctionalityBand::from_score(40), FunctionalityBand::Medium);
        assert_eq!(FunctionalityBand::from_score(70), FunctionalityBand::High);
    }

    #[test]
    fn decodes_quantized_topology() {
        let boundaries = parse_boundaries(TOPOLOGY, &BoundarySchema::default()).unwrap();

        assert_eq!(boundaries.features.len(), 2);
        assert_eq!(boundaries.counties, ["Bong", "Montserrado"]);

        let monrovia = &boundaries.features[0];
        assert_eq!(monrovia.district, "Greater Monrovia");
        assert_eq!(monrovia.functionality, 44);
        assert_eq!(
            monrovia.rings[0],
            vec![(-11.0, 4.0), (-10.0, 4.0), (-10.0, 5.0), (-11.0, 5.0), (-11.0, 4.0)]
        );

        let bong = &boundaries.features[1];
        assert_eq!(bong.district, "Bong");
        assert_eq!(bong.rings[0].first(), Some(&(-11.0, 4.0)));
        assert_eq!(bong.rings[0].len(), 5);
    }

    #[test]
    fn falls_back_to_short_object_key() {
        let body = TOPOLOGY.replace("liberia-district-boundary", "liberia");
        let boundaries = parse_boundaries(&body, &BoundarySchema::default()).unwrap();
        assert_eq!(boundaries.features.len(), 2);
    }

    #[test]
    fn missing_object_key_is_reported() {
        let body = TOPOLOGY.replace("liberia-district-boundary", "ghana");
        let error = parse_boundaries(&body, &BoundarySchema::default()).unwrap_err();
        assert!(matches!(
            error,
            RegistryError::MissingBoundaryObject { ref available } if available == &["ghana"]
        ));
    }

    #[test]
    fn custom_schema_reads_other_property_names() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "admin1Name": "Lofa", "admin2Name": "Voinjama" },
                "geometry": { "type": "Polygon",
                              "coordinates": [[[-9.7, 8.4], [-9.6, 8.4], [-9.6, 8.5], [-9.7, 8.4]]] }
            }]
        }"#;
        let schema = BoundarySchema {
            county_property: "admin1Name".to_string(),
            district_property: "admin2Name".to_string(),
        };

        let boundaries = parse_boundaries(body, &schema).unwrap();
        assert_eq!(boundaries.features[0].county, "Lofa");
        assert_eq!(boundaries.features[0].district, "Voinjama");
        assert_eq!(
            boundaries.bounds(),
            Some(Bounds {
                min: (-9.7, 8.4),
                max: (-9.6, 8.5)
            })
        );
    }

    #[test]
    fn dangling_arc_reference_is_an_error() {
        let body = TOPOLOGY.replace("[[0, 1]]", "[[0, 9]]");
        let error = parse_boundaries(&body, &BoundarySchema::default()).unwrap_err();
        assert!(matches!(error, RegistryError::InvalidArc(9)));
    }
}
