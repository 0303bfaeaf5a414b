use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::ConfigError;

/// PROJ.4 definitions for the references this tool is normally run with.
const KNOWN_EPSG: &[(u32, &str)] = &[
    (4326, "+proj=longlat +datum=WGS84 +no_defs +type=crs"),
    (4269, "+proj=longlat +datum=NAD83 +no_defs +type=crs"),
    // NAD83 / New York Long Island (ftUS)
    (2263, "+proj=lcc +lat_0=40.1666666666667 +lon_0=-74 +lat_1=41.0333333333333 +lat_2=40.6666666666667 \
            +x_0=300000 +y_0=0 +datum=NAD83 +units=us-ft +no_defs +type=crs"),
    // NAD83 / Conus Albers (equal area)
    (5070, "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +datum=NAD83 +units=m +no_defs +type=crs"),
    (26918, "+proj=utm +zone=18 +datum=NAD83 +units=m +no_defs +type=crs"),
    (32618, "+proj=utm +zone=18 +datum=WGS84 +units=m +no_defs +type=crs"),
];

/// Substrings of projected (`PROJCS`) `.prj` names mapped to the EPSG codes above.
const PROJECTED_PRJ_NAMES: &[(&str, u32)] = &[
    ("StatePlane_New_York_Long_Island_FIPS_3104_Feet", 2263),
    ("New_York_Long_Island_ftUS", 2263),
    ("New York Long Island (ftUS)", 2263),
    ("Conus_Albers", 5070),
    ("NAD_1983_UTM_Zone_18N", 26918),
    ("WGS_1984_UTM_Zone_18N", 32618),
];

/// Names of geographic (`GEOGCS`) `.prj` files. Only consulted for top-level `GEOGCS`,
/// since every `PROJCS` embeds one of these.
const GEOGRAPHIC_PRJ_NAMES: &[(&str, u32)] = &[
    ("GCS_WGS_1984", 4326),
    ("GCS_North_American_1983", 4269),
];

/// A coordinate reference, kept as a PROJ.4 definition plus the label it was given by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    label: String,
    definition: String,
}

impl Crs {
    /// Parse `EPSG:<code>` (from the built-in table) or a raw `+proj=` definition.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if s.starts_with("+proj=") {
            return Ok(Self { label: s.to_string(), definition: s.to_string() });
        }

        let code = s.get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("epsg:"))
            .and_then(|_| s[5..].trim().parse::<u32>().ok())
            .ok_or_else(|| ConfigError::UnknownCrs(s.to_string()))?;

        Self::from_epsg(code).ok_or_else(|| ConfigError::UnknownCrs(s.to_string()))
    }

    /// Look up an EPSG code in the built-in table.
    pub fn from_epsg(code: u32) -> Option<Self> {
        KNOWN_EPSG.iter()
            .find(|(known, _)| *known == code)
            .map(|(_, definition)| Self {
                label: format!("EPSG:{code}"),
                definition: definition.split_whitespace().collect::<Vec<_>>().join(" "),
            })
    }

    /// Recognize the reference named in an ESRI `.prj` file.
    ///
    /// Names are looked up in the table matching the top-level keyword, so a projected
    /// reference that is not in the table yields `None` rather than its base datum.
    pub fn from_prj_wkt(wkt: &str) -> Option<Self> {
        let wkt = wkt.trim_start_matches('\u{feff}').trim_start();
        let names = if wkt.starts_with("PROJCS") {
            PROJECTED_PRJ_NAMES
        } else if wkt.starts_with("GEOGCS") {
            GEOGRAPHIC_PRJ_NAMES
        } else {
            return None;
        };

        names.iter()
            .find(|(name, _)| wkt.contains(name))
            .and_then(|(_, code)| Self::from_epsg(*code))
    }

    #[inline] pub fn label(&self) -> &str { &self.label }

    #[inline] pub fn definition(&self) -> &str { &self.definition }

    /// True for lon/lat references, whose coordinates are degrees rather than planar units.
    pub fn is_geographic(&self) -> bool {
        self.definition.split_whitespace()
            .any(|token| token == "+proj=longlat" || token == "+proj=latlong")
    }

    fn build(&self) -> Result<Proj4, ConfigError> {
        Proj4::from_proj_string(&self.definition)
            .map_err(|e| ConfigError::Projection { definition: self.definition.clone(), reason: e.to_string() })
    }
}

/// Transforms MultiPolygons from one reference into another.
pub(crate) struct Reprojector {
    from: Proj4,
    to: Proj4,
    from_geographic: bool,
    to_geographic: bool,
    identity: bool,
}

impl Reprojector {
    pub(crate) fn new(from: &Crs, to: &Crs) -> Result<Self, ConfigError> {
        Ok(Self {
            from: from.build()?,
            to: to.build()?,
            from_geographic: from.is_geographic(),
            to_geographic: to.is_geographic(),
            identity: from.definition == to.definition,
        })
    }

    /// True when source and target are the same reference and shapes pass through untouched.
    #[inline] pub(crate) fn is_identity(&self) -> bool { self.identity }

    /// Reproject one shape. Geographic coordinates go in and come out as degrees.
    pub(crate) fn project(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, String> {
        if self.identity { return Ok(shape.clone()) }

        shape.try_map_coords(|coord: Coord<f64>| {
            let mut point = if self.from_geographic {
                (coord.x.to_radians(), coord.y.to_radians(), 0.0)
            } else {
                (coord.x, coord.y, 0.0)
            };
            transform(&self.from, &self.to, &mut point)
                .map_err(|e| format!("({}, {}): {e}", coord.x, coord.y))?;

            Ok(if self.to_geographic {
                Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
            } else {
                Coord { x: point.0, y: point.1 }
            })
        })
    }
}
