//! EPSG codes and proj definition lookup.

use std::borrow::Cow;
use std::fmt;

/// WGS84 geographic, the default input SRS.
pub const EPSG_WGS84: u32 = 4326;
/// Spherical (web) mercator.
pub const EPSG_WEB_MERCATOR: u32 = 3857;

/// An EPSG coordinate reference system code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpsgCode(u32);

impl EpsgCode {
    pub const WGS84: EpsgCode = EpsgCode(EPSG_WGS84);
    pub const WEB_MERCATOR: EpsgCode = EpsgCode(EPSG_WEB_MERCATOR);

    pub fn new(code: u32) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    /// Resolve the proj definition string for this code.
    ///
    /// Returns `None` for codes missing from the built-in table.
    pub fn proj_string(&self) -> Option<Cow<'static, str>> {
        let def = match self.0 {
            4326 => "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs",
            4258 => "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs",
            4269 => "+proj=longlat +ellps=GRS80 +datum=NAD83 +no_defs",
            3857 | 900913 | 3785 | 102100 => {
                "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs"
            }
            3395 => "+proj=merc +lon_0=0 +k=1 +x_0=0 +y_0=0 +ellps=WGS84 +datum=WGS84 +units=m +no_defs",
            2154 => {
                "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"
            }
            27700 => {
                "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 +units=m +no_defs"
            }
            3035 => {
                "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"
            }
            5070 => {
                "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +ellps=GRS80 +datum=NAD83 +units=m +no_defs"
            }
            3413 => {
                "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +ellps=WGS84 +datum=WGS84 +units=m +no_defs"
            }
            3031 => {
                "+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +ellps=WGS84 +datum=WGS84 +units=m +no_defs"
            }
            code => return utm_proj_string(code).map(Cow::Owned),
        };
        Some(Cow::Borrowed(def))
    }

    /// True for geographic (degree based) systems.
    pub fn is_geographic(&self) -> bool {
        matches!(self.0, 4326 | 4258 | 4269)
    }
}

/// WGS84 / UTM zones: 326zz north, 327zz south.
fn utm_proj_string(code: u32) -> Option<String> {
    let (zone, south) = match code {
        32601..=32660 => (code - 32600, false),
        32701..=32760 => (code - 32700, true),
        _ => return None,
    };
    let hemisphere = if south { " +south" } else { "" };
    Some(format!(
        "+proj=utm +zone={zone}{hemisphere} +ellps=WGS84 +datum=WGS84 +units=m +no_defs"
    ))
}

impl fmt::Display for EpsgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_resolve() {
        for code in [4326, 4258, 4269, 3857, 900913, 3395, 2154, 27700, 3035, 5070, 3413, 3031] {
            assert!(
                EpsgCode::new(code).proj_string().is_some(),
                "EPSG:{code} should resolve"
            );
        }
    }

    #[test]
    fn test_utm_zones() {
        let north = EpsgCode::new(32631).proj_string().unwrap();
        assert!(north.contains("+zone=31"));
        assert!(!north.contains("+south"));

        let south = EpsgCode::new(32733).proj_string().unwrap();
        assert!(south.contains("+zone=33 +south"));

        assert!(EpsgCode::new(32600).proj_string().is_none());
        assert!(EpsgCode::new(32661).proj_string().is_none());
    }

    #[test]
    fn test_unknown_code() {
        assert!(EpsgCode::new(99999).proj_string().is_none());
    }

    #[test]
    fn test_display_and_geographic() {
        assert_eq!(EpsgCode::WGS84.to_string(), "EPSG:4326");
        assert!(EpsgCode::WGS84.is_geographic());
        assert!(!EpsgCode::WEB_MERCATOR.is_geographic());
    }
}
