//! Real Swedish sites for realistic test fixtures.
//!
//! Coordinates are public places (town centres, malls, arenas) taken from
//! OpenStreetMap, rounded to four decimals.

/// A named site with coordinates.
#[derive(Debug, Clone)]
pub struct Site {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Site {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Stockholm region
// ============================================================================

pub const STOCKHOLM: &[Site] = &[
    Site::new("Mall of Scandinavia", 59.3700, 18.0043),
    Site::new("Kista Galleria", 59.4032, 17.9446),
    Site::new("Täby Centrum", 59.4439, 18.0687),
    Site::new("Nacka Forum", 59.3103, 18.1636),
    Site::new("Skärholmen Centrum", 59.2770, 17.9070),
    Site::new("Barkarby Handelsplats", 59.4190, 17.8620),
    Site::new("Haninge Centrum", 59.1680, 18.1440),
    Site::new("Solna Centrum", 59.3600, 18.0000),
];

// ============================================================================
// Göteborg region
// ============================================================================

pub const GOTEBORG: &[Site] = &[
    Site::new("Nordstan", 57.7089, 11.9690),
    Site::new("Frölunda Torg", 57.6530, 11.9110),
    Site::new("Backaplan", 57.7210, 11.9530),
    Site::new("Mölndal Galleria", 57.6560, 12.0150),
    Site::new("Kungälv Centrum", 57.8710, 11.9800),
    Site::new("Partille Allum", 57.7400, 12.1060),
];

// ============================================================================
// Malmö region
// ============================================================================

pub const MALMO: &[Site] = &[
    Site::new("Emporia", 55.5640, 12.9730),
    Site::new("Mobilia", 55.5900, 13.0010),
    Site::new("Lund Nova", 55.7150, 13.2050),
    Site::new("Burlöv Center", 55.6370, 13.0910),
    Site::new("Trelleborg Centrum", 55.3760, 13.1570),
    Site::new("Vellinge Centrum", 55.4720, 13.0180),
];

// ============================================================================
// Pairs and singles used by scheduling scenarios
// ============================================================================

/// Stockholm and Uppsala city centres.
pub const STOCKHOLM_CITY: Site = Site::new("Stockholm City", 59.33, 18.07);
pub const UPPSALA_CITY: Site = Site::new("Uppsala City", 59.86, 17.64);

/// Far north, well beyond a day trip from the south.
pub const KIRUNA: Site = Site::new("Kiruna", 67.8558, 20.2253);
pub const LULEA: Site = Site::new("Luleå", 65.5848, 22.1547);
pub const UMEA: Site = Site::new("Umeå", 63.8258, 20.2630);
pub const SUNDSVALL: Site = Site::new("Sundsvall", 62.3908, 17.3069);
