// Static US state geography: full name, postal abbreviation, and a label
// coordinate used to anchor map annotations. Loaded once, never mutated.
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateInfo {
    pub name: &'static str,
    pub abbr: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub static STATES: &[StateInfo] = &[
    StateInfo { name: "Alabama", abbr: "AL", lat: 32.8, lon: -86.8 },
    StateInfo { name: "Alaska", abbr: "AK", lat: 64.0, lon: -152.0 },
    StateInfo { name: "Arizona", abbr: "AZ", lat: 34.2, lon: -111.6 },
    StateInfo { name: "Arkansas", abbr: "AR", lat: 34.8, lon: -92.2 },
    StateInfo { name: "California", abbr: "CA", lat: 37.2, lon: -119.3 },
    StateInfo { name: "Colorado", abbr: "CO", lat: 39.0, lon: -105.5 },
    StateInfo { name: "Connecticut", abbr: "CT", lat: 41.6, lon: -72.7 },
    StateInfo { name: "Delaware", abbr: "DE", lat: 39.0, lon: -75.5 },
    StateInfo { name: "District of Columbia", abbr: "DC", lat: 38.9, lon: -77.0 },
    StateInfo { name: "Florida", abbr: "FL", lat: 28.6, lon: -82.4 },
    StateInfo { name: "Georgia", abbr: "GA", lat: 32.6, lon: -83.4 },
    StateInfo { name: "Hawaii", abbr: "HI", lat: 20.3, lon: -156.4 },
    StateInfo { name: "Idaho", abbr: "ID", lat: 44.4, lon: -114.6 },
    StateInfo { name: "Illinois", abbr: "IL", lat: 40.0, lon: -89.2 },
    StateInfo { name: "Indiana", abbr: "IN", lat: 39.9, lon: -86.3 },
    StateInfo { name: "Iowa", abbr: "IA", lat: 42.0, lon: -93.5 },
    StateInfo { name: "Kansas", abbr: "KS", lat: 38.5, lon: -98.4 },
    StateInfo { name: "Kentucky", abbr: "KY", lat: 37.5, lon: -85.3 },
    StateInfo { name: "Louisiana", abbr: "LA", lat: 31.0, lon: -92.0 },
    StateInfo { name: "Maine", abbr: "ME", lat: 45.4, lon: -69.2 },
    StateInfo { name: "Maryland", abbr: "MD", lat: 39.0, lon: -76.8 },
    StateInfo { name: "Massachusetts", abbr: "MA", lat: 42.3, lon: -71.8 },
    StateInfo { name: "Michigan", abbr: "MI", lat: 44.3, lon: -85.4 },
    StateInfo { name: "Minnesota", abbr: "MN", lat: 46.3, lon: -94.3 },
    StateInfo { name: "Mississippi", abbr: "MS", lat: 32.7, lon: -89.7 },
    StateInfo { name: "Missouri", abbr: "MO", lat: 38.4, lon: -92.5 },
    StateInfo { name: "Montana", abbr: "MT", lat: 47.0, lon: -109.6 },
    StateInfo { name: "Nebraska", abbr: "NE", lat: 41.5, lon: -99.8 },
    StateInfo { name: "Nevada", abbr: "NV", lat: 39.3, lon: -116.6 },
    StateInfo { name: "New Hampshire", abbr: "NH", lat: 43.7, lon: -71.6 },
    StateInfo { name: "New Jersey", abbr: "NJ", lat: 40.2, lon: -74.7 },
    StateInfo { name: "New Mexico", abbr: "NM", lat: 34.4, lon: -106.1 },
    StateInfo { name: "New York", abbr: "NY", lat: 42.9, lon: -75.5 },
    StateInfo { name: "North Carolina", abbr: "NC", lat: 35.5, lon: -79.4 },
    StateInfo { name: "North Dakota", abbr: "ND", lat: 47.4, lon: -100.5 },
    StateInfo { name: "Ohio", abbr: "OH", lat: 40.3, lon: -82.8 },
    StateInfo { name: "Oklahoma", abbr: "OK", lat: 35.6, lon: -97.5 },
    StateInfo { name: "Oregon", abbr: "OR", lat: 43.9, lon: -120.6 },
    StateInfo { name: "Pennsylvania", abbr: "PA", lat: 40.9, lon: -77.8 },
    StateInfo { name: "Rhode Island", abbr: "RI", lat: 41.7, lon: -71.6 },
    StateInfo { name: "South Carolina", abbr: "SC", lat: 33.9, lon: -80.9 },
    StateInfo { name: "South Dakota", abbr: "SD", lat: 44.4, lon: -100.2 },
    StateInfo { name: "Tennessee", abbr: "TN", lat: 35.9, lon: -86.4 },
    StateInfo { name: "Texas", abbr: "TX", lat: 31.5, lon: -99.3 },
    StateInfo { name: "Utah", abbr: "UT", lat: 39.3, lon: -111.7 },
    StateInfo { name: "Vermont", abbr: "VT", lat: 44.1, lon: -72.7 },
    StateInfo { name: "Virginia", abbr: "VA", lat: 37.5, lon: -78.9 },
    StateInfo { name: "Washington", abbr: "WA", lat: 47.4, lon: -120.4 },
    StateInfo { name: "West Virginia", abbr: "WV", lat: 38.6, lon: -80.6 },
    StateInfo { name: "Wisconsin", abbr: "WI", lat: 44.6, lon: -89.9 },
    StateInfo { name: "Wyoming", abbr: "WY", lat: 43.0, lon: -107.6 },
];

static BY_NAME: Lazy<HashMap<String, &'static StateInfo>> = Lazy::new(|| {
    STATES.iter().map(|s| (s.name.to_lowercase(), s)).collect()
});

static BY_ABBR: Lazy<HashMap<String, &'static StateInfo>> = Lazy::new(|| {
    STATES.iter().map(|s| (s.abbr.to_string(), s)).collect()
});

/// Abbreviation for a full state name, if the state is known.
pub fn abbr_for(name: &str) -> Option<&'static str> {
    BY_NAME.get(&name.trim().to_lowercase()).map(|s| s.abbr)
}

/// Full state name for a clicked map label. Accepts either a two-letter
/// abbreviation or a full name, case-insensitively; `None` means the click
/// does not resolve and must be ignored.
pub fn name_for(label: &str) -> Option<&'static str> {
    let label = label.trim();
    if let Some(s) = BY_ABBR.get(&label.to_uppercase()) {
        return Some(s.name);
    }
    BY_NAME.get(&label.to_lowercase()).map(|s| s.name)
}

/// Label anchor coordinate for an abbreviation.
pub fn label_coords(abbr: &str) -> Option<(f64, f64)> {
    BY_ABBR.get(&abbr.trim().to_uppercase()).map(|s| (s.lat, s.lon))
}
