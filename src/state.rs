//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::error::LookupError;

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// A country from the directory provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Country {
    /// ISO 3166-1 alpha-2
    pub code: String,
    pub name: String,
}

/// A region/state within the selected country
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// A city within the selected region. Names are not unique, so cities are
/// addressed by their index in the last fetched list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct City {
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions, always fully populated (missing provider fields are 0)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReading {
    pub location_name: String,
    pub country_code: String,
    /// Where the reading was taken (the geocoded point)
    pub coordinate: Coordinate,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
    pub temperature_kelvin: f64,
    pub feels_like_kelvin: f64,
    pub temp_min_kelvin: f64,
    pub temp_max_kelvin: f64,
    pub pressure_hpa: f64,
    pub humidity_percent: f64,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: f64,
    pub cloudiness_percent: f64,
    pub rain_1h_mm: f64,
}

/// Kelvin to Celsius, rounded to one decimal
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 10.0).round() / 10.0
}

/// Kelvin to Fahrenheit, rounded to one decimal
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (((kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0) * 10.0).round() / 10.0
}

/// Temperature unit preference
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn format_kelvin(&self, kelvin: f64) -> String {
        match self {
            TempUnit::Celsius => format!("{:.1}°C", kelvin_to_celsius(kelvin)),
            TempUnit::Fahrenheit => format!("{:.1}°F", kelvin_to_fahrenheit(kelvin)),
        }
    }
}

/// Which entry to select automatically once a list has loaded
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum DefaultChoice {
    /// First entry of the list
    #[default]
    First,
    /// Leave the level unset until the user picks
    Unset,
    /// Entry whose code or name matches (case-insensitive), else the first
    Preferred(String),
}

impl DefaultChoice {
    /// Index to select among `(code, name)` entries, if any
    pub fn pick<'a>(&self, entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Option<usize> {
        let mut entries = entries.into_iter().peekable();
        entries.peek()?;
        match self {
            DefaultChoice::First => Some(0),
            DefaultChoice::Unset => None,
            DefaultChoice::Preferred(wanted) => {
                let wanted = wanted.trim();
                entries
                    .position(|(code, name)| {
                        code.eq_ignore_ascii_case(wanted) || name.eq_ignore_ascii_case(wanted)
                    })
                    .or(Some(0))
            }
        }
    }
}

/// The user's current country/region/city choice
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    pub country: Option<String>,
    pub region: Option<String>,
    /// Index into the current city list
    pub city: Option<usize>,
}

/// How far down the cascade the selection has progressed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SelectionStage {
    Empty,
    CountrySelected,
    RegionSelected,
    CitySelected,
}

/// Focused column of the location picker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum PickerColumn {
    #[default]
    Country,
    Region,
    City,
}

impl PickerColumn {
    pub fn next(self) -> Self {
        match self {
            PickerColumn::Country => PickerColumn::Region,
            PickerColumn::Region => PickerColumn::City,
            PickerColumn::City => PickerColumn::Country,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PickerColumn::Country => PickerColumn::City,
            PickerColumn::Region => PickerColumn::Country,
            PickerColumn::City => PickerColumn::Region,
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Directory lists ---
    #[debug(section = "Directory", label = "Countries", debug_fmt)]
    pub countries: DataResource<Vec<Country>>,

    #[debug(section = "Directory", label = "Regions", debug_fmt)]
    pub regions: DataResource<Vec<Region>>,

    #[debug(section = "Directory", label = "Cities", debug_fmt)]
    pub cities: DataResource<Vec<City>>,

    // --- Selection machine ---
    #[debug(section = "Selection", label = "Current", debug_fmt)]
    pub selection: Selection,

    /// Bumped on every country/region change; fetch results carry the value
    /// they were issued with
    #[debug(section = "Selection", label = "Generation")]
    pub generation: u64,

    /// Generation of the region fetch whose result is still wanted
    #[debug(section = "Selection", label = "Pending regions", debug_fmt)]
    pub pending_regions: Option<u64>,

    /// Generation of the city fetch whose result is still wanted
    #[debug(section = "Selection", label = "Pending cities", debug_fmt)]
    pub pending_cities: Option<u64>,

    #[debug(skip)]
    pub country_default: DefaultChoice,

    #[debug(skip)]
    pub region_default: DefaultChoice,

    #[debug(skip)]
    pub city_default: DefaultChoice,

    // --- Search ---
    /// Last successful reading; kept when a later search fails
    #[debug(section = "Weather", label = "Reading", debug_fmt)]
    pub reading: Option<WeatherReading>,

    #[debug(section = "Weather", label = "Searching")]
    pub searching: bool,

    /// Only the search issued with this generation may publish
    #[debug(section = "Weather", label = "Search generation")]
    pub search_generation: u64,

    #[debug(section = "Weather", label = "Error", debug_fmt)]
    pub search_error: Option<LookupError>,

    #[debug(section = "Weather", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    // --- UI ---
    #[debug(skip)]
    pub focus: PickerColumn,
}

impl AppState {
    /// Create state with the given default-selection rules
    pub fn new(
        country_default: DefaultChoice,
        region_default: DefaultChoice,
        city_default: DefaultChoice,
    ) -> Self {
        Self {
            countries: DataResource::Empty,
            regions: DataResource::Empty,
            cities: DataResource::Empty,
            selection: Selection::default(),
            generation: 0,
            pending_regions: None,
            pending_cities: None,
            country_default,
            region_default,
            city_default,
            reading: None,
            searching: false,
            search_generation: 0,
            search_error: None,
            unit: TempUnit::default(),
            focus: PickerColumn::default(),
        }
    }

    pub fn country_list(&self) -> &[Country] {
        self.countries.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn region_list(&self) -> &[Region] {
        self.regions.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn city_list(&self) -> &[City] {
        self.cities.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_region(&self) -> Option<&Region> {
        let code = self.selection.region.as_deref()?;
        self.region_list().iter().find(|r| r.code == code)
    }

    pub fn selected_city(&self) -> Option<&City> {
        self.city_list().get(self.selection.city?)
    }

    /// Name of the selected city, if the selection is complete
    pub fn city_name(&self) -> Option<&str> {
        self.selected_city().map(|c| c.name.as_str())
    }

    pub fn stage(&self) -> SelectionStage {
        match (
            self.selection.country.is_some(),
            self.selection.region.is_some(),
            self.selected_city().is_some(),
        ) {
            (true, true, true) => SelectionStage::CitySelected,
            (true, true, false) => SelectionStage::RegionSelected,
            (true, false, _) => SelectionStage::CountrySelected,
            (false, _, _) => SelectionStage::Empty,
        }
    }

    /// True while no list fetch is outstanding
    pub fn is_settled(&self) -> bool {
        !self.countries.is_loading()
            && self.pending_regions.is_none()
            && self.pending_cities.is_none()
    }

    /// Index of the highlighted entry in a picker column
    pub fn column_index(&self, column: PickerColumn) -> Option<usize> {
        match column {
            PickerColumn::Country => {
                let code = self.selection.country.as_deref()?;
                self.country_list().iter().position(|c| c.code == code)
            }
            PickerColumn::Region => {
                let code = self.selection.region.as_deref()?;
                self.region_list().iter().position(|r| r.code == code)
            }
            PickerColumn::City => self.selected_city().and(self.selection.city),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DefaultChoice::First, DefaultChoice::First, DefaultChoice::First)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_rounds_to_one_decimal() {
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
        assert_eq!(kelvin_to_celsius(300.0), 26.9);
        assert_eq!(kelvin_to_celsius(298.16), 25.0);
        assert_eq!(TempUnit::Celsius.format_kelvin(305.37), "32.2°C");
    }

    #[test]
    fn test_fahrenheit() {
        assert_eq!(TempUnit::Fahrenheit.format_kelvin(273.15), "32.0°F");
        assert_eq!(TempUnit::Fahrenheit.format_kelvin(373.15), "212.0°F");
    }

    #[test]
    fn test_default_choice_pick() {
        let entries = [("BR", "Bihar"), ("MP", "Madhya Pradesh")];
        assert_eq!(DefaultChoice::First.pick(entries), Some(0));
        assert_eq!(DefaultChoice::Unset.pick(entries), None);
        assert_eq!(
            DefaultChoice::Preferred("madhya pradesh".into()).pick(entries),
            Some(1)
        );
        assert_eq!(DefaultChoice::Preferred("mp".into()).pick(entries), Some(1));
        assert_eq!(DefaultChoice::Preferred("Goa".into()).pick(entries), Some(0));
        assert_eq!(DefaultChoice::First.pick(Vec::<(&str, &str)>::new()), None);
    }

    #[test]
    fn test_stage_follows_selection() {
        let mut state = AppState::default();
        assert_eq!(state.stage(), SelectionStage::Empty);

        state.selection.country = Some("IN".into());
        assert_eq!(state.stage(), SelectionStage::CountrySelected);

        state.selection.region = Some("BR".into());
        assert_eq!(state.stage(), SelectionStage::RegionSelected);

        // City index without a loaded list does not count
        state.selection.city = Some(0);
        assert_eq!(state.stage(), SelectionStage::RegionSelected);

        state.cities = DataResource::Loaded(vec![City {
            name: "Jamalpur".into(),
        }]);
        assert_eq!(state.stage(), SelectionStage::CitySelected);
        assert_eq!(state.city_name(), Some("Jamalpur"));
    }
}
