//! Actions - user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::state::{City, Country, Region, WeatherReading};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup, or a manual reload: load the country list
    Init,

    // ===== Country category =====
    /// Choose a country by code (empty code unsets it)
    CountrySelect(String),

    /// Choose the country at a position in the list
    CountryPick(usize),

    CountriesDidLoad(Vec<Country>),

    CountriesDidError(LookupError),

    // ===== Region category =====
    /// Choose a region by code
    RegionSelect(String),

    /// Choose the region at a position in the list
    RegionPick(usize),

    RegionsDidLoad {
        generation: u64,
        regions: Vec<Region>,
    },

    RegionsDidError {
        generation: u64,
        error: LookupError,
    },

    // ===== City category =====
    /// Choose a city by its position in the list
    CitySelect(usize),

    CitiesDidLoad {
        generation: u64,
        cities: Vec<City>,
    },

    CitiesDidError {
        generation: u64,
        error: LookupError,
    },

    // ===== Search category =====
    /// Look up weather for the current selection
    SearchSubmit,

    SearchDidLoad {
        generation: u64,
        reading: WeatherReading,
    },

    SearchDidError {
        generation: u64,
        error: LookupError,
    },

    // ===== UI category =====
    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Move picker focus one column right
    UiFocusNext,

    /// Move picker focus one column left
    UiFocusPrev,

    /// Force a re-render
    Render,

    // ===== Uncategorized (global) =====
    /// Exit the application
    Quit,
}
