//! Reducer - pure function: (state, action) -> DispatchResult
//!
//! Selection changes are applied immediately; the list refresh they require
//! is returned as an effect tagged with the current generation. A result is
//! only applied while its generation is still the pending one for its level,
//! so a slow response can never overwrite a newer choice.

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::orchestrator::SearchRequest;
use crate::state::{AppState, Selection};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.countries = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadCountries)
        }

        // ===== Country actions =====
        Action::CountrySelect(code) => select_country(state, code),

        Action::CountryPick(index) => {
            let Some(country) = state.country_list().get(index) else {
                return DispatchResult::unchanged();
            };
            if state.selection.country.as_deref() == Some(country.code.as_str()) {
                return DispatchResult::unchanged();
            }
            let code = country.code.clone();
            select_country(state, code)
        }

        Action::CountriesDidLoad(countries) => {
            state.countries = DataResource::Loaded(countries);
            if state.selection.country.is_some() {
                return DispatchResult::changed();
            }
            let default = state.country_default.pick(
                state
                    .country_list()
                    .iter()
                    .map(|c| (c.code.as_str(), c.name.as_str())),
            );
            match default {
                Some(index) => {
                    let code = state.country_list()[index].code.clone();
                    select_country(state, code)
                }
                None => DispatchResult::changed(),
            }
        }

        Action::CountriesDidError(error) => {
            tracing::warn!(%error, "country list unavailable");
            state.countries = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        // ===== Region actions =====
        Action::RegionSelect(code) => select_region(state, code),

        Action::RegionPick(index) => {
            let Some(region) = state.region_list().get(index) else {
                return DispatchResult::unchanged();
            };
            if state.selection.region.as_deref() == Some(region.code.as_str()) {
                return DispatchResult::unchanged();
            }
            let code = region.code.clone();
            select_region(state, code)
        }

        Action::RegionsDidLoad {
            generation,
            regions,
        } => {
            if state.pending_regions != Some(generation) {
                tracing::debug!(
                    generation,
                    current = state.generation,
                    "discarding stale region list"
                );
                return DispatchResult::unchanged();
            }
            state.pending_regions = None;
            state.regions = DataResource::Loaded(regions);

            let default = state.region_default.pick(
                state
                    .region_list()
                    .iter()
                    .map(|r| (r.code.as_str(), r.name.as_str())),
            );
            match default {
                Some(index) => {
                    let code = state.region_list()[index].code.clone();
                    select_region(state, code)
                }
                None => DispatchResult::changed(),
            }
        }

        Action::RegionsDidError { generation, error } => {
            if state.pending_regions != Some(generation) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%error, "region list unavailable");
            state.pending_regions = None;
            state.regions = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        // ===== City actions =====
        Action::CitySelect(index) => {
            if state.selection.region.is_none()
                || index >= state.city_list().len()
                || state.selection.city == Some(index)
            {
                return DispatchResult::unchanged();
            }
            state.selection.city = Some(index);
            DispatchResult::changed()
        }

        Action::CitiesDidLoad { generation, cities } => {
            if state.pending_cities != Some(generation) {
                tracing::debug!(
                    generation,
                    current = state.generation,
                    "discarding stale city list"
                );
                return DispatchResult::unchanged();
            }
            state.pending_cities = None;
            state.selection.city = state
                .city_default
                .pick(cities.iter().map(|c| (c.name.as_str(), c.name.as_str())));
            state.cities = DataResource::Loaded(cities);
            DispatchResult::changed()
        }

        Action::CitiesDidError { generation, error } => {
            if state.pending_cities != Some(generation) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%error, "city list unavailable");
            state.pending_cities = None;
            state.cities = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchSubmit => {
            // Any submit supersedes the search in flight, even one that
            // fails validation.
            state.search_generation += 1;
            match SearchRequest::from_state(state) {
                Ok(request) => {
                    state.searching = true;
                    state.search_error = None;
                    DispatchResult::changed_with(Effect::Search {
                        request,
                        generation: state.search_generation,
                    })
                }
                Err(error) => {
                    state.searching = false;
                    state.search_error = Some(error);
                    DispatchResult::changed()
                }
            }
        }

        Action::SearchDidLoad {
            generation,
            reading,
        } => {
            if generation != state.search_generation {
                tracing::debug!(
                    generation,
                    current = state.search_generation,
                    "discarding superseded search result"
                );
                return DispatchResult::unchanged();
            }
            state.reading = Some(reading);
            state.searching = false;
            state.search_error = None;
            DispatchResult::changed()
        }

        Action::SearchDidError { generation, error } => {
            if generation != state.search_generation {
                return DispatchResult::unchanged();
            }
            // The previous reading stays on screen next to the error
            state.searching = false;
            state.search_error = Some(error);
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::UiFocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }

        Action::UiFocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Quit => DispatchResult::unchanged(),
    }
}

/// setCountry: clears everything below and asks for the new region list
fn select_country(state: &mut AppState, code: String) -> DispatchResult<Effect> {
    let code = code.trim().to_string();
    state.generation += 1;
    state.selection = Selection {
        country: (!code.is_empty()).then(|| code.clone()),
        region: None,
        city: None,
    };
    state.cities = DataResource::Empty;
    state.pending_cities = None;

    if code.is_empty() {
        state.regions = DataResource::Empty;
        state.pending_regions = None;
        return DispatchResult::changed();
    }

    state.regions = DataResource::Loading;
    state.pending_regions = Some(state.generation);
    DispatchResult::changed_with(Effect::LoadRegions {
        country: code,
        generation: state.generation,
    })
}

/// setRegion: only for a region of the current list; clears the city and
/// asks for the new city list
fn select_region(state: &mut AppState, code: String) -> DispatchResult<Effect> {
    let Some(country) = state.selection.country.clone() else {
        return DispatchResult::unchanged();
    };
    if !state.region_list().iter().any(|r| r.code == code) {
        return DispatchResult::unchanged();
    }

    state.generation += 1;
    state.selection.region = Some(code.clone());
    state.selection.city = None;
    state.cities = DataResource::Loading;
    state.pending_cities = Some(state.generation);
    DispatchResult::changed_with(Effect::LoadCities {
        country,
        region: code,
        generation: state.generation,
    })
}
