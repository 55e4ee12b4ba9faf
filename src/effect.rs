//! Effects - side effects declared by the reducer

use crate::orchestrator::SearchRequest;

/// Network work the reducer asks the runtime to perform. Every list fetch
/// and search carries the generation it was issued under so its result can
/// be discarded if a newer choice has been made meanwhile.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the country list
    LoadCountries,
    /// Fetch regions of a country
    LoadRegions { country: String, generation: u64 },
    /// Fetch cities of a region
    LoadCities {
        country: String,
        region: String,
        generation: u64,
    },
    /// Geocode the request, then fetch its current weather
    Search {
        request: SearchRequest,
        generation: u64,
    },
}
