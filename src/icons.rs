//! Condition glyphs for weather-provider icon codes
//!
//! Icon codes are two digits plus a day/night suffix: `01d` clear day,
//! `10n` rain at night, and so on.

/// Weather condition categories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherCondition {
    ClearSky,
    PartlyCloudy,
    Cloudy,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl WeatherCondition {
    /// Map an icon code (`01d`..`50n`) to its condition; the suffix is ignored
    pub fn from_icon(code: &str) -> Self {
        match code.trim().get(..2) {
            Some("01") => WeatherCondition::ClearSky,
            Some("02") => WeatherCondition::PartlyCloudy,
            Some("03" | "04") => WeatherCondition::Cloudy,
            Some("09") => WeatherCondition::Drizzle,
            Some("10") => WeatherCondition::Rain,
            Some("11") => WeatherCondition::Thunderstorm,
            Some("13") => WeatherCondition::Snow,
            Some("50") => WeatherCondition::Mist,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn emoji(self, night: bool) -> &'static str {
        match self {
            WeatherCondition::ClearSky if night => "\u{1f319}",
            WeatherCondition::ClearSky => "\u{2600}\u{fe0f}",
            WeatherCondition::PartlyCloudy if night => "\u{2601}\u{fe0f}",
            WeatherCondition::PartlyCloudy => "\u{26c5}",
            WeatherCondition::Cloudy | WeatherCondition::Unknown => "\u{2601}\u{fe0f}",
            WeatherCondition::Drizzle => "\u{1f326}\u{fe0f}",
            WeatherCondition::Rain => "\u{1f327}\u{fe0f}",
            WeatherCondition::Thunderstorm => "\u{26c8}\u{fe0f}",
            WeatherCondition::Snow => "\u{2744}\u{fe0f}",
            WeatherCondition::Mist => "\u{1f32b}\u{fe0f}",
        }
    }
}

/// Glyph shown beside the condition line
pub fn condition_emoji(icon_code: &str) -> &'static str {
    let night = icon_code.trim().ends_with('n');
    WeatherCondition::from_icon(icon_code).emoji(night)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_icon() {
        assert_eq!(WeatherCondition::from_icon("01d"), WeatherCondition::ClearSky);
        assert_eq!(WeatherCondition::from_icon("02n"), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_icon("03d"), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_icon("04n"), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_icon("09d"), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_icon("10n"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_icon("11d"), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_icon("13d"), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_icon("50n"), WeatherCondition::Mist);
    }

    #[test]
    fn test_unknown_icon() {
        assert_eq!(WeatherCondition::from_icon(""), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_icon("7"), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_icon("99d"), WeatherCondition::Unknown);
        assert_eq!(condition_emoji(""), "\u{2601}\u{fe0f}");
    }

    #[test]
    fn test_night_variant() {
        assert_eq!(condition_emoji("01d"), "\u{2600}\u{fe0f}");
        assert_eq!(condition_emoji("01n"), "\u{1f319}");
        assert_eq!(condition_emoji("10d"), condition_emoji("10n"));
    }
}
