pub mod location_picker;
pub mod weather_app;
pub mod weather_panel;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use location_picker::{LocationPicker, LocationPickerProps};
pub use weather_app::{WeatherApp, WeatherAppProps};
pub use weather_panel::{WeatherPanel, WeatherPanelProps};
