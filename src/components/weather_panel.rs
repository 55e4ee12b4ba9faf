use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::icons::condition_emoji;
use crate::state::{AppState, Coordinate, TempUnit, WeatherReading, kelvin_to_celsius};

/// Latest reading: location header, condition line and a metrics grid
pub struct WeatherPanel;

pub struct WeatherPanelProps<'a> {
    pub state: &'a AppState,
}

/// Header height cap: terminus(6) + 1 line of breathing room
const HEADER_CAP: u16 = 7;
const METRIC_ROWS: u16 = 4;

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Eight-point compass heading for a wind direction in degrees
pub fn compass_point(degrees: f64) -> &'static str {
    let sector = ((degrees.rem_euclid(360.0) + 22.5) / 45.0) as usize % COMPASS.len();
    COMPASS[sector]
}

/// `25.31°N, 86.49°E`, with S/W for negative values
pub fn format_coordinate(at: Coordinate) -> String {
    let ns = if at.latitude < 0.0 { 'S' } else { 'N' };
    let ew = if at.longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.2}°{ns}, {:.2}°{ew}",
        at.latitude.abs(),
        at.longitude.abs()
    )
}

/// Label/value pairs shown under the header, in display order
pub fn metrics(reading: &WeatherReading, unit: TempUnit) -> Vec<(&'static str, String)> {
    vec![
        ("Temperature", unit.format_kelvin(reading.temperature_kelvin)),
        ("Feels like", unit.format_kelvin(reading.feels_like_kelvin)),
        (
            "Min / Max",
            format!(
                "{} / {}",
                unit.format_kelvin(reading.temp_min_kelvin),
                unit.format_kelvin(reading.temp_max_kelvin)
            ),
        ),
        ("Humidity", format!("{}%", reading.humidity_percent)),
        ("Pressure", format!("{} hPa", reading.pressure_hpa)),
        (
            "Wind",
            format!(
                "{} m/s {}",
                reading.wind_speed_ms,
                compass_point(reading.wind_direction_deg)
            ),
        ),
        ("Cloudiness", format!("{}%", reading.cloudiness_percent)),
        ("Rain (1h)", format!("{} mm", reading.rain_1h_mm)),
    ]
}

fn temperature_gradient(kelvin: f64) -> Fill {
    let (start, end) = match kelvin_to_celsius(kelvin) {
        t if t < 0.0 => (ArtColor::rgb(150, 200, 255), ArtColor::rgb(200, 230, 255)),
        t if t < 15.0 => (ArtColor::rgb(100, 180, 255), ArtColor::rgb(150, 220, 200)),
        t if t < 25.0 => (ArtColor::rgb(100, 200, 150), ArtColor::rgb(255, 220, 100)),
        t if t < 35.0 => (ArtColor::rgb(255, 180, 80), ArtColor::rgb(255, 120, 80)),
        _ => (ArtColor::rgb(255, 100, 80), ArtColor::rgb(255, 60, 60)),
    };
    Fill::Linear(LinearGradient::horizontal(start, end))
}

fn location_title(reading: &WeatherReading) -> String {
    match (reading.location_name.is_empty(), reading.country_code.is_empty()) {
        (false, false) => format!("{}, {}", reading.location_name, reading.country_code),
        (false, true) => reading.location_name.clone(),
        (true, false) => reading.country_code.clone(),
        (true, true) => "Unknown place".into(),
    }
}

impl Component<Action> for WeatherPanel {
    type Props<'a> = WeatherPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match &props.state.reading {
            Some(reading) => render_reading(frame, area, reading, props.state.unit),
            None => render_hint(frame, area, props.state.searching),
        }
    }
}

fn render_reading(frame: &mut Frame, area: Rect, reading: &WeatherReading, unit: TempUnit) {
    let chunks = Layout::vertical([
        Constraint::Max(HEADER_CAP),
        Constraint::Length(1), // coordinates
        Constraint::Length(1), // condition
        Constraint::Length(1), // spacer
        Constraint::Length(METRIC_ROWS),
    ])
    .flex(Flex::Center)
    .split(area);

    let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(temperature_gradient(reading.temperature_kelvin));
    let title = location_title(reading);
    frame.render_widget(ArtBox::new(&renderer, &title), chunks[0]);

    let coords = Line::styled(
        format_coordinate(reading.coordinate),
        Style::default().fg(Color::DarkGray),
    )
    .centered();
    frame.render_widget(Paragraph::new(coords), chunks[1]);

    let condition = Line::from(vec![
        Span::raw(format!("{} ", condition_emoji(&reading.icon_code))),
        Span::styled(reading.condition_main.clone(), Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" - {}", reading.condition_description),
            Style::default().fg(Color::Gray),
        ),
    ])
    .centered();
    frame.render_widget(Paragraph::new(condition), chunks[2]);

    let halves = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[4]);
    let rows = metrics(reading, unit);
    let (left, right) = rows.split_at(rows.len().div_ceil(2));
    for (half, entries) in halves.iter().zip([left, right]) {
        let lines: Vec<Line> = entries
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
                    Span::raw(value.clone()),
                ])
                .centered()
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), *half);
    }
}

fn render_hint(frame: &mut Frame, area: Rect, searching: bool) {
    let chunks = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);

    let hint = if searching {
        Line::from(Span::styled("Searching...", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::styled("Pick a city and press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
            Span::styled(" to look up its weather", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(hint.centered()), chunks[0]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_point() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(350.0), "N");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(225.0), "SW");
        assert_eq!(compass_point(-45.0), "NW");
    }

    #[test]
    fn test_format_coordinate() {
        let jamalpur = Coordinate {
            latitude: 25.3131,
            longitude: 86.4889,
        };
        assert_eq!(format_coordinate(jamalpur), "25.31°N, 86.49°E");

        let lima = Coordinate {
            latitude: -12.0464,
            longitude: -77.0428,
        };
        assert_eq!(format_coordinate(lima), "12.05°S, 77.04°W");
    }

    #[test]
    fn test_metrics_use_unit() {
        let reading = WeatherReading {
            temperature_kelvin: 300.0,
            humidity_percent: 62.0,
            rain_1h_mm: 0.0,
            ..Default::default()
        };

        let celsius = metrics(&reading, TempUnit::Celsius);
        assert_eq!(celsius[0], ("Temperature", "26.9°C".to_string()));
        assert_eq!(celsius[3], ("Humidity", "62%".to_string()));
        assert_eq!(celsius[7], ("Rain (1h)", "0 mm".to_string()));

        let fahrenheit = metrics(&reading, TempUnit::Fahrenheit);
        assert_eq!(fahrenheit[0], ("Temperature", "80.3°F".to_string()));
    }
}
