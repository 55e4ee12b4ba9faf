use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, LocationPicker, LocationPickerProps, WeatherPanel, WeatherPanelProps};
use crate::action::Action;
use crate::state::{AppState, SelectionStage};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Rows given to the picker columns (borders included)
const PICKER_HEIGHT: u16 = 12;

/// Props for WeatherApp - read-only view of state
pub struct WeatherAppProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root component: picker on top, reading below, status line and key hints
#[derive(Default)]
pub struct WeatherApp {
    picker: LocationPicker,
}

impl WeatherApp {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One-line status: search error, progress, or what is still missing
pub fn status_line(state: &AppState) -> Line<'static> {
    if let Some(error) = &state.search_error {
        return Line::from(vec![
            Span::raw(format!("{ERROR_ICON} ")),
            Span::styled(
                format!("[{}] {}", error.kind(), error),
                Style::default().fg(Color::Rgb(200, 100, 100)),
            ),
        ]);
    }
    if state.searching {
        return Line::styled("Searching...", Style::default().fg(Color::Yellow));
    }
    let text = match state.stage() {
        SelectionStage::Empty => "Choose a country",
        SelectionStage::CountrySelected => "Choose a region",
        SelectionStage::RegionSelected => "Choose a city",
        SelectionStage::CitySelected => "Ready to search",
    };
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

impl Component<Action> for WeatherApp {
    type Props<'a> = WeatherAppProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Enter | KeyCode::Char('s') => return vec![Action::SearchSubmit],
                KeyCode::Char('u') => return vec![Action::UiToggleUnits],
                KeyCode::Char('q') | KeyCode::Esc => return vec![Action::Quit],
                _ => {}
            }
        }

        self.picker
            .handle_event(
                event,
                LocationPickerProps {
                    state: props.state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherAppProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(PICKER_HEIGHT),
            Constraint::Min(1),    // Reading
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        self.picker.render(
            frame,
            chunks[0],
            LocationPickerProps {
                state: props.state,
                is_focused: props.is_focused,
            },
        );

        let mut panel = WeatherPanel;
        panel.render(frame, chunks[1], WeatherPanelProps { state: props.state });

        frame.render_widget(Paragraph::new(status_line(props.state)), chunks[2]);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[3],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("tab", "column"),
                    StatusBarHint::new("enter", "search"),
                    StatusBarHint::new("r", "reload"),
                    StatusBarHint::new("u", "units"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
