use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph},
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::{AppState, PickerColumn};

/// Country / region / city columns
#[derive(Default)]
pub struct LocationPicker {
    countries: SelectList,
    regions: SelectList,
    cities: SelectList,
}

pub struct LocationPickerProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// What one column shows
struct ColumnView {
    title: &'static str,
    items: Vec<Line<'static>>,
    /// Loading / failed / disabled text when there is nothing to list
    placeholder: Option<(String, Color)>,
    selected: Option<usize>,
    on_select: fn(usize) -> Action,
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: None,
        },
        selection: SelectionStyle::default(),
        scrollbar: ScrollbarStyle::default(),
    }
}

fn placeholder<T>(resource: &DataResource<Vec<T>>, disabled: &str) -> Option<(String, Color)> {
    match resource {
        DataResource::Loading => Some(("Loading...".into(), Color::DarkGray)),
        DataResource::Failed(error) => Some((error.clone(), Color::Rgb(200, 100, 100))),
        DataResource::Loaded(items) if items.is_empty() => {
            Some(("Nothing listed".into(), Color::DarkGray))
        }
        DataResource::Loaded(_) => None,
        DataResource::Empty => Some((disabled.into(), Color::DarkGray)),
    }
}

fn column_view(state: &AppState, column: PickerColumn) -> ColumnView {
    match column {
        PickerColumn::Country => ColumnView {
            title: "Country",
            items: state
                .country_list()
                .iter()
                .map(|c| Line::from(format!("{} ({})", c.name, c.code)))
                .collect(),
            placeholder: placeholder(&state.countries, "No countries"),
            selected: state.column_index(column),
            on_select: Action::CountryPick,
        },
        PickerColumn::Region => ColumnView {
            title: "Region",
            items: state
                .region_list()
                .iter()
                .map(|r| Line::from(r.name.clone()))
                .collect(),
            placeholder: placeholder(&state.regions, "Select a country"),
            selected: state.column_index(column),
            on_select: Action::RegionPick,
        },
        PickerColumn::City => ColumnView {
            title: "City",
            items: state
                .city_list()
                .iter()
                .map(|c| Line::from(c.name.clone()))
                .collect(),
            placeholder: placeholder(&state.cities, "Select a region"),
            selected: state.column_index(column),
            on_select: Action::CitySelect,
        },
    }
}

/// Refetch the focused column's list. Reloading a column re-selects its
/// parent, which clears everything below it.
fn reload(state: &AppState) -> Option<Action> {
    match state.focus {
        PickerColumn::Country => Some(Action::Init),
        PickerColumn::Region => state.selection.country.clone().map(Action::CountrySelect),
        PickerColumn::City => state.selection.region.clone().map(Action::RegionSelect),
    }
}

impl LocationPicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self, column: PickerColumn) -> &mut SelectList {
        match column {
            PickerColumn::Country => &mut self.countries,
            PickerColumn::Region => &mut self.regions,
            PickerColumn::City => &mut self.cities,
        }
    }
}

impl Component<Action> for LocationPicker {
    type Props<'a> = LocationPickerProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Tab | KeyCode::Right => vec![Action::UiFocusNext],
            KeyCode::BackTab | KeyCode::Left => vec![Action::UiFocusPrev],
            KeyCode::Char('r') => reload(props.state).into_iter().collect(),
            KeyCode::Up | KeyCode::Down => {
                let column = props.state.focus;
                let view = column_view(props.state, column);
                if view.items.is_empty() {
                    return Vec::new();
                }
                // Nothing chosen yet: the first move lands on the first entry
                let Some(selected) = view.selected else {
                    return vec![(view.on_select)(0)];
                };
                let list_props = SelectListProps {
                    items: &view.items,
                    count: view.items.len(),
                    selected,
                    is_focused: true,
                    style: list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: view.on_select,
                    render_item: &|item| item.clone(),
                };
                self.list_mut(column)
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let columns = [PickerColumn::Country, PickerColumn::Region, PickerColumn::City];
        for (column, chunk) in columns.into_iter().zip(chunks.iter()) {
            let view = column_view(props.state, column);
            let focused = props.is_focused && props.state.focus == column;
            let border = if focused { Color::Cyan } else { Color::DarkGray };
            let block = Block::bordered()
                .title(format!(" {} ", view.title))
                .border_style(Style::default().fg(border));
            let inner = block.inner(*chunk);
            frame.render_widget(block, *chunk);

            if let Some((text, color)) = view.placeholder {
                let line = Line::styled(text, Style::default().fg(color));
                frame.render_widget(Paragraph::new(line), inner);
                continue;
            }

            // Nothing chosen at this level: list the entries without a highlight
            let Some(selected) = view.selected else {
                let unchosen = Block::default().padding(ratatui::widgets::Padding::horizontal(1));
                frame.render_widget(Paragraph::new(view.items).block(unchosen), inner);
                continue;
            };

            let list_props = SelectListProps {
                items: &view.items,
                count: view.items.len(),
                selected,
                is_focused: focused,
                style: list_style(),
                behavior: SelectListBehavior::default(),
                on_select: view.on_select,
                render_item: &|item| item.clone(),
            };
            self.list_mut(column).render(frame, inner, list_props);
        }
    }
}
