use std::cmp::min;
use std::mem;
use std::sync::Arc;

use anyhow::Context;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::api::{RecommendationRequest, RecommendationSource};
use crate::config::AppConfig;
use crate::models::Tab;

use super::dispatch::{Completed, DispatchError, Dispatcher};
use super::forms::{Alert, MoodPicker, TitleInput};
use super::helpers::{centered_rect, format_popularity, surface_error};
use super::results::{ResultEntry, ResultList, SongCard};
use super::tabs::TabBar;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab header and of the input row.
const HEADER_HEIGHT: u16 = 3;
/// Height allocation per song card: borders plus name, byline, link.
const SONG_CARD_HEIGHT: u16 = 5;

/// Overlay state. The alert is modal: it owns the keyboard until dismissed.
enum Mode {
    Normal,
    Alert(Alert),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    config: AppConfig,
    tabs: TabBar,
    title: TitleInput,
    mood: MoodPicker,
    results: ResultList,
    dispatcher: Dispatcher,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(config: AppConfig, source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            tabs: TabBar::new(config.default_tab),
            config,
            title: TitleInput::default(),
            mood: MoodPicker::default(),
            results: ResultList::default(),
            dispatcher: Dispatcher::new(source),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Route one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Alert(alert) => match code {
                KeyCode::Enter | KeyCode::Esc => Mode::Normal,
                _ => Mode::Alert(alert),
            },
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab => self.tabs.next(),
            KeyCode::BackTab => self.tabs.previous(),
            KeyCode::Enter => return self.dispatch(),
            KeyCode::Up => self.results.move_selection(-1),
            KeyCode::Down => self.results.move_selection(1),
            KeyCode::PageUp => self.results.move_selection(-5),
            KeyCode::PageDown => self.results.move_selection(5),
            KeyCode::Home => self.results.select_first(),
            KeyCode::End => self.results.select_last(),
            KeyCode::Left if self.tabs.is_active(Tab::Mood) => self.mood.previous(),
            KeyCode::Right if self.tabs.is_active(Tab::Mood) => self.mood.next(),
            KeyCode::Backspace if self.tabs.is_active(Tab::Song) => self.title.backspace(),
            KeyCode::Char(ch) if self.tabs.is_active(Tab::Song) => {
                self.title.push_char(ch);
            }
            _ => {}
        }
        Mode::Normal
    }

    /// Validate the active tab's input and hand the request to the dispatcher.
    /// A blank title opens the blocking alert and sends nothing.
    fn dispatch(&mut self) -> Mode {
        if self.dispatcher.is_busy() {
            self.set_status(DispatchError::Busy.to_string(), StatusKind::Error);
            return Mode::Normal;
        }

        let request = match RecommendationRequest::from_inputs(
            self.tabs.active(),
            &self.title.value,
            self.mood.value(),
        ) {
            Ok(request) => request,
            Err(err) => {
                warn!("request rejected before sending: {err}");
                return Mode::Alert(Alert::new(err.to_string()));
            }
        };

        match self.dispatcher.dispatch(request) {
            Ok(()) => self.clear_status(),
            Err(DispatchError::Busy) => {
                self.set_status(DispatchError::Busy.to_string(), StatusKind::Error)
            }
            Err(err) => self.results.show_error(&err.to_string()),
        }
        Mode::Normal
    }

    /// Advance animations and pick up a finished request, if any.
    pub fn tick(&mut self) {
        self.dispatcher.tick();
        if let Some(completed) = self.dispatcher.poll() {
            self.apply_completed(completed);
        }
    }

    fn apply_completed(&mut self, completed: Completed) {
        match &completed.result {
            Ok(songs) => info!(count = songs.len(), "showing recommendations"),
            Err(err) => warn!("recommendation request failed: {err}"),
        }
        self.results.show_outcome(
            completed.result,
            completed.tab,
            &self.config.video_search_url,
        );
    }

    /// Open the selected card's video search in the system browser.
    pub(crate) fn handle_ctrl_o(&mut self) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        let Some(card) = self.results.current_card().cloned() else {
            self.set_status("No song selected to open.", StatusKind::Error);
            return;
        };

        match open_link(&card.listen_url).context("failed to open link") {
            Ok(()) => self.set_status(format!("Opened {}.", card.name), StatusKind::Info),
            Err(err) => self.set_status(
                format!("Failed to open link: {}", surface_error(&err)),
                StatusKind::Error,
            ),
        }
    }

    /// Clear the song title input.
    pub(crate) fn handle_ctrl_u(&mut self) {
        if matches!(self.mode, Mode::Normal) && self.tabs.is_active(Tab::Song) {
            self.title.clear();
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        self.draw_inputs(frame, chunks[1]);
        self.draw_results(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if let Mode::Alert(alert) = &self.mode {
            self.draw_alert(frame, area, alert);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|tab| tab.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tabs.index())
            .block(Block::default().borders(Borders::ALL).title("Tunefinder"))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_inputs(&self, frame: &mut Frame, area: Rect) {
        let label = self.dispatcher.label();
        let button_width = (label.chars().count() as u16 + 4).min(area.width);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(button_width)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.tabs.active().title());
        let inner = block.inner(chunks[0]);
        let line = match self.tabs.active() {
            Tab::Song => self.title.build_line(matches!(self.mode, Mode::Normal)),
            Tab::Mood => self.mood.build_line(),
        };
        frame.render_widget(Paragraph::new(line).block(block), chunks[0]);

        let button_style = if self.dispatcher.is_busy() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(Span::styled(label, button_style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).style(button_style));
        frame.render_widget(button, chunks[1]);

        if matches!(self.mode, Mode::Normal) && self.tabs.is_active(Tab::Song) {
            let offset = u16::try_from("Song title: ".len() + self.title.value_len())
                .unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(offset);
            if cursor_x < inner.x.saturating_add(inner.width) {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Results");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let entries = self.results.entries();
        match entries.first() {
            None => {
                let hint = Paragraph::new("Press Enter to get recommendations.")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(hint, inner);
            }
            Some(ResultEntry::Placeholder(text)) => {
                let message = Paragraph::new(text.as_str())
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, inner);
            }
            Some(ResultEntry::Error(text)) => {
                let message = Paragraph::new(text.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, inner);
            }
            Some(ResultEntry::Song(_)) => {
                let cards: Vec<&SongCard> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        ResultEntry::Song(card) => Some(card),
                        _ => None,
                    })
                    .collect();
                self.render_song_cards(frame, inner, &cards, self.results.selected());
            }
        }
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, cards: &[&SongCard], selected: usize) {
        if cards.is_empty() || area.height == 0 {
            return;
        }

        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = cards.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            let card_index = start + idx;
            if chunk.height == 0 || card_index >= len {
                continue;
            }

            let card = cards[card_index];
            let is_selected = card_index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            if card.seed {
                block = block
                    .title("Your song")
                    .border_style(Style::default().fg(Color::Magenta));
            }
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }

            let title = if is_selected {
                format!("▶ {}", card.name)
            } else {
                card.name.clone()
            };
            let mut title_spans = vec![Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(score) = card.popularity {
                title_spans.push(Span::styled(
                    format!("  ♥ {}", format_popularity(score)),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            let lines = vec![
                Line::from(title_spans),
                Line::from(Span::styled(card.byline(), Style::default().fg(Color::Gray))),
                Line::from(Span::styled(
                    card.listen_url.clone(),
                    Style::default().fg(Color::Cyan),
                )),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Left);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.mode, self.tabs.active()) {
            (Mode::Alert(_), _) => Line::from(vec![
                Span::styled("[Enter/Esc]", key_style),
                Span::raw(" Dismiss"),
            ]),
            (Mode::Normal, tab) => {
                let mut spans = vec![
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Switch   "),
                ];
                if tab == Tab::Mood {
                    spans.push(Span::styled("[←→]", key_style));
                    spans.push(Span::raw(" Mood   "));
                }
                spans.extend([
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Recommend   "),
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Navigate   "),
                    Span::styled("[Ctrl-O]", key_style),
                    Span::raw(" Listen   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Quit"),
                ]);
                Line::from(spans)
            }
        }
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Notice").borders(Borders::ALL);
        let lines = vec![
            Line::from(alert.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or Esc to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
