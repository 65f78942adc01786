use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Mood;

/// Free-text song title typed on the "By Song" tab.
#[derive(Default, Clone)]
pub(crate) struct TitleInput {
    pub(crate) value: String,
}

impl TitleInput {
    /// Append a printable character. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn clear(&mut self) {
        self.value.clear();
    }

    /// Render the input line; a dim hint stands in for an empty value.
    pub(crate) fn build_line(&self, focused: bool) -> Line<'static> {
        let (display, style) = if self.value.is_empty() {
            (
                "e.g. Bohemian Rhapsody".to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else if focused {
            (self.value.clone(), Style::default().fg(Color::Yellow))
        } else {
            (self.value.clone(), Style::default())
        };

        Line::from(vec![Span::raw("Song title: "), Span::styled(display, style)])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Selector over the fixed mood list shown on the "By Mood" tab.
#[derive(Default, Clone)]
pub(crate) struct MoodPicker {
    selected: usize,
}

impl MoodPicker {
    pub(crate) fn value(&self) -> Mood {
        Mood::ALL[self.selected % Mood::ALL.len()]
    }

    pub(crate) fn next(&mut self) {
        self.selected = (self.selected + 1) % Mood::ALL.len();
    }

    pub(crate) fn previous(&mut self) {
        self.selected = (self.selected + Mood::ALL.len() - 1) % Mood::ALL.len();
    }

    /// All moods on one line, the current pick highlighted.
    pub(crate) fn build_line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw("Mood: ")];
        for (index, mood) in Mood::ALL.iter().enumerate() {
            if index == self.selected {
                spans.push(Span::styled(
                    format!("< {} >", mood.label()),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(
                    format!("  {}  ", mood.label()),
                    Style::default().fg(Color::Gray),
                ));
            }
        }
        Line::from(spans)
    }
}

/// Blocking message dialog. While one is open every key except the dismiss
/// keys is swallowed.
pub(crate) struct Alert {
    pub(crate) message: String,
}

impl Alert {
    pub(crate) fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}
