//! Ratatui front-end: tab header, input row with the trigger, results pane.

mod app;
mod dispatch;
mod forms;
mod helpers;
mod results;
mod tabs;
mod terminal;
#[cfg(test)]
mod test_support;

pub use app::App;
pub use terminal::run_app;
