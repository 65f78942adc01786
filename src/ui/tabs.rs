use crate::models::Tab;

/// Tracks which input panel is authoritative. Holding a single `Tab` rather
/// than per-button flags means exactly one tab is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TabBar {
    active: Tab,
}

impl TabBar {
    pub(crate) fn new(active: Tab) -> Self {
        Self { active }
    }

    pub(crate) fn active(&self) -> Tab {
        self.active
    }

    pub(crate) fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Activate `tab` and its panel, deactivating everything else.
    pub(crate) fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub(crate) fn next(&mut self) {
        let index = self.index();
        self.select(Tab::ALL[(index + 1) % Tab::ALL.len()]);
    }

    pub(crate) fn previous(&mut self) {
        let index = self.index();
        self.select(Tab::ALL[(index + Tab::ALL.len() - 1) % Tab::ALL.len()]);
    }

    /// Position of the active tab in the header, used by the `Tabs` widget.
    pub(crate) fn index(&self) -> usize {
        Tab::ALL
            .iter()
            .position(|tab| *tab == self.active)
            .unwrap_or(0)
    }
}
