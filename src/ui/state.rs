use crate::dashboard::Dashboard;

#[derive(Debug, Clone)]
pub enum AppState {
    Loading,
    Ready { dashboard: Dashboard, page: Page },
    Error { message: String },
}

/// Side menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Tasks,
    Calendar,
    Grades,
    Stats,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Tasks,
        Page::Calendar,
        Page::Grades,
        Page::Stats,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Tasks => "Tasks",
            Page::Calendar => "Calendar",
            Page::Grades => "Grades",
            Page::Stats => "Stats",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycling() {
        assert_eq!(Page::Home.next(), Page::Tasks);
        assert_eq!(Page::Stats.next(), Page::Home);
        assert_eq!(Page::Home.previous(), Page::Stats);
        assert_eq!(Page::Calendar.index(), 2);
    }
}
