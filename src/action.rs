use crate::error::{AtriumError, Result};
use crate::query::FetchTicket;
use crate::types::{Artwork, Exhibition, Page};

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Exhibitions,
    Artworks,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Exhibitions => Tab::Artworks,
            Tab::Artworks => Tab::Exhibitions,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Exhibitions => "Exhibitions",
            Tab::Artworks => "Artworks",
        }
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exhibitions" => Ok(Tab::Exhibitions),
            "artworks" => Ok(Tab::Artworks),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Init,
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    /// Mouse wheel, in rows
    ScrollRows(i16),
    Resize(u16),

    // Navigation
    SwitchTab(Tab),
    NextTab,

    Refresh,
    OpenInBrowser,

    // Fetch results, tagged with the ticket they were issued for
    ExhibitionsPage {
        ticket: FetchTicket,
        result: Result<Page<Exhibition>>,
    },
    ArtworksLoaded {
        ticket: FetchTicket,
        result: Result<Page<Artwork>>,
    },

    /// Label from the countdown started as `generation`
    CountdownTick {
        generation: u64,
        label: String,
    },

    Error(String),
    None,
}

impl From<AtriumError> for Action {
    fn from(err: AtriumError) -> Self {
        Action::Error(err.to_string())
    }
}
