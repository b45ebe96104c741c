use std::fmt;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::controller::{ListSpec, ListViewController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Explore,
    Favorites,
    Trips,
    Profile,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Home,
        Screen::Explore,
        Screen::Favorites,
        Screen::Trips,
        Screen::Profile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Explore => "explore",
            Screen::Favorites => "favorites",
            Screen::Trips => "trips",
            Screen::Profile => "profile",
        }
    }

    /// Lists shown on the screen; the first is the primary one.
    pub fn list_specs(self) -> Vec<ListSpec> {
        match self {
            Screen::Home => vec![
                ListSpec::new("featured")
                    .search(&["name", "description"])
                    .noun("destinations"),
                ListSpec::new("trending")
                    .categories(&["Beach", "Mountain", "City", "Nature"])
                    .noun("places"),
            ],
            Screen::Explore => vec![
                ListSpec::new("destinations")
                    .categories(&["beach", "mountain", "city", "culture", "adventure"])
                    .search(&["name", "location"])
                    .noun("destinations"),
            ],
            Screen::Favorites => vec![
                ListSpec::new("favorites")
                    .categories(&["Beach", "Adventure", "Culture", "Nature", "City"])
                    .search(&["name", "location"])
                    .noun("favorites"),
            ],
            Screen::Trips => vec![
                ListSpec::new("trips")
                    .categories(&["upcoming", "past"])
                    .search(&["destination", "memories"])
                    .flag("completed")
                    .noun("trips"),
                ListSpec::new("checklist")
                    .search(&["task"])
                    .flag("completed")
                    .noun("tasks"),
            ],
            Screen::Profile => vec![
                ListSpec::new("achievements")
                    .search(&["title", "description"])
                    .flag("earned")
                    .noun("achievements"),
                ListSpec::new("stats").noun("stats"),
            ],
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = anyhow::Error;

    /// Accepts unambiguous prefixes, so `fav` is `favorites`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let mut matches = Screen::ALL
            .into_iter()
            .filter(|screen| screen.name().starts_with(&token));
        match (matches.next(), matches.next()) {
            (Some(screen), None) if !token.is_empty() => Ok(screen),
            (Some(_), Some(_)) => Err(anyhow!("ambiguous screen name: {s}")),
            _ => Err(anyhow!("unknown screen: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Grid,
}

impl ViewMode {
    pub fn flipped(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "grid" => Ok(ViewMode::Grid),
            other => Err(anyhow!("invalid view mode: {other}")),
        }
    }
}

/// Everything a screen holds while it is on display. Dropped on navigation.
#[derive(Debug, Clone)]
pub struct ScreenState {
    pub screen: Screen,
    lists: Vec<ListViewController>,
    active: usize,
    pub view: ViewMode,
    pub notifications: bool,
}

impl ScreenState {
    #[tracing::instrument(skip(catalog, cfg))]
    pub fn enter(screen: Screen, catalog: &Catalog, cfg: &Config) -> anyhow::Result<Self> {
        let mut lists = Vec::new();
        for spec in screen.list_specs() {
            let name = spec.name.clone();
            let items = catalog.items(&name)?;
            let controller = ListViewController::new(spec, items)
                .with_context(|| format!("failed to build {screen} screen"))?;
            lists.push(controller);
        }

        if screen == Screen::Trips
            && let Some(trips) = lists.first_mut()
        {
            trips.set_category("upcoming");
        }

        let view = match cfg.get("default.view") {
            Some(raw) => raw.parse::<ViewMode>()?,
            None => ViewMode::List,
        };
        let notifications = cfg.get_bool("notifications").unwrap_or(true);

        info!(lists = lists.len(), "entered screen");
        Ok(Self {
            screen,
            lists,
            active: 0,
            view,
            notifications,
        })
    }

    pub fn lists(&self) -> &[ListViewController] {
        &self.lists
    }

    pub fn primary_list(&self) -> &ListViewController {
        &self.lists[0]
    }

    pub fn active_list(&self) -> &ListViewController {
        &self.lists[self.active]
    }

    pub fn active_list_mut(&mut self) -> &mut ListViewController {
        &mut self.lists[self.active]
    }

    pub fn list(&self, name: &str) -> Option<&ListViewController> {
        self.lists.iter().find(|list| list.spec().name == name)
    }

    pub fn use_list(&mut self, name: &str) -> anyhow::Result<()> {
        let idx = self
            .lists
            .iter()
            .position(|list| list.spec().name == name)
            .ok_or_else(|| anyhow!("screen {} has no list named {name}", self.screen))?;
        debug!(list = name, "switched active list");
        self.active = idx;
        Ok(())
    }
}
