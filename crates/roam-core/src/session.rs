//! Action language driving the screens.
//!
//! A session holds exactly one [`ScreenState`]. Actions mutate the active
//! list of that screen or render it; `go` replaces the whole state, which is
//! how view state gets discarded on navigation.

use std::io::{BufRead, Write};

use anyhow::{Context, anyhow};
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::render::Renderer;
use crate::screen::{Screen, ScreenState, ViewMode};

/// Word separating actions on a single command line.
pub const ACTION_SEPARATOR: &str = "then";

pub fn known_action_names() -> Vec<&'static str> {
    vec![
        "query",
        "search",
        "clear",
        "category",
        "tab",
        "toggle",
        "remove",
        "use",
        "go",
        "view",
        "notifications",
        "show",
        "lists",
        "categories",
        "progress",
        "flagged",
        "help",
    ]
}

pub fn expand_action_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Query(String),
    Category(String),
    /// Ids stay as typed until they are resolved against the active list.
    Toggle { id: String, flag: Option<String> },
    Remove(String),
    Use(String),
    Go(Screen),
    View(Option<ViewMode>),
    Notifications,
    Show,
    Lists,
    Categories,
    Progress,
    Flagged,
    Help,
}

impl Action {
    #[instrument]
    pub fn parse(tokens: &[String]) -> anyhow::Result<Self> {
        let (head, args) = tokens
            .split_first()
            .ok_or_else(|| anyhow!("empty action"))?;
        let lowered = head.to_ascii_lowercase();
        let known = known_action_names();
        let name = expand_action_abbrev(&lowered, &known)
            .ok_or_else(|| anyhow!("unknown or ambiguous action: {head}"))?;
        debug!(token = %head, expanded = name, "resolved action");

        let rest = args.join(" ");
        let action = match name {
            "query" | "search" => Action::Query(rest),
            "clear" => Action::Query(String::new()),
            "category" | "tab" => {
                if rest.is_empty() {
                    return Err(anyhow!("{name} needs a category name"));
                }
                Action::Category(rest)
            }
            "toggle" => match args {
                [id] => Action::Toggle {
                    id: id.clone(),
                    flag: None,
                },
                [id, flag] => Action::Toggle {
                    id: id.clone(),
                    flag: Some(flag.clone()),
                },
                _ => return Err(anyhow!("usage: toggle <id> [flag]")),
            },
            "remove" => match args {
                [id] => Action::Remove(id.clone()),
                _ => return Err(anyhow!("usage: remove <id>")),
            },
            "use" => match args {
                [list] => Action::Use(list.clone()),
                _ => return Err(anyhow!("usage: use <list>")),
            },
            "go" => match args {
                [screen] => Action::Go(screen.parse()?),
                _ => return Err(anyhow!("usage: go <screen>")),
            },
            "view" => match args {
                [] => Action::View(None),
                [mode] => Action::View(Some(mode.parse()?)),
                _ => return Err(anyhow!("usage: view [list|grid]")),
            },
            "notifications" => Action::Notifications,
            "show" => Action::Show,
            "lists" => Action::Lists,
            "categories" => Action::Categories,
            "progress" => Action::Progress,
            "flagged" => Action::Flagged,
            "help" => Action::Help,
            other => return Err(anyhow!("unhandled action: {other}")),
        };
        Ok(action)
    }

    /// Actions that print something on their own.
    pub fn renders(&self) -> bool {
        matches!(
            self,
            Action::Show
                | Action::Lists
                | Action::Categories
                | Action::Progress
                | Action::Flagged
                | Action::Help
                | Action::Notifications
        )
    }
}

/// Splits command-line words into actions at each `then`.
pub fn parse_actions(tokens: &[String]) -> anyhow::Result<Vec<Action>> {
    tokens
        .split(|token| token == ACTION_SEPARATOR)
        .filter(|group| !group.is_empty())
        .map(Action::parse)
        .collect()
}

/// Parses one line of script input. The text after `query`/`search` is kept
/// verbatim, so it may hold repeated spaces or the word `then`.
pub fn parse_line(line: &str) -> anyhow::Result<Vec<Action>> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    let lowered = head.to_ascii_lowercase();
    if let Some("query" | "search") = expand_action_abbrev(&lowered, &known_action_names()) {
        return Ok(vec![Action::Query(rest.to_string())]);
    }

    let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    parse_actions(&tokens)
}

#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    cfg: Config,
    state: ScreenState,
}

impl Session {
    #[instrument(skip(catalog, cfg))]
    pub fn start(screen: Screen, catalog: Catalog, cfg: Config) -> anyhow::Result<Self> {
        let state = ScreenState::enter(screen, &catalog, &cfg)?;
        Ok(Self {
            catalog,
            cfg,
            state,
        })
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    #[instrument(skip(self, renderer, out))]
    pub fn dispatch<W: Write>(
        &mut self,
        renderer: &Renderer,
        out: &mut W,
        action: Action,
    ) -> anyhow::Result<()> {
        match action {
            Action::Query(text) => self.state.active_list_mut().set_query(&text),
            Action::Category(category) => self.state.active_list_mut().set_category(&category),
            Action::Toggle { id, flag } => {
                let list = self.state.active_list_mut();
                let id = list.resolve_id(&id);
                let flag = flag.unwrap_or_else(|| list.spec().default_flag.clone());
                list.toggle_flag(&id, &flag);
            }
            Action::Remove(id) => {
                let list = self.state.active_list_mut();
                let id = list.resolve_id(&id);
                list.remove_item(&id);
            }
            Action::Use(name) => self.state.use_list(&name)?,
            Action::Go(screen) => self.navigate(screen)?,
            Action::View(mode) => {
                self.state.view = mode.unwrap_or_else(|| self.state.view.flipped());
                debug!(view = ?self.state.view, "view mode changed");
            }
            Action::Notifications => {
                self.state.notifications = !self.state.notifications;
                let label = if self.state.notifications { "on" } else { "off" };
                renderer.print_notice(out, &format!("notifications {label}"))?;
            }
            Action::Show => renderer.print_list(out, &self.state, self.state.active_list())?,
            Action::Lists => renderer.print_lists(out, &self.state)?,
            Action::Categories => renderer.print_facets(out, self.state.active_list())?,
            Action::Progress => renderer.print_progress(out, self.state.active_list())?,
            Action::Flagged => renderer.print_flagged(out, self.state.active_list())?,
            Action::Help => print_help(out)?,
        }
        Ok(())
    }

    /// Applies actions in order and shows the active list at the end unless
    /// the last action already printed something.
    #[instrument(skip_all, fields(count = actions.len()))]
    pub fn run_actions<W: Write>(
        &mut self,
        renderer: &Renderer,
        out: &mut W,
        actions: Vec<Action>,
    ) -> anyhow::Result<()> {
        let needs_show = actions.last().map(|a| !a.renders()).unwrap_or(true);
        for action in actions {
            self.dispatch(renderer, out, action)?;
        }
        if needs_show {
            self.dispatch(renderer, out, Action::Show)?;
        }
        Ok(())
    }

    /// One action per line until EOF. Blank lines and `#` comments are
    /// skipped; a bad line is reported and the session carries on.
    #[instrument(skip_all)]
    pub fn run_script<R: BufRead, W: Write>(
        &mut self,
        renderer: &Renderer,
        input: R,
        out: &mut W,
    ) -> anyhow::Result<()> {
        for (idx, line) in input.lines().enumerate() {
            let line = line.context("failed reading action input")?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let result = parse_line(trimmed)
                .and_then(|actions| self.run_actions(renderer, out, actions));
            if let Err(err) = result {
                warn!(line = idx + 1, error = %err, "action failed");
                eprintln!("line {}: {err:#}", idx + 1);
            }
        }
        Ok(())
    }

    fn navigate(&mut self, screen: Screen) -> anyhow::Result<()> {
        info!(from = %self.state.screen, to = %screen, "navigating; discarding view state");
        self.state = ScreenState::enter(screen, &self.catalog, &self.cfg)?;
        Ok(())
    }
}

fn print_help<W: Write>(out: &mut W) -> anyhow::Result<()> {
    let lines = [
        "query <text>          filter the active list by text",
        "clear                 clear the text filter",
        "category <name>       filter by category (`all` for every category)",
        "                      names are case-sensitive; `all` is lowercase",
        "tab <name>            same as category",
        "toggle <id> [flag]    flip a flag (default flag of the list)",
        "remove <id>           remove an item from the list",
        "use <list>            switch the active list on this screen",
        "go <screen>           open home, explore, favorites, trips or profile",
        "view [list|grid]      set or flip the view mode",
        "notifications         flip the notifications switch",
        "show                  print the active list",
        "lists                 print the lists of this screen",
        "categories            print categories with item counts",
        "progress              print completion of the default flag",
        "flagged               print items with the default flag set",
        "help                  print this help",
    ];
    for line in lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "separate several actions with `{ACTION_SEPARATOR}`")?;
    Ok(())
}
