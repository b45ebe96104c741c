use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::controller::ListViewController;
use crate::filter::CategorySelection;
use crate::item::Item;
use crate::screen::{ScreenState, ViewMode};

const GRID_COLUMNS: usize = 2;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self {
            color: color && io::stdout().is_terminal(),
        })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip_all, fields(list = %list.spec().name))]
    pub fn print_list<W: Write>(
        &self,
        out: &mut W,
        screen: &ScreenState,
        list: &ListViewController,
    ) -> anyhow::Result<()> {
        let visible = list.visible_items();
        writeln!(out, "{} / {}", screen.screen, list.spec().name)?;
        writeln!(
            out,
            "{} {} found{}",
            visible.len(),
            list.spec().noun,
            filter_summary(list)
        )?;

        if visible.is_empty() {
            match list.filter().category {
                CategorySelection::Only(ref category) => {
                    writeln!(out, "No {} in {category}.", list.spec().noun)?
                }
                CategorySelection::All => writeln!(out, "No {} found.", list.spec().noun)?,
            }
            return Ok(());
        }

        match screen.view {
            ViewMode::List => self.print_table(out, list, &visible),
            ViewMode::Grid => self.print_grid(out, list, &visible),
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn print_flagged<W: Write>(
        &self,
        out: &mut W,
        list: &ListViewController,
    ) -> anyhow::Result<()> {
        let flag = &list.spec().default_flag;
        let flagged = list.flagged(flag);
        writeln!(out, "{} {} marked {flag}", flagged.len(), list.spec().noun)?;
        if flagged.is_empty() {
            return Ok(());
        }
        self.print_table(out, list, &flagged)
    }

    pub fn print_lists<W: Write>(&self, out: &mut W, screen: &ScreenState) -> anyhow::Result<()> {
        let active = &screen.active_list().spec().name;
        let headers = vec![
            "".to_string(),
            "List".to_string(),
            "Items".to_string(),
            "Visible".to_string(),
        ];
        let rows = screen
            .lists()
            .iter()
            .map(|list| {
                let marker = if &list.spec().name == active { "*" } else { "" };
                vec![
                    marker.to_string(),
                    list.spec().name.clone(),
                    list.len().to_string(),
                    list.visible_count().to_string(),
                ]
            })
            .collect();
        write_table(out, headers, rows)
    }

    pub fn print_facets<W: Write>(
        &self,
        out: &mut W,
        list: &ListViewController,
    ) -> anyhow::Result<()> {
        let active = list.filter().category.as_str();
        for (category, count) in list.category_facets() {
            let label = format!("{category} ({count})");
            if category == active {
                writeln!(out, "[{}]", self.paint(&label, "1"))?;
            } else {
                writeln!(out, " {label}")?;
            }
        }
        Ok(())
    }

    pub fn print_progress<W: Write>(
        &self,
        out: &mut W,
        list: &ListViewController,
    ) -> anyhow::Result<()> {
        let flag = &list.spec().default_flag;
        let progress = list.progress(flag);
        let filled = progress.percent() / 10;
        writeln!(
            out,
            "{}/{} {} {flag} ({}%) [{}{}]",
            progress.done,
            progress.total,
            list.spec().noun,
            progress.percent(),
            "#".repeat(filled),
            ".".repeat(10 - filled)
        )?;
        Ok(())
    }

    pub fn print_notice<W: Write>(&self, out: &mut W, text: &str) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(text, "36"))?;
        Ok(())
    }

    fn print_table<W: Write>(
        &self,
        out: &mut W,
        list: &ListViewController,
        items: &[&Item],
    ) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Info".to_string(),
            "Category".to_string(),
            "Details".to_string(),
            "".to_string(),
        ];

        let rows = items
            .iter()
            .map(|item| {
                vec![
                    self.paint(&item.id.to_string(), "33"),
                    item.label(),
                    secondary_text(item, &list.spec().search_fields),
                    item.category.clone().unwrap_or_default(),
                    detail_text(item),
                    self.flag_marker(item, &list.spec().default_flag),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    fn print_grid<W: Write>(
        &self,
        out: &mut W,
        list: &ListViewController,
        items: &[&Item],
    ) -> anyhow::Result<()> {
        let cells: Vec<String> = items
            .iter()
            .map(|item| {
                let mut cell = format!("[{}] {}", item.id, item.label());
                if let Some(rating) = item.detail("rating") {
                    cell.push_str(&format!(" *{rating}"));
                }
                if let Some(price) = item.detail("price") {
                    cell.push_str(&format!(" {price}"));
                }
                let marker = self.flag_marker(item, &list.spec().default_flag);
                if !marker.is_empty() {
                    cell.push(' ');
                    cell.push_str(&marker);
                }
                cell
            })
            .collect();

        let width = cells
            .iter()
            .map(|cell| UnicodeWidthStr::width(strip_ansi(cell).as_str()))
            .max()
            .unwrap_or(0);

        for row in cells.chunks(GRID_COLUMNS) {
            let line = row
                .iter()
                .map(|cell| {
                    let visible = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                    format!("{cell}{}", " ".repeat(width.saturating_sub(visible)))
                })
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }

    fn flag_marker(&self, item: &Item, flag: &str) -> String {
        if !item.flag(flag) {
            return String::new();
        }
        match flag {
            "favorite" => self.paint("♥", "31"),
            "completed" | "earned" => self.paint("✓", "32"),
            other => self.paint(other, "32"),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn filter_summary(list: &ListViewController) -> String {
    let filter = list.filter();
    let mut parts = Vec::new();
    if let CategorySelection::Only(category) = &filter.category {
        parts.push(format!("category {category}"));
    }
    if !filter.query.is_empty() {
        parts.push(format!("matching \"{}\"", filter.query));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

/// First searchable field that is not already the label.
fn secondary_text(item: &Item, search_fields: &[String]) -> String {
    let label = item.label();
    item.searchable(search_fields)
        .find(|value| *value != label)
        .unwrap_or_default()
        .to_string()
}

fn detail_text(item: &Item) -> String {
    item.details
        .iter()
        .filter(|(key, _)| key.as_str() != "highlights")
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| format!("{:width$}", header, width = widths[idx]))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{}", header_line.trim_end())?;

    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{}", rule.trim_end())?;

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                let padding = widths[idx].saturating_sub(visible_width);
                format!("{}{}", cell, " ".repeat(padding))
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
