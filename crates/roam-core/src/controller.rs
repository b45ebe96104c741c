//! The list view controller shared by every screen.
//!
//! A controller owns a seed collection of [`Item`]s and a [`FilterState`].
//! The visible list is recomputed on every read from those two inputs, so it
//! can never go stale. Mutations never fail: unknown ids are ignored and
//! unknown categories simply match nothing.

use std::collections::HashSet;

use anyhow::anyhow;
use tracing::{debug, instrument, trace};

use crate::filter::{ALL_CATEGORY, CategorySelection, FilterState};
use crate::item::{Item, ItemId};

/// Per-list configuration: which categories exist, which fields are
/// searchable and which flag a bare `toggle` flips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpec {
    pub name: String,
    pub categories: Vec<String>,
    pub search_fields: Vec<String>,
    pub default_flag: String,
    /// Plural noun for result counts, e.g. "destinations".
    pub noun: String,
}

impl ListSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            categories: vec![],
            search_fields: vec!["name".to_string()],
            default_flag: "favorite".to_string(),
            noun: "items".to_string(),
        }
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn search(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.default_flag = flag.to_string();
        self
    }

    pub fn noun(mut self, noun: &str) -> Self {
        self.noun = noun.to_string();
        self
    }

    pub fn knows_category(&self, category: &str) -> bool {
        category == ALL_CATEGORY || self.categories.iter().any(|c| c == category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded down; an empty list counts as 0%.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.done * 100 / self.total
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListViewController {
    spec: ListSpec,
    items: Vec<Item>,
    filter: FilterState,
}

impl ListViewController {
    /// Seeds the controller. Rejects collections with duplicate ids.
    #[instrument(skip(spec, items), fields(list = %spec.name, count = items.len()))]
    pub fn new(spec: ListSpec, items: Vec<Item>) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(anyhow!(
                    "duplicate item id {} in list {}",
                    item.id,
                    spec.name
                ));
            }
        }

        debug!("seeded list controller");
        Ok(Self {
            spec,
            items,
            filter: FilterState::default(),
        })
    }

    pub fn spec(&self) -> &ListSpec {
        &self.spec
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The whole source collection in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Maps a typed token to an id as it is displayed, so a text id such as
    /// `"007"` stays reachable. Unknown tokens fall back to [`ItemId::parse`].
    pub fn resolve_id(&self, token: &str) -> ItemId {
        let token = token.trim();
        self.items
            .iter()
            .find(|item| item.id.to_string() == token)
            .map(|item| item.id.clone())
            .unwrap_or_else(|| ItemId::parse(token))
    }

    #[instrument(skip(self), fields(list = %self.spec.name))]
    pub fn set_query(&mut self, text: &str) {
        debug!(query = text, "query changed");
        self.filter.query = text.to_string();
    }

    /// Unknown categories are accepted and leave nothing visible.
    #[instrument(skip(self), fields(list = %self.spec.name))]
    pub fn set_category(&mut self, category: &str) {
        if !self.spec.knows_category(category) {
            debug!(category, "category not in list spec; nothing will match");
        }
        self.filter.category = CategorySelection::parse(category);
    }

    pub fn reset_filter(&mut self) {
        self.filter = FilterState::default();
    }

    /// Flips `flag` on the item; no-op for an unknown id.
    #[instrument(skip(self, id), fields(list = %self.spec.name, id = %id))]
    pub fn toggle_flag(&mut self, id: &ItemId, flag: &str) {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                let value = item.toggle(flag);
                debug!(flag, value, "toggled flag");
            }
            None => trace!("toggle on unknown id ignored"),
        }
    }

    /// Deletes the item; no-op for an unknown id.
    #[instrument(skip(self, id), fields(list = %self.spec.name, id = %id))]
    pub fn remove_item(&mut self, id: &ItemId) {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() == before {
            trace!("remove on unknown id ignored");
        } else {
            debug!(remaining = self.items.len(), "removed item");
        }
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item, &self.spec.search_fields))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item, &self.spec.search_fields))
            .count()
    }

    /// `None` for an unknown id.
    pub fn flag(&self, id: &ItemId, flag: &str) -> Option<bool> {
        self.get(id).map(|item| item.flag(flag))
    }

    pub fn flagged(&self, flag: &str) -> Vec<&Item> {
        self.items.iter().filter(|item| item.flag(flag)).collect()
    }

    /// `all` with the collection size, then each known category in spec
    /// order with its item count.
    pub fn category_facets(&self) -> Vec<(String, usize)> {
        let mut facets = Vec::with_capacity(self.spec.categories.len() + 1);
        facets.push((ALL_CATEGORY.to_string(), self.items.len()));
        for category in &self.spec.categories {
            let count = self
                .items
                .iter()
                .filter(|item| item.category.as_deref() == Some(category.as_str()))
                .count();
            facets.push((category.clone(), count));
        }
        facets
    }

    pub fn progress(&self, flag: &str) -> Progress {
        Progress {
            done: self.items.iter().filter(|item| item.flag(flag)).count(),
            total: self.items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListSpec, ListViewController, Progress};
    use crate::item::{Item, ItemId};

    fn spec() -> ListSpec {
        ListSpec::new("destinations")
            .categories(&["beach", "adventure"])
            .search(&["name", "location"])
    }

    fn controller() -> ListViewController {
        ListViewController::new(
            spec(),
            vec![
                Item::new(1)
                    .with_field("name", "Machu Picchu")
                    .with_category("adventure"),
                Item::new(2)
                    .with_field("name", "Amalfi Coast")
                    .with_category("beach"),
            ],
        )
        .unwrap()
    }

    fn ids(ctl: &ListViewController) -> Vec<ItemId> {
        ctl.visible_items().iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn query_then_category_then_all() {
        let mut ctl = controller();

        ctl.set_query("amalfi");
        assert_eq!(ids(&ctl), vec![ItemId::Num(2)]);

        ctl.set_category("beach");
        ctl.set_query("");
        assert_eq!(ids(&ctl), vec![ItemId::Num(2)]);

        ctl.set_category("all");
        assert_eq!(ids(&ctl), vec![ItemId::Num(1), ItemId::Num(2)]);
    }

    #[test]
    fn toggle_twice_then_remove() {
        let mut ctl = controller();
        let one = ItemId::Num(1);

        ctl.toggle_flag(&one, "favorite");
        assert_eq!(ctl.flag(&one, "favorite"), Some(true));
        ctl.toggle_flag(&one, "favorite");
        assert_eq!(ctl.flag(&one, "favorite"), Some(false));

        ctl.remove_item(&one);
        for category in ["all", "adventure", "beach", "nope"] {
            ctl.set_category(category);
            for query in ["", "machu", "a"] {
                ctl.set_query(query);
                assert!(!ids(&ctl).contains(&one));
            }
        }
        assert_eq!(ctl.flag(&one, "favorite"), None);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut ctl = controller();
        let before = ctl.items().to_vec();
        ctl.toggle_flag(&ItemId::Num(99), "favorite");
        ctl.remove_item(&ItemId::from("ghost"));
        assert_eq!(ctl.items(), before.as_slice());
    }

    #[test]
    fn unknown_category_yields_empty() {
        let mut ctl = controller();
        ctl.set_category("volcano");
        assert!(ctl.visible_items().is_empty());
        assert_eq!(ctl.visible_count(), 0);
        assert_eq!(ctl.filter().category.as_str(), "volcano");
    }

    #[test]
    fn toggle_does_not_reorder_or_depend_on_filter() {
        let mut ctl = controller();
        ctl.set_query("machu");
        ctl.toggle_flag(&ItemId::Num(2), "favorite");
        assert_eq!(ctl.flag(&ItemId::Num(2), "favorite"), Some(true));
        assert_eq!(ctl.items()[0].id, ItemId::Num(1));
        assert_eq!(ctl.items()[1].id, ItemId::Num(2));
        assert_eq!(ctl.len(), 2);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = ListViewController::new(spec(), vec![Item::new(1), Item::new(1)])
            .unwrap_err()
            .to_string();
        assert!(err.contains("duplicate item id 1"));
    }

    #[test]
    fn item_matching_on_several_fields_appears_once() {
        let ctl = {
            let mut ctl = ListViewController::new(
                spec(),
                vec![
                    Item::new(1)
                        .with_field("name", "Maldives")
                        .with_field("location", "Maldives"),
                ],
            )
            .unwrap();
            ctl.set_query("mal");
            ctl
        };
        assert_eq!(ctl.visible_items().len(), 1);
    }

    #[test]
    fn facets_and_progress() {
        let mut ctl = controller();
        assert_eq!(
            ctl.category_facets(),
            vec![
                ("all".to_string(), 2),
                ("beach".to_string(), 1),
                ("adventure".to_string(), 1),
            ]
        );

        ctl.toggle_flag(&ItemId::Num(1), "completed");
        let progress = ctl.progress("completed");
        assert_eq!(progress, Progress { done: 1, total: 2 });
        assert_eq!(progress.percent(), 50);
        assert_eq!(Progress { done: 0, total: 0 }.percent(), 0);
        assert_eq!(ctl.flagged("completed").len(), 1);
    }

    #[test]
    fn reset_filter_restores_defaults() {
        let mut ctl = controller();
        ctl.set_query("zzz");
        ctl.set_category("beach");
        ctl.reset_filter();
        assert!(ctl.filter().is_default());
        assert_eq!(ctl.visible_count(), 2);
    }

    #[test]
    fn numeric_looking_text_ids_resolve_as_shown() {
        let mut ctl = ListViewController::new(
            spec(),
            vec![
                Item::with_id(ItemId::from("42")).with_field("name", "Oslo"),
                Item::with_id(ItemId::from("007")).with_field("name", "Bond"),
                Item::new(5).with_field("name", "Lima"),
            ],
        )
        .unwrap();

        assert_eq!(ctl.resolve_id("42"), ItemId::Text("42".to_string()));
        assert_eq!(ctl.resolve_id(" 007 "), ItemId::Text("007".to_string()));
        assert_eq!(ctl.resolve_id("5"), ItemId::Num(5));
        assert_eq!(ctl.resolve_id("7"), ItemId::Num(7));

        let id = ctl.resolve_id("007");
        ctl.toggle_flag(&id, "favorite");
        assert_eq!(ctl.flag(&id, "favorite"), Some(true));
    }
}
