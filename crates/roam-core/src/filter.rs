use tracing::trace;

use crate::item::Item;

/// Category value that disables category filtering.
pub const ALL_CATEGORY: &str = "all";

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub enum CategorySelection {
  #[default]
  All,
  Only(String)
}

impl CategorySelection {
  pub fn parse(raw: &str) -> Self {
    if raw == ALL_CATEGORY {
      Self::All
    } else {
      Self::Only(raw.to_string())
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      | Self::All => ALL_CATEGORY,
      | Self::Only(name) => name
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pred {
  TextContains(String),
  CategoryEq(String)
}

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct FilterState {
  pub query:    String,
  pub category: CategorySelection
}

impl FilterState {
  /// Conjunction of the active
  /// predicates; empty when nothing
  /// filters.
  pub fn predicates(&self) -> Vec<Pred> {
    let mut preds = Vec::with_capacity(2);
    if let CategorySelection::Only(name) =
      &self.category
    {
      preds.push(Pred::CategoryEq(
        name.clone()
      ));
    }
    if !self.query.is_empty() {
      preds.push(Pred::TextContains(
        fold(&self.query)
      ));
    }
    preds
  }

  pub fn is_default(&self) -> bool {
    self.query.is_empty()
      && self.category
        == CategorySelection::All
  }

  #[tracing::instrument(skip(
    self, item, search_fields
  ))]
  pub fn matches(
    &self,
    item: &Item,
    search_fields: &[String]
  ) -> bool {
    let ok = self
      .predicates()
      .iter()
      .all(|pred| {
        eval_pred(
          pred,
          item,
          search_fields
        )
      });
    trace!(id = %item.id, ok, "evaluated filter");
    ok
  }
}

fn eval_pred(
  pred: &Pred,
  item: &Item,
  search_fields: &[String]
) -> bool {
  match pred {
    | Pred::CategoryEq(name) => {
      item.category.as_deref()
        == Some(name.as_str())
    }
    | Pred::TextContains(needle) => {
      item
        .searchable(search_fields)
        .any(|value| {
          fold(value).contains(needle)
        })
    }
  }
}

/// Case folding used on both sides
/// of the substring test.
pub fn fold(s: &str) -> String {
  s.to_lowercase()
}
