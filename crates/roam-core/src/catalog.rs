//! Seed data for the screens.
//!
//! The built-in lists mirror the sample content the app ships with. A data
//! file can replace any of them by name; lists it does not mention keep their
//! built-in contents.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::item::Item;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<Item>>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let mut lists = BTreeMap::new();
        lists.insert("featured".to_string(), featured());
        lists.insert("trending".to_string(), trending());
        lists.insert("destinations".to_string(), destinations());
        lists.insert("favorites".to_string(), favorites());
        lists.insert("trips".to_string(), trips());
        lists.insert("checklist".to_string(), checklist());
        lists.insert("achievements".to_string(), achievements());
        lists.insert("stats".to_string(), stats());
        Self { lists }
    }

    /// Reads a catalog file. `.json` files are parsed as JSON, anything else
    /// as TOML.
    #[tracing::instrument(skip(path))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!(file = %path.display(), "loading catalog");
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let catalog: Catalog = if is_json {
            serde_json::from_str(&text)
                .with_context(|| format!("failed parsing {} as json", path.display()))?
        } else {
            toml::from_str(&text)
                .with_context(|| format!("failed parsing {} as toml", path.display()))?
        };

        info!(
            file = %path.display(),
            lists = catalog.lists.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Lists in `other` replace same-named lists here.
    pub fn overlay(mut self, other: Catalog) -> Self {
        for (name, items) in other.lists {
            debug!(list = %name, count = items.len(), "overriding built-in list");
            self.lists.insert(name, items);
        }
        self
    }

    pub fn items(&self, list: &str) -> anyhow::Result<Vec<Item>> {
        self.lists
            .get(list)
            .cloned()
            .ok_or_else(|| anyhow!("catalog has no list named {list}"))
    }
}

fn place(id: u64, name: &str, location: &str, category: &str) -> Item {
    Item::new(id)
        .with_field("name", name)
        .with_field("location", location)
        .with_category(category)
}

fn featured() -> Vec<Item> {
    vec![
        Item::new(1)
            .with_field("name", "Santorini, Greece")
            .with_field("description", "Stunning sunsets and white architecture")
            .with_detail("rating", "4.9")
            .with_detail("price", "$299"),
        Item::new(2)
            .with_field("name", "Bali, Indonesia")
            .with_field("description", "Tropical paradise with rich culture")
            .with_detail("rating", "4.8")
            .with_detail("price", "$199"),
        Item::new(3)
            .with_field("name", "Tokyo, Japan")
            .with_field("description", "Modern city meets ancient traditions")
            .with_detail("rating", "4.9")
            .with_detail("price", "$399"),
    ]
}

fn trending() -> Vec<Item> {
    vec![
        Item::new(1).with_field("name", "Maldives").with_category("Beach"),
        Item::new(2).with_field("name", "Swiss Alps").with_category("Mountain"),
        Item::new(3).with_field("name", "Paris").with_category("City"),
        Item::new(4).with_field("name", "Iceland").with_category("Nature"),
    ]
}

fn destinations() -> Vec<Item> {
    vec![
        place(1, "Machu Picchu", "Peru", "adventure")
            .with_field("description", "Ancient Incan citadel high in the Andes Mountains")
            .with_detail("rating", "4.9")
            .with_detail("reviews", 2847)
            .with_detail("price", "$599")
            .with_detail("duration", "7 days")
            .with_detail("highlights", "UNESCO World Heritage, Hiking, History"),
        place(2, "Amalfi Coast", "Italy", "beach")
            .with_field("description", "Stunning coastal scenery with charming villages")
            .with_detail("rating", "4.8")
            .with_detail("reviews", 1923)
            .with_detail("price", "$899")
            .with_detail("duration", "5 days")
            .with_detail("highlights", "Scenic Drives, Local Cuisine, Photography"),
        place(3, "Kyoto", "Japan", "culture")
            .with_field("description", "Traditional temples and beautiful gardens")
            .with_detail("rating", "4.9")
            .with_detail("reviews", 3156)
            .with_detail("price", "$749")
            .with_detail("duration", "6 days")
            .with_detail("highlights", "Temples, Gardens, Tea Ceremony"),
        place(4, "Banff National Park", "Canada", "mountain")
            .with_field("description", "Pristine wilderness and stunning mountain lakes")
            .with_detail("rating", "4.7")
            .with_detail("reviews", 1654)
            .with_detail("price", "$459")
            .with_detail("duration", "4 days")
            .with_detail("highlights", "Hiking, Wildlife, Photography"),
        place(5, "Dubai", "UAE", "city")
            .with_field("description", "Modern metropolis with luxury and innovation")
            .with_detail("rating", "4.6")
            .with_detail("reviews", 2341)
            .with_detail("price", "$1299")
            .with_detail("duration", "5 days")
            .with_detail("highlights", "Skyscrapers, Shopping, Desert Safari"),
        place(6, "Maldives", "Maldives", "beach")
            .with_field("description", "Tropical paradise with crystal clear waters")
            .with_detail("rating", "4.9")
            .with_detail("reviews", 1876)
            .with_detail("price", "$1899")
            .with_detail("duration", "7 days")
            .with_detail("highlights", "Overwater Bungalows, Snorkeling, Spa"),
    ]
}

fn favorites() -> Vec<Item> {
    vec![
        place(1, "Santorini, Greece", "Cyclades, Greece", "Beach")
            .with_field("description", "Stunning sunsets and iconic white architecture")
            .with_flag("favorite", true)
            .with_detail("rating", "4.9")
            .with_detail("price", "$299")
            .with_detail("saved", "2 days ago"),
        place(2, "Machu Picchu", "Cusco, Peru", "Adventure")
            .with_field("description", "Ancient Incan citadel high in the Andes Mountains")
            .with_flag("favorite", true)
            .with_detail("rating", "4.9")
            .with_detail("price", "$599")
            .with_detail("saved", "1 week ago"),
        place(3, "Kyoto, Japan", "Kansai, Japan", "Culture")
            .with_field("description", "Traditional temples and beautiful gardens")
            .with_flag("favorite", true)
            .with_detail("rating", "4.8")
            .with_detail("price", "$749")
            .with_detail("saved", "2 weeks ago"),
        place(4, "Maldives", "Indian Ocean", "Beach")
            .with_field("description", "Tropical paradise with crystal clear waters")
            .with_flag("favorite", true)
            .with_detail("rating", "4.9")
            .with_detail("price", "$1899")
            .with_detail("saved", "3 weeks ago"),
        place(5, "Banff National Park", "Alberta, Canada", "Nature")
            .with_field("description", "Pristine wilderness and stunning mountain lakes")
            .with_flag("favorite", true)
            .with_detail("rating", "4.7")
            .with_detail("price", "$459")
            .with_detail("saved", "1 month ago"),
        place(6, "Dubai", "UAE", "City")
            .with_field("description", "Modern metropolis with luxury and innovation")
            .with_flag("favorite", true)
            .with_detail("rating", "4.6")
            .with_detail("price", "$1299")
            .with_detail("saved", "1 month ago"),
    ]
}

fn trips() -> Vec<Item> {
    vec![
        Item::new(1)
            .with_field("destination", "Tokyo, Japan")
            .with_category("upcoming")
            .with_detail("dates", "Mar 15 - Mar 22, 2024")
            .with_detail("days_left", 12)
            .with_detail("travelers", 2)
            .with_detail("status", "confirmed")
            .with_detail("progress", "75%"),
        Item::new(2)
            .with_field("destination", "Santorini, Greece")
            .with_category("upcoming")
            .with_detail("dates", "Apr 10 - Apr 17, 2024")
            .with_detail("days_left", 38)
            .with_detail("travelers", 4)
            .with_detail("status", "planning")
            .with_detail("progress", "45%"),
        Item::new(3)
            .with_field("destination", "Bali, Indonesia")
            .with_field("memories", "Amazing temples and beaches")
            .with_category("past")
            .with_detail("dates", "Dec 20 - Dec 27, 2023")
            .with_detail("rating", "4.8")
            .with_detail("photos", 127),
        Item::new(4)
            .with_field("destination", "Paris, France")
            .with_field("memories", "Romantic city with incredible food")
            .with_category("past")
            .with_detail("dates", "Oct 5 - Oct 12, 2023")
            .with_detail("rating", "4.9")
            .with_detail("photos", 89),
    ]
}

fn checklist() -> Vec<Item> {
    [
        (1, "Book flights", true),
        (2, "Reserve hotel", true),
        (3, "Get travel insurance", false),
        (4, "Plan itinerary", false),
        (5, "Pack luggage", false),
    ]
    .into_iter()
    .map(|(id, task, done)| {
        Item::new(id)
            .with_field("task", task)
            .with_flag("completed", done)
    })
    .collect()
}

fn achievements() -> Vec<Item> {
    [
        (1, "Explorer", "Visited 10+ countries", "🌍", true),
        (2, "Photographer", "Shared 100+ photos", "📸", true),
        (3, "Reviewer", "Written 25+ reviews", "⭐", true),
        (4, "Adventurer", "Completed 50+ trips", "🏔️", false),
    ]
    .into_iter()
    .map(|(id, title, description, icon, earned)| {
        Item::new(id)
            .with_field("title", title)
            .with_field("description", description)
            .with_flag("earned", earned)
            .with_detail("icon", icon)
    })
    .collect()
}

fn stats() -> Vec<Item> {
    [
        (1, "Countries Visited", "12"),
        (2, "Trips Completed", "28"),
        (3, "Photos Shared", "156"),
        (4, "Reviews Written", "34"),
    ]
    .into_iter()
    .map(|(id, label, value)| {
        Item::new(id)
            .with_field("name", label)
            .with_detail("value", value)
    })
    .collect()
}
