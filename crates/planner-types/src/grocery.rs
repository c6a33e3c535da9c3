use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const UNCATEGORIZED: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub checked: bool,
}

impl GroceryItem {
    /// "2 cups flour", "3 eggs", "salt"
    pub fn display(&self) -> String {
        let qty = self.quantity.map(|q| {
            if q.fract() == 0.0 {
                format!("{}", q as i64)
            } else {
                format!("{:.2}", q).trim_end_matches('0').to_string()
            }
        });
        match (qty, self.unit.as_deref().filter(|u| !u.is_empty())) {
            (Some(q), Some(u)) => format!("{} {} {}", q, u, self.name),
            (Some(q), None) => format!("{} {}", q, self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryList {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<GroceryItem>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl GroceryList {
    /// Items grouped by aisle category, alphabetically, each paired with its
    /// index in `items`.
    pub fn by_category(&self) -> BTreeMap<String, Vec<(usize, &GroceryItem)>> {
        let mut groups: BTreeMap<String, Vec<(usize, &GroceryItem)>> = BTreeMap::new();
        for (index, item) in self.items.iter().enumerate() {
            let category = item
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNCATEGORIZED);
            groups.entry(category.to_string()).or_default().push((index, item));
        }
        groups
    }

    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|i| !i.checked).count()
    }
}

/// Body of `POST /grocery-lists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryListCreate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
