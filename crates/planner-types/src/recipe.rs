use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Ingredient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Recipe {
    /// Prep plus cook time; `None` only when neither is known.
    pub fn total_time_minutes(&self) -> Option<u32> {
        match (self.prep_time_minutes, self.cook_time_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
        }
    }

    /// Creation time. The backend sends RFC 3339 or naive UTC timestamps.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref()?)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Body of `POST /recipes` and `PUT /recipes/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RecipeCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl From<&Recipe> for RecipeCreate {
    fn from(r: &Recipe) -> Self {
        Self {
            title: r.title.clone(),
            description: r.description.clone(),
            ingredients: r.ingredients.clone(),
            instructions: r.instructions.clone(),
            prep_time_minutes: r.prep_time_minutes,
            cook_time_minutes: r.cook_time_minutes,
            servings: r.servings,
            difficulty: r.difficulty,
            category: r.category.clone(),
            tags: r.tags.clone(),
        }
    }
}

/// Partial update for `PATCH /recipes/:id`; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Server-side search parameters for `GET /recipes`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeSearchParams {
    pub query: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_total_time: Option<u32>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl RecipeSearchParams {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("query", q.to_string()));
        }
        if let Some(d) = self.difficulty {
            pairs.push(("difficulty", d.as_str().to_string()));
        }
        if let Some(t) = self.max_total_time {
            pairs.push(("max_total_time", t.to_string()));
        }
        if let Some(c) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", c.to_string()));
        }
        if let Some(l) = self.limit {
            pairs.push(("limit", l.to_string()));
        }
        if let Some(o) = self.offset {
            pairs.push(("offset", o.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarRecipe {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub similarity: f64,
}

/// Payload of a 409 answer to recipe creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateInfo {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub existing_recipe_id: Option<String>,
    #[serde(default)]
    pub similar_recipes: Vec<SimilarRecipe>,
}

impl DuplicateInfo {
    /// Accepts both `{detail: {...}}` and the bare object.
    pub fn from_body(body: &Value) -> Option<Self> {
        let candidate = match body.get("detail") {
            Some(detail) if detail.is_object() => detail,
            _ => body,
        };
        let obj = candidate.as_object()?;
        if !obj.contains_key("existing_recipe_id") && !obj.contains_key("similar_recipes") {
            return None;
        }
        let mut info: DuplicateInfo = serde_json::from_value(candidate.clone()).ok()?;
        if info.existing_recipe_id.is_none() && info.similar_recipes.is_empty() {
            return None;
        }
        info.similar_recipes
            .sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Some(info)
    }

    /// Id the "view existing" action should open.
    pub fn best_match_id(&self) -> Option<&str> {
        self.existing_recipe_id
            .as_deref()
            .or_else(|| self.similar_recipes.first().map(|s| s.id.as_str()))
    }
}
