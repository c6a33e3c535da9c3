//! Recipe cache with a derived, filtered and sorted view.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

use planner_types::{
    recipe::{Difficulty, DuplicateInfo, Recipe, RecipeCreate, RecipeSearchParams, RecipeUpdate},
    Result,
};

use crate::api::recipes as api;
use crate::client::ApiClient;
use crate::humanize::{user_friendly_message, ErrorContext};

/// Client-side filters over the fetched list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilters {
    /// Matches title or any ingredient name, case-insensitively
    pub query: String,
    pub categories: BTreeSet<String>,
    pub difficulties: BTreeSet<Difficulty>,
    pub min_total_time: Option<u32>,
    pub max_total_time: Option<u32>,
    /// Every listed ingredient must be present
    pub include_ingredients: Vec<String>,
    /// None of the listed ingredients may be present
    pub exclude_ingredients: Vec<String>,
}

impl RecipeFilters {
    pub fn is_empty(&self) -> bool {
        *self == RecipeFilters::default()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let in_title = recipe.title.to_lowercase().contains(&query);
            let in_ingredients = recipe
                .ingredients
                .iter()
                .any(|i| i.name.to_lowercase().contains(&query));
            if !in_title && !in_ingredients {
                return false;
            }
        }
        if !self.categories.is_empty() {
            match &recipe.category {
                Some(c) if self.categories.contains(c) => {}
                _ => return false,
            }
        }
        if !self.difficulties.is_empty() {
            match recipe.difficulty {
                Some(d) if self.difficulties.contains(&d) => {}
                _ => return false,
            }
        }
        if self.min_total_time.is_some() || self.max_total_time.is_some() {
            let Some(total) = recipe.total_time_minutes() else {
                return false;
            };
            if self.min_total_time.is_some_and(|min| total < min)
                || self.max_total_time.is_some_and(|max| total > max)
            {
                return false;
            }
        }
        let has = |wanted: &str| {
            let wanted = wanted.trim().to_lowercase();
            recipe
                .ingredients
                .iter()
                .any(|i| i.name.to_lowercase().contains(&wanted))
        };
        if !self
            .include_ingredients
            .iter()
            .filter(|i| !i.trim().is_empty())
            .all(|i| has(i))
        {
            return false;
        }
        if self
            .exclude_ingredients
            .iter()
            .filter(|i| !i.trim().is_empty())
            .any(|i| has(i))
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    TotalTime,
    Newest,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[SortKey::Title, SortKey::TotalTime, SortKey::Newest]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Title => "Title",
            SortKey::TotalTime => "Total time",
            SortKey::Newest => "Newest",
        }
    }
}

pub fn filter_recipes(recipes: &[Recipe], filters: &RecipeFilters) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect()
}

/// Stable sort, so re-sorting a sorted list is a no-op.
pub fn sort_recipes(recipes: &mut [Recipe], key: SortKey) {
    match key {
        SortKey::Title => {
            recipes.sort_by_cached_key(|r| r.title.to_lowercase());
        }
        SortKey::TotalTime => recipes.sort_by(|a, b| {
            match (a.total_time_minutes(), b.total_time_minutes()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        SortKey::Newest => recipes.sort_by(|a, b| b.created().cmp(&a.created())),
    }
}

/// A create that hit a possible duplicate, waiting for the user's call.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDuplicate {
    pub info: DuplicateInfo,
    pub payload: RecipeCreate,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeState {
    pub recipes: Vec<Recipe>,
    pub filters: RecipeFilters,
    pub sort: SortKey,
    /// `recipes` after filters and sort
    pub visible: Vec<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
    pub duplicate: Option<PendingDuplicate>,
}

impl RecipeState {
    fn recompute(&mut self) {
        let mut visible = filter_recipes(&self.recipes, &self.filters);
        sort_recipes(&mut visible, self.sort);
        self.visible = visible;
    }

    fn set_recipes(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
        self.recompute();
    }
}

#[derive(Clone)]
pub struct RecipeStore {
    state: Rc<RefCell<RecipeState>>,
    client: ApiClient,
}

impl RecipeStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            state: Rc::new(RefCell::new(RecipeState::default())),
            client,
        }
    }

    pub fn snapshot(&self) -> RecipeState {
        self.state.borrow().clone()
    }

    pub fn visible(&self) -> Vec<Recipe> {
        self.state.borrow().visible.clone()
    }

    pub fn find(&self, id: &str) -> Option<Recipe> {
        self.state.borrow().recipes.iter().find(|r| r.id == id).cloned()
    }

    pub fn set_filters(&self, filters: RecipeFilters) {
        let mut state = self.state.borrow_mut();
        state.filters = filters;
        state.recompute();
    }

    pub fn set_sort(&self, sort: SortKey) {
        let mut state = self.state.borrow_mut();
        state.sort = sort;
        state.recompute();
    }

    pub fn dismiss_duplicate(&self) {
        self.state.borrow_mut().duplicate = None;
    }

    pub async fn fetch(&self) -> Result<()> {
        self.state.borrow_mut().loading = true;
        let result = api::list(&self.client, &RecipeSearchParams::default()).await;
        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(recipes) => {
                log::debug!("Fetched {} recipes", recipes.len());
                state.error = None;
                state.set_recipes(recipes);
                Ok(())
            }
            Err(e) => {
                let context = ErrorContext::action("load").with_resource("recipe");
                state.error = Some(user_friendly_message(&e, Some(&context)));
                Err(e)
            }
        }
    }

    /// Create a recipe. A possible duplicate is held in state instead of
    /// failing; `Ok(None)` means the user has to decide.
    pub async fn create(&self, payload: RecipeCreate) -> Result<Option<Recipe>> {
        match api::create(&self.client, &payload, false).await {
            Ok(recipe) => {
                self.after_create(&recipe).await;
                Ok(Some(recipe))
            }
            Err(e) => {
                let duplicate = e
                    .as_api()
                    .filter(|api| api.is_conflict())
                    .and_then(|api| api.body.as_ref())
                    .and_then(DuplicateInfo::from_body);
                match duplicate {
                    Some(info) => {
                        log::info!("Possible duplicate of {:?}", info.best_match_id());
                        self.state.borrow_mut().duplicate = Some(PendingDuplicate { info, payload });
                        Ok(None)
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// "Create anyway": resubmit the held payload with the override flag.
    pub async fn force_create(&self) -> Result<Option<Recipe>> {
        let pending = self.state.borrow_mut().duplicate.take();
        let Some(pending) = pending else {
            return Ok(None);
        };
        let recipe = api::create(&self.client, &pending.payload, true).await?;
        self.after_create(&recipe).await;
        Ok(Some(recipe))
    }

    pub async fn update(&self, id: &str, changes: &RecipeUpdate) -> Result<Recipe> {
        let updated = api::update(&self.client, id, changes).await?;
        {
            let mut state = self.state.borrow_mut();
            if let Some(slot) = state.recipes.iter_mut().find(|r| r.id == updated.id) {
                *slot = updated.clone();
            }
            state.recompute();
        }
        self.refetch().await;
        Ok(updated)
    }

    /// Remove locally first; put the record back if the server refuses.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = {
            let mut state = self.state.borrow_mut();
            let position = state.recipes.iter().position(|r| r.id == id);
            let removed = position.map(|i| (i, state.recipes.remove(i)));
            state.recompute();
            removed
        };
        if let Err(e) = api::delete(&self.client, id).await {
            log::warn!("Delete of recipe {} failed, restoring", id);
            if let Some((index, recipe)) = removed {
                let mut state = self.state.borrow_mut();
                let index = index.min(state.recipes.len());
                state.recipes.insert(index, recipe);
                state.recompute();
            }
            return Err(e);
        }
        Ok(())
    }

    async fn after_create(&self, recipe: &Recipe) {
        {
            let mut state = self.state.borrow_mut();
            state.duplicate = None;
            state.recipes.push(recipe.clone());
            state.recompute();
        }
        self.refetch().await;
    }

    /// The server list is authoritative after a write; a failed refetch
    /// keeps the locally reconciled list.
    async fn refetch(&self) {
        if let Err(e) = self.fetch().await {
            log::warn!("Refetch after write failed: {}", e);
        }
    }
}
