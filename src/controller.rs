// File: src/controller.rs
//! Screen-level workflows.
//!
//! Each front-end screen (home, search, recipe detail, favorites) goes through
//! `RecipeController`. It talks to the catalog and to the favorites store, but
//! the two never call each other: the store only ever sees recipes handed to
//! it here.
use crate::client::CatalogClient;
use crate::favorites::FavoritesStore;
use crate::model::{Category, Recipe};
use crate::storage::{FavoritesStorage, FileStorage};

/// Shortcuts shown on the home screen. "Beef" stays listed and resolves to an
/// empty category.
pub const POPULAR_CATEGORIES: [&str; 6] =
    ["Beef", "Chicken", "Dessert", "Pasta", "Seafood", "Vegetarian"];

/// Offered on the search screen when the catalog's category list is unavailable.
pub const FALLBACK_CATEGORIES: [&str; 13] = [
    "Chicken",
    "Dessert",
    "Lamb",
    "Miscellaneous",
    "Pasta",
    "Pork",
    "Seafood",
    "Side",
    "Starter",
    "Vegan",
    "Vegetarian",
    "Breakfast",
    "Goat",
];

#[derive(Debug, Clone)]
pub struct HomePage {
    pub featured: Vec<Recipe>,
    pub popular_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    Query(String),
    Category(String),
    Browse,
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub mode: SearchMode,
    pub categories: Vec<Category>,
    pub recipes: Vec<Recipe>,
}

impl SearchPage {
    pub fn heading(&self) -> String {
        match &self.mode {
            SearchMode::Query(q) => format!("Search Results for \"{}\"", q),
            SearchMode::Category(c) => format!("{} Recipes", c),
            SearchMode::Browse => "Browse Recipes".to_string(),
        }
    }

    /// Text shown instead of results when nothing matched (or the catalog failed).
    pub fn empty_message(&self) -> String {
        match &self.mode {
            SearchMode::Query(q) => format!(
                "We couldn't find any recipes matching \"{}\". Try a different search term.",
                q
            ),
            SearchMode::Category(c) => {
                format!("No {} recipes found. Please check back later.", c)
            }
            SearchMode::Browse => "Try searching for recipes or browse by category.".to_string(),
        }
    }
}

/// Result of [`RecipeController::toggle_favorite`], carrying the id that was
/// actually stored or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Saved(String),
    Removed(String),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct RecipePage {
    pub recipe: Recipe,
    pub is_favorite: bool,
}

pub struct RecipeController<S: FavoritesStorage = FileStorage> {
    client: CatalogClient,
    store: FavoritesStore<S>,
    featured_count: usize,
}

impl<S: FavoritesStorage> RecipeController<S> {
    pub fn new(client: CatalogClient, store: FavoritesStore<S>, featured_count: usize) -> Self {
        Self {
            client,
            store,
            featured_count,
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn store(&self) -> &FavoritesStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FavoritesStore<S> {
        &mut self.store
    }

    pub async fn home(&self) -> HomePage {
        HomePage {
            featured: self.client.get_random_recipes(self.featured_count).await,
            popular_categories: POPULAR_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// A non-blank query wins over a category; with neither, the first
    /// category the catalog offers is listed.
    pub async fn search_page(&self, query: Option<&str>, category: Option<&str>) -> SearchPage {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        let remote_categories = self.client.get_categories().await;

        let (mode, recipes) = if let Some(q) = query {
            (
                SearchMode::Query(q.to_string()),
                self.client.search_recipes(q).await,
            )
        } else if let Some(c) = category {
            (
                SearchMode::Category(c.to_string()),
                self.client.get_meals_by_category(c).await,
            )
        } else if let Some(first) = remote_categories.first() {
            (
                SearchMode::Browse,
                self.client.get_meals_by_category(&first.name).await,
            )
        } else {
            (SearchMode::Browse, vec![])
        };

        let categories = if remote_categories.is_empty() {
            FALLBACK_CATEGORIES.iter().map(|c| Category::named(*c)).collect()
        } else {
            remote_categories
        };

        SearchPage {
            mode,
            categories,
            recipes,
        }
    }

    pub async fn recipe_page(&self, id: &str) -> Option<RecipePage> {
        let recipe = self.client.get_recipe_by_id(id).await?;
        let is_favorite = self.store.is_favorite(&recipe.id);
        Some(RecipePage {
            recipe,
            is_favorite,
        })
    }

    pub fn favorites_page(&self) -> &[Recipe] {
        self.store.favorites()
    }

    /// Flips the favorite state of `id`.
    ///
    /// Saving needs the full recipe, so an unsaved id is looked up first and
    /// the catalog's id for it is the one toggled (`052771` saves `52771`).
    /// If the lookup finds nothing the store is left untouched.
    pub async fn toggle_favorite(&mut self, id: &str) -> ToggleOutcome {
        if self.store.is_favorite(id) {
            self.store.remove_favorite(id);
            return ToggleOutcome::Removed(id.to_string());
        }

        let Some(recipe) = self.client.get_recipe_by_id(id).await else {
            return ToggleOutcome::NotFound;
        };
        let canonical_id = recipe.id.clone();
        self.store.toggle_favorite(&canonical_id, Some(recipe));
        if self.store.is_favorite(&canonical_id) {
            ToggleOutcome::Saved(canonical_id)
        } else {
            ToggleOutcome::Removed(canonical_id)
        }
    }

    pub fn remove_favorite(&mut self, id: &str) -> bool {
        let was_saved = self.store.is_favorite(id);
        self.store.remove_favorite(id);
        was_saved
    }
}
