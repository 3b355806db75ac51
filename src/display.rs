// File: ./src/display.rs
// Plain-text rendering of recipes and screens for the terminal.
use crate::controller::{HomePage, RecipePage, SearchPage};
use crate::model::Recipe;
use std::fmt::Write;

fn heart_symbol(is_favorite: bool) -> &'static str {
    if is_favorite { "[♥]" } else { "[ ]" }
}

pub trait RecipeDisplay {
    fn to_card_line(&self, is_favorite: bool) -> String;
    fn to_detail_text(&self, is_favorite: bool) -> String;
}

impl RecipeDisplay for Recipe {
    fn to_card_line(&self, is_favorite: bool) -> String {
        let mut badges: Vec<&str> = Vec::new();
        if let Some(c) = &self.category {
            badges.push(c);
        }
        if let Some(a) = &self.area {
            badges.push(a);
        }

        let mut line = format!("{} {}", heart_symbol(is_favorite), self.name);
        if !badges.is_empty() {
            let _ = write!(line, " ({})", badges.join(", "));
        }
        let _ = write!(line, " #{}", self.id);
        line
    }

    fn to_detail_text(&self, is_favorite: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", heart_symbol(is_favorite), self.name);

        let badges: Vec<&str> = [self.category.as_deref(), self.area.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !badges.is_empty() {
            let _ = writeln!(out, "{}", badges.join(" · "));
        }
        let _ = writeln!(out, "Image: {}", self.thumbnail());

        let tags = self.tags();
        if !tags.is_empty() {
            let _ = writeln!(out, "\nTags: {}", tags.join(", "));
        }

        let ingredients = self.ingredients();
        if !ingredients.is_empty() {
            let _ = writeln!(out, "\nIngredients");
            for (i, line) in ingredients.iter().enumerate() {
                let _ = writeln!(out, "  {:>2}. {}", i + 1, line);
            }
        }

        let paragraphs = self.instruction_paragraphs();
        if !paragraphs.is_empty() {
            let _ = writeln!(out, "\nInstructions");
            for p in paragraphs {
                let _ = writeln!(out, "  {}", p);
            }
        }

        if let Some(video) = self.youtube_embed_url() {
            let _ = writeln!(out, "\nVideo Tutorial: {}", video);
        }
        out
    }
}

/// One card per line; `is_favorite` decides the heart.
pub fn render_list<F>(recipes: &[Recipe], is_favorite: F) -> String
where
    F: Fn(&str) -> bool,
{
    recipes
        .iter()
        .map(|r| r.to_card_line(is_favorite(&r.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_home<F>(page: &HomePage, is_favorite: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut out = String::from("Featured Recipes\n");
    if page.featured.is_empty() {
        out.push_str("No featured recipes found. Please try again later.\n");
    } else {
        let _ = writeln!(out, "{}", render_list(&page.featured, is_favorite));
    }
    let _ = writeln!(
        out,
        "\nPopular Categories: {}",
        page.popular_categories.join(", ")
    );
    out
}

pub fn render_search<F>(page: &SearchPage, is_favorite: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", page.heading());
    let names: Vec<&str> = page.categories.iter().map(|c| c.name.as_str()).collect();
    let _ = writeln!(out, "Categories: {}\n", names.join(", "));
    if page.recipes.is_empty() {
        let _ = writeln!(out, "No recipes found");
        let _ = writeln!(out, "{}", page.empty_message());
    } else {
        let _ = writeln!(out, "{}", render_list(&page.recipes, is_favorite));
    }
    out
}

pub fn render_recipe(page: &RecipePage) -> String {
    page.recipe.to_detail_text(page.is_favorite)
}

pub fn render_favorites(favorites: &[Recipe]) -> String {
    let mut out = String::from("Your Favorite Recipes\n");
    if favorites.is_empty() {
        out.push_str("No favorites yet\n");
        out.push_str("Browse recipes and use `recipebox fav <id>` to save your favorites here.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "You have {} saved recipe{}\n",
        favorites.len(),
        if favorites.len() == 1 { "" } else { "s" }
    );
    let _ = writeln!(out, "{}", render_list(favorites, |_| true));
    out
}
