// File: ./src/model.rs
// Recipe and category records as served by TheMealDB.
//
// Recipes serialize back into the flat API shape (`strIngredient1`..`strIngredient20`),
// so a saved favorite is interchangeable with an API response entry.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Number of positional ingredient/measure slots on a recipe.
pub const INGREDIENT_SLOTS: usize = 20;

/// Shown in place of a missing thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "/placeholder-recipe.jpg";

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// A single dish record. Immutable snapshot of what the catalog returned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawRecipe", into = "RawRecipe")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    /// Comma-separated, as sent by the API. See [`Recipe::tags`].
    pub tags: Option<String>,
    pub youtube: Option<String>,
    /// Slot `i` (1-based) lives at index `i - 1`.
    pub ingredient_slots: [Option<String>; INGREDIENT_SLOTS],
    pub measure_slots: [Option<String>; INGREDIENT_SLOTS],
}

/// One displayable line of the ingredient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient: String,
    pub measure: String,
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.measure.is_empty() {
            write!(f, "{}", self.ingredient)
        } else {
            write!(f, "{} - {}", self.ingredient, self.measure)
        }
    }
}

impl Recipe {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Ingredient name in positional slot `index` (1..=20).
    pub fn ingredient(&self, index: usize) -> Option<&str> {
        slot(&self.ingredient_slots, index)
    }

    /// Quantity in positional slot `index` (1..=20).
    pub fn measure(&self, index: usize) -> Option<&str> {
        slot(&self.measure_slots, index)
    }

    /// Sets slot `index` (1..=20). Out-of-range indices are ignored.
    pub fn with_ingredient(mut self, index: usize, ingredient: &str, measure: &str) -> Self {
        if (1..=INGREDIENT_SLOTS).contains(&index) {
            self.ingredient_slots[index - 1] = non_empty(Some(ingredient.to_string()));
            self.measure_slots[index - 1] = non_empty(Some(measure.to_string()));
        }
        self
    }

    /// Ingredient lines for every slot whose ingredient is not blank, trimmed.
    pub fn ingredients(&self) -> Vec<IngredientLine> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let ingredient = self.ingredient(i)?.trim();
                if ingredient.is_empty() {
                    return None;
                }
                Some(IngredientLine {
                    ingredient: ingredient.to_string(),
                    measure: self.measure(i).unwrap_or_default().trim().to_string(),
                })
            })
            .collect()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Instructions broken into paragraphs on line endings, blank lines dropped.
    pub fn instruction_paragraphs(&self) -> Vec<String> {
        self.instructions
            .as_deref()
            .unwrap_or_default()
            .lines()
            .filter(|p| !p.trim().is_empty())
            .map(String::from)
            .collect()
    }

    /// Embeddable video URL built from the `v=` parameter of the YouTube link.
    pub fn youtube_embed_url(&self) -> Option<String> {
        let link = self.youtube.as_deref()?;
        let (_, rest) = link.split_once("v=")?;
        let video_id = rest.split('&').next().unwrap_or_default();
        if video_id.is_empty() {
            return None;
        }
        Some(format!("{}{}", YOUTUBE_EMBED_BASE, video_id))
    }

    pub fn thumbnail(&self) -> &str {
        if self.thumbnail_url.trim().is_empty() {
            PLACEHOLDER_THUMBNAIL
        } else {
            &self.thumbnail_url
        }
    }
}

fn slot(slots: &[Option<String>; INGREDIENT_SLOTS], index: usize) -> Option<&str> {
    if !(1..=INGREDIENT_SLOTS).contains(&index) {
        return None;
    }
    slots[index - 1].as_deref()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Wire shape of a recipe. Slot fields are collected through the flattened map
/// because the API spells them as forty separate keys.
#[derive(Serialize, Deserialize)]
struct RawRecipe {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal", default)]
    name: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

fn slot_index(key: &str, prefix: &str) -> Option<usize> {
    let n: usize = key.strip_prefix(prefix)?.parse().ok()?;
    (1..=INGREDIENT_SLOTS).contains(&n).then_some(n)
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        let mut recipe = Recipe {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            thumbnail_url: raw.thumbnail.unwrap_or_default(),
            category: non_empty(raw.category),
            area: non_empty(raw.area),
            instructions: non_empty(raw.instructions),
            tags: non_empty(raw.tags),
            youtube: non_empty(raw.youtube),
            ..Recipe::default()
        };

        // Unknown keys (strSource, dateModified, ...) are dropped here.
        for (key, value) in raw.rest {
            let Value::String(text) = value else {
                continue;
            };
            if let Some(i) = slot_index(&key, "strIngredient") {
                recipe.ingredient_slots[i - 1] = non_empty(Some(text));
            } else if let Some(i) = slot_index(&key, "strMeasure") {
                recipe.measure_slots[i - 1] = non_empty(Some(text));
            }
        }
        recipe
    }
}

impl From<Recipe> for RawRecipe {
    fn from(recipe: Recipe) -> Self {
        let mut rest = Map::new();
        for (i, value) in recipe.ingredient_slots.into_iter().enumerate() {
            if let Some(v) = value {
                rest.insert(format!("strIngredient{}", i + 1), Value::String(v));
            }
        }
        for (i, value) in recipe.measure_slots.into_iter().enumerate() {
            if let Some(v) = value {
                rest.insert(format!("strMeasure{}", i + 1), Value::String(v));
            }
        }
        RawRecipe {
            id: recipe.id,
            name: Some(recipe.name),
            thumbnail: Some(recipe.thumbnail_url),
            category: recipe.category,
            area: recipe.area,
            instructions: recipe.instructions,
            tags: recipe.tags,
            youtube: recipe.youtube,
            rest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "idCategory", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "strCategory")]
    pub name: String,
    #[serde(rename = "strCategoryThumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(
        rename = "strCategoryDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Category {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            thumbnail_url: None,
            description: None,
        }
    }
}

/// Envelope of `search.php`, `lookup.php`, `random.php` and `filter.php`.
#[derive(Debug, Default, Deserialize)]
pub struct MealsResponse {
    #[serde(default)]
    pub meals: Option<Vec<Recipe>>,
}

/// Envelope of `categories.php`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRABIATA: &str = r#"{
        "idMeal": "52771",
        "strMeal": "Spicy Arrabiata Penne",
        "strDrinkAlternate": null,
        "strCategory": "Vegetarian",
        "strArea": "Italian",
        "strInstructions": "Bring a large pot of water to a boil.\r\n\r\nIn a wide pan, heat the oil.\r\nDrain and toss.",
        "strMealThumb": "https://www.themealdb.com/images/media/meals/ustsqw1468250014.jpg",
        "strTags": "Pasta,Curry, ",
        "strYoutube": "https://www.youtube.com/watch?v=1IszT_guI08",
        "strIngredient1": "penne rigate",
        "strIngredient2": "olive oil",
        "strIngredient3": " ",
        "strIngredient4": "",
        "strIngredient5": null,
        "strMeasure1": "1 pound",
        "strMeasure2": " 1/4 cup ",
        "strMeasure3": "",
        "strSource": null
    }"#;

    #[test]
    fn test_parse_api_recipe() {
        let recipe: Recipe = serde_json::from_str(ARRABIATA).unwrap();
        assert_eq!(recipe.id, "52771");
        assert_eq!(recipe.name, "Spicy Arrabiata Penne");
        assert_eq!(recipe.category.as_deref(), Some("Vegetarian"));
        assert_eq!(recipe.area.as_deref(), Some("Italian"));
        assert_eq!(recipe.ingredient(1), Some("penne rigate"));
        assert_eq!(recipe.measure(2), Some(" 1/4 cup "));
        assert_eq!(recipe.ingredient(4), None);
        assert_eq!(recipe.ingredient(5), None);
        assert_eq!(recipe.ingredient(0), None);
        assert_eq!(recipe.ingredient(21), None);
    }

    #[test]
    fn test_ingredient_lines_skip_blank_slots() {
        let recipe: Recipe = serde_json::from_str(ARRABIATA).unwrap();
        let lines = recipe.ingredients();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "penne rigate - 1 pound");
        assert_eq!(lines[1].measure, "1/4 cup");
    }

    #[test]
    fn test_tags_paragraphs_and_video() {
        let recipe: Recipe = serde_json::from_str(ARRABIATA).unwrap();
        assert_eq!(recipe.tags(), vec!["Pasta", "Curry"]);
        assert_eq!(
            recipe.instruction_paragraphs(),
            vec![
                "Bring a large pot of water to a boil.",
                "In a wide pan, heat the oil.",
                "Drain and toss."
            ]
        );
        assert_eq!(
            recipe.youtube_embed_url().as_deref(),
            Some("https://www.youtube.com/embed/1IszT_guI08")
        );
    }

    #[test]
    fn test_summary_entry_has_no_details() {
        let json = r#"{"strMeal":"Pancakes","strMealThumb":"x.jpg","idMeal":"52854"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert!(recipe.category.is_none());
        assert!(recipe.ingredients().is_empty());
        assert!(recipe.youtube_embed_url().is_none());
    }

    #[test]
    fn test_serialized_form_keeps_api_keys() {
        let recipe = Recipe::new("1", "Toast").with_ingredient(3, "Bread", "2 slices");
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["idMeal"], "1");
        assert_eq!(value["strMeal"], "Toast");
        assert_eq!(value["strIngredient3"], "Bread");
        assert_eq!(value["strMeasure3"], "2 slices");

        let back: Recipe = serde_json::from_value(value).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_placeholder_thumbnail() {
        let recipe = Recipe::new("1", "Toast");
        assert_eq!(recipe.thumbnail(), PLACEHOLDER_THUMBNAIL);
    }

    #[test]
    fn test_null_envelopes() {
        let meals: MealsResponse = serde_json::from_str(r#"{"meals":null}"#).unwrap();
        assert!(meals.meals.is_none());
        let cats: CategoriesResponse = serde_json::from_str("{}").unwrap();
        assert!(cats.categories.is_none());
    }
}
