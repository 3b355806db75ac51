// File: ./src/filter.rs
//! Beef exclusion heuristic applied to search, random and category results.
//!
//! Case-insensitive substring matching against a fixed denylist. Short terms
//! match inside unrelated words ("ox" in "box", "round" in "ground"); that is
//! the accepted behavior and callers rely on it being stable.
use crate::model::Recipe;

/// Category name that is never offered or listed.
pub const EXCLUDED_CATEGORY: &str = "beef";

/// Lower-case terms. Order matters only for short-circuit cost.
pub const DENYLIST: &[&str] = &[
    // Common beef terms
    "beef",
    "steak",
    "hamburger",
    "meatball",
    "meat loaf",
    "meatloaf",
    "ground beef",
    "minced beef",
    "roast beef",
    "corned beef",
    "beef stew",
    "beef broth",
    "beef stock",
    "beef jerky",
    "beef patty",
    "beef brisket",
    "beef ribs",
    "beef shank",
    "beef tenderloin",
    "beef wellington",
    "beef bourguignon",
    "beef stroganoff",
    "beef tartare",
    "beef tongue",
    "beef tripe",
    "beef udon",
    "beefy",
    // Cuts
    "sirloin",
    "ribeye",
    "t-bone",
    "tenderloin",
    "filet mignon",
    "new york strip",
    "flank steak",
    "skirt steak",
    "hanger steak",
    "chuck",
    "round",
    "shank",
    "short ribs",
    "brisket",
    "plate",
    "short loin",
    "sirloin tip",
    "tri-tip",
    // Animals and dishes
    "cow",
    "cattle",
    "veal",
    "wagyu",
    "kobe",
    "angus",
    "bovine",
    "bull",
    "ox",
    "hamburg",
    "cheeseburg",
    "philly cheesesteak",
    "philly steak",
    "philly cheese",
    "bulgogi",
    "carpaccio",
    "fajita",
    "kebab",
    "kabob",
    "pastrami",
    "pepperoni",
    "salisbury",
    "sauerbraten",
    "sukiyaki",
    "taco",
    "tamale",
    "teriyaki",
    "wellington",
    "yakiniku",
];

/// True when any denylisted term occurs in the name, category, an ingredient
/// slot or the instructions.
pub fn is_excluded(recipe: &Recipe) -> bool {
    let name = recipe.name.to_lowercase();
    let category = recipe.category.as_deref().unwrap_or_default().to_lowercase();
    let ingredients: Vec<String> = recipe
        .ingredient_slots
        .iter()
        .flatten()
        .map(|i| i.to_lowercase())
        .collect();
    let instructions = recipe
        .instructions
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    DENYLIST.iter().any(|term| {
        name.contains(term)
            || category.contains(term)
            || ingredients.iter().any(|i| i.contains(term))
            || instructions.contains(term)
    })
}

/// Case-insensitive match against [`EXCLUDED_CATEGORY`].
pub fn is_excluded_category(name: &str) -> bool {
    name.to_lowercase() == EXCLUDED_CATEGORY
}
