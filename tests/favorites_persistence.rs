// Tests for favorites surviving a restart through the JSON file.
use recipebox::context::{AppContext, TestContext};
use recipebox::favorites::FavoritesStore;
use recipebox::model::Recipe;
use recipebox::storage::FileStorage;
use std::fs;

fn recipe(i: usize) -> Recipe {
    let mut r = Recipe::new(format!("{}", 52760 + i), format!("Recipe {}", i))
        .with_ingredient(1, "flour", "200g")
        .with_ingredient(2, "eggs", "2");
    r.category = Some("Dessert".to_string());
    r.instructions = Some("Mix.\r\nBake.".to_string());
    r
}

fn open(ctx: &TestContext) -> FavoritesStore<FileStorage> {
    FavoritesStore::open(FileStorage::from_context(ctx).unwrap())
}

#[test]
fn test_favorites_survive_restart_in_order() {
    let ctx = TestContext::new();

    {
        let mut store = open(&ctx);
        assert!(store.is_empty());
        for i in 0..5 {
            store.add_favorite(recipe(i));
        }
        store.remove_favorite("52762");
    }

    let store = open(&ctx);
    let ids: Vec<&str> = store.favorites().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["52760", "52761", "52763", "52764"]);

    let first = store.get("52760").unwrap();
    assert_eq!(first, &recipe(0));
    assert_eq!(first.ingredients().len(), 2);
}

#[test]
fn test_file_uses_versioned_envelope() {
    let ctx = TestContext::new();
    let mut store = open(&ctx);
    store.add_favorite(recipe(1));

    let path = ctx.get_favorites_path().unwrap();
    assert!(path.ends_with("favorites-storage.json"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["state"]["favorites"][0]["idMeal"], "52761");
    assert_eq!(json["state"]["favorites"][0]["strIngredient1"], "flour");
}

#[test]
fn test_legacy_array_file_is_read() {
    let ctx = TestContext::new();
    let path = ctx.get_favorites_path().unwrap();
    fs::write(
        &path,
        r#"[{"idMeal":"52771","strMeal":"Spicy Arrabiata Penne","strMealThumb":""}]"#,
    )
    .unwrap();

    let store = open(&ctx);
    assert!(store.can_save());
    assert!(store.is_favorite("52771"));
}

#[test]
fn test_corrupt_file_is_never_overwritten() {
    let ctx = TestContext::new();
    let path = ctx.get_favorites_path().unwrap();
    let garbage = "{\"state\": {\"favorites\": [";
    fs::write(&path, garbage).unwrap();

    let mut store = open(&ctx);
    assert!(!store.can_save());
    assert!(store.is_empty());

    // The session still works in memory.
    store.add_favorite(recipe(0));
    assert!(store.is_favorite("52760"));

    assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
}

#[test]
fn test_newer_version_is_refused() {
    let ctx = TestContext::new();
    let path = ctx.get_favorites_path().unwrap();
    let future = r#"{"version":99,"state":{"favorites":[]}}"#;
    fs::write(&path, future).unwrap();

    let mut store = open(&ctx);
    assert!(!store.can_save());
    store.add_favorite(recipe(0));

    assert_eq!(fs::read_to_string(&path).unwrap(), future);
}
