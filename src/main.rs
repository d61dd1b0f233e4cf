use ladle::auth::{AuthService, BcryptHasher};
use ladle::console;
use ladle::persist::{JsonFileStorage, Storage};
use ladle::platform::Platform;
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    dotenvy::dotenv().ok();

    let data_file =
        std::env::var("LADLE_DATA_FILE").unwrap_or_else(|_| "ladle.json".to_string());
    let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(&data_file));

    let platform = Platform::new();
    let auth = AuthService::new(platform.clone(), Box::new(BcryptHasher::new()), storage);

    match auth.load() {
        Ok(true) => info!(
            "loaded data: users={} recipes={}",
            platform.user_count(),
            platform.recipe_count()
        ),
        Ok(false) => {
            info!("no saved data found, starting fresh");
            if std::env::var("LADLE_DEMO_DATA").is_ok() {
                seed_demo(&platform);
                info!("seeded demo data");
            }
        }
        Err(e) => {
            // Refuse to run against a broken data file: a later save
            // point would overwrite it.
            error!("failed to load {data_file}: {e}");
            std::process::exit(1);
        }
    }

    console::run(&auth);
}

/// A couple of browsable recipes for a first run. Only used when the
/// store starts empty and `LADLE_DEMO_DATA` is set.
fn seed_demo(platform: &Platform) {
    for (title, description, ingredients, tags) in [
        (
            "Paneer Butter Masala",
            "Creamy paneer dish with spices.",
            vec!["paneer", "butter", "tomato", "cream"],
            "dinner,veg",
        ),
        (
            "Dal Makhani",
            "Slow-cooked black lentils.",
            vec!["black lentils", "kidney beans", "butter"],
            "dinner,veg",
        ),
        (
            "Tea",
            "Classic Indian chai.",
            vec!["water", "milk", "tea leaves", "cardamom"],
            "drink",
        ),
    ] {
        platform.add_recipe(
            "ladle",
            title.to_string(),
            description.to_string(),
            ingredients.into_iter().map(str::to_string).collect(),
            vec!["Combine everything.".to_string(), "Cook until done.".to_string()],
            tags.split(',').map(str::to_string).collect(),
        );
    }
}
