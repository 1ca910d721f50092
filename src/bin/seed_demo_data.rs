//! Utility to reset the store to the bundled demo recipes

use std::path::PathBuf;

use mealplan::models::{demo_recipes, Filters, Planner, SystemIdSource};

fn get_database_path() -> PathBuf {
    std::env::var("MEALPLAN_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("mealplan.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = mealplan::db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        mealplan::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let store = mealplan::db::Store::new(database);
    let ids = SystemIdSource::new();

    let recipes = demo_recipes(&ids);
    store.save("recipes", &recipes)?;
    store.save("planner", &Planner::empty())?;
    store.save("grocery", &Vec::<mealplan::models::GroceryItem>::new())?;
    store.save("filters", &Filters::default())?;

    println!("Seeded {} demo recipes:", recipes.len());
    for recipe in &recipes {
        println!("  {} - {}", recipe.id, recipe.title);
    }

    Ok(())
}
