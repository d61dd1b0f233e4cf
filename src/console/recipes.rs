use super::{parse_tags, prompt, read_list, save};
use crate::auth::AuthService;
use crate::models::{Recipe, User};
use crate::platform::Platform;

pub(super) fn user_menu(auth: &AuthService, user: &User) {
    let platform = auth.platform();
    loop {
        println!("\nUser Menu - Logged in as: {}", user.username);
        println!("1. Add recipe");
        println!("2. My recipes");
        println!("3. Browse all recipes");
        println!("4. Search recipes");
        println!("5. Follow user");
        println!("6. Logout");
        let Some(choice) = prompt("Choose: ") else {
            save(auth);
            return;
        };
        match choice.as_str() {
            "1" => add_recipe(platform, user),
            "2" => my_recipes(platform, user),
            "3" => browse(platform, Some(user)),
            "4" => search(platform, Some(user)),
            "5" => follow(platform, user),
            "6" => {
                save(auth);
                println!("Logged out.");
                return;
            }
            _ => println!("Invalid option."),
        }
    }
}

fn add_recipe(platform: &Platform, user: &User) {
    let Some(title) = prompt("Title: ") else {
        return;
    };
    let Some(description) = prompt("Short description: ") else {
        return;
    };
    let ingredients = read_list("Enter ingredients (one per line). Empty line to finish:");
    let steps = read_list("Enter steps (one per line). Empty line to finish:");
    let Some(tag_line) = prompt("Enter tags separated by comma (eg: breakfast,veg): ") else {
        return;
    };
    let recipe = platform.add_recipe(
        &user.username,
        title,
        description,
        ingredients,
        steps,
        parse_tags(&tag_line),
    );
    println!("Recipe added with id: {}", recipe.id);
}

fn my_recipes(platform: &Platform, user: &User) {
    let mine = platform.list_by_author(&user.username);
    if mine.is_empty() {
        println!("You haven't added recipes yet.");
        return;
    }
    print_summaries(&mine);
    pick_detail(platform, Some(user));
}

pub(super) fn browse(platform: &Platform, user: Option<&User>) {
    let all = platform.list_all();
    if all.is_empty() {
        println!("No recipes yet.");
        return;
    }
    print_summaries(&all);
    pick_detail(platform, user);
}

fn search(platform: &Platform, user: Option<&User>) {
    println!("\nSearch by: 1) Title 2) Ingredient 3) Tag");
    let Some(choice) = prompt("Choose: ") else {
        return;
    };
    let results = match choice.as_str() {
        "1" => {
            let Some(query) = prompt("Query title: ") else {
                return;
            };
            platform.search_by_title(&query)
        }
        "2" => {
            let Some(query) = prompt("Ingredient: ") else {
                return;
            };
            platform.search_by_ingredient(&query)
        }
        "3" => {
            let Some(query) = prompt("Tag: ") else {
                return;
            };
            platform.search_by_tag(&query)
        }
        _ => {
            println!("Invalid.");
            return;
        }
    };
    if results.is_empty() {
        println!("No results.");
        return;
    }
    print_summaries(&results);
    pick_detail(platform, user);
}

fn follow(platform: &Platform, user: &User) {
    let Some(other) = prompt("Enter username to follow: ") else {
        return;
    };
    // The store's follow does not guard these; the caller does.
    if other.to_lowercase() == user.username.to_lowercase() {
        println!("Can't follow yourself.");
        return;
    }
    let Some(target) = platform.get_user(&other) else {
        println!("User not found.");
        return;
    };
    if platform.follow(&user.username, &target.username) {
        println!("Now following {}.", target.username);
    } else {
        println!("You already follow {}.", target.username);
    }
}

fn print_summaries(recipes: &[Recipe]) {
    println!("\nRecipes:");
    for recipe in recipes {
        println!(
            "[{}] {} (by {}) - likes: {} comments: {}",
            recipe.id,
            recipe.title,
            recipe.author,
            recipe.likes.len(),
            recipe.comments.len()
        );
    }
}

fn pick_detail(platform: &Platform, user: Option<&User>) {
    let Some(input) = prompt("Enter recipe id to see details, or blank to return: ") else {
        return;
    };
    if input.is_empty() {
        return;
    }
    match input.parse::<u64>() {
        Ok(id) => detail_menu(platform, id, user),
        Err(_) => println!("Invalid id."),
    }
}

fn detail_menu(platform: &Platform, id: u64, user: Option<&User>) {
    let Some(recipe) = platform.get_recipe(id) else {
        println!("Recipe not found.");
        return;
    };
    print_detail(&recipe);

    let is_owner =
        user.is_some_and(|u| u.username.to_lowercase() == recipe.author.to_lowercase());

    println!("\nOptions:");
    println!("1. Like/Unlike");
    println!("2. Comment");
    if is_owner {
        println!("3. Edit (owner)");
        println!("4. Delete (owner)");
    }
    println!("0. Back");
    let Some(choice) = prompt("Choose: ") else {
        return;
    };
    match choice.as_str() {
        "1" => match user {
            Some(u) => {
                if platform.toggle_like(id, &u.username) {
                    println!("You liked the recipe.");
                } else {
                    println!("You unliked the recipe.");
                }
            }
            None => println!("Login required to like."),
        },
        "2" => match user {
            Some(u) => {
                let Some(text) = prompt("Enter comment: ") else {
                    return;
                };
                if text.is_empty() {
                    println!("Empty comment ignored.");
                } else if platform.add_comment(id, &u.username, text) {
                    println!("Comment added.");
                }
            }
            None => println!("Login required to comment."),
        },
        "3" if is_owner => {
            if let Some(u) = user {
                edit_recipe(platform, &recipe, u);
            }
        }
        "4" if is_owner => {
            if let Some(u) = user {
                if platform.delete_recipe(id, &u.username) {
                    println!("Deleted.");
                } else {
                    println!("Failed to delete.");
                }
            }
        }
        _ => {}
    }
}

fn edit_recipe(platform: &Platform, recipe: &Recipe, user: &User) {
    println!("Editing recipe id: {} (leave blank to keep value)", recipe.id);

    let Some(title) = prompt(&format!("Title [{}]: ", recipe.title)) else {
        return;
    };
    let title = if title.is_empty() {
        recipe.title.clone()
    } else {
        title
    };

    let Some(description) = prompt(&format!("Description [{}]: ", recipe.description)) else {
        return;
    };
    let description = if description.is_empty() {
        recipe.description.clone()
    } else {
        description
    };

    let mut ingredients =
        read_list("Ingredients (new list, one per line; empty line keeps existing):");
    if ingredients.is_empty() {
        ingredients = recipe.ingredients.clone();
    }

    let mut steps = read_list("Steps (new list, one per line; empty line keeps existing):");
    if steps.is_empty() {
        steps = recipe.steps.clone();
    }

    let Some(tag_line) = prompt(&format!("Tags (comma) [{}]: ", recipe.tags.join(","))) else {
        return;
    };
    let tags = if tag_line.is_empty() {
        recipe.tags.clone()
    } else {
        parse_tags(&tag_line)
    };

    if platform.edit_recipe(
        recipe.id,
        &user.username,
        title,
        description,
        ingredients,
        steps,
        tags,
    ) {
        println!("Updated.");
    } else {
        println!("Failed to update.");
    }
}

fn print_detail(recipe: &Recipe) {
    println!("\n--- Recipe Detail ---");
    println!("ID: {}", recipe.id);
    println!("Title: {}", recipe.title);
    println!("Author: {}", recipe.author);
    println!("Created: {}", fmt_time(recipe.created_at));
    if let Some(updated) = recipe.last_updated {
        println!("Last updated: {}", fmt_time(updated));
    }
    println!("Description: {}", recipe.description);
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!(" - {ingredient}");
    }
    println!("Steps:");
    for (index, step) in recipe.steps.iter().enumerate() {
        println!(" {}. {}", index + 1, step);
    }
    println!("Tags: {}", recipe.tags.join(", "));
    println!("Likes: {}", recipe.likes.len());
    println!("Comments:");
    for comment in &recipe.comments {
        println!(
            " - {} ({}): {}",
            comment.author,
            fmt_time(comment.created_at),
            comment.text
        );
    }
}

fn fmt_time(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
