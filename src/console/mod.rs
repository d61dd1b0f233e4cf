//! Line-oriented front-end. Owns the caller-side checks the store leaves
//! to its callers: non-empty comment text, self-follow and target
//! existence before `follow`, login gates on like/comment.

mod account;
mod recipes;

use crate::auth::AuthService;
use std::io::{self, Write};
use tracing::error;

pub fn run(auth: &AuthService) {
    loop {
        println!("\n=== Ladle ===");
        println!("1. Register");
        println!("2. Login");
        println!("3. Browse recipes");
        println!("0. Exit");
        let Some(choice) = prompt("Choose: ") else {
            break;
        };
        match choice.as_str() {
            "1" => account::register(auth),
            "2" => {
                if let Some(user) = account::login(auth) {
                    recipes::user_menu(auth, &user);
                }
            }
            "3" => recipes::browse(auth.platform(), None),
            "0" => break,
            _ => println!("Invalid option."),
        }
    }
    save(auth);
    println!("Bye!");
}

/// Saves a snapshot at the logout/exit save points. Failures are reported
/// and never retried automatically.
pub(crate) fn save(auth: &AuthService) {
    if let Err(e) = auth.save() {
        error!("failed to save data: {e}");
        println!("Warning: could not save data ({e}).");
    }
}

/// Prompts and reads one trimmed line. None on EOF.
pub(crate) fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Reads trimmed lines until a blank line (or EOF).
pub(crate) fn read_list(intro: &str) -> Vec<String> {
    println!("{intro}");
    let mut lines = Vec::new();
    loop {
        match prompt("") {
            Some(line) if !line.is_empty() => lines.push(line),
            _ => break,
        }
    }
    lines
}

/// Splits a comma-separated tag line, dropping blanks.
pub(crate) fn parse_tags(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
