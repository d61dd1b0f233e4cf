use super::prompt;
use crate::auth::AuthService;
use crate::models::User;

pub(super) fn register(auth: &AuthService) {
    let Some(username) = prompt("Choose username: ") else {
        return;
    };
    let Some(password) = prompt("Choose password: ") else {
        return;
    };
    let Some(display_name) = prompt("Display name (optional): ") else {
        return;
    };
    match auth.register(&username, &password, &display_name) {
        Ok(user) => println!(
            "Registered successfully. You can login now, {}.",
            user.display_name
        ),
        Err(e) => println!("Registration failed: {e}."),
    }
}

pub(super) fn login(auth: &AuthService) -> Option<User> {
    let username = prompt("Username: ")?;
    let password = prompt("Password: ")?;
    match auth.login(&username, &password) {
        Ok(user) => {
            println!("Login successful. Welcome {}!", user.display_name);
            Some(user)
        }
        Err(e) => {
            println!("Login failed: {e}.");
            None
        }
    }
}
