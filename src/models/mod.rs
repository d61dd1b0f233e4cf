mod recipe;
mod user;

pub use recipe::{Comment, Recipe};
pub use user::User;
