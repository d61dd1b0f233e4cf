//! The in-memory domain store: users, recipes, likes, comments, follows.
//!
//! All collections are shared behind `Arc`, so the store is `Clone` and a
//! handle can be passed anywhere state is needed. Usernames are indexed
//! and compared lowercased; stored values keep their original case for
//! display.

use crate::models::{Comment, Recipe, User};
use crate::persist::Snapshot;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Clone)]
pub struct Platform {
    users: Arc<DashMap<String, User>>,     // lowercased username -> User
    recipes: Arc<DashMap<u64, Recipe>>,    // recipe id -> Recipe
    next_recipe_id: Arc<AtomicU64>,
}

impl Platform {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            recipes: Arc::new(DashMap::new()),
            next_recipe_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /* --------- Users --------- */

    pub fn username_exists(&self, username: &str) -> bool {
        self.users.contains_key(&username.to_lowercase())
    }

    /// Inserts `user` under its lowercased username. Callers are expected
    /// to check `username_exists` first; a duplicate insert overwrites.
    pub fn add_user(&self, user: User) {
        self.users.insert(user.username.to_lowercase(), user);
    }

    pub fn get_user(&self, username: &str) -> Option<User> {
        self.users
            .get(&username.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /* --------- Recipes --------- */

    /// Creates a recipe under the next id and stamps the current time.
    pub fn add_recipe(
        &self,
        author: &str,
        title: String,
        description: String,
        ingredients: Vec<String>,
        steps: Vec<String>,
        tags: Vec<String>,
    ) -> Recipe {
        let id = self.next_recipe_id.fetch_add(1, Ordering::SeqCst);
        let recipe = Recipe {
            id,
            title,
            description,
            author: author.to_string(),
            ingredients,
            steps,
            tags: dedup_tags(tags),
            created_at: Utc::now().timestamp(),
            last_updated: None,
            likes: HashSet::new(),
            comments: Vec::new(),
        };
        self.recipes.insert(id, recipe.clone());
        info!("recipe created: id={} by {}", id, author);
        recipe
    }

    /// Replaces the mutable fields and stamps `last_updated`.
    /// Returns false if the id is unknown or `requester` isn't the author.
    pub fn edit_recipe(
        &self,
        id: u64,
        requester: &str,
        title: String,
        description: String,
        ingredients: Vec<String>,
        steps: Vec<String>,
        tags: Vec<String>,
    ) -> bool {
        let Some(mut recipe) = self.recipes.get_mut(&id) else {
            return false;
        };
        if !same_user(&recipe.author, requester) {
            return false;
        }
        recipe.title = title;
        recipe.description = description;
        recipe.ingredients = ingredients;
        recipe.steps = steps;
        recipe.tags = dedup_tags(tags);
        recipe.last_updated = Some(Utc::now().timestamp());
        true
    }

    /// Removes the recipe if `requester` is its author. The id is never
    /// reused afterwards.
    pub fn delete_recipe(&self, id: u64, requester: &str) -> bool {
        let removed = self
            .recipes
            .remove_if(&id, |_, recipe| same_user(&recipe.author, requester))
            .is_some();
        if removed {
            info!("recipe deleted: id={} by {}", id, requester);
        }
        removed
    }

    pub fn get_recipe(&self, id: u64) -> Option<Recipe> {
        self.recipes.get(&id).map(|entry| entry.value().clone())
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// All recipes, newest first.
    pub fn list_all(&self) -> Vec<Recipe> {
        self.collect_sorted(|_| true)
    }

    /// The given author's recipes, newest first.
    pub fn list_by_author(&self, author: &str) -> Vec<Recipe> {
        self.collect_sorted(|recipe| same_user(&recipe.author, author))
    }

    /// Case-insensitive substring match on the title, newest first.
    pub fn search_by_title(&self, query: &str) -> Vec<Recipe> {
        let query = query.to_lowercase();
        self.collect_sorted(|recipe| recipe.title.to_lowercase().contains(&query))
    }

    /// Case-insensitive substring match against any ingredient, newest first.
    pub fn search_by_ingredient(&self, query: &str) -> Vec<Recipe> {
        let query = query.to_lowercase();
        self.collect_sorted(|recipe| {
            recipe
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(&query))
        })
    }

    /// Case-insensitive EXACT match against any tag, newest first.
    /// Unlike title/ingredient search this is not a substring match.
    pub fn search_by_tag(&self, tag: &str) -> Vec<Recipe> {
        let tag = tag.to_lowercase();
        self.collect_sorted(|recipe| recipe.tags.iter().any(|t| t.to_lowercase() == tag))
    }

    fn collect_sorted(&self, keep: impl Fn(&Recipe) -> bool) -> Vec<Recipe> {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        // Sort by creation date (newest first). Creation stamps have
        // one-second resolution, so ties break by id, newest allocation
        // first.
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recipes
    }

    /* --------- Social annotations --------- */

    /// Flips `username`'s like on the recipe and reports the resulting
    /// state: true = now liked, false = now unliked. Also false when the
    /// recipe is unknown.
    pub fn toggle_like(&self, id: u64, username: &str) -> bool {
        match self.recipes.get_mut(&id) {
            Some(mut recipe) => recipe.toggle_like(username),
            None => false,
        }
    }

    /// Appends a comment stamped with the current time.
    /// Returns false if the recipe is unknown.
    pub fn add_comment(&self, id: u64, username: &str, text: String) -> bool {
        match self.recipes.get_mut(&id) {
            Some(mut recipe) => {
                recipe.comments.push(Comment {
                    author: username.to_string(),
                    text,
                    created_at: Utc::now().timestamp(),
                });
                true
            }
            None => false,
        }
    }

    /// Adds `other` to `username`'s follow set. Returns true only when
    /// newly added. Callers check self-follow and that the target exists;
    /// this method does neither.
    pub fn follow(&self, username: &str, other: &str) -> bool {
        match self.users.get_mut(&username.to_lowercase()) {
            Some(mut user) => user.follow(other),
            None => false,
        }
    }

    /* --------- Snapshots --------- */

    /// Point-in-time copy of the whole store for the persistence gateway.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self
                .users
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
            recipes: self
                .recipes
                .iter()
                .map(|entry| (*entry.key(), entry.value().clone()))
                .collect(),
            next_recipe_id: self.next_recipe_id.load(Ordering::SeqCst),
        }
    }

    /// Replaces the whole store with the snapshot's contents.
    pub fn restore(&self, snapshot: Snapshot) {
        self.users.clear();
        for (key, user) in snapshot.users {
            self.users.insert(key, user);
        }
        self.recipes.clear();
        for (id, recipe) in snapshot.recipes {
            self.recipes.insert(id, recipe);
        }
        // Ids start at 1; guard against a hand-edited counter.
        self.next_recipe_id
            .store(snapshot.next_recipe_id.max(1), Ordering::SeqCst);
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

fn same_user(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Tags are set-like: drop duplicates under case-insensitive comparison,
/// keeping the first occurrence and its original case.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name.to_string(), format!("hash-{name}"), name.to_string())
    }

    fn add_tea(platform: &Platform, author: &str) -> Recipe {
        platform.add_recipe(
            author,
            "Tea".into(),
            "Classic chai".into(),
            vec!["water".into(), "Tea Leaves".into()],
            vec!["boil".into(), "steep".into()],
            vec!["drink".into()],
        )
    }

    #[test]
    fn usernames_are_case_insensitive_but_case_preserving() {
        let platform = Platform::new();
        platform.add_user(user("Alice"));

        assert!(platform.username_exists("alice"));
        assert!(platform.username_exists("ALICE"));
        assert!(!platform.username_exists("bob"));
        assert_eq!(platform.get_user("aLiCe").unwrap().username, "Alice");
    }

    #[test]
    fn recipe_ids_start_at_one_and_are_never_reused() {
        let platform = Platform::new();
        assert_eq!(add_tea(&platform, "alice").id, 1);
        assert_eq!(add_tea(&platform, "bob").id, 2);

        assert!(platform.delete_recipe(1, "alice"));
        assert_eq!(add_tea(&platform, "carol").id, 3);
        assert!(platform.get_recipe(1).is_none());
    }

    #[test]
    fn edit_is_gated_on_the_author_case_insensitively() {
        let platform = Platform::new();
        let recipe = add_tea(&platform, "Alice");

        let edit = |requester: &str| {
            platform.edit_recipe(
                recipe.id,
                requester,
                "Masala Tea".into(),
                "Spiced chai".into(),
                vec!["water".into()],
                vec!["boil".into()],
                vec!["drink".into()],
            )
        };

        assert!(!edit("bob"));
        let unchanged = platform.get_recipe(recipe.id).unwrap();
        assert_eq!(unchanged.title, "Tea");
        assert!(unchanged.last_updated.is_none());

        assert!(edit("ALICE"));
        let updated = platform.get_recipe(recipe.id).unwrap();
        assert_eq!(updated.title, "Masala Tea");
        assert_eq!(updated.author, "Alice");
        assert!(updated.last_updated.is_some());
        assert_eq!(updated.created_at, recipe.created_at);
    }

    #[test]
    fn delete_by_non_owner_is_refused() {
        let platform = Platform::new();
        let recipe = add_tea(&platform, "alice");

        assert!(!platform.delete_recipe(recipe.id, "bob"));
        assert!(platform.get_recipe(recipe.id).is_some());
        assert!(!platform.delete_recipe(999, "alice"));
    }

    #[test]
    fn listing_is_newest_first_for_any_insertion_order() {
        let platform = Platform::new();
        // Seed through a snapshot so creation stamps are controlled.
        let mut snapshot = platform.snapshot();
        for (id, created_at) in [(1, 300), (2, 100), (3, 200)] {
            let mut recipe = add_template(id);
            recipe.created_at = created_at;
            snapshot.recipes.insert(id, recipe);
        }
        snapshot.next_recipe_id = 4;
        platform.restore(snapshot);

        let ids: Vec<u64> = platform.list_all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn listing_breaks_creation_ties_by_newest_id() {
        let platform = Platform::new();
        let mut snapshot = platform.snapshot();
        for id in [1, 2, 3] {
            let mut recipe = add_template(id);
            recipe.created_at = 500;
            snapshot.recipes.insert(id, recipe);
        }
        snapshot.next_recipe_id = 4;
        platform.restore(snapshot);

        let ids: Vec<u64> = platform.list_all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    fn add_template(id: u64) -> Recipe {
        Recipe {
            id,
            title: format!("Recipe {id}"),
            description: String::new(),
            author: "alice".into(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            tags: Vec::new(),
            created_at: 0,
            last_updated: None,
            likes: HashSet::new(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn title_search_matches_substrings_case_insensitively() {
        let platform = Platform::new();
        add_tea(&platform, "alice");
        platform.add_recipe(
            "bob",
            "Dal Makhani".into(),
            "Slow-cooked lentils".into(),
            vec!["black lentils".into()],
            vec!["simmer".into()],
            vec!["dinner".into()],
        );

        let hits = platform.search_by_title("TEA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Tea");
        assert!(platform.search_by_title("biryani").is_empty());
    }

    #[test]
    fn ingredient_search_matches_substrings() {
        let platform = Platform::new();
        add_tea(&platform, "alice");

        assert_eq!(platform.search_by_ingredient("leaves").len(), 1);
        assert_eq!(platform.search_by_ingredient("LEAV").len(), 1);
        assert!(platform.search_by_ingredient("rice").is_empty());
    }

    #[test]
    fn tag_search_is_exact_not_substring() {
        let platform = Platform::new();
        platform.add_recipe(
            "alice",
            "Salad".into(),
            String::new(),
            vec![],
            vec![],
            vec!["veg".into()],
        );
        platform.add_recipe(
            "alice",
            "Curry".into(),
            String::new(),
            vec![],
            vec![],
            vec!["vegetarian".into()],
        );

        let hits = platform.search_by_tag("Veg");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Salad");
    }

    #[test]
    fn tags_are_deduplicated_case_insensitively_keeping_first_case() {
        let platform = Platform::new();
        let recipe = platform.add_recipe(
            "alice",
            "Salad".into(),
            String::new(),
            vec![],
            vec![],
            vec!["Veg".into(), "quick".into(), "veg".into(), "VEG".into()],
        );
        assert_eq!(recipe.tags, vec!["Veg", "quick"]);
    }

    #[test]
    fn like_toggle_alternates_and_round_trips() {
        let platform = Platform::new();
        let recipe = add_tea(&platform, "alice");
        let before = platform.get_recipe(recipe.id).unwrap().liked_by("bob");

        assert!(platform.toggle_like(recipe.id, "Bob"));
        assert!(platform.get_recipe(recipe.id).unwrap().liked_by("BOB"));
        assert!(!platform.toggle_like(recipe.id, "bob"));

        let after = platform.get_recipe(recipe.id).unwrap().liked_by("bob");
        assert_eq!(before, after);
        assert!(!platform.toggle_like(999, "bob"));
    }

    #[test]
    fn comments_append_in_order_with_their_author() {
        let platform = Platform::new();
        let recipe = add_tea(&platform, "alice");

        assert!(platform.add_comment(recipe.id, "bob", "nice".into()));
        assert!(platform.add_comment(recipe.id, "carol", "tried it".into()));
        assert!(!platform.add_comment(999, "bob", "lost".into()));

        let comments = platform.get_recipe(recipe.id).unwrap().comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author, "bob");
        assert_eq!(comments[0].text, "nice");
        assert_eq!(comments[1].author, "carol");
    }

    #[test]
    fn follow_reports_only_new_additions() {
        let platform = Platform::new();
        platform.add_user(user("alice"));
        platform.add_user(user("Bob"));

        assert!(platform.follow("alice", "Bob"));
        assert!(!platform.follow("ALICE", "bob"));
        assert!(platform.get_user("alice").unwrap().follows("BOB"));
        // Unknown follower: nothing to mutate.
        assert!(!platform.follow("mallory", "alice"));
    }

    #[test]
    fn my_recipes_only_lists_the_requested_author() {
        let platform = Platform::new();
        add_tea(&platform, "Alice");
        add_tea(&platform, "bob");
        add_tea(&platform, "alice");

        let mine = platform.list_by_author("ALICE");
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.author.to_lowercase() == "alice"));
    }

    #[test]
    fn snapshot_restore_round_trips_the_store() {
        let platform = Platform::new();
        platform.add_user(user("alice"));
        let recipe = add_tea(&platform, "alice");
        platform.toggle_like(recipe.id, "bob");
        platform.add_comment(recipe.id, "bob", "nice".into());

        let restored = Platform::new();
        restored.restore(platform.snapshot());

        assert!(restored.username_exists("alice"));
        let tea = restored.get_recipe(recipe.id).unwrap();
        assert!(tea.liked_by("bob"));
        assert_eq!(tea.comments.len(), 1);
        // Id allocation continues where the donor left off.
        assert_eq!(add_tea(&restored, "alice").id, recipe.id + 1);
    }
}
