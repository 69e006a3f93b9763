use crate::core::input::{InputHandler, InputProvider};
use crate::core::models::{Category, Item};
use crate::core::registry::Registry;
use crate::core::storage::CatalogStore;

pub struct App<S: CatalogStore, I: InputProvider> {
    registry: Registry<S>,
    input: InputHandler<I>,
}

impl<S: CatalogStore, I: InputProvider> App<S, I> {
    pub fn new(registry: Registry<S>, input_provider: I) -> Self {
        Self {
            registry,
            input: InputHandler::new(input_provider),
        }
    }

    pub fn run(&mut self) {
        println!("== TROVE COLLECTIONS ==");

        let report = self.registry.load_report();
        if !report.is_clean() {
            eprintln!(
                "Warning: {} malformed record(s) were skipped on load:",
                report.skipped.len()
            );
            for skipped in &report.skipped {
                eprintln!(
                    "  {} record #{}: {}",
                    skipped.category, skipped.index, skipped.error
                );
            }
        }

        loop {
            println!(
                "\n[1] List  [2] Search  [3] Detail  [4] Add  [5] Edit  [6] Delete  [7] Quit"
            );
            let choice = match self.input.get_string_trimmed("Selection: ") {
                Ok(c) => c,
                Err(_) => continue,
            };

            match choice.as_str() {
                "1" => self.list_flow(),
                "2" => self.search_flow(),
                "3" => self.detail_flow(),
                "4" => self.add_flow(),
                "5" => self.edit_flow(),
                "6" => self.delete_flow(),
                "7" => {
                    println!("Goodbye!");
                    break;
                }
                _ => println!("Invalid selection, please try again."),
            }
        }
    }

    fn list_flow(&mut self) {
        let category = match self.choose_category() {
            Some(c) => c,
            None => return,
        };
        self.list_category(category);
    }

    fn search_flow(&mut self) {
        let term = match self.input.get_string_trimmed("Search: ") {
            Ok(t) => t,
            Err(_) => return,
        };
        let results = self.registry.search(&term);
        if results.is_empty() {
            println!("No matches.");
            return;
        }
        for category in Category::ALL {
            let items = results.items(category);
            if items.is_empty() {
                continue;
            }
            println!("{category}:");
            for item in items {
                println!("  {} — {}", item.title(), detail(item));
            }
        }
    }

    fn detail_flow(&mut self) {
        let category = match self.choose_category() {
            Some(c) => c,
            None => return,
        };
        let item = match self.select_item(category, "Item #: ") {
            Some(i) => i,
            None => return,
        };

        println!("\n--- {} ---", item.title());
        println!("  {}", detail(&item));
        println!("  Genre: {}", item.genre());
        println!("  Description: {}", item.description());
        println!("  Image: {}", item.image_url());
    }

    fn add_flow(&mut self) {
        let category = match self.choose_category() {
            Some(c) => c,
            None => return,
        };
        let item = match self.prompt_new_item(category) {
            Some(i) => i,
            None => return,
        };
        let title = item.title().to_string();

        // The registry accepts duplicates; the warning is prompt-side only.
        // Titles fold the same way search does, so non-ASCII case matches.
        let folded = title.to_lowercase();
        let duplicate = self
            .registry
            .items(category)
            .iter()
            .any(|existing| existing.title().to_lowercase() == folded);
        if duplicate {
            println!("Warning: '{title}' already exists in {category}.");
            let confirm = self.input.confirm("Add anyway? (y/N): ").unwrap_or(false);
            if !confirm {
                println!("Cancelled.");
                return;
            }
        }

        match self.registry.add(category, item) {
            Ok(()) => println!("Added: {title}"),
            Err(e) => eprintln!("Add failed: {e}"),
        }
    }

    fn edit_flow(&mut self) {
        let category = match self.choose_category() {
            Some(c) => c,
            None => return,
        };
        let old = match self.select_item(category, "Edit item #: ") {
            Some(i) => i,
            None => return,
        };
        let new = match self.prompt_edited_item(&old) {
            Some(i) => i,
            None => return,
        };
        let title = new.title().to_string();

        match self.registry.update(category, &old, new) {
            Ok(()) => println!("Updated: {title}"),
            Err(e) => eprintln!("Update failed: {e}"),
        }
    }

    fn delete_flow(&mut self) {
        let category = match self.choose_category() {
            Some(c) => c,
            None => return,
        };
        let item = match self.select_item(category, "Delete item #: ") {
            Some(i) => i,
            None => return,
        };

        let prompt = format!("Delete '{}'? (y/N): ", item.title());
        if !self.input.confirm(&prompt).unwrap_or(false) {
            println!("Cancelled.");
            return;
        }

        match self.registry.remove(category, &item) {
            Ok(()) => println!("Deleted: {}", item.title()),
            Err(e) => eprintln!("Delete failed: {e}"),
        }
    }

    fn choose_category(&mut self) -> Option<Category> {
        println!("[1] Movies  [2] Games  [3] Books");
        match self.input.get_string_trimmed("Category: ") {
            Ok(c) => match c.as_str() {
                "1" => Some(Category::Movies),
                "2" => Some(Category::Games),
                "3" => Some(Category::Books),
                _ => {
                    println!("Invalid category.");
                    None
                }
            },
            Err(_) => None,
        }
    }

    fn list_category(&self, category: Category) {
        let items = self.registry.items(category);
        if items.is_empty() {
            println!("No {category} yet.");
            return;
        }
        for (i, item) in items.iter().enumerate() {
            println!("  {}. {} — {}", i + 1, item.title(), detail(item));
        }
    }

    fn select_item(&mut self, category: Category, prompt: &str) -> Option<Item> {
        let count = self.registry.items(category).len();
        if count == 0 {
            println!("No {category} yet.");
            return None;
        }
        self.list_category(category);

        let answer = self.input.get_string_trimmed(prompt).ok()?;
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= count => Some(self.registry.items(category)[n - 1].clone()),
            _ => {
                println!("Invalid selection.");
                None
            }
        }
    }

    fn prompt_new_item(&mut self, category: Category) -> Option<Item> {
        let title = match self.input.get_string_trimmed("Title: ") {
            Ok(t) if !t.is_empty() => t,
            _ => {
                println!("Title cannot be empty.");
                return None;
            }
        };

        let mut field = |prompt: &str| self.input.get_string_trimmed(prompt).ok();

        Some(match category {
            Category::Movies => {
                let director = field("Director: ")?;
                let genre = field("Genre: ")?;
                let length = field("Length: ")?;
                let description = field("Description: ")?;
                let image_url = field("Poster URL: ")?;
                Item::Movie {
                    title,
                    genre,
                    description,
                    image_url,
                    director,
                    length,
                }
            }
            Category::Games => {
                let developer = field("Developer: ")?;
                let genre = field("Genre: ")?;
                let platform = field("Platform: ")?;
                let description = field("Description: ")?;
                let image_url = field("Cover URL: ")?;
                Item::Game {
                    title,
                    genre,
                    description,
                    image_url,
                    developer,
                    platform,
                }
            }
            Category::Books => {
                let author = field("Author: ")?;
                let genre = field("Genre: ")?;
                let pages = field("Pages: ")?;
                let description = field("Description: ")?;
                let image_url = field("Cover URL: ")?;
                Item::Book {
                    title,
                    genre,
                    description,
                    image_url,
                    author,
                    pages,
                }
            }
        })
    }

    /// Re-prompt every field with the current value as the default.
    fn prompt_edited_item(&mut self, old: &Item) -> Option<Item> {
        let input = &mut self.input;
        Some(match old {
            Item::Movie {
                title,
                genre,
                description,
                image_url,
                director,
                length,
            } => Item::Movie {
                title: input.get_with_default("Title", title).ok()?,
                director: input.get_with_default("Director", director).ok()?,
                genre: input.get_with_default("Genre", genre).ok()?,
                length: input.get_with_default("Length", length).ok()?,
                description: input.get_with_default("Description", description).ok()?,
                image_url: input.get_with_default("Poster URL", image_url).ok()?,
            },
            Item::Game {
                title,
                genre,
                description,
                image_url,
                developer,
                platform,
            } => Item::Game {
                title: input.get_with_default("Title", title).ok()?,
                developer: input.get_with_default("Developer", developer).ok()?,
                genre: input.get_with_default("Genre", genre).ok()?,
                platform: input.get_with_default("Platform", platform).ok()?,
                description: input.get_with_default("Description", description).ok()?,
                image_url: input.get_with_default("Cover URL", image_url).ok()?,
            },
            Item::Book {
                title,
                genre,
                description,
                image_url,
                author,
                pages,
            } => Item::Book {
                title: input.get_with_default("Title", title).ok()?,
                author: input.get_with_default("Author", author).ok()?,
                genre: input.get_with_default("Genre", genre).ok()?,
                pages: input.get_with_default("Pages", pages).ok()?,
                description: input.get_with_default("Description", description).ok()?,
                image_url: input.get_with_default("Cover URL", image_url).ok()?,
            },
        })
    }
}

fn detail(item: &Item) -> String {
    match item {
        Item::Movie {
            director, length, ..
        } => format!("Movie, dir. {director} ({length})"),
        Item::Game {
            developer,
            platform,
            ..
        } => format!("Game by {developer} on {platform}"),
        Item::Book { author, pages, .. } => format!("Book by {author} ({pages} pages)"),
    }
}
