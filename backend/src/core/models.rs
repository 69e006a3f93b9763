use serde::{Deserialize, Serialize};
use std::fmt;

/// The three fixed catalog categories, each backed by its own JSON file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Movies,
    Games,
    Books,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Movies, Category::Games, Category::Books];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movies => "movies",
            Category::Games => "games",
            Category::Books => "books",
        }
    }

    /// Default backing file name for this category.
    pub fn file_name(&self) -> &'static str {
        match self {
            Category::Movies => "movies.json",
            Category::Games => "games.json",
            Category::Books => "books.json",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry. The `class` tag is the on-disk discriminator, so a
/// serialized item is exactly the flat record format the store persists.
///
/// `length` and `pages` are kept as text, stored as entered.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "class")]
pub enum Item {
    Movie {
        title: String,
        genre: String,
        description: String,
        image_url: String,
        director: String,
        length: String,
    },
    Game {
        title: String,
        genre: String,
        description: String,
        image_url: String,
        developer: String,
        platform: String,
    },
    Book {
        title: String,
        genre: String,
        description: String,
        image_url: String,
        author: String,
        pages: String,
    },
}

impl Item {
    pub fn title(&self) -> &str {
        match self {
            Item::Movie { title, .. } | Item::Game { title, .. } | Item::Book { title, .. } => {
                title
            }
        }
    }

    pub fn genre(&self) -> &str {
        match self {
            Item::Movie { genre, .. } | Item::Game { genre, .. } | Item::Book { genre, .. } => {
                genre
            }
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Item::Movie { description, .. }
            | Item::Game { description, .. }
            | Item::Book { description, .. } => description,
        }
    }

    pub fn image_url(&self) -> &str {
        match self {
            Item::Movie { image_url, .. }
            | Item::Game { image_url, .. }
            | Item::Book { image_url, .. } => image_url,
        }
    }

    /// The category whose collection this item belongs in.
    pub fn category(&self) -> Category {
        match self {
            Item::Movie { .. } => Category::Movies,
            Item::Game { .. } => Category::Games,
            Item::Book { .. } => Category::Books,
        }
    }

    /// Discriminator string as persisted in the `class` field.
    pub fn class_name(&self) -> &'static str {
        match self {
            Item::Movie { .. } => "Movie",
            Item::Game { .. } => "Game",
            Item::Book { .. } => "Book",
        }
    }
}

/// All three collections, insertion order preserved. The single source of
/// truth during a run; rewritten to disk wholesale on every mutation.
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
pub struct Library {
    pub movies: Vec<Item>,
    pub games: Vec<Item>,
    pub books: Vec<Item>,
}

impl Library {
    pub fn items(&self, category: Category) -> &[Item] {
        match category {
            Category::Movies => &self.movies,
            Category::Games => &self.games,
            Category::Books => &self.books,
        }
    }

    pub(crate) fn items_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::Movies => &mut self.movies,
            Category::Games => &mut self.games,
            Category::Books => &mut self.books,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.games.len() + self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) fn sample_movie(title: &str) -> Item {
    Item::Movie {
        title: title.to_string(),
        genre: "Sci-Fi".to_string(),
        description: "A desert planet.".to_string(),
        image_url: "http://example.com/poster.jpg".to_string(),
        director: "Villeneuve".to_string(),
        length: "155".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn sample_game(title: &str) -> Item {
    Item::Game {
        title: title.to_string(),
        genre: "RPG".to_string(),
        description: "Open world.".to_string(),
        image_url: "http://example.com/cover.png".to_string(),
        developer: "CDPR".to_string(),
        platform: "PC".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn sample_book(title: &str) -> Item {
    Item::Book {
        title: title.to_string(),
        genre: "Fantasy".to_string(),
        description: "A long journey.".to_string(),
        image_url: "http://example.com/jacket.jpg".to_string(),
        author: "Tolkien".to_string(),
        pages: "423".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_knows_its_category_and_class() {
        assert_eq!(sample_movie("Dune").category(), Category::Movies);
        assert_eq!(sample_game("Gwent").category(), Category::Games);
        assert_eq!(sample_book("LotR").category(), Category::Books);
        assert_eq!(sample_movie("Dune").class_name(), "Movie");
    }

    #[test]
    fn serialized_item_carries_class_discriminator() {
        let json = serde_json::to_value(sample_book("LotR")).unwrap();
        assert_eq!(json["class"], "Book");
        assert_eq!(json["author"], "Tolkien");
        assert_eq!(json["pages"], "423");
    }

    #[test]
    fn library_routes_by_category() {
        let mut lib = Library::default();
        lib.items_mut(Category::Games).push(sample_game("Gwent"));
        assert_eq!(lib.items(Category::Games).len(), 1);
        assert!(lib.items(Category::Movies).is_empty());
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn category_file_names() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.file_name()).collect();
        assert_eq!(names, vec!["movies.json", "games.json", "books.json"]);
    }
}
