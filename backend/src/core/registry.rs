//! The in-memory registry: authoritative state for all three collections,
//! kept in sync with the backing store by persisting everything after every
//! mutation.

use serde::Serialize;
use thiserror::Error;

use crate::core::models::{Category, Item, Library};
use crate::core::storage::{CatalogStore, LoadReport, StorageError};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("no matching {category} entry for '{title}'")]
    ItemNotFound { category: Category, title: String },

    #[error("a {class} does not belong in the {category} collection")]
    CategoryMismatch {
        category: Category,
        class: &'static str,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Per-category entry counts, for the stats endpoint.
#[derive(Debug, Serialize, PartialEq)]
pub struct Stats {
    pub movies: usize,
    pub games: usize,
    pub books: usize,
    pub total: usize,
}

pub struct Registry<S: CatalogStore> {
    library: Library,
    report: LoadReport,
    store: S,
}

impl<S: CatalogStore> Registry<S> {
    /// Load all collections from the store. Missing files come back as empty
    /// collections; malformed records are counted in the load report.
    pub fn open(store: S) -> Result<Self, StorageError> {
        let (library, report) = store.load()?;
        Ok(Self {
            library,
            report,
            store,
        })
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn items(&self, category: Category) -> &[Item] {
        self.library.items(category)
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn stats(&self) -> Stats {
        Stats {
            movies: self.library.movies.len(),
            games: self.library.games.len(),
            books: self.library.books.len(),
            total: self.library.len(),
        }
    }

    /// Append an item to its category's collection. Duplicates are allowed.
    pub fn add(&mut self, category: Category, item: Item) -> Result<(), RegistryError> {
        self.check_category(category, &item)?;
        self.library.items_mut(category).push(item);
        self.persist()
    }

    /// Remove the first structurally-equal match.
    pub fn remove(&mut self, category: Category, item: &Item) -> Result<(), RegistryError> {
        let position = self.position_of(category, item)?;
        self.library.items_mut(category).remove(position);
        self.persist()
    }

    /// Replace `old` with `new` in place, preserving its position.
    pub fn update(
        &mut self,
        category: Category,
        old: &Item,
        new: Item,
    ) -> Result<(), RegistryError> {
        self.check_category(category, &new)?;
        let position = self.position_of(category, old)?;
        self.library.items_mut(category)[position] = new;
        self.persist()
    }

    /// Case-insensitive substring match on titles, independently per
    /// category, original order preserved. An empty term matches everything.
    pub fn search(&self, term: &str) -> Library {
        let term = term.to_lowercase();
        let matches = |items: &[Item]| -> Vec<Item> {
            items
                .iter()
                .filter(|item| item.title().to_lowercase().contains(&term))
                .cloned()
                .collect()
        };
        Library {
            movies: matches(&self.library.movies),
            games: matches(&self.library.games),
            books: matches(&self.library.books),
        }
    }

    fn check_category(&self, category: Category, item: &Item) -> Result<(), RegistryError> {
        if item.category() != category {
            return Err(RegistryError::CategoryMismatch {
                category,
                class: item.class_name(),
            });
        }
        Ok(())
    }

    fn position_of(&self, category: Category, item: &Item) -> Result<usize, RegistryError> {
        self.library
            .items(category)
            .iter()
            .position(|candidate| candidate == item)
            .ok_or_else(|| RegistryError::ItemNotFound {
                category,
                title: item.title().to_string(),
            })
    }

    fn persist(&mut self) -> Result<(), RegistryError> {
        self.store.save(&self.library)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{MemStore, SaveLog};
    use super::*;
    use crate::core::models::{sample_book, sample_game, sample_movie};

    fn seeded_registry() -> (Registry<MemStore>, SaveLog) {
        let library = Library {
            movies: vec![sample_movie("Dune")],
            games: vec![sample_game("Gwent")],
            books: vec![sample_book("Dune")],
        };
        let store = MemStore::with(library);
        let log = store.save_log();
        (Registry::open(store).unwrap(), log)
    }

    #[test]
    fn add_appends_and_persists_everything() {
        let (mut registry, log) = seeded_registry();
        registry
            .add(Category::Movies, sample_movie("Arrival"))
            .unwrap();

        let titles: Vec<&str> = registry
            .items(Category::Movies)
            .iter()
            .map(Item::title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Arrival"]);

        // The whole library, all three categories, went to the store.
        let saves = log.borrow();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0], *registry.library());
        assert_eq!(saves[0].books.len(), 1);
    }

    #[test]
    fn add_permits_duplicate_titles() {
        let (mut registry, _log) = seeded_registry();
        registry.add(Category::Movies, sample_movie("Dune")).unwrap();
        assert_eq!(registry.items(Category::Movies).len(), 2);
    }

    #[test]
    fn add_rejects_wrong_variant() {
        let (mut registry, log) = seeded_registry();
        let err = registry
            .add(Category::Movies, sample_book("Dune"))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::CategoryMismatch {
                category: Category::Movies,
                class: "Book",
            }
        ));
        assert_eq!(registry.items(Category::Movies).len(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn add_then_remove_restores_prior_state() {
        let (mut registry, log) = seeded_registry();
        let before = registry.library().clone();

        registry
            .add(Category::Games, sample_game("Tetris"))
            .unwrap();
        registry
            .remove(Category::Games, &sample_game("Tetris"))
            .unwrap();

        assert_eq!(*registry.library(), before);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn remove_takes_first_structural_match() {
        let (mut registry, _log) = seeded_registry();
        registry.add(Category::Movies, sample_movie("Dune")).unwrap();
        registry
            .remove(Category::Movies, &sample_movie("Dune"))
            .unwrap();
        assert_eq!(registry.items(Category::Movies).len(), 1);
    }

    #[test]
    fn remove_missing_item_fails_and_leaves_state_unchanged() {
        let (mut registry, log) = seeded_registry();
        let before = registry.library().clone();

        let err = registry
            .remove(Category::Movies, &sample_movie("Blade Runner"))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::ItemNotFound { category: Category::Movies, ref title } if title == "Blade Runner"
        ));
        assert_eq!(*registry.library(), before);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn update_replaces_in_place_without_reordering() {
        let library = Library {
            movies: vec![
                sample_movie("Dune"),
                sample_movie("Arrival"),
                sample_movie("Sicario"),
            ],
            ..Library::default()
        };
        let mut registry = Registry::open(MemStore::with(library)).unwrap();

        registry
            .update(
                Category::Movies,
                &sample_movie("Arrival"),
                sample_movie("Arrival (Director's Cut)"),
            )
            .unwrap();

        let titles: Vec<&str> = registry
            .items(Category::Movies)
            .iter()
            .map(Item::title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Arrival (Director's Cut)", "Sicario"]);
    }

    #[test]
    fn update_missing_item_fails() {
        let (mut registry, _log) = seeded_registry();
        let err = registry
            .update(
                Category::Books,
                &sample_book("Hyperion"),
                sample_book("Endymion"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::ItemNotFound { .. }));
    }

    #[test]
    fn search_is_case_insensitive_per_category() {
        let (registry, _log) = seeded_registry();
        let results = registry.search("dune");
        assert_eq!(results.movies.len(), 1);
        assert_eq!(results.games.len(), 0);
        assert_eq!(results.books.len(), 1);
        assert_eq!(results.movies[0].title(), "Dune");
    }

    #[test]
    fn empty_term_matches_everything_in_order() {
        let (mut registry, _log) = seeded_registry();
        registry
            .add(Category::Movies, sample_movie("Arrival"))
            .unwrap();

        let results = registry.search("");
        assert_eq!(results, *registry.library());
        let titles: Vec<&str> = results.movies.iter().map(Item::title).collect();
        assert_eq!(titles, vec!["Dune", "Arrival"]);
    }

    #[test]
    fn failed_save_surfaces_io_error_and_keeps_the_change() {
        let library = Library {
            movies: vec![sample_movie("Dune")],
            ..Library::default()
        };
        let store = MemStore::with(library);
        let log = store.save_log();
        let fail = store.failure_switch();
        let mut registry = Registry::open(store).unwrap();

        fail.set(true);
        let err = registry
            .add(Category::Movies, sample_movie("Arrival"))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Storage(StorageError::Io(_))
        ));

        // The in-memory change stays; the next successful save writes it out.
        assert_eq!(registry.items(Category::Movies).len(), 2);
        assert!(log.borrow().is_empty());

        registry
            .add(Category::Movies, sample_movie("Sicario"))
            .unwrap();
        assert_eq!(log.borrow().last().unwrap().movies.len(), 3);
    }

    #[test]
    fn remove_and_update_surface_save_failures_too() {
        let library = Library {
            movies: vec![sample_movie("Dune"), sample_movie("Arrival")],
            ..Library::default()
        };
        let store = MemStore::with(library);
        let fail = store.failure_switch();
        let mut registry = Registry::open(store).unwrap();

        fail.set(true);
        let err = registry
            .remove(Category::Movies, &sample_movie("Arrival"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Storage(_)));
        assert_eq!(registry.items(Category::Movies).len(), 1);

        fail.set(true);
        let err = registry
            .update(
                Category::Movies,
                &sample_movie("Dune"),
                sample_movie("Dune: Part Two"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::Storage(_)));
        assert_eq!(registry.items(Category::Movies)[0].title(), "Dune: Part Two");
    }

    #[test]
    fn stats_count_per_category() {
        let (registry, _log) = seeded_registry();
        assert_eq!(
            registry.stats(),
            Stats {
                movies: 1,
                games: 1,
                books: 1,
                total: 3,
            }
        );
    }
}
