//! Board adapter implementations

mod trello;

pub use trello::TrelloAdapter;
