pub mod db_entry;
pub mod entry_with_author;
