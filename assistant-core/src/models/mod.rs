//! Contact and note models with their in-memory stores

pub mod contacts;
pub mod fields;
pub mod notes;

pub use contacts::{AddressBook, Contact, SearchField};
pub use fields::{Address, Birthday, Email, Name, Phone};
pub use notes::{Note, Notes};
