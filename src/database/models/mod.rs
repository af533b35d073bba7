pub mod category;
pub mod item;
pub mod user;

pub use category::{Category, CategoryExport};
pub use item::{Item, ItemChanges, LatestItem, NewItem};
pub use user::{NewUser, User};
