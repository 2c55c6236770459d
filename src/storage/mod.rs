mod area;
mod persist;

pub use area::{FileStorage, SessionStorage, StorageArea};
pub use persist::{DEFAULT_SLOT, StorageCache};
