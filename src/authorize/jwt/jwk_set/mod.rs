pub mod fetch;
mod key_set_cache;

pub use key_set_cache::KeySetCache;
