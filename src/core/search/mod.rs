//! Search state carried in the URL
//!
//! - [`params`]: ordered query-string parameters and the list request they encode
//! - [`debounce`]: debounced keystroke → URL replace

pub mod debounce;
pub mod params;

pub use debounce::{DEFAULT_DEBOUNCE, DebounceState, Debouncer, InMemoryLocation, Location, SearchBox};
pub use params::{SearchParams, SearchQuery};
