//! gpsstore - per-channel GPS point store
//!
//! Keeps an append-only list of named 3D points for each (server, channel)
//! pair and answers name and proximity queries against it.
//!
//! # Architecture
//!
//! ```text
//! point   - immutable named coordinate and Euclidean distance
//! codec   - GPS:<name>:<x>:<y>:<z>: line format
//! store   - whole-file load/save and the per-channel GpsStore
//! query   - name search, closest-by-name, radius search, range removal
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gpsstore::{ChannelKey, GpsStore};
//!
//! let store = GpsStore::open("guild_data")?;
//! let key = ChannelKey::new("1059965274738151475", "42")?;
//! store.add_points(&key, "GPS:Base:0:0:0:GPS:Ore:120:-40:9:")?;
//! let hits = store.search_by_name(&key, "ore")?;
//! ```

pub mod bindings;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod point;
pub mod query;
pub mod render;
mod store;

pub use bindings::Bindings;
pub use error::{ParseError, ParseReason, RangeError, StoreError};
pub use point::{Point, euclidean_distance};
pub use query::{
    NearbyHit, RankedHit, SearchHit, remove_by_index_range, search_by_name, search_closest_by_name,
    search_within_radius,
};
pub use store::{ChannelKey, GpsStore, load, save};
