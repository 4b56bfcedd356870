//! KML rendering of an incident collection.
//!
//! Produces a Google-Earth-compatible document: one style pair per catalog
//! subcategory (normal + urgent), incidents grouped into nested
//! category/subcategory folders, one `<Placemark>` per incident. Purely a
//! formatting crate over `faro-core` types; the caller decides which
//! incidents to include.

mod serialize;

pub use serialize::render;
