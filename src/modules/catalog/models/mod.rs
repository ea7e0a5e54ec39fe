mod catalog;

pub use catalog::{Catalog, CatalogEntry, RouteSuggestions, NATIONAL_ROUTES, URBAN_ROUTES};
