pub mod files;
pub mod properties;

pub use files::{FileError, FileStore};
pub use properties::{
    ListingStatus, NewProperty, Property, PropertyPatch, PropertyStore, StoreError,
};
