#![allow(missing_docs)]

pub mod path;
pub mod tree;
pub mod users;

pub use path::VirtualPath;
pub use subspace_sdk;
pub use tree::{FilesystemTree, Listing, MAX_LINK_DEPTH};
pub use users::{User, UserDirectory, HOME_ROOT};
