//! Security validation modules.

pub mod path;
pub mod permissions;
pub mod symlink;

// Re-export public types and functions
pub use path::validate_path;
pub use permissions::FileAttributes;
pub use permissions::apply_mode;
pub use symlink::validate_symlink;
