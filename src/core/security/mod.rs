// Security module for path validation and access control
//
// File system operations are restricted to an allow-list of base
// directories, so path traversal and symlink escapes are rejected.

pub mod path_validator;

pub use path_validator::{PathPolicy, PathSecurityError};
