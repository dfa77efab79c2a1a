/// Platform-specific functionality — permission-bit checks.

pub mod permissions;

pub use permissions::{check_permissions, mode_bits, PermissionFlags};
