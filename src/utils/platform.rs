// utils/platform.rs

//! # Platform Utility Module
//!
//! Detects the operating system and derives the platform-specific Terraform
//! executable name.
//!
//! ## Example Usage
//! ```rust
//! use crate::utils::platform::{get_platform, get_binary_name, Platform};
//!
//! let platform = get_platform();
//! let binary_name = get_binary_name("terraform");
//!
//! println!("Platform: {:?}", platform);
//! println!("Binary Name: {}", binary_name);
//! ```

/// Enum representing supported platforms.
#[derive(Debug, PartialEq)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
    Unknown,
}

/// Determine the current operating system
pub fn get_platform() -> Platform {
    if cfg!(target_os = "windows") {
        Platform::Windows
    } else if cfg!(target_os = "macos") {
        Platform::MacOS
    } else if cfg!(target_os = "linux") {
        Platform::Linux
    } else {
        Platform::Unknown
    }
}

/// Get the executable name for `program` on the current platform
pub fn get_binary_name(program: &str) -> String {
    if get_platform() == Platform::Windows && !program.ends_with(".exe") {
        format!("{}.exe", program)
    } else {
        program.to_string()
    }
}
