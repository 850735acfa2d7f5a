// Copyright 2025-2026 collector-dispatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for collector-dispatch introspection commands.
//!
//! Collectors are supplied by the embedding process, so the CLI only
//! inspects version tables and resolution; it never runs measurements.
//!
//! ## Usage
//!
//! ```bash
//! collector-cli namespaces                 # List frameworks
//! collector-cli ops vllm                   # List operations
//! collector-cli versions vllm attn         # List supported versions
//! collector-cli resolve vllm attn 0.15.1   # Show the generation used
//! ```

pub mod config_cmd;
pub mod versions_cmd;

/// Exit code: success.
pub const EXIT_OK: i32 = 0;
/// Exit code: lookup or resolution failure.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code: configuration or table error.
pub const EXIT_CONFIG: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinct() {
        assert_ne!(EXIT_OK, EXIT_FAILURE);
        assert_ne!(EXIT_FAILURE, EXIT_CONFIG);
    }
}
