//! MDL Core - operation vocabulary, script reader and bytecode codec.
//!
//! This crate provides:
//!
//! - **Operations**: `Operation`, the tagged command record shared by the
//!   interpreter and the bytecode backend, and `Reflectance` profiles
//! - **Script reading**: the line-oriented scene script format with its
//!   `constants` symbol table
//! - **Bytecode**: the compact tagged binary instruction stream, both
//!   directions
//!
//! # Example
//!
//! ```ignore
//! use mdl_core::{bytecode, parse_script};
//!
//! let parsed = parse_script("push\nsphere\n0 0 0 50\n");
//! let report = bytecode::compile_to_file(&parsed.operations, "a.mdl_intermediate_language")?;
//! println!("Wrote {} instructions", report.instructions);
//! ```

pub mod bytecode;
pub mod operation;
pub mod script;

// Re-export commonly used types
pub use operation::{Operation, Reflectance};
pub use script::{parse_script, ParsedScript, ScriptError, ScriptReader, SymbolTable};
