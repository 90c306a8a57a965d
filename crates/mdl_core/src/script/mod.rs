//! Line-oriented scene script support.
//!
//! A script is a sequence of command keywords, one per line. Commands that
//! take arguments read them from the line immediately after the keyword.
//!
//! ## Commands
//!
//! - `push`, `pop`, `clear`, `display`, `quit` (no arguments)
//! - `move tx ty tz`, `scale sx sy sz`, `rotate axis degrees`
//! - `box [k] x y z width height depth`, `sphere [k] cx cy cz r`,
//!   `torus [k] cx cy cz r0 r1` where `k` names a `constants` profile
//! - `circle cx cy cz r`, `line x0 y0 z0 x1 y1 z1`
//! - `hermite x0 y0 x1 y1 rx0 ry0 rx1 ry1`, `bezier x0 y0 x1 y1 x2 y2 x3 y3`
//! - `save filename`
//! - `constants name ka_r ka_g ka_b kd_r kd_g kd_b ks_r ks_g ks_b`
//!
//! Blank lines and lines starting with `#` or `//` are ignored between
//! commands.
//!
//! # Example
//!
//! ```ignore
//! use mdl_core::script::ScriptReader;
//!
//! let reader = ScriptReader::new(std::io::BufReader::new(file));
//! for op in reader {
//!     match op {
//!         Ok(op) => println!("{}", op),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

mod reader;
mod symtab;

pub use reader::*;
pub use symtab::SymbolTable;
