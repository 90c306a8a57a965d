//! Compact binary instruction stream for MDL scenes.
//!
//! Each instruction is a one-byte tag followed by a fixed layout payload.
//! Floats are little-endian IEEE-754 doubles; there is no padding.
//!
//! | Tag | Instruction | Payload |
//! |---|---|---|
//! | `0x1` | PUSH | none |
//! | `0x2` | POP | none |
//! | `0x3` | MOVE | 3 × f64 (tx, ty, tz) |
//! | `0x4` | ROTATE | 1 byte axis (`x`, `y`, `z`), 1 × f64 degrees |
//! | `0x5` | SCALE | 3 × f64 (sx, sy, sz) |
//! | `0x6` | BOX | 6 × f64 (x, y, z, w, h, d), 9 × f64 reflectance |
//! | `0x7` | SPHERE | 4 × f64 (cx, cy, cz, r), 9 × f64 reflectance |
//! | `0x8` | TORUS | 5 × f64 (cx, cy, cz, r0, r1), 9 × f64 reflectance |
//! | `0x9` | LINE | 6 × f64 (x0, y0, z0, x1, y1, z1) |
//! | `0xA` | SAVE | filename bytes, NUL terminated |
//! | `0xB` | DISPLAY | none |
//!
//! Reflectance is written in the order `ka_r ka_g ka_b kd_r kd_g kd_b ks_r
//! ks_g ks_b`; shapes without an override carry [`Reflectance::DEFAULT`].
//! A `0x0` byte, or the end of input, ends the stream.
//!
//! [`Reflectance::DEFAULT`]: crate::Reflectance::DEFAULT

mod compiler;
mod decoder;
mod instruction;

use thiserror::Error;

pub use compiler::{compile, compile_to_file, CompileReport, Diagnostic};
pub use decoder::{decode, decode_file};
pub use instruction::{
    BoxPayload, Instruction, LinePayload, RotatePayload, SavePayload, SpherePayload, TorusPayload, VectorPayload,
};

/// Instruction tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Push = 0x1,
    Pop = 0x2,
    Move = 0x3,
    Rotate = 0x4,
    Scale = 0x5,
    Box = 0x6,
    Sphere = 0x7,
    Torus = 0x8,
    Line = 0x9,
    Save = 0xA,
    Display = 0xB,
}

/// Tag byte that terminates a stream early.
pub const END_TAG: u8 = 0x0;

impl Opcode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x1 => Opcode::Push,
            0x2 => Opcode::Pop,
            0x3 => Opcode::Move,
            0x4 => Opcode::Rotate,
            0x5 => Opcode::Scale,
            0x6 => Opcode::Box,
            0x7 => Opcode::Sphere,
            0x8 => Opcode::Torus,
            0x9 => Opcode::Line,
            0xA => Opcode::Save,
            0xB => Opcode::Display,
            _ => return None,
        })
    }
}

/// Errors that can occur while encoding or decoding bytecode.
#[derive(Error, Debug)]
pub enum BytecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { offset: usize, tag: u8 },

    #[error("Truncated payload for tag 0x{tag:02x} at offset {offset}")]
    UnexpectedEof { offset: usize, tag: u8 },

    #[error("Invalid rotation axis byte 0x{byte:02x} at offset {offset}")]
    InvalidAxis { offset: usize, byte: u8 },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Encoding error: {0}")]
    Encode(#[from] binrw::Error),
}

/// Result type for bytecode operations.
pub type BytecodeResult<T> = Result<T, BytecodeError>;
