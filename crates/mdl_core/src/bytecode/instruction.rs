//! Wire layout of each instruction.
//!
//! Every instruction is a tagged variant of [`Instruction`]; `binrw` writes
//! and checks the tag byte as the variant's magic.

use binrw::{BinRead, BinWrite, NullString};
use mdl_math::{Axis, DVec3};

use super::{BytecodeError, BytecodeResult, Opcode};
use crate::operation::{Operation, Reflectance};

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct VectorPayload {
    pub xyz: [f64; 3],
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct RotatePayload {
    /// ASCII `x`, `y` or `z`
    pub axis: u8,
    pub degrees: f64,
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct BoxPayload {
    pub corner: [f64; 3],
    pub size: [f64; 3],
    pub constants: [f64; 9],
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct SpherePayload {
    pub center: [f64; 3],
    pub radius: f64,
    pub constants: [f64; 9],
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct TorusPayload {
    pub center: [f64; 3],
    pub minor: f64,
    pub major: f64,
    pub constants: [f64; 9],
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct LinePayload {
    pub p0: [f64; 3],
    pub p1: [f64; 3],
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct SavePayload {
    pub file: NullString,
}

/// One encoded instruction.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub enum Instruction {
    #[brw(magic = 0x1u8)]
    Push,
    #[brw(magic = 0x2u8)]
    Pop,
    #[brw(magic = 0x3u8)]
    Move(VectorPayload),
    #[brw(magic = 0x4u8)]
    Rotate(RotatePayload),
    #[brw(magic = 0x5u8)]
    Scale(VectorPayload),
    #[brw(magic = 0x6u8)]
    Box(BoxPayload),
    #[brw(magic = 0x7u8)]
    Sphere(SpherePayload),
    #[brw(magic = 0x8u8)]
    Torus(TorusPayload),
    #[brw(magic = 0x9u8)]
    Line(LinePayload),
    #[brw(magic = 0xAu8)]
    Save(SavePayload),
    #[brw(magic = 0xBu8)]
    Display,
}

fn constants(reflectance: &Option<Reflectance>) -> [f64; 9] {
    reflectance.unwrap_or(Reflectance::DEFAULT).to_array()
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Push => Opcode::Push,
            Instruction::Pop => Opcode::Pop,
            Instruction::Move(_) => Opcode::Move,
            Instruction::Rotate(_) => Opcode::Rotate,
            Instruction::Scale(_) => Opcode::Scale,
            Instruction::Box(_) => Opcode::Box,
            Instruction::Sphere(_) => Opcode::Sphere,
            Instruction::Torus(_) => Opcode::Torus,
            Instruction::Line(_) => Opcode::Line,
            Instruction::Save(_) => Opcode::Save,
            Instruction::Display => Opcode::Display,
        }
    }

    /// Encode an operation, or `None` when it has no instruction.
    ///
    /// Shapes without a profile carry [`Reflectance::DEFAULT`].
    pub fn from_operation(op: &Operation) -> BytecodeResult<Option<Self>> {
        Ok(Some(match op {
            Operation::Push => Instruction::Push,
            Operation::Pop => Instruction::Pop,
            Operation::Display => Instruction::Display,
            Operation::Move { offset } => Instruction::Move(VectorPayload { xyz: offset.to_array() }),
            Operation::Scale { factors } => Instruction::Scale(VectorPayload { xyz: factors.to_array() }),
            Operation::Rotate { axis, degrees } => Instruction::Rotate(RotatePayload {
                axis: axis.as_byte(),
                degrees: *degrees,
            }),
            Operation::Box {
                corner,
                size,
                reflectance,
            } => Instruction::Box(BoxPayload {
                corner: corner.to_array(),
                size: size.to_array(),
                constants: constants(reflectance),
            }),
            Operation::Sphere {
                center,
                radius,
                reflectance,
            } => Instruction::Sphere(SpherePayload {
                center: center.to_array(),
                radius: *radius,
                constants: constants(reflectance),
            }),
            Operation::Torus {
                center,
                minor,
                major,
                reflectance,
            } => Instruction::Torus(TorusPayload {
                center: center.to_array(),
                minor: *minor,
                major: *major,
                constants: constants(reflectance),
            }),
            Operation::Line { p0, p1 } => Instruction::Line(LinePayload {
                p0: p0.to_array(),
                p1: p1.to_array(),
            }),
            Operation::Save { path } => {
                if path.as_bytes().contains(&0) {
                    return Err(BytecodeError::InvalidFilename(format!("{:?} contains a NUL byte", path)));
                }
                Instruction::Save(SavePayload {
                    file: NullString(path.as_bytes().to_vec()),
                })
            }
            Operation::Circle { .. }
            | Operation::Hermite { .. }
            | Operation::Bezier { .. }
            | Operation::Clear
            | Operation::Constants { .. } => return Ok(None),
        }))
    }

    /// Convert back to an operation. `offset` is the position of the tag
    /// byte and is only used in error reports.
    pub fn into_operation(self, offset: usize) -> BytecodeResult<Operation> {
        Ok(match self {
            Instruction::Push => Operation::Push,
            Instruction::Pop => Operation::Pop,
            Instruction::Display => Operation::Display,
            Instruction::Move(p) => Operation::Move {
                offset: DVec3::from_array(p.xyz),
            },
            Instruction::Scale(p) => Operation::Scale {
                factors: DVec3::from_array(p.xyz),
            },
            Instruction::Rotate(p) => Operation::Rotate {
                axis: Axis::from_byte(p.axis).ok_or(BytecodeError::InvalidAxis {
                    offset: offset + 1,
                    byte: p.axis,
                })?,
                degrees: p.degrees,
            },
            Instruction::Box(p) => Operation::Box {
                corner: DVec3::from_array(p.corner),
                size: DVec3::from_array(p.size),
                reflectance: Some(Reflectance::from_array(p.constants)),
            },
            Instruction::Sphere(p) => Operation::Sphere {
                center: DVec3::from_array(p.center),
                radius: p.radius,
                reflectance: Some(Reflectance::from_array(p.constants)),
            },
            Instruction::Torus(p) => Operation::Torus {
                center: DVec3::from_array(p.center),
                minor: p.minor,
                major: p.major,
                reflectance: Some(Reflectance::from_array(p.constants)),
            },
            Instruction::Line(p) => Operation::Line {
                p0: DVec3::from_array(p.p0),
                p1: DVec3::from_array(p.p1),
            },
            Instruction::Save(p) => Operation::Save {
                path: String::from_utf8(p.file.0)
                    .map_err(|e| BytecodeError::InvalidFilename(format!("at offset {}: {}", offset + 1, e)))?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    fn encode(instruction: &Instruction) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        instruction.write(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_magic_matches_opcode() {
        let samples = [
            Instruction::Push,
            Instruction::Move(VectorPayload { xyz: [1.0, 2.0, 3.0] }),
            Instruction::Rotate(RotatePayload {
                axis: b'y',
                degrees: 45.0,
            }),
            Instruction::Display,
        ];
        for instruction in &samples {
            assert_eq!(encode(instruction)[0], instruction.opcode() as u8);
        }
    }

    #[test]
    fn test_rotate_layout() {
        let bytes = encode(&Instruction::Rotate(RotatePayload {
            axis: b'x',
            degrees: -90.0,
        }));
        assert_eq!(bytes.len(), 1 + 1 + 8);
        assert_eq!(bytes[1], b'x');
        assert_eq!(&bytes[2..], &(-90.0f64).to_le_bytes());
    }

    #[test]
    fn test_save_is_nul_terminated() {
        let bytes = encode(&Instruction::Save(SavePayload {
            file: NullString(b"a.png".to_vec()),
        }));
        assert_eq!(bytes, b"\x0aa.png\0");
    }

    #[test]
    fn test_read_sphere() {
        let sphere = Instruction::from_operation(&Operation::Sphere {
            center: DVec3::new(1.0, 2.0, 3.0),
            radius: 4.0,
            reflectance: None,
        })
        .unwrap()
        .unwrap();
        let bytes = encode(&sphere);

        let read = Instruction::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(read, sphere);
        let op = read.into_operation(0).unwrap();
        assert_eq!(op.reflectance(), Some(&Reflectance::DEFAULT));
    }

    #[test]
    fn test_bad_axis_reported() {
        let err = Instruction::Rotate(RotatePayload {
            axis: b'w',
            degrees: 1.0,
        })
        .into_operation(10)
        .unwrap_err();
        assert!(matches!(err, BytecodeError::InvalidAxis { offset: 11, byte: b'w' }));
    }

    #[test]
    fn test_untagged_operations() {
        assert_eq!(Instruction::from_operation(&Operation::Clear).unwrap(), None);
    }
}
