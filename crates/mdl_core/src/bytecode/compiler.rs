//! Operation list to bytecode.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use binrw::io::Cursor;
use binrw::BinWrite;

use super::{BytecodeResult, Instruction};
use crate::operation::Operation;

/// An operation that has no bytecode encoding and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Index of the operation in the input list
    pub index: usize,
    /// Keyword of the skipped operation
    pub command: &'static str,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op code {}: {} not recognized", self.index, self.command)
    }
}

/// Summary of a compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Number of instructions written
    pub instructions: usize,
    /// Number of bytes written
    pub bytes: usize,
    /// Skipped operations, in input order
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile `operations` into bytecode written to `writer`.
///
/// Operations without an encoding are reported in the returned
/// [`CompileReport`] and skipped; `constants` operations are skipped
/// silently because shapes already carry their resolved profile.
pub fn compile<W: Write>(operations: &[Operation], writer: &mut W) -> BytecodeResult<CompileReport> {
    let mut report = CompileReport::default();
    let mut out = Cursor::new(Vec::new());

    for (index, op) in operations.iter().enumerate() {
        if matches!(op, Operation::Constants { .. }) {
            continue;
        }

        let Some(instruction) = Instruction::from_operation(op)? else {
            let diagnostic = Diagnostic {
                index,
                command: op.keyword(),
            };
            log::warn!("{}", diagnostic);
            report.diagnostics.push(diagnostic);
            continue;
        };

        instruction.write(&mut out)?;
        report.instructions += 1;
    }

    let out = out.into_inner();
    writer.write_all(&out)?;
    report.bytes = out.len();
    Ok(report)
}

/// Compile `operations` into a newly created (or truncated) file.
pub fn compile_to_file<P: AsRef<Path>>(operations: &[Operation], path: P) -> BytecodeResult<CompileReport> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    let report = compile(operations, &mut writer)?;
    writer.flush()?;

    log::info!(
        "Compiled {} instructions ({} bytes) to {}",
        report.instructions,
        report.bytes,
        path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::BytecodeError;
    use crate::operation::Reflectance;
    use mdl_math::{Axis, DVec2, DVec3};

    fn compile_bytes(ops: &[Operation]) -> (Vec<u8>, CompileReport) {
        let mut out = Vec::new();
        let report = compile(ops, &mut out).unwrap();
        (out, report)
    }

    fn f64s(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_sphere_with_default_reflectance() {
        let (bytes, report) = compile_bytes(&[Operation::Sphere {
            center: DVec3::ZERO,
            radius: 50.0,
            reflectance: None,
        }]);

        let mut expected = vec![0x7];
        expected.extend(f64s(&[0.0, 0.0, 0.0, 50.0]));
        expected.extend(f64s(&[0.1, 0.1, 0.1, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]));

        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), 1 + 13 * 8);
        assert_eq!(report.instructions, 1);
        assert_eq!(report.bytes, bytes.len());
    }

    #[test]
    fn test_box_with_override() {
        let k = Reflectance::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let (bytes, _) = compile_bytes(&[Operation::Box {
            corner: DVec3::new(1.0, 2.0, 3.0),
            size: DVec3::new(4.0, 5.0, 6.0),
            reflectance: Some(k),
        }]);

        let mut expected = vec![0x6];
        expected.extend(f64s(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        expected.extend(f64s(&k.to_array()));
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_torus_layout() {
        let (bytes, _) = compile_bytes(&[Operation::Torus {
            center: DVec3::ZERO,
            minor: 10.0,
            major: 40.0,
            reflectance: None,
        }]);
        assert_eq!(bytes[0], 0x8);
        assert_eq!(bytes.len(), 1 + 14 * 8);
        assert_eq!(&bytes[1 + 3 * 8..1 + 4 * 8], &10.0f64.to_le_bytes());
        assert_eq!(&bytes[1 + 4 * 8..1 + 5 * 8], &40.0f64.to_le_bytes());
    }

    #[test]
    fn test_transform_layouts() {
        let (bytes, _) = compile_bytes(&[
            Operation::Move {
                offset: DVec3::new(1.0, 2.0, 3.0),
            },
            Operation::Scale {
                factors: DVec3::new(4.0, 5.0, 6.0),
            },
            Operation::Rotate {
                axis: Axis::Z,
                degrees: 30.0,
            },
        ]);

        let mut expected = vec![0x3];
        expected.extend(f64s(&[1.0, 2.0, 3.0]));
        expected.push(0x5);
        expected.extend(f64s(&[4.0, 5.0, 6.0]));
        expected.push(0x4);
        expected.push(b'z');
        expected.extend(f64s(&[30.0]));
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_tag_only_instructions() {
        let (bytes, report) = compile_bytes(&[Operation::Push, Operation::Display, Operation::Pop]);
        assert_eq!(bytes, vec![0x1, 0xB, 0x2]);
        assert_eq!(report.instructions, 3);
    }

    #[test]
    fn test_line_and_save() {
        let (bytes, _) = compile_bytes(&[
            Operation::Line {
                p0: DVec3::ZERO,
                p1: DVec3::ONE,
            },
            Operation::Save {
                path: "out.png".into(),
            },
        ]);

        let mut expected = vec![0x9];
        expected.extend(f64s(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]));
        expected.push(0xA);
        expected.extend_from_slice(b"out.png\0");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_unsupported_operations_are_diagnosed() {
        let (bytes, report) = compile_bytes(&[
            Operation::Push,
            Operation::Circle {
                center: DVec3::ZERO,
                radius: 5.0,
            },
            Operation::Clear,
            Operation::Bezier {
                points: [DVec2::ZERO; 4],
            },
            Operation::Pop,
        ]);

        assert_eq!(bytes, vec![0x1, 0x2]);
        assert_eq!(
            report.diagnostics,
            vec![
                Diagnostic {
                    index: 1,
                    command: "circle"
                },
                Diagnostic {
                    index: 2,
                    command: "clear"
                },
                Diagnostic {
                    index: 3,
                    command: "bezier"
                },
            ]
        );
        assert_eq!(report.diagnostics[0].to_string(), "op code 1: circle not recognized");
    }

    #[test]
    fn test_constants_skipped_silently() {
        let (bytes, report) = compile_bytes(&[Operation::Constants {
            name: "k".into(),
            reflectance: Reflectance::DEFAULT,
        }]);
        assert!(bytes.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_nul_in_filename_rejected() {
        let mut out = Vec::new();
        let result = compile(
            &[Operation::Save {
                path: "bad\0name".into(),
            }],
            &mut out,
        );
        assert!(matches!(result, Err(BytecodeError::InvalidFilename(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_compile_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.mdl_intermediate_language");
        let report = compile_to_file(&[Operation::Push, Operation::Pop], &path).unwrap();
        assert_eq!(report.bytes, 2);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x1, 0x2]);
    }
}
