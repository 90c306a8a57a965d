//! Bytecode to operation list.

use std::path::Path;

use binrw::io::Cursor;
use binrw::BinRead;

use super::{BytecodeError, BytecodeResult, Instruction, Opcode, END_TAG};
use crate::operation::Operation;

/// Decode an instruction stream into operations.
///
/// Decoding stops at the end of input or at a `0x0` tag. Shapes always come
/// back with `Some(reflectance)` since the stream carries the profile.
pub fn decode(bytes: &[u8]) -> BytecodeResult<Vec<Operation>> {
    let mut cursor = Cursor::new(bytes);
    let mut operations = Vec::new();

    while let Some(&tag) = bytes.get(cursor.position() as usize) {
        if tag == END_TAG {
            break;
        }
        let offset = cursor.position() as usize;
        if Opcode::from_byte(tag).is_none() {
            return Err(BytecodeError::UnknownTag { offset, tag });
        }

        // A known tag can only fail by running out of payload
        let instruction = Instruction::read(&mut cursor).map_err(|e| {
            log::debug!("Instruction 0x{:02x} at offset {}: {}", tag, offset, e);
            BytecodeError::UnexpectedEof { offset, tag }
        })?;
        operations.push(instruction.into_operation(offset)?);
    }

    log::debug!("Decoded {} instructions from {} bytes", operations.len(), cursor.position());
    Ok(operations)
}

/// Read and decode a bytecode file.
pub fn decode_file<P: AsRef<Path>>(path: P) -> BytecodeResult<Vec<Operation>> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::compile;
    use crate::operation::Reflectance;
    use mdl_math::Axis;
    use crate::script::parse_script;

    #[test]
    fn test_decode_compiled_script() {
        let parsed = parse_script(
            "constants\nshiny 0.2 0.2 0.2 0.4 0.4 0.4 0.9 0.9 0.9\n\
             push\nmove\n250 250 0\nrotate\nx 30\nscale\n1 2 1\n\
             sphere\nshiny 0 0 0 50\nbox\n0 0 0 10 10 10\ntorus\n0 0 0 5 40\n\
             line\n0 0 0 1 1 1\nsave\nout.png\ndisplay\npop\n",
        );
        assert!(parsed.is_clean());

        let mut bytes = Vec::new();
        compile(&parsed.operations, &mut bytes).unwrap();
        let decoded = decode(&bytes).unwrap();

        // Constants disappear; shapes gain an explicit profile
        assert_eq!(decoded.len(), parsed.operations.len() - 1);
        assert_eq!(
            decoded[4].reflectance(),
            Some(&Reflectance::from_array([0.2, 0.2, 0.2, 0.4, 0.4, 0.4, 0.9, 0.9, 0.9]))
        );
        assert_eq!(decoded[5].reflectance(), Some(&Reflectance::DEFAULT));
        assert_eq!(
            decoded[2],
            Operation::Rotate {
                axis: Axis::X,
                degrees: 30.0
            }
        );
        assert_eq!(
            decoded[8],
            Operation::Save {
                path: "out.png".into()
            }
        );
        assert_eq!(decoded[10], Operation::Pop);
    }

    #[test]
    fn test_end_tag_stops_decoding() {
        let decoded = decode(&[0x1, 0x0, 0xFF]).unwrap();
        assert_eq!(decoded, vec![Operation::Push]);
    }

    #[test]
    fn test_empty_stream() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_tag() {
        let err = decode(&[0x1, 0x2, 0x42]).unwrap_err();
        assert!(matches!(err, BytecodeError::UnknownTag { offset: 2, tag: 0x42 }));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = vec![0x3];
        bytes.extend_from_slice(&1.0f64.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, BytecodeError::UnexpectedEof { offset: 0, tag: 0x3 }));
    }

    #[test]
    fn test_invalid_axis() {
        let mut bytes = vec![0x4, b'q'];
        bytes.extend_from_slice(&90.0f64.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, BytecodeError::InvalidAxis { offset: 1, byte: b'q' }));
    }

    #[test]
    fn test_unterminated_filename() {
        let err = decode(b"\x0aout.png").unwrap_err();
        assert!(matches!(err, BytecodeError::UnexpectedEof { tag: 0xA, .. }));
    }

    #[test]
    fn test_non_utf8_filename() {
        let err = decode(b"\x01\x0abild\xe9.png\0").unwrap_err();
        assert!(matches!(err, BytecodeError::InvalidFilename(_)));
    }
}
