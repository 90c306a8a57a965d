//! Streaming script reader.
//!
//! Reads one command at a time so an interpreter can act on each command as
//! soon as it is parsed. A malformed command yields an error for that
//! command only; reading continues with the following line.

use std::io::{BufRead, Cursor};

use mdl_math::{Axis, DVec2, DVec3};
use thiserror::Error;

use super::symtab::SymbolTable;
use crate::operation::{Operation, Reflectance};

/// Errors that can occur while reading a script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown command at line {line}: {text:?}")]
    UnknownCommand { line: usize, text: String },

    #[error("Missing argument line for '{command}' at line {line}")]
    MissingArguments { line: usize, command: &'static str },

    #[error("Invalid arguments for '{command}' at line {line}: {message}")]
    InvalidArguments {
        line: usize,
        command: &'static str,
        message: String,
    },

    #[error("Undefined constants '{name}' at line {line}")]
    UnknownConstants { line: usize, name: String },

    #[error("Line {line} is not valid UTF-8")]
    InvalidEncoding { line: usize },
}

impl ScriptError {
    /// Whether reading can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScriptError::Io(_))
    }
}

/// Result type for script reading.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Every keyword the reader accepts.
pub const KEYWORDS: &[&str] = &[
    "push", "pop", "move", "rotate", "scale", "box", "sphere", "torus", "circle", "hermite",
    "bezier", "line", "clear", "save", "display", "constants", "quit",
];

/// Iterator over the operations of a script.
pub struct ScriptReader<R> {
    input: R,
    line_number: usize,
    symbols: SymbolTable,
    finished: bool,
}

impl<R: BufRead> ScriptReader<R> {
    /// Create a reader over buffered input.
    pub fn new(input: R) -> Self {
        Self {
            input,
            line_number: 0,
            symbols: SymbolTable::new(),
            finished: false,
        }
    }

    /// The constants defined so far.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Line number of the last line read (1-based).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read one raw line. Undecodable bytes fail that line only; the whole
    /// line is consumed either way.
    fn next_line(&mut self) -> Option<ScriptResult<String>> {
        let mut bytes = Vec::new();
        match self.input.read_until(b'\n', &mut bytes) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(String::from_utf8(bytes).map_err(|_| ScriptError::InvalidEncoding {
                    line: self.line_number,
                }))
            }
            Err(e) => Some(Err(e.into())),
        }
    }

    /// Read the argument line that must follow `command`.
    fn argument_line(&mut self, command: &'static str) -> ScriptResult<String> {
        match self.next_line() {
            Some(result) => result,
            None => Err(ScriptError::MissingArguments {
                line: self.line_number,
                command,
            }),
        }
    }

    fn read_command(&mut self, keyword: &str) -> ScriptResult<Option<Operation>> {
        let op = match keyword {
            "push" => Operation::Push,
            "pop" => Operation::Pop,
            "clear" => Operation::Clear,
            "display" => Operation::Display,
            "quit" => return Ok(None),
            "move" => {
                let [x, y, z] = self.floats::<3>("move")?;
                Operation::Move {
                    offset: DVec3::new(x, y, z),
                }
            }
            "scale" => {
                let [x, y, z] = self.floats::<3>("scale")?;
                Operation::Scale {
                    factors: DVec3::new(x, y, z),
                }
            }
            "rotate" => self.rotate()?,
            "box" => {
                let (k, [x, y, z, w, h, d]) = self.shape::<6>("box")?;
                Operation::Box {
                    corner: DVec3::new(x, y, z),
                    size: DVec3::new(w, h, d),
                    reflectance: k,
                }
            }
            "sphere" => {
                let (k, [x, y, z, r]) = self.shape::<4>("sphere")?;
                Operation::Sphere {
                    center: DVec3::new(x, y, z),
                    radius: r,
                    reflectance: k,
                }
            }
            "torus" => {
                let (k, [x, y, z, r0, r1]) = self.shape::<5>("torus")?;
                Operation::Torus {
                    center: DVec3::new(x, y, z),
                    minor: r0,
                    major: r1,
                    reflectance: k,
                }
            }
            "circle" => {
                let [x, y, z, r] = self.floats::<4>("circle")?;
                Operation::Circle {
                    center: DVec3::new(x, y, z),
                    radius: r,
                }
            }
            "hermite" => {
                let v = self.floats::<8>("hermite")?;
                Operation::Hermite {
                    p0: DVec2::new(v[0], v[1]),
                    p1: DVec2::new(v[2], v[3]),
                    r0: DVec2::new(v[4], v[5]),
                    r1: DVec2::new(v[6], v[7]),
                }
            }
            "bezier" => {
                let v = self.floats::<8>("bezier")?;
                Operation::Bezier {
                    points: [
                        DVec2::new(v[0], v[1]),
                        DVec2::new(v[2], v[3]),
                        DVec2::new(v[4], v[5]),
                        DVec2::new(v[6], v[7]),
                    ],
                }
            }
            "line" => {
                let v = self.floats::<6>("line")?;
                Operation::Line {
                    p0: DVec3::new(v[0], v[1], v[2]),
                    p1: DVec3::new(v[3], v[4], v[5]),
                }
            }
            "save" => {
                let line = self.argument_line("save")?;
                let path = line.trim();
                if path.is_empty() {
                    return Err(self.invalid("save", "empty filename".to_string()));
                }
                Operation::Save {
                    path: path.to_string(),
                }
            }
            "constants" => self.constants()?,
            other => {
                return Err(ScriptError::UnknownCommand {
                    line: self.line_number,
                    text: other.to_string(),
                })
            }
        };
        Ok(Some(op))
    }

    fn invalid(&self, command: &'static str, message: String) -> ScriptError {
        ScriptError::InvalidArguments {
            line: self.line_number,
            command,
            message,
        }
    }

    fn parse_fields<const N: usize>(&self, command: &'static str, fields: &[&str]) -> ScriptResult<[f64; N]> {
        if fields.len() != N {
            return Err(self.invalid(
                command,
                format!("expected {} numbers, found {} fields", N, fields.len()),
            ));
        }
        let mut values = [0.0; N];
        for (value, field) in values.iter_mut().zip(fields) {
            *value = field
                .parse()
                .map_err(|_| self.invalid(command, format!("invalid number {:?}", field)))?;
        }
        Ok(values)
    }

    fn floats<const N: usize>(&mut self, command: &'static str) -> ScriptResult<[f64; N]> {
        let line = self.argument_line(command)?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        self.parse_fields::<N>(command, &fields)
    }

    /// Shape arguments with an optional leading constants name.
    fn shape<const N: usize>(&mut self, command: &'static str) -> ScriptResult<(Option<Reflectance>, [f64; N])> {
        let line = self.argument_line(command)?;
        let mut fields: Vec<&str> = line.split_whitespace().collect();

        let named = fields.len() == N + 1 && fields[0].parse::<f64>().is_err();
        let reflectance = if named {
            let name = fields.remove(0);
            let k = self
                .symbols
                .lookup(name)
                .copied()
                .ok_or_else(|| ScriptError::UnknownConstants {
                    line: self.line_number,
                    name: name.to_string(),
                })?;
            Some(k)
        } else {
            None
        };

        Ok((reflectance, self.parse_fields::<N>(command, &fields)?))
    }

    fn rotate(&mut self) -> ScriptResult<Operation> {
        let line = self.argument_line("rotate")?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (axis_field, rest) = match fields.split_first() {
            Some(split) => split,
            None => return Err(self.invalid("rotate", "expected axis and degrees".to_string())),
        };

        let mut chars = axis_field.chars();
        let axis = match (chars.next().and_then(Axis::from_char), chars.next()) {
            (Some(axis), None) => axis,
            _ => return Err(self.invalid("rotate", format!("invalid axis {:?}", axis_field))),
        };
        let [degrees] = self.parse_fields::<1>("rotate", rest)?;

        Ok(Operation::Rotate { axis, degrees })
    }

    fn constants(&mut self) -> ScriptResult<Operation> {
        let line = self.argument_line("constants")?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (name, rest) = match fields.split_first() {
            Some((name, rest)) if name.parse::<f64>().is_err() => (*name, rest),
            _ => return Err(self.invalid("constants", "expected a name".to_string())),
        };

        let k = self.parse_fields::<9>("constants", rest)?;
        let reflectance = Reflectance::from_array(k);
        self.symbols.define(name, reflectance);

        Ok(Operation::Constants {
            name: name.to_string(),
            reflectance,
        })
    }
}

impl<R: BufRead> Iterator for ScriptReader<R> {
    type Item = ScriptResult<Operation>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let line = match self.next_line()? {
                Ok(line) => line,
                Err(e) => {
                    self.finished = !e.is_recoverable();
                    return Some(Err(e));
                }
            };

            let keyword = line.trim();
            if keyword.is_empty() || keyword.starts_with('#') || keyword.starts_with("//") {
                continue;
            }

            return match self.read_command(keyword) {
                Ok(Some(op)) => Some(Ok(op)),
                Ok(None) => {
                    self.finished = true;
                    None
                }
                Err(e) => {
                    if !e.is_recoverable() {
                        self.finished = true;
                    }
                    Some(Err(e))
                }
            };
        }
        None
    }
}

/// All operations and errors of a fully read script.
#[derive(Debug, Default)]
pub struct ParsedScript {
    pub operations: Vec<Operation>,
    pub errors: Vec<ScriptError>,
    pub symbols: SymbolTable,
}

impl ParsedScript {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read a whole script, collecting every operation and every error.
pub fn parse_script(content: &str) -> ParsedScript {
    read_script(Cursor::new(content))
}

/// Read a whole script from buffered input.
pub fn read_script<R: BufRead>(input: R) -> ParsedScript {
    let mut reader = ScriptReader::new(input);
    let mut parsed = ParsedScript::default();

    for result in reader.by_ref() {
        match result {
            Ok(op) => parsed.operations.push(op),
            Err(e) => {
                log::warn!("{}", e);
                parsed.errors.push(e);
            }
        }
    }

    log::debug!(
        "Read {} operations ({} errors) from {} lines",
        parsed.operations.len(),
        parsed.errors.len(),
        reader.line_number()
    );
    parsed.symbols = reader.symbols;
    parsed
}
