//! Image delivery: writing the framebuffer to files or a viewer.
//!
//! The interpreter talks to an [`ImageSink`]. Two are provided:
//!
//! - [`ExternalSink`] pipes an ASCII PPM into an external converter (the
//!   converter picks the format from the filename extension) or viewer
//! - [`NativeSink`] encodes in-process: `.ppm` through the framebuffer's
//!   binary writer, anything else through the `image` crate. It cannot
//!   display.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::framebuffer::Framebuffer;

/// Errors raised while delivering an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("unsupported output: {0}")]
    Unsupported(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Where a finished image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A file; the extension selects the encoding
    File(PathBuf),
    /// An interactive viewer
    Display,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Display => write!(f, "display"),
        }
    }
}

/// Receives the framebuffer contents whenever a script saves or displays.
pub trait ImageSink {
    fn deliver(&mut self, framebuffer: &Framebuffer, destination: &Destination) -> OutputResult<()>;
}

impl<S: ImageSink + ?Sized> ImageSink for Box<S> {
    fn deliver(&mut self, framebuffer: &Framebuffer, destination: &Destination) -> OutputResult<()> {
        (**self).deliver(framebuffer, destination)
    }
}

/// Streams an ASCII PPM to an external program's stdin.
#[derive(Debug, Clone)]
pub struct ExternalSink {
    /// Invoked as `<converter> - <file>`
    pub converter: String,
    /// Invoked with no arguments
    pub viewer: String,
}

impl Default for ExternalSink {
    fn default() -> Self {
        Self {
            converter: "convert".to_string(),
            viewer: "display".to_string(),
        }
    }
}

impl ExternalSink {
    pub fn new(converter: impl Into<String>, viewer: impl Into<String>) -> Self {
        Self {
            converter: converter.into(),
            viewer: viewer.into(),
        }
    }

    fn pipe(&self, mut command: Command, framebuffer: &Framebuffer) -> OutputResult<()> {
        let program = command.get_program().to_string_lossy().into_owned();
        log::debug!("Piping {}x{} image to '{}'", framebuffer.width(), framebuffer.height(), program);

        let mut child = command
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| OutputError::Spawn {
                program: program.clone(),
                source,
            })?;

        let written = match child.stdin.take() {
            Some(stdin) => {
                let mut writer = BufWriter::new(stdin);
                let result = framebuffer.write_ascii(&mut writer);
                let result = result.and_then(|()| writer.flush());
                // Closing the pipe before the wait lets the child see EOF
                drop(writer);
                result
            }
            None => Ok(()),
        };

        // Reap the child even when the pipe broke; its status explains why
        let status = child.wait()?;
        if !status.success() {
            if let Err(e) = &written {
                log::debug!("Pipe to '{}' failed: {}", program, e);
            }
            return Err(OutputError::ExitStatus { program, status });
        }
        Ok(written?)
    }
}

impl ImageSink for ExternalSink {
    fn deliver(&mut self, framebuffer: &Framebuffer, destination: &Destination) -> OutputResult<()> {
        let command = match destination {
            Destination::File(path) => {
                let mut command = Command::new(&self.converter);
                command.arg("-").arg(path);
                command
            }
            Destination::Display => Command::new(&self.viewer),
        };
        self.pipe(command, framebuffer)
    }
}

/// Encodes images in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSink;

fn is_ppm(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ppm"))
}

impl NativeSink {
    fn encode(&self, framebuffer: &Framebuffer, path: &Path) -> OutputResult<()> {
        if is_ppm(path) {
            framebuffer.save_binary(path)?;
            return Ok(());
        }

        let width = u32::try_from(framebuffer.width())
            .map_err(|_| OutputError::Unsupported(format!("width {} too large", framebuffer.width())))?;
        let height = u32::try_from(framebuffer.height())
            .map_err(|_| OutputError::Unsupported(format!("height {} too large", framebuffer.height())))?;
        let bytes: Vec<u8> = bytemuck::cast_slice(framebuffer.pixels()).to_vec();
        let img = image::RgbImage::from_raw(width, height, bytes)
            .ok_or_else(|| OutputError::Unsupported("pixel buffer does not match dimensions".to_string()))?;
        img.save(path)?;
        Ok(())
    }
}

impl ImageSink for NativeSink {
    fn deliver(&mut self, framebuffer: &Framebuffer, destination: &Destination) -> OutputResult<()> {
        match destination {
            Destination::File(path) => self.encode(framebuffer, path),
            Destination::Display => Err(OutputError::Unsupported(
                "the native backend cannot display images".to_string(),
            )),
        }
    }
}
