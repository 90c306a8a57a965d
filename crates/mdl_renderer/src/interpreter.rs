//! Executes operations against a render session.
//!
//! An [`Interpreter`] owns the coordinate stack, the framebuffer and the
//! shared edge and polygon matrices. Each shape is generated in object
//! space, transformed by the current stack top, rasterized, and then the
//! matrix is emptied so shapes never accumulate.

use std::io::BufRead;
use std::path::PathBuf;

use mdl_core::{Operation, Reflectance, ScriptError, ScriptReader};
use mdl_math::{rotate, scale, translate, PointMatrix};
use thiserror::Error;

use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::geometry;
use crate::output::{Destination, ImageSink, OutputError};
use crate::raster;
use crate::stack::{CoordinateStack, StackError};

#[derive(Error, Debug)]
pub enum InterpretError {
    #[error("stack error: {0}")]
    Stack(#[from] StackError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),
}

pub type InterpretResult<T> = Result<T, InterpretError>;

/// Counts from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Operations that completed
    pub executed: usize,
    /// Operations that failed, plus script commands that could not be read
    pub failed: usize,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

pub struct Interpreter<S> {
    config: RenderConfig,
    stack: CoordinateStack,
    framebuffer: Framebuffer,
    edges: PointMatrix,
    polygons: PointMatrix,
    sink: S,
}

impl Interpreter<Box<dyn ImageSink>> {
    /// Create an interpreter using the sink selected by the configuration.
    pub fn from_config(config: RenderConfig) -> Self {
        let sink = config.sink();
        Self::new(config, sink)
    }
}

impl<S: ImageSink> Interpreter<S> {
    pub fn new(config: RenderConfig, sink: S) -> Self {
        let framebuffer = Framebuffer::new(config.width, config.height, config.background);
        Self {
            config,
            stack: CoordinateStack::new(),
            framebuffer,
            edges: PointMatrix::new(),
            polygons: PointMatrix::new(),
            sink,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn stack(&self) -> &CoordinateStack {
        &self.stack
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Execute a single operation.
    pub fn execute(&mut self, op: &Operation) -> InterpretResult<()> {
        log::debug!("{}", op);

        match op {
            Operation::Push => self.stack.push(),
            Operation::Pop => {
                self.stack.pop()?;
            }
            Operation::Move { offset } => self.stack.compose(translate(offset.x, offset.y, offset.z)),
            Operation::Rotate { axis, degrees } => self.stack.compose(rotate(*axis, *degrees)),
            Operation::Scale { factors } => self.stack.compose(scale(factors.x, factors.y, factors.z)),

            Operation::Box {
                corner,
                size,
                reflectance,
            } => {
                geometry::add_box(&mut self.polygons, *corner, *size);
                self.flush_polygons(reflectance.as_ref());
            }
            Operation::Sphere {
                center,
                radius,
                reflectance,
            } => {
                let steps = self.config.tessellation.sphere_steps;
                geometry::add_sphere(&mut self.polygons, *center, *radius, steps);
                self.flush_polygons(reflectance.as_ref());
            }
            Operation::Torus {
                center,
                minor,
                major,
                reflectance,
            } => {
                let steps = self.config.tessellation.torus_steps;
                geometry::add_torus(&mut self.polygons, *center, *minor, *major, steps);
                self.flush_polygons(reflectance.as_ref());
            }

            Operation::Circle { center, radius } => {
                let steps = self.config.tessellation.curve_steps;
                geometry::add_circle(&mut self.edges, *center, *radius, steps);
                self.flush_edges();
            }
            Operation::Hermite { p0, p1, r0, r1 } => {
                let steps = self.config.tessellation.curve_steps;
                geometry::add_hermite(&mut self.edges, *p0, *p1, *r0, *r1, steps);
                self.flush_edges();
            }
            Operation::Bezier { points } => {
                let steps = self.config.tessellation.curve_steps;
                geometry::add_bezier(&mut self.edges, *points, steps);
                self.flush_edges();
            }
            Operation::Line { p0, p1 } => {
                self.edges.add_edge(*p0, *p1);
                self.flush_edges();
            }

            Operation::Clear => self.framebuffer.clear(),
            Operation::Save { path } => {
                let destination = Destination::File(PathBuf::from(path));
                self.sink.deliver(&self.framebuffer, &destination)?;
                log::info!("Saved {}", path);
            }
            Operation::Display => {
                self.sink.deliver(&self.framebuffer, &Destination::Display)?;
            }
            // Resolved by the script reader
            Operation::Constants { .. } => {}
        }
        Ok(())
    }

    fn flush_polygons(&mut self, reflectance: Option<&Reflectance>) {
        let reflectance = reflectance.unwrap_or(&self.config.lighting.reflectance);
        self.polygons.apply(&self.stack.top());
        let drawn = raster::draw_polygons(&mut self.framebuffer, &self.polygons, &self.config.lighting, reflectance);
        log::trace!("Drew {} of {} triangles", drawn, self.polygons.len() / 3);
        self.polygons.clear();
    }

    fn flush_edges(&mut self) {
        self.edges.apply(&self.stack.top());
        raster::draw_lines(&mut self.framebuffer, &self.edges, self.config.foreground);
        self.edges.clear();
    }

    fn record(&mut self, op: &Operation, summary: &mut RunSummary) {
        match self.execute(op) {
            Ok(()) => summary.executed += 1,
            Err(e) => {
                log::error!("'{}' failed: {}", op.keyword(), e);
                summary.failed += 1;
            }
        }
    }

    /// Execute operations in order. Failing operations are logged and
    /// skipped.
    pub fn run_operations(&mut self, ops: &[Operation]) -> RunSummary {
        let mut summary = RunSummary::default();
        for op in ops {
            self.record(op, &mut summary);
        }
        log::info!("Executed {} operations ({} failed)", summary.executed, summary.failed);
        summary
    }

    /// Read and execute a script one command at a time.
    ///
    /// Malformed commands are logged and counted. Only a read failure of
    /// the underlying stream stops the run.
    pub fn run_script<R: BufRead>(&mut self, reader: ScriptReader<R>) -> InterpretResult<RunSummary> {
        let mut summary = RunSummary::default();
        for item in reader {
            match item {
                Ok(op) => self.record(&op, &mut summary),
                Err(e) if e.is_recoverable() => {
                    log::warn!("{}", e);
                    summary.failed += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        log::info!("Executed {} operations ({} failed)", summary.executed, summary.failed);
        Ok(summary)
    }
}
