//! Rendering layer: SQL dialects, template rendering, and model compilation.

pub mod compiler;
pub mod dialect;
pub mod error;
pub mod renderer;

pub use compiler::{CompileOutput, CompiledModel, Compiler};
pub use dialect::{dialect_for, DialectParseError, DuckDbDialect, SnowflakeDialect, SqlDialect};
pub use error::{RenderError, RenderResult};
pub use renderer::Renderer;
