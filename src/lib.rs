#![forbid(unsafe_code)]
//! Locale resource to ES module compiler core.
//!
//! Converts structured locale resource documents (JSON, YAML, or a
//! restricted JavaScript module exporting an object literal) into
//! executable module code, inlining a message-format compiler's output for
//! every string value and re-emitting source maps that trace generated
//! positions back through both compilation stages to the original resource
//! file.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use localegen::{GenerateOptions, Generator};
//!
//! let mut generator = Generator::new(&my_message_compiler)
//!     .with_error_sink(|diagnostic| eprintln!("{diagnostic}"));
//! let generated = generator.generate_json(
//!     r#"{"hello": "hi {name}"}"#,
//!     &GenerateOptions::new().with_source_map(true),
//! )?;
//! println!("{}", generated.code);
//! # Ok::<(), localegen::Error>(())
//! ```
//!
//! # Design
//!
//! - One generic walker over a shared document tree serves all three
//!   formats; format quirks live in the front ends under [`formats`].
//! - The message-template compiler is an external collaborator behind the
//!   [`message::MessageCompiler`] trait; compilation problems are streamed
//!   to the caller's error sink and never abort generation.
//! - Source maps compose through two stages (resource → generated
//!   expression, expression → compiled message) and optionally through an
//!   externally supplied input map.

pub mod ast;
pub mod codegen;
pub mod emitter;
pub mod error;
pub mod formats;
pub mod message;
pub mod options;
pub mod probe;
pub mod source_map;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    codegen::Generator,
    error::Error,
    formats::FormatType,
    message::{
        CompileMode, CompileRequest, CompiledMessage, CompilerError, MessageCompiler,
        MessageFunction,
    },
    options::GenerateOptions,
    probe::{
        PackageResolver, ResolvedPackage, RuntimeVariant, RuntimeVersion, check_bridge_package,
        check_runtime_package, runtime_version,
    },
    source_map::SourceMap,
    types::{Diagnostic, Environment, Generated, Location, TargetType},
};
