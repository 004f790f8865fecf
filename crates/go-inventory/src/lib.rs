//! Inventory of top-level Go declarations.
//!
//! A run walks a directory tree for `.go` files, parses each one with
//! tree-sitter, and reports every top-level function, struct type and `var`
//! spec as a single line `PATH: SIGNATURE`, once per file.

pub mod config;
pub mod decl;
pub mod render;
pub mod report;
pub mod scan;
pub mod syntax;
pub mod walker;

pub use config::{ConfigError, LogFormat, LogLevel, Overrides, Settings};
pub use decl::{Declaration, Declarations, FunctionDecl, RecordDecl, VariableDecl, extract_declarations};
pub use render::{Signature, render};
pub use report::{Diagnostics, FileReport, Report, ReportStats};
pub use scan::{ScanError, Scanner, scan_source};
pub use syntax::{ParseError, SyntaxTree};
pub use walker::SourceWalker;
