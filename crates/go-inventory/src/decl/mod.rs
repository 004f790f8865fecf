mod extractor;
mod types;

pub use extractor::{Declarations, extract_declarations};
pub use types::{Declaration, FunctionDecl, RecordDecl, VariableDecl};
