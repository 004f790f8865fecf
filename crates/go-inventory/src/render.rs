//! Canonical one-line rendering of declarations.
//!
//! The rendered [`Signature`] is both the report payload and the
//! deduplication key, so rendering must stay a pure function of the
//! declaration:
//!
//! - `function NAME(P1, P2) R1 R2` (results only when present)
//! - `struct NAME { F1, F2 }`, or `struct NAME {  }` without fields
//! - `var N1, N2 TYPE = V1, V2` (type and values only when written)
//!
//! Types and values use the compact token text of the source expression, see
//! [`crate::syntax::helpers::compact_text`].

use std::fmt::{Display, Formatter};

use crate::decl::{Declaration, FunctionDecl, RecordDecl, VariableDecl};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Signature {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn render(decl: &Declaration) -> Signature {
    let text = match decl {
        Declaration::Function(func) => render_function(func),
        Declaration::Record(record) => render_record(record),
        Declaration::Variable(var) => render_variable(var),
    };
    Signature(text)
}

fn render_function(func: &FunctionDecl) -> String {
    let mut out = format!("function {}({})", func.name, func.params.join(", "));
    if !func.results.is_empty() {
        out.push(' ');
        out.push_str(&func.results.join(" "));
    }
    out
}

fn render_record(record: &RecordDecl) -> String {
    format!("struct {} {{ {} }}", record.name, record.fields.join(", "))
}

fn render_variable(var: &VariableDecl) -> String {
    if var.names.is_empty() {
        return String::new();
    }

    let mut out = format!("var {}", var.names.join(", "));
    if let Some(ty) = var.type_text.as_deref().filter(|ty| !ty.is_empty()) {
        out.push(' ');
        out.push_str(ty);
    }
    if !var.values.is_empty() {
        out.push_str(" = ");
        out.push_str(&var.values.join(", "));
    }
    out
}

#[cfg(test)]
#[path = "../tests/src/render/render_tests.rs"]
mod tests;
