/// A top-level Go declaration reduced to the parts that show up in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Function(FunctionDecl),
    Record(RecordDecl),
    Variable(VariableDecl),
}

/// Free function or method. Receivers are not parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    /// Result types that are plain identifiers; anything else is left out.
    pub results: Vec<String>,
}

/// Named struct type. Embedded fields carry no name and are not listed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDecl {
    pub name: String,
    pub fields: Vec<String>,
}

/// One `var` spec: the names declared together plus their type and values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableDecl {
    pub names: Vec<String>,
    pub type_text: Option<String>,
    pub values: Vec<String>,
}

impl Declaration {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Record(_) => "struct",
            Self::Variable(_) => "var",
        }
    }

    /// A variable group without names renders to nothing and is never reported.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Variable(var) if var.names.is_empty())
    }
}
