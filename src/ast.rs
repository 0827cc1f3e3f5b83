use std::fmt;

/// - Learn more: <https://llvm.org/docs/tutorial/MyFirstLanguageFrontend/LangImpl02.html#the-abstract-syntax-tree-ast>
#[derive(Debug, PartialEq, Clone)]
pub enum ExprAst {
    Number(f64),
    Variable(String),
    Binary {
        op: char,
        lhs: Box<ExprAst>,
        rhs: Box<ExprAst>,
    },
    Call {
        callee: String,
        args: Vec<ExprAst>,
    },
}

impl ExprAst {
    pub fn binary(op: char, lhs: ExprAst, rhs: ExprAst) -> Self {
        ExprAst::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

/// A function signature: its name and parameter names.
/// - Parameter names are not checked for uniqueness.
#[derive(Debug, PartialEq, Clone)]
pub struct PrototypeAst {
    pub name: String,
    pub params: Vec<String>,
}

impl PrototypeAst {
    /// The prototype of the function wrapping a top-level expression.
    pub fn anonymous() -> Self {
        Self {
            name: String::new(),
            params: Vec::new(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

/// - Learn more: <https://llvm.org/docs/tutorial/MyFirstLanguageFrontend/LangImpl02.html#the-abstract-syntax-tree-ast>
#[derive(Debug, PartialEq, Clone)]
pub struct FunctionAst {
    pub prototype: PrototypeAst,
    pub body: ExprAst,
}

/// One top-level unit.
#[derive(Debug, PartialEq, Clone)]
pub enum AnyAst {
    /// `extern` declaration.
    Prototype(PrototypeAst),
    /// `def` definition or an anonymous top-level expression.
    Function(FunctionAst),
}

impl AnyAst {
    pub fn is_top_level_expr(&self) -> bool {
        matches!(self, AnyAst::Function(function) if function.prototype.is_anonymous())
    }
}

// S-expression rendering: `(+ 1 (* x 2))`, `(call foo 1 2)`.

impl fmt::Display for ExprAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprAst::Number(n) => write!(f, "{}", n),
            ExprAst::Variable(name) => write!(f, "{}", name),
            ExprAst::Binary { op, lhs, rhs } => write!(f, "({} {} {})", op, lhs, rhs),
            ExprAst::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for PrototypeAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(" "))
    }
}

impl fmt::Display for FunctionAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(def {} {})", self.prototype, self.body)
    }
}

impl fmt::Display for AnyAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyAst::Prototype(prototype) => write!(f, "(extern {})", prototype),
            AnyAst::Function(function) => write!(f, "{}", function),
        }
    }
}
