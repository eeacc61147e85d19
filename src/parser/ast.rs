use crate::span::Spanned;

#[derive(Debug, Clone)]
pub struct Program {
    pub main_class: Spanned<MainClass>,
    pub classes: Vec<Spanned<ClassDecl>>,
}

#[derive(Debug, Clone)]
pub struct MainClass {
    pub name: Spanned<String>,
    /// Name of the `String[]` parameter of `main`.
    pub args_name: Spanned<String>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Spanned<String>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<Spanned<Method>>,
}

/// Field, parameter or local declaration: `Type name`.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Spanned<String>,
    pub ty: Spanned<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: Spanned<String>,
    pub params: Vec<VarDecl>,
    pub return_type: Spanned<TypeExpr>,
    pub body: Spanned<Block>,
    pub return_expr: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Int,
    Boolean,
    IntArray,
    Named(String),
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Int => write!(f, "int"),
            TypeExpr::Boolean => write!(f, "boolean"),
            TypeExpr::IntArray => write!(f, "int[]"),
            TypeExpr::Named(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// Local declaration; visible from the next statement onward.
    VarDecl(VarDecl),
    Block(Block),
    If {
        condition: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    While {
        condition: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    Print(Spanned<Expr>),
    Assign {
        target: Spanned<String>,
        value: Spanned<Expr>,
    },
    IndexAssign {
        target: Spanned<String>,
        index: Spanned<Expr>,
        value: Spanned<Expr>,
    },
}

#[derive(Debug, Clone)]
pub enum Expr {
    IntLit(i64),
    BoolLit(bool),
    Ident(String),
    This,
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Not {
        operand: Box<Spanned<Expr>>,
    },
    Index {
        object: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Length {
        object: Box<Spanned<Expr>>,
    },
    MethodCall {
        object: Box<Spanned<Expr>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    NewArray {
        size: Box<Spanned<Expr>>,
    },
    NewObject {
        class: Spanned<String>,
    },
    Paren(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Eq => "==",
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
