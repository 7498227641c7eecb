use crate::span::Spanned;
use crate::types::Ty;

#[derive(Debug, Clone)]
pub struct Program {
    pub classes: Vec<Spanned<ClassDecl>>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Spanned<String>,
    /// Declared parent; absent means the class inherits `Object` directly.
    pub parent: Option<Spanned<Ty>>,
    pub features: Vec<Spanned<Feature>>,
}

impl ClassDecl {
    pub fn parent_ty(&self) -> Ty {
        self.parent.as_ref().map_or(Ty::Object, |p| p.node.clone())
    }
}

#[derive(Debug, Clone)]
pub enum Feature {
    Attribute {
        name: Spanned<String>,
        declared_ty: Spanned<Ty>,
        init: Option<Spanned<Expr>>,
    },
    Method(Method),
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub return_ty: Spanned<Ty>,
    pub body: Spanned<Expr>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: Spanned<Ty>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    IntLit(i64),
    BoolLit(bool),
    StrLit(String),
    Ident(String),
    Assign {
        name: Spanned<String>,
        value: Box<Spanned<Expr>>,
    },
    Call {
        /// Explicit receiver; absent means the current `self`.
        receiver: Option<Box<Spanned<Expr>>>,
        /// Static-dispatch qualifier: pins method resolution to this ancestor.
        static_ty: Option<Spanned<Ty>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    If {
        condition: Box<Spanned<Expr>>,
        then_branch: Box<Spanned<Expr>>,
        else_branch: Box<Spanned<Expr>>,
    },
    While {
        condition: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },
    Block(Vec<Spanned<Expr>>),
    Let {
        bindings: Vec<LetBinding>,
        body: Box<Spanned<Expr>>,
    },
    Case {
        scrutinee: Box<Spanned<Expr>>,
        arms: Vec<CaseArm>,
    },
    New(Spanned<Ty>),
    IsVoid(Box<Spanned<Expr>>),
    Neg(Box<Spanned<Expr>>),
    Not(Box<Spanned<Expr>>),
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Paren(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone)]
pub struct LetBinding {
    pub name: Spanned<String>,
    pub declared_ty: Spanned<Ty>,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone)]
pub struct CaseArm {
    pub binding: Spanned<String>,
    pub declared_ty: Spanned<Ty>,
    pub body: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Eq,
}
