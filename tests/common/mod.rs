//! Builders for assembling ASTs in tests, since the parser lives upstream.
#![allow(dead_code)]

use ceres::ast::*;
use ceres::span::Spanned;
use ceres::types::Ty;

pub fn sp<T>(node: T) -> Spanned<T> {
    Spanned::dummy(node)
}

pub fn program(classes: Vec<Spanned<ClassDecl>>) -> Program {
    Program { classes }
}

pub fn class(name: &str, parent: Option<&str>, features: Vec<Spanned<Feature>>) -> Spanned<ClassDecl> {
    sp(ClassDecl {
        name: sp(name.to_string()),
        parent: parent.map(|p| sp(Ty::from_name(p))),
        features,
    })
}

pub fn attribute(name: &str, ty: Ty, init: Option<Spanned<Expr>>) -> Spanned<Feature> {
    sp(Feature::Attribute {
        name: sp(name.to_string()),
        declared_ty: sp(ty),
        init,
    })
}

pub fn method(
    name: &str,
    params: &[(&str, Ty)],
    return_ty: Ty,
    body: Spanned<Expr>,
) -> Spanned<Feature> {
    sp(Feature::Method(Method {
        name: sp(name.to_string()),
        params: params
            .iter()
            .map(|(n, t)| Param { name: sp((*n).to_string()), ty: sp(t.clone()) })
            .collect(),
        return_ty: sp(return_ty),
        body,
    }))
}

pub fn int(n: i64) -> Spanned<Expr> {
    sp(Expr::IntLit(n))
}

pub fn boolean(b: bool) -> Spanned<Expr> {
    sp(Expr::BoolLit(b))
}

pub fn string(s: &str) -> Spanned<Expr> {
    sp(Expr::StrLit(s.to_string()))
}

pub fn ident(name: &str) -> Spanned<Expr> {
    sp(Expr::Ident(name.to_string()))
}

pub fn assign(name: &str, value: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::Assign { name: sp(name.to_string()), value: Box::new(value) })
}

pub fn binop(op: BinOp, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
}

pub fn neg(operand: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::Neg(Box::new(operand)))
}

pub fn not(operand: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::Not(Box::new(operand)))
}

pub fn isvoid(operand: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::IsVoid(Box::new(operand)))
}

pub fn paren(inner: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::Paren(Box::new(inner)))
}

pub fn if_(
    condition: Spanned<Expr>,
    then_branch: Spanned<Expr>,
    else_branch: Spanned<Expr>,
) -> Spanned<Expr> {
    sp(Expr::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    })
}

pub fn while_(condition: Spanned<Expr>, body: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::While { condition: Box::new(condition), body: Box::new(body) })
}

pub fn block(exprs: Vec<Spanned<Expr>>) -> Spanned<Expr> {
    sp(Expr::Block(exprs))
}

pub fn binding(name: &str, ty: Ty, init: Option<Spanned<Expr>>) -> LetBinding {
    LetBinding { name: sp(name.to_string()), declared_ty: sp(ty), init }
}

pub fn let_(bindings: Vec<LetBinding>, body: Spanned<Expr>) -> Spanned<Expr> {
    sp(Expr::Let { bindings, body: Box::new(body) })
}

pub fn arm(name: &str, ty: Ty, body: Spanned<Expr>) -> CaseArm {
    CaseArm { binding: sp(name.to_string()), declared_ty: sp(ty), body }
}

pub fn case_(scrutinee: Spanned<Expr>, arms: Vec<CaseArm>) -> Spanned<Expr> {
    sp(Expr::Case { scrutinee: Box::new(scrutinee), arms })
}

pub fn new_(ty: Ty) -> Spanned<Expr> {
    sp(Expr::New(sp(ty)))
}

pub fn call(receiver: Option<Spanned<Expr>>, name: &str, args: Vec<Spanned<Expr>>) -> Spanned<Expr> {
    sp(Expr::Call {
        receiver: receiver.map(Box::new),
        static_ty: None,
        method: sp(name.to_string()),
        args,
    })
}

pub fn static_call(
    receiver: Spanned<Expr>,
    qualifier: Ty,
    name: &str,
    args: Vec<Spanned<Expr>>,
) -> Spanned<Expr> {
    sp(Expr::Call {
        receiver: Some(Box::new(receiver)),
        static_ty: Some(sp(qualifier)),
        method: sp(name.to_string()),
        args,
    })
}
