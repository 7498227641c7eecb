pub mod env;

use crate::ast::{BinOp, ClassDecl, Expr, Feature, Method, Program};
use crate::diagnostics::TypeError;
use crate::hierarchy::ClassHierarchy;
use crate::span::Spanned;
use crate::types::Ty;
use env::{ClassEnv, Context, MethodSig, TypeEnv};

/// Reserved receiver name.
pub(crate) const SELF: &str = "self";

/// Type-check a whole program.
///
/// Runs in passes over the class list: registration first, so classes may
/// reference classes declared after them, then a hierarchy sanity check,
/// then signatures, then bodies. The first error aborts the check.
pub fn check_program(program: &Program) -> Result<Context, TypeError> {
    let mut ctx = Context::new();

    // Pass 1: register every class and its inheritance edge
    for class in &program.classes {
        let c = &class.node;
        let ty = Ty::from_name(&c.name.node);
        if ty == Ty::SelfTy || ty.is_builtin() || ctx.classes.contains_key(&c.name.node) {
            return Err(TypeError::DuplicateDeclaration {
                name: c.name.node.clone(),
                span: c.name.span,
            });
        }
        let parent = c.parent_ty();
        if !ClassHierarchy::is_inheritable(&parent) {
            let span = c.parent.as_ref().map_or(c.name.span, |p| p.span);
            return Err(TypeError::InvalidInheritance { ty: parent, span });
        }
        ctx.classes.insert(c.name.node.clone(), ClassEnv::default());
        ctx.hierarchy.register(&ty, parent);
    }

    // Pass 1b: every parent chain must reach Object, cycle-free
    ctx.hierarchy.validate().map_err(|e| at_decl_of(program, e))?;

    // Pass 1c: register attribute and method signatures
    for class in &program.classes {
        let c = &class.node;
        for feature in &c.features {
            match &feature.node {
                Feature::Attribute { name, declared_ty, .. } => {
                    ctx.declare_attribute(
                        &c.name.node,
                        &name.node,
                        declared_ty.node.clone(),
                        name.span,
                    )?;
                }
                Feature::Method(m) => {
                    let sig = MethodSig {
                        params: m.params.iter().map(|p| p.ty.node.clone()).collect(),
                        return_ty: m.return_ty.node.clone(),
                    };
                    ctx.declare_method(&c.name.node, &m.name.node, sig, m.name.span)?;
                }
            }
        }
    }

    // Pass 2: check attribute initializers and method bodies
    for class in &program.classes {
        check_class(&class.node, &ctx)?;
    }

    Ok(ctx)
}

/// Re-point a spanless hierarchy error at the declaration that caused it.
fn at_decl_of(program: &Program, err: TypeError) -> TypeError {
    let name = match &err {
        TypeError::BrokenHierarchy { ty, .. } | TypeError::CyclicInheritance { ty, .. } => {
            ty.name().to_string()
        }
        _ => return err,
    };
    for class in &program.classes {
        if class.node.name.node == name {
            return err.with_span(class.node.name.span);
        }
        if let Some(parent) = &class.node.parent {
            if parent.node.name() == name {
                return err.with_span(parent.span);
            }
        }
    }
    err
}

fn check_class(class: &ClassDecl, ctx: &Context) -> Result<Ty, TypeError> {
    let self_ty = Ty::from_name(&class.name.node);
    for feature in &class.features {
        match &feature.node {
            Feature::Attribute { declared_ty, init, .. } => {
                if let Some(init) = init {
                    let mut env = TypeEnv::new(ctx, self_ty.clone());
                    let actual = check_expr(init, &mut env)?;
                    let expected = declared_ty.node.resolve_self(&self_ty);
                    if !ctx.hierarchy.is_subtype(&actual, &expected)? {
                        return Err(TypeError::TypeMismatch { expected, actual, span: init.span });
                    }
                }
            }
            Feature::Method(m) => check_method(m, &self_ty, ctx)?,
        }
    }
    Ok(self_ty)
}

fn check_method(method: &Method, self_ty: &Ty, ctx: &Context) -> Result<(), TypeError> {
    let mut env = TypeEnv::new(ctx, self_ty.clone());
    for p in &method.params {
        env.declare(&p.name.node, p.ty.node.resolve_self(self_ty), p.name.span)?;
    }
    let body_ty = check_expr(&method.body, &mut env)?;
    let expected = method.return_ty.node.resolve_self(self_ty);
    if !ctx.hierarchy.is_subtype(&body_ty, &expected)? {
        return Err(TypeError::TypeMismatch {
            expected,
            actual: body_ty,
            span: method.body.span,
        });
    }
    Ok(())
}

/// Infer the static type of one expression.
pub fn check_expr(expr: &Spanned<Expr>, env: &mut TypeEnv) -> Result<Ty, TypeError> {
    let span = expr.span;
    match &expr.node {
        Expr::IntLit(_) => Ok(Ty::Int),
        Expr::BoolLit(_) => Ok(Ty::Bool),
        Expr::StrLit(_) => Ok(Ty::Str),

        Expr::Ident(name) => {
            if name == SELF {
                Ok(env.class().clone())
            } else {
                env.lookup(name, span)
            }
        }

        Expr::Assign { name, value } => {
            let declared = env.lookup(&name.node, name.span)?;
            let actual = check_expr(value, env)?;
            if env.ctx.hierarchy.is_subtype(&actual, &declared)? {
                // assignment is type-transparent: it yields the value's type
                Ok(actual)
            } else {
                Err(TypeError::TypeMismatch { expected: declared, actual, span: value.span })
            }
        }

        Expr::BinOp { op, lhs, rhs } => {
            let left = check_expr(lhs, env)?;
            let right = check_expr(rhs, env)?;
            match op {
                BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                    expect_int(&left, lhs.span)?;
                    expect_int(&right, rhs.span)?;
                    Ok(Ty::Int)
                }
                BinOp::Lt | BinOp::Le => {
                    expect_int(&left, lhs.span)?;
                    expect_int(&right, rhs.span)?;
                    Ok(Ty::Bool)
                }
                BinOp::Eq => {
                    // equality demands identical types, not mere subtyping
                    if left == right {
                        Ok(Ty::Bool)
                    } else {
                        Err(TypeError::TypeMismatch {
                            expected: left,
                            actual: right,
                            span: rhs.span,
                        })
                    }
                }
            }
        }

        Expr::Neg(operand) => {
            let ty = check_expr(operand, env)?;
            expect_int(&ty, operand.span)?;
            Ok(Ty::Int)
        }

        Expr::Not(operand) => {
            let ty = check_expr(operand, env)?;
            if ty != Ty::Bool {
                return Err(TypeError::TypeMismatch {
                    expected: Ty::Bool,
                    actual: ty,
                    span: operand.span,
                });
            }
            Ok(Ty::Bool)
        }

        Expr::IsVoid(operand) => {
            check_expr(operand, env)?;
            Ok(Ty::Bool)
        }

        Expr::Paren(inner) => check_expr(inner, env),

        Expr::If { condition, then_branch, else_branch } => {
            let cond = check_expr(condition, env)?;
            if cond != Ty::Bool {
                return Err(TypeError::ConditionNotBool { actual: cond, span: condition.span });
            }
            let then_ty = check_expr(then_branch, env)?;
            let else_ty = check_expr(else_branch, env)?;
            env.ctx.hierarchy.join(&[then_ty, else_ty])
        }

        Expr::While { condition, body } => {
            let cond = check_expr(condition, env)?;
            if cond != Ty::Bool {
                return Err(TypeError::ConditionNotBool { actual: cond, span: condition.span });
            }
            // the body is validated but a loop never yields a useful value
            check_expr(body, env)?;
            Ok(Ty::Object)
        }

        Expr::Block(exprs) => {
            let mut last = Ty::Object;
            for e in exprs {
                last = check_expr(e, env)?;
            }
            Ok(last)
        }

        Expr::Let { bindings, body } => {
            // Initializers see only the outer environment: earlier siblings
            // in the same group are not visible to later initializers.
            let self_ty = env.class().clone();
            let mut resolved = Vec::with_capacity(bindings.len());
            for b in bindings {
                let declared = b.declared_ty.node.resolve_self(&self_ty);
                if let Some(init) = &b.init {
                    let actual = check_expr(init, env)?;
                    if !env.ctx.hierarchy.is_subtype(&actual, &declared)? {
                        return Err(TypeError::TypeMismatch {
                            expected: declared,
                            actual,
                            span: init.span,
                        });
                    }
                }
                resolved.push((b, declared));
            }
            env.push_scope();
            for (b, declared) in resolved {
                env.declare(&b.name.node, declared, b.name.span)?;
            }
            let body_ty = check_expr(body, env)?;
            env.pop_scope();
            Ok(body_ty)
        }

        Expr::Case { scrutinee, arms } => {
            check_expr(scrutinee, env)?;
            let self_ty = env.class().clone();
            let mut seen: Vec<Ty> = Vec::new();
            let mut arm_tys = Vec::with_capacity(arms.len());
            for arm in arms {
                let bound = arm.declared_ty.node.resolve_self(&self_ty);
                if seen.contains(&bound) {
                    return Err(TypeError::DuplicateCaseType {
                        ty: bound,
                        span: arm.declared_ty.span,
                    });
                }
                seen.push(bound.clone());
                env.push_scope();
                env.declare(&arm.binding.node, bound, arm.binding.span)?;
                arm_tys.push(check_expr(&arm.body, env)?);
                env.pop_scope();
            }
            env.ctx.hierarchy.join(&arm_tys)
        }

        Expr::New(ty) => Ok(ty.node.resolve_self(env.class())),

        Expr::Call { receiver, static_ty, method, args } => {
            let recv_ty = match receiver {
                Some(r) => check_expr(r, env)?,
                None => env.class().clone(),
            };
            // a static-dispatch qualifier pins signature lookup to an ancestor
            let lookup_ty = match static_ty {
                Some(st) => {
                    let pinned = st.node.resolve_self(env.class());
                    if !env.ctx.hierarchy.is_subtype(&recv_ty, &pinned)? {
                        return Err(TypeError::TypeMismatch {
                            expected: pinned,
                            actual: recv_ty,
                            span: st.span,
                        });
                    }
                    pinned
                }
                None => recv_ty.clone(),
            };
            let sig = env
                .ctx
                .method_sig(&lookup_ty, &method.node)
                .ok_or_else(|| TypeError::UnboundMethod {
                    name: method.node.clone(),
                    span: method.span,
                })?
                .clone();
            if args.len() != sig.params.len() {
                return Err(TypeError::ArityMismatch {
                    expected: sig.params.len(),
                    found: args.len(),
                    span,
                });
            }
            for (arg, param_ty) in args.iter().zip(&sig.params) {
                let actual = check_expr(arg, env)?;
                let expected = param_ty.resolve_self(&recv_ty);
                if !env.ctx.hierarchy.is_subtype(&actual, &expected)? {
                    return Err(TypeError::TypeMismatch { expected, actual, span: arg.span });
                }
            }
            // a SELF_TYPE return propagates the receiver's actual static type
            Ok(sig.return_ty.resolve_self(&recv_ty))
        }
    }
}

fn expect_int(ty: &Ty, span: crate::span::Span) -> Result<(), TypeError> {
    if *ty == Ty::Int {
        Ok(())
    } else {
        Err(TypeError::TypeMismatch { expected: Ty::Int, actual: ty.clone(), span })
    }
}
