pub mod scope;
pub mod value;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{BinOp, Expr, Feature, Method, Program};
use crate::span::Spanned;
use crate::typeck::SELF;
use crate::typeck::env::Context;
use crate::types::Ty;
use scope::RuntimeEnv;
use value::{Instance, Value};

/// Tree-walking evaluator over a program that already passed type checking.
///
/// Evaluation never re-validates types: an ill-typed value showing up here
/// means the checker accepted an unsound tree, which is a bug in the checker,
/// so those paths panic instead of returning a recoverable error.
pub struct Interpreter<'p> {
    ctx: &'p Context,
    classes: HashMap<&'p str, ClassDef<'p>>,
}

/// Per-class dispatch and construction tables derived from the AST.
struct ClassDef<'p> {
    methods: HashMap<&'p str, &'p Method>,
    attributes: Vec<(&'p str, &'p Ty)>,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program, ctx: &'p Context) -> Self {
        let mut classes = HashMap::new();
        for class in &program.classes {
            let mut def = ClassDef { methods: HashMap::new(), attributes: Vec::new() };
            for feature in &class.node.features {
                match &feature.node {
                    Feature::Attribute { name, declared_ty, .. } => {
                        def.attributes.push((name.node.as_str(), &declared_ty.node));
                    }
                    Feature::Method(m) => {
                        def.methods.insert(m.name.node.as_str(), m);
                    }
                }
            }
            classes.insert(class.node.name.node.as_str(), def);
        }
        Self { ctx, classes }
    }

    pub fn eval(&self, expr: &Spanned<Expr>, env: &mut RuntimeEnv) -> Value {
        match &expr.node {
            Expr::IntLit(n) => Value::Int(*n),
            Expr::BoolLit(b) => Value::Bool(*b),
            Expr::StrLit(s) => Value::Str(s.clone()),

            Expr::Ident(name) => {
                if name == SELF {
                    env.receiver().clone()
                } else {
                    env.get(name).unwrap_or_else(|| {
                        unreachable!("unbound identifier '{name}' survived type checking")
                    })
                }
            }

            Expr::Assign { name, value } => {
                let v = self.eval(value, env);
                if !env.set(&name.node, v.clone()) {
                    unreachable!("assignment to unbound '{}' survived type checking", name.node);
                }
                v
            }

            Expr::BinOp { op, lhs, rhs } => {
                let left = self.eval(lhs, env);
                let right = self.eval(rhs, env);
                match op {
                    BinOp::Add => Value::Int(int(left) + int(right)),
                    BinOp::Sub => Value::Int(int(left) - int(right)),
                    BinOp::Mul => Value::Int(int(left) * int(right)),
                    BinOp::Div => Value::Int(floor_div(int(left), int(right))),
                    BinOp::Lt => Value::Bool(int(left) < int(right)),
                    BinOp::Le => Value::Bool(int(left) <= int(right)),
                    BinOp::Eq => Value::Bool(left == right),
                }
            }

            // arithmetic negation is the bitwise complement
            Expr::Neg(operand) => Value::Int(!int(self.eval(operand, env))),
            Expr::Not(operand) => Value::Bool(!truth(self.eval(operand, env))),
            Expr::IsVoid(operand) => Value::Bool(self.eval(operand, env).is_void()),
            Expr::Paren(inner) => self.eval(inner, env),

            Expr::If { condition, then_branch, else_branch } => {
                if truth(self.eval(condition, env)) {
                    self.eval(then_branch, env)
                } else {
                    self.eval(else_branch, env)
                }
            }

            Expr::While { condition, body } => {
                while truth(self.eval(condition, env)) {
                    self.eval(body, env);
                }
                Value::Void
            }

            Expr::Block(exprs) => {
                let mut last = Value::Void;
                for e in exprs {
                    last = self.eval(e, env);
                }
                last
            }

            Expr::Let { bindings, body } => {
                // initializers run in the outer scope, all bindings land in
                // one child scope together
                let mut bound = Vec::with_capacity(bindings.len());
                for b in bindings {
                    let v = match &b.init {
                        Some(init) => self.eval(init, env),
                        None => Value::zero_of(&b.declared_ty.node),
                    };
                    bound.push((b.name.node.as_str(), v));
                }
                env.push_scope();
                for (name, v) in bound {
                    env.bind(name, v);
                }
                let result = self.eval(body, env);
                env.pop_scope();
                result
            }

            Expr::Case { scrutinee, arms } => {
                let value = self.eval(scrutinee, env);
                let runtime_ty = value.runtime_class();
                let receiver_class = env.receiver().runtime_class();
                // most specific matching branch wins; exact match therefore
                // always beats an ancestor
                let mut best: Option<(usize, Ty)> = None;
                for (i, arm) in arms.iter().enumerate() {
                    let bound = arm.declared_ty.node.resolve_self(&receiver_class);
                    if !self.ctx.hierarchy.is_subtype(&runtime_ty, &bound).unwrap_or(false) {
                        continue;
                    }
                    let more_specific = match &best {
                        Some((_, current)) => {
                            self.ctx.hierarchy.is_subtype(&bound, current).unwrap_or(false)
                        }
                        None => true,
                    };
                    if more_specific {
                        best = Some((i, bound));
                    }
                }
                let Some((i, _)) = best else {
                    panic!("no case branch matches runtime type {runtime_ty}");
                };
                let arm = &arms[i];
                env.push_scope();
                env.bind(&arm.binding.node, value);
                let result = self.eval(&arm.body, env);
                env.pop_scope();
                result
            }

            Expr::New(ty) => {
                // new SELF_TYPE builds an instance of the receiver's dynamic class
                let target = ty.node.resolve_self(&env.receiver().runtime_class());
                self.instantiate(&target)
            }

            Expr::Call { receiver, static_ty, method, args } => {
                let recv = match receiver {
                    Some(r) => self.eval(r, env),
                    None => env.receiver().clone(),
                };
                let arg_values: Vec<Value> = args.iter().map(|a| self.eval(a, env)).collect();
                // dynamic dispatch on the runtime class unless a qualifier
                // pins resolution to a named ancestor
                let dispatch_ty = match static_ty {
                    Some(st) => st.node.resolve_self(&recv.runtime_class()),
                    None => recv.runtime_class(),
                };
                self.dispatch(recv, &dispatch_ty, &method.node, arg_values)
            }
        }
    }

    /// Resolve `method` starting at `class` and walking ancestor edges, then
    /// run its body in a fresh scope with parameters bound and `receiver`
    /// as self.
    pub fn dispatch(&self, receiver: Value, class: &Ty, method: &str, args: Vec<Value>) -> Value {
        let m = self.resolve_method(class, method).unwrap_or_else(|| {
            unreachable!("method '{method}' unresolvable on {class} after type checking")
        });
        let mut env = RuntimeEnv::new(receiver);
        for (param, value) in m.params.iter().zip(args) {
            env.bind(&param.name.node, value);
        }
        self.eval(&m.body, &mut env)
    }

    fn resolve_method(&self, class: &Ty, method: &str) -> Option<&'p Method> {
        let mut cur = class.clone();
        loop {
            if let Some(def) = self.classes.get(cur.name()) {
                if let Some(m) = def.methods.get(method) {
                    return Some(m);
                }
            }
            if cur == Ty::Object {
                return None;
            }
            cur = self.ctx.hierarchy.parent(&cur)?.clone();
        }
    }

    /// Construct a fresh instance. Built-ins yield their zero value; class
    /// instances start every field (own and inherited) at its declared
    /// type's zero value. Initializer execution is the host's concern.
    fn instantiate(&self, ty: &Ty) -> Value {
        match ty {
            Ty::Int => Value::Int(0),
            Ty::Bool => Value::Bool(false),
            Ty::Str => Value::Str(String::new()),
            _ => {
                let mut chain = Vec::new();
                let mut cur = ty.clone();
                loop {
                    chain.push(cur.clone());
                    if cur == Ty::Object {
                        break;
                    }
                    match self.ctx.hierarchy.parent(&cur) {
                        Some(parent) => cur = parent.clone(),
                        None => break,
                    }
                }
                // root-down so a subclass's re-declared field wins
                let mut fields = HashMap::new();
                for c in chain.iter().rev() {
                    if let Some(def) = self.classes.get(c.name()) {
                        for (name, attr_ty) in &def.attributes {
                            fields.insert((*name).to_string(), Value::zero_of(attr_ty));
                        }
                    }
                }
                Value::Object(Rc::new(RefCell::new(Instance {
                    class: ty.name().to_string(),
                    fields,
                })))
            }
        }
    }
}

fn int(value: Value) -> i64 {
    match value {
        Value::Int(n) => n,
        other => unreachable!("expected Int, found {other} after type checking"),
    }
}

fn truth(value: Value) -> bool {
    match value {
        Value::Bool(b) => b,
        other => unreachable!("expected Bool, found {other} after type checking"),
    }
}

/// Division truncates toward negative infinity, not toward zero.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
}
