use std::collections::HashMap;

use crate::diagnostics::TypeError;
use crate::hierarchy::ClassHierarchy;
use crate::span::Span;
use crate::types::Ty;

#[derive(Debug, Clone)]
pub struct MethodSig {
    pub params: Vec<Ty>,
    pub return_ty: Ty,
}

/// Declared attribute and method signatures of one class, cached for the
/// lifetime of the compilation.
#[derive(Debug, Default)]
pub struct ClassEnv {
    pub attributes: HashMap<String, Ty>,
    pub methods: HashMap<String, MethodSig>,
}

/// The owned compilation context: inheritance edges plus the per-class
/// signature tables. Passed by reference into every check call so separate
/// compilations never share state.
#[derive(Debug)]
pub struct Context {
    pub hierarchy: ClassHierarchy,
    pub classes: HashMap<String, ClassEnv>,
}

impl Context {
    pub fn new() -> Self {
        Self { hierarchy: ClassHierarchy::new(), classes: HashMap::new() }
    }

    /// Register an attribute on `class`. Re-declaring a name already present
    /// on the same class is an error; shadowing an ancestor's is not.
    pub fn declare_attribute(
        &mut self,
        class: &str,
        name: &str,
        ty: Ty,
        span: Span,
    ) -> Result<(), TypeError> {
        let env = self.classes.entry(class.to_string()).or_default();
        if env.attributes.contains_key(name) {
            return Err(TypeError::DuplicateDeclaration { name: name.to_string(), span });
        }
        env.attributes.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn declare_method(
        &mut self,
        class: &str,
        name: &str,
        sig: MethodSig,
        span: Span,
    ) -> Result<(), TypeError> {
        let env = self.classes.entry(class.to_string()).or_default();
        if env.methods.contains_key(name) {
            return Err(TypeError::DuplicateDeclaration { name: name.to_string(), span });
        }
        env.methods.insert(name.to_string(), sig);
        Ok(())
    }

    /// Resolve an attribute through the ancestor chain, most-derived first.
    pub fn attribute_ty(&self, class: &Ty, name: &str) -> Option<Ty> {
        let mut cur = class.clone();
        loop {
            if let Some(env) = self.classes.get(cur.name()) {
                if let Some(ty) = env.attributes.get(name) {
                    return Some(ty.clone());
                }
            }
            if cur == Ty::Object {
                return None;
            }
            cur = self.hierarchy.parent(&cur)?.clone();
        }
    }

    /// Resolve a method signature through the ancestor chain.
    pub fn method_sig(&self, class: &Ty, name: &str) -> Option<&MethodSig> {
        let mut cur = class.clone();
        loop {
            if let Some(env) = self.classes.get(cur.name()) {
                if let Some(sig) = env.methods.get(name) {
                    return Some(sig);
                }
            }
            if cur == Ty::Object {
                return None;
            }
            cur = self.hierarchy.parent(&cur)?.clone();
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Lexical environment for checking one feature body: the current class tag
/// plus a stack of scopes, innermost last. Shadowing across scopes is legal;
/// re-declaring within one scope is not. Identifier lookup falls through the
/// scope stack into the class's attribute chain.
#[derive(Debug)]
pub struct TypeEnv<'c> {
    pub ctx: &'c Context,
    class: Ty,
    scopes: Vec<HashMap<String, Ty>>,
}

impl<'c> TypeEnv<'c> {
    pub fn new(ctx: &'c Context, class: Ty) -> Self {
        Self { ctx, class, scopes: vec![HashMap::new()] }
    }

    /// The "current class" tag: the type `self` has in this environment.
    pub fn class(&self) -> &Ty {
        &self.class
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn declare(&mut self, name: &str, ty: Ty, span: Span) -> Result<(), TypeError> {
        let scope = self.scopes.last_mut().unwrap();
        if scope.contains_key(name) {
            return Err(TypeError::DuplicateDeclaration { name: name.to_string(), span });
        }
        scope.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn lookup(&self, name: &str, span: Span) -> Result<Ty, TypeError> {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.get(name) {
                return Ok(ty.clone().resolve_self(&self.class));
            }
        }
        self.ctx
            .attribute_ty(&self.class, name)
            .map(|ty| ty.resolve_self(&self.class))
            .ok_or_else(|| TypeError::UnboundIdentifier { name: name.to_string(), span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> Ty {
        Ty::Class(name.to_string())
    }

    #[test]
    fn redeclaration_in_same_scope_is_rejected() {
        let ctx = Context::new();
        let mut env = TypeEnv::new(&ctx, class("A"));
        env.declare("x", Ty::Int, Span::dummy()).unwrap();
        let err = env.declare("x", Ty::Str, Span::dummy()).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateDeclaration { name, .. } if name == "x"));
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        let ctx = Context::new();
        let mut env = TypeEnv::new(&ctx, class("A"));
        env.declare("x", Ty::Int, Span::dummy()).unwrap();
        env.push_scope();
        env.declare("x", Ty::Str, Span::dummy()).unwrap();
        assert_eq!(env.lookup("x", Span::dummy()), Ok(Ty::Str));
        env.pop_scope();
        assert_eq!(env.lookup("x", Span::dummy()), Ok(Ty::Int));
    }

    #[test]
    fn lookup_falls_through_to_inherited_attributes() {
        let mut ctx = Context::new();
        ctx.hierarchy.register(&class("A"), Ty::Object);
        ctx.hierarchy.register(&class("B"), class("A"));
        ctx.declare_attribute("A", "n", Ty::Int, Span::dummy()).unwrap();
        let env = TypeEnv::new(&ctx, class("B"));
        assert_eq!(env.lookup("n", Span::dummy()), Ok(Ty::Int));
    }

    #[test]
    fn subclass_attribute_shadows_ancestor() {
        let mut ctx = Context::new();
        ctx.hierarchy.register(&class("A"), Ty::Object);
        ctx.hierarchy.register(&class("B"), class("A"));
        ctx.declare_attribute("A", "n", Ty::Int, Span::dummy()).unwrap();
        ctx.declare_attribute("B", "n", Ty::Str, Span::dummy()).unwrap();
        assert_eq!(ctx.attribute_ty(&class("B"), "n"), Some(Ty::Str));
        assert_eq!(ctx.attribute_ty(&class("A"), "n"), Some(Ty::Int));
    }

    #[test]
    fn unknown_identifier_is_unbound() {
        let ctx = Context::new();
        let env = TypeEnv::new(&ctx, class("A"));
        let err = env.lookup("missing", Span::dummy()).unwrap_err();
        assert!(matches!(err, TypeError::UnboundIdentifier { name, .. } if name == "missing"));
    }

    #[test]
    fn self_typed_attribute_resolves_to_current_class() {
        let mut ctx = Context::new();
        ctx.hierarchy.register(&class("A"), Ty::Object);
        ctx.declare_attribute("A", "twin", Ty::SelfTy, Span::dummy()).unwrap();
        let env = TypeEnv::new(&ctx, class("A"));
        assert_eq!(env.lookup("twin", Span::dummy()), Ok(class("A")));
    }
}
