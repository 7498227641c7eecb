use serde::{Serialize, Deserialize};

/// The nominal types of the Ceres language.
///
/// `Object` is the universal root; `Int`, `Bool` and `Str` are final
/// built-ins; `Io` is a built-in that user classes may extend. `SelfTy` is
/// the placeholder type usable only inside a class's own declarations and
/// must be resolved to the enclosing class before any comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ty {
    Int,
    Bool,
    Str,
    Io,
    Object,
    SelfTy,
    Class(String),
}

impl Ty {
    /// Map a surface type name to its nominal type.
    pub fn from_name(name: &str) -> Ty {
        match name {
            "Int" => Ty::Int,
            "Bool" => Ty::Bool,
            "String" => Ty::Str,
            "IO" => Ty::Io,
            "Object" => Ty::Object,
            "SELF_TYPE" => Ty::SelfTy,
            _ => Ty::Class(name.to_string()),
        }
    }

    /// The nominal name, as used to key the inheritance table.
    pub fn name(&self) -> &str {
        match self {
            Ty::Int => "Int",
            Ty::Bool => "Bool",
            Ty::Str => "String",
            Ty::Io => "IO",
            Ty::Object => "Object",
            Ty::SelfTy => "SELF_TYPE",
            Ty::Class(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Ty::Int | Ty::Bool | Ty::Str | Ty::Io | Ty::Object)
    }

    /// Resolve the `SELF_TYPE` placeholder against the enclosing class.
    /// Idempotent; every declared type is passed through here before use.
    pub fn resolve_self(&self, enclosing: &Ty) -> Ty {
        if *self == Ty::SelfTy {
            enclosing.clone()
        } else {
            self.clone()
        }
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
