//! Binding validator: the scope stack behind redeclaration errors.
//!
//! Only names are tracked, never references; this is enough for the early
//! errors of the language (`let a; var a;`, `catch (e) { let e; }`, ...).
//! Private names get a separate stack because they resolve per class body.

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::atom::Atom;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScopeFlags: u8 {
        const TOP = 1;
        const FUNCTION = 1 << 1;
        const ARROW = 1 << 2;
        /// `catch (e)` with a plain identifier parameter
        const SIMPLE_CATCH = 1 << 3;
        const STATIC_BLOCK = 1 << 4;
    }
}

impl ScopeFlags {
    /// Scopes that stop the hoisting of `var`
    fn is_var_scope(self) -> bool {
        self.intersects(ScopeFlags::TOP | ScopeFlags::FUNCTION | ScopeFlags::STATIC_BLOCK)
    }
}

/// How a declaration binds its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    /// `var`, parameters, strict function declarations at function top
    Var,
    /// `let`, `const`, `class`, imports, strict block-level functions
    Lexical,
    /// Sloppy-mode function declaration
    Function,
    /// The identifier of `catch (e)`
    SimpleCatch,
}

#[derive(Debug, Default)]
struct Scope {
    flags: ScopeFlags,
    var: FxHashSet<Atom>,
    lexical: FxHashSet<Atom>,
    functions: FxHashSet<Atom>,
    catch_param: Option<Atom>,
}

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    module: bool,
}

impl ScopeStack {
    pub fn new(module: bool) -> Self {
        Self {
            scopes: Vec::new(),
            module,
        }
    }

    pub fn enter(&mut self, flags: ScopeFlags) {
        self.scopes.push(Scope {
            flags,
            ..Scope::default()
        });
    }

    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Function declarations directly in a function body, or at the top of a
    /// script, behave like `var`.
    fn treats_functions_as_var(&self, scope: &Scope) -> bool {
        scope.flags.contains(ScopeFlags::FUNCTION)
            || (!self.module && scope.flags.contains(ScopeFlags::TOP))
    }

    pub fn current_treats_functions_as_var(&self) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| self.treats_functions_as_var(scope))
    }

    /// Record a declaration. Returns `false` when it conflicts with an
    /// earlier one.
    pub fn declare(&mut self, name: &Atom, binding: BindingType) -> bool {
        match binding {
            BindingType::Lexical => {
                let Some(scope) = self.scopes.last_mut() else {
                    return true;
                };
                let redeclared = scope.lexical.contains(name)
                    || scope.functions.contains(name)
                    || scope.var.contains(name);
                scope.lexical.insert(name.clone());
                !redeclared
            }
            BindingType::SimpleCatch => {
                if let Some(scope) = self.scopes.last_mut() {
                    scope.lexical.insert(name.clone());
                    scope.catch_param = Some(name.clone());
                }
                true
            }
            BindingType::Function => {
                let as_var = self.current_treats_functions_as_var();
                let Some(scope) = self.scopes.last_mut() else {
                    return true;
                };
                let redeclared = if as_var {
                    scope.lexical.contains(name)
                } else {
                    scope.lexical.contains(name) || scope.var.contains(name)
                };
                scope.functions.insert(name.clone());
                !redeclared
            }
            BindingType::Var => self.declare_var(name),
        }
    }

    fn declare_var(&mut self, name: &Atom) -> bool {
        let module = self.module;
        for scope in self.scopes.iter_mut().rev() {
            let catch_exception = scope.flags.contains(ScopeFlags::SIMPLE_CATCH)
                && scope.catch_param.as_ref() == Some(name);
            let functions_as_var = scope.flags.contains(ScopeFlags::FUNCTION)
                || (!module && scope.flags.contains(ScopeFlags::TOP));
            if (scope.lexical.contains(name) && !catch_exception)
                || (!functions_as_var && scope.functions.contains(name))
            {
                return false;
            }
            scope.var.insert(name.clone());
            if scope.flags.is_var_scope() {
                break;
            }
        }
        true
    }

    /// Whether the outermost scope declares `name` in any way
    pub fn top_level_declares(&self, name: &str) -> bool {
        self.scopes.first().is_some_and(|scope| {
            scope.var.contains(name) || scope.lexical.contains(name) || scope.functions.contains(name)
        })
    }
}

/// What a private name in a class body refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateKind {
    Field,
    Method,
    Getter,
    Setter,
    /// A getter and a setter with the same name
    Accessor,
}

#[derive(Debug, Default)]
struct PrivateScope {
    declared: FxHashMap<Atom, (PrivateKind, bool)>,
    /// Names referenced before the end of the class body
    used: Vec<(Atom, usize)>,
}

/// Stack of class bodies for private-name resolution. A `#x` may be used
/// before its declaration, so references are checked when a class closes.
#[derive(Debug, Default)]
pub struct PrivateNames {
    scopes: Vec<PrivateScope>,
}

impl PrivateNames {
    pub fn enter(&mut self) {
        self.scopes.push(PrivateScope::default());
    }

    /// Declare `#name`. Returns `false` for an invalid duplicate; only a
    /// getter/setter pair with the same placement may share a name.
    pub fn declare(&mut self, name: &Atom, kind: PrivateKind, is_static: bool) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        match scope.declared.get(name).copied() {
            None => {
                scope.declared.insert(name.clone(), (kind, is_static));
                true
            }
            Some((existing, existing_static)) => {
                let pair = matches!(
                    (existing, kind),
                    (PrivateKind::Getter, PrivateKind::Setter)
                        | (PrivateKind::Setter, PrivateKind::Getter)
                );
                if pair && existing_static == is_static {
                    scope
                        .declared
                        .insert(name.clone(), (PrivateKind::Accessor, is_static));
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a `#name` reference. Returns `false` outside any class.
    pub fn use_name(&mut self, name: &Atom, offset: usize) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.used.push((name.clone(), offset));
                true
            }
            None => false,
        }
    }

    /// Close the innermost class body. References it does not declare move
    /// to the enclosing class; at the outermost class the first one is
    /// returned as unresolved.
    pub fn exit(&mut self) -> Option<(Atom, usize)> {
        let scope = self.scopes.pop()?;
        let unresolved = scope
            .used
            .into_iter()
            .filter(|(name, _)| !scope.declared.contains_key(name));
        match self.scopes.last_mut() {
            Some(parent) => {
                parent.used.extend(unresolved);
                None
            }
            None => unresolved.min_by_key(|(_, offset)| *offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> Atom {
        Atom::from(s)
    }

    fn script() -> ScopeStack {
        let mut scopes = ScopeStack::new(false);
        scopes.enter(ScopeFlags::TOP);
        scopes
    }

    #[test]
    fn lexical_conflicts() {
        let mut scopes = script();
        assert!(scopes.declare(&atom("a"), BindingType::Lexical));
        assert!(!scopes.declare(&atom("a"), BindingType::Lexical));
        assert!(!scopes.declare(&atom("a"), BindingType::Var));
    }

    #[test]
    fn var_redeclaration_is_fine() {
        let mut scopes = script();
        assert!(scopes.declare(&atom("a"), BindingType::Var));
        assert!(scopes.declare(&atom("a"), BindingType::Var));
        assert!(!scopes.declare(&atom("a"), BindingType::Lexical));
    }

    #[test]
    fn var_hoists_through_blocks() {
        let mut scopes = script();
        scopes.declare(&atom("x"), BindingType::Lexical);
        scopes.enter(ScopeFlags::empty());
        assert!(!scopes.declare(&atom("x"), BindingType::Var));
        scopes.exit();

        let mut scopes = script();
        scopes.enter(ScopeFlags::empty());
        assert!(scopes.declare(&atom("y"), BindingType::Var));
        scopes.exit();
        assert!(!scopes.declare(&atom("y"), BindingType::Lexical));
        assert!(scopes.top_level_declares("y"));
    }

    #[test]
    fn var_stops_at_function_scope() {
        let mut scopes = script();
        scopes.declare(&atom("x"), BindingType::Lexical);
        scopes.enter(ScopeFlags::FUNCTION);
        assert!(scopes.declare(&atom("x"), BindingType::Var));
    }

    #[test]
    fn simple_catch_parameter_allows_var() {
        let mut scopes = script();
        scopes.enter(ScopeFlags::SIMPLE_CATCH);
        scopes.declare(&atom("e"), BindingType::SimpleCatch);
        assert!(scopes.declare(&atom("e"), BindingType::Var));
        assert!(!scopes.declare(&atom("e"), BindingType::Lexical));
    }

    #[test]
    fn sloppy_block_functions_may_repeat() {
        let mut scopes = script();
        scopes.enter(ScopeFlags::empty());
        assert!(scopes.declare(&atom("f"), BindingType::Function));
        assert!(scopes.declare(&atom("f"), BindingType::Function));
        assert!(!scopes.declare(&atom("f"), BindingType::Lexical));
        assert!(!scopes.declare(&atom("f"), BindingType::Var));
    }

    #[test]
    fn module_top_level_functions_are_lexical() {
        let mut scopes = ScopeStack::new(true);
        scopes.enter(ScopeFlags::TOP);
        assert!(!scopes.current_treats_functions_as_var());
        assert!(scopes.declare(&atom("f"), BindingType::Function));
        assert!(!scopes.declare(&atom("f"), BindingType::Var));
    }

    #[test]
    fn private_accessor_pairs() {
        let mut names = PrivateNames::default();
        names.enter();
        assert!(names.declare(&atom("x"), PrivateKind::Getter, false));
        assert!(names.declare(&atom("x"), PrivateKind::Setter, false));
        assert!(!names.declare(&atom("x"), PrivateKind::Field, false));
        assert!(names.declare(&atom("y"), PrivateKind::Getter, true));
        assert!(!names.declare(&atom("y"), PrivateKind::Setter, false));
    }

    #[test]
    fn private_references_resolve_outward() {
        let mut names = PrivateNames::default();
        assert!(!names.use_name(&atom("x"), 0));
        names.enter();
        names.declare(&atom("x"), PrivateKind::Field, false);
        names.enter();
        names.use_name(&atom("x"), 10);
        names.use_name(&atom("y"), 20);
        assert_eq!(names.exit(), None);
        assert_eq!(names.exit(), Some((atom("y"), 20)));
    }
}
