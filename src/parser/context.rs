//! Grammar context: the parameters threaded through every parse function.

use bitflags::bitflags;

use crate::atom::Atom;

bitflags! {
    /// Grammar parameters of the production being parsed. Passed around by
    /// value and restored when a nested function, class or loop ends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Context: u16 {
        /// Strict mode code
        const STRICT = 1;
        /// Module goal
        const MODULE = 1 << 1;
        /// `in` is a binary operator here (off in `for (` heads)
        const IN = 1 << 2;
        /// Inside a generator: `yield` is an operator
        const YIELD = 1 << 3;
        /// Inside an async function or module top level: `await` is an operator
        const AWAIT = 1 << 4;
        /// `return` is allowed
        const RETURN = 1 << 5;
        /// Inside a loop body: `continue` and `break` are allowed
        const ITERATION = 1 << 6;
        /// Inside a switch: `break` is allowed
        const SWITCH = 1 << 7;
        /// `super.x` is allowed (methods, class fields)
        const SUPER_PROPERTY = 1 << 8;
        /// `super()` is allowed (constructors of derived classes)
        const SUPER_CALL = 1 << 9;
        /// `new.target` is allowed
        const NEW_TARGET = 1 << 10;
        /// Class field initializer: `arguments` is forbidden
        const CLASS_FIELD_INIT = 1 << 11;
        /// Class static block: `arguments` and `await` are forbidden
        const STATIC_BLOCK = 1 << 12;
    }
}

impl Context {
    pub fn is_strict(self) -> bool {
        self.contains(Context::STRICT)
    }

    pub fn is_module(self) -> bool {
        self.contains(Context::MODULE)
    }

    pub fn has_in(self) -> bool {
        self.contains(Context::IN)
    }

    pub fn has_yield(self) -> bool {
        self.contains(Context::YIELD)
    }

    pub fn has_await(self) -> bool {
        self.contains(Context::AWAIT)
    }

    /// Context at the top of a program
    pub fn top_level(module: bool, strict: bool) -> Self {
        let mut ctx = Context::IN;
        if module {
            ctx |= Context::MODULE | Context::STRICT | Context::AWAIT;
        }
        if strict {
            ctx |= Context::STRICT;
        }
        ctx
    }

    /// Context inside the body of an ordinary function or method. Only
    /// strictness and the goal survive the function boundary.
    pub fn function_body(self, generator: bool, is_async: bool) -> Self {
        let mut ctx = (self & (Context::STRICT | Context::MODULE))
            | Context::IN
            | Context::RETURN
            | Context::NEW_TARGET;
        if generator {
            ctx |= Context::YIELD;
        }
        if is_async {
            ctx |= Context::AWAIT;
        }
        ctx
    }

    /// Context inside an arrow body. Arrows keep `new.target`, `super` and
    /// the class-field restrictions of their surroundings, but cannot yield
    /// and only await when they are async themselves.
    pub fn arrow_body(self, is_async: bool) -> Self {
        let inherited = self
            & (Context::STRICT
                | Context::MODULE
                | Context::SUPER_PROPERTY
                | Context::SUPER_CALL
                | Context::NEW_TARGET
                | Context::CLASS_FIELD_INIT
                | Context::STATIC_BLOCK);
        let mut ctx = inherited | Context::IN | Context::RETURN;
        if is_async {
            ctx |= Context::AWAIT;
            ctx.remove(Context::STATIC_BLOCK);
        }
        ctx
    }

    /// Context of a class field initializer or static block. The class body
    /// is always strict.
    pub fn class_member(self, static_block: bool) -> Self {
        let base = (self & Context::MODULE)
            | Context::STRICT
            | Context::IN
            | Context::SUPER_PROPERTY
            | Context::NEW_TARGET;
        if static_block {
            base | Context::STATIC_BLOCK
        } else {
            base | Context::CLASS_FIELD_INIT
        }
    }
}

/// An active statement label
#[derive(Debug, Clone)]
pub struct Label {
    pub name: Atom,
    /// The labelled statement is a loop, so `continue name` is valid
    pub is_loop: bool,
    /// Offset of the labelled statement, shared by chained labels (`a: b: for ...`)
    pub statement_start: usize,
}
