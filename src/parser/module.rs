//! Import and export declarations

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::atom::Atom;
use crate::error::{ErrorKind, ParseError};
use crate::lexer::TokenKind;

use super::cover::Site;
use super::pattern::{BindingKind, binding_name_error};
use super::scope::BindingType;
use super::{Parser, identifier_error};

/// Export bookkeeping for one module
#[derive(Debug, Default)]
pub(super) struct ModuleExports {
    /// Every exported name so far, `default` included
    exported: FxHashSet<Atom>,
    /// Local names of `export { x }` without `from`, which must be declared
    /// somewhere at the top level. Kept in source order for reporting.
    pending_locals: IndexMap<Atom, Site>,
}

/// One `a as b` entry of an export list, before we know whether a `from`
/// clause follows
struct PendingSpecifier {
    specifier: ExportSpecifier,
    /// The local side is a string or a reserved word, only valid when
    /// re-exporting from another module
    local_is_name_only: bool,
    local_site: Site,
}

impl<'a> Parser<'a> {
    // ============ IMPORTS ============

    /// `import ...;` after the caller has ruled out `import(` and `import.`
    pub(super) fn parse_import_declaration(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.require_token(&TokenKind::Import)?;

        let mut specifiers = Vec::new();
        if !matches!(self.current.kind, TokenKind::String(_)) {
            if matches!(self.current.kind, TokenKind::Identifier(_)) {
                let local_start = self.site();
                let local = self.parse_import_binding()?;
                specifiers.push(ImportSpecifier::Default {
                    local,
                    span: self.finish(local_start),
                });
                if self.match_token(&TokenKind::Comma)? {
                    self.parse_import_clause_tail(&mut specifiers)?;
                }
            } else {
                self.parse_import_clause_tail(&mut specifiers)?;
            }
            self.require_contextual("from")?;
        }

        let source = self.parse_module_source()?;
        self.expect_semicolon()?;
        Ok(Statement::Import(ImportDeclaration {
            specifiers,
            source,
            span: self.finish(start),
        }))
    }

    /// `* as ns` or `{ a, b as c }`
    fn parse_import_clause_tail(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
    ) -> Result<(), ParseError> {
        if self.check(&TokenKind::Star) {
            let namespace_start = self.site();
            self.advance()?;
            self.require_contextual("as")?;
            let local = self.parse_import_binding()?;
            specifiers.push(ImportSpecifier::Namespace {
                local,
                span: self.finish(namespace_start),
            });
            return Ok(());
        }

        self.require_token(&TokenKind::LBrace)?;
        while !self.check(&TokenKind::RBrace) {
            let specifier_start = self.site();
            let name_only = self.current.kind.is_keyword();
            let imported = self.parse_module_export_name()?;
            let local = if self.is_contextual("as") {
                self.advance()?;
                self.parse_import_binding()?
            } else {
                let ModuleExportName::Identifier(id) = &imported else {
                    return Err(self.error_at_current(
                        ErrorKind::UnexpectedToken,
                        "A string import name must be followed by 'as'",
                    ));
                };
                if name_only {
                    return Err(self.error(
                        ErrorKind::ReservedWord,
                        format!("Unexpected keyword '{}'", id.name),
                        id.span.start,
                    ));
                }
                if let Some((kind, message)) = binding_name_error(
                    &id.name,
                    BindingKind::Const,
                    self.context,
                    self.options.web_compat(),
                ) {
                    return Err(self.error(kind, message, id.span.start));
                }
                let id = id.clone();
                self.declare_name(&id, BindingType::Lexical)?;
                id
            };
            specifiers.push(ImportSpecifier::Named {
                imported,
                local,
                span: self.finish(specifier_start),
            });
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.require_token(&TokenKind::RBrace)
    }

    /// Local name bound by an import; imports are lexical and immutable
    fn parse_import_binding(&mut self) -> Result<Identifier, ParseError> {
        let id = self.parse_binding_identifier(BindingKind::Const)?;
        self.declare_name(&id, BindingType::Lexical)?;
        Ok(id)
    }

    fn parse_module_source(&mut self) -> Result<Literal, ParseError> {
        if !matches!(self.current.kind, TokenKind::String(_)) {
            return Err(self.error_at_current(
                ErrorKind::UnexpectedToken,
                format!(
                    "Expected a module specifier string but found {}",
                    self.current.kind.describe()
                ),
            ));
        }
        self.parse_literal()
    }

    /// Identifier name (reserved words included) or string literal
    fn parse_module_export_name(&mut self) -> Result<ModuleExportName, ParseError> {
        if matches!(self.current.kind, TokenKind::String(_)) {
            return Ok(ModuleExportName::String(self.parse_literal()?));
        }
        Ok(ModuleExportName::Identifier(self.parse_identifier_name()?))
    }

    // ============ EXPORTS ============

    pub(super) fn parse_export_declaration(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.require_token(&TokenKind::Export)?;

        match self.current.kind {
            TokenKind::Star => self.parse_export_all(start),
            TokenKind::Default => self.parse_export_default(start),
            TokenKind::LBrace => self.parse_export_list(start),
            _ => self.parse_export_named_declaration(start),
        }
    }

    /// `export * from "m"` and `export * as ns from "m"`
    fn parse_export_all(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let exported = if self.is_contextual("as") {
            self.advance()?;
            let name = self.parse_module_export_name()?;
            self.record_export(name.name(), name.span())?;
            Some(name)
        } else {
            None
        };
        self.require_contextual("from")?;
        let source = self.parse_module_source()?;
        self.expect_semicolon()?;
        Ok(Statement::ExportAll(ExportAllDeclaration {
            exported,
            source,
            span: self.finish(start),
        }))
    }

    fn parse_export_default(&mut self, start: Site) -> Result<Statement, ParseError> {
        let default_span = self.token_span(&self.current);
        self.advance()?;
        self.record_export("default", default_span)?;

        let value_start = self.site();
        let declaration = if self.check(&TokenKind::Function) {
            let function = self.parse_function_declaration(value_start, false, false, true)?;
            ExportDefaultKind::Function(Box::new(function))
        } else if self.is_async_function_start()? {
            self.advance()?;
            let function = self.parse_function_declaration(value_start, true, false, true)?;
            ExportDefaultKind::Function(Box::new(function))
        } else if self.check(&TokenKind::Class) {
            let class = self.parse_class(true, true)?;
            if let Some(id) = &class.id {
                self.declare_name(id, BindingType::Lexical)?;
            }
            ExportDefaultKind::Class(Box::new(class))
        } else {
            let expression = self.parse_assignment()?;
            self.expect_semicolon()?;
            ExportDefaultKind::Expression(expression)
        };

        Ok(Statement::ExportDefault(ExportDefaultDeclaration {
            declaration,
            span: self.finish(start),
        }))
    }

    fn is_async_function_start(&mut self) -> Result<bool, ParseError> {
        if !self.is_contextual("async") {
            return Ok(false);
        }
        let next = self.peek()?;
        Ok(next.kind == TokenKind::Function && !next.had_newline_before())
    }

    /// `export { a, b as c }` with an optional `from` clause
    fn parse_export_list(&mut self, start: Site) -> Result<Statement, ParseError> {
        self.advance()?;
        let mut pending = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let specifier_start = self.site();
            let local_site = self.site();
            let keyword = self.current.kind.is_keyword();
            let local = self.parse_module_export_name()?;
            let local_is_name_only = keyword || matches!(local, ModuleExportName::String(_));
            let exported = if self.is_contextual("as") {
                self.advance()?;
                self.parse_module_export_name()?
            } else {
                local.clone()
            };
            self.record_export(exported.name(), exported.span())?;
            pending.push(PendingSpecifier {
                specifier: ExportSpecifier {
                    local,
                    exported,
                    span: self.finish(specifier_start),
                },
                local_is_name_only,
                local_site,
            });
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.require_token(&TokenKind::RBrace)?;

        let source = if self.is_contextual("from") {
            self.advance()?;
            Some(self.parse_module_source()?)
        } else {
            for entry in &pending {
                self.check_local_export_name(entry)?;
            }
            None
        };
        self.expect_semicolon()?;

        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            declaration: None,
            specifiers: pending.into_iter().map(|entry| entry.specifier).collect(),
            source,
            span: self.finish(start),
        }))
    }

    /// Without `from`, each local name refers to a binding of this module
    fn check_local_export_name(&mut self, entry: &PendingSpecifier) -> Result<(), ParseError> {
        let name = entry.specifier.local.name();
        if entry.local_is_name_only {
            return Err(self.error_at_site(
                ErrorKind::UnexpectedToken,
                format!("'{}' can only be re-exported from another module", name),
                entry.local_site,
            ));
        }
        if let Some((kind, message)) = identifier_error(name, self.context, self.options.web_compat())
        {
            return Err(self.error_at_site(kind, message, entry.local_site));
        }
        let atom = self.lexer.intern(name);
        self.exports
            .pending_locals
            .entry(atom)
            .or_insert(entry.local_site);
        Ok(())
    }

    /// `export var ...`, `export function ...`, `export class ...`
    fn parse_export_named_declaration(&mut self, start: Site) -> Result<Statement, ParseError> {
        let is_declaration = matches!(
            self.current.kind,
            TokenKind::Var | TokenKind::Const | TokenKind::Function | TokenKind::Class
        ) || self.is_contextual("let")
            || self.is_async_function_start()?;
        if !is_declaration {
            return Err(self.unexpected());
        }

        let declaration = self.parse_statement_list_item()?;
        let names: Vec<(Atom, Span)> = match &declaration {
            Statement::VariableDeclaration(decl) => decl
                .declarations
                .iter()
                .flat_map(|d| d.id.bound_names())
                .map(|id| (id.name.clone(), id.span))
                .collect(),
            Statement::FunctionDeclaration(function) => function
                .id
                .iter()
                .map(|id| (id.name.clone(), id.span))
                .collect(),
            Statement::ClassDeclaration(class) => class
                .id
                .iter()
                .map(|id| (id.name.clone(), id.span))
                .collect(),
            // `let` followed by something that is not a declaration
            _ => return Err(self.error_at_site(ErrorKind::UnexpectedToken, "Unexpected token", start)),
        };
        for (name, span) in &names {
            self.record_export(name, *span)?;
        }

        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            declaration: Some(Box::new(declaration)),
            specifiers: Vec::new(),
            source: None,
            span: self.finish(start),
        }))
    }

    fn record_export(&mut self, name: &str, span: Span) -> Result<(), ParseError> {
        let atom = self.lexer.intern(name);
        if !self.exports.exported.insert(atom) {
            return Err(self.error(
                ErrorKind::EarlyError,
                format!("Duplicate export '{}'", name),
                span.start,
            ));
        }
        Ok(())
    }

    /// Every `export { x }` must name a top-level declaration; checked once
    /// the whole module has been seen.
    pub(super) fn check_local_exports(&self) -> Result<(), ParseError> {
        for (name, site) in &self.exports.pending_locals {
            if !self.scopes.top_level_declares(name) {
                return Err(self.error_at_site(
                    ErrorKind::EarlyError,
                    format!("Export '{}' is not defined", name),
                    *site,
                ));
            }
        }
        Ok(())
    }
}
