//! Parser configuration

use serde::Deserialize;

/// Default limit on syntactic nesting (parentheses, blocks, function bodies, ...).
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 256;

/// Options chosen before a parse starts. Immutable for the duration of one parse.
///
/// Each field is independent. `module` implies strict mode regardless of `strict`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Parse with the Module goal: `import`/`export`, top-level `await`, strict code
    pub module: bool,
    /// Start in strict mode even with the Script goal
    pub strict: bool,
    /// Attach `loc` line/column pairs to every node
    pub attach_loc: bool,
    /// Turn off the Annex B allowances (`let` as identifier, HTML comments,
    /// labelled functions, `if (x) function f() {}`, ...)
    pub disable_web_compat: bool,
    /// Recursion guard; deeper input fails with `ErrorKind::NestingLimit`
    pub max_nesting_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            module: false,
            strict: false,
            attach_loc: false,
            disable_web_compat: false,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script() -> Self {
        Self::default()
    }

    pub fn module() -> Self {
        Self::default().with_module(true)
    }

    pub fn with_module(mut self, module: bool) -> Self {
        self.module = module;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_loc(mut self, attach_loc: bool) -> Self {
        self.attach_loc = attach_loc;
        self
    }

    pub fn with_web_compat(mut self, enabled: bool) -> Self {
        self.disable_web_compat = !enabled;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Load options from a JSON object such as `{"module": true, "attachLoc": true}`.
    /// Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Annex B behaviour applies only to sloppy scripts with web compat enabled.
    pub(crate) fn web_compat(&self) -> bool {
        !self.disable_web_compat
    }

    pub(crate) fn starts_strict(&self) -> bool {
        self.module || self.strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ParseOptions::default();
        assert!(!opts.module);
        assert!(!opts.strict);
        assert!(opts.web_compat());
        assert_eq!(opts.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn module_implies_strict() {
        assert!(ParseOptions::module().starts_strict());
        assert!(!ParseOptions::script().starts_strict());
        assert!(ParseOptions::script().with_strict(true).starts_strict());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn from_json_keeps_missing_defaults() {
        let opts = ParseOptions::from_json(r#"{"module": true, "attachLoc": true}"#).unwrap();
        assert!(opts.module);
        assert!(opts.attach_loc);
        assert!(!opts.disable_web_compat);
        assert_eq!(opts.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);

        let opts = ParseOptions::from_json(r#"{"disableWebCompat": true, "maxNestingDepth": 8}"#)
            .unwrap();
        assert!(!opts.web_compat());
        assert_eq!(opts.max_nesting_depth, 8);
    }

    #[test]
    fn from_json_rejects_bad_types() {
        assert!(ParseOptions::from_json(r#"{"module": "yes"}"#).is_err());
    }
}
