//! Compaction stage configuration and the unconditional strips.
//!
//! Whitespace removal and mangling belong to the bundler's own minifier; this
//! stage hands it a [`MinifyPolicy`] and performs the two eliminations the
//! policy pins: `console.*(...)` calls and `debugger` statements are removed
//! no matter where they sit or whether they are reachable. Calls listed in
//! `pure_funcs` are removed the same way. A call that forms a whole statement
//! is cut to `;`; anywhere else it becomes `(void 0)`.

use std::path::PathBuf;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, CallExpression, ChainElement, DebuggerStatement, Expression,
    ExpressionStatement,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser, ParserReturn};
use oxc_span::{SourceType, Span};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprout_config::MinifyPolicy;

use crate::error::{BuildError, Result};

/// One emitted script module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModule {
    pub path: PathBuf,
    pub code: String,
}

impl SourceModule {
    pub fn new(path: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripStats {
    pub console_calls: usize,
    pub debugger_statements: usize,
    pub pure_calls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactedModule {
    pub path: PathBuf,
    pub code: String,
    pub stripped: StripStats,
}

#[derive(Debug, Clone)]
pub struct MinificationPipeline {
    policy: MinifyPolicy,
    jobs: Option<usize>,
}

impl MinificationPipeline {
    pub fn new(policy: MinifyPolicy) -> Self {
        Self { policy, jobs: None }
    }

    /// Cap the number of workers used by [`compact_all`](Self::compact_all).
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs.filter(|&n| n > 0);
        self
    }

    pub fn policy(&self) -> &MinifyPolicy {
        &self.policy
    }

    /// Apply the strips to one module.
    ///
    /// # Example
    ///
    /// ```
    /// use sprout_bundler::minify::{MinificationPipeline, SourceModule};
    /// use sprout_config::{MinifyPolicy, Mode};
    ///
    /// let policy = MinifyPolicy::for_mode(Mode::Production).unwrap();
    /// let out = MinificationPipeline::new(policy)
    ///     .compact(&SourceModule::new("a.js", "console.log(1);\nrun();"))
    ///     .unwrap();
    /// assert!(!out.code.contains("console"));
    /// assert!(out.code.contains("run();"));
    /// ```
    pub fn compact(&self, module: &SourceModule) -> Result<CompactedModule> {
        if !self.policy.enabled {
            return Ok(CompactedModule {
                path: module.path.clone(),
                code: module.code.clone(),
                stripped: StripStats::default(),
            });
        }

        let allocator = Allocator::default();
        let source_type = SourceType::from_path(&module.path).unwrap_or(SourceType::mjs());
        let ParserReturn {
            program, errors, ..
        } = Parser::new(&allocator, &module.code, source_type).parse();

        if let Some(error) = errors.first() {
            return Err(BuildError::Parse {
                path: module.path.clone(),
                message: error.to_string(),
            });
        }

        let mut collector = StripCollector {
            policy: &self.policy,
            edits: Vec::new(),
            stats: StripStats::default(),
        };
        collector.visit_program(&program);

        let code = apply_edits(&module.code, collector.edits);
        tracing::debug!(
            path = %module.path.display(),
            console = collector.stats.console_calls,
            debugger = collector.stats.debugger_statements,
            "stripped module"
        );
        Ok(CompactedModule {
            path: module.path.clone(),
            code,
            stripped: collector.stats,
        })
    }

    /// Compact many modules, fanning out over worker threads when the policy
    /// is parallel. Output order matches input order.
    pub fn compact_all(&self, modules: &[SourceModule]) -> Result<Vec<CompactedModule>> {
        if !self.policy.parallel {
            return modules.iter().map(|m| self.compact(m)).collect();
        }

        match self.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| BuildError::Stage {
                        stage: "minify",
                        message: e.to_string(),
                    })?;
                pool.install(|| modules.par_iter().map(|m| self.compact(m)).collect())
            }
            None => modules.par_iter().map(|m| self.compact(m)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StripKind {
    Console,
    Pure,
}

/// Records source edits: a cut statement becomes `;`, a call in expression
/// position becomes `(void 0)`.
struct StripCollector<'p> {
    policy: &'p MinifyPolicy,
    edits: Vec<(Span, &'static str)>,
    stats: StripStats,
}

impl StripCollector<'_> {
    fn classify(&self, call: &CallExpression) -> Option<StripKind> {
        let path = callee_path(&call.callee)?;
        let is_console = path == "console" || path.starts_with("console.");
        if self.policy.strip_console && is_console {
            Some(StripKind::Console)
        } else if self.policy.pure_funcs.iter().any(|f| *f == path) {
            Some(StripKind::Pure)
        } else {
            None
        }
    }

    fn record(&mut self, kind: StripKind, span: Span, replacement: &'static str) {
        self.edits.push((span, replacement));
        match kind {
            StripKind::Console => self.stats.console_calls += 1,
            StripKind::Pure => self.stats.pure_calls += 1,
        }
    }
}

impl<'a> Visit<'a> for StripCollector<'_> {
    fn visit_debugger_statement(&mut self, it: &DebuggerStatement) {
        if self.policy.strip_debugger {
            self.edits.push((it.span, ";"));
            self.stats.debugger_statements += 1;
        }
    }

    fn visit_expression_statement(&mut self, it: &ExpressionStatement<'a>) {
        if let Some(kind) = as_call(&it.expression).and_then(|call| self.classify(call)) {
            self.record(kind, it.span, ";");
            return;
        }
        walk::walk_expression_statement(self, it);
    }

    // An expression body is stored as a statement; it must stay an expression.
    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        match it.get_expression() {
            Some(body) => {
                self.visit_formal_parameters(&it.params);
                self.visit_expression(body);
            }
            None => walk::walk_arrow_function_expression(self, it),
        }
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if let Some(kind) = self.classify(it) {
            self.record(kind, it.span, "(void 0)");
            return;
        }
        walk::walk_call_expression(self, it);
    }
}

/// The call an expression statement consists of, looking through parentheses
/// and optional chains.
fn as_call<'e, 'a>(expression: &'e Expression<'a>) -> Option<&'e CallExpression<'a>> {
    match expression.without_parentheses() {
        Expression::CallExpression(call) => Some(&**call),
        Expression::ChainExpression(chain) => match &chain.expression {
            ChainElement::CallExpression(call) => Some(&**call),
            _ => None,
        },
        _ => None,
    }
}

/// Dotted callee: `f`, `obj.f`, `obj["f"]`. A computed key that is not a
/// string literal reads as `obj.*`.
fn callee_path(callee: &Expression) -> Option<String> {
    match callee.without_parentheses() {
        Expression::Identifier(ident) => Some(ident.name.to_string()),
        Expression::StaticMemberExpression(member) => match &member.object {
            Expression::Identifier(object) => {
                Some(format!("{}.{}", object.name, member.property.name))
            }
            _ => None,
        },
        Expression::ComputedMemberExpression(member) => {
            let Expression::Identifier(object) = &member.object else {
                return None;
            };
            match &member.expression {
                Expression::StringLiteral(key) => Some(format!("{}.{}", object.name, key.value)),
                _ => Some(format!("{}.*", object.name)),
            }
        }
        _ => None,
    }
}

fn apply_edits(source: &str, mut edits: Vec<(Span, &'static str)>) -> String {
    edits.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for (span, replacement) in edits {
        let (start, end) = (span.start as usize, span.end as usize);
        if start < cursor {
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.push_str(replacement);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_config::Mode;

    fn pipeline() -> MinificationPipeline {
        MinificationPipeline::new(MinifyPolicy::for_mode(Mode::Production).unwrap())
    }

    #[test]
    fn strips_console_and_debugger_everywhere() {
        let source = r#"
function unreachable() {
  return 1;
  console.warn("never");
  debugger;
}
if (flag) debugger;
console.error("boom");
keep();
"#;
        let out = pipeline()
            .compact(&SourceModule::new("app.js", source))
            .unwrap();
        assert!(!out.code.contains("console"));
        assert!(!out.code.contains("debugger"));
        assert!(out.code.contains("if (flag) ;"));
        assert!(out.code.contains("keep();"));
        assert_eq!(out.stripped.console_calls, 2);
        assert_eq!(out.stripped.debugger_statements, 2);
    }

    fn assert_reparses(code: &str) {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "invalid output: {code}");
    }

    fn compact(source: &str) -> CompactedModule {
        let out = pipeline()
            .compact(&SourceModule::new("a.js", source))
            .unwrap();
        assert_reparses(&out.code);
        out
    }

    #[test]
    fn arrow_expression_bodies_stay_expressions() {
        let out = compact("const log = () => console.log(1);\nconst show = (x) => console.info(x);\n");
        assert_eq!(
            out.code,
            "const log = () => (void 0);\nconst show = (x) => (void 0);\n"
        );
        assert_eq!(out.stripped.console_calls, 2);
    }

    #[test]
    fn console_calls_inside_expressions_are_replaced() {
        let out = compact(
            "flag && console.log('x');\na(), console.error('y');\nconst v = ok ? console.warn(1) : 2;\nkeep(console.debug(3));\n",
        );
        assert!(!out.code.contains("console"));
        assert!(out.code.contains("flag && (void 0);"));
        assert!(out.code.contains("a(), (void 0);"));
        assert!(out.code.contains("keep((void 0));"));
        assert_eq!(out.stripped.console_calls, 4);
    }

    #[test]
    fn optional_and_computed_console_calls_are_cut() {
        let out = compact(
            "console.log?.('x');\nconsole['log']('y');\nconsole?.warn('z');\nconsole[level]('w');\nrun();\n",
        );
        assert_eq!(out.code, ";\n;\n;\n;\nrun();\n");
        assert_eq!(out.stripped.console_calls, 4);
    }

    #[test]
    fn nested_callbacks_are_searched() {
        let out = compact("items.forEach((item) => {\n  if (item) console.log(item);\n});\nsetTimeout(() => console.warn(1));\n");
        assert!(!out.code.contains("console"));
        assert!(out.code.contains("if (item) ;"));
        assert!(out.code.contains("setTimeout(() => (void 0));"));
    }

    #[test]
    fn pure_funcs_inside_arrows() {
        let mut policy = MinifyPolicy::for_mode(Mode::Production).unwrap();
        policy.strip_console = false;
        policy.pure_funcs.push("track".to_string());
        let out = MinificationPipeline::new(policy)
            .compact(&SourceModule::new(
                "a.js",
                "const f = () => track(1);\nitems.map((i) => console.log(i));\nconsole.warn(2);\n",
            ))
            .unwrap();
        assert_reparses(&out.code);
        assert!(!out.code.contains("track("));
        assert!(!out.code.contains("console.log"));
        assert!(out.code.contains("console.warn(2);"));
        assert_eq!(out.stripped.pure_calls, 2);
        assert_eq!(out.stripped.console_calls, 0);
    }

    #[test]
    fn pure_funcs_apply_without_console_strip() {
        let mut policy = MinifyPolicy::for_mode(Mode::Production).unwrap();
        policy.strip_console = false;
        let out = MinificationPipeline::new(policy)
            .compact(&SourceModule::new(
                "a.js",
                "console.log(1);\nconsole.warn(2);\n",
            ))
            .unwrap();
        assert_eq!(out.stripped.pure_calls, 1);
        assert!(out.code.contains("console.warn(2);"));
        assert!(!out.code.contains("console.log"));
    }

    #[test]
    fn disabled_policy_passes_through() {
        let mut policy = MinifyPolicy::for_mode(Mode::Production).unwrap();
        policy.enabled = false;
        let module = SourceModule::new("a.js", "debugger;");
        let out = MinificationPipeline::new(policy).compact(&module).unwrap();
        assert_eq!(out.code, "debugger;");
    }

    #[test]
    fn parse_errors_surface() {
        let err = pipeline()
            .compact(&SourceModule::new("broken.js", "function ("))
            .unwrap_err();
        assert!(matches!(err, BuildError::Parse { .. }));
    }

    #[test]
    fn parallel_output_keeps_order() {
        let modules: Vec<_> = (0..32)
            .map(|i| SourceModule::new(format!("m{i}.js"), format!("debugger;\nexport const v{i} = {i};")))
            .collect();
        let out = pipeline().with_jobs(Some(4)).compact_all(&modules).unwrap();
        assert_eq!(out.len(), 32);
        for (i, module) in out.iter().enumerate() {
            assert_eq!(module.path, PathBuf::from(format!("m{i}.js")));
            assert!(module.code.contains(&format!("v{i} = {i}")));
            assert!(!module.code.contains("debugger"));
        }
    }
}
