//! Grammar-driven error recovery.
//!
//! When the driver finds a token it cannot use at some [`RuleContext`], it
//! calls [`ErrorHandler::recover`]. The handler searches a few tokens ahead,
//! comparing "the expected token is missing" (insert) against "this token is
//! garbage" (remove) by how many of the following tokens then match the
//! grammar, and applies the better fix before returning it.
//!
//! The search is speculative: every probe runs against a snapshot of the
//! context stack, and is bounded by [`RecoveryLimits`].

mod grammar;
mod limits;
pub mod registry;

use tracing::{debug, trace, warn};

use crate::context::{ContextStack, RuleContext};
use crate::error::SyntaxFault;
use crate::reader::TokenReader;
use crate::token::{SyntaxKind, Token};

use grammar::NotViable;
use limits::LoopGuard;

pub use limits::{RecoveryLimits, COMPLETION_ITER_LIMIT, LOOKAHEAD_LIMIT, RESOLUTION_ITER_LIMIT};

pub(crate) use grammar::matches as context_matches;

/// What recovery did about the unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The token is acceptable here; the problem lies further on.
    Keep,
    /// The expected token is missing and was synthesized.
    Insert,
    /// The token was discarded.
    Remove,
}

/// The outcome of [`ErrorHandler::recover`], already applied to the reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub action: Action,
    /// The context the fix targets.
    pub ctx: RuleContext,
    pub token_kind: SyntaxKind,
    pub token_text: String,
    /// Search depth at which the fix was found.
    pub depth: usize,
    /// The synthesized missing token, for `Insert`.
    pub recovered: Option<Token>,
    /// The discarded token, for `Remove`.
    pub removed: Option<Token>,
}

/// A tentative fix recorded during the search.
#[derive(Debug, Clone, PartialEq)]
struct Fix {
    action: Action,
    ctx: RuleContext,
    token_kind: SyntaxKind,
    token_text: String,
    depth: usize,
}

impl Fix {
    fn keep(ctx: RuleContext, depth: usize) -> Self {
        Self::expected(Action::Keep, ctx, depth)
    }

    fn insert(ctx: RuleContext, depth: usize) -> Self {
        Self::expected(Action::Insert, ctx, depth)
    }

    fn remove(ctx: RuleContext, token: &Token, depth: usize) -> Self {
        Self {
            action: Action::Remove,
            ctx,
            token_kind: token.kind(),
            token_text: token.text().to_string(),
            depth,
        }
    }

    fn expected(action: Action, ctx: RuleContext, depth: usize) -> Self {
        Self {
            action,
            ctx,
            token_kind: registry::expected(ctx).0,
            token_text: format!("{ctx:?}"),
            depth,
        }
    }
}

/// Accumulated state of one search path.
#[derive(Debug, Default)]
struct SearchResult {
    matches: usize,
    /// Fixes along the path, innermost first.
    fixes: Vec<Fix>,
    remove_fixes: usize,
    solution: Option<Fix>,
}

impl SearchResult {
    fn with_matches(matches: usize) -> Self {
        Self {
            matches,
            ..Self::default()
        }
    }

    fn push_fix(&mut self, fix: Fix) {
        if fix.action == Action::Remove {
            self.remove_fixes += 1;
        }
        self.fixes.push(fix);
    }

    /// The fix at the start of the path.
    fn peek_fix(&self) -> Option<&Fix> {
        self.fixes.last()
    }

    fn starts_with_remove(&self) -> bool {
        self.peek_fix().is_some_and(|fix| fix.action == Action::Remove)
    }
}

/// Why a probe stopped.
enum SearchError {
    /// This path cannot continue; skip it.
    NotViable,
    Fault(SyntaxFault),
}

impl From<NotViable> for SearchError {
    fn from(_: NotViable) -> Self {
        SearchError::NotViable
    }
}

impl From<SyntaxFault> for SearchError {
    fn from(fault: SyntaxFault) -> Self {
        SearchError::Fault(fault)
    }
}

type SearchOutcome = Result<SearchResult, SearchError>;

/// Recovery engine and owner of the rule-context stack.
#[derive(Debug, Clone)]
pub struct ErrorHandler {
    stack: ContextStack,
    limits: RecoveryLimits,
    iteration_count: usize,
    previous_cursor: Option<usize>,
    eof_key: Option<(usize, RuleContext, usize)>,
    eof_repeats: usize,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::with_limits(RecoveryLimits::default())
    }

    pub fn with_limits(limits: RecoveryLimits) -> Self {
        Self {
            stack: ContextStack::new(),
            limits,
            iteration_count: 0,
            previous_cursor: None,
            eof_key: None,
            eof_repeats: 0,
        }
    }

    pub fn limits(&self) -> &RecoveryLimits {
        &self.limits
    }

    pub fn push_context(&mut self, ctx: RuleContext) {
        trace!(?ctx, depth = self.stack.len(), "push context");
        self.stack.push(ctx);
    }

    pub fn pop_context(&mut self) -> Result<RuleContext, SyntaxFault> {
        let ctx = self.stack.pop()?;
        trace!(?ctx, depth = self.stack.len(), "pop context");
        Ok(ctx)
    }

    pub fn switch_context(&mut self, ctx: RuleContext) {
        self.stack.switch(ctx);
    }

    /// The innermost open production.
    pub fn current_context(&self) -> RuleContext {
        self.stack.top().unwrap_or(RuleContext::CompilationUnit)
    }

    pub fn context_stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Consecutive `recover` calls made without the reader advancing.
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Decide what to do about the next token, which does not fit `ctx`,
    /// and apply the decision to `reader`.
    ///
    /// `is_completion` asks only for what should be inserted at `ctx`.
    ///
    /// Below the iteration ceiling a failed search falls back to removing
    /// the next token. Reaching the ceiling without a fix is a
    /// [`SyntaxFault::RecoveryDiverged`].
    pub fn recover(
        &mut self,
        reader: &mut TokenReader<'_>,
        ctx: RuleContext,
        is_completion: bool,
    ) -> Result<Solution, SyntaxFault> {
        let cursor = reader.current_token_index();
        if self.previous_cursor == Some(cursor) {
            self.iteration_count += 1;
        } else {
            self.iteration_count = 0;
            self.previous_cursor = Some(cursor);
        }

        if reader.peek().kind() == SyntaxKind::Eof {
            self.check_eof_progress(ctx, cursor)?;
            let fix = self.get_insert_solution(ctx).unwrap_or_else(|_| Fix::insert(ctx, 0));
            return Ok(self.apply(reader, fix));
        }
        self.eof_key = None;

        let mut fix = None;
        if is_completion && self.iteration_count < self.limits.completion_iter_limit {
            match self.get_insert_solution(ctx) {
                Ok(found) => fix = Some(found),
                Err(NotViable) => trace!(?ctx, "completion not viable, resolving"),
            }
        }
        if fix.is_none() && self.iteration_count < self.limits.resolution_iter_limit {
            fix = self.resolve(reader, ctx)?;
        }

        let ceiling = if is_completion {
            self.limits.completion_iter_limit
        } else {
            self.limits.resolution_iter_limit
        };
        let fix = match fix {
            Some(fix) => fix,
            None if self.iteration_count >= ceiling => {
                return Err(SyntaxFault::RecoveryDiverged {
                    context: ctx,
                    cursor,
                    iterations: self.iteration_count,
                });
            }
            None => {
                let token = reader.peek();
                warn!(
                    ?ctx,
                    kind = ?token.kind(),
                    iterations = self.iteration_count,
                    "no recovery path found, removing token"
                );
                Fix::remove(ctx, token, 0)
            }
        };
        Ok(self.apply(reader, fix))
    }

    /// At end of input nothing can be removed, so every call inserts. A
    /// driver asking again and again from the same place never finishes.
    fn check_eof_progress(&mut self, ctx: RuleContext, cursor: usize) -> Result<(), SyntaxFault> {
        let key = (cursor, ctx, self.stack.len());
        if self.eof_key == Some(key) {
            self.eof_repeats += 1;
        } else {
            self.eof_key = Some(key);
            self.eof_repeats = 0;
        }
        if self.eof_repeats > self.limits.resolution_iter_limit {
            return Err(SyntaxFault::RecoveryDiverged {
                context: ctx,
                cursor,
                iterations: self.eof_repeats,
            });
        }
        Ok(())
    }

    /// Walk from `ctx` to the first thing that can be synthesized, taking
    /// the first alternative of every choice.
    fn get_insert_solution(&mut self, ctx: RuleContext) -> Result<Fix, NotViable> {
        let mut snapshot = self.stack.snapshot();
        let mut guard = LoopGuard::with_limit("completion", self.limits.completion_iter_limit);
        let mut ctx = ctx;
        loop {
            if grammar::is_terminal(ctx) || registry::has_direct_entry(ctx) {
                return Ok(Fix::insert(ctx, 0));
            }
            if !guard.check() {
                return Err(NotViable);
            }
            ctx = match grammar::alternatives(ctx) {
                Some(alternatives) => alternatives.first().copied().ok_or(NotViable)?,
                None => grammar::next_rule(ctx, &mut snapshot)?,
            };
        }
    }

    fn resolve(
        &mut self,
        reader: &mut TokenReader<'_>,
        ctx: RuleContext,
    ) -> Result<Option<Fix>, SyntaxFault> {
        let mut search = Search {
            reader,
            limits: self.limits,
        };
        let result = match search.seek_match_start(&mut self.stack, ctx) {
            Ok(result) => result,
            Err(SearchError::NotViable) => {
                trace!(?ctx, "no viable search path");
                return Ok(None);
            }
            Err(SearchError::Fault(fault)) => return Err(fault),
        };
        trace!(
            matches = result.matches,
            fixes = result.fixes.len(),
            remove_fixes = result.remove_fixes,
            "search finished"
        );
        search.validate(result)
    }

    fn apply(&self, reader: &mut TokenReader<'_>, fix: Fix) -> Solution {
        debug!(
            action = ?fix.action,
            ctx = ?fix.ctx,
            kind = ?fix.token_kind,
            depth = fix.depth,
            "recovery solution"
        );
        let mut solution = Solution {
            action: fix.action,
            ctx: fix.ctx,
            token_kind: fix.token_kind,
            token_text: fix.token_text,
            depth: fix.depth,
            recovered: None,
            removed: None,
        };
        match fix.action {
            Action::Insert => solution.recovered = Some(registry::missing_token(fix.ctx)),
            Action::Remove => solution.removed = Some(reader.read()),
            Action::Keep => {}
        }
        solution
    }
}

/// One bounded search over the lookahead tokens.
struct Search<'r, 'a> {
    reader: &'r mut TokenReader<'a>,
    limits: RecoveryLimits,
}

impl Search<'_, '_> {
    fn seek_match_start(&mut self, stack: &mut ContextStack, ctx: RuleContext) -> SearchOutcome {
        self.seek_match_in_sub_tree(stack, ctx, 0, 0, true)
    }

    fn seek_match_in_sub_tree(
        &mut self,
        stack: &mut ContextStack,
        ctx: RuleContext,
        lookahead: usize,
        depth: usize,
        is_entry_point: bool,
    ) -> SearchOutcome {
        let mut snapshot = stack.snapshot();
        self.seek_match(&mut snapshot, ctx, lookahead, depth, is_entry_point)
    }

    /// Count how many of the coming tokens match the grammar from `ctx`
    /// onwards, fixing mismatches along the way.
    fn seek_match(
        &mut self,
        stack: &mut ContextStack,
        mut ctx: RuleContext,
        mut lookahead: usize,
        mut depth: usize,
        mut is_entry_point: bool,
    ) -> SearchOutcome {
        let limit = self.limits.lookahead_limit;
        let mut matches = 0;
        let mut skips = LoopGuard::new("seek_match");

        while depth < limit {
            if let Some(alternatives) = grammar::alternatives(ctx) {
                return self.seek_in_alternative_paths(
                    stack,
                    alternatives,
                    lookahead,
                    depth,
                    matches,
                    is_entry_point,
                );
            }

            if !grammar::is_terminal(ctx) {
                if !skips.check() {
                    return Err(SearchError::NotViable);
                }
                ctx = grammar::next_rule(ctx, stack)?;
                continue;
            }

            let kind = self.reader.peek_n(lookahead)?.kind();
            if !grammar::matches(ctx, kind) {
                return self.fix_and_continue(stack, ctx, lookahead, depth, matches, is_entry_point);
            }
            if ctx == RuleContext::Eof {
                // Nothing follows end of input: the remaining budget all matches.
                let mut result = SearchResult::with_matches(matches + limit - depth);
                result.solution = Some(Fix::keep(ctx, depth));
                return Ok(result);
            }

            ctx = grammar::next_rule(ctx, stack)?;
            depth += 1;
            matches += 1;
            lookahead += 1;
            is_entry_point = false;
        }

        let mut result = SearchResult::with_matches(matches);
        result.solution = Some(Fix::keep(ctx, depth));
        Ok(result)
    }

    fn fix_and_continue(
        &mut self,
        stack: &mut ContextStack,
        ctx: RuleContext,
        lookahead: usize,
        depth: usize,
        matches: usize,
        is_entry_point: bool,
    ) -> SearchOutcome {
        let mut result = self.fix_and_continue_at(stack, ctx, lookahead, depth + 1)?;
        // The fixed rule itself does not count as a match.
        result.solution = if is_entry_point {
            result.peek_fix().cloned()
        } else {
            Some(Fix::keep(ctx, depth))
        };
        result.matches += matches;
        Ok(result)
    }

    /// Compare removing the token at `lookahead` with inserting the token
    /// `ctx` expects, and record the better one.
    fn fix_and_continue_at(
        &mut self,
        stack: &mut ContextStack,
        ctx: RuleContext,
        lookahead: usize,
        depth: usize,
    ) -> SearchOutcome {
        let token = self.reader.peek_n(lookahead)?.clone();

        let deletion = if token.kind() == SyntaxKind::Eof {
            None
        } else {
            viable(self.seek_match_in_sub_tree(stack, ctx, lookahead + 1, depth, false))?
        };

        let insertion = {
            let mut snapshot = stack.snapshot();
            match grammar::next_rule(ctx, &mut snapshot) {
                Ok(next) => viable(self.seek_match(&mut snapshot, next, lookahead, depth, false))?,
                Err(NotViable) => None,
            }
        };

        let (mut chosen, action) = match (insertion, deletion) {
            (None, None) => return Err(SearchError::NotViable),
            (Some(insertion), None) => (insertion, Action::Insert),
            (None, Some(deletion)) => (deletion, Action::Remove),
            (Some(insertion), Some(deletion)) => {
                if insertion.matches == 0 && deletion.matches == 0 {
                    (insertion, Action::Insert)
                } else if insertion.matches == deletion.matches {
                    if insertion.remove_fixes > deletion.remove_fixes + 1 {
                        (deletion, Action::Remove)
                    } else {
                        (insertion, Action::Insert)
                    }
                } else if insertion.matches > deletion.matches {
                    (insertion, Action::Insert)
                } else {
                    (deletion, Action::Remove)
                }
            }
        };

        let fix = match action {
            Action::Remove => Fix::remove(ctx, &token, depth),
            _ => Fix::insert(ctx, depth),
        };
        trace!(?ctx, action = ?fix.action, depth, matches = chosen.matches, "fix");
        chosen.push_fix(fix);
        Ok(chosen)
    }

    /// Probe every alternative on its own snapshot and keep the best.
    fn seek_in_alternative_paths(
        &mut self,
        stack: &mut ContextStack,
        alternatives: &'static [RuleContext],
        lookahead: usize,
        depth: usize,
        matches: usize,
        is_entry_point: bool,
    ) -> SearchOutcome {
        let limit = self.limits.lookahead_limit;
        let mut buckets: Vec<Vec<(RuleContext, SearchResult)>> =
            (0..=limit).map(|_| Vec::new()).collect();
        let mut best_index = 0;

        for &alternative in alternatives {
            let result = match self.seek_match_in_sub_tree(
                stack,
                alternative,
                lookahead,
                depth,
                is_entry_point,
            ) {
                Ok(result) => result,
                Err(SearchError::NotViable) => {
                    trace!(?alternative, "alternative not viable");
                    continue;
                }
                Err(fault) => return Err(fault),
            };

            // Both checks look at the first fix on the path rather than the
            // probe's solution, which is always Keep away from the entry point.
            if result.matches + 1 >= limit && !result.starts_with_remove() {
                return Ok(finish_alternative(alternative, result, matches, depth, is_entry_point));
            }

            let index = result.matches.min(limit);
            best_index = best_index.max(index);
            buckets[index].push((alternative, result));
        }

        let mut candidates = std::mem::take(&mut buckets[best_index]).into_iter();
        let Some((mut best_alternative, mut best)) = candidates.next() else {
            return Err(SearchError::NotViable);
        };
        if best_index > 0 {
            for (alternative, current) in candidates {
                if current.remove_fixes == best.remove_fixes {
                    let current_inserts =
                        current.peek_fix().is_some_and(|fix| fix.action == Action::Insert);
                    if current_inserts && best.starts_with_remove() {
                        best_alternative = alternative;
                        best = current;
                    }
                } else if current.remove_fixes < best.remove_fixes {
                    best_alternative = alternative;
                    best = current;
                }
            }
        }

        Ok(finish_alternative(best_alternative, best, matches, depth, is_entry_point))
    }

    /// Post-pass over the chosen solution.
    ///
    /// A documentation string is never kept mid-construct, and an insertion
    /// immediately followed by removing the same token collapses to the
    /// removal.
    fn validate(&mut self, mut result: SearchResult) -> Result<Option<Fix>, SyntaxFault> {
        let Some(solution) = result.solution.take() else {
            return Ok(None);
        };
        match solution.action {
            Action::Remove => Ok(Some(solution)),
            Action::Keep => {
                let token = self.reader.peek();
                if token.kind() == SyntaxKind::DocumentationString {
                    return Ok(Some(Fix::remove(solution.ctx, token, solution.depth)));
                }
                Ok(Some(solution))
            }
            Action::Insert => {
                let count = result.fixes.len();
                if count > 1 {
                    let second = &result.fixes[count - 2];
                    if second.action == Action::Remove && second.depth == solution.depth + 1 {
                        return Ok(Some(second.clone()));
                    }
                }
                Ok(Some(solution))
            }
        }
    }
}

fn finish_alternative(
    alternative: RuleContext,
    mut result: SearchResult,
    matches: usize,
    depth: usize,
    is_entry_point: bool,
) -> SearchResult {
    result.solution = match (is_entry_point, result.peek_fix()) {
        (true, Some(fix)) => Some(fix.clone()),
        _ => Some(Fix::keep(alternative, depth)),
    };
    result.matches += matches;
    result
}

/// A not-viable branch is simply absent; faults still propagate.
fn viable(outcome: SearchOutcome) -> Result<Option<SearchResult>, SearchError> {
    match outcome {
        Ok(result) => Ok(Some(result)),
        Err(SearchError::NotViable) => Ok(None),
        Err(fault) => Err(fault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use crate::lexer::Lexer;

    fn handler_with(contexts: &[RuleContext]) -> ErrorHandler {
        let mut handler = ErrorHandler::new();
        for ctx in contexts {
            handler.push_context(*ctx);
        }
        handler
    }

    #[test]
    fn test_missing_close_paren_at_eof_is_inserted() {
        let mut reader = TokenReader::new(Lexer::new("foo("));
        reader.read();
        reader.read();
        let mut handler = handler_with(&[RuleContext::ExpressionStatement, RuleContext::ArgList]);
        let solution = handler.recover(&mut reader, RuleContext::ArgListEnd, false).unwrap();
        assert_eq!(solution.action, Action::Insert);
        let token = solution.recovered.unwrap();
        assert!(token.is_missing());
        assert_eq!(token.kind(), SyntaxKind::CloseParen);
        assert_eq!(token.diagnostics()[0].code, DiagnosticCode::MissingCloseParenToken);
        assert_eq!(reader.current_token_index(), 2);
    }

    #[test]
    fn test_stray_token_is_removed() {
        let mut reader = TokenReader::new(Lexer::new("@ x = 1;"));
        let mut handler = handler_with(&[RuleContext::FuncDef, RuleContext::FuncBodyBlock]);
        let before = handler.context_stack().clone();
        let solution = handler.recover(&mut reader, RuleContext::Statement, false).unwrap();
        assert_eq!(solution.action, Action::Remove);
        assert_eq!(solution.removed.unwrap().kind(), SyntaxKind::At);
        assert_eq!(reader.current_token_index(), 1);
        assert_eq!(handler.context_stack(), &before);
    }

    #[test]
    fn test_missing_expression_is_inserted() {
        let mut reader = TokenReader::new(Lexer::new(";"));
        let mut handler = handler_with(&[RuleContext::ModuleVarDecl]);
        let solution = handler.recover(&mut reader, RuleContext::Expression, false).unwrap();
        assert_eq!(solution.action, Action::Insert);
        let token = solution.recovered.unwrap();
        assert_eq!(token.kind(), SyntaxKind::Identifier);
        assert_eq!(token.diagnostics()[0].code, DiagnosticCode::MissingExpression);
        assert_eq!(reader.current_token_index(), 0);
    }

    #[test]
    fn test_completion_inserts_expected_token() {
        let mut reader = TokenReader::new(Lexer::new("return"));
        let mut handler = handler_with(&[
            RuleContext::FuncDef,
            RuleContext::FuncBodyBlock,
            RuleContext::ExpressionStatement,
        ]);
        let solution = handler.recover(&mut reader, RuleContext::Semicolon, true).unwrap();
        assert_eq!(solution.action, Action::Insert);
        assert_eq!(solution.token_kind, SyntaxKind::Semicolon);
        assert_eq!(reader.current_token_index(), 0);
    }

    #[test]
    fn test_failed_search_removes_token() {
        let mut reader = TokenReader::new(Lexer::new("x y"));
        let mut handler = ErrorHandler::new();
        let solution = handler.recover(&mut reader, RuleContext::Semicolon, false).unwrap();
        assert_eq!(solution.action, Action::Remove);
        assert_eq!(solution.token_text, "x");
        assert_eq!(reader.current_token_index(), 1);
    }

    #[test]
    fn test_ceiling_without_fix_is_fault() {
        let limits = RecoveryLimits {
            resolution_iter_limit: 0,
            ..RecoveryLimits::default()
        };
        let mut reader = TokenReader::new(Lexer::new("x y"));
        let mut handler = ErrorHandler::with_limits(limits);
        let fault = handler
            .recover(&mut reader, RuleContext::Semicolon, false)
            .unwrap_err();
        assert_eq!(
            fault,
            SyntaxFault::RecoveryDiverged {
                context: RuleContext::Semicolon,
                cursor: 0,
                iterations: 0,
            }
        );
        assert_eq!(reader.current_token_index(), 0);
    }

    #[test]
    fn test_repeated_calls_at_eof_diverge() {
        let mut reader = TokenReader::new(Lexer::new(""));
        let mut handler = ErrorHandler::new();
        let mut outcome = Ok(());
        for _ in 0..20 {
            if let Err(fault) = handler.recover(&mut reader, RuleContext::Semicolon, false) {
                outcome = Err(fault);
                break;
            }
        }
        assert!(matches!(
            outcome,
            Err(SyntaxFault::RecoveryDiverged {
                context: RuleContext::Semicolon,
                ..
            })
        ));
    }

    #[test]
    fn test_iteration_count_resets_when_cursor_moves() {
        let mut reader = TokenReader::new(Lexer::new("a b c"));
        let mut handler = ErrorHandler::new();
        handler.recover(&mut reader, RuleContext::Semicolon, false).unwrap();
        assert_eq!(handler.iteration_count(), 0);
        handler.recover(&mut reader, RuleContext::Semicolon, false).unwrap();
        assert_eq!(handler.iteration_count(), 0);
    }

    #[test]
    fn test_keep_before_documentation_becomes_remove() {
        let mut reader = TokenReader::new(Lexer::new("# doc\nx"));
        let mut search = Search {
            reader: &mut reader,
            limits: RecoveryLimits::default(),
        };
        let result = SearchResult {
            solution: Some(Fix::keep(RuleContext::Expression, 0)),
            ..SearchResult::default()
        };
        let fix = search.validate(result).unwrap().unwrap();
        assert_eq!(fix.action, Action::Remove);
        assert_eq!(fix.token_kind, SyntaxKind::DocumentationString);
    }

    #[test]
    fn test_insert_followed_by_removal_is_demoted() {
        let mut reader = TokenReader::new(Lexer::new("x"));
        let mut search = Search {
            reader: &mut reader,
            limits: RecoveryLimits::default(),
        };
        let token = Token::new(SyntaxKind::Identifier, Some("x"), vec![], vec![], vec![]);
        let insert = Fix::insert(RuleContext::Semicolon, 1);
        let mut result = SearchResult::default();
        result.push_fix(Fix::remove(RuleContext::Semicolon, &token, 2));
        result.push_fix(insert.clone());
        result.solution = Some(insert);
        let fix = search.validate(result).unwrap().unwrap();
        assert_eq!(fix.action, Action::Remove);
        assert_eq!(fix.depth, 2);
    }

    #[test]
    fn test_pop_context_underflow_is_fault() {
        let mut handler = ErrorHandler::new();
        assert_eq!(handler.pop_context(), Ok(RuleContext::CompilationUnit));
        assert_eq!(handler.pop_context(), Err(SyntaxFault::ContextStackUnderflow));
        assert_eq!(handler.current_context(), RuleContext::CompilationUnit);
    }
}
