//! Structural checks run when a grammar is frozen.

use super::{Grammar, Rule, RuleId};
use crate::error::GrammarError;

/// Validate a frozen rule arena.
///
/// # Errors
///
/// Dangling rule ids, empty sequences or choices, and left recursion.
pub(super) fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    let count = grammar.rule_count();
    if grammar.start.index() >= count {
        return Err(GrammarError::UnknownRule {
            rule: grammar.start,
            target: grammar.start,
        });
    }
    for (index, rule) in grammar.rules.iter().enumerate() {
        let id = RuleId::from_index(index);
        if let Some(&target) = rule.children().iter().find(|c| c.index() >= count) {
            return Err(GrammarError::UnknownRule { rule: id, target });
        }
        match rule {
            Rule::Choice(alternatives) if alternatives.is_empty() => {
                return Err(GrammarError::EmptyChoice { rule: id });
            }
            Rule::Sequence(members) if members.is_empty() => {
                return Err(GrammarError::EmptySequence { rule: id });
            }
            _ => {}
        }
    }

    let nullable = nullable_rules(grammar);
    if let Some(cycle) = find_left_recursion(grammar, &nullable) {
        return Err(GrammarError::LeftRecursion {
            cycle: cycle.into_iter().map(|id| grammar.describe(id)).collect(),
        });
    }
    Ok(())
}

/// Which rules can succeed without consuming input. Least fixpoint.
fn nullable_rules(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.rule_count()];
    let mut changed = true;
    while changed {
        changed = false;
        for (index, rule) in grammar.rules.iter().enumerate() {
            if nullable[index] {
                continue;
            }
            let is_nullable = match rule {
                Rule::Literal { units, .. } => units.is_empty(),
                Rule::CharacterSet(_) | Rule::Dot => false,
                Rule::Sequence(members) => members.iter().all(|m| nullable[m.index()]),
                Rule::Choice(alternatives) => alternatives.iter().any(|a| nullable[a.index()]),
                Rule::Repeat { rule, min, .. } => *min == 0 || nullable[rule.index()],
                Rule::PositiveLookahead(_) | Rule::NegativeLookahead(_) => true,
                Rule::Wrap { rule, .. } | Rule::Memoize(rule) | Rule::Reference(rule) => {
                    nullable[rule.index()]
                }
            };
            if is_nullable {
                nullable[index] = true;
                changed = true;
            }
        }
    }
    nullable
}

/// Rules `rule` may invoke at its own start position.
fn left_calls(rule: &Rule, nullable: &[bool]) -> Vec<RuleId> {
    match rule {
        Rule::Sequence(members) => {
            let mut calls = Vec::new();
            for member in members {
                calls.push(*member);
                if !nullable[member.index()] {
                    break;
                }
            }
            calls
        }
        other => other.children().to_vec(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnPath,
    Done,
}

/// Depth-first search over left-call edges; a back edge is a cycle that can
/// re-enter a rule without consuming input.
fn find_left_recursion(grammar: &Grammar, nullable: &[bool]) -> Option<Vec<RuleId>> {
    let mut state = vec![Visit::New; grammar.rule_count()];
    let mut path = Vec::new();
    for index in 0..grammar.rule_count() {
        if state[index] == Visit::New
            && let Some(cycle) = visit(grammar, nullable, RuleId::from_index(index), &mut state, &mut path)
        {
            return Some(cycle);
        }
    }
    None
}

fn visit(
    grammar: &Grammar,
    nullable: &[bool],
    id: RuleId,
    state: &mut [Visit],
    path: &mut Vec<RuleId>,
) -> Option<Vec<RuleId>> {
    state[id.index()] = Visit::OnPath;
    path.push(id);
    for callee in left_calls(grammar.rule(id), nullable) {
        match state[callee.index()] {
            Visit::OnPath => {
                let from = path.iter().position(|&p| p == callee).unwrap_or(0);
                let mut cycle = path[from..].to_vec();
                cycle.push(callee);
                return Some(cycle);
            }
            Visit::New => {
                if let Some(cycle) = visit(grammar, nullable, callee, state, path) {
                    return Some(cycle);
                }
            }
            Visit::Done => {}
        }
    }
    path.pop();
    state[id.index()] = Visit::Done;
    None
}
