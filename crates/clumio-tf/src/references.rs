//! Cross-reference check over a [`GenerationBundle`].
//!
//! Resources refer to each other by resource name. Composing a bundle does
//! not require those names to resolve; this check reports the ones that do
//! not, along with cycles among organizational-unit parents and rule ordering.

use crate::model::{GenerationBundle, Role};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Result of [`check_references`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check every name reference in `bundle`.
pub fn check_references(bundle: &GenerationBundle) -> ReferenceReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // ── Duplicate names ──
    let ou_names = names(&bundle.organizational_units, |o| &o.ou_name);
    let policy_names = names(&bundle.policies, |p| &p.policy_name);
    let rule_names = names(&bundle.policy_rules, |r| &r.rule_name);
    duplicates("organizational unit", &ou_names, &mut errors);
    duplicates(
        "AWS connection",
        &names(&bundle.aws_connections, |c| &c.connection_name),
        &mut errors,
    );
    duplicates("policy", &policy_names, &mut errors);
    duplicates(
        "protection group",
        &names(&bundle.protection_groups, |g| &g.group_name),
        &mut errors,
    );
    duplicates("policy rule", &rule_names, &mut errors);
    duplicates("user", &names(&bundle.users, |u| &u.user_name), &mut errors);
    duplicates(
        "report configuration",
        &names(&bundle.report_configurations, |r| &r.config_name),
        &mut errors,
    );

    // ── Policy references ──
    let policies: HashSet<&str> = policy_names.iter().copied().collect();
    for group in &bundle.protection_groups {
        if !policies.contains(group.policy_name.as_str()) {
            errors.push(format!(
                "protection group '{}' references unknown policy '{}'",
                group.group_name, group.policy_name
            ));
        }
    }
    for rule in &bundle.policy_rules {
        if !policies.contains(rule.policy_name.as_str()) {
            errors.push(format!(
                "policy rule '{}' references unknown policy '{}'",
                rule.rule_name, rule.policy_name
            ));
        }
    }

    // ── Rule ordering ──
    let rule_index = first_index(&rule_names);
    let mut before: Vec<Option<usize>> = Vec::with_capacity(rule_names.len());
    for rule in &bundle.policy_rules {
        before.push(match rule.before_rule_name.as_deref() {
            Some(name) => match rule_index.get(name) {
                Some(&i) => Some(i),
                None => {
                    errors.push(format!(
                        "policy rule '{}' is ordered before unknown rule '{name}'",
                        rule.rule_name
                    ));
                    None
                }
            },
            None => None,
        });
    }
    for cycle in find_cycles(&before) {
        warnings.push(format!(
            "policy rules are ordered before each other in a cycle: {}",
            join_names(&rule_names, &cycle)
        ));
    }

    // ── Organizational units ──
    let ou_index = first_index(&ou_names);
    let mut parent: Vec<Option<usize>> = Vec::with_capacity(ou_names.len());
    for ou in &bundle.organizational_units {
        parent.push(match ou.parent_name.as_deref() {
            Some(name) => match ou_index.get(name) {
                Some(&i) => Some(i),
                None => {
                    errors.push(format!(
                        "organizational unit '{}' has unknown parent '{name}'",
                        ou.ou_name
                    ));
                    None
                }
            },
            None => None,
        });
    }
    for cycle in find_cycles(&parent) {
        errors.push(format!(
            "organizational unit parents form a cycle: {}",
            join_names(&ou_names, &cycle)
        ));
    }
    for (i, account) in bundle.clumio_accounts.iter().enumerate() {
        if let Some(ou) = account.ou_name.as_deref()
            && !ou_index.contains_key(ou)
        {
            errors.push(format!(
                "clumio account {} references unknown organizational unit '{ou}'",
                account_label(account.alias.as_deref(), i)
            ));
        }
    }

    // ── Provider aliases ──
    check_aliases(bundle, &mut errors);

    // ── Users ──
    for user in &bundle.users {
        let mut seen: Vec<Role> = Vec::new();
        for acl in &user.access_control_configuration {
            if seen.contains(&acl.role_name) {
                warnings.push(format!(
                    "user '{}' is granted '{}' more than once",
                    user.user_name, acl.role_name
                ));
            } else {
                seen.push(acl.role_name);
            }
        }
    }

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "checked bundle references"
    );
    ReferenceReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &String) -> Vec<&str> {
    items.iter().map(|item| name(item).as_str()).collect()
}

fn first_index<'a>(names: &[&'a str]) -> HashMap<&'a str, usize> {
    let mut index = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        index.entry(*name).or_insert(i);
    }
    index
}

fn duplicates(kind: &str, names: &[&str], errors: &mut Vec<String>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(*name).or_insert(0) += 1;
    }
    let mut reported = HashSet::new();
    for name in names {
        if counts[name] > 1 && reported.insert(*name) {
            errors.push(format!("{kind} name '{name}' is used more than once"));
        }
    }
}

fn account_label(alias: Option<&str>, index: usize) -> String {
    match alias {
        Some(a) => format!("'{a}'"),
        None => format!("#{index}"),
    }
}

fn join_names(names: &[&str], members: &[usize]) -> String {
    members
        .iter()
        .map(|&i| names[i])
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cycles in a graph where node `i` has at most one outgoing edge `next[i]`.
///
/// Kahn's algorithm peels off every node that nothing points at. With at most
/// one outgoing edge per node, what remains is exactly the set of nodes on
/// cycles. Each cycle is returned once, members in index order.
fn find_cycles(next: &[Option<usize>]) -> Vec<Vec<usize>> {
    let mut in_degree = vec![0usize; next.len()];
    for &j in next.iter().flatten() {
        in_degree[j] += 1;
    }

    let mut queue: VecDeque<usize> = (0..next.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut removed = vec![false; next.len()];
    while let Some(i) = queue.pop_front() {
        removed[i] = true;
        if let Some(j) = next[i] {
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                queue.push_back(j);
            }
        }
    }

    let mut cycles = Vec::new();
    let mut assigned = removed;
    for start in 0..next.len() {
        if assigned[start] {
            continue;
        }
        let mut members = vec![start];
        assigned[start] = true;
        let mut current = next[start];
        while let Some(j) = current {
            if j == start || assigned[j] {
                break;
            }
            assigned[j] = true;
            members.push(j);
            current = next[j];
        }
        members.sort_unstable();
        cycles.push(members);
    }
    cycles
}

fn check_aliases(bundle: &GenerationBundle, errors: &mut Vec<String>) {
    let clumio: HashSet<&str> = bundle
        .clumio_accounts
        .iter()
        .filter_map(|a| a.alias.as_deref())
        .collect();
    let aws: HashSet<&str> = bundle
        .aws_accounts
        .iter()
        .filter_map(|a| a.alias.as_deref())
        .collect();

    let mut uses: Vec<(&str, &str, Option<&str>)> = Vec::new();
    for o in &bundle.organizational_units {
        uses.push(("organizational unit", &o.ou_name, o.clumio_provider_alias.as_deref()));
    }
    for c in &bundle.aws_connections {
        uses.push(("AWS connection", &c.connection_name, c.clumio_provider_alias.as_deref()));
    }
    for p in &bundle.policies {
        uses.push(("policy", &p.policy_name, p.clumio_provider_alias.as_deref()));
    }
    for g in &bundle.protection_groups {
        uses.push(("protection group", &g.group_name, g.clumio_provider_alias.as_deref()));
    }
    for r in &bundle.policy_rules {
        uses.push(("policy rule", &r.rule_name, r.clumio_provider_alias.as_deref()));
    }
    for u in &bundle.users {
        uses.push(("user", &u.user_name, u.clumio_provider_alias.as_deref()));
    }
    for r in &bundle.report_configurations {
        uses.push(("report configuration", &r.config_name, r.clumio_provider_alias.as_deref()));
    }

    if !bundle.clumio_accounts.is_empty() {
        for (kind, name, alias) in uses {
            if let Some(alias) = alias
                && !clumio.contains(alias)
            {
                errors.push(format!(
                    "{kind} '{name}' uses undeclared clumio provider alias '{alias}'"
                ));
            }
        }
    }

    if !bundle.aws_accounts.is_empty() {
        for conn in &bundle.aws_connections {
            if let Some(alias) = conn.aws_provider_alias.as_deref()
                && !aws.contains(alias)
            {
                errors.push(format!(
                    "AWS connection '{}' uses undeclared aws provider alias '{alias}'",
                    conn.connection_name
                ));
            }
        }
    }
}
