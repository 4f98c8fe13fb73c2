//! Column-name sanitization.
//!
//! Column names are used verbatim inside the stack expression, so characters
//! that are unsafe there are filtered out. The rules run in a fixed order and
//! later rules can undo earlier ones: spaces become underscores only after
//! existing underscores were removed.

/// Characters removed anywhere in a name in the final step.
const REMOVED_CHARS: [char; 8] = ['.', ',', '?', '-', '+', '/', '(', ')'];

/// Sanitize a column name for use in a stack expression.
///
/// Applied in order:
///
/// 1. trim leading and trailing `-`
/// 2. remove every `_`
/// 3. replace every space with `_`
/// 4. remove every `.`, `,`, `?`, `-`, `+`, `/`, `(` and `)`
///
/// The function is not idempotent: `"a b"` becomes `"a_b"`, which in turn
/// sanitizes to `"ab"`.
///
/// # Examples
///
/// ```
/// use unpivot_core::sanitize;
///
/// assert_eq!(sanitize("Sales Q1"), "Sales_Q1");
/// assert_eq!(sanitize("Sales-Q2"), "SalesQ2");
/// assert_eq!(sanitize("-net_value (USD)-"), "netvalue_USD");
/// ```
pub fn sanitize(name: &str) -> String {
    name.trim_matches('-')
        .replace('_', "")
        .replace(' ', "_")
        .chars()
        .filter(|ch| !REMOVED_CHARS.contains(ch))
        .collect()
}
