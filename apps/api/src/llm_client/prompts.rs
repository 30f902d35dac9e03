// Shared prompt fragments.
// The analysis and comparison prompts live in contract::prompts; this file
// only holds instructions both of them repeat.

/// Scores must come back as whole percentages.
pub const INTEGER_PERCENT_INSTRUCTION: &str = "Ensure all percentages are strictly integers.";

/// Keeps `relatedPapers` tied to the titles the user actually supplied.
pub const SUPPLIED_TITLES_ONLY: &str =
    "For 'relatedPapers', only use the titles provided in the input context.";

/// Marker used when a researcher has not described their career.
pub const NO_CAREER_CONTEXT: &str = "No specific career background provided.";

/// Single-pass `{key}` substitution. Values are inserted verbatim and never
/// rescanned, so user text containing `{...}` cannot pull in another slot.
/// Unknown keys are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
