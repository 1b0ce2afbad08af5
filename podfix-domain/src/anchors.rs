//! Text patterns the rules detect and anchor on.
//!
//! Every pattern is line-oriented and compiled once. Keeping them here lets the patterns be
//! exercised without running the rule pipeline.

use regex::Regex;
use std::sync::OnceLock;

/// The `require` line that loads the autolinking helpers from the `expo` package.
pub fn autolink_require() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^require.+'expo/package\.json.+scripts/autolinking")
            .expect("Invalid regex constant")
    })
}

/// A line holding nothing but the activation directive.
pub fn use_expo_modules_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*use_expo_modules!\s*$").expect("Invalid regex constant")
    })
}

/// The activation directive followed by its newline; anchor for a synthesized hook.
pub fn use_expo_modules_anchor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\buse_expo_modules!\n)").expect("Invalid regex constant"))
}

/// Opening line of `target '<project_name>' do` (either quote style).
///
/// The name is matched literally. Fails only when the name pushes the pattern past
/// the regex size limit.
pub fn target_block(project_name: &str) -> Result<Regex, regex::Error> {
    let pattern = format!(
        r#"(?m)(^\s*target\s+['"]{}['"]\s+do\s*$)"#,
        regex::escape(project_name)
    );
    Regex::new(&pattern)
}

/// The pristine, argument-less `config = use_native_modules!` assignment.
pub fn native_modules_assignment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(\s+config\s+=\s+use_native_modules!\s*)$")
            .expect("Invalid regex constant")
    })
}

/// The assignment after it has been rewritten to take an explicit command.
pub fn native_modules_with_command() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bconfig\s*=\s*use_native_modules!\(config_command\)")
            .expect("Invalid regex constant")
    })
}

/// An explicit call to the react-imports patch helper.
pub fn patch_react_imports_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bexpo_patch_react_imports!\(installer\)").expect("Invalid regex constant")
    })
}

/// Opening of an existing `post_integrate` hook.
pub fn post_integrate_hook() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\bpost_integrate do \|installer\|)").expect("Invalid regex constant")
    })
}
