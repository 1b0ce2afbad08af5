//! Rule explanations for the `podfix explain` command.

use podfix_domain::{builtin_rules, PatchRule, VersionGate};
use podfix_types::rules::RuleId;

/// Information about a built-in patch rule.
#[derive(Debug, Clone)]
pub struct RuleExplanation {
    pub rule: RuleId,
    /// Human-readable title.
    pub title: &'static str,
    /// What the rule inserts and where.
    pub description: &'static str,
    /// How the rule decides its edit is already present.
    pub detection: &'static str,
    /// What to do when the rule reports a missing anchor.
    pub remediation: &'static str,
}

/// Registry of all rule explanations, in pipeline order.
pub static RULE_REGISTRY: &[RuleExplanation] = &[
    RuleExplanation {
        rule: RuleId::AutolinkRequire,
        title: "Autolinking Require Line",
        description: r#"Prepends the line

    require File.join(File.dirname(`node --print "require.resolve('expo/package.json')"`), "scripts/autolinking")

as the very first line of the Podfile. It loads Expo's autolinking helpers, which
define `use_expo_modules!` and the other directives the later rules insert. The
package location is resolved through node at `pod install` time, so the line works
regardless of where `node_modules` lives."#,
        detection: r#"Any line that starts with `require` and mentions both
`'expo/package.json` and `scripts/autolinking`. Quoting or spacing differences
in an existing line are accepted."#,
        remediation: r#"This rule has no anchor and always applies. To add the line by hand,
paste it above every other line of the Podfile."#,
    },
    RuleExplanation {
        rule: RuleId::UseExpoModules,
        title: "Activate Expo Modules",
        description: r#"Inserts `  use_expo_modules!` on the line directly after the app's
target block opener, `target '<ProjectName>' do` (single or double quotes).
Only the first matching target is edited."#,
        detection: r#"A line consisting solely of `use_expo_modules!` (surrounding
whitespace allowed), anywhere in the Podfile. A Podfile that already activates
Expo modules in a differently named target is left alone."#,
        remediation: r#"The anchor is the target block named after the Xcode project. If the
Podfile's target name differs from the `.xcodeproj` name, pass it explicitly:

    podfix patch --project-name <TargetName>

or set `project_name` under `[patch]` in podfix.toml."#,
    },
    RuleExplanation {
        rule: RuleId::NativeModulesConfig,
        title: "Native Modules Config Command",
        description: r#"Replaces the bare `config = use_native_modules!` line with a block that
picks the autolinking command: the community CLI config when the
EXPO_USE_COMMUNITY_AUTOLINKING environment variable is '1', otherwise Expo's
`expo-modules-autolinking react-native-config` command. The line then becomes
`config = use_native_modules!(config_command)`."#,
        detection: r#"Any `config = use_native_modules!(config_command)` call. Only the first
bare assignment is rewritten, so once one target carries the command the rule
leaves the rest of the Podfile alone."#,
        remediation: r#"Only the indented, bare `config = use_native_modules!` form is rewritten.
A Podfile that already calls `use_native_modules!` with arguments is left as-is
and needs a manual edit if it should use Expo's autolinking config."#,
    },
    RuleExplanation {
        rule: RuleId::PatchReactImports,
        title: "Patch React Imports Hook",
        description: r#"Calls `expo_patch_react_imports!(installer)` from a `post_integrate` hook,
wrapped in `begin ... rescue => e; Pod::UI.warn e; end` so a failure is a warning
rather than a failed install. The call is inserted at the start of an existing
`post_integrate do |installer|` hook; without one, a new hook is added after each
`use_expo_modules!` line."#,
        detection: "The literal call `expo_patch_react_imports!(installer)` anywhere in the Podfile.",
        remediation: r#"The anchor is either an existing `post_integrate do |installer|` line or a
`use_expo_modules!` line. If neither is present, fix the activation rule first
(see `podfix explain use-expo-modules`)."#,
    },
];

/// Look a rule up by key, ignoring case and treating `_` as `-`.
pub fn lookup_rule(query: &str) -> Option<&'static RuleExplanation> {
    let normalized = query.trim().to_lowercase().replace('_', "-");
    let id = RuleId::parse(&normalized)?;
    RULE_REGISTRY.iter().find(|r| r.rule == id)
}

/// List all available rule keys.
pub fn list_rule_keys() -> Vec<&'static str> {
    RULE_REGISTRY.iter().map(|r| r.rule.as_str()).collect()
}

/// The SDK version gate of a built-in rule.
pub fn rule_gate(rule: RuleId) -> VersionGate {
    builtin_rules()
        .iter()
        .find(|r| r.id() == rule)
        .map(|r| r.gate())
        .unwrap_or_else(VersionGate::always)
}
