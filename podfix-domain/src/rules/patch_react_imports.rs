use super::{PatchRule, RuleEffect};
use crate::anchors;
use crate::engine::PatchContext;
use crate::version::{VersionGate, SDK_44, SDK_52};
use podfix_types::rules::RuleId;
use regex::Captures;

pub struct PatchReactImportsRule;

impl PatchReactImportsRule {
    /// Guarded call placed as the first statement of an existing `post_integrate` hook.
    pub const GUARDED_CALL: &'static str = "
    begin
      expo_patch_react_imports!(installer)
    rescue => e
      Pod::UI.warn e
    end";

    /// Hook synthesized after `use_expo_modules!` when the Podfile has none.
    pub const POST_INTEGRATE_HOOK: &'static str = "  post_integrate do |installer|
    begin
      expo_patch_react_imports!(installer)
    rescue => e
      Pod::UI.warn e
    end
  end
";
}

impl PatchRule for PatchReactImportsRule {
    fn id(&self) -> RuleId {
        RuleId::PatchReactImports
    }

    fn gate(&self) -> VersionGate {
        VersionGate::between(SDK_44, SDK_52)
    }

    fn is_present(&self, text: &str, _ctx: &PatchContext) -> bool {
        anchors::patch_react_imports_call().is_match(text)
    }

    fn apply(&self, text: String, _ctx: &PatchContext) -> RuleEffect {
        let hook = anchors::post_integrate_hook();
        if hook.is_match(&text) {
            let out = hook
                .replace(&text, |caps: &Captures<'_>| {
                    format!("{}{}", &caps[1], Self::GUARDED_CALL)
                })
                .into_owned();
            return RuleEffect::applied(out);
        }

        let anchor = anchors::use_expo_modules_anchor();
        if !anchor.is_match(&text) {
            return RuleEffect::anchor_missing(
                text,
                "no `post_integrate` hook and no `use_expo_modules!` line to anchor one",
            );
        }

        let out = anchor
            .replace_all(&text, |caps: &Captures<'_>| {
                format!("{}{}", &caps[1], Self::POST_INTEGRATE_HOOK)
            })
            .into_owned();
        RuleEffect::applied(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::SdkVersion;
    use podfix_types::rules::RuleStatus;
    use pretty_assertions::assert_eq;

    fn ctx() -> PatchContext {
        PatchContext::new("MyApp", SdkVersion::parse("48.0.0").ok())
    }

    #[test]
    fn synthesizes_hook_after_activation_line() {
        let podfile = "target 'MyApp' do\n  use_expo_modules!\nend\n";
        let effect = PatchReactImportsRule.apply(podfile.to_string(), &ctx());
        assert_eq!(effect.status, RuleStatus::Applied);
        assert_eq!(
            effect.text,
            "target 'MyApp' do\n  use_expo_modules!\n  post_integrate do |installer|\n    begin\n      expo_patch_react_imports!(installer)\n    rescue => e\n      Pod::UI.warn e\n    end\n  end\nend\n"
        );
    }

    #[test]
    fn prefers_existing_post_integrate_hook() {
        let podfile = "target 'MyApp' do\n  use_expo_modules!\n  post_integrate do |installer|\n    puts 'done'\n  end\nend\n";
        let effect = PatchReactImportsRule.apply(podfile.to_string(), &ctx());
        assert_eq!(
            effect.text,
            "target 'MyApp' do\n  use_expo_modules!\n  post_integrate do |installer|\n    begin\n      expo_patch_react_imports!(installer)\n    rescue => e\n      Pod::UI.warn e\n    end\n    puts 'done'\n  end\nend\n"
        );
    }

    #[test]
    fn generated_call_is_detected() {
        let podfile = "target 'MyApp' do\n  use_expo_modules!\nend\n";
        let effect = PatchReactImportsRule.apply(podfile.to_string(), &ctx());
        assert!(PatchReactImportsRule.is_present(&effect.text, &ctx()));
    }

    #[test]
    fn missing_anchor_is_reported() {
        let podfile = "target 'MyApp' do\nend\n";
        let effect = PatchReactImportsRule.apply(podfile.to_string(), &ctx());
        assert_eq!(effect.status, RuleStatus::AnchorMissing);
        assert_eq!(effect.text, podfile);
    }

    #[test]
    fn every_activation_line_gets_a_hook() {
        let podfile = "target 'A' do\n  use_expo_modules!\nend\ntarget 'B' do\n  use_expo_modules!\nend\n";
        let effect = PatchReactImportsRule.apply(podfile.to_string(), &ctx());
        assert_eq!(effect.text.matches("post_integrate do |installer|").count(), 2);
    }
}
