use super::{PatchRule, RuleEffect};
use crate::anchors;
use crate::engine::PatchContext;
use crate::version::VersionGate;
use podfix_types::rules::RuleId;
use regex::Captures;

pub struct UseExpoModulesRule;

impl UseExpoModulesRule {
    pub const DIRECTIVE: &'static str = "use_expo_modules!";
}

impl PatchRule for UseExpoModulesRule {
    fn id(&self) -> RuleId {
        RuleId::UseExpoModules
    }

    fn gate(&self) -> VersionGate {
        VersionGate::always()
    }

    fn is_present(&self, text: &str, _ctx: &PatchContext) -> bool {
        anchors::use_expo_modules_line().is_match(text)
    }

    fn apply(&self, text: String, ctx: &PatchContext) -> RuleEffect {
        let target = match anchors::target_block(&ctx.project_name) {
            Ok(re) => re,
            Err(err) => {
                return RuleEffect::anchor_missing(
                    text,
                    format!("target name cannot be matched: {err}"),
                );
            }
        };
        if !target.is_match(&text) {
            return RuleEffect::anchor_missing(
                text,
                format!("no `target '{}' do` block found", ctx.project_name),
            );
        }

        let out = target
            .replace(&text, |caps: &Captures<'_>| {
                format!("{}\n  {}", &caps[1], Self::DIRECTIVE)
            })
            .into_owned();
        RuleEffect::applied(out)
    }
}
