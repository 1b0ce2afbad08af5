use super::{PatchRule, RuleEffect};
use crate::anchors;
use crate::engine::PatchContext;
use crate::version::VersionGate;
use podfix_types::rules::RuleId;

pub struct AutolinkRequireRule;

impl AutolinkRequireRule {
    pub const REQUIRE_LINE: &'static str = r#"require File.join(File.dirname(`node --print "require.resolve('expo/package.json')"`), "scripts/autolinking")"#;
}

impl PatchRule for AutolinkRequireRule {
    fn id(&self) -> RuleId {
        RuleId::AutolinkRequire
    }

    fn gate(&self) -> VersionGate {
        VersionGate::always()
    }

    fn is_present(&self, text: &str, _ctx: &PatchContext) -> bool {
        anchors::autolink_require().is_match(text)
    }

    fn apply(&self, text: String, _ctx: &PatchContext) -> RuleEffect {
        let mut out = String::with_capacity(Self::REQUIRE_LINE.len() + 1 + text.len());
        out.push_str(Self::REQUIRE_LINE);
        out.push('\n');
        out.push_str(&text);
        RuleEffect::applied(out)
    }
}
