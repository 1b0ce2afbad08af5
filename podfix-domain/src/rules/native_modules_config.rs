use super::{PatchRule, RuleEffect};
use crate::anchors;
use crate::engine::PatchContext;
use crate::version::{VersionGate, SDK_52};
use podfix_types::rules::RuleId;
use regex::NoExpand;

pub struct NativeModulesConfigRule;

impl NativeModulesConfigRule {
    /// Replacement for the argument-less `config = use_native_modules!` line.
    pub const CONFIG_BLOCK: &'static str = r#"
  if ENV['EXPO_USE_COMMUNITY_AUTOLINKING'] == '1'
    config_command = ['node', '-e', "process.argv=['', '', 'config'];require('@react-native-community/cli').run()"];
  else
    config_command = [
      'node',
      '--no-warnings',
      '--eval',
      'require(require.resolve(\'expo-modules-autolinking\', { paths: [require.resolve(\'expo/package.json\')] }))(process.argv.slice(1))',
      'react-native-config',
      '--json',
      '--platform',
      'ios'
    ]
  end

  config = use_native_modules!(config_command)
"#;
}

impl PatchRule for NativeModulesConfigRule {
    fn id(&self) -> RuleId {
        RuleId::NativeModulesConfig
    }

    fn gate(&self) -> VersionGate {
        VersionGate::at_least(SDK_52)
    }

    /// The rewritten `use_native_modules!(config_command)` call, not the absence of the
    /// pristine assignment. Only the first pristine assignment is rewritten, so with several
    /// targets a pristine line survives the first run; matching on it alone would rewrite the
    /// next target on every later run.
    fn is_present(&self, text: &str, _ctx: &PatchContext) -> bool {
        anchors::native_modules_with_command().is_match(text)
    }

    fn apply(&self, text: String, _ctx: &PatchContext) -> RuleEffect {
        let pristine = anchors::native_modules_assignment();
        if !pristine.is_match(&text) {
            return RuleEffect::anchor_missing(
                text,
                "no `config = use_native_modules!` assignment found",
            );
        }

        let out = pristine
            .replace(&text, NoExpand(Self::CONFIG_BLOCK))
            .into_owned();
        RuleEffect::applied(out)
    }
}
