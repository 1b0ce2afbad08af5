#![no_main]

//! Fuzz target for the patch engine.
//!
//! Runs the built-in rules over arbitrary Podfile text and checks that a second
//! run over the output changes nothing.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use podfix_domain::{PatchContext, PatchEngine, SdkVersion};

#[derive(Debug, Arbitrary)]
struct Input {
    podfile: String,
    project_name: String,
    sdk: Option<(u8, u8, u8)>,
    /// Splice a target block for `project_name` into the text.
    with_target: bool,
}

fuzz_target!(|input: Input| {
    if input.project_name.is_empty() || input.project_name.contains(['\n', '\'', '"']) {
        return;
    }

    let sdk_version = input.sdk.and_then(|(major, minor, patch)| {
        SdkVersion::parse(&format!("{major}.{minor}.{patch}")).ok()
    });
    let ctx = PatchContext::new(input.project_name.clone(), sdk_version);

    let mut podfile = input.podfile;
    if input.with_target {
        podfile.push_str(&format!(
            "\ntarget '{}' do\n  config = use_native_modules!\nend\n",
            input.project_name
        ));
    }

    let engine = PatchEngine::new();
    let once = engine.run(podfile, &ctx);
    let twice = engine.run(once.text.clone(), &ctx);

    assert_eq!(twice.text, once.text, "second run changed the Podfile");
    assert!(!twice.changed());
});
