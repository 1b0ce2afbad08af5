#![no_main]

//! Fuzz target for report.json parsing.
//!
//! Deserializes arbitrary bytes as a `PodfixReport`; anything that parses must
//! serialize back out.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(report) = serde_json::from_str::<podfix_types::report::PodfixReport>(s) {
        let _ = serde_json::to_string(&report);
        let _ = serde_json::to_string_pretty(&report);
    }

    let _ = serde_json::from_str::<podfix_types::rules::RuleOutcome>(s);
    let _ = serde_json::from_str::<Vec<podfix_types::rules::RuleOutcome>>(s);
    let _ = serde_json::from_str::<podfix_types::report::ReportVerdict>(s);
});
