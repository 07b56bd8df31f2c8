//! Branch detection specs

use crate::prelude::*;

#[test]
fn branch_falls_back_to_main() {
    let temp = Lake::acme();
    temp.protolake().args(&["branch"]).passes().stdout_eq("main\n");
}

#[test]
fn branch_json_includes_lake_version() {
    let temp = Lake::acme();
    temp.protolake()
        .args(&["branch", "-o", "json"])
        .passes()
        .stdout_has("\"branch\": \"main\"")
        .stdout_has("\"version\": \"1.0.0-main\"");
}
