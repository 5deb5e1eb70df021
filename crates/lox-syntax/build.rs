use std::path::Path;

/// Generates one test function per .lox file in tests/fixtures/.
///
/// Each fixture is snapshotted by insta into a `.snap` file next to it. A
/// fixture without a snapshot still gets a test; insta writes a `.snap.new`
/// on the first run for review.
fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("fixture_tests.rs");
    let fixture_dir = Path::new("tests/fixtures");

    let mut fixtures: Vec<String> = std::fs::read_dir(fixture_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| path.extension().is_some_and(|e| e == "lox"))
        .map(|path| path.file_stem().unwrap().to_str().unwrap().to_string())
        .collect();
    fixtures.sort();

    let mut code = String::from(
        r#"mod parse_fixtures {
    use super::fixture_test;
"#,
    );

    for name in &fixtures {
        // File stems may hold characters that are not valid in identifiers.
        let test_name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        code.push_str(&format!(
            r#"
    #[test]
    fn {test_name}() {{
        fixture_test({name:?});
    }}
"#
        ));
        println!(
            "cargo::rerun-if-changed={}",
            fixture_dir.join(format!("{name}.lox")).display()
        );
    }

    code.push_str("}\n");
    std::fs::write(&dest, code).unwrap();

    // New or removed fixtures
    println!("cargo::rerun-if-changed=tests/fixtures");
}
