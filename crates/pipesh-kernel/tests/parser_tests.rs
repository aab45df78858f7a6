//! Parser tests using rstest for parameterization.

use pipesh_kernel::parser::{parse, StageSpec};
use pipesh_kernel::ChainError;
use rstest::rstest;

/// Render parsed stages as `name[arg,arg] | name[...]` for compact comparison.
fn format_stages(stages: &[StageSpec]) -> String {
    stages
        .iter()
        .map(|s| format!("{}[{}]", s.name, s.args.join(",")))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn run_parser_test(input: &str, expected: &str) {
    let stages = parse(input).unwrap_or_else(|e| panic!("parse error for {:?}: {}", input, e));
    assert_eq!(format_stages(&stages), expected, "input: {:?}", input);
}

// =============================================================================
// Pipelines
// =============================================================================

#[rstest]
#[case::bare("ls", "ls[]")]
#[case::args("echo a b", "echo[a,b]")]
#[case::two("echo a | uppercase", "echo[a] | uppercase[]")]
#[case::three("cat f | grep -v x | wc", "cat[f] | grep[-v,x] | wc[]")]
#[case::tight_pipes("echo a|uniq|wc", "echo[a] | uniq[] | wc[]")]
#[case::quoted("echo \"a b\" 'c d'", "echo[a b,c d]")]
#[case::quoted_pipe("grep \"x|y\" | wc", "grep[x|y] | wc[]")]
#[case::surrounding_space("   head -n 2   ", "head[-n,2]")]
fn test_pipelines(#[case] input: &str, #[case] expected: &str) {
    run_parser_test(input, expected);
}

// =============================================================================
// Errors
// =============================================================================

#[rstest]
#[case::empty("")]
#[case::whitespace(" \t ")]
fn test_empty_pipeline(#[case] input: &str) {
    assert_eq!(parse(input), Err(ChainError::EmptyPipeline));
}

#[rstest]
#[case::leading_pipe("| wc")]
#[case::trailing_pipe("ls |")]
#[case::double_pipe("ls || wc")]
#[case::lone_pipe("|")]
#[case::unterminated("echo \"abc")]
fn test_syntax_errors(#[case] input: &str) {
    let err = parse(input).unwrap_err();
    assert!(matches!(err, ChainError::Syntax { .. }), "input: {:?} gave {:?}", input, err);
}

#[test]
fn test_syntax_error_names_the_command() {
    let err = parse("ls |").unwrap_err();
    assert_eq!(err.to_string(), "Syntax error in [ls |]: empty pipeline stage at 4");
}
