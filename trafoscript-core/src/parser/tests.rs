//! Unit tests for the trafoscript parser.

use super::*;
use crate::aggregation::AggregationSelector;

fn expr_of(program: &Program) -> &Expression {
    match &program.statements[0] {
        Statement::VarDeclaration { init, .. } => init,
        Statement::Assignment { expr, .. } | Statement::Print { expr, .. } => expr,
    }
}

/// Render an expression fully parenthesized, to check tree shape.
fn shape(expr: &Expression) -> String {
    match &expr.kind {
        ExpressionKind::IntLit(n) => n.to_string(),
        ExpressionKind::DecimalLit(n) => n.to_string(),
        ExpressionKind::StringLit(s) => format!("{:?}", s),
        ExpressionKind::VarReference(name) => name.clone(),
        ExpressionKind::BinaryOp { left, op, right } => {
            format!("({} {} {})", shape(left), op, shape(right))
        }
        ExpressionKind::FunctionCall { name, args } => format!(
            "{}[{}]",
            name,
            args.iter().map(shape).collect::<Vec<_>>().join(", ")
        ),
        ExpressionKind::TimeUnit(unit) => unit.keyword().to_string(),
        ExpressionKind::Aggregation(selector) => format!("{:?}", selector),
    }
}

#[test]
fn test_parse_var_declaration() {
    let program = parse("var a = 1").unwrap();
    assert_eq!(program.statements.len(), 1);
    match &program.statements[0] {
        Statement::VarDeclaration { name, init, span } => {
            assert_eq!(name, "a");
            assert_eq!(init.kind, ExpressionKind::IntLit(1));
            assert_eq!(*span, Some(Span::at(1, 0, 1, 9)));
        }
        other => panic!("unexpected statement {:?}", other),
    }
}

#[test]
fn test_parse_assignment_and_print() {
    let program = parse("var a = 1\na = 3\nprint(a)").unwrap();
    assert_eq!(program.statements.len(), 3);
    assert!(matches!(
        &program.statements[1],
        Statement::Assignment { name, span: Some(s), .. } if name == "a" && *s == Span::at(2, 0, 2, 5)
    ));
    assert!(matches!(
        &program.statements[2],
        Statement::Print { span: Some(s), .. } if *s == Span::at(3, 0, 3, 8)
    ));
}

#[test]
fn test_precedence() {
    assert_eq!(shape(expr_of(&parse("var x = 2+2*2").unwrap())), "(2 + (2 * 2))");
    assert_eq!(shape(expr_of(&parse("var x = 2*2+2").unwrap())), "((2 * 2) + 2)");
    assert_eq!(shape(expr_of(&parse("var x = 2*(2+2)").unwrap())), "(2 * (2 + 2))");
    assert_eq!(shape(expr_of(&parse("var x = 8/2/2").unwrap())), "((8 / 2) / 2)");
    assert_eq!(shape(expr_of(&parse("var x = 5-1-1").unwrap())), "((5 - 1) - 1)");
}

#[test]
fn test_function_call_and_keywords() {
    let program = parse("var m = Moving(Merge(a, b), AVERAGE, WEEK * 2)").unwrap();
    assert_eq!(
        shape(expr_of(&program)),
        "Moving[Merge[a, b], Average, (WEEK * 2)]"
    );
    match &expr_of(&program).kind {
        ExpressionKind::FunctionCall { args, .. } => {
            assert_eq!(args[1].kind, ExpressionKind::Aggregation(AggregationSelector::Average));
        }
        other => panic!("unexpected expression {:?}", other),
    }
}

#[test]
fn test_function_call_without_args() {
    let program = parse("var x = Foo()").unwrap();
    assert_eq!(shape(expr_of(&program)), "Foo[]");
}

#[test]
fn test_reference_span() {
    let program = parse("var a = b + 2").unwrap();
    match &expr_of(&program).kind {
        ExpressionKind::BinaryOp { left, .. } => {
            assert_eq!(left.span, Some(Span::at(1, 8, 1, 9)));
        }
        other => panic!("unexpected expression {:?}", other),
    }
    assert_eq!(expr_of(&program).span, Some(Span::at(1, 8, 1, 13)));
}

#[test]
fn test_function_call_span_covers_parens() {
    let program = parse("var d = Delta(data)").unwrap();
    assert_eq!(expr_of(&program).span, Some(Span::at(1, 8, 1, 19)));
}

#[test]
fn test_untagged_parse_has_no_spans() {
    let program = parse_with_options(
        "var a = b + 2",
        ParseOptions {
            with_positions: false,
        },
    )
    .unwrap();
    assert_eq!(program.statements[0].span(), None);
    assert_eq!(expr_of(&program).span, None);
}

#[test]
fn test_blank_lines_and_comments() {
    let program = parse("\n# header\nvar a = 1   # trailing\n\n\nvar b = a\n").unwrap();
    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.statements[1].span(), Some(Span::at(6, 0, 6, 9)));
}

#[test]
fn test_decimal_and_string_literals() {
    let program = parse("var f = Filter(data, \"run\", 'walk') * 1.5").unwrap();
    assert_eq!(
        shape(expr_of(&program)),
        "(Filter[data, \"run\", \"walk\"] * 1.5)"
    );
}

#[test]
fn test_two_statements_on_one_line_rejected() {
    let err = parse("var a = 1 var b = 2").unwrap_err();
    assert!(matches!(err, ScriptError::Parse { position, .. } if position == Position::new(1, 10)));
}

#[test]
fn test_missing_expression() {
    assert!(parse("var a =").is_err());
    assert!(parse("var = 3").is_err());
    assert!(parse("print a").is_err());
    assert!(parse("a + 3").is_err());
}

#[test]
fn test_unclosed_paren() {
    let err = parse("var a = (1 + 2").unwrap_err();
    assert!(err.to_string().contains("Expected RightParen"));
}

#[test]
fn test_declared_names() {
    let program = parse("var a = 1\nb = 2\nvar c = 3").unwrap();
    assert_eq!(program.declared_names().collect::<Vec<_>>(), vec!["a", "c"]);
}
