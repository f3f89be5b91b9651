//! libconfig text parser
//!
//! Turns the text of an `acq.cfg` file into a [`ConfigNode`] tree. The root of
//! the file is an unnamed group.
//!
//! Supported syntax:
//! - settings `name = value;` (`:` instead of `=`, `,` or nothing instead of `;`)
//! - groups `{ ... }`, arrays `[ scalar, ... ]`, lists `( value, ... )`
//! - booleans, decimal and hex integers (optional `L`/`LL` suffix), floats,
//!   strings with escapes; adjacent string literals are concatenated
//! - `#`, `//` and `/* */` comments

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_until, take_while};
use nom::character::complete::{char, digit1, hex_digit1, multispace1, one_of, satisfy};
use nom::combinator::{cut, map, map_res, not, opt, recognize, value};
use nom::error::{context, VerboseError, VerboseErrorKind};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::ConfigNode;

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Parse a complete configuration text.
///
/// # Errors
/// `DomainError::Syntax` with the 1-based line of the offending input.
#[instrument(level = "trace", skip(text))]
pub fn parse(text: &str) -> DomainResult<ConfigNode> {
    match terminated(settings, sp)(text) {
        Ok(("", children)) => Ok(ConfigNode::Group(children)),
        Ok((rest, _)) => Err(syntax_error(text, rest, "syntax error")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let at = e.errors.first().map(|(at, _)| *at).unwrap_or(text);
            let message = e
                .errors
                .iter()
                .find_map(|(_, kind)| match kind {
                    VerboseErrorKind::Context(msg) => Some(*msg),
                    _ => None,
                })
                .unwrap_or("syntax error");
            Err(syntax_error(text, at, message))
        }
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(text, "", "unexpected end of input")),
    }
}

fn syntax_error(text: &str, at: &str, message: &str) -> DomainError {
    let offset = text.len().saturating_sub(at.len());
    let consumed = text.get(..offset).unwrap_or(text);
    DomainError::Syntax {
        line: consumed.matches('\n').count() + 1,
        message: message.to_string(),
    }
}

fn failure<'a>(at: &'a str, message: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Failure(VerboseError {
        errors: vec![(at, VerboseErrorKind::Context(message))],
    })
}

// whitespace and comments

fn line_comment(input: &str) -> Res<'_, ()> {
    value(
        (),
        pair(alt((tag("#"), tag("//"))), take_while(|c: char| c != '\n')),
    )(input)
}

fn block_comment(input: &str) -> Res<'_, ()> {
    value(
        (),
        tuple((
            tag("/*"),
            context("unterminated comment", cut(take_until("*/"))),
            tag("*/"),
        )),
    )(input)
}

fn sp(input: &str) -> Res<'_, ()> {
    value(
        (),
        many0(alt((value((), multispace1), line_comment, block_comment))),
    )(input)
}

// settings and groups

fn settings(mut input: &str) -> Res<'_, Vec<(String, ConfigNode)>> {
    let mut children: Vec<(String, ConfigNode)> = Vec::new();
    loop {
        let (rest, _) = sp(input)?;
        match setting(rest) {
            Ok((next, (key, node))) => {
                if children.iter().any(|(existing, _)| *existing == key) {
                    return Err(failure(rest, "duplicate setting name"));
                }
                children.push((key, node));
                input = next;
            }
            Err(nom::Err::Error(_)) => return Ok((rest, children)),
            Err(err) => return Err(err),
        }
    }
}

fn setting(input: &str) -> Res<'_, (String, ConfigNode)> {
    let (input, key) = name(input)?;
    let (input, _) = preceded(sp, context("expected '=' or ':'", cut(one_of(":="))))(input)?;
    let (input, node) = preceded(sp, context("expected value", cut(node)))(input)?;
    let (input, _) = opt(preceded(sp, one_of(";,")))(input)?;
    Ok((input, (key.to_string(), node)))
}

fn name(input: &str) -> Res<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '*'),
        take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '*')),
    ))(input)
}

fn node(input: &str) -> Res<'_, ConfigNode> {
    alt((
        map(group, ConfigNode::Group),
        map(array, ConfigNode::Array),
        map(list, ConfigNode::List),
        scalar,
    ))(input)
}

fn group(input: &str) -> Res<'_, Vec<(String, ConfigNode)>> {
    delimited(
        char('{'),
        settings,
        preceded(sp, context("expected '}'", cut(char('}')))),
    )(input)
}

fn array(input: &str) -> Res<'_, Vec<ConfigNode>> {
    delimited(
        char('['),
        terminated(
            separated_list0(preceded(sp, char(',')), preceded(sp, scalar)),
            opt(preceded(sp, char(','))),
        ),
        preceded(sp, context("expected ']'", cut(char(']')))),
    )(input)
}

fn list(input: &str) -> Res<'_, Vec<ConfigNode>> {
    delimited(
        char('('),
        terminated(
            separated_list0(preceded(sp, char(',')), preceded(sp, node)),
            opt(preceded(sp, char(','))),
        ),
        preceded(sp, context("expected ')'", cut(char(')')))),
    )(input)
}

// scalars

fn scalar(input: &str) -> Res<'_, ConfigNode> {
    alt((
        map(word(boolean), ConfigNode::Boolean),
        map(word(float), ConfigNode::Float),
        map(word(integer), ConfigNode::Integer),
        map(string, ConfigNode::String),
    ))(input)
}

/// Bare token that must not run into a following name or number.
fn word<'a, O>(
    parser: impl FnMut(&'a str) -> Res<'a, O>,
) -> impl FnMut(&'a str) -> Res<'a, O> {
    terminated(
        parser,
        not(satisfy(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'))),
    )
}

fn boolean(input: &str) -> Res<'_, bool> {
    alt((
        value(true, tag_no_case("true")),
        value(false, tag_no_case("false")),
    ))(input)
}

fn exponent(input: &str) -> Res<'_, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

fn float(input: &str) -> Res<'_, f64> {
    map_res(
        recognize(pair(
            opt(one_of("+-")),
            alt((
                recognize(tuple((digit1, char('.'), opt(digit1), opt(exponent)))),
                recognize(tuple((char('.'), digit1, opt(exponent)))),
                recognize(pair(digit1, exponent)),
            )),
        )),
        |text: &str| text.parse::<f64>(),
    )(input)
}

fn integer(input: &str) -> Res<'_, i64> {
    terminated(
        alt((
            map_res(preceded(tag_no_case("0x"), hex_digit1), |digits: &str| {
                u64::from_str_radix(digits, 16).map(|v| v as i64)
            }),
            map_res(recognize(pair(opt(one_of("+-")), digit1)), |text: &str| {
                text.parse::<i64>()
            }),
        )),
        opt(alt((tag("LL"), tag("L")))),
    )(input)
}

fn string(input: &str) -> Res<'_, String> {
    map(
        pair(string_literal, many0(preceded(sp, string_literal))),
        |(first, rest)| {
            rest.into_iter().fold(first, |mut acc, part| {
                acc.push_str(&part);
                acc
            })
        },
    )(input)
}

fn string_literal(input: &str) -> Res<'_, String> {
    preceded(char('"'), string_body)(input)
}

/// Body of a quoted string up to and including the closing quote.
fn string_body(input: &str) -> Res<'_, String> {
    let mut out = String::new();
    let mut chars = input.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((&input[idx + 1..], out)),
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, 'n')) => '\n',
                    Some((_, 'r')) => '\r',
                    Some((_, 't')) => '\t',
                    Some((_, 'f')) => '\u{c}',
                    Some((_, '\\')) => '\\',
                    Some((_, '"')) => '"',
                    Some((_, 'x')) => {
                        let digits: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                        if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                            return Err(failure(&input[idx..], "invalid escape sequence"));
                        }
                        // a lone byte above 0x7f has no UTF-8 meaning
                        match u8::from_str_radix(&digits, 16) {
                            Ok(byte) if byte.is_ascii() => char::from(byte),
                            _ => return Err(failure(&input[idx..], "non-ASCII \\x escape")),
                        }
                    }
                    _ => return Err(failure(&input[idx..], "invalid escape sequence")),
                };
                out.push(escaped);
            }
            _ => out.push(c),
        }
    }
    Err(failure(input, "unterminated string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse_value(text: &str) -> ConfigNode {
        let tree = parse(&format!("v = {};", text)).expect("parse");
        tree.get("v").cloned().expect("v present")
    }

    #[rstest]
    #[case("42", ConfigNode::Integer(42))]
    #[case("-17", ConfigNode::Integer(-17))]
    #[case("+3", ConfigNode::Integer(3))]
    #[case("0x1F", ConfigNode::Integer(31))]
    #[case("9000000000L", ConfigNode::Integer(9_000_000_000))]
    #[case("1.5", ConfigNode::Float(1.5))]
    #[case("-2.5e-3", ConfigNode::Float(-0.0025))]
    #[case(".5", ConfigNode::Float(0.5))]
    #[case("1.", ConfigNode::Float(1.0))]
    #[case("1e3", ConfigNode::Float(1000.0))]
    #[case("true", ConfigNode::Boolean(true))]
    #[case("FALSE", ConfigNode::Boolean(false))]
    #[case(r#""radiant""#, ConfigNode::String("radiant".into()))]
    #[case(r#""a\"b\\c\n""#, ConfigNode::String("a\"b\\c\n".into()))]
    #[case(r#""\x41BC""#, ConfigNode::String("ABC".into()))]
    #[case(r#""con" /* gap */ "cat""#, ConfigNode::String("concat".into()))]
    fn test_scalars(#[case] text: &str, #[case] expected: ConfigNode) {
        assert_eq!(parse_value(text), expected);
    }

    #[test]
    fn test_arrays_and_lists() {
        assert_eq!(
            parse_value("[1, 2, 3,]"),
            ConfigNode::Array(vec![
                ConfigNode::Integer(1),
                ConfigNode::Integer(2),
                ConfigNode::Integer(3)
            ])
        );
        assert_eq!(parse_value("[]"), ConfigNode::Array(vec![]));
        assert_eq!(
            parse_value(r#"( 1.5, "x", { a = 1; }, [2] )"#),
            ConfigNode::List(vec![
                ConfigNode::Float(1.5),
                ConfigNode::String("x".into()),
                ConfigNode::Group(vec![("a".into(), ConfigNode::Integer(1))]),
                ConfigNode::Array(vec![ConfigNode::Integer(2)]),
            ])
        );
    }

    #[test]
    fn test_groups_keep_file_order() {
        let tree = parse(
            r#"
            # station settings
            radiant : {
                scalers = { use_pps = true; period = 1.0; };
                // comment
                mode = 2,
                label = "deep"
            };
            "#,
        )
        .unwrap();
        let radiant = tree.get("radiant").unwrap();
        let names: Vec<&str> = radiant
            .children()
            .unwrap()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["scalers", "mode", "label"]);
        assert_eq!(
            tree.lookup("radiant.scalers.period"),
            Ok(&ConfigNode::Float(1.0))
        );
    }

    #[test]
    fn test_empty_input_is_empty_group() {
        assert_eq!(parse("").unwrap(), ConfigNode::Group(vec![]));
        assert_eq!(parse("  /* nothing */ \n# here\n").unwrap(), ConfigNode::Group(vec![]));
    }

    #[rstest]
    #[case("a = 1;\nb = ;\n", 2, "expected value")]
    #[case("a = 1;\n\nb 2;\n", 3, "expected '=' or ':'")]
    #[case("a = [1, 2;\n", 1, "expected ']'")]
    #[case("g = {\n  x = 1;\n", 3, "expected '}'")]
    #[case("a = 1;\na = 2;\n", 2, "duplicate setting name")]
    #[case("a = \"open;\n", 1, "unterminated string")]
    #[case("a = 1;\n}\n", 2, "syntax error")]
    #[case("@include \"other.cfg\"\n", 1, "syntax error")]
    #[case("a = 1;\nb = trueish;\n", 2, "expected value")]
    #[case("a = -0x10;\n", 1, "expected value")]
    #[case("a = 12abc;\n", 1, "expected value")]
    #[case("a = \"\\xC3\";\n", 1, "non-ASCII \\x escape")]
    fn test_syntax_errors(#[case] text: &str, #[case] line: usize, #[case] message: &str) {
        assert_eq!(
            parse(text),
            Err(DomainError::Syntax {
                line,
                message: message.to_string()
            })
        );
    }
}
