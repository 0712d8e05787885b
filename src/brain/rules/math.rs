//! Arithmetic rules (§4.7): the teacher never spells out the operator in plain text — a
//! witness is just two numbers and a result (`"19 5" -> "24"`) — so induction has to guess
//! both which of the four operations and which base in `{2, 8, 10, 16}` explains the pair,
//! the way `DetermineOperation` does.

use super::pattern::{split_words, strip_trailing};

const BASES: [u32; 4] = [2, 8, 10, 16];

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Self::Add => a.checked_add(b),
            Self::Sub => a.checked_sub(b),
            Self::Mul => a.checked_mul(b),
            Self::Div => a.checked_div(b),
        }
    }
}

/// A math rule: one operator, one operand base, one result base — discovered from two
/// witnesses, applicable to any `"<lhs> <rhs>"` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathRule {
    pub op: Operator,
    pub operand_base: u32,
    pub result_base: u32,
    /// Whether hex results render with uppercase `A`-`F`, inherited from the first witness.
    pub uppercase: bool,
}

fn digit_value(c: char) -> Option<u32> {
    c.to_digit(16)
}

/// The smallest base in which every character of `s` is a valid digit, or `None` if `s` is
/// not a plain digit run at all.
fn min_base(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    let mut needed = 2u32;
    for c in s.chars() {
        let v = digit_value(c)?;
        needed = needed.max(v + 1);
    }
    Some(needed)
}

fn candidate_bases(min: u32) -> impl Iterator<Item = u32> {
    BASES.into_iter().filter(move |&b| b >= min)
}

fn parse_radix(s: &str, base: u32) -> Option<i64> {
    i64::from_str_radix(s, base).ok()
}

fn format_radix(value: i64, base: u32, uppercase: bool) -> String {
    let sign = value < 0;
    let magnitude = value.unsigned_abs();
    let mut digits = match base {
        2 => format!("{magnitude:b}"),
        8 => format!("{magnitude:o}"),
        10 => format!("{magnitude}"),
        16 => {
            if uppercase {
                format!("{magnitude:X}")
            } else {
                format!("{magnitude:x}")
            }
        }
        _ => unreachable!("base is always one of BASES"),
    };
    if sign {
        digits.insert(0, '-');
    }
    digits
}

fn split_operands(s: &str) -> Option<(&str, &str)> {
    let words = split_words(s);
    if words.len() == 2 {
        Some((words[0], words[1]))
    } else {
        None
    }
}

/// Finds every `(Operator, operand_base, result_base)` triple consistent with both witnesses,
/// mirroring `DetermineOperation`'s exhaustive search. More than one fit is ambiguity; the
/// caller rejects in that case exactly as zero fits would.
fn fitting_rules(i1: &str, o1: &str, i2: &str, o2: &str) -> Vec<MathRule> {
    let Some((a1, b1)) = split_operands(i1) else {
        return Vec::new();
    };
    let Some((a2, b2)) = split_operands(i2) else {
        return Vec::new();
    };
    let Some(operand_min) = [a1, b1, a2, b2].into_iter().filter_map(min_base).max() else {
        return Vec::new();
    };
    let Some(result_min) = [o1, o2].into_iter().filter_map(min_base).max() else {
        return Vec::new();
    };
    let uppercase = o1.chars().any(|c| c.is_ascii_uppercase()) || o2.chars().any(|c| c.is_ascii_uppercase());

    let mut fits = Vec::new();
    for ob in candidate_bases(operand_min) {
        let (Some(pa1), Some(pb1), Some(pa2), Some(pb2)) = (
            parse_radix(a1, ob),
            parse_radix(b1, ob),
            parse_radix(a2, ob),
            parse_radix(b2, ob),
        ) else {
            continue;
        };
        for rb in candidate_bases(result_min) {
            for op in Operator::ALL {
                let (Some(r1), Some(r2)) = (op.apply(pa1, pb1), op.apply(pa2, pb2)) else {
                    continue;
                };
                if format_radix(r1, rb, uppercase).eq_ignore_ascii_case(o1)
                    && format_radix(r2, rb, uppercase).eq_ignore_ascii_case(o2)
                {
                    fits.push(MathRule {
                        op,
                        operand_base: ob,
                        result_base: rb,
                        uppercase,
                    });
                }
            }
        }
    }
    fits
}

/// Induces a math rule from two witnesses. Rejects (returns `None`) when zero or more than one
/// `(operator, operand base, result base)` triple explains both — ambiguity is a failure, not
/// a tie-break, per §8's boundary behaviour.
#[must_use]
pub fn induce_math_rule(i1: &str, o1: &str, i2: &str, o2: &str, end: &str) -> Option<MathRule> {
    let i1 = strip_trailing(i1, end);
    let i2 = strip_trailing(i2, end);
    let o1 = strip_trailing(o1, end);
    let o2 = strip_trailing(o2, end);

    let mut fits = fitting_rules(&i1, &o1, &i2, &o2);
    if fits.len() == 1 { fits.pop() } else { None }
}

/// Applies a math rule to a concrete `"<lhs> <rhs>"` input. Division by zero, overflow, or a
/// malformed input all yield `None`, deferring to the next rule family.
#[must_use]
pub fn apply_math_rule(rule: &MathRule, input: &str) -> Option<String> {
    let (a, b) = split_operands(input)?;
    let pa = parse_radix(a, rule.operand_base)?;
    let pb = parse_radix(b, rule.operand_base)?;
    let result = rule.op.apply(pa, pb)?;
    Some(format_radix(result, rule.result_base, rule.uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn induces_decimal_addition_from_disambiguating_witnesses() {
        let rule = induce_math_rule("19 5", "24", "28 6", "34", "").unwrap();
        assert_eq!(rule.op, Operator::Add);
        assert_eq!(rule.operand_base, 10);
        assert_eq!(rule.result_base, 10);
        assert_eq!(apply_math_rule(&rule, "7 8").as_deref(), Some("15"));
    }

    #[test]
    fn induces_hexadecimal_subtraction_from_letter_digits() {
        let rule = induce_math_rule("1A 1", "19", "FF 1", "FE", "").unwrap();
        assert_eq!(rule.op, Operator::Sub);
        assert_eq!(rule.operand_base, 16);
        assert_eq!(apply_math_rule(&rule, "10 1").as_deref(), Some("F"));
    }

    #[test]
    fn ambiguous_witnesses_produce_no_rule() {
        // "1+0=1" fits addition and subtraction in every candidate base at once.
        assert!(induce_math_rule("1 0", "1", "1 0", "1", "").is_none());
    }

    #[test]
    fn division_by_zero_fails_to_apply() {
        let rule = MathRule {
            op: Operator::Div,
            operand_base: 10,
            result_base: 10,
            uppercase: false,
        };
        assert_eq!(apply_math_rule(&rule, "4 0"), None);
    }

    #[test]
    fn rejects_malformed_operand_count() {
        assert!(induce_math_rule("1 2 3", "5", "4 5", "9", "").is_none());
    }
}
